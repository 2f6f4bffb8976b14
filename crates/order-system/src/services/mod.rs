//! Business services.

pub mod gateway;
pub mod order_service;
pub mod sdk_demo;

pub use gateway::PaymentGateway;
pub use order_service::{CreateOrder, OrderService};
pub use sdk_demo::{DemoReport, SdkDemo};
