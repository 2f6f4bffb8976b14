//! Database implementations

pub mod manager;
pub mod order_repository;

pub use manager::{DbConnection, DbManager};
pub use order_repository::OrderRepository;
