//! Sample merchant order service on top of the Reddio Pay SDK.
//!
//! Orders are stored in SQLite. Each order opens a hosted payment through
//! [`services::PaymentGateway`] and can later be reconciled against the
//! remote payment status.

pub mod api;
pub mod config;
pub mod database;
pub mod errors;
pub mod models;
pub mod services;
pub mod shutdown;
pub mod telemetry;

pub use errors::{AppError, Result};
