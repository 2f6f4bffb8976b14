//! HTTP surface of the order system.

mod handlers;
mod routes;
mod state;

pub use routes::router;
pub use state::AppState;
