use std::sync::Arc;

use crate::database::DbManager;
use crate::services::OrderService;

/// Shared state for route handlers.
#[derive(Clone)]
pub struct AppState {
    pub(super) service: Arc<OrderService>,
    pub(super) db: Arc<DbManager>,
}

impl AppState {
    /// State shared by every handler.
    #[must_use]
    pub fn new(service: Arc<OrderService>, db: Arc<DbManager>) -> Self {
        Self { service, db }
    }
}
