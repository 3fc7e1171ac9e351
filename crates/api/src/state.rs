use std::sync::Arc;

use crate::config::ServerConfig;
use crate::invalidation::InvalidationBus;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: shelf_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Fan-out bus for listing cache invalidation events.
    pub invalidations: Arc<InvalidationBus>,
}
