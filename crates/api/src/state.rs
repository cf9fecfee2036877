use std::sync::Arc;

use beatmarket_core::storage::MediaStorage;
use beatmarket_db::repositories::Repositories;
use beatmarket_db::DbPool;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Connection pool, when running against Postgres. Only the health check
    /// touches it directly; everything else goes through `repos`.
    pub pool: Option<DbPool>,
    pub repos: Repositories,
    /// Where uploaded pictures, audio and archives are written.
    pub media: Arc<dyn MediaStorage>,
    pub config: Arc<ServerConfig>,
}
