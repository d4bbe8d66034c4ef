//! Application state management.

use database::postgres::DatabaseConnection;

/// Shared application state.
///
/// Cloned for each handler; `DatabaseConnection` is a pool handle, so clones are cheap.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL pool, absent when running with the in-memory store
    pub db: Option<DatabaseConnection>,
}
