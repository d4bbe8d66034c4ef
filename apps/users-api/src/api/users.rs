use axum::Router;
use domain_users::{InMemoryUserRepository, PgUserRepository, UserService, handlers};

/// Users router backed by PostgreSQL when a pool exists, memory otherwise.
pub fn router(state: &crate::state::AppState) -> Router {
    match &state.db {
        Some(db) => handlers::router(UserService::new(PgUserRepository::new(db.clone()))),
        None => {
            tracing::warn!("DATABASE_URL not set, users are kept in memory and lost on restart");
            handlers::router(UserService::new(InMemoryUserRepository::new()))
        }
    }
}
