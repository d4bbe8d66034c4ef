use axum::Router;
use axum_helpers::server::{create_router, health_router};

pub mod health;
pub mod users;

/// Creates the API routes. Documentation and middleware are added by `app`.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new().nest("/users", users::router(state))
}

/// Creates a router with the /ready endpoint that performs actual health checks.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

/// The complete application: API routes, docs, middleware, health endpoints.
pub fn app(state: &crate::state::AppState) -> std::io::Result<Router> {
    let router = create_router::<crate::openapi::ApiDoc>(routes(state), &state.config.server)?;

    // - /health: liveness check with app name/version
    // - /ready: readiness check against the store
    Ok(router
        .merge(health_router(state.config.app))
        .merge(ready_router(state.clone())))
}
