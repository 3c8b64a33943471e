use axum::Router;

pub mod health;
pub mod organizers;
pub mod rodas;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
///
/// Returns a stateless Router (all sub-routers have state already applied).
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .nest("/rodas", rodas::router(state))
        .nest("/faixas-etarias", rodas::age_brackets_router(state))
        .nest("/multiplicadores", organizers::registration_router(state))
        .nest("/auth", organizers::auth_router(state))
}

/// Creates a router with the /ready endpoint that performs actual health checks.
///
/// This router has state applied and can be merged with the stateless app router
/// from `create_router`.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
