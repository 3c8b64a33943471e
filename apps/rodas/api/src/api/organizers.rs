use axum::Router;
use domain_organizers::{AuthState, PgOrganizerRepository, handlers};
use std::sync::Arc;

use crate::state::AppState;

fn auth_state(state: &AppState) -> AuthState<PgOrganizerRepository> {
    AuthState {
        service: Arc::new(state.organizer_service()),
        secure_cookies: state.config.environment.use_https(),
    }
}

pub fn registration_router(state: &AppState) -> Router {
    handlers::registration_router(auth_state(state))
}

pub fn auth_router(state: &AppState) -> Router {
    handlers::auth_router(auth_state(state), state.jwt_auth.clone())
}
