use axum::Router;
use domain_rodas::handlers;
use std::sync::Arc;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    handlers::router(Arc::new(state.roda_service()), state.jwt_auth.clone())
}

pub fn age_brackets_router(state: &AppState) -> Router {
    handlers::age_brackets_router(Arc::new(state.roda_service()))
}
