//! # Axum Helpers
//!
//! Shared building blocks for the HTTP services in this workspace.
//!
//! - **[`auth`]**: stateless JWT auth (bearer header or `token` cookie), [`AuthUser`] extractor
//! - **[`server`]**: router assembly with OpenAPI UIs, health checks, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: [`AppError`] and the JSON error body with stable [`ErrorCode`]s
//! - **[`extractors`]**: [`ValidatedJson`]
//! - **[`audit`]**: audit trail on the `audit` tracing target

pub mod audit;
pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{
    AuthUser, DEFAULT_TOKEN_TTL, JwtAuth, JwtClaims, JwtConfig, SESSION_COOKIE,
    clear_session_cookie, jwt_auth_middleware, session_cookie,
};

pub use server::{
    HealthCheckFuture, HealthResponse, create_production_app, create_router, health_router,
    run_health_checks, shutdown_signal,
};

pub use http::{create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::ValidatedJson;

pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers, extract_user_agent};
