//! Stateless JWT authentication.
//!
//! Tokens are HS256-signed and accepted from either
//! `Authorization: Bearer <token>` or the httpOnly `token` cookie.
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, jwt_auth_middleware};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let protected = Router::new()
//!     .route("/me", get(handler))
//!     .route_layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod cookie;
pub mod jwt;
pub mod middleware;
pub mod user;

pub use config::JwtConfig;
pub use cookie::{SESSION_COOKIE, clear_session_cookie, session_cookie};
pub use jwt::{DEFAULT_TOKEN_TTL, JwtAuth, JwtClaims};
pub use middleware::{extract_token_from_request, jwt_auth_middleware};
pub use user::AuthUser;
