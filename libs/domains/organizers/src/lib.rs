//! Organizers Domain
//!
//! Registration of organizers ("multiplicadores"), login by CPF + password and
//! the caller profile. Passwords are stored as argon2 PHC strings; sessions are
//! stateless JWTs issued by [`axum_helpers::JwtAuth`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_organizers::{handlers, AuthState, InMemoryOrganizerRepository, OrganizerService};
//!
//! let auth = JwtAuth::new(&JwtConfig::new("a-development-secret-of-32-characters!"));
//! let state = AuthState {
//!     service: Arc::new(OrganizerService::new(InMemoryOrganizerRepository::new(), auth.clone())),
//!     secure_cookies: false,
//! };
//!
//! let registration = handlers::registration_router(state.clone());
//! let sessions = handlers::auth_router(state, auth);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{OrganizerError, OrganizerResult};
pub use handlers::{ApiDoc, AuthState, RegistrationApiDoc};
pub use models::{AuthResponse, LoginRequest, Organizer, OrganizerProfile, RegisterOrganizer};
pub use postgres::PgOrganizerRepository;
pub use repository::{InMemoryOrganizerRepository, OrganizerRepository};
pub use service::OrganizerService;
