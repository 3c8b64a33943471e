//! Rodas Domain
//!
//! Conversation circles ("rodas") created by organizers, placed on a map and
//! closed with an attendance record.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, auth gate, audit
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐      ┌────────────────────────────┐
//! │   Service   │ ───▶ │ Geocoder / default coords  │
//! └──────┬──────┘      └────────────────────────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← trait + Postgres / in-memory implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← entities, DTOs, statistics
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_rodas::{handlers, InMemoryRodaRepository, NoopGeocoder, RodaService};
//!
//! let service = Arc::new(RodaService::new(InMemoryRodaRepository::new(), Arc::new(NoopGeocoder)));
//! let auth = JwtAuth::new(&JwtConfig::new("a-development-secret-of-32-characters!"));
//!
//! let router = handlers::router(service.clone(), auth);
//! let brackets = handlers::age_brackets_router(service);
//! ```

pub mod coordinates;
pub mod entity;
pub mod error;
pub mod geocoding;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod schedule;
pub mod service;
pub mod stats;

pub use coordinates::{CoordinateResolution, CoordinateSource, GeoPoint};
pub use error::{RodaError, RodaResult};
pub use geocoding::{Geocoder, GeocodingConfig, MapboxGeocoder, NoopGeocoder};
pub use handlers::{AgeBracketsApiDoc, ApiDoc};
pub use models::{
    AgeBracket, CloseRoda, CreateRoda, OrganizerSummary, ParticipantCount, Roda, RodaStatus,
    RodaWithBrackets, RodaWithOrganizer,
};
pub use postgres::PgRodaRepository;
pub use repository::{InMemoryRodaRepository, RodaRepository};
pub use service::{RecomputeReport, RodaService};
pub use stats::RodaStatistics;
