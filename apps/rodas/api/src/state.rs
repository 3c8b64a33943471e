//! Application state management.
//!
//! Built once in `main` and handed to the router builders and the
//! maintenance commands. Cloning is cheap: the connection pool, JWT keys and
//! geocoder are all reference-counted.

use axum_helpers::JwtAuth;
use domain_organizers::{OrganizerService, PgOrganizerRepository};
use domain_rodas::{
    Geocoder, MapboxGeocoder, NoopGeocoder, PgRodaRepository, RodaService,
};
use std::sync::Arc;
use tracing::info;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: Config,
    /// PostgreSQL database connection pool
    pub db: database::postgres::DatabaseConnection,
    pub jwt_auth: JwtAuth,
    pub geocoder: Arc<dyn Geocoder>,
}

impl AppState {
    pub fn new(config: Config, db: database::postgres::DatabaseConnection) -> eyre::Result<Self> {
        let jwt_auth = JwtAuth::new(&config.jwt);

        let geocoder: Arc<dyn Geocoder> = if config.geocoding.enabled {
            info!(base_url = %config.geocoding.base_url, "Geocoding enabled");
            Arc::new(MapboxGeocoder::new(&config.geocoding)?)
        } else {
            info!("Geocoding disabled, falling back to the municipality table");
            Arc::new(NoopGeocoder)
        };

        Ok(Self {
            config,
            db,
            jwt_auth,
            geocoder,
        })
    }

    pub fn roda_service(&self) -> RodaService<PgRodaRepository> {
        RodaService::new(PgRodaRepository::new(self.db.clone()), self.geocoder.clone())
    }

    pub fn organizer_service(&self) -> OrganizerService<PgOrganizerRepository> {
        OrganizerService::new(
            PgOrganizerRepository::new(self.db.clone()),
            self.jwt_auth.clone(),
        )
    }
}
