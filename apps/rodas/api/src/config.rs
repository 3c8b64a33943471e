use axum_helpers::JwtConfig;
use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use database::postgres::PostgresConfig;
use domain_rodas::GeocodingConfig;

pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub geocoding: GeocodingConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // DATABASE_URL is required
        let server = ServerConfig::from_env()?; // HOST=0.0.0.0, PORT=8080
        let jwt = JwtConfig::from_env()?; // JWT_SECRET is required
        let geocoding = GeocodingConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            database,
            server,
            jwt,
            geocoding,
            environment,
        })
    }
}
