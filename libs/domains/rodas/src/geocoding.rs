//! Address lookup against a Mapbox-compatible geocoding API.
//!
//! A failed lookup is never an error for callers: network failures, non-2xx
//! responses, undecodable bodies and empty result sets all come back as `None`.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_optional, env_or_default, env_parse_or_default};
use regex::Regex;
use serde::Deserialize;

pub const DEFAULT_STATE: &str = "CE";
pub const DEFAULT_BASE_URL: &str = "https://api.mapbox.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

static AVENUE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Av\.\s*").expect("valid avenue regex"));
static STREET_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^R\.\s*").expect("valid street regex"));
static MASTER_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Mte\.").expect("valid title regex"));

/// Expand the street abbreviations the provider does not understand.
pub fn expand_abbreviations(address: &str) -> String {
    let address = AVENUE_PREFIX.replace(address.trim(), "Avenida ");
    let address = STREET_PREFIX.replace(&address, "Rua ");
    MASTER_TITLE.replace(&address, "Mestre").into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressQuery {
    pub address: String,
    pub municipality: String,
    pub state: String,
    pub neighborhood: Option<String>,
}

impl AddressQuery {
    pub fn new(address: impl Into<String>, municipality: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            municipality: municipality.into(),
            state: DEFAULT_STATE.to_string(),
            neighborhood: None,
        }
    }

    pub fn with_neighborhood(mut self, neighborhood: impl Into<String>) -> Self {
        self.neighborhood = Some(neighborhood.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    /// `"{address}, {neighborhood}, {municipality}, {state}, Brasil"`
    pub fn search_text(&self) -> String {
        format!(
            "{}, {}, {}, {}, Brasil",
            expand_abbreviations(&self.address),
            self.neighborhood.as_deref().unwrap_or_default(),
            self.municipality,
            self.state
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoMatch {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, query: &AddressQuery) -> Option<GeoMatch>;
}

/// Geocoder used when lookups are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopGeocoder;

#[async_trait]
impl Geocoder for NoopGeocoder {
    async fn resolve(&self, _query: &AddressQuery) -> Option<GeoMatch> {
        None
    }
}

/// Geocoding settings.
///
/// - `GEOCODING_ENABLED` (default `true`)
/// - `GEOCODING_BASE_URL` (default `https://api.mapbox.com`)
/// - `GEOCODING_TIMEOUT_SECS` (default 5)
/// - `MAPBOX_TOKEN` (optional)
#[derive(Clone, Debug)]
pub struct GeocodingConfig {
    pub enabled: bool,
    pub base_url: String,
    pub access_token: Option<String>,
    pub timeout: Duration,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl FromEnv for GeocodingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = env_parse_or_default("GEOCODING_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::ParseError {
                key: "GEOCODING_TIMEOUT_SECS".to_string(),
                details: "must be positive".to_string(),
            });
        }

        Ok(Self {
            enabled: env_parse_or_default("GEOCODING_ENABLED", true)?,
            base_url: env_or_default("GEOCODING_BASE_URL", DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            access_token: env_optional("MAPBOX_TOKEN"),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    /// `[longitude, latitude]`
    center: Vec<f64>,
    place_name: Option<String>,
}

impl Feature {
    fn into_match(self) -> Option<GeoMatch> {
        match self.center[..] {
            [longitude, latitude, ..] => Some(GeoMatch {
                latitude,
                longitude,
                display_name: self.place_name,
            }),
            _ => None,
        }
    }
}

pub struct MapboxGeocoder {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl MapboxGeocoder {
    pub fn new(config: &GeocodingConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        if config.access_token.is_none() {
            tracing::warn!("MAPBOX_TOKEN not set; geocoding requests will likely be rejected");
        }

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone().unwrap_or_default(),
        })
    }

    fn request_url(&self, query: &AddressQuery) -> String {
        format!(
            "{}/geocoding/v5/mapbox.places/{}.json?access_token={}&limit=1&country=br",
            self.base_url,
            urlencoding::encode(&query.search_text()),
            urlencoding::encode(&self.access_token)
        )
    }

    async fn fetch(&self, query: &AddressQuery) -> Result<Option<GeoMatch>, reqwest::Error> {
        let collection: FeatureCollection = self
            .client
            .get(self.request_url(query))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(collection
            .features
            .into_iter()
            .next()
            .and_then(Feature::into_match))
    }
}

#[async_trait]
impl Geocoder for MapboxGeocoder {
    async fn resolve(&self, query: &AddressQuery) -> Option<GeoMatch> {
        match self.fetch(query).await {
            Ok(Some(found)) => {
                tracing::debug!(
                    municipality = %query.municipality,
                    latitude = found.latitude,
                    longitude = found.longitude,
                    "Address geocoded"
                );
                Some(found)
            }
            Ok(None) => {
                tracing::debug!(municipality = %query.municipality, "Geocoder returned no results");
                None
            }
            Err(e) => {
                tracing::warn!(municipality = %query.municipality, error = %e, "Geocoding request failed");
                None
            }
        }
    }
}
