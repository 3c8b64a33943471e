//! Fallback coordinates for rodas whose address could not be geocoded.
//!
//! The table holds one city-centre point per supported municipality of Ceará.
//! Points handed out for new rodas are jittered so several rodas in the same
//! municipality do not stack on the exact same map marker.

use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::geocoding::{AddressQuery, Geocoder};

/// Maximum offset, in degrees, added to each axis of a fallback point.
pub const JITTER_DEGREES: f64 = 0.0025;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

const DEFAULT_COORDINATES: &[(&str, GeoPoint)] = &[
    ("Fortaleza", GeoPoint::new(-3.7172, -38.5433)),
    ("Sobral", GeoPoint::new(-3.6861, -40.35)),
    ("Juazeiro do Norte", GeoPoint::new(-7.2131, -39.3151)),
    ("Acaraú", GeoPoint::new(-2.8858, -40.12)),
    ("Aracati", GeoPoint::new(-4.56167, -37.7697)),
    ("Itapipoca", GeoPoint::new(-3.4944, -39.5789)),
    ("Quixadá", GeoPoint::new(-4.9708, -39.015)),
    ("Iguatu", GeoPoint::new(-6.35917, -39.29889)),
    ("Crateús", GeoPoint::new(-5.17833, -40.6775)),
    ("Tianguá", GeoPoint::new(-3.73167, -40.9917)),
    ("Tauá", GeoPoint::new(-6.00389, -40.2925)),
    ("Limoeiro do Norte", GeoPoint::new(-5.14583, -38.0981)),
    ("Canindé", GeoPoint::new(-4.35917, -39.3131)),
    ("Camocim", GeoPoint::new(-2.9022, -40.8411)),
];

/// City-centre point for a municipality, matched by exact name.
pub fn lookup(municipality: &str) -> Option<GeoPoint> {
    let municipality = municipality.trim();
    DEFAULT_COORDINATES
        .iter()
        .find(|(name, _)| *name == municipality)
        .map(|(_, point)| *point)
}

/// Municipalities covered by the fallback table.
pub fn municipalities() -> impl Iterator<Item = &'static str> {
    DEFAULT_COORDINATES.iter().map(|(name, _)| *name)
}

/// Offset each axis independently by a uniform draw in `±JITTER_DEGREES`.
pub fn jittered<R: Rng + ?Sized>(point: GeoPoint, rng: &mut R) -> GeoPoint {
    GeoPoint {
        latitude: point.latitude + rng.random_range(-JITTER_DEGREES..=JITTER_DEGREES),
        longitude: point.longitude + rng.random_range(-JITTER_DEGREES..=JITTER_DEGREES),
    }
}

/// Where the coordinates of a roda came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CoordinateSource {
    Provided,
    Geocoded,
    DefaultWithJitter,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CoordinateResolution {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub source: CoordinateSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl CoordinateResolution {
    fn from_point(point: GeoPoint, source: CoordinateSource, display_name: Option<String>) -> Self {
        Self {
            latitude: Some(point.latitude),
            longitude: Some(point.longitude),
            source,
            display_name,
        }
    }

    fn unresolved() -> Self {
        Self {
            latitude: None,
            longitude: None,
            source: CoordinateSource::None,
            display_name: None,
        }
    }
}

/// Caller-supplied coordinates count only when both are present and non-zero.
pub fn provided_point(latitude: Option<f64>, longitude: Option<f64>) -> Option<GeoPoint> {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0 && lat.is_finite() && lon.is_finite() => {
            Some(GeoPoint::new(lat, lon))
        }
        _ => None,
    }
}

/// Resolve coordinates for a new roda, first match wins:
/// caller-supplied point, geocoder result, jittered table entry, nothing.
pub async fn resolve<G: Geocoder + ?Sized>(
    geocoder: &G,
    latitude: Option<f64>,
    longitude: Option<f64>,
    address: &str,
    municipality: &str,
) -> CoordinateResolution {
    if let Some(point) = provided_point(latitude, longitude) {
        return CoordinateResolution::from_point(point, CoordinateSource::Provided, None);
    }

    let query = AddressQuery::new(address, municipality);
    if let Some(found) = geocoder.resolve(&query).await {
        return CoordinateResolution::from_point(
            GeoPoint::new(found.latitude, found.longitude),
            CoordinateSource::Geocoded,
            found.display_name,
        );
    }

    match lookup(municipality) {
        Some(base) => CoordinateResolution::from_point(
            jittered(base, &mut rand::rng()),
            CoordinateSource::DefaultWithJitter,
            None,
        ),
        None => CoordinateResolution::unresolved(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoding::{GeoMatch, MockGeocoder};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_lookup_known_municipality() {
        let point = lookup("Juazeiro do Norte").unwrap();
        assert_eq!(point, GeoPoint::new(-7.2131, -39.3151));
        assert_eq!(lookup("  Sobral "), Some(GeoPoint::new(-3.6861, -40.35)));
    }

    #[test]
    fn test_lookup_unknown_municipality() {
        assert_eq!(lookup("Recife"), None);
        assert_eq!(lookup("fortaleza"), None);
        assert_eq!(municipalities().count(), 14);
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let base = lookup("Fortaleza").unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1_000 {
            let point = jittered(base, &mut rng);
            assert!((point.latitude - base.latitude).abs() <= JITTER_DEGREES);
            assert!((point.longitude - base.longitude).abs() <= JITTER_DEGREES);
        }
    }

    #[test]
    fn test_jitter_varies_between_draws() {
        let base = lookup("Crateús").unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let first = jittered(base, &mut rng);
        let second = jittered(base, &mut rng);
        assert_ne!(first, second);
    }

    #[test]
    fn test_provided_point_requires_both_non_zero() {
        assert_eq!(provided_point(Some(-3.7), Some(-38.5)), Some(GeoPoint::new(-3.7, -38.5)));
        assert_eq!(provided_point(Some(-3.7), None), None);
        assert_eq!(provided_point(Some(0.0), Some(-38.5)), None);
        assert_eq!(provided_point(None, None), None);
    }

    #[tokio::test]
    async fn test_provided_coordinates_skip_geocoder() {
        let mut geocoder = MockGeocoder::new();
        geocoder.expect_resolve().never();

        let resolution = resolve(&geocoder, Some(-3.75), Some(-38.52), "Rua A", "Fortaleza").await;

        assert_eq!(resolution.source, CoordinateSource::Provided);
        assert_eq!(resolution.latitude, Some(-3.75));
        assert_eq!(resolution.longitude, Some(-38.52));
    }

    #[tokio::test]
    async fn test_geocoded_result_is_used_exactly() {
        let mut geocoder = MockGeocoder::new();
        geocoder
            .expect_resolve()
            .withf(|query| query.address == "Rua Mestre Jerônimo" && query.municipality == "Sobral")
            .times(1)
            .returning(|_| {
                Some(GeoMatch {
                    latitude: -3.6891,
                    longitude: -40.3482,
                    display_name: Some("Rua Mestre Jerônimo, Sobral".to_string()),
                })
            });

        let resolution = resolve(&geocoder, None, None, "Rua Mestre Jerônimo", "Sobral").await;

        assert_eq!(resolution.source, CoordinateSource::Geocoded);
        assert_eq!(resolution.latitude, Some(-3.6891));
        assert_eq!(resolution.longitude, Some(-40.3482));
        assert_eq!(resolution.display_name.as_deref(), Some("Rua Mestre Jerônimo, Sobral"));
    }

    #[tokio::test]
    async fn test_falls_back_to_jittered_default() {
        let mut geocoder = MockGeocoder::new();
        geocoder.expect_resolve().times(1).returning(|_| None);

        let resolution = resolve(&geocoder, Some(0.0), Some(0.0), "Praça", "Tauá").await;

        let base = lookup("Tauá").unwrap();
        assert_eq!(resolution.source, CoordinateSource::DefaultWithJitter);
        assert!((resolution.latitude.unwrap() - base.latitude).abs() <= JITTER_DEGREES);
        assert!((resolution.longitude.unwrap() - base.longitude).abs() <= JITTER_DEGREES);
    }

    #[tokio::test]
    async fn test_unknown_municipality_yields_no_coordinates() {
        let mut geocoder = MockGeocoder::new();
        geocoder.expect_resolve().times(1).returning(|_| None);

        let resolution = resolve(&geocoder, None, None, "Rua B", "Recife").await;

        assert_eq!(resolution.source, CoordinateSource::None);
        assert_eq!(resolution.latitude, None);
        assert_eq!(resolution.longitude, None);
    }
}
