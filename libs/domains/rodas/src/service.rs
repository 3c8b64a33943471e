use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;
use validator::Validate;

use crate::coordinates::{self, GeoPoint};
use crate::error::{REQUIRED_FIELDS_MESSAGE, RodaError, RodaResult};
use crate::geocoding::{AddressQuery, Geocoder};
use crate::models::{
    AgeBracket, CloseRoda, CreateRoda, Finalization, NewRoda, Roda, RodaStatus,
    RodaWithBrackets, RodaWithOrganizer,
};
use crate::repository::RodaRepository;
use crate::schedule;
use crate::stats::{self, RodaStatistics};

pub const EMPTY_BRACKETS_MESSAGE: &str = "Selecione pelo menos uma faixa etária";
pub const INVALID_ID_MESSAGE: &str = "ID da roda inválido";

/// Counts reported by [`RodaService::recompute_coordinates`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecomputeReport {
    pub updated: usize,
    pub not_found: usize,
}

/// Roda lifecycle: creation with coordinate resolution, closure, listings
/// and statistics. Independent of HTTP; handlers only translate.
pub struct RodaService<R: RodaRepository> {
    repository: Arc<R>,
    geocoder: Arc<dyn Geocoder>,
}

impl<R: RodaRepository> Clone for RodaService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            geocoder: Arc::clone(&self.geocoder),
        }
    }
}

fn required(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_roda_id(raw: &str) -> RodaResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| RodaError::Validation(INVALID_ID_MESSAGE.to_string()))
}

impl<R: RodaRepository> RodaService<R> {
    pub fn new(repository: R, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            repository: Arc::new(repository),
            geocoder,
        }
    }

    /// Validate the form, resolve coordinates and store an active roda owned
    /// by `organizer_id`.
    pub async fn create_roda(
        &self,
        organizer_id: Uuid,
        input: CreateRoda,
    ) -> RodaResult<RodaWithOrganizer> {
        input
            .validate()
            .map_err(|e| RodaError::Validation(e.to_string()))?;

        let (
            Some(theme),
            Some(date),
            Some(start_time),
            Some(municipality),
            Some(address),
            Some(target_audience),
        ) = (
            required(input.theme),
            required(input.date),
            required(input.start_time),
            required(input.municipality),
            required(input.address),
            required(input.target_audience),
        )
        else {
            return Err(RodaError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
        };

        let (date, start_time) = schedule::assemble(&date, &start_time)?;
        let expected_participants = match &input.expected_participants {
            Some(count) => count.parse()?,
            None => None,
        };

        let resolution = coordinates::resolve(
            self.geocoder.as_ref(),
            input.latitude,
            input.longitude,
            &address,
            &municipality,
        )
        .await;
        tracing::info!(
            %organizer_id,
            %municipality,
            source = ?resolution.source,
            "Resolved roda coordinates"
        );

        self.repository
            .create(NewRoda {
                organizer_id,
                theme,
                date,
                start_time,
                municipality,
                address,
                target_audience,
                expected_participants,
                latitude: resolution.latitude,
                longitude: resolution.longitude,
            })
            .await
    }

    /// Public map listing: every active roda, without owner contact details.
    pub async fn list_active(&self) -> RodaResult<Vec<RodaWithOrganizer>> {
        let rodas = self.repository.list_active().await?;
        Ok(rodas
            .into_iter()
            .map(|r| RodaWithOrganizer {
                organizer: r.organizer.public(),
                roda: r.roda,
            })
            .collect())
    }

    /// The caller's active rodas.
    pub async fn list_mine(&self, organizer_id: Uuid) -> RodaResult<Vec<Roda>> {
        self.repository
            .list_by_organizer(organizer_id, RodaStatus::Active)
            .await
    }

    /// The caller's finalized rodas with their age brackets, latest first.
    pub async fn history(&self, organizer_id: Uuid) -> RodaResult<Vec<RodaWithBrackets>> {
        self.repository
            .list_finalized_with_brackets(organizer_id)
            .await
    }

    pub async fn statistics(&self, organizer_id: Uuid) -> RodaResult<RodaStatistics> {
        let finalized = self
            .repository
            .list_finalized_with_brackets(organizer_id)
            .await?;
        Ok(stats::aggregate(&finalized))
    }

    /// Close a roda owned by the caller.
    ///
    /// Input errors are reported before any read. Missing and foreign rodas
    /// both yield the same `Forbidden` so non-owners cannot probe ids.
    pub async fn close_roda(
        &self,
        organizer_id: Uuid,
        roda_id: &str,
        input: CloseRoda,
    ) -> RodaResult<RodaWithBrackets> {
        let id = parse_roda_id(roda_id)?;

        if input.age_bracket_ids.is_empty() {
            return Err(RodaError::Validation(EMPTY_BRACKETS_MESSAGE.to_string()));
        }
        input
            .validate()
            .map_err(|e| RodaError::Validation(e.to_string()))?;

        let roda = self
            .repository
            .find_by_id(id)
            .await?
            .filter(|r| r.organizer_id == organizer_id)
            .ok_or_else(|| RodaError::Forbidden(crate::error::FORBIDDEN_CLOSE_MESSAGE.to_string()))?;

        if !roda.is_active() {
            return Err(RodaError::AlreadyFinalized(id));
        }

        let age_bracket_ids: BTreeSet<i32> = input.age_bracket_ids.into_iter().collect();
        let closure = Finalization {
            attendance_photo_url: input.attendance_photo,
            circle_photo_url: input.circle_photo,
            summary: input.summary,
            age_bracket_ids: age_bracket_ids.into_iter().collect(),
        };

        self.repository.finalize(id, organizer_id, closure).await
    }

    pub async fn list_age_brackets(&self) -> RodaResult<Vec<AgeBracket>> {
        self.repository.list_age_brackets().await
    }

    /// Re-geocode every active roda, pausing `pause` between lookups.
    /// Rodas the geocoder cannot place keep their coordinates.
    pub async fn recompute_coordinates(&self, pause: Duration) -> RodaResult<RecomputeReport> {
        let rodas = self.repository.list_active().await?;
        let mut report = RecomputeReport::default();

        for (index, entry) in rodas.iter().enumerate() {
            if index > 0 && !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }

            let roda = &entry.roda;
            let Some(municipality) = roda.municipality.as_deref() else {
                report.not_found += 1;
                continue;
            };

            let query = AddressQuery::new(&roda.address, municipality);
            match self.geocoder.resolve(&query).await {
                Some(found) => {
                    let point = GeoPoint::new(found.latitude, found.longitude);
                    if self.repository.update_coordinates(roda.id, point).await? {
                        tracing::info!(roda_id = %roda.id, "Updated roda coordinates");
                        report.updated += 1;
                    }
                }
                None => {
                    tracing::warn!(roda_id = %roda.id, %municipality, "No coordinates found");
                    report.not_found += 1;
                }
            }
        }

        Ok(report)
    }
}
