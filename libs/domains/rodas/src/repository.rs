use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::coordinates::GeoPoint;
use crate::error::{RodaError, RodaResult};
use crate::models::{
    AgeBracket, DEFAULT_AGE_BRACKETS, Finalization, NewRoda, OrganizerSummary, Roda,
    RodaStatus, RodaWithBrackets, RodaWithOrganizer,
};

/// Storage for rodas and their age-bracket links.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RodaRepository: Send + Sync {
    /// Insert an `active` roda and return it with its owner.
    async fn create(&self, input: NewRoda) -> RodaResult<RodaWithOrganizer>;

    async fn find_by_id(&self, id: Uuid) -> RodaResult<Option<Roda>>;

    /// Every active roda, earliest date first.
    async fn list_active(&self) -> RodaResult<Vec<RodaWithOrganizer>>;

    /// Rodas of one organizer in one status, earliest date first.
    async fn list_by_organizer(
        &self,
        organizer_id: Uuid,
        status: RodaStatus,
    ) -> RodaResult<Vec<Roda>>;

    /// Finalized rodas of one organizer with their brackets, latest date first.
    async fn list_finalized_with_brackets(
        &self,
        organizer_id: Uuid,
    ) -> RodaResult<Vec<RodaWithBrackets>>;

    /// Atomically move an active roda owned by `organizer_id` to `finalized`
    /// and link its brackets. Nothing is written when any step fails.
    async fn finalize(
        &self,
        id: Uuid,
        organizer_id: Uuid,
        closure: Finalization,
    ) -> RodaResult<RodaWithBrackets>;

    async fn list_age_brackets(&self) -> RodaResult<Vec<AgeBracket>>;

    /// Overwrite the coordinates of an active roda. Returns false when no
    /// active roda has this id.
    async fn update_coordinates(&self, id: Uuid, point: GeoPoint) -> RodaResult<bool>;
}

#[derive(Debug, Default)]
struct Store {
    rodas: HashMap<Uuid, Roda>,
    links: BTreeSet<(Uuid, i32)>,
    organizers: HashMap<Uuid, OrganizerSummary>,
}

impl Store {
    fn brackets_of(&self, roda_id: Uuid, brackets: &[AgeBracket]) -> Vec<AgeBracket> {
        self.links
            .range((roda_id, i32::MIN)..=(roda_id, i32::MAX))
            .filter_map(|(_, bracket_id)| brackets.iter().find(|b| b.id == *bracket_id).cloned())
            .collect()
    }
}

/// In-memory implementation of RodaRepository (for development/testing).
///
/// Organizers must be registered with [`insert_organizer`](Self::insert_organizer)
/// before they can own rodas, mirroring the foreign key of the real schema.
#[derive(Debug, Clone)]
pub struct InMemoryRodaRepository {
    store: Arc<RwLock<Store>>,
    age_brackets: Arc<Vec<AgeBracket>>,
}

impl Default for InMemoryRodaRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRodaRepository {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::default())),
            age_brackets: Arc::new(
                DEFAULT_AGE_BRACKETS
                    .iter()
                    .map(|(id, name)| AgeBracket {
                        id: *id,
                        name: name.to_string(),
                    })
                    .collect(),
            ),
        }
    }

    pub async fn insert_organizer(&self, organizer: OrganizerSummary) {
        let mut store = self.store.write().await;
        store.organizers.insert(organizer.id, organizer);
    }

    /// Bracket links of a roda, for assertions in tests.
    pub async fn links_of(&self, roda_id: Uuid) -> Vec<i32> {
        let store = self.store.read().await;
        store
            .links
            .iter()
            .filter(|(id, _)| *id == roda_id)
            .map(|(_, bracket)| *bracket)
            .collect()
    }
}

#[async_trait]
impl RodaRepository for InMemoryRodaRepository {
    async fn create(&self, input: NewRoda) -> RodaResult<RodaWithOrganizer> {
        let mut store = self.store.write().await;

        let organizer = store
            .organizers
            .get(&input.organizer_id)
            .cloned()
            .ok_or(RodaError::OrganizerNotFound(input.organizer_id))?;

        let roda = Roda {
            id: Uuid::now_v7(),
            organizer_id: input.organizer_id,
            theme: input.theme,
            date: input.date,
            start_time: input.start_time,
            municipality: Some(input.municipality),
            address: input.address,
            target_audience: input.target_audience,
            expected_participants: input.expected_participants,
            latitude: input.latitude,
            longitude: input.longitude,
            status: RodaStatus::Active,
            attendance_photo_url: None,
            circle_photo_url: None,
            summary: None,
            created_at: chrono::Utc::now(),
        };

        if store.rodas.contains_key(&roda.id) {
            return Err(RodaError::DuplicateRoda);
        }
        store.rodas.insert(roda.id, roda.clone());

        tracing::info!(roda_id = %roda.id, "Created roda");
        Ok(RodaWithOrganizer { roda, organizer })
    }

    async fn find_by_id(&self, id: Uuid) -> RodaResult<Option<Roda>> {
        let store = self.store.read().await;
        Ok(store.rodas.get(&id).cloned())
    }

    async fn list_active(&self) -> RodaResult<Vec<RodaWithOrganizer>> {
        let store = self.store.read().await;

        let mut result: Vec<RodaWithOrganizer> = store
            .rodas
            .values()
            .filter(|r| r.is_active())
            .filter_map(|r| {
                let organizer = store.organizers.get(&r.organizer_id)?.clone();
                Some(RodaWithOrganizer {
                    roda: r.clone(),
                    organizer,
                })
            })
            .collect();

        result.sort_by_key(|r| (r.roda.date, r.roda.start_time));
        Ok(result)
    }

    async fn list_by_organizer(
        &self,
        organizer_id: Uuid,
        status: RodaStatus,
    ) -> RodaResult<Vec<Roda>> {
        let store = self.store.read().await;

        let mut result: Vec<Roda> = store
            .rodas
            .values()
            .filter(|r| r.organizer_id == organizer_id && r.status == status)
            .cloned()
            .collect();

        result.sort_by_key(|r| (r.date, r.start_time));
        Ok(result)
    }

    async fn list_finalized_with_brackets(
        &self,
        organizer_id: Uuid,
    ) -> RodaResult<Vec<RodaWithBrackets>> {
        let store = self.store.read().await;

        let mut result: Vec<RodaWithBrackets> = store
            .rodas
            .values()
            .filter(|r| r.organizer_id == organizer_id && r.status == RodaStatus::Finalized)
            .map(|r| RodaWithBrackets {
                roda: r.clone(),
                age_brackets: store.brackets_of(r.id, &self.age_brackets),
            })
            .collect();

        result.sort_by(|a, b| (b.roda.date, b.roda.start_time).cmp(&(a.roda.date, a.roda.start_time)));
        Ok(result)
    }

    async fn finalize(
        &self,
        id: Uuid,
        organizer_id: Uuid,
        closure: Finalization,
    ) -> RodaResult<RodaWithBrackets> {
        let mut store = self.store.write().await;

        let roda = store
            .rodas
            .get(&id)
            .filter(|r| r.organizer_id == organizer_id)
            .ok_or_else(|| RodaError::Forbidden(crate::error::FORBIDDEN_CLOSE_MESSAGE.to_string()))?;

        if !roda.is_active() {
            return Err(RodaError::AlreadyFinalized(id));
        }

        // Validate every link before touching anything.
        if let Some(unknown) = closure
            .age_bracket_ids
            .iter()
            .find(|bracket| !self.age_brackets.iter().any(|b| b.id == **bracket))
        {
            return Err(RodaError::Persistence(format!(
                "age bracket {unknown} does not exist"
            )));
        }

        let Some(roda) = store.rodas.get_mut(&id) else {
            return Err(RodaError::Forbidden(crate::error::FORBIDDEN_CLOSE_MESSAGE.to_string()));
        };
        roda.status = RodaStatus::Finalized;
        roda.attendance_photo_url = closure.attendance_photo_url;
        roda.circle_photo_url = closure.circle_photo_url;
        roda.summary = closure.summary;
        let roda = roda.clone();

        for bracket in closure.age_bracket_ids {
            store.links.insert((id, bracket));
        }

        tracing::info!(roda_id = %id, "Finalized roda");
        Ok(RodaWithBrackets {
            age_brackets: store.brackets_of(id, &self.age_brackets),
            roda,
        })
    }

    async fn list_age_brackets(&self) -> RodaResult<Vec<AgeBracket>> {
        Ok(self.age_brackets.as_ref().clone())
    }

    async fn update_coordinates(&self, id: Uuid, point: GeoPoint) -> RodaResult<bool> {
        let mut store = self.store.write().await;

        match store.rodas.get_mut(&id).filter(|r| r.is_active()) {
            Some(roda) => {
                roda.latitude = Some(point.latitude);
                roda.longitude = Some(point.longitude);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
