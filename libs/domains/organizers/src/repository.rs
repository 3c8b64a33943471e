use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{OrganizerError, OrganizerResult};
use crate::models::{NewOrganizer, Organizer};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganizerRepository: Send + Sync {
    /// Fails with `DuplicateCpf` / `DuplicateEmail` when either is taken.
    async fn create(&self, input: NewOrganizer) -> OrganizerResult<Organizer>;

    async fn find_by_id(&self, id: Uuid) -> OrganizerResult<Option<Organizer>>;

    /// `cpf` is already normalized to 11 digits.
    async fn find_by_cpf(&self, cpf: &str) -> OrganizerResult<Option<Organizer>>;
}

/// In-memory implementation of OrganizerRepository (for development/testing)
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrganizerRepository {
    organizers: Arc<RwLock<HashMap<Uuid, Organizer>>>,
}

impl InMemoryOrganizerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrganizerRepository for InMemoryOrganizerRepository {
    async fn create(&self, input: NewOrganizer) -> OrganizerResult<Organizer> {
        let mut organizers = self.organizers.write().await;

        if organizers.values().any(|o| o.cpf == input.cpf) {
            return Err(OrganizerError::DuplicateCpf);
        }
        if organizers
            .values()
            .any(|o| o.email.eq_ignore_ascii_case(&input.email))
        {
            return Err(OrganizerError::DuplicateEmail);
        }

        let organizer = Organizer {
            id: Uuid::now_v7(),
            name: input.name,
            cpf: input.cpf,
            email: input.email,
            password_hash: input.password_hash,
            gender: input.gender,
            state: input.state,
            municipality: input.municipality,
            profession: input.profession,
            phone: input.phone,
            created_at: Utc::now(),
        };
        organizers.insert(organizer.id, organizer.clone());
        Ok(organizer)
    }

    async fn find_by_id(&self, id: Uuid) -> OrganizerResult<Option<Organizer>> {
        let organizers = self.organizers.read().await;
        Ok(organizers.get(&id).cloned())
    }

    async fn find_by_cpf(&self, cpf: &str) -> OrganizerResult<Option<Organizer>> {
        let organizers = self.organizers.read().await;
        Ok(organizers.values().find(|o| o.cpf == cpf).cloned())
    }
}
