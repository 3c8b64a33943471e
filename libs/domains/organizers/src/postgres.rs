use async_trait::async_trait;
use database::postgres::{ConstraintViolation, constraint_violation};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entity::{self, Entity as OrganizerEntity};
use crate::error::{OrganizerError, OrganizerResult};
use crate::models::{NewOrganizer, Organizer};
use crate::repository::OrganizerRepository;

/// PostgreSQL implementation of OrganizerRepository using SeaORM
#[derive(Clone)]
pub struct PgOrganizerRepository {
    db: DatabaseConnection,
}

impl PgOrganizerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Map a failed insert to the column whose unique constraint fired.
fn classify_insert_error(err: DbErr) -> OrganizerError {
    match constraint_violation(&err) {
        Some(ConstraintViolation::Unique(detail)) if detail.contains("cpf") => {
            OrganizerError::DuplicateCpf
        }
        Some(ConstraintViolation::Unique(detail)) if detail.contains("email") => {
            OrganizerError::DuplicateEmail
        }
        _ => OrganizerError::Persistence(err.to_string()),
    }
}

#[async_trait]
impl OrganizerRepository for PgOrganizerRepository {
    async fn create(&self, input: NewOrganizer) -> OrganizerResult<Organizer> {
        let model: entity::ActiveModel = input.into();
        let inserted = model.insert(&self.db).await.map_err(classify_insert_error)?;

        tracing::info!(organizer_id = %inserted.id, "Organizer registered");
        Ok(inserted.into())
    }

    async fn find_by_id(&self, id: Uuid) -> OrganizerResult<Option<Organizer>> {
        let found = OrganizerEntity::find_by_id(id).one(&self.db).await?;
        Ok(found.map(Into::into))
    }

    async fn find_by_cpf(&self, cpf: &str) -> OrganizerResult<Option<Organizer>> {
        let found = OrganizerEntity::find()
            .filter(entity::Column::Cpf.eq(cpf))
            .one(&self.db)
            .await?;
        Ok(found.map(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_insert_error() {
        let cpf = DbErr::Custom(
            "duplicate key value violates unique constraint \"organizers_cpf_key\"".into(),
        );
        assert!(matches!(classify_insert_error(cpf), OrganizerError::DuplicateCpf));

        let email = DbErr::Custom(
            "duplicate key value violates unique constraint \"organizers_email_key\"".into(),
        );
        assert!(matches!(classify_insert_error(email), OrganizerError::DuplicateEmail));

        let other = DbErr::Custom("connection reset".into());
        assert!(matches!(classify_insert_error(other), OrganizerError::Persistence(_)));
    }
}
