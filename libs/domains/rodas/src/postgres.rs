use async_trait::async_trait;
use database::postgres::{ConstraintViolation, constraint_violation};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    coordinates::GeoPoint,
    entity::{age_bracket, organizer, roda, roda_age_bracket},
    error::{FORBIDDEN_CLOSE_MESSAGE, RodaError, RodaResult},
    models::{
        AgeBracket, Finalization, NewRoda, Roda, RodaStatus, RodaWithBrackets, RodaWithOrganizer,
    },
    repository::RodaRepository,
};

#[derive(Clone)]
pub struct PgRodaRepository {
    db: DatabaseConnection,
}

impl PgRodaRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn classify_insert_error(err: DbErr, organizer_id: Uuid) -> RodaError {
    match constraint_violation(&err) {
        Some(ConstraintViolation::Unique(detail)) => {
            tracing::warn!(%detail, "Duplicate roda rejected");
            RodaError::DuplicateRoda
        }
        Some(ConstraintViolation::ForeignKey(_)) => RodaError::OrganizerNotFound(organizer_id),
        None => RodaError::Persistence(err.to_string()),
    }
}

/// Bracket names per roda, ascending by bracket id.
async fn brackets_for<C: ConnectionTrait>(
    conn: &C,
    roda_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<AgeBracket>>, DbErr> {
    let mut by_roda: HashMap<Uuid, Vec<AgeBracket>> = HashMap::new();
    if roda_ids.is_empty() {
        return Ok(by_roda);
    }

    let rows = roda_age_bracket::Entity::find()
        .filter(roda_age_bracket::Column::RodaId.is_in(roda_ids.iter().copied()))
        .order_by_asc(roda_age_bracket::Column::AgeBracketId)
        .find_also_related(age_bracket::Entity)
        .all(conn)
        .await?;

    for (link, bracket) in rows {
        if let Some(bracket) = bracket {
            by_roda.entry(link.roda_id).or_default().push(bracket.into());
        }
    }
    Ok(by_roda)
}

/// Closure steps inside one transaction. The caller commits on `Ok` and
/// rolls back on `Err`.
async fn finalize_in(
    txn: &DatabaseTransaction,
    id: Uuid,
    organizer_id: Uuid,
    closure: Finalization,
) -> RodaResult<RodaWithBrackets> {
    let current = roda::Entity::find_by_id(id)
        .lock_exclusive()
        .one(txn)
        .await?
        .filter(|r| r.organizer_id == organizer_id)
        .ok_or_else(|| RodaError::Forbidden(FORBIDDEN_CLOSE_MESSAGE.to_string()))?;

    if current.status != RodaStatus::Active {
        return Err(RodaError::AlreadyFinalized(id));
    }

    let result = roda::Entity::update_many()
        .col_expr(roda::Column::Status, RodaStatus::Finalized.as_enum())
        .col_expr(
            roda::Column::AttendancePhotoUrl,
            Expr::value(closure.attendance_photo_url),
        )
        .col_expr(roda::Column::CirclePhotoUrl, Expr::value(closure.circle_photo_url))
        .col_expr(roda::Column::Summary, Expr::value(closure.summary))
        .filter(roda::Column::Id.eq(id))
        .filter(roda::Column::OrganizerId.eq(organizer_id))
        .filter(roda::Column::Status.eq(RodaStatus::Active))
        .exec(txn)
        .await?;

    if result.rows_affected == 0 {
        return Err(RodaError::AlreadyFinalized(id));
    }

    let links = closure
        .age_bracket_ids
        .iter()
        .map(|bracket| roda_age_bracket::ActiveModel::link(id, *bracket));
    roda_age_bracket::Entity::insert_many(links)
        .exec(txn)
        .await
        .map_err(|e| {
            tracing::warn!(roda_id = %id, error = %e, "Linking age brackets failed");
            RodaError::Persistence(e.to_string())
        })?;

    let updated = roda::Entity::find_by_id(id)
        .one(txn)
        .await?
        .ok_or_else(|| RodaError::Persistence(format!("roda {id} vanished during closure")))?;
    let age_brackets = brackets_for(txn, &[id]).await?.remove(&id).unwrap_or_default();

    Ok(RodaWithBrackets {
        roda: updated.into(),
        age_brackets,
    })
}

#[async_trait]
impl RodaRepository for PgRodaRepository {
    async fn create(&self, input: NewRoda) -> RodaResult<RodaWithOrganizer> {
        let organizer_id = input.organizer_id;
        let active_model: roda::ActiveModel = input.into();

        let model = roda::Entity::insert(active_model)
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| classify_insert_error(e, organizer_id))?;

        let organizer = organizer::Entity::find_by_id(organizer_id)
            .one(&self.db)
            .await?
            .ok_or(RodaError::OrganizerNotFound(organizer_id))?;

        tracing::info!(roda_id = %model.id, %organizer_id, "Created roda");
        Ok(RodaWithOrganizer {
            roda: model.into(),
            organizer: organizer.into(),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> RodaResult<Option<Roda>> {
        let model = roda::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn list_active(&self) -> RodaResult<Vec<RodaWithOrganizer>> {
        let rows = roda::Entity::find()
            .filter(roda::Column::Status.eq(RodaStatus::Active))
            .order_by_asc(roda::Column::Date)
            .order_by_asc(roda::Column::StartTime)
            .find_also_related(organizer::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(roda, organizer)| {
                Some(RodaWithOrganizer {
                    roda: roda.into(),
                    organizer: organizer?.into(),
                })
            })
            .collect())
    }

    async fn list_by_organizer(
        &self,
        organizer_id: Uuid,
        status: RodaStatus,
    ) -> RodaResult<Vec<Roda>> {
        let models = roda::Entity::find()
            .filter(roda::Column::OrganizerId.eq(organizer_id))
            .filter(roda::Column::Status.eq(status))
            .order_by_asc(roda::Column::Date)
            .order_by_asc(roda::Column::StartTime)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_finalized_with_brackets(
        &self,
        organizer_id: Uuid,
    ) -> RodaResult<Vec<RodaWithBrackets>> {
        let models = roda::Entity::find()
            .filter(roda::Column::OrganizerId.eq(organizer_id))
            .filter(roda::Column::Status.eq(RodaStatus::Finalized))
            .order_by_desc(roda::Column::Date)
            .order_by_desc(roda::Column::StartTime)
            .all(&self.db)
            .await?;

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let mut brackets = brackets_for(&self.db, &ids).await?;

        Ok(models
            .into_iter()
            .map(|model| RodaWithBrackets {
                age_brackets: brackets.remove(&model.id).unwrap_or_default(),
                roda: model.into(),
            })
            .collect())
    }

    async fn finalize(
        &self,
        id: Uuid,
        organizer_id: Uuid,
        closure: Finalization,
    ) -> RodaResult<RodaWithBrackets> {
        let txn = self.db.begin().await?;

        match finalize_in(&txn, id, organizer_id, closure).await {
            Ok(closed) => {
                txn.commit().await?;
                tracing::info!(roda_id = %id, %organizer_id, "Finalized roda");
                Ok(closed)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!(roda_id = %id, error = %rollback_err, "Rollback after failed closure failed");
                }
                Err(e)
            }
        }
    }

    async fn list_age_brackets(&self) -> RodaResult<Vec<AgeBracket>> {
        let models = age_bracket::Entity::find()
            .order_by_asc(age_bracket::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update_coordinates(&self, id: Uuid, point: GeoPoint) -> RodaResult<bool> {
        let result = roda::Entity::update_many()
            .col_expr(roda::Column::Latitude, Expr::value(point.latitude))
            .col_expr(roda::Column::Longitude, Expr::value(point.longitude))
            .filter(roda::Column::Id.eq(id))
            .filter(roda::Column::Status.eq(RodaStatus::Active))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
