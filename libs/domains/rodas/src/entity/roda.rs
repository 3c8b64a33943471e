use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::{NewRoda, Roda, RodaStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rodas")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub theme: String,
    pub date: Date,
    pub start_time: DateTime,
    pub municipality: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    #[sea_orm(column_type = "Text")]
    pub target_audience: String,
    pub expected_participants: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: RodaStatus,
    #[sea_orm(column_type = "Text", nullable)]
    pub attendance_photo_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub circle_photo_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub summary: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organizer::Entity",
        from = "Column::OrganizerId",
        to = "super::organizer::Column::Id",
        on_delete = "Cascade"
    )]
    Organizer,
    #[sea_orm(has_many = "super::roda_age_bracket::Entity")]
    RodaAgeBracket,
}

impl Related<super::organizer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organizer.def()
    }
}

impl Related<super::roda_age_bracket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RodaAgeBracket.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Roda {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            organizer_id: model.organizer_id,
            theme: model.theme,
            date: model.date,
            start_time: model.start_time,
            municipality: model.municipality,
            address: model.address,
            target_audience: model.target_audience,
            expected_participants: model.expected_participants,
            latitude: model.latitude,
            longitude: model.longitude,
            status: model.status,
            attendance_photo_url: model.attendance_photo_url,
            circle_photo_url: model.circle_photo_url,
            summary: model.summary,
            created_at: model.created_at.into(),
        }
    }
}

impl From<NewRoda> for ActiveModel {
    fn from(input: NewRoda) -> Self {
        ActiveModel {
            id: Set(Uuid::now_v7()),
            organizer_id: Set(input.organizer_id),
            theme: Set(input.theme),
            date: Set(input.date),
            start_time: Set(input.start_time),
            municipality: Set(Some(input.municipality)),
            address: Set(input.address),
            target_audience: Set(input.target_audience),
            expected_participants: Set(input.expected_participants),
            latitude: Set(input.latitude),
            longitude: Set(input.longitude),
            status: Set(RodaStatus::Active),
            attendance_photo_url: Set(None),
            circle_photo_url: Set(None),
            summary: Set(None),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}
