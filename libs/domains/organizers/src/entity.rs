use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::{NewOrganizer, Organizer};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "organizers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub cpf: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(column_type = "Text")]
    pub password_hash: String,
    pub gender: Option<String>,
    pub state: String,
    pub municipality: String,
    pub profession: String,
    pub phone: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Organizer {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            cpf: model.cpf,
            email: model.email,
            password_hash: model.password_hash,
            gender: model.gender,
            state: model.state,
            municipality: model.municipality,
            profession: model.profession,
            phone: model.phone,
            created_at: model.created_at.into(),
        }
    }
}

impl From<NewOrganizer> for ActiveModel {
    fn from(input: NewOrganizer) -> Self {
        ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            cpf: Set(input.cpf),
            email: Set(input.email.trim().to_lowercase()),
            password_hash: Set(input.password_hash),
            gender: Set(input.gender),
            state: Set(input.state),
            municipality: Set(input.municipality),
            profession: Set(input.profession),
            phone: Set(input.phone),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}
