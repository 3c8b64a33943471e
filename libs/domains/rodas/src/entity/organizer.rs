//! Read-only projection of the `organizers` table: the owner fields shown
//! next to a roda. Rows are written by the organizers domain.

use sea_orm::entity::prelude::*;

use crate::models::OrganizerSummary;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "organizers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub municipality: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::roda::Entity")]
    Roda,
}

impl Related<super::roda::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Roda.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for OrganizerSummary {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: Some(model.email),
            municipality: Some(model.municipality),
        }
    }
}
