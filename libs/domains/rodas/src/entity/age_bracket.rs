use sea_orm::entity::prelude::*;

use crate::models::AgeBracket;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "age_brackets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::roda_age_bracket::Entity")]
    RodaAgeBracket,
}

impl Related<super::roda_age_bracket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RodaAgeBracket.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for AgeBracket {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}
