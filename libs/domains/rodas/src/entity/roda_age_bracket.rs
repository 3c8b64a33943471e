use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "roda_age_brackets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub roda_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub age_bracket_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::roda::Entity",
        from = "Column::RodaId",
        to = "super::roda::Column::Id",
        on_delete = "Cascade"
    )]
    Roda,
    #[sea_orm(
        belongs_to = "super::age_bracket::Entity",
        from = "Column::AgeBracketId",
        to = "super::age_bracket::Column::Id"
    )]
    AgeBracket,
}

impl Related<super::roda::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Roda.def()
    }
}

impl Related<super::age_bracket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AgeBracket.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub fn link(roda_id: Uuid, age_bracket_id: i32) -> Self {
        Self {
            roda_id: Set(roda_id),
            age_bracket_id: Set(age_bracket_id),
        }
    }
}
