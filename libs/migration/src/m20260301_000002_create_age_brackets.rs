use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260301_000001_create_rodas::Rodas;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Fixed reference set; ids are part of the public API.
const AGE_BRACKETS: [(i32, &str); 5] = [
    (1, "0-12"),
    (2, "13-17"),
    (3, "18-29"),
    (4, "30-59"),
    (5, "60+"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AgeBrackets::Table)
                    .if_not_exists()
                    .col(integer(AgeBrackets::Id).primary_key())
                    .col(string(AgeBrackets::Name).unique_key())
                    .to_owned(),
            )
            .await?;

        let values = AGE_BRACKETS
            .iter()
            .map(|(id, name)| format!("({id}, '{name}')"))
            .collect::<Vec<_>>()
            .join(", ");
        manager
            .get_connection()
            .execute_unprepared(&format!(
                "INSERT INTO age_brackets (id, name) VALUES {values} ON CONFLICT (id) DO NOTHING"
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RodaAgeBrackets::Table)
                    .if_not_exists()
                    .col(uuid(RodaAgeBrackets::RodaId))
                    .col(integer(RodaAgeBrackets::AgeBracketId))
                    .primary_key(
                        Index::create()
                            .col(RodaAgeBrackets::RodaId)
                            .col(RodaAgeBrackets::AgeBracketId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_roda_age_brackets_roda")
                            .from(RodaAgeBrackets::Table, RodaAgeBrackets::RodaId)
                            .to(Rodas::Table, Rodas::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_roda_age_brackets_bracket")
                            .from(RodaAgeBrackets::Table, RodaAgeBrackets::AgeBracketId)
                            .to(AgeBrackets::Table, AgeBrackets::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RodaAgeBrackets::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AgeBrackets::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AgeBrackets {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum RodaAgeBrackets {
    Table,
    RodaId,
    AgeBracketId,
}
