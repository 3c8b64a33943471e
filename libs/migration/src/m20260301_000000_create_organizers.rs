use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Organizers::Table)
                    .if_not_exists()
                    .col(pk_uuid(Organizers::Id))
                    .col(string(Organizers::Name))
                    .col(string_len(Organizers::Cpf, 11).unique_key())
                    .col(string(Organizers::Email).unique_key())
                    .col(text(Organizers::PasswordHash))
                    .col(string_null(Organizers::Gender))
                    .col(string_len(Organizers::State, 2))
                    .col(string(Organizers::Municipality))
                    .col(string(Organizers::Profession))
                    .col(string(Organizers::Phone))
                    .col(
                        timestamp_with_time_zone(Organizers::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_organizers_municipality")
                    .table(Organizers::Table)
                    .col(Organizers::Municipality)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Organizers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Organizers {
    Table,
    Id,
    Name,
    Cpf,
    Email,
    PasswordHash,
    Gender,
    State,
    Municipality,
    Profession,
    Phone,
    CreatedAt,
}
