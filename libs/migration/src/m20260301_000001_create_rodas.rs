use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260301_000000_create_organizers::Organizers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(RodaStatus::Enum)
                    .values([RodaStatus::Active, RodaStatus::Finalized])
                    .to_owned(),
            )
            .await?;

        // `date` and `start_time` are wall-clock values; no time zone on purpose.
        manager
            .create_table(
                Table::create()
                    .table(Rodas::Table)
                    .if_not_exists()
                    .col(pk_uuid(Rodas::Id))
                    .col(uuid(Rodas::OrganizerId))
                    .col(string(Rodas::Theme))
                    .col(date(Rodas::Date))
                    .col(timestamp(Rodas::StartTime))
                    .col(string_null(Rodas::Municipality))
                    .col(text(Rodas::Address))
                    .col(text(Rodas::TargetAudience))
                    .col(integer_null(Rodas::ExpectedParticipants))
                    .col(double_null(Rodas::Latitude))
                    .col(double_null(Rodas::Longitude))
                    .col(
                        ColumnDef::new(Rodas::Status)
                            .enumeration(RodaStatus::Enum, [RodaStatus::Active, RodaStatus::Finalized])
                            .not_null()
                            .default("active"),
                    )
                    .col(text_null(Rodas::AttendancePhotoUrl))
                    .col(text_null(Rodas::CirclePhotoUrl))
                    .col(text_null(Rodas::Summary))
                    .col(
                        timestamp_with_time_zone(Rodas::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rodas_organizer")
                            .from(Rodas::Table, Rodas::OrganizerId)
                            .to(Organizers::Table, Organizers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rodas_organizer_status")
                    .table(Rodas::Table)
                    .col(Rodas::OrganizerId)
                    .col(Rodas::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rodas_status_date")
                    .table(Rodas::Table)
                    .col(Rodas::Status)
                    .col(Rodas::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rodas::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(RodaStatus::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Rodas {
    Table,
    Id,
    OrganizerId,
    Theme,
    Date,
    StartTime,
    Municipality,
    Address,
    TargetAudience,
    ExpectedParticipants,
    Latitude,
    Longitude,
    Status,
    AttendancePhotoUrl,
    CirclePhotoUrl,
    Summary,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RodaStatus {
    #[sea_orm(iden = "roda_status")]
    Enum,
    #[sea_orm(iden = "active")]
    Active,
    #[sea_orm(iden = "finalized")]
    Finalized,
}
