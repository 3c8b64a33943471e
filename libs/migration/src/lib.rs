pub use sea_orm_migration::prelude::*;

mod m20260301_000000_create_organizers;
mod m20260301_000001_create_rodas;
mod m20260301_000002_create_age_brackets;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000000_create_organizers::Migration),
            Box::new(m20260301_000001_create_rodas::Migration),
            Box::new(m20260301_000002_create_age_brackets::Migration),
        ]
    }
}
