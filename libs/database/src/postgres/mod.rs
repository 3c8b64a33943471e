//! PostgreSQL connection management, migrations, health checks and
//! constraint-violation classification.

mod config;
mod connector;
mod constraint;
mod health;

pub use config::PostgresConfig;
pub use connector::{
    connect, connect_from_config, connect_from_config_with_retry, run_migrations,
};
pub use constraint::{ConstraintViolation, constraint_violation};
pub use health::check_health;

pub use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};
pub use sea_orm_migration::MigratorTrait;
