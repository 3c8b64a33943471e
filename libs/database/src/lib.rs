//! Database connectors and helpers shared by the domain crates.
//!
//! # Features
//!
//! - `postgres` (default) - PostgreSQL through SeaORM
//! - `config` - `core_config::FromEnv` for [`postgres::PostgresConfig`]
//!
//! ```ignore
//! use database::postgres;
//! use migration::Migrator;
//!
//! let config = postgres::PostgresConfig::from_env()?;
//! let db = postgres::connect_from_config_with_retry(config, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "rodas_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
