use sea_orm::{DbErr, SqlErr};

/// Constraint failures the domain layer maps to dedicated errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintViolation {
    Unique(String),
    ForeignKey(String),
}

/// Classify a store error as a unique or foreign-key violation.
///
/// Uses the driver error code when SeaORM exposes it and falls back to the
/// PostgreSQL message text for errors that were already stringified.
pub fn constraint_violation(err: &DbErr) -> Option<ConstraintViolation> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            return Some(ConstraintViolation::Unique(detail));
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            return Some(ConstraintViolation::ForeignKey(detail));
        }
        _ => {}
    }

    let message = err.to_string();
    if message.contains("duplicate key") || message.contains("unique constraint") {
        Some(ConstraintViolation::Unique(message))
    } else if message.contains("foreign key constraint") {
        Some(ConstraintViolation::ForeignKey(message))
    } else {
        None
    }
}
