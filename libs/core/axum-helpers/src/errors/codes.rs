//! Stable error codes returned in every error body.
//!
//! Each code has a client-facing identifier (`as_str`), an integer for logs
//! and dashboards (`code`) and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::DuplicateRoda.as_str(), "DUPLICATE_RODA");
//! assert_eq!(ErrorCode::DuplicateRoda.code(), 3001);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000s)
    ValidationError,
    JsonExtraction,
    NotFound,
    Unauthorized,
    Forbidden,
    Conflict,

    // Server errors (2000s)
    InternalError,
    ServiceUnavailable,
    PersistenceError,

    // Domain errors (3000s)
    DuplicateRoda,
    OrganizerNotFound,
    AlreadyFinalized,
    DuplicateCpf,
    DuplicateEmail,
    InvalidCredentials,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::Conflict => "CONFLICT",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::PersistenceError => "PERSISTENCE_ERROR",
            Self::DuplicateRoda => "DUPLICATE_RODA",
            Self::OrganizerNotFound => "ORGANIZER_NOT_FOUND",
            Self::AlreadyFinalized => "ALREADY_FINALIZED",
            Self::DuplicateCpf => "DUPLICATE_CPF",
            Self::DuplicateEmail => "DUPLICATE_EMAIL",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::Unauthorized => 1006,
            Self::Forbidden => 1007,
            Self::Conflict => 1008,
            Self::InternalError => 2001,
            Self::ServiceUnavailable => 2002,
            Self::PersistenceError => 2003,
            Self::DuplicateRoda => 3001,
            Self::OrganizerNotFound => 3002,
            Self::AlreadyFinalized => 3003,
            Self::DuplicateCpf => 3004,
            Self::DuplicateEmail => 3005,
            Self::InvalidCredentials => 3006,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::Unauthorized => "Authentication required",
            Self::Forbidden => "Access forbidden",
            Self::Conflict => "Resource already exists",
            Self::InternalError => "An internal server error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::PersistenceError => "Failed to persist data",
            Self::DuplicateRoda => "Roda already exists",
            Self::OrganizerNotFound => "Organizer not found",
            Self::AlreadyFinalized => "Roda already finalized",
            Self::DuplicateCpf => "CPF already registered",
            Self::DuplicateEmail => "Email already registered",
            Self::InvalidCredentials => "Invalid credentials",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
