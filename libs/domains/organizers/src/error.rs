use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, ErrorCode};
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "CPF ou senha inválidos";

#[derive(Debug, Error)]
pub enum OrganizerError {
    #[error("{0}")]
    Validation(String),

    #[error("CPF already registered")]
    DuplicateCpf,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Organizer {0} not found")]
    NotFound(Uuid),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

pub type OrganizerResult<T> = Result<T, OrganizerError>;

impl From<DbErr> for OrganizerError {
    fn from(err: DbErr) -> Self {
        OrganizerError::Persistence(err.to_string())
    }
}

impl From<OrganizerError> for AppError {
    fn from(err: OrganizerError) -> Self {
        match err {
            OrganizerError::Validation(msg) => AppError::BadRequest(msg),
            OrganizerError::DuplicateCpf => AppError::coded(
                StatusCode::CONFLICT,
                ErrorCode::DuplicateCpf,
                "CPF já cadastrado",
            ),
            OrganizerError::DuplicateEmail => AppError::coded(
                StatusCode::CONFLICT,
                ErrorCode::DuplicateEmail,
                "E-mail já cadastrado",
            ),
            OrganizerError::InvalidCredentials => AppError::coded(
                StatusCode::UNAUTHORIZED,
                ErrorCode::InvalidCredentials,
                INVALID_CREDENTIALS_MESSAGE,
            ),
            OrganizerError::NotFound(_) => AppError::NotFound("Usuário não encontrado".to_string()),
            OrganizerError::PasswordHash(msg) | OrganizerError::Token(msg) => {
                AppError::InternalServerError(msg)
            }
            OrganizerError::Persistence(msg) => AppError::coded(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::PersistenceError,
                msg,
            ),
        }
    }
}

impl IntoResponse for OrganizerError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
