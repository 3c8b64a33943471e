use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, ErrorCode};
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

pub const REQUIRED_FIELDS_MESSAGE: &str =
    "Campos obrigatórios: tema, data, hora_inicio, municipio, local, publico_alvo";
pub const FORBIDDEN_CLOSE_MESSAGE: &str = "Você não tem permissão para encerrar esta roda";

#[derive(Debug, Error)]
pub enum RodaError {
    #[error("{0}")]
    Validation(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(String),

    #[error("Roda already exists")]
    DuplicateRoda,

    #[error("Organizer {0} not found")]
    OrganizerNotFound(Uuid),

    #[error("Roda {0} is already finalized")]
    AlreadyFinalized(Uuid),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

pub type RodaResult<T> = Result<T, RodaError>;

impl From<DbErr> for RodaError {
    fn from(err: DbErr) -> Self {
        RodaError::Persistence(err.to_string())
    }
}

impl From<RodaError> for AppError {
    fn from(err: RodaError) -> Self {
        match err {
            RodaError::Validation(msg) => AppError::BadRequest(msg),
            RodaError::Unauthenticated => {
                AppError::Unauthorized("Token inválido ou expirado".to_string())
            }
            RodaError::Forbidden(msg) => AppError::Forbidden(msg),
            RodaError::DuplicateRoda => AppError::coded(
                StatusCode::CONFLICT,
                ErrorCode::DuplicateRoda,
                "Já existe uma roda com estes dados",
            ),
            RodaError::OrganizerNotFound(id) => AppError::coded(
                StatusCode::NOT_FOUND,
                ErrorCode::OrganizerNotFound,
                format!("Multiplicador {id} não encontrado"),
            ),
            RodaError::AlreadyFinalized(id) => AppError::coded(
                StatusCode::CONFLICT,
                ErrorCode::AlreadyFinalized,
                format!("A roda {id} já foi encerrada"),
            ),
            RodaError::Persistence(msg) => AppError::coded(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::PersistenceError,
                msg,
            ),
        }
    }
}

impl IntoResponse for RodaError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (RodaError::Validation(REQUIRED_FIELDS_MESSAGE.into()), StatusCode::BAD_REQUEST),
            (RodaError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (RodaError::Forbidden(FORBIDDEN_CLOSE_MESSAGE.into()), StatusCode::FORBIDDEN),
            (RodaError::DuplicateRoda, StatusCode::CONFLICT),
            (RodaError::OrganizerNotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (RodaError::AlreadyFinalized(Uuid::nil()), StatusCode::CONFLICT),
            (RodaError::Persistence("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_db_error_becomes_persistence() {
        let err: RodaError = DbErr::Custom("connection closed".into()).into();
        assert!(matches!(err, RodaError::Persistence(msg) if msg.contains("connection closed")));
    }
}
