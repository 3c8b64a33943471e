use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{OrganizerError, OrganizerResult};

pub const CPF_LENGTH: usize = 11;

/// Registered organizer ("multiplicador").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organizer {
    pub id: Uuid,
    pub name: String,
    pub cpf: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub gender: Option<String>,
    pub state: String,
    pub municipality: String,
    pub profession: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

/// What `GET /auth/me` and the auth endpoints return about an organizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrganizerProfile {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "genero")]
    pub gender: Option<String>,
    pub email: String,
    pub cpf: String,
    #[serde(rename = "estado")]
    pub state: String,
    #[serde(rename = "municipio")]
    pub municipality: String,
}

impl From<Organizer> for OrganizerProfile {
    fn from(organizer: Organizer) -> Self {
        Self {
            id: organizer.id,
            name: organizer.name,
            gender: organizer.gender,
            email: organizer.email,
            cpf: organizer.cpf,
            state: organizer.state,
            municipality: organizer.municipality,
        }
    }
}

/// Registration form.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterOrganizer {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(rename = "genero", default)]
    #[validate(length(max = 50))]
    pub gender: Option<String>,
    /// Punctuation is ignored; 11 digits remain.
    #[schema(example = "123.456.789-01")]
    pub cpf: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    #[serde(rename = "senha")]
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    #[serde(rename = "estado")]
    #[validate(length(equal = 2))]
    #[schema(example = "CE")]
    pub state: String,
    #[serde(rename = "municipio")]
    #[validate(length(min = 1, max = 255))]
    pub municipality: String,
    #[serde(rename = "profissao")]
    #[validate(length(min = 1, max = 255))]
    pub profession: String,
    #[serde(rename = "telefone")]
    #[validate(length(min = 8, max = 20))]
    pub phone: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    pub cpf: String,
    #[serde(rename = "senha")]
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Body returned by registration and login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    #[serde(rename = "multiplicador")]
    pub organizer: OrganizerProfile,
}

/// Validated registration ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrganizer {
    pub name: String,
    pub cpf: String,
    pub email: String,
    pub password_hash: String,
    pub gender: Option<String>,
    pub state: String,
    pub municipality: String,
    pub profession: String,
    pub phone: String,
}

/// Strip punctuation from a CPF and require exactly 11 digits.
pub fn normalize_cpf(raw: &str) -> OrganizerResult<String> {
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | ' '))
        .collect();

    if digits.len() != CPF_LENGTH || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(OrganizerError::Validation(
            "CPF deve conter 11 dígitos".to_string(),
        ));
    }

    Ok(digits)
}
