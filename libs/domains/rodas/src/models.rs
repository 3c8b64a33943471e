use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{RodaError, RodaResult};

/// Roda lifecycle. The only transition is `active` -> `finalized`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "roda_status")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RodaStatus {
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "finalized")]
    Finalized,
}

/// Reference brackets seeded by the schema migration.
pub const DEFAULT_AGE_BRACKETS: [(i32, &str); 5] =
    [(1, "0-12"), (2, "13-17"), (3, "18-29"), (4, "30-59"), (5, "60+")];

/// Age-range tag attached to a roda when it is closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AgeBracket {
    pub id: i32,
    #[serde(rename = "nome")]
    pub name: String,
}

/// Owner identity shown next to a roda.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrganizerSummary {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "municipio", default, skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
}

impl OrganizerSummary {
    /// Strip contact details before exposing the owner on public listings.
    pub fn public(self) -> Self {
        Self {
            email: None,
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Roda {
    pub id: Uuid,
    #[serde(rename = "multiplicadorId")]
    pub organizer_id: Uuid,
    #[serde(rename = "tema")]
    pub theme: String,
    #[serde(rename = "data")]
    #[schema(value_type = String, format = Date, example = "2025-03-10")]
    pub date: NaiveDate,
    /// Same calendar day as `data`, wall-clock time, no zone.
    #[serde(rename = "hora_inicio")]
    #[schema(value_type = String, example = "2025-03-10T14:30:00")]
    pub start_time: NaiveDateTime,
    #[serde(rename = "municipio")]
    pub municipality: Option<String>,
    #[serde(rename = "local")]
    pub address: String,
    #[serde(rename = "publico_alvo")]
    pub target_audience: String,
    #[serde(rename = "numeroParticipantes")]
    pub expected_participants: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: RodaStatus,
    #[serde(rename = "fotoFrequenciaUrl")]
    pub attendance_photo_url: Option<String>,
    #[serde(rename = "fotoRodaUrl")]
    pub circle_photo_url: Option<String>,
    #[serde(rename = "resumo")]
    pub summary: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Roda {
    pub fn is_active(&self) -> bool {
        self.status == RodaStatus::Active
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RodaWithOrganizer {
    #[serde(flatten)]
    pub roda: Roda,
    #[serde(rename = "multiplicador")]
    pub organizer: OrganizerSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RodaWithBrackets {
    #[serde(flatten)]
    pub roda: Roda,
    #[serde(rename = "faixasEtarias")]
    pub age_brackets: Vec<AgeBracket>,
}

/// Expected participants as sent by forms: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ParticipantCount {
    Number(f64),
    Text(String),
}

impl ParticipantCount {
    /// Blank or zero means "not informed"; anything else must be a positive integer.
    pub fn parse(&self) -> RodaResult<Option<i32>> {
        let invalid =
            || RodaError::Validation("numeroParticipantes deve ser um número inteiro positivo".into());

        let value = match self {
            ParticipantCount::Number(n) if n.fract() == 0.0 => *n as i64,
            ParticipantCount::Number(_) => return Err(invalid()),
            ParticipantCount::Text(s) if s.trim().is_empty() => return Ok(None),
            ParticipantCount::Text(s) => s.trim().parse::<i64>().map_err(|_| invalid())?,
        };

        match value {
            0 => Ok(None),
            n if n < 0 || n > i32::MAX as i64 => Err(invalid()),
            n => Ok(Some(n as i32)),
        }
    }
}

/// Roda form. Required fields are checked by the service so that a missing
/// field yields one message naming all of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRoda {
    #[serde(rename = "tema", default)]
    #[validate(length(max = 255))]
    pub theme: Option<String>,
    #[serde(rename = "data", default)]
    #[schema(example = "2025-03-10")]
    pub date: Option<String>,
    #[serde(rename = "hora_inicio", default)]
    #[schema(example = "14:30")]
    pub start_time: Option<String>,
    #[serde(rename = "municipio", default)]
    #[validate(length(max = 255))]
    pub municipality: Option<String>,
    #[serde(rename = "local", default)]
    pub address: Option<String>,
    #[serde(rename = "publico_alvo", default)]
    pub target_audience: Option<String>,
    #[serde(rename = "numeroParticipantes", default)]
    pub expected_participants: Option<ParticipantCount>,
    #[serde(default)]
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[serde(default)]
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

/// Closure form. `rodaId` is only read by `POST /rodas/encerrar`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CloseRoda {
    #[serde(rename = "rodaId", default)]
    pub roda_id: Option<String>,
    #[serde(rename = "fotoFrequencia", default)]
    pub attendance_photo: Option<String>,
    #[serde(rename = "fotoRodaConversa", default)]
    pub circle_photo: Option<String>,
    #[serde(rename = "resumo", default)]
    #[validate(length(max = 10000))]
    pub summary: Option<String>,
    #[serde(rename = "faixasEtarias", default)]
    pub age_bracket_ids: Vec<i32>,
}

/// Validated roda ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRoda {
    pub organizer_id: Uuid,
    pub theme: String,
    pub date: NaiveDate,
    pub start_time: NaiveDateTime,
    pub municipality: String,
    pub address: String,
    pub target_audience: String,
    pub expected_participants: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Outcome record written when a roda is closed.
#[derive(Debug, Clone, PartialEq)]
pub struct Finalization {
    pub attendance_photo_url: Option<String>,
    pub circle_photo_url: Option<String>,
    pub summary: Option<String>,
    /// Deduplicated, ascending.
    pub age_bracket_ids: Vec<i32>,
}
