use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::models::RodaWithBrackets;

/// Bucket for rodas stored without a municipality.
pub const UNKNOWN_MUNICIPALITY: &str = "Não informado";

/// Dashboard numbers over an organizer's finalized rodas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RodaStatistics {
    #[serde(rename = "totalRodas")]
    pub total_rodas: u64,
    #[serde(rename = "municipios")]
    pub municipalities: BTreeMap<String, u64>,
    /// One count per (roda, bracket) link.
    #[serde(rename = "faixasEtarias")]
    pub age_brackets: BTreeMap<String, u64>,
    #[serde(rename = "municipiosCount")]
    pub municipalities_count: u64,
    #[serde(rename = "faixasEtariasCount")]
    pub age_brackets_count: u64,
}

pub fn aggregate(rodas: &[RodaWithBrackets]) -> RodaStatistics {
    let mut municipalities = BTreeMap::new();
    let mut age_brackets = BTreeMap::new();

    for entry in rodas {
        let municipality = entry
            .roda
            .municipality
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(UNKNOWN_MUNICIPALITY);
        *municipalities.entry(municipality.to_string()).or_insert(0) += 1;

        for bracket in &entry.age_brackets {
            *age_brackets.entry(bracket.name.clone()).or_insert(0) += 1;
        }
    }

    RodaStatistics {
        total_rodas: rodas.len() as u64,
        municipalities_count: municipalities.len() as u64,
        age_brackets_count: age_brackets.len() as u64,
        municipalities,
        age_brackets,
    }
}
