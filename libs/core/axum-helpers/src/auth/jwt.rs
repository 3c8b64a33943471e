use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// One day, matching the session cookie's `Max-Age`.
pub const DEFAULT_TOKEN_TTL: i64 = 86_400;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Organizer id
    pub sub: String,
    pub cpf: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

impl JwtClaims {
    pub fn organizer_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

#[derive(Clone)]
pub struct JwtAuth {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    ttl_secs: i64,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        tracing::info!(ttl_secs = config.ttl_secs, "JWT auth initialized");
        Self {
            encoding: Arc::new(EncodingKey::from_secret(config.secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(config.secret.as_bytes())),
            ttl_secs: config.ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    pub fn create_token(&self, organizer_id: Uuid, cpf: &str) -> eyre::Result<String> {
        self.create_token_at(organizer_id, cpf, Utc::now().timestamp())
    }

    fn create_token_at(&self, organizer_id: Uuid, cpf: &str, iat: i64) -> eyre::Result<String> {
        let claims = JwtClaims {
            sub: organizer_id.to_string(),
            cpf: cpf.to_string(),
            exp: iat + Duration::seconds(self.ttl_secs).num_seconds(),
            iat,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Checks signature and expiry. Only HS256 is accepted.
    pub fn verify_token(&self, token: &str) -> eyre::Result<JwtClaims> {
        let token_data = decode::<JwtClaims>(token, &self.decoding, &Validation::new(Algorithm::HS256))?;
        Ok(token_data.claims)
    }
}
