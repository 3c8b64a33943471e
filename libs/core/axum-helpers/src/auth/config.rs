use core_config::{ConfigError, FromEnv, env_parse_or_default, env_required};

use super::jwt::DEFAULT_TOKEN_TTL;

/// Token signing settings.
///
/// - `JWT_SECRET` (required, at least 32 characters)
/// - `JWT_TTL_SECS` (default one day)
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_secs: i64,
}

impl JwtConfig {
    /// # Panics
    /// Panics if the secret is shorter than 32 characters.
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        assert!(
            secret.len() >= 32,
            "JWT secret must be at least 32 characters"
        );
        Self {
            secret,
            ttl_secs: DEFAULT_TOKEN_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;

        if secret.len() < 32 {
            return Err(ConfigError::ParseError {
                key: "JWT_SECRET".to_string(),
                details: format!(
                    "must be at least 32 characters (got {}). Generate one with: openssl rand -base64 32",
                    secret.len()
                ),
            });
        }

        let ttl_secs = env_parse_or_default("JWT_TTL_SECS", DEFAULT_TOKEN_TTL)?;
        if ttl_secs <= 0 {
            return Err(ConfigError::ParseError {
                key: "JWT_TTL_SECS".to_string(),
                details: "must be positive".to_string(),
            });
        }

        Ok(Self { secret, ttl_secs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "rodas-de-conversa-test-secret-0123456789";

    #[test]
    #[should_panic(expected = "JWT secret must be at least 32 characters")]
    fn test_new_rejects_short_secret() {
        JwtConfig::new("short");
    }

    #[test]
    fn test_from_env_defaults_ttl_to_one_day() {
        temp_env::with_vars(
            [("JWT_SECRET", Some(SECRET)), ("JWT_TTL_SECS", None)],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.secret, SECRET);
                assert_eq!(config.ttl_secs, 86_400);
            },
        );
    }

    #[test]
    fn test_from_env_custom_ttl() {
        temp_env::with_vars(
            [("JWT_SECRET", Some(SECRET)), ("JWT_TTL_SECS", Some("3600"))],
            || {
                assert_eq!(JwtConfig::from_env().unwrap().ttl_secs, 3600);
            },
        );
    }

    #[test]
    fn test_from_env_rejects_non_positive_ttl() {
        temp_env::with_vars(
            [("JWT_SECRET", Some(SECRET)), ("JWT_TTL_SECS", Some("0"))],
            || {
                let err = JwtConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("JWT_TTL_SECS"));
            },
        );
    }

    #[test]
    fn test_from_env_missing_secret() {
        temp_env::with_var_unset("JWT_SECRET", || {
            let err = JwtConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("JWT_SECRET"));
        });
    }

    #[test]
    fn test_from_env_short_secret() {
        temp_env::with_var("JWT_SECRET", Some("short"), || {
            let err = JwtConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("32 characters"));
        });
    }
}
