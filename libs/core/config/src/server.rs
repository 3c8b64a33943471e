use crate::{ConfigError, FromEnv, env_or_default, env_parse_or_default};
use std::net::Ipv4Addr;

/// HTTP listener settings (`HOST`, `PORT`).
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string()),
            port: env_parse_or_default("PORT", 8080u16)?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(Ipv4Addr::UNSPECIFIED.to_string(), 8080)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults() {
        temp_env::with_vars([("HOST", None::<&str>), ("PORT", None::<&str>)], || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config.address(), "0.0.0.0:8080");
        });
    }

    #[test]
    fn test_server_config_custom_values() {
        temp_env::with_vars([("HOST", Some("127.0.0.1")), ("PORT", Some("3001"))], || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config.address(), "127.0.0.1:3001");
        });
    }

    #[test]
    fn test_server_config_rejects_out_of_range_port() {
        temp_env::with_var("PORT", Some("99999"), || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("PORT"));
        });
    }
}
