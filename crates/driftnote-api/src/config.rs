use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_path: PathBuf,
    pub jwt_secret: String,
    pub auth_clock_skew: Duration,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("database_path", &self.database_path)
            .field("jwt_secret", &"[REDACTED]")
            .field("auth_clock_skew", &self.auth_clock_skew)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = value_or_default(&lookup, "DRIFTNOTE_API_BIND_ADDR", "127.0.0.1:8080");

        let database_path = PathBuf::from(value_or_default(
            &lookup,
            "DRIFTNOTE_DATABASE_PATH",
            "driftnote.db",
        ));

        let jwt_secret = required_trimmed(&lookup, "DRIFTNOTE_JWT_SECRET")?;
        if jwt_secret.len() < 32 {
            return Err(ConfigError::Invalid(
                "DRIFTNOTE_JWT_SECRET must be at least 32 bytes".to_string(),
            ));
        }

        let skew_secs = value_or_default(&lookup, "DRIFTNOTE_AUTH_CLOCK_SKEW_SECS", "60")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::Invalid(
                    "DRIFTNOTE_AUTH_CLOCK_SKEW_SECS must be a non-negative integer".to_string(),
                )
            })?;

        Ok(Self {
            bind_addr,
            database_path,
            jwt_secret,
            auth_clock_skew: Duration::from_secs(skew_secs),
        })
    }
}

fn required_trimmed(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

fn value_or_default(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: &str,
) -> String {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
        }
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let secret = "0123456789abcdef0123456789abcdef";
        let config =
            AppConfig::from_lookup(lookup_from(&[("DRIFTNOTE_JWT_SECRET", secret)])).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.database_path, PathBuf::from("driftnote.db"));
        assert_eq!(config.auth_clock_skew, Duration::from_secs(60));
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let result = AppConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(
            result,
            Err(ConfigError::MissingVar("DRIFTNOTE_JWT_SECRET"))
        ));
    }

    #[test]
    fn test_short_secret_is_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[("DRIFTNOTE_JWT_SECRET", "short")]));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let secret = "0123456789abcdef0123456789abcdef";
        let config =
            AppConfig::from_lookup(lookup_from(&[("DRIFTNOTE_JWT_SECRET", secret)])).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains(secret));
        assert!(debug.contains("[REDACTED]"));
    }
}
