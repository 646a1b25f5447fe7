//! Process configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Duration;
use reqwest::Url;
use thiserror::Error;

use partsapp_infra::seed::{DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_JWT_SECRET: &str = "dev-secret";
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 720;
const DEFAULT_APP_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_MAIL_FROM: &str = "noreply@resend.dev";
const DEFAULT_PASSWORD_ITERATIONS: u32 = 100_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}={value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    /// Absent means the in-memory store.
    pub database_url: Option<String>,
    /// Public URL used in emailed links.
    pub app_base_url: Url,
    /// Absent means emails are only logged.
    pub resend_api_key: Option<String>,
    pub mail_from: String,
    pub admin_email: String,
    pub admin_password: String,
    pub seed_materials_csv: Option<PathBuf>,
    pub password_iterations: u32,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = match var("BIND_ADDR") {
            Some(v) => v.parse().map_err(|e| ConfigError::invalid("BIND_ADDR", &v, e))?,
            None => DEFAULT_BIND_ADDR
                .parse()
                .map_err(|e| ConfigError::invalid("BIND_ADDR", DEFAULT_BIND_ADDR, e))?,
        };

        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEFAULT_JWT_SECRET.to_string()
        });

        let token_ttl_minutes = match var("TOKEN_TTL_MINUTES") {
            Some(v) => {
                let minutes: i64 = v
                    .parse()
                    .map_err(|e| ConfigError::invalid("TOKEN_TTL_MINUTES", &v, e))?;
                if minutes <= 0 {
                    return Err(ConfigError::invalid("TOKEN_TTL_MINUTES", &v, "must be positive"));
                }
                minutes
            }
            None => DEFAULT_TOKEN_TTL_MINUTES,
        };

        let base = var("APP_BASE_URL").unwrap_or_else(|| DEFAULT_APP_BASE_URL.to_string());
        let app_base_url = Url::parse(&base).map_err(|e| ConfigError::invalid("APP_BASE_URL", &base, e))?;

        let password_iterations = match var("PASSWORD_ITERATIONS") {
            Some(v) => {
                let n: u32 = v
                    .parse()
                    .map_err(|e| ConfigError::invalid("PASSWORD_ITERATIONS", &v, e))?;
                if n == 0 {
                    return Err(ConfigError::invalid("PASSWORD_ITERATIONS", &v, "must be positive"));
                }
                n
            }
            None => DEFAULT_PASSWORD_ITERATIONS,
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            token_ttl: Duration::minutes(token_ttl_minutes),
            database_url: var("DATABASE_URL"),
            app_base_url,
            resend_api_key: var("RESEND_API_KEY"),
            mail_from: var("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
            admin_email: var("ADMIN_EMAIL").unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string()),
            admin_password: var("ADMIN_PASSWORD").unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
            seed_materials_csv: var("SEED_MATERIALS_CSV").map(PathBuf::from),
            password_iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let c = config(&[]).unwrap();
        assert_eq!(c.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(c.token_ttl, Duration::minutes(720));
        assert!(c.database_url.is_none());
        assert!(c.resend_api_key.is_none());
        assert_eq!(c.admin_email, "admin@partsapp.local");
        assert_eq!(c.password_iterations, 100_000);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let c = config(&[("DATABASE_URL", "  "), ("JWT_SECRET", "")]).unwrap();
        assert!(c.database_url.is_none());
        assert_eq!(c.jwt_secret, "dev-secret");
    }

    #[test]
    fn invalid_values_are_reported_with_their_key() {
        let err = config(&[("TOKEN_TTL_MINUTES", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "TOKEN_TTL_MINUTES", .. }));

        let err = config(&[("BIND_ADDR", "nowhere")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "BIND_ADDR", .. }));

        assert!(config(&[("PASSWORD_ITERATIONS", "0")]).is_err());
    }

    #[test]
    fn explicit_values_win() {
        let c = config(&[
            ("BIND_ADDR", "127.0.0.1:3000"),
            ("TOKEN_TTL_MINUTES", "30"),
            ("SEED_MATERIALS_CSV", "samples/materials.csv"),
        ])
        .unwrap();
        assert_eq!(c.bind_addr.port(), 3000);
        assert_eq!(c.token_ttl, Duration::minutes(30));
        assert_eq!(c.seed_materials_csv, Some(PathBuf::from("samples/materials.csv")));
    }
}
