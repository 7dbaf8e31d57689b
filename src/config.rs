//! Startup configuration.
//!
//! Loaded from `config/<env>.yaml`, then patched from the process
//! environment: `JWT_SECRET`, `EMAIL_USER`, `EMAIL_PASS`, `PORT` and
//! `DATABASE_URL`. Secrets are expected to come from the environment.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    /// PostgreSQL URL; without one the server keeps data in memory.
    #[serde(default)]
    pub postgres_url: Option<String>,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub otp: OtpConfig,
    #[serde(default)]
    pub mail: MailConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthConfig {
    pub token_ttl_hours: i64,
    /// Normally left empty in YAML and supplied through `JWT_SECRET`.
    #[serde(default)]
    pub jwt_secret: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_hours: crate::auth::token::DEFAULT_TOKEN_TTL_HOURS,
            jwt_secret: String::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OtpConfig {
    pub ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            sweep_interval_secs: 60,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MailConfig {
    pub from_name: String,
    pub from_address: String,
    /// HTTP mail relay; mail is only logged when unset.
    #[serde(default)]
    pub relay_url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from_name: "Job Board".to_string(),
            from_address: "no-reply@jobboard.local".to_string(),
            relay_url: None,
            username: None,
            password: None,
        }
    }
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path))?;
        let mut config = Self::from_yaml(&content)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse config yaml")
    }

    /// Overlay environment values. `lookup` is `std::env::var` in production.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(user) = lookup("EMAIL_USER") {
            self.mail.username = Some(user);
        }
        if let Some(pass) = lookup("EMAIL_PASS") {
            self.mail.password = Some(pass);
        }
        if let Some(port) = lookup("PORT") {
            self.gateway.port = port
                .parse()
                .with_context(|| format!("PORT is not a valid port: {}", port))?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.postgres_url = Some(url);
        }

        if self.auth.jwt_secret.is_empty() {
            bail!("JWT_SECRET must be set");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const YAML: &str = r#"
log_level: info
log_dir: ./logs
log_file: job_board.log
use_json: false
rotation: daily
gateway:
  host: 0.0.0.0
  port: 3000
"#;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_fill_optional_sections() {
        let config = AppConfig::from_yaml(YAML).unwrap();
        assert_eq!(config.otp.ttl_secs, 300);
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert!(config.postgres_url.is_none());
        assert!(config.mail.relay_url.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::from_yaml(YAML).unwrap();
        config
            .apply_env(env(&[
                ("JWT_SECRET", "s3cret"),
                ("PORT", "8081"),
                ("EMAIL_USER", "mailer"),
                ("EMAIL_PASS", "pw"),
                ("DATABASE_URL", "postgres://localhost/jobs"),
            ]))
            .unwrap();
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.gateway.port, 8081);
        assert_eq!(config.mail.username.as_deref(), Some("mailer"));
        assert_eq!(config.mail.password.as_deref(), Some("pw"));
        assert_eq!(
            config.postgres_url.as_deref(),
            Some("postgres://localhost/jobs")
        );
    }

    #[test]
    fn test_missing_jwt_secret_is_error() {
        let mut config = AppConfig::from_yaml(YAML).unwrap();
        let err = config.apply_env(env(&[])).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_bad_port_is_error() {
        let mut config = AppConfig::from_yaml(YAML).unwrap();
        assert!(
            config
                .apply_env(env(&[("JWT_SECRET", "x"), ("PORT", "http")]))
                .is_err()
        );
    }
}
