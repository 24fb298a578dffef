use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_REPORTS_DIR: &str = "email-reports";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_MOCK_DELAY_MS: u64 = 1000;

/// Values shipped in the sample `.env`; treated as "not configured".
pub const PLACEHOLDER_EMAIL_USER: &str = "your-email@gmail.com";
pub const PLACEHOLDER_EMAIL_PASS: &str = "your-app-password";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    Smtp,
    Mock,
    File,
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeliveryMode::Smtp => "smtp",
            DeliveryMode::Mock => "mock",
            DeliveryMode::File => "file",
        })
    }
}

impl FromStr for DeliveryMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "smtp" | "email" => Ok(DeliveryMode::Smtp),
            "mock" | "console" => Ok(DeliveryMode::Mock),
            "file" | "disk" => Ok(DeliveryMode::File),
            other => Err(ConfigError::UnknownDeliveryMode(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown report delivery mode `{0}` (expected smtp, mock or file)")]
    UnknownDeliveryMode(String),
    #[error("invalid bind address `{0}`")]
    InvalidBindAddr(String),
    #[error("invalid value `{value}` for {key}")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Clone, Default)]
pub struct SmtpSettings {
    pub host: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl SmtpSettings {
    /// Returns the account identity and credential when both are set to
    /// something other than the sample placeholders.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let user = self.user.as_deref().map(str::trim).filter(|v| !v.is_empty())?;
        let password = self
            .password
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())?;
        if user == PLACEHOLDER_EMAIL_USER || password == PLACEHOLDER_EMAIL_PASS {
            return None;
        }
        Some((user, password))
    }

    pub fn is_configured(&self) -> bool {
        self.credentials().is_some()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub delivery: DeliveryMode,
    pub smtp: SmtpSettings,
    pub reports_dir: PathBuf,
    pub mock_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            delivery: DeliveryMode::Smtp,
            smtp: SmtpSettings {
                host: DEFAULT_SMTP_HOST.to_string(),
                user: None,
                password: None,
            },
            reports_dir: PathBuf::from(DEFAULT_REPORTS_DIR),
            mock_delay: Duration::from_millis(DEFAULT_MOCK_DELAY_MS),
        }
    }
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let delivery = match non_empty("REPORT_DELIVERY") {
            Some(mode) => mode.parse::<DeliveryMode>()?,
            None => match non_empty("USE_MOCK_EMAIL") {
                Some(flag) if flag.trim().eq_ignore_ascii_case("true") => DeliveryMode::Mock,
                _ => DeliveryMode::Smtp,
            },
        };

        let bind_raw = non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_raw.clone()))?;

        let mock_delay = match non_empty("MOCK_EMAIL_DELAY_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidNumber {
                    key: "MOCK_EMAIL_DELAY_MS",
                    value: raw.clone(),
                })?,
            None => Duration::from_millis(DEFAULT_MOCK_DELAY_MS),
        };

        Ok(Self {
            bind_addr,
            delivery,
            smtp: SmtpSettings {
                host: non_empty("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                user: lookup("EMAIL_USER"),
                password: lookup("EMAIL_PASS"),
            },
            reports_dir: non_empty("REPORTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORTS_DIR)),
            mock_delay,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_smtp_without_environment() {
        let config = AppConfig::from_lookup(lookup(&[])).expect("config");
        assert_eq!(config.delivery, DeliveryMode::Smtp);
        assert_eq!(config.reports_dir, PathBuf::from("email-reports"));
        assert_eq!(config.mock_delay, Duration::from_millis(1000));
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(!config.smtp.is_configured());
    }

    #[test]
    fn mock_flag_and_explicit_mode() {
        let config = AppConfig::from_lookup(lookup(&[("USE_MOCK_EMAIL", "true")])).unwrap();
        assert_eq!(config.delivery, DeliveryMode::Mock);

        let config = AppConfig::from_lookup(lookup(&[
            ("USE_MOCK_EMAIL", "true"),
            ("REPORT_DELIVERY", "file"),
        ]))
        .unwrap();
        assert_eq!(config.delivery, DeliveryMode::File);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("REPORT_DELIVERY", "carrier-pigeon")])),
            Err(ConfigError::UnknownDeliveryMode(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("MOCK_EMAIL_DELAY_MS", "soon")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("BIND_ADDR", "nowhere")])),
            Err(ConfigError::InvalidBindAddr(_))
        ));
    }

    #[test]
    fn placeholder_credentials_are_not_configured() {
        let placeholder = SmtpSettings {
            host: DEFAULT_SMTP_HOST.into(),
            user: Some(PLACEHOLDER_EMAIL_USER.into()),
            password: Some(PLACEHOLDER_EMAIL_PASS.into()),
        };
        assert!(!placeholder.is_configured());

        let real = SmtpSettings {
            host: DEFAULT_SMTP_HOST.into(),
            user: Some("reports@agency.dev".into()),
            password: Some("s3cret".into()),
        };
        assert_eq!(real.credentials(), Some(("reports@agency.dev", "s3cret")));
        assert!(!format!("{real:?}").contains("s3cret"));
    }
}
