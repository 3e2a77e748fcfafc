use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{Duration, Utc};

use crate::services::timeline_service::DEFAULT_PER_PAGE;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/chirp.db";
pub const DEFAULT_STORAGE_DIR: &str = "storage";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value {value:?}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings for the API server and the admin CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub storage_dir: PathBuf,
    pub timeline_per_page: u32,
    pub token_ttl: Option<Duration>,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8080,
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            timeline_per_page: DEFAULT_PER_PAGE,
            token_ttl: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source. Unset and empty
    /// values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let timeline_per_page = parse_or(
            get("TIMELINE_PER_PAGE"),
            "TIMELINE_PER_PAGE",
            defaults.timeline_per_page,
        )?;
        if timeline_per_page == 0 {
            return Err(invalid("TIMELINE_PER_PAGE", "0", "must be at least 1"));
        }

        let token_ttl = match get("TOKEN_TTL_MINUTES") {
            Some(raw) => {
                let minutes = parse::<i64>(&raw, "TOKEN_TTL_MINUTES")?;
                if minutes <= 0 {
                    return Err(invalid("TOKEN_TTL_MINUTES", &raw, "must be positive"));
                }
                let ttl = Duration::try_minutes(minutes)
                    .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
                    .ok_or_else(|| invalid("TOKEN_TTL_MINUTES", &raw, "is too large"))?;
                Some(ttl)
            }
            None => None,
        };

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            host: parse_or(get("HOST"), "HOST", defaults.host)?,
            port: parse_or(get("PORT"), "PORT", defaults.port)?,
            storage_dir: get("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            timeline_per_page,
            token_ttl,
            max_upload_bytes: parse_or(
                get("MAX_UPLOAD_BYTES"),
                "MAX_UPLOAD_BYTES",
                defaults.max_upload_bytes,
            )?,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}

fn parse<T>(raw: &str, key: &'static str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| invalid(key, raw, &e.to_string()))
}

fn parse_or<T>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => parse(&raw, key),
        None => Ok(default),
    }
}

fn invalid(key: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
