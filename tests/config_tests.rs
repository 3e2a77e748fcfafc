use std::{collections::HashMap, env};

use chirp::config::{AppConfig, ConfigError};
use serial_test::serial;

#[derive(Default)]
struct EnvGuard {
    original: HashMap<String, Option<String>>,
}

impl EnvGuard {
    fn set(&mut self, key: &str, value: impl Into<String>) {
        self.original
            .entry(key.to_string())
            .or_insert_with(|| env::var(key).ok());
        env::set_var(key, value.into());
    }

    fn remove(&mut self, key: &str) {
        self.original
            .entry(key.to_string())
            .or_insert_with(|| env::var(key).ok());
        env::remove_var(key);
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.original.drain() {
            match value {
                Some(v) => env::set_var(&key, v),
                None => env::remove_var(&key),
            }
        }
    }
}

const KEYS: [&str; 7] = [
    "DATABASE_URL",
    "HOST",
    "PORT",
    "STORAGE_DIR",
    "TIMELINE_PER_PAGE",
    "TOKEN_TTL_MINUTES",
    "MAX_UPLOAD_BYTES",
];

fn clean_env() -> EnvGuard {
    let mut guard = EnvGuard::default();
    for key in KEYS {
        guard.remove(key);
    }
    guard
}

#[test]
#[serial]
fn config_uses_defaults_when_env_is_empty() {
    let _guard = clean_env();

    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.database_url, "sqlite://data/chirp.db");
    assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
    assert_eq!(config.storage_dir, std::path::PathBuf::from("storage"));
    assert_eq!(config.timeline_per_page, 15);
    assert!(config.token_ttl.is_none());
}

#[test]
#[serial]
fn config_reads_environment() {
    let mut guard = clean_env();
    guard.set("PORT", "9090");
    guard.set("TIMELINE_PER_PAGE", "30");
    guard.set("TOKEN_TTL_MINUTES", "1440");

    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.port, 9090);
    assert_eq!(config.timeline_per_page, 30);
    assert_eq!(config.token_ttl, Some(chrono::Duration::days(1)));
}

#[test]
#[serial]
fn config_rejects_malformed_numbers() {
    let mut guard = clean_env();
    guard.set("MAX_UPLOAD_BYTES", "two megabytes");

    let result = AppConfig::from_env();
    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue {
            key: "MAX_UPLOAD_BYTES",
            ..
        })
    ));
}
