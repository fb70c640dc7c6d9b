//! Application configuration loaded from environment variables.

use std::time::Duration;

use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

/// Errors raised when the environment lacks a setting a service needs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `ENCRYPTION_KEY` is unset or empty.
    #[error("ENCRYPTION_KEY must be set for the customers service")]
    MissingEncryptionKey,
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `text` or `json` (default: `text`)
/// - `RUN_MIGRATIONS`: apply SQL migrations at startup (default: `false`)
/// - `ENCRYPTION_KEY`: symmetric key for customer identity numbers
/// - `DB_*`: see [`DatabaseConfig`]
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub run_migrations: bool,
    pub encryption_key: Option<String>,
    pub database: DatabaseConfig,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(lookup("PORT"), defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
            run_migrations: parse_or(lookup("RUN_MIGRATIONS"), defaults.run_migrations),
            encryption_key: lookup("ENCRYPTION_KEY").filter(|k| !k.is_empty()),
            database: DatabaseConfig::from_lookup(&lookup),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the encryption key or an error if it is not configured.
    pub fn require_encryption_key(&self) -> Result<&str, ConfigError> {
        self.encryption_key
            .as_deref()
            .ok_or(ConfigError::MissingEncryptionKey)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            run_migrations: false,
            encryption_key: None,
            database: DatabaseConfig::default(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("run_migrations", &self.run_migrations)
            .field("encryption_key", &self.encryption_key.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .finish()
    }
}

/// PostgreSQL connection settings.
///
/// Reads `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_DATABASE`,
/// `DB_MAX_CONNECTIONS` and `DB_ACQUIRE_TIMEOUT_SECS`.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("DB_HOST").unwrap_or(defaults.host),
            port: parse_or(lookup("DB_PORT"), defaults.port),
            user: lookup("DB_USER").unwrap_or(defaults.user),
            password: lookup("DB_PASSWORD").unwrap_or(defaults.password),
            database: lookup("DB_DATABASE").unwrap_or(defaults.database),
            max_connections: parse_or(lookup("DB_MAX_CONNECTIONS"), defaults.max_connections),
            acquire_timeout: Duration::from_secs(parse_or(
                lookup("DB_ACQUIRE_TIMEOUT_SECS"),
                defaults.acquire_timeout.as_secs(),
            )),
        }
    }

    /// Builds sqlx connection options from these settings.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            database: "postgres".to_string(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(!config.run_migrations);
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config.addr(), "0.0.0.0:3000");
        assert_eq!(config.database.host, "localhost");
        assert!(config.encryption_key.is_none());
    }

    #[test]
    fn test_reads_database_settings() {
        let config = Config::from_lookup(lookup_from(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
            ("DB_USER", "shop"),
            ("DB_PASSWORD", "s3cret"),
            ("DB_DATABASE", "storefront"),
            ("DB_MAX_CONNECTIONS", "20"),
            ("DB_ACQUIRE_TIMEOUT_SECS", "2"),
        ]));

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.user, "shop");
        assert_eq!(config.database.password, "s3cret");
        assert_eq!(config.database.database, "storefront");
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.database.acquire_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_invalid_numbers_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "not-a-port"),
            ("DB_PORT", "99999"),
        ]));
        assert_eq!(config.port, 3000);
        assert_eq!(config.database.port, 5432);
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config::from_lookup(lookup_from(&[("HOST", "127.0.0.1"), ("PORT", "8080")]));
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_flags_and_format() {
        let config = Config::from_lookup(lookup_from(&[
            ("LOG_FORMAT", "json"),
            ("RUN_MIGRATIONS", "true"),
        ]));
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.run_migrations);
    }

    #[test]
    fn test_encryption_key_required() {
        let config = Config::from_lookup(lookup_from(&[("ENCRYPTION_KEY", "")]));
        assert!(matches!(
            config.require_encryption_key(),
            Err(ConfigError::MissingEncryptionKey)
        ));

        let config = Config::from_lookup(lookup_from(&[("ENCRYPTION_KEY", "k")]));
        assert_eq!(config.require_encryption_key().unwrap(), "k");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::from_lookup(lookup_from(&[
            ("DB_PASSWORD", "s3cret"),
            ("ENCRYPTION_KEY", "topsecret"),
        ]));
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("topsecret"));
    }
}
