//! Server configuration loaded from the environment.
//!
//! ## Variables
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATABASE_URL` | `postgres://localhost/folio` |
//! | `HOST` / `PORT` | `0.0.0.0` / `3000` |
//! | `LOG_FORMAT` | `text` (`json` for structured output) |
//! | `LOG_FILE` | unset (stdout only) |
//! | `LOG_ANSI` | auto-detected |
//! | `ALLOWED_ORIGINS` | `http://localhost:3000` |
//! | `VIEW_CACHE_CAPACITY` / `VIEW_CACHE_TTL_SECS` | `512` / `300` |
//! | `REDIS_ENABLED` / `REDIS_URL` | `false` / `redis://localhost:6379` |
//! | `DB_MAX_CONNECTIONS` / `DB_ACQUIRE_TIMEOUT_SECS` | `10` / `30` |
//! | `RUN_MIGRATIONS` | `true` |
//! | `RATE_LIMIT_ENABLED` | `true` |
//! | `RATE_LIMIT_REQUESTS` / `RATE_LIMIT_PERIOD_SECS` | `100` / `60` |
//!
//! A value that fails to parse falls back to its default. The fallback is
//! recorded in [`ServerConfig::warnings`] because configuration is read before
//! the log subscriber exists; call [`ServerConfig::log_warnings`] once it does.

use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use tracing::warn;

use folio_core::defaults;
use folio_db::pool::{PoolConfig, DEFAULT_ACQUIRE_TIMEOUT_SECS, DEFAULT_MAX_CONNECTIONS};

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/folio";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";
const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    pub log_file: Option<String>,
    pub log_ansi: Option<bool>,
    pub allowed_origins: Vec<String>,
    pub view_cache_capacity: usize,
    pub view_cache_ttl_secs: u64,
    pub redis_enabled: bool,
    pub redis_url: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub run_migrations: bool,
    pub rate_limit_enabled: bool,
    pub rate_limit_requests: u64,
    pub rate_limit_period_secs: u64,
    /// Values that were rejected while loading, in variable order.
    pub warnings: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let allowed_origins = string("ALLOWED_ORIGINS", DEFAULT_ALLOWED_ORIGINS)
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();

        let mut warnings = Vec::new();
        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            Some("json") => LogFormat::Json,
            None | Some("") | Some("text") => LogFormat::Text,
            Some(other) => {
                warnings.push(format!("LOG_FORMAT={:?} is not text or json, using text", other));
                LogFormat::Text
            }
        };

        let port = parse_or(&lookup, &mut warnings, "PORT", defaults::SERVER_PORT);
        let view_cache_capacity = parse_or(
            &lookup,
            &mut warnings,
            "VIEW_CACHE_CAPACITY",
            defaults::VIEW_CACHE_CAPACITY,
        );
        let view_cache_ttl_secs = parse_or(
            &lookup,
            &mut warnings,
            "VIEW_CACHE_TTL_SECS",
            defaults::VIEW_CACHE_TTL_SECS,
        );
        let redis_enabled = flag_or(&lookup, &mut warnings, "REDIS_ENABLED", false);
        let db_max_connections = parse_or(
            &lookup,
            &mut warnings,
            "DB_MAX_CONNECTIONS",
            DEFAULT_MAX_CONNECTIONS,
        );
        let db_acquire_timeout_secs = parse_or(
            &lookup,
            &mut warnings,
            "DB_ACQUIRE_TIMEOUT_SECS",
            DEFAULT_ACQUIRE_TIMEOUT_SECS,
        );
        let run_migrations = flag_or(&lookup, &mut warnings, "RUN_MIGRATIONS", true);
        let rate_limit_enabled = flag_or(&lookup, &mut warnings, "RATE_LIMIT_ENABLED", true);
        let rate_limit_requests = parse_or(
            &lookup,
            &mut warnings,
            "RATE_LIMIT_REQUESTS",
            defaults::RATE_LIMIT_REQUESTS,
        );
        let rate_limit_period_secs = parse_or(
            &lookup,
            &mut warnings,
            "RATE_LIMIT_PERIOD_SECS",
            defaults::RATE_LIMIT_PERIOD_SECS,
        );

        Self {
            database_url: string("DATABASE_URL", DEFAULT_DATABASE_URL),
            host: string("HOST", DEFAULT_HOST),
            port,
            log_format,
            log_file: lookup("LOG_FILE").filter(|v| !v.trim().is_empty()),
            log_ansi: lookup("LOG_ANSI").and_then(|v| parse_flag(&v)),
            allowed_origins,
            view_cache_capacity,
            view_cache_ttl_secs,
            redis_enabled,
            redis_url: string("REDIS_URL", DEFAULT_REDIS_URL),
            db_max_connections,
            db_acquire_timeout_secs,
            run_migrations,
            rate_limit_enabled,
            rate_limit_requests,
            rate_limit_period_secs,
            warnings,
        }
    }

    /// Emit a WARN for every value rejected while loading.
    pub fn log_warnings(&self) {
        for message in &self.warnings {
            warn!(
                subsystem = "api",
                component = "config",
                "Invalid configuration: {}",
                message
            );
        }
    }

    /// Connection pool settings for the database.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            max_connections: self.db_max_connections,
            acquire_timeout: Duration::from_secs(self.db_acquire_timeout_secs),
        }
    }

    /// Address string the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// CORS origins as header values; invalid entries are skipped.
    pub fn cors_origins(&self) -> Vec<HeaderValue> {
        self.allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("Invalid CORS origin '{}': {}", origin, e);
                    None
                }
            })
            .collect()
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn flag_or<F>(lookup: &F, warnings: &mut Vec<String>, name: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => default,
        Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
            warnings.push(format!(
                "{}={:?} is not a boolean, using {}",
                name, raw, default
            ));
            default
        }),
    }
}

fn parse_or<F, T>(lookup: &F, warnings: &mut Vec<String>, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display + Copy,
{
    match lookup(name) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warnings.push(format!(
                "{}={:?} is not a valid number, using {}",
                name, raw, default
            ));
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.view_cache_capacity, 512);
        assert_eq!(cfg.view_cache_ttl_secs, 300);
        assert!(!cfg.redis_enabled);
        assert!(cfg.run_migrations);
        assert_eq!(cfg.log_format, LogFormat::Text);
        assert_eq!(cfg.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let cfg = config(&[("PORT", "eighty"), ("VIEW_CACHE_TTL_SECS", "-1")]);
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.view_cache_ttl_secs, 300);
        assert_eq!(cfg.warnings.len(), 2);
        assert!(cfg.warnings[0].starts_with("PORT=\"eighty\""));
        assert!(cfg.warnings[1].starts_with("VIEW_CACHE_TTL_SECS="));
    }

    #[test]
    fn test_valid_config_has_no_warnings() {
        assert!(ServerConfig::default().warnings.is_empty());
        assert!(config(&[("PORT", "8080"), ("LOG_FORMAT", "json")])
            .warnings
            .is_empty());
    }

    #[test]
    fn test_unknown_log_format_is_recorded() {
        let cfg = config(&[("LOG_FORMAT", "yaml")]);
        assert_eq!(cfg.log_format, LogFormat::Text);
        assert_eq!(cfg.warnings.len(), 1);
        assert!(cfg.warnings[0].contains("LOG_FORMAT"));
    }

    #[test]
    fn test_pool_config_follows_settings() {
        let cfg = config(&[("DB_MAX_CONNECTIONS", "4"), ("DB_ACQUIRE_TIMEOUT_SECS", "5")]);
        let pool = cfg.pool_config();
        assert_eq!(pool.max_connections, 4);
        assert_eq!(pool.acquire_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("PORT", "8080"),
            ("LOG_FORMAT", "json"),
            ("REDIS_ENABLED", "1"),
            ("RUN_MIGRATIONS", "false"),
            ("LOG_ANSI", "false"),
            ("ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
        ]);
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert!(cfg.redis_enabled);
        assert!(!cfg.run_migrations);
        assert_eq!(cfg.log_ansi, Some(false));
        assert_eq!(
            cfg.allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(cfg.cors_origins().len(), 2);
    }

    #[test]
    fn test_invalid_flag_uses_default() {
        let cfg = config(&[("RATE_LIMIT_ENABLED", "sometimes")]);
        assert!(cfg.rate_limit_enabled);
        assert!(cfg.warnings[0].contains("RATE_LIMIT_ENABLED"));
    }
}
