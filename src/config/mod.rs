//! Configuration module for the release dashboard backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::ConfigError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Path to the release CSV snapshot
    pub release_data_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Allowed CORS origin; any origin when unset
    pub cors_origin: Option<String>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "./data/database.sqlite".to_string())
            .into();

        let release_data_path = env::var("RELEASE_DATA_PATH")
            .unwrap_or_else(|_| "./data/release-raw-data.csv".to_string())
            .into();

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "8000".to_string());
        let bind_addr = parse_bind_addr(&host, &port)?;

        let cors_origin = env::var("CORS_ORIGIN").ok().filter(|o| !o.trim().is_empty());

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_json = env::var("LOG_FORMAT")
            .map(|f| is_json_format(&f))
            .unwrap_or(false);

        Ok(Self {
            db_path,
            release_data_path,
            bind_addr,
            cors_origin,
            log_level,
            log_json,
        })
    }
}

/// `LOG_FORMAT=json` selects JSON log lines; anything else is plain text.
fn is_json_format(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("json")
}

fn parse_bind_addr(host: &str, port: &str) -> Result<SocketAddr, ConfigError> {
    // "localhost" is the conventional dev host but is not an IP literal
    let host = if host == "localhost" { "127.0.0.1" } else { host };
    let value = format!("{}:{}", host, port);
    value
        .parse()
        .map_err(|source| ConfigError::BindAddr { value, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("DATABASE_URL");
        env::remove_var("RELEASE_DATA_PATH");
        env::remove_var("HOST");
        env::remove_var("PORT");
        env::remove_var("CORS_ORIGIN");
        env::remove_var("LOG_LEVEL");
        env::remove_var("LOG_FORMAT");

        let config = Config::from_env().unwrap();

        assert_eq!(config.db_path, PathBuf::from("./data/database.sqlite"));
        assert_eq!(
            config.release_data_path,
            PathBuf::from("./data/release-raw-data.csv")
        );
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8000");
        assert!(config.cors_origin.is_none());
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
    }

    #[test]
    fn test_parse_bind_addr() {
        assert_eq!(
            parse_bind_addr("localhost", "3001").unwrap().to_string(),
            "127.0.0.1:3001"
        );
        assert_eq!(
            parse_bind_addr("0.0.0.0", "80").unwrap().to_string(),
            "0.0.0.0:80"
        );
        assert!(parse_bind_addr("127.0.0.1", "not-a-port").is_err());
    }

    #[test]
    fn test_log_format() {
        assert!(is_json_format("json"));
        assert!(is_json_format(" JSON "));
        assert!(!is_json_format("text"));
        assert!(!is_json_format(""));
    }
}
