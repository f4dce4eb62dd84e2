//! Configuration management for the `Wayfarer` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::WayfarerError;

/// Root configuration structure for the `Wayfarer` application
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WayfarerConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Outbound email configuration
    pub email: EmailConfig,
    /// Catalog cache configuration
    pub cache: CacheConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Admin API configuration
    pub admin: AdminConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_server_host")]
    pub host: String,
    /// Bind port
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Maximum accepted request body size in kilobytes
    #[serde(default = "default_body_limit")]
    pub body_limit_kb: usize,
}

/// Database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Connection pool size
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Outbound email settings. Credentials come exclusively from the
/// environment (`WAYFARER_EMAIL__SMTP_USERNAME` / `__SMTP_PASSWORD`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// When false, notifications are logged instead of sent
    #[serde(default)]
    pub enabled: bool,
    /// SMTP relay host
    #[serde(default = "default_smtp_relay")]
    pub smtp_relay: String,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    /// From address for all outbound mail
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// Where contact-form notifications are delivered
    #[serde(default = "default_agency_inbox")]
    pub agency_inbox: String,
}

/// Catalog cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache directory location
    #[serde(default = "default_cache_location")]
    pub location: String,
    /// Listing TTL in minutes
    #[serde(default = "default_cache_ttl")]
    pub ttl_minutes: u32,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Admin API settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AdminConfig {
    /// Bearer token for `/api/admin`; admin routes are disabled while unset
    pub token: Option<String>,
}

// Default value functions
fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_body_limit() -> usize {
    512
}

fn default_database_url() -> String {
    "sqlite://wayfarer.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_smtp_relay() -> String {
    "smtp.gmail.com".to_string()
}

fn default_from_address() -> String {
    "Wayfarer <bookings@wayfarer.example>".to_string()
}

fn default_agency_inbox() -> String {
    "hello@wayfarer.example".to_string()
}

fn default_cache_location() -> String {
    "~/.cache/wayfarer".to_string()
}

fn default_cache_ttl() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            request_timeout_seconds: default_request_timeout(),
            body_limit_kb: default_body_limit(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_relay: default_smtp_relay(),
            smtp_username: None,
            smtp_password: None,
            from_address: default_from_address(),
            agency_inbox: default_agency_inbox(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            location: default_cache_location(),
            ttl_minutes: default_cache_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl WayfarerConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with WAYFARER_ prefix
        builder = builder.add_source(
            Environment::with_prefix("WAYFARER")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: WayfarerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wayfarer").join("config.toml"))
    }

    /// Cache TTL as a duration
    #[must_use]
    pub fn cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(u64::from(self.cache.ttl_minutes) * 60)
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(WayfarerError::config("Server port must be non-zero").into());
        }

        if self.server.request_timeout_seconds == 0 || self.server.request_timeout_seconds > 300 {
            return Err(WayfarerError::config(
                "Request timeout must be between 1 and 300 seconds",
            )
            .into());
        }

        if self.database.max_connections == 0 || self.database.max_connections > 64 {
            return Err(WayfarerError::config(
                "Database pool size must be between 1 and 64 connections",
            )
            .into());
        }

        if self.cache.ttl_minutes > 1440 {
            return Err(
                WayfarerError::config("Cache TTL cannot exceed 1440 minutes (1 day)").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WayfarerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WayfarerError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.database.url.starts_with("sqlite:") {
            return Err(
                WayfarerError::config("Database URL must be a sqlite: connection string").into(),
            );
        }

        if self.email.enabled {
            if self.email.smtp_username.as_deref().unwrap_or("").is_empty()
                || self.email.smtp_password.as_deref().unwrap_or("").is_empty()
            {
                return Err(WayfarerError::config(
                    "Email is enabled but SMTP credentials are missing",
                )
                .into());
            }
        }

        if let Some(token) = &self.admin.token {
            if token.len() < 16 {
                return Err(WayfarerError::config(
                    "Admin token must be at least 16 characters",
                )
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WayfarerConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, "sqlite://wayfarer.db");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.cache.ttl_minutes, 10);
        assert_eq!(config.logging.level, "info");
        assert!(!config.email.enabled);
        assert!(config.admin.token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = WayfarerConfig::default();
        config.logging.level = "verbose".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = WayfarerConfig::default();
        config.server.request_timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Request timeout"));

        let mut config = WayfarerConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_email_credentials() {
        let mut config = WayfarerConfig::default();
        config.email.enabled = true;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("SMTP credentials"));

        config.email.smtp_username = Some("mailer".to_string());
        config.email.smtp_password = Some("app-password".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_admin_token_length() {
        let mut config = WayfarerConfig::default();
        config.admin.token = Some("short".to_string());
        assert!(config.validate().is_err());

        config.admin.token = Some("a-long-enough-admin-token".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_database_url_scheme() {
        let mut config = WayfarerConfig::default();
        config.database.url = "postgres://localhost/wayfarer".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("sqlite:"));
    }

    #[test]
    fn test_cache_ttl_conversion() {
        let config = WayfarerConfig::default();
        assert_eq!(config.cache_ttl(), std::time::Duration::from_secs(600));
    }

    #[test]
    fn test_config_path_generation() {
        let path = WayfarerConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("wayfarer"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }
}
