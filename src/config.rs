// Configuration management

use crate::auth::secret::SigningSecret;
use crate::core::errors::AuthError;
use std::env;

/// Which persistence backend `DATABASE_URL` selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Application configuration loaded from environment variables
///
/// All configuration is validated on load with clear error messages. The
/// signing secret is redacted from `Debug` output.
#[derive(Debug, Clone)]
pub struct Config {
    // Server configuration
    pub bind_address: String,
    pub port: u16,

    // Database configuration
    pub database_url: String,
    pub database_max_connections: u32,

    // Token signing
    pub jwt_secret: SigningSecret,

    // Middleware configuration
    pub request_timeout_secs: u64,
    pub body_size_limit_bytes: usize,

    // Logging configuration
    pub log_level: String,
    pub log_format: String, // "json" or "text"
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Supports `.env` file loading in development (via dotenv crate).
    /// `JWT_SECRET` and `DATABASE_URL` are required.
    pub fn from_env() -> Result<Self, AuthError> {
        #[cfg(not(test))]
        {
            dotenv::dotenv().ok(); // Ignore errors (file may not exist)
        }

        let config = Self {
            bind_address: Self::get_env_or_default("BIND_ADDRESS", "0.0.0.0"),
            port: Self::parse_port("PORT", 3000)?,
            database_url: Self::get_required_env("DATABASE_URL")?,
            database_max_connections: Self::parse_or_default("DATABASE_MAX_CONNECTIONS", 10u32)?,
            jwt_secret: Self::get_signing_secret("JWT_SECRET")?,
            request_timeout_secs: Self::parse_or_default("REQUEST_TIMEOUT_SECS", 30u64)?,
            body_size_limit_bytes: Self::parse_or_default("BODY_SIZE_LIMIT_BYTES", 1024 * 1024usize)?,
            log_level: Self::get_env_or_default("LOG_LEVEL", "info"),
            log_format: Self::get_env_or_default("LOG_FORMAT", "json"),
        };

        config.validate()?;

        Ok(config)
    }

    /// Backend selected by the `DATABASE_URL` scheme
    pub fn store_backend(&self) -> Result<StoreBackend, AuthError> {
        Self::backend_for(&self.database_url)
    }

    fn get_env_or_default(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_string())
    }

    fn get_required_env(key: &str) -> Result<String, AuthError> {
        match env::var(key) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            Ok(_) => Err(AuthError::Configuration(format!("{} is empty", key))),
            Err(_) => Err(AuthError::Configuration(format!("{} not set", key))),
        }
    }

    fn get_signing_secret(key: &str) -> Result<SigningSecret, AuthError> {
        let value = Self::get_required_env(key)?;
        SigningSecret::new(&value)
            .map_err(|e| AuthError::Configuration(format!("Invalid {}: {}", key, e)))
    }

    fn parse_port(key: &str, default: u16) -> Result<u16, AuthError> {
        let port = Self::parse_or_default(key, default)?;
        if port == 0 {
            return Err(AuthError::Configuration(format!(
                "{} must be between 1 and 65535",
                key
            )));
        }
        Ok(port)
    }

    /// Parse a positive number from an environment variable or return default
    fn parse_or_default<T>(key: &str, default: T) -> Result<T, AuthError>
    where
        T: std::str::FromStr + PartialEq + Default,
        T::Err: std::fmt::Display,
    {
        match env::var(key) {
            Ok(value) => {
                let parsed = value.parse::<T>().map_err(|e| {
                    AuthError::Configuration(format!("Invalid {} value '{}': {}", key, value, e))
                })?;

                if parsed == T::default() {
                    return Err(AuthError::Configuration(format!(
                        "{} must be greater than 0",
                        key
                    )));
                }

                Ok(parsed)
            }
            Err(_) => Ok(default),
        }
    }

    /// Validate all configuration values
    fn validate(&self) -> Result<(), AuthError> {
        Self::backend_for(&self.database_url)?;
        Self::validate_log_level(&self.log_level)?;
        Self::validate_log_format(&self.log_format)?;
        Ok(())
    }

    fn backend_for(database_url: &str) -> Result<StoreBackend, AuthError> {
        let url = url::Url::parse(database_url).map_err(|e| {
            AuthError::Configuration(format!("Invalid DATABASE_URL: {}", e))
        })?;

        match url.scheme() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(AuthError::Configuration(format!(
                "Unsupported DATABASE_URL scheme '{}': expected postgres, postgresql or memory",
                other
            ))),
        }
    }

    fn validate_log_level(level: &str) -> Result<(), AuthError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&level.to_lowercase().as_str()) {
            return Err(AuthError::Configuration(format!(
                "Invalid LOG_LEVEL '{}': must be one of {}",
                level,
                valid_levels.join(", ")
            )));
        }
        Ok(())
    }

    fn validate_log_format(format: &str) -> Result<(), AuthError> {
        if format != "json" && format != "text" {
            return Err(AuthError::Configuration(format!(
                "Invalid LOG_FORMAT '{}': must be 'json' or 'text'",
                format
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Create a test configuration
    ///
    /// Bypasses environment loading; uses the in-process store and a fixed
    /// signing secret.
    pub fn test_config() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 3000,
            database_url: "memory://".to_string(),
            database_max_connections: 1,
            jwt_secret: SigningSecret::new("test-signing-secret").expect("non-empty test secret"),
            request_timeout_secs: 30,
            body_size_limit_bytes: 1024 * 1024,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}
