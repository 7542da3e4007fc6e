//! Rental API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. A `.env` file in the working directory is read first if present.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rental_db::DbConfig;

/// Signing secret used when `JWT_SECRET` is unset. Refused in production.
const DEV_JWT_SECRET: &str = "rental-dev-secret-change-in-production";

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl FromStr for AppEnv {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(AppEnv::Development),
            "production" | "prod" => Ok(AppEnv::Production),
            _ => Err(ConfigError::InvalidValue("APP_ENV".to_string())),
        }
    }
}

/// Rental API configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP server port
    pub port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// How long a writer waits for the SQLite write lock
    pub db_busy_timeout: Duration,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT lifetime in seconds
    pub jwt_lifetime_secs: i64,

    pub app_env: AppEnv,

    /// Admin account created at startup when both are set
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env is fine; the real environment still applies
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let config = AppConfig {
            port: var("PORT", "3000")
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,

            database_path: PathBuf::from(var("DATABASE_PATH", "./data/rental.db")),

            db_max_connections: var("DB_MAX_CONNECTIONS", "5")
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,

            db_busy_timeout: var("DB_BUSY_TIMEOUT_SECS", "5")
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidValue("DB_BUSY_TIMEOUT_SECS".to_string()))?,

            jwt_secret: var("JWT_SECRET", DEV_JWT_SECRET),

            jwt_lifetime_secs: var("JWT_LIFETIME_SECS", "86400") // 1 day
                .parse::<i64>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::InvalidValue("JWT_LIFETIME_SECS".to_string()))?,

            app_env: var("APP_ENV", "development").parse::<AppEnv>()?,

            admin_email: lookup("ADMIN_EMAIL").filter(|v| !v.trim().is_empty()),
            admin_password: lookup("ADMIN_PASSWORD").filter(|v| !v.is_empty()),
        };

        if config.app_env == AppEnv::Production && config.jwt_secret == DEV_JWT_SECRET {
            return Err(ConfigError::MissingRequired("JWT_SECRET".to_string()));
        }

        if config.admin_email.is_some() != config.admin_password.is_some() {
            return Err(ConfigError::MissingRequired(
                "ADMIN_EMAIL and ADMIN_PASSWORD must be set together".to_string(),
            ));
        }

        Ok(config)
    }

    /// Development defaults against the given database file.
    pub fn development(database_path: impl Into<PathBuf>) -> Self {
        AppConfig {
            port: 3000,
            database_path: database_path.into(),
            db_max_connections: 5,
            db_busy_timeout: Duration::from_secs(5),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_lifetime_secs: 86400,
            app_env: AppEnv::Development,
            admin_email: None,
            admin_password: None,
        }
    }

    pub fn is_development(&self) -> bool {
        self.app_env == AppEnv::Development
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone())
            .max_connections(self.db_max_connections)
            .busy_timeout(self.db_busy_timeout)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
