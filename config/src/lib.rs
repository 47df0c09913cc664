//! # Configuration Management for Rowhaus
//!
//! Connection settings for the database backends a Rowhaus model can be bound to.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::DatabaseConfig;
//!
//! let db_config = DatabaseConfig::new(
//!     "localhost".to_string(), 3306, "peewee_test".to_string(),
//!     "root".to_string(), "password".to_string(),
//! );
//! assert_eq!(db_config.driver, "mysql");
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [database]
//! driver = "mysql"
//! host = "localhost"
//! port = 3306
//! database = "peewee_test"
//! username = "root"
//! password = "password"
//! charset = "utf8mb4"
//! autocommit = true
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from ROWHAUS_CONFIG or ./rowhaus.toml
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./rowhaus.toml";
const CONFIG_PATH_VAR: &str = "ROWHAUS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_driver")]
    pub driver: String,
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub database: String,
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_charset")]
    pub charset: String,
    #[serde(default = "default_autocommit")]
    pub autocommit: bool,
}

fn default_driver() -> String {
    "mysql".to_string()
}

fn default_port() -> u16 {
    3306
}

fn default_charset() -> String {
    "utf8mb4".to_string()
}

fn default_autocommit() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from the TOML file named in `.env` or the default path
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is fine; a malformed one is not
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(e.into());
            }
        }

        if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            Self::from_file(&config_path)
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)
        } else {
            Err(ConfigError::Invalid(format!(
                "Config path must be specified in .env file as {} or in {} file",
                CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH
            )))
        }
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()
    }
}

impl DatabaseConfig {
    /// Create a new MySQL configuration with the default charset and autocommit on
    pub fn new(
        host: String,
        port: u16,
        database: String,
        username: String,
        password: String,
    ) -> Self {
        Self {
            driver: default_driver(),
            host,
            port,
            database,
            username,
            password,
            charset: default_charset(),
            autocommit: default_autocommit(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.driver.is_empty() {
            return Err(ConfigError::Invalid(
                "Database driver cannot be empty".to_string(),
            ));
        }
        if self.host.is_empty() {
            return Err(ConfigError::Invalid(
                "Database host cannot be empty".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid(
                "Database port cannot be zero".to_string(),
            ));
        }
        if self.database.is_empty() {
            return Err(ConfigError::Invalid(
                "Database name cannot be empty".to_string(),
            ));
        }
        if self.username.is_empty() {
            return Err(ConfigError::Invalid(
                "Database username cannot be empty".to_string(),
            ));
        }
        if self.charset.is_empty() {
            return Err(ConfigError::Invalid(
                "Database charset cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL_CONFIG: &str = r#"
[database]
driver = "mysql"
host = "db.internal"
port = 3307
database = "peewee_test"
username = "root"
password = "secret"
charset = "utf8"
autocommit = false
"#;

    #[test]
    fn test_parse_full_config() {
        let config = AppConfig::from_toml_str(FULL_CONFIG).unwrap();
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 3307);
        assert_eq!(config.database.charset, "utf8");
        assert!(!config.database.autocommit);
    }

    #[test]
    fn test_defaults_fill_missing_keys() {
        let config = AppConfig::from_toml_str(
            r#"
[database]
host = "localhost"
database = "peewee_test"
username = "root"
"#,
        )
        .unwrap();

        assert_eq!(
            config.database,
            DatabaseConfig::new(
                "localhost".to_string(),
                3306,
                "peewee_test".to_string(),
                "root".to_string(),
                String::new(),
            )
        );
    }

    #[test]
    fn test_validation_rejects_empty_values() {
        let mut config = DatabaseConfig::new(
            "localhost".to_string(),
            3306,
            "peewee_test".to_string(),
            "root".to_string(),
            String::new(),
        );
        assert!(config.validate().is_ok());

        config.port = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.port = 3306;
        config.host.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.host = "localhost".to_string();
        config.driver.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_section_is_parse_error() {
        assert!(matches!(
            AppConfig::from_toml_str("[cache]\nsize = 1\n"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL_CONFIG.as_bytes()).unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.database.database, "peewee_test");

        assert!(matches!(
            AppConfig::from_file("/nonexistent/rowhaus.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
