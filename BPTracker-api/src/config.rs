use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use tracing::info;

/// Errors raised while reading the server configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

/// Server settings read from the environment
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Directory for the SQLite database and default backup location
    pub data_dir: PathBuf,
    /// JSON file rewritten after every change, if set
    pub backup_path: Option<PathBuf>,
    /// Permissive CORS for browser clients on other origins
    pub enable_cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 3000,
            data_dir: PathBuf::from("data"),
            backup_path: None,
            enable_cors: true,
        }
    }
}

impl ApiConfig {
    /// Read `HOST`, `PORT`, `DATA_DIR`, `BACKUP_JSON_PATH` and `ENABLE_CORS`
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            host: parse_var("HOST", defaults.host)?,
            port: parse_var("PORT", defaults.port)?,
            data_dir: env::var("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            backup_path: env::var("BACKUP_JSON_PATH")
                .ok()
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            enable_cors: match env::var("ENABLE_CORS") {
                Ok(value) => parse_flag("ENABLE_CORS", &value)?,
                Err(_) => defaults.enable_cors,
            },
        };

        info!(
            "Server configuration: address={}, data_dir={}, backup={:?}, cors={}",
            config.socket_addr(),
            config.data_dir.display(),
            config.backup_path,
            config.enable_cors
        );

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Default SQLite file inside the data directory
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join("bp_tracker.db")
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        }),
    }
}
