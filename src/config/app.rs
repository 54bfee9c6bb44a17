//! Application configuration loading from config.toml
//!
//! The file is optional. It sets the address the HTTP server binds to and may list
//! promotions to seed into an empty database on startup. `HOST` and `PORT`
//! environment variables override the `[server]` table.

use crate::errors::{Error, Result};
use crate::models::PromotionInput;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Promotions created on startup when their name is not taken
    #[serde(default)]
    pub promotions: Vec<PromotionInput>,
}

/// Where the HTTP server listens
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind, e.g. `0.0.0.0`
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port`, ready for `TcpListener::bind`.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

/// Loads application configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A seed promotion has a malformed field (bad date, unknown status)
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    debug!("Loading configuration from {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.display()),
    })
}

/// Loads configuration from `PROMOTIONS_CONFIG` (default `./config.toml`), falling back
/// to defaults when the file does not exist, then applies `HOST`/`PORT` overrides.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("PROMOTIONS_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let mut config = if Path::new(&path).exists() {
        load_config(&path)?
    } else {
        info!("No configuration file at {}, using defaults", path);
        AppConfig::default()
    };
    apply_env_overrides(
        &mut config.server,
        std::env::var("HOST").ok(),
        std::env::var("PORT").ok(),
    )?;
    Ok(config)
}

fn apply_env_overrides(
    server: &mut ServerConfig,
    host: Option<String>,
    port: Option<String>,
) -> Result<()> {
    if let Some(host) = host {
        server.host = host;
    }
    if let Some(port) = port {
        server.port = port.parse().map_err(|e| Error::Config {
            message: format!("Invalid PORT '{port}': {e}"),
        })?;
    }
    Ok(())
}
