//! Configuration file handling

use serde::Deserialize;
use std::path::Path;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Client settings
    #[serde(default)]
    pub client: ClientConfig,
}

/// Client settings
#[derive(Debug, Deserialize, Default)]
pub struct ClientConfig {
    /// Daemon endpoint: a socket path, `unix:///path` or `tcp://host:port`
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }

    /// Pick the endpoint to use: an explicit override wins over the config file
    ///
    /// `None` means the daemon's default socket.
    pub fn resolve_endpoint(&self, flag: Option<String>) -> Option<String> {
        flag.or_else(|| self.client.endpoint.clone())
    }
}
