//! # Configuration
//!
//! Settings for the host side of `isfri`: what the device node is called, where the
//! TCP node listens, how big each read is, and where logs go. The device core itself
//! has no configuration.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use isfri::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("Serving /dev/{} on {}", config.device.name, config.server.bind);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [device]
//! name = "isfri"
//! mode = 438
//!
//! [server]
//! bind = "127.0.0.1:7355"
//! chunk_size = 4
//!
//! [logging]
//! level = "info"
//! file = "isfri.log"
//! ```
//!
//! Precedence: CLI args > config file > defaults.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;
use tokio::fs;

use crate::device::{BUF_LEN, DEVICE_MODE, DEVICE_NAME};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("device name must not be empty")]
    EmptyName,

    #[error("device name '{0}' contains a path separator")]
    NameHasSeparator(String),

    #[error("invalid bind address '{0}'")]
    InvalidBind(String),

    #[error("chunk_size must be between 1 and {max}, got {got}")]
    ChunkSize { got: usize, max: usize },

    #[error("unknown log level '{0}'")]
    LogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub name: String,
    /// Permission bits reported for the node.
    #[serde(default = "default_mode")]
    pub mode: u32,
}

fn default_mode() -> u32 {
    DEVICE_MODE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    /// Bytes requested per read when serving a connection.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_chunk_size() -> usize {
    4
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub device: DeviceConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config
            .validate()
            .map_err(|e| anyhow!("Invalid config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.device.name.contains('/') || self.device.name.contains('\\') {
            return Err(ConfigError::NameHasSeparator(self.device.name.clone()));
        }
        self.bind_addr()?;
        if self.server.chunk_size == 0 || self.server.chunk_size > BUF_LEN {
            return Err(ConfigError::ChunkSize {
                got: self.server.chunk_size,
                max: BUF_LEN,
            });
        }
        self.log_level()?;
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .bind
            .parse()
            .map_err(|_| ConfigError::InvalidBind(self.server.bind.clone()))
    }

    pub fn log_level(&self) -> Result<log::LevelFilter, ConfigError> {
        self.logging
            .level
            .parse()
            .map_err(|_| ConfigError::LogLevel(self.logging.level.clone()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            device: DeviceConfig {
                name: DEVICE_NAME.to_string(),
                mode: DEVICE_MODE,
            },
            server: ServerConfig {
                bind: "127.0.0.1:7355".to_string(),
                chunk_size: default_chunk_size(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("isfri.log".to_string()),
            },
        }
    }
}
