//! WolfHDFS Configuration
//!
//! This module provides configuration structures for the in-memory
//! WebHDFS emulator.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::store::EntryDefaults;

/// Main WolfHDFS configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WolfHdfsConfig {
    /// HTTP transport configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Defaults applied to newly created entries
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the WebHDFS endpoint
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// URL prefix the WebHDFS paths are mounted under
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,

    /// Enable permissive CORS
    #[serde(default)]
    pub cors_enabled: bool,

    /// Upper bound on a single ingested chunk; larger body frames are split
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,
}

/// Entry defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Group assigned to new entries
    #[serde(default = "default_group")]
    pub default_group: String,

    /// Permission string assigned to new entries
    #[serde(default = "default_permission")]
    pub default_permission: String,

    /// Replication factor reported for new entries
    #[serde(default = "default_replication")]
    pub default_replication: u32,

    /// Block size reported for new entries
    #[serde(default)]
    pub default_block_size: u64,

    /// Fixed length reported for directories
    #[serde(default = "default_directory_length")]
    pub directory_length: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0:50070".to_string()
}

fn default_path_prefix() -> String {
    "/webhdfs/v1".to_string()
}

fn default_max_chunk_size() -> usize {
    64 * 1024
}

fn default_group() -> String {
    "supergroup".to_string()
}

fn default_permission() -> String {
    "644".to_string()
}

fn default_replication() -> u32 {
    1
}

fn default_directory_length() -> u64 {
    24930
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
            bind_address: default_bind_address(),
            path_prefix: default_path_prefix(),
            cors_enabled: false,
            max_chunk_size: default_max_chunk_size(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            default_group: default_group(),
            default_permission: default_permission(),
            default_replication: default_replication(),
            default_block_size: 0,
            directory_length: default_directory_length(),
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

impl StorageConfig {
    /// Entry defaults derived from this section
    pub fn entry_defaults(&self) -> EntryDefaults {
        EntryDefaults {
            group: self.default_group.clone(),
            permission: self.default_permission.clone(),
            replication: self.default_replication,
            block_size: self.default_block_size,
            directory_length: self.directory_length,
        }
    }
}

impl WolfHdfsConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> crate::Result<Self> {
        let config: WolfHdfsConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Render this configuration as TOML
    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.server.bind_address.is_empty() {
            return Err(crate::Error::Config("server.bind_address cannot be empty".into()));
        }

        if !self.server.path_prefix.starts_with('/') {
            return Err(crate::Error::Config(format!(
                "server.path_prefix must start with '/': {}",
                self.server.path_prefix
            )));
        }

        if self.server.max_chunk_size == 0 {
            return Err(crate::Error::Config("server.max_chunk_size must be positive".into()));
        }

        let perm = &self.storage.default_permission;
        if perm.is_empty() || !perm.chars().all(|c| ('0'..='7').contains(&c)) {
            return Err(crate::Error::Config(format!(
                "storage.default_permission must be octal digits: {:?}",
                perm
            )));
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(crate::Error::Config(format!(
                "logging.format must be 'pretty' or 'json': {}",
                self.logging.format
            )));
        }

        Ok(())
    }

    /// Route prefix with any trailing slash removed
    pub fn path_prefix(&self) -> &str {
        let trimmed = self.server.path_prefix.trim_end_matches('/');
        if trimmed.is_empty() {
            "/"
        } else {
            trimmed
        }
    }
}
