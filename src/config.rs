//! Scan configuration file
//!
//! Stored as JSON, by default under the user's config directory. Command
//! line flags override whatever the file sets.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::Variant;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File I/O error: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    InvalidFormat(#[from] serde_json::Error),
}

/// Scan settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Proof-of-work variant
    pub variant: Variant,
    /// Worker threads (default: number of CPU cores)
    pub threads: Option<usize>,
    /// Seconds between hash rate reports
    pub report_interval_secs: u64,
    /// Replace the target with the easy benchmark target
    pub benchmark: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            threads: None,
            report_interval_secs: 5,
            benchmark: false,
        }
    }
}

impl ScanConfig {
    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Load from `path`, or from the default location; missing files yield
    /// the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Default config file path (~/.config/lyra2/config.json on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lyra2").join("config.json"))
}
