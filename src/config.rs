//! Application configuration
//! Resolved once at startup from an optional JSON file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Config file picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "sales_dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("preview_rows must be greater than zero")]
    EmptyPreview,
    #[error("date_formats must not be empty")]
    NoDateFormats,
}

/// Text encoding of the source CSV.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceEncoding {
    /// ISO-8859-1, one byte per character
    #[default]
    Latin1,
    Utf8,
}

/// Settings for the loader and the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub encoding: SourceEncoding,
    /// Tried in order for every InvoiceDate value.
    pub date_formats: Vec<String>,
    pub infer_schema_length: usize,
    pub preview_rows: usize,
    pub window_title: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data.csv"),
            encoding: SourceEncoding::default(),
            date_formats: default_date_formats(),
            infer_schema_length: 10_000,
            preview_rows: 5,
            window_title: "Sales Dashboard for E-commerce".to_string(),
        }
    }
}

fn default_date_formats() -> Vec<String> {
    [
        "%m/%d/%Y %H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d",
        "%m/%d/%Y",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl AppConfig {
    /// Read and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the effective config: explicit file, then the default file
    /// in the working directory, then built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            info!(path = %path.display(), "Loading config");
            return Self::from_file(path);
        }

        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            info!(path = %fallback.display(), "Loading config");
            Self::from_file(fallback)
        } else {
            debug!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.preview_rows == 0 {
            return Err(ConfigError::EmptyPreview);
        }
        if self.date_formats.is_empty() {
            return Err(ConfigError::NoDateFormats);
        }
        Ok(())
    }
}
