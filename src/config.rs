//! Application Configuration Module
//! Selector tables and window settings, optionally overridden from a JSON file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "titanic_eda.json";

/// Environment variable that points at an alternative config file.
pub const CONFIG_ENV_VAR: &str = "TITANIC_EDA_CONFIG";

/// Column tables that drive chart selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Free-text column that always routes to a word cloud.
    pub name_column: String,
    /// Small-cardinality columns shown as pie charts.
    pub pie_columns: Vec<String>,
    /// Columns hidden from the univariate picker.
    pub excluded_columns: Vec<String>,
    /// Upper bound on words drawn in a word cloud.
    pub max_cloud_words: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            name_column: "Name".to_string(),
            pie_columns: ["Survived", "Pclass", "Sex", "Embarked"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            excluded_columns: ["PassengerId", "Parch", "Ticket", "Cabin"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_cloud_words: 200,
        }
    }
}

impl SelectorConfig {
    pub fn is_name_column(&self, column: &str) -> bool {
        self.name_column == column
    }

    pub fn is_pie_column(&self, column: &str) -> bool {
        self.pie_columns.iter().any(|c| c == column)
    }

    pub fn is_excluded(&self, column: &str) -> bool {
        self.excluded_columns.iter().any(|c| c == column)
    }
}

/// Top-level application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub selector: SelectorConfig,
    pub window_width: f32,
    pub window_height: f32,
    /// Rows shown in the dataset preview table.
    pub preview_rows: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("train.csv"),
            selector: SelectorConfig::default(),
            window_width: 1400.0,
            window_height: 900.0,
            preview_rows: 1000,
        }
    }
}

impl AppConfig {
    /// Parse a config file. Missing keys fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(text)?;
        Ok(config)
    }

    /// Resolve the config file location: env var first, then the working directory.
    pub fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load the config if present. A malformed file is logged and ignored.
    pub fn load_or_default() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("ignoring config: {e:#}");
                Self::default()
            }
        }
    }
}
