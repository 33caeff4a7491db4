use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hpm_core::CoreConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration that can be loaded from a JSON file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    /// Directory holding the state record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// JSON catalog replacing the built-in reference tables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
}

impl CliConfig {
    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: CliConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Command-line flags win over file values, which win over defaults.
    pub fn merge(self, data_dir: Option<PathBuf>, catalog_path: Option<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.or(self.data_dir),
            catalog_path: catalog_path.or(self.catalog_path),
        }
    }

    pub fn into_core(self) -> CoreConfig {
        let mut core = match self.data_dir {
            Some(dir) => CoreConfig::new(dir),
            None => CoreConfig::default(),
        };
        if let Some(catalog) = self.catalog_path {
            core = core.with_catalog(catalog);
        }
        core
    }
}
