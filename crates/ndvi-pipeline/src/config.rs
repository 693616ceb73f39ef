//! Pipeline configuration loading.

use std::path::Path;

use anyhow::{Context, Result};
use raster_loader::LoaderConfig;
use serde::{Deserialize, Serialize};
use stac_client::CatalogConfig;

/// Settings for the live pipeline collaborators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub loader: LoaderConfig,
}

impl PipelineConfig {
    /// Defaults, then the YAML file at `path` if given, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config
            .catalog
            .apply_env()
            .context("Invalid catalog environment override")?;
        Ok(config)
    }

    /// Parse a YAML configuration file. Missing sections take defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        tracing::info!(
            path = ?path,
            stac_url = %config.catalog.stac_url,
            "Loaded pipeline configuration"
        );
        Ok(config)
    }
}
