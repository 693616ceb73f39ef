//! Catalog connection settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// Planetary Computer STAC API root.
pub const DEFAULT_STAC_URL: &str = "https://planetarycomputer.microsoft.com/api/stac/v1";

/// Planetary Computer SAS token API root.
pub const DEFAULT_SAS_URL: &str = "https://planetarycomputer.microsoft.com/api/sas/v1";

/// How asset hrefs are made downloadable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SigningMode {
    /// Append a Planetary Computer SAS token to Azure blob hrefs.
    PlanetaryComputer,
    /// Leave hrefs untouched.
    None,
}

impl std::str::FromStr for SigningMode {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "planetary-computer" | "pc" => Ok(Self::PlanetaryComputer),
            "none" | "" => Ok(Self::None),
            other => Err(CatalogError::Config(format!(
                "unknown signing mode '{}'",
                other
            ))),
        }
    }
}

/// Settings for reaching the STAC catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_stac_url")]
    pub stac_url: String,

    #[serde(default = "default_signing")]
    pub signing: SigningMode,

    #[serde(default = "default_sas_url")]
    pub sas_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound on items collected across pages for one search.
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// Page size requested from the catalog.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            stac_url: default_stac_url(),
            signing: default_signing(),
            sas_url: default_sas_url(),
            request_timeout_secs: default_request_timeout_secs(),
            max_items: default_max_items(),
            page_limit: default_page_limit(),
        }
    }
}

impl CatalogConfig {
    /// Apply `NDVI_STAC_URL`, `NDVI_SAS_URL` and `NDVI_SIGNING` overrides.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("NDVI_STAC_URL") {
            self.stac_url = url;
        }
        if let Ok(url) = std::env::var("NDVI_SAS_URL") {
            self.sas_url = url;
        }
        if let Ok(mode) = std::env::var("NDVI_SIGNING") {
            self.signing = mode.parse()?;
        }
        Ok(())
    }

    /// URL of the item search endpoint.
    pub fn search_url(&self) -> String {
        let base = self.stac_url.trim_end_matches('/');
        if base.ends_with("/search") {
            base.to_string()
        } else {
            format!("{}/search", base)
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_stac_url() -> String {
    DEFAULT_STAC_URL.to_string()
}

fn default_sas_url() -> String {
    DEFAULT_SAS_URL.to_string()
}

fn default_signing() -> SigningMode {
    SigningMode::PlanetaryComputer
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_items() -> usize {
    100
}

fn default_page_limit() -> u32 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.stac_url, DEFAULT_STAC_URL);
        assert_eq!(config.signing, SigningMode::PlanetaryComputer);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_search_url() {
        let mut config = CatalogConfig::default();
        assert_eq!(
            config.search_url(),
            "https://planetarycomputer.microsoft.com/api/stac/v1/search"
        );

        config.stac_url = "http://localhost:9000/stac/".to_string();
        assert_eq!(config.search_url(), "http://localhost:9000/stac/search");

        config.stac_url = "http://localhost:9000/search".to_string();
        assert_eq!(config.search_url(), "http://localhost:9000/search");
    }

    #[test]
    fn test_signing_mode_parsing() {
        assert_eq!("none".parse::<SigningMode>().unwrap(), SigningMode::None);
        assert_eq!(
            "Planetary-Computer".parse::<SigningMode>().unwrap(),
            SigningMode::PlanetaryComputer
        );
        assert!("s3".parse::<SigningMode>().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: CatalogConfig = serde_json::from_str(r#"{"signing": "none"}"#).unwrap();
        assert_eq!(config.signing, SigningMode::None);
        assert_eq!(config.max_items, 100);
    }
}
