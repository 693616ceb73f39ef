//! Asset href signing.
//!
//! Planetary Computer stores assets in Azure blob containers that require a
//! short-lived SAS token on each download URL. Tokens are fetched once per
//! storage account and container and cached on the signer.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::models::StacItem;

const AZURE_BLOB_SUFFIX: &str = ".blob.core.windows.net";

/// Makes the asset hrefs of an item downloadable.
#[async_trait]
pub trait AssetSigner: Send + Sync {
    /// Rewrite every asset href of `item` in place.
    async fn sign_item(&self, item: &mut StacItem) -> Result<()>;
}

/// Signer that leaves hrefs untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSigner;

#[async_trait]
impl AssetSigner for NoopSigner {
    async fn sign_item(&self, _item: &mut StacItem) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Planetary Computer SAS token signer.
pub struct PlanetaryComputerSigner {
    client: reqwest::Client,
    sas_url: String,
    tokens: Mutex<HashMap<(String, String), String>>,
}

impl PlanetaryComputerSigner {
    pub fn new(client: reqwest::Client, sas_url: impl Into<String>) -> Self {
        Self {
            client,
            sas_url: sas_url.into().trim_end_matches('/').to_string(),
            tokens: Mutex::new(HashMap::new()),
        }
    }

    /// Sign a single href. Hrefs outside Azure blob storage are returned as-is.
    pub async fn sign_href(&self, href: &str) -> Result<String> {
        let Some((account, container)) = blob_location(href) else {
            return Ok(href.to_string());
        };

        let token = self.token_for(&account, &container).await?;
        let separator = if href.contains('?') { '&' } else { '?' };
        Ok(format!("{}{}{}", href, separator, token))
    }

    async fn token_for(&self, account: &str, container: &str) -> Result<String> {
        let key = (account.to_string(), container.to_string());

        // Held across the fetch so concurrent signings share one request.
        let mut tokens = self.tokens.lock().await;
        if let Some(token) = tokens.get(&key) {
            return Ok(token.clone());
        }

        let url = format!("{}/token/{}/{}", self.sas_url, account, container);
        debug!(account = %account, container = %container, "Fetching SAS token");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::signing(format!("token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::signing(format!(
                "token endpoint returned HTTP {}: {}",
                status,
                truncate(&body, 300)
            )));
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::signing(format!("invalid token response: {}", e)))?;

        tokens.insert(key, parsed.token.clone());
        Ok(parsed.token)
    }
}

#[async_trait]
impl AssetSigner for PlanetaryComputerSigner {
    async fn sign_item(&self, item: &mut StacItem) -> Result<()> {
        for asset in item.assets.values_mut() {
            asset.href = self.sign_href(&asset.href).await?;
        }
        Ok(())
    }
}

/// Storage account and container of an Azure blob href.
fn blob_location(href: &str) -> Option<(String, String)> {
    let url = Url::parse(href).ok()?;
    let host = url.host_str()?;
    let account = host.strip_suffix(AZURE_BLOB_SUFFIX)?;
    let container = url.path_segments()?.find(|s| !s.is_empty())?;
    Some((account.to_string(), container.to_string()))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_location() {
        assert_eq!(
            blob_location("https://modiseuwest.blob.core.windows.net/modis-061-cogs/MOD13A1/a.tif"),
            Some(("modiseuwest".to_string(), "modis-061-cogs".to_string()))
        );
        assert_eq!(blob_location("https://example.com/data/a.tif"), None);
        assert_eq!(blob_location("not a url"), None);
    }

    #[tokio::test]
    async fn test_non_blob_href_unchanged() {
        let signer = PlanetaryComputerSigner::new(reqwest::Client::new(), "http://127.0.0.1:1");
        let href = "https://example.com/data/a.tif";
        assert_eq!(signer.sign_href(href).await.unwrap(), href);
    }

    #[tokio::test]
    async fn test_cached_token_is_reused() {
        let signer = PlanetaryComputerSigner::new(reqwest::Client::new(), "http://127.0.0.1:1");
        signer.tokens.lock().await.insert(
            ("acct".to_string(), "cogs".to_string()),
            "st=1&sig=abc".to_string(),
        );

        let signed = signer
            .sign_href("https://acct.blob.core.windows.net/cogs/x.tif")
            .await
            .unwrap();
        assert_eq!(signed, "https://acct.blob.core.windows.net/cogs/x.tif?st=1&sig=abc");

        let signed = signer
            .sign_href("https://acct.blob.core.windows.net/cogs/x.tif?v=2")
            .await
            .unwrap();
        assert_eq!(
            signed,
            "https://acct.blob.core.windows.net/cogs/x.tif?v=2&st=1&sig=abc"
        );
    }
}
