//! HTTP client for STAC API Item Search.

use std::sync::Arc;

use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::{CatalogConfig, SigningMode};
use crate::error::{CatalogError, Result};
use crate::models::{StacItem, StacItemCollection, StacLink, StacSearchParams};
use crate::signing::{truncate, AssetSigner, NoopSigner, PlanetaryComputerSigner};

/// Async STAC search client.
pub struct StacClient {
    http: reqwest::Client,
    search_url: String,
    max_items: usize,
    page_limit: u32,
    signer: Arc<dyn AssetSigner>,
}

impl StacClient {
    /// Build a client from configuration, with the configured signer.
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        let signer: Arc<dyn AssetSigner> = match config.signing {
            SigningMode::PlanetaryComputer => Arc::new(PlanetaryComputerSigner::new(
                http.clone(),
                config.sas_url.clone(),
            )),
            SigningMode::None => Arc::new(NoopSigner),
        };

        Ok(Self {
            http,
            search_url: config.search_url(),
            max_items: config.max_items,
            page_limit: config.page_limit,
            signer,
        })
    }

    /// Replace the signer.
    pub fn with_signer(mut self, signer: Arc<dyn AssetSigner>) -> Self {
        self.signer = signer;
        self
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }

    /// Fetch one page of results.
    pub async fn search(&self, params: &StacSearchParams) -> Result<StacItemCollection> {
        let response = self.http.post(&self.search_url).json(params).send().await?;
        parse_json(response).await
    }

    /// Search and follow `next` links, collecting up to `max_items` signed items.
    #[instrument(skip(self, params), fields(url = %self.search_url))]
    pub async fn search_all(&self, params: &StacSearchParams) -> Result<Vec<StacItem>> {
        let mut items: Vec<StacItem> = Vec::new();
        let mut page = self.search(params).await?;
        let mut pages = 1usize;

        loop {
            let next = page.next_link().cloned();
            items.append(&mut page.features);

            if items.len() >= self.max_items {
                break;
            }

            match next {
                Some(link) => {
                    page = self.follow_next(&link, params).await?;
                    pages += 1;
                    if page.is_empty() {
                        break;
                    }
                }
                None => break,
            }
        }

        items.truncate(self.max_items);
        debug!(items = items.len(), pages = pages, "Catalog search complete");

        for item in items.iter_mut() {
            self.signer.sign_item(item).await?;
        }

        Ok(items)
    }

    /// Follow a pagination link, either POST (optionally merged) or GET.
    async fn follow_next(
        &self,
        link: &StacLink,
        params: &StacSearchParams,
    ) -> Result<StacItemCollection> {
        let method = link.method.as_deref().unwrap_or("GET").to_ascii_uppercase();

        if method != "POST" {
            let response = self.http.get(&link.href).send().await?;
            return parse_json(response).await;
        }

        let body = match (&link.body, link.merge.unwrap_or(false)) {
            (Some(link_body), true) => {
                let mut base = serde_json::to_value(params)?;
                if let (Some(base_obj), Some(link_obj)) =
                    (base.as_object_mut(), link_body.as_object())
                {
                    for (k, v) in link_obj {
                        base_obj.insert(k.clone(), v.clone());
                    }
                }
                base
            }
            (Some(link_body), false) => link_body.clone(),
            (None, _) => serde_json::to_value(params)?,
        };

        let response = self.http.post(&link.href).json(&body).send().await?;
        parse_json(response).await
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CatalogError::Status {
            status: status.as_u16(),
            body: truncate(&body, 500),
        });
    }

    let value: Value = response
        .json()
        .await
        .map_err(|e| CatalogError::invalid_response(e.to_string()))?;
    Ok(serde_json::from_value(value)?)
}
