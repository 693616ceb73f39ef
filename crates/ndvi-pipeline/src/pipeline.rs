//! The NDVI statistics pipeline.
//!
//! Query the catalog for each sampled month, load the selected items onto a
//! common grid, scale by January's factor, and summarise each month.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::future::try_join_all;
use ndvi_common::{BoundingBox, Month, QueryParameters};
use raster_loader::{CogLoader, LoadRequest, RasterLoadError, RasterLoader};
use stac_client::{CatalogClient, CatalogError, SearchRequest, StacClient, StacItem};
use tracing::{debug, info, instrument, warn, Instrument};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::constants::{MODIS_COLLECTION, NDVI_BAND, TARGET_EPSG, TARGET_RESOLUTION};
use crate::error::PipelineError;
use crate::metrics;
use crate::response::NdviResponse;
use crate::scaling::{apply_scale, select_scale};
use crate::statistics::{AnnualStatistics, MonthlyStatistics};

/// Something that turns query parameters into an NDVI response.
///
/// Both transport surfaces depend only on this trait.
#[async_trait]
pub trait NdviRunner: Send + Sync {
    async fn run(&self, params: &QueryParameters) -> Result<NdviResponse, PipelineError>;
}

/// Pipeline over injected catalog and loader collaborators.
pub struct NdviPipeline {
    catalog: Arc<dyn CatalogClient>,
    loader: Arc<dyn RasterLoader>,
}

impl NdviPipeline {
    pub fn new(catalog: Arc<dyn CatalogClient>, loader: Arc<dyn RasterLoader>) -> Self {
        Self { catalog, loader }
    }

    /// Select the first catalog item for each sampled month, queried concurrently.
    ///
    /// Results are in calendar order regardless of completion order.
    pub async fn select_items(
        &self,
        bbox: &BoundingBox,
        year: &str,
    ) -> Result<Vec<(Month, StacItem)>, CatalogError> {
        let searches = Month::ALL.into_iter().map(|month| {
            let request = SearchRequest::new(MODIS_COLLECTION, *bbox, month.date_range(year));
            async move {
                metrics::record_catalog_query();
                let items = self.catalog.search_items(&request).await?;
                let matched = items.len();
                let item = items.into_iter().next().ok_or_else(|| CatalogError::NoItems {
                    collection: request.collection.clone(),
                    datetime: request.datetime.clone(),
                })?;

                if let Some(ts) = item.timestamp() {
                    if Month::from_timestamp(&ts) != Some(month) {
                        warn!(
                            month = %month,
                            item_id = %item.id,
                            datetime = %ts,
                            "Selected item timestamp falls outside the searched month"
                        );
                    }
                }
                debug!(month = %month, item_id = %item.id, matched = matched, "Selected item");
                Ok::<_, CatalogError>((month, item))
            }
        });

        try_join_all(searches).await
    }

    async fn execute(&self, params: &QueryParameters) -> Result<NdviResponse, PipelineError> {
        let bbox = params.bounding_box();
        let selected = self.select_items(&bbox, &params.year).await?;

        let scale = select_scale(&selected, NDVI_BAND)?;

        let (months, items): (Vec<Month>, Vec<StacItem>) = selected.into_iter().unzip();
        let request = LoadRequest {
            asset_key: NDVI_BAND.to_string(),
            bbox,
            epsg: TARGET_EPSG,
            resolution: TARGET_RESOLUTION,
        };
        let cube = self.loader.load(&items, &request).await?;
        if cube.slices.len() != months.len() {
            return Err(RasterLoadError::SliceCountMismatch {
                expected: months.len(),
                got: cube.slices.len(),
            }
            .into());
        }
        let (_, height, width) = cube.shape();
        debug!(slices = cube.slices.len(), height, width, scale, "Raster cube loaded");

        let mut by_month = BTreeMap::new();
        for (month, slice) in months.into_iter().zip(cube.slices.iter()) {
            let values = apply_scale(&slice.data, scale);
            let stats = MonthlyStatistics::compute(month, &values)?;
            debug!(
                month = %month,
                item_id = %slice.item_id,
                mean = stats.mean_ndvi,
                "Month statistics"
            );
            by_month.insert(month, stats);
        }

        let overall = AnnualStatistics::from_months(&by_month)?;
        Ok(NdviResponse::new(params, by_month, overall))
    }
}

#[async_trait]
impl NdviRunner for NdviPipeline {
    async fn run(&self, params: &QueryParameters) -> Result<NdviResponse, PipelineError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "ndvi_pipeline",
            %request_id,
            latitude = params.latitude,
            longitude = params.longitude,
            year = %params.year
        );

        async move {
            let start = Instant::now();
            let result = self.execute(params).await;
            let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
            metrics::record_pipeline_duration(elapsed_ms);

            match &result {
                Ok(response) => info!(
                    elapsed_ms,
                    mean_annual_ndvi = response.overall_stats.mean_annual_ndvi,
                    "Pipeline complete"
                ),
                Err(e) => warn!(elapsed_ms, stage = e.stage(), error = %e, "Pipeline failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

/// Runner that builds fresh network collaborators for every request.
pub struct LivePipeline {
    config: PipelineConfig,
}

impl LivePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

#[async_trait]
impl NdviRunner for LivePipeline {
    #[instrument(skip_all)]
    async fn run(&self, params: &QueryParameters) -> Result<NdviResponse, PipelineError> {
        let catalog = StacClient::new(&self.config.catalog)?;
        let loader = CogLoader::new(&self.config.loader)?;
        NdviPipeline::new(Arc::new(catalog), Arc::new(loader))
            .run(params)
            .await
    }
}
