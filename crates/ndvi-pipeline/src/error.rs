//! Pipeline error types.

use ndvi_common::{Month, ValidationError};
use raster_loader::RasterLoadError;
use stac_client::CatalogError;
use thiserror::Error;

/// Errors raised while computing statistics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatisticsError {
    /// Every pixel of a month was masked.
    #[error("no valid pixels for {month}")]
    NoValidPixels { month: Month },

    /// Annual statistics need at least one month.
    #[error("no monthly statistics to aggregate")]
    NoMonths,
}

/// Any failure of a pipeline run. Stages fail fast; there are no partial results.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid parameters: {0}")]
    Validation(#[from] ValidationError),

    #[error("catalog query failed: {0}")]
    Catalog(#[from] CatalogError),

    #[error("raster load failed: {0}")]
    RasterLoad(#[from] RasterLoadError),

    #[error("statistics failed: {0}")]
    Statistics(#[from] StatisticsError),
}

impl PipelineError {
    /// Short stage label for logs and metrics.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "validation",
            PipelineError::Catalog(_) => "catalog",
            PipelineError::RasterLoad(_) => "raster_load",
            PipelineError::Statistics(_) => "statistics",
        }
    }
}
