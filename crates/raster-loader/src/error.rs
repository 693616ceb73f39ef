//! Error types for raster loading.

use projection::ProjectionError;
use thiserror::Error;

/// Errors that can occur while loading assets into a raster cube.
#[derive(Error, Debug)]
pub enum RasterLoadError {
    /// Nothing was given to load.
    #[error("no items to load")]
    NoItems,

    /// The item has no asset under the requested key.
    #[error("item {item_id} has no asset '{asset}'")]
    MissingAsset { item_id: String, asset: String },

    /// Georeferencing or band metadata is absent or unusable.
    #[error("item {item_id} is missing metadata: {detail}")]
    MissingMetadata { item_id: String, detail: String },

    /// Transport failure downloading an asset.
    #[error("asset download failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The asset host answered with a non-success status.
    #[error("asset download returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The asset bytes are not a readable TIFF.
    #[error("failed to decode raster: {0}")]
    Decode(String),

    /// The source or target CRS is not supported.
    #[error("projection error: {0}")]
    Projection(#[from] ProjectionError),

    /// Sample format the loader cannot convert.
    #[error("unsupported raster data type: {0}")]
    UnsupportedDataType(String),

    /// The asset footprint does not intersect the target grid.
    #[error("item {item_id} does not overlap the requested area")]
    NoOverlap { item_id: String },

    /// The cube does not hold one slice per requested item.
    #[error("expected {expected} raster slices, got {got}")]
    SliceCountMismatch { expected: usize, got: usize },

    /// The requested target grid is degenerate.
    #[error("invalid target grid: {0}")]
    InvalidGrid(String),

    /// A blocking decode task failed to complete.
    #[error("raster task failed: {0}")]
    Task(String),
}

impl RasterLoadError {
    /// Create a MissingMetadata error.
    pub fn missing_metadata(item_id: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MissingMetadata {
            item_id: item_id.into(),
            detail: detail.into(),
        }
    }

    /// Create a Decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

impl From<tiff::TiffError> for RasterLoadError {
    fn from(err: tiff::TiffError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<tokio::task::JoinError> for RasterLoadError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

/// Result type for raster loading.
pub type Result<T> = std::result::Result<T, RasterLoadError>;
