//! Raster loading for STAC assets.
//!
//! Downloads a band of each catalog item, decodes the GeoTIFF, and resamples
//! it with nearest-neighbour lookup onto one projected grid covering the
//! requested bounding box. The result is a time-ordered [`RasterCube`].

pub mod config;
pub mod cube;
pub mod error;
pub mod geotransform;
pub mod grid;
pub mod loader;
pub mod resample;
pub mod source;

pub use config::LoaderConfig;
pub use cube::{RasterCube, TimeSlice};
pub use error::{RasterLoadError, Result};
pub use geotransform::GeoTransform;
pub use grid::TargetGrid;
pub use loader::{CogLoader, LoadRequest, RasterLoader};
pub use resample::{resample_nearest, Resampled};
pub use source::{decode_geotiff, SourceRaster};
