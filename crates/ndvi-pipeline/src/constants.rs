//! Fixed dataset and processing parameters.

/// MODIS Terra vegetation indices, 16-day, 500 m.
pub const MODIS_COLLECTION: &str = "modis-13A1-061";

/// Asset key of the NDVI band.
pub const NDVI_BAND: &str = "500m_16_days_NDVI";

/// Output CRS (Web Mercator).
pub const TARGET_EPSG: u32 = 3857;

/// Output pixel size in meters.
pub const TARGET_RESOLUTION: f64 = 500.0;

/// Scaled NDVI value marking missing data (stored -3000 × 0.0001).
pub const NODATA_SENTINEL: f64 = -0.3;

/// Absolute tolerance for matching the sentinel.
pub const NODATA_TOLERANCE: f64 = 1e-6;

/// NDVI above which a pixel counts as harvestable.
pub const HARVESTABLE_THRESHOLD: f64 = 0.4;
