//! Coordinate reference system transformations.
//!
//! Implements the handful of projections NDVI assets and the output grid use,
//! from scratch without external dependencies.

pub mod mercator;
pub mod sinusoidal;

pub use mercator::WebMercator;
pub use sinusoidal::Sinusoidal;

use thiserror::Error;

/// Errors raised while identifying a coordinate reference system.
#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("unsupported EPSG code: {0}")]
    UnsupportedEpsg(u32),

    #[error("unsupported WKT projection: {0}")]
    UnsupportedWkt(String),
}

/// A coordinate reference system that rasters can be read from or written to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Longitude/latitude in degrees (EPSG:4326).
    Geographic,
    /// Spherical Web Mercator (EPSG:3857).
    WebMercator,
    /// Sinusoidal (MODIS tile grid).
    Sinusoidal(Sinusoidal),
}

impl Projection {
    /// Identify a projection from its EPSG code.
    pub fn from_epsg(code: u32) -> Result<Self, ProjectionError> {
        match code {
            4326 => Ok(Projection::Geographic),
            3857 | 900913 => Ok(Projection::WebMercator),
            other => Err(ProjectionError::UnsupportedEpsg(other)),
        }
    }

    /// Identify a projection from WKT1 or WKT2 text.
    ///
    /// Only the projection method is inspected; for sinusoidal grids the
    /// sphere radius and central meridian are read when present.
    pub fn from_wkt(wkt: &str) -> Result<Self, ProjectionError> {
        let lower = wkt.to_ascii_lowercase();

        if lower.contains("sinusoidal") {
            let mut proj = Sinusoidal::modis();
            if let Some(radius) = wkt_number_after(&lower, "spheroid[")
                .or_else(|| wkt_number_after(&lower, "ellipsoid["))
            {
                proj.radius = radius;
            }
            if let Some(lon0) = wkt_number_after(&lower, "\"central_meridian\"")
                .or_else(|| wkt_number_after(&lower, "\"longitude_of_center\""))
                .or_else(|| wkt_number_after(&lower, "\"longitude of natural origin\""))
            {
                proj.central_meridian = lon0;
            }
            return Ok(Projection::Sinusoidal(proj));
        }

        if lower.contains("pseudo-mercator")
            || lower.contains("popular visualisation")
            || lower.contains("\"epsg\",3857")
            || lower.contains("\"epsg\",\"3857\"")
        {
            return Ok(Projection::WebMercator);
        }

        let projected = lower.starts_with("projcs") || lower.starts_with("projcrs");
        if !projected && (lower.starts_with("geogcs") || lower.starts_with("geogcrs")) {
            return Ok(Projection::Geographic);
        }

        let head: String = wkt.chars().take(80).collect();
        Err(ProjectionError::UnsupportedWkt(head))
    }

    /// Project geographic (lon, lat) degrees into this CRS.
    pub fn from_geographic(&self, lon: f64, lat: f64) -> (f64, f64) {
        match self {
            Projection::Geographic => (lon, lat),
            Projection::WebMercator => WebMercator.forward(lon, lat),
            Projection::Sinusoidal(proj) => proj.forward(lon, lat),
        }
    }

    /// Unproject (x, y) in this CRS to geographic (lon, lat) degrees.
    ///
    /// Returns `None` when the point lies outside the valid domain.
    pub fn to_geographic(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        match self {
            Projection::Geographic => Some((x, y)),
            Projection::WebMercator => Some(WebMercator.inverse(x, y)),
            Projection::Sinusoidal(proj) => proj.inverse(x, y),
        }
    }

    /// Transform a point from this CRS into `target`.
    pub fn transform_to(&self, target: &Projection, x: f64, y: f64) -> Option<(f64, f64)> {
        if self == target {
            return Some((x, y));
        }
        let (lon, lat) = self.to_geographic(x, y)?;
        Some(target.from_geographic(lon, lat))
    }
}

/// First number following `key` and an optional quoted name, e.g.
/// `spheroid["custom",6371007.181,0]` yields 6371007.181.
fn wkt_number_after(wkt: &str, key: &str) -> Option<f64> {
    let start = wkt.find(key)? + key.len();
    let rest = &wkt[start..];
    rest.split(',')
        .map(|part| part.trim().trim_end_matches(']'))
        .find_map(|part| part.parse::<f64>().ok())
}
