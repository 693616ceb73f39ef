//! Spherical Web Mercator projection (EPSG:3857).
//!
//! Used as the target grid for all loaded rasters. Coordinates are meters on
//! a sphere with the WGS84 semi-major axis.

use std::f64::consts::PI;

/// Sphere radius used by EPSG:3857 (WGS84 semi-major axis, meters).
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude limit where the projection becomes square (degrees).
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Half the world width/height in projected meters.
pub const MAX_EXTENT: f64 = PI * EARTH_RADIUS;

/// Web Mercator projection.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercator;

impl WebMercator {
    /// Convert geographic coordinates (degrees) to projected (x, y) meters.
    ///
    /// Latitudes are clamped to ±[`MAX_LATITUDE`].
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let lat = lat_deg.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = EARTH_RADIUS * lon_deg.to_radians();
        let y = EARTH_RADIUS * (PI / 4.0 + lat / 2.0).tan().ln();
        (x, y)
    }

    /// Convert projected (x, y) meters back to (lon, lat) degrees.
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let lon = (x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
        (lon, lat)
    }
}
