//! Sinusoidal equal-area projection.
//!
//! MODIS land products are distributed on a sinusoidal grid defined on a
//! sphere of radius 6371007.181 m with the central meridian at 0°.

/// Sphere radius of the MODIS sinusoidal grid (meters).
pub const MODIS_SPHERE_RADIUS: f64 = 6_371_007.181;

/// Sinusoidal projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sinusoidal {
    /// Sphere radius (meters)
    pub radius: f64,
    /// Central meridian (degrees)
    pub central_meridian: f64,
    /// False easting (meters)
    pub false_easting: f64,
    /// False northing (meters)
    pub false_northing: f64,
}

impl Sinusoidal {
    /// The MODIS tile grid projection.
    pub fn modis() -> Self {
        Self {
            radius: MODIS_SPHERE_RADIUS,
            central_meridian: 0.0,
            false_easting: 0.0,
            false_northing: 0.0,
        }
    }

    /// Convert geographic coordinates (degrees) to projected (x, y) meters.
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let lat = lat_deg.to_radians();
        let dlon = normalize_degrees(lon_deg - self.central_meridian).to_radians();
        let x = self.radius * dlon * lat.cos() + self.false_easting;
        let y = self.radius * lat + self.false_northing;
        (x, y)
    }

    /// Convert projected (x, y) meters back to (lon, lat) degrees.
    ///
    /// Returns `None` for points outside the projected world outline
    /// (longitude beyond ±180° of the central meridian).
    pub fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let lat = (y - self.false_northing) / self.radius;
        if lat.abs() > std::f64::consts::FRAC_PI_2 {
            return None;
        }

        let cos_lat = lat.cos();
        if cos_lat.abs() < 1e-12 {
            return Some((self.central_meridian, lat.to_degrees()));
        }

        let dlon = (x - self.false_easting) / (self.radius * cos_lat);
        if dlon.abs() > std::f64::consts::PI + 1e-12 {
            return None;
        }

        Some((
            normalize_degrees(self.central_meridian + dlon.to_degrees()),
            lat.to_degrees(),
        ))
    }
}

impl Default for Sinusoidal {
    fn default() -> Self {
        Self::modis()
    }
}

/// Wrap a longitude difference into [-180, 180].
fn normalize_degrees(mut deg: f64) -> f64 {
    while deg > 180.0 {
        deg -= 360.0;
    }
    while deg < -180.0 {
        deg += 360.0;
    }
    deg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modis_tile_corner() {
        // Upper-left corner of MODIS tile h08v05 is (-11119505.197, 4447802.079)
        let proj = Sinusoidal::modis();
        let (lon, lat) = proj.inverse(-11_119_505.196_667, 4_447_802.078_667).unwrap();
        assert!((lat - 40.0).abs() < 1e-6, "lat = {}", lat);

        let (x, y) = proj.forward(lon, lat);
        assert!((x - (-11_119_505.196_667)).abs() < 1e-3);
        assert!((y - 4_447_802.078_667).abs() < 1e-3);
    }

    #[test]
    fn test_roundtrip() {
        let proj = Sinusoidal::modis();
        for (lon, lat) in [(-121.5, 38.6), (0.0, 0.0), (45.0, -60.0), (179.0, 10.0)] {
            let (x, y) = proj.forward(lon, lat);
            let (rlon, rlat) = proj.inverse(x, y).unwrap();
            assert!((rlon - lon).abs() < 1e-9);
            assert!((rlat - lat).abs() < 1e-9);
        }
    }

    #[test]
    fn test_outside_world() {
        let proj = Sinusoidal::modis();
        // x far beyond the width of the projected world at 60°N
        assert!(proj.inverse(19_000_000.0, 6_671_703.0).is_none());
        assert!(proj.inverse(0.0, 10_100_000.0).is_none());
    }
}
