//! Output grid definition.

use ndvi_common::BoundingBox;
use projection::Projection;

use crate::error::{RasterLoadError, Result};

/// A north-up grid of square pixels in a projected CRS.
///
/// Edges are snapped outward to multiples of the resolution so the same
/// geographic box always yields the same pixel lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetGrid {
    pub epsg: u32,
    pub projection: Projection,
    pub resolution: f64,
    /// Left edge in CRS units.
    pub min_x: f64,
    /// Top edge in CRS units.
    pub max_y: f64,
    pub width: usize,
    pub height: usize,
}

impl TargetGrid {
    /// Grid covering a geographic bounding box in the CRS `epsg`.
    pub fn from_geographic_bbox(bbox: &BoundingBox, epsg: u32, resolution: f64) -> Result<Self> {
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(RasterLoadError::InvalidGrid(format!(
                "resolution must be positive, got {}",
                resolution
            )));
        }
        if !(bbox.width() > 0.0 && bbox.height() > 0.0) {
            return Err(RasterLoadError::InvalidGrid(format!(
                "empty bounding box {:?}",
                bbox.to_array()
            )));
        }

        let projection = Projection::from_epsg(epsg)?;
        let corners = [
            projection.from_geographic(bbox.min_x, bbox.min_y),
            projection.from_geographic(bbox.min_x, bbox.max_y),
            projection.from_geographic(bbox.max_x, bbox.min_y),
            projection.from_geographic(bbox.max_x, bbox.max_y),
        ];

        let min_x = corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min);
        let max_x = corners.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max);
        let min_y = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min);
        let max_y = corners.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max);

        let min_x = (min_x / resolution).floor() * resolution;
        let max_x = (max_x / resolution).ceil() * resolution;
        let min_y = (min_y / resolution).floor() * resolution;
        let max_y = (max_y / resolution).ceil() * resolution;

        let width = ((max_x - min_x) / resolution).round() as usize;
        let height = ((max_y - min_y) / resolution).round() as usize;

        Ok(Self {
            epsg,
            projection,
            resolution,
            min_x,
            max_y,
            width,
            height,
        })
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Projected extent of the grid.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(
            self.min_x,
            self.max_y - self.height as f64 * self.resolution,
            self.min_x + self.width as f64 * self.resolution,
            self.max_y,
        )
    }

    /// CRS coordinates of the center of pixel `(col, row)`.
    pub fn pixel_center(&self, col: usize, row: usize) -> (f64, f64) {
        (
            self.min_x + (col as f64 + 0.5) * self.resolution,
            self.max_y - (row as f64 + 0.5) * self.resolution,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_grid() {
        let (west, south, east, north) = test_utils::bbox::DEFAULT_QUERY;
        let bbox = BoundingBox::new(west, south, east, north);
        let grid = TargetGrid::from_geographic_bbox(&bbox, 3857, 500.0).unwrap();

        assert_eq!(grid.projection, Projection::WebMercator);
        assert_eq!(grid.min_x, -13_637_000.0);
        assert_eq!(grid.max_y, 4_808_000.0);
        assert_eq!(grid.width, 447);
        assert_eq!(grid.height, 570);

        let bounds = grid.bounds();
        assert_eq!(bounds.min_y, 4_523_000.0);
        assert_eq!(bounds.max_x, -13_413_500.0);

        // Snapped outward by less than one pixel on every side.
        let (min_x, min_y, max_x, max_y) = test_utils::bbox::DEFAULT_QUERY_3857;
        for (snapped, exact) in [
            (min_x - bounds.min_x, min_x),
            (min_y - bounds.min_y, min_y),
            (bounds.max_x - max_x, max_x),
            (bounds.max_y - max_y, max_y),
        ] {
            assert!((0.0..500.0).contains(&snapped), "{} snapped by {}", exact, snapped);
        }
    }

    #[test]
    fn test_pixel_centers() {
        let bbox = BoundingBox::new(0.0, 0.0, 0.01, 0.01);
        let grid = TargetGrid::from_geographic_bbox(&bbox, 3857, 500.0).unwrap();
        assert_eq!(grid.min_x, 0.0);
        assert_eq!(grid.pixel_center(0, 0), (250.0, grid.max_y - 250.0));
        assert_eq!(grid.width, 3);
    }

    #[test]
    fn test_invalid_grids() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        assert!(matches!(
            TargetGrid::from_geographic_bbox(&bbox, 3857, 0.0),
            Err(RasterLoadError::InvalidGrid(_))
        ));
        assert!(matches!(
            TargetGrid::from_geographic_bbox(&BoundingBox::new(1.0, 1.0, 1.0, 2.0), 3857, 500.0),
            Err(RasterLoadError::InvalidGrid(_))
        ));
        assert!(matches!(
            TargetGrid::from_geographic_bbox(&bbox, 32610, 500.0),
            Err(RasterLoadError::Projection(_))
        ));
    }
}
