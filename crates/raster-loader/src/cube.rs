//! Multi-temporal raster stack.

use chrono::{DateTime, Utc};

use crate::grid::TargetGrid;

/// One time step of a cube: an item resampled onto the cube grid.
#[derive(Debug, Clone)]
pub struct TimeSlice {
    pub item_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    /// Row-major values on the cube grid, in stored (unscaled) units.
    pub data: Vec<f32>,
    /// Band no-data value; also used for pixels outside the item footprint.
    pub nodata: f32,
}

/// A time × y × x array of one band sharing a single grid.
///
/// Slices keep the order of the items they were loaded from.
#[derive(Debug, Clone)]
pub struct RasterCube {
    pub grid: TargetGrid,
    pub band: String,
    pub slices: Vec<TimeSlice>,
}

impl RasterCube {
    pub fn new(grid: TargetGrid, band: impl Into<String>, slices: Vec<TimeSlice>) -> Self {
        Self {
            grid,
            band: band.into(),
            slices,
        }
    }

    /// `(time, height, width)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.slices.len(), self.grid.height, self.grid.width)
    }
}
