//! Nearest-neighbour resampling onto a target grid.

use projection::Projection;

use crate::geotransform::GeoTransform;
use crate::grid::TargetGrid;
use crate::source::SourceRaster;

/// Result of resampling one source raster.
#[derive(Debug, Clone)]
pub struct Resampled {
    pub data: Vec<f32>,
    /// Target pixels that fell inside the source footprint.
    pub covered: usize,
}

/// Nearest-neighbour lookup of a source pixel at a fractional position.
///
/// `x`/`y` are pixel-space coordinates where integer values are pixel corners,
/// so the containing pixel is found by flooring.
pub fn nearest_sample(source: &SourceRaster, x: f64, y: f64) -> Option<f32> {
    if !(x >= 0.0 && y >= 0.0) {
        return None;
    }
    source.get(x.floor() as usize, y.floor() as usize)
}

/// Resample `source` onto `grid`.
///
/// Each target pixel center is transformed into the source CRS and mapped
/// through the inverse of `transform`. Target pixels outside the source are
/// set to `fill`.
pub fn resample_nearest(
    source: &SourceRaster,
    transform: &GeoTransform,
    source_projection: &Projection,
    grid: &TargetGrid,
    fill: f32,
) -> Resampled {
    let mut output = vec![fill; grid.len()];
    let mut covered = 0usize;

    for row in 0..grid.height {
        for col in 0..grid.width {
            let (x, y) = grid.pixel_center(col, row);

            let Some((sx, sy)) = grid.projection.transform_to(source_projection, x, y) else {
                continue;
            };
            let Some((px, py)) = transform.world_to_pixel(sx, sy) else {
                continue;
            };

            if let Some(value) = nearest_sample(source, px, py) {
                output[row * grid.width + col] = value;
                covered += 1;
            }
        }
    }

    Resampled {
        data: output,
        covered,
    }
}
