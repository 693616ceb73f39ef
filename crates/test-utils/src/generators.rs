//! Test data generators for synthetic raster grids.
//!
//! These generators create predictable, verifiable patterns that can be used
//! across the test suite. All grids are row-major (row 0 first).

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// This makes it easy to verify that data is being resampled correctly
/// by checking that grid[row][col] == col * 1000 + row.
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[1], 1000.0);
/// assert_eq!(grid[10], 1.0);
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Creates a grid of raw MODIS-style NDVI counts.
///
/// Values ramp linearly from `min` at the first cell to `max` at the last,
/// so a scale of 0.0001 maps them to physical NDVI.
pub fn create_ndvi_ramp_grid(width: usize, height: usize, min: i16, max: i16) -> Vec<i16> {
    let n = width * height;
    if n <= 1 {
        return vec![min; n];
    }
    (0..n)
        .map(|i| {
            let t = i as f64 / (n - 1) as f64;
            (min as f64 + t * (max as f64 - min as f64)).round() as i16
        })
        .collect()
}

/// Creates a grid with `fill` everywhere except the given `(col, row, value)` cells.
///
/// Useful for placing no-data pixels or outliers.
pub fn create_grid_with_values<T: Copy>(
    width: usize,
    height: usize,
    fill: T,
    cells: &[(usize, usize, T)],
) -> Vec<T> {
    let mut data = vec![fill; width * height];
    for &(col, row, value) in cells {
        if col < width && row < height {
            data[row * width + col] = value;
        }
    }
    data
}
