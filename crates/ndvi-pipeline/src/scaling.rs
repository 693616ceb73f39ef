//! Band scale factor selection and application.

use ndvi_common::Month;
use raster_loader::RasterLoadError;
use stac_client::StacItem;
use tracing::warn;

/// First `raster:bands` scale of `band` on `item`.
pub fn band_scale(item: &StacItem, band: &str) -> Option<f64> {
    item.asset(band)?.scale()
}

/// The scale applied to every month: the January item's.
///
/// Other months are only checked, and a differing scale is logged.
pub fn select_scale(items: &[(Month, StacItem)], band: &str) -> Result<f64, RasterLoadError> {
    let (_, january) = items
        .iter()
        .find(|(month, _)| *month == Month::January)
        .ok_or_else(|| {
            RasterLoadError::missing_metadata("<none>", "no January item to read the scale from")
        })?;

    let scale = band_scale(january, band).ok_or_else(|| {
        RasterLoadError::missing_metadata(
            &january.id,
            format!("asset '{}' has no raster:bands scale", band),
        )
    })?;

    for (month, item) in items {
        if let Some(other) = band_scale(item, band) {
            if other != scale {
                warn!(
                    month = %month,
                    item_id = %item.id,
                    scale = other,
                    january_scale = scale,
                    "Scale differs from January; applying January's"
                );
            }
        }
    }

    Ok(scale)
}

/// Convert stored values to physical units.
pub fn apply_scale(data: &[f32], scale: f64) -> Vec<f64> {
    data.iter().map(|&v| v as f64 * scale).collect()
}
