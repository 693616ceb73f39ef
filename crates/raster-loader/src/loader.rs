//! Loading STAC assets into a raster cube.

use async_trait::async_trait;
use bytes::Bytes;
use futures::future::try_join_all;
use ndvi_common::BoundingBox;
use projection::Projection;
use stac_client::{RasterBand, StacItem};
use tracing::{debug, instrument};

use crate::config::LoaderConfig;
use crate::cube::{RasterCube, TimeSlice};
use crate::error::{RasterLoadError, Result};
use crate::geotransform::GeoTransform;
use crate::grid::TargetGrid;
use crate::resample::{resample_nearest, Resampled};
use crate::source::decode_geotiff;

/// What to load and onto which grid.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    /// Asset key of the band, e.g. `500m_16_days_NDVI`.
    pub asset_key: String,
    /// Geographic area to cover.
    pub bbox: BoundingBox,
    /// EPSG code of the output CRS.
    pub epsg: u32,
    /// Output pixel size in CRS units.
    pub resolution: f64,
}

/// Loads one band of several items into a cube on a shared grid.
#[async_trait]
pub trait RasterLoader: Send + Sync {
    /// Slices are returned in the order of `items`.
    async fn load(&self, items: &[StacItem], request: &LoadRequest) -> Result<RasterCube>;
}

/// Loader that downloads whole (Cloud Optimized) GeoTIFF assets over HTTP.
pub struct CogLoader {
    http: reqwest::Client,
}

impl CogLoader {
    pub fn new(config: &LoaderConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { http })
    }

    async fn fetch(&self, href: &str) -> Result<Bytes> {
        let response = self.http.get(href).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RasterLoadError::Status {
                status: status.as_u16(),
                url: redact(href).to_string(),
            });
        }
        Ok(response.bytes().await?)
    }

    #[instrument(skip_all, fields(item_id = %item.id))]
    async fn load_slice(
        &self,
        item: &StacItem,
        asset_key: &str,
        grid: &TargetGrid,
    ) -> Result<TimeSlice> {
        let asset = item
            .asset(asset_key)
            .ok_or_else(|| RasterLoadError::MissingAsset {
                item_id: item.id.clone(),
                asset: asset_key.to_string(),
            })?;

        let nodata = asset
            .raster_bands()
            .and_then(|bands| bands.first().and_then(RasterBand::nodata_value))
            .map(|v| v as f32)
            .unwrap_or(f32::NAN);
        let source_projection = source_projection(item, asset_key)?;
        let proj_transform = item.proj_transform(asset_key);
        let proj_shape = item.proj_shape(asset_key);

        debug!(href = %redact(&asset.href), "Downloading asset");
        let bytes = self.fetch(&asset.href).await?;
        debug!(bytes = bytes.len(), "Asset downloaded");

        let item_id = item.id.clone();
        let target = grid.clone();
        let resampled = tokio::task::spawn_blocking(move || -> Result<Resampled> {
            let source = decode_geotiff(&bytes)?;

            if let Some(shape) = proj_shape.as_deref() {
                if shape != [source.height, source.width] {
                    return Err(RasterLoadError::missing_metadata(
                        &item_id,
                        format!(
                            "proj:shape {:?} does not match decoded {}x{}",
                            shape, source.height, source.width
                        ),
                    ));
                }
            }

            let transform = match proj_transform {
                Some(coeffs) => GeoTransform::from_proj_transform(&coeffs).ok_or_else(|| {
                    RasterLoadError::missing_metadata(&item_id, "proj:transform is not invertible")
                })?,
                None => source.tag_transform.ok_or_else(|| {
                    RasterLoadError::missing_metadata(
                        &item_id,
                        "no proj:transform and no GeoTIFF georeferencing tags",
                    )
                })?,
            };

            Ok(resample_nearest(
                &source,
                &transform,
                &source_projection,
                &target,
                nodata,
            ))
        })
        .await??;

        if resampled.covered == 0 {
            return Err(RasterLoadError::NoOverlap {
                item_id: item.id.clone(),
            });
        }
        debug!(covered = resampled.covered, total = grid.len(), "Asset resampled");

        Ok(TimeSlice {
            item_id: item.id.clone(),
            timestamp: item.timestamp(),
            data: resampled.data,
            nodata,
        })
    }
}

#[async_trait]
impl RasterLoader for CogLoader {
    #[instrument(skip(self, items), fields(items = items.len(), asset = %request.asset_key))]
    async fn load(&self, items: &[StacItem], request: &LoadRequest) -> Result<RasterCube> {
        if items.is_empty() {
            return Err(RasterLoadError::NoItems);
        }

        let grid =
            TargetGrid::from_geographic_bbox(&request.bbox, request.epsg, request.resolution)?;
        debug!(
            width = grid.width,
            height = grid.height,
            epsg = grid.epsg,
            "Target grid"
        );

        let slices = try_join_all(
            items
                .iter()
                .map(|item| self.load_slice(item, &request.asset_key, &grid)),
        )
        .await?;

        Ok(RasterCube::new(grid, request.asset_key.clone(), slices))
    }
}

/// CRS of an asset: `proj:epsg` when set, otherwise `proj:wkt2`.
fn source_projection(item: &StacItem, asset_key: &str) -> Result<Projection> {
    if let Some(code) = item.proj_epsg(asset_key) {
        return Ok(Projection::from_epsg(code)?);
    }
    if let Some(wkt) = item.proj_wkt2(asset_key) {
        return Ok(Projection::from_wkt(&wkt)?);
    }
    Err(RasterLoadError::missing_metadata(
        &item.id,
        "neither proj:epsg nor proj:wkt2 is set",
    ))
}

/// Href without its query string, so SAS tokens stay out of logs.
fn redact(href: &str) -> &str {
    href.split('?').next().unwrap_or(href)
}
