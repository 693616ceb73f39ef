//! STAC (SpatioTemporal Asset Catalog) data types.
//!
//! Serde models for STAC API Item Search covering what the NDVI pipeline
//! needs: search filters, pagination links, item datetimes, assets, and the
//! `raster` and `proj` extension fields carried on assets and properties.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use ndvi_common::BoundingBox;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Search request
// ---------------------------------------------------------------------------

/// Body for `POST /search` (STAC API Item Search).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StacSearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub collections: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Pagination token carried by some catalogs' `next` link bodies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl StacSearchParams {
    /// Create empty search params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bounding box `[west, south, east, north]`.
    pub fn bbox(mut self, bbox: &BoundingBox) -> Self {
        self.bbox = Some(bbox.to_array().to_vec());
        self
    }

    /// Set an RFC 3339 datetime or interval
    /// (e.g. `"2021-07-01T00:00:00Z/2021-07-31T23:59:59Z"`).
    pub fn datetime(mut self, dt: &str) -> Self {
        self.datetime = Some(dt.to_string());
        self
    }

    /// Set collection filter.
    pub fn collections(mut self, cols: &[&str]) -> Self {
        self.collections = Some(cols.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Set maximum items per page.
    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A page of search results (GeoJSON FeatureCollection).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StacItemCollection {
    #[serde(rename = "type", default = "feature_collection_type")]
    pub type_: String,

    #[serde(default)]
    pub features: Vec<StacItem>,

    #[serde(default)]
    pub links: Vec<StacLink>,

    #[serde(rename = "numberMatched", skip_serializing_if = "Option::is_none")]
    pub number_matched: Option<u64>,

    #[serde(rename = "numberReturned", skip_serializing_if = "Option::is_none")]
    pub number_returned: Option<u64>,
}

impl StacItemCollection {
    /// Find the `"next"` pagination link, if any.
    pub fn next_link(&self) -> Option<&StacLink> {
        self.links.iter().find(|l| l.rel == "next")
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

fn feature_collection_type() -> String {
    "FeatureCollection".to_string()
}

fn feature_type() -> String {
    "Feature".to_string()
}

/// A link object. Pagination links may carry a POST body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StacLink {
    pub rel: String,

    pub href: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,

    /// When true the body is merged into the previous request body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge: Option<bool>,
}

/// A single STAC Item (GeoJSON Feature).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StacItem {
    #[serde(rename = "type", default = "feature_type")]
    pub type_: String,

    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,

    pub properties: ItemProperties,

    #[serde(default)]
    pub assets: HashMap<String, StacAsset>,

    #[serde(default)]
    pub links: Vec<StacLink>,
}

/// Item properties. Extension fields are kept in `extra`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ItemProperties {
    #[serde(default)]
    pub datetime: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_datetime: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_datetime: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A downloadable asset of an item.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StacAsset {
    pub href: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of the `raster:bands` extension array.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RasterBand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,

    /// Number, or one of the strings "nan", "inf", "-inf".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodata: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl RasterBand {
    /// The no-data value as a float, if declared.
    pub fn nodata_value(&self) -> Option<f64> {
        match self.nodata.as_ref()? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "nan" => Some(f64::NAN),
                "inf" => Some(f64::INFINITY),
                "-inf" => Some(f64::NEG_INFINITY),
                other => other.parse().ok(),
            },
            _ => None,
        }
    }
}

impl StacAsset {
    /// Parsed `raster:bands`, or `None` when absent or malformed.
    pub fn raster_bands(&self) -> Option<Vec<RasterBand>> {
        let bands = self.extra.get("raster:bands")?;
        serde_json::from_value(bands.clone()).ok()
    }

    /// Scale factor of the first raster band.
    pub fn scale(&self) -> Option<f64> {
        self.raster_bands()?.first()?.scale
    }
}

impl StacItem {
    /// Get an asset by key.
    pub fn asset(&self, key: &str) -> Option<&StacAsset> {
        self.assets.get(key)
    }

    /// Acquisition timestamp: `datetime`, falling back to `start_datetime`.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.properties.datetime.or(self.properties.start_datetime)
    }

    /// `proj:transform` for an asset, falling back to the item properties.
    pub fn proj_transform(&self, asset_key: &str) -> Option<Vec<f64>> {
        let value = self.proj_field(asset_key, "proj:transform")?;
        serde_json::from_value(value.clone()).ok()
    }

    /// `proj:shape` (`[rows, cols]`) for an asset, falling back to the item properties.
    pub fn proj_shape(&self, asset_key: &str) -> Option<Vec<usize>> {
        let value = self.proj_field(asset_key, "proj:shape")?;
        serde_json::from_value(value.clone()).ok()
    }

    /// `proj:epsg` for an asset, falling back to the item properties.
    pub fn proj_epsg(&self, asset_key: &str) -> Option<u32> {
        self.proj_field(asset_key, "proj:epsg")?
            .as_u64()
            .map(|v| v as u32)
    }

    /// `proj:wkt2` for an asset, falling back to the item properties.
    pub fn proj_wkt2(&self, asset_key: &str) -> Option<String> {
        self.proj_field(asset_key, "proj:wkt2")?
            .as_str()
            .map(str::to_string)
    }

    fn proj_field(&self, asset_key: &str, field: &str) -> Option<&Value> {
        self.asset(asset_key)
            .and_then(|a| a.extra.get(field))
            .filter(|v| !v.is_null())
            .or_else(|| self.properties.extra.get(field).filter(|v| !v.is_null()))
    }
}
