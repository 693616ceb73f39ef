//! Common test fixtures for NDVI service tests.
//!
//! STAC JSON shaped like the Planetary Computer MODIS 13A1 collection, plus a
//! few well-known extents.

use serde_json::{json, Value};

/// MODIS vegetation index collection id.
pub const MODIS_COLLECTION: &str = "modis-13A1-061";

/// NDVI band asset key.
pub const NDVI_ASSET: &str = "500m_16_days_NDVI";

/// Scale from stored integer counts to NDVI.
pub const MODIS_NDVI_SCALE: f64 = 0.0001;

/// Stored no-data value of the NDVI band.
pub const MODIS_NDVI_NODATA: i16 = -3000;

/// Common bounding box definitions for testing, as `(west, south, east, north)`.
pub mod bbox {
    /// Box searched for the default query point (38.6, -121.5).
    pub const DEFAULT_QUERY: (f64, f64, f64, f64) = (-122.5, 37.6, -120.5, 39.6);

    /// Web Mercator extent of `DEFAULT_QUERY`, in meters.
    pub const DEFAULT_QUERY_3857: (f64, f64, f64, f64) = (
        -13_636_637.622,
        4_523_072.319,
        -13_413_998.641,
        4_807_984.493,
    );
}

/// Builder for a single STAC item JSON document.
#[derive(Debug, Clone)]
pub struct ItemFixture {
    pub id: String,
    pub datetime: String,
    pub href: String,
    pub scale: Option<f64>,
    pub nodata: Option<f64>,
    pub shape: Option<[usize; 2]>,
    pub transform: Option<[f64; 6]>,
    pub epsg: Option<u32>,
    pub wkt2: Option<String>,
}

impl ItemFixture {
    /// A MODIS NDVI item starting on the first day of `year-month`.
    pub fn modis(year: &str, month_code: &str, href: impl Into<String>) -> Self {
        Self {
            id: format!("MOD13A1.A{}{}.h08v05.061", year, month_code),
            datetime: format!("{}-{}-01T00:00:00Z", year, month_code),
            href: href.into(),
            scale: Some(MODIS_NDVI_SCALE),
            nodata: Some(MODIS_NDVI_NODATA as f64),
            shape: None,
            transform: None,
            epsg: None,
            wkt2: None,
        }
    }

    pub fn scale(mut self, scale: Option<f64>) -> Self {
        self.scale = scale;
        self
    }

    pub fn georeference(mut self, shape: [usize; 2], transform: [f64; 6], epsg: u32) -> Self {
        self.shape = Some(shape);
        self.transform = Some(transform);
        self.epsg = Some(epsg);
        self
    }

    pub fn wkt2(mut self, wkt: impl Into<String>) -> Self {
        self.wkt2 = Some(wkt.into());
        self
    }

    /// Render as STAC item JSON.
    pub fn to_json(&self) -> Value {
        let mut band = serde_json::Map::new();
        band.insert("data_type".into(), json!("int16"));
        band.insert("unit".into(), json!("NDVI"));
        if let Some(scale) = self.scale {
            band.insert("scale".into(), json!(scale));
        }
        if let Some(nodata) = self.nodata {
            band.insert("nodata".into(), json!(nodata));
        }

        let mut asset = json!({
            "href": self.href,
            "type": "image/tiff; application=geotiff; profile=cloud-optimized",
            "roles": ["data"],
            "raster:bands": [Value::Object(band)]
        });
        if let Some(shape) = self.shape {
            asset["proj:shape"] = json!(shape);
        }
        if let Some(transform) = self.transform {
            asset["proj:transform"] = json!(transform);
        }

        let mut properties = json!({
            "datetime": null,
            "start_datetime": self.datetime,
            "end_datetime": self.datetime,
        });
        properties["proj:epsg"] = self.epsg.map_or(Value::Null, |e| json!(e));
        if let Some(wkt) = &self.wkt2 {
            properties["proj:wkt2"] = json!(wkt);
        }

        json!({
            "type": "Feature",
            "stac_version": "1.0.0",
            "id": self.id,
            "collection": MODIS_COLLECTION,
            "bbox": [-130.5, 29.9, -103.9, 40.0],
            "geometry": null,
            "properties": properties,
            "assets": { NDVI_ASSET: asset },
            "links": []
        })
    }
}

/// A search results page with an optional `next` link.
pub fn item_collection(features: Vec<Value>, next: Option<Value>) -> Value {
    let returned = features.len();
    let mut links = vec![json!({"rel": "self", "href": "http://localhost/search"})];
    if let Some(next) = next {
        links.push(next);
    }
    json!({
        "type": "FeatureCollection",
        "features": features,
        "links": links,
        "numberReturned": returned,
    })
}

/// WKT2 for the MODIS sinusoidal grid, as published in `proj:wkt2`.
pub const MODIS_SINUSOIDAL_WKT: &str = r#"PROJCS["unnamed",GEOGCS["Unknown datum based upon the custom spheroid",DATUM["Not specified (based on custom spheroid)",SPHEROID["Custom spheroid",6371007.181,0]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]],PROJECTION["Sinusoidal"],PARAMETER["longitude_of_center",0],PARAMETER["false_easting",0],PARAMETER["false_northing",0],UNIT["Meter",1]]"#;
