//! STAC API client.
//!
//! Searches a STAC-compatible catalog for items by collection, bounding box
//! and datetime, following pagination links, and signs returned asset hrefs
//! so they can be downloaded.

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod signing;

pub use catalog::{month_interval, CatalogClient, SearchRequest};
pub use client::StacClient;
pub use config::{CatalogConfig, SigningMode};
pub use error::{CatalogError, Result};
pub use models::{RasterBand, StacAsset, StacItem, StacItemCollection, StacLink, StacSearchParams};
pub use signing::{AssetSigner, NoopSigner, PlanetaryComputerSigner};
