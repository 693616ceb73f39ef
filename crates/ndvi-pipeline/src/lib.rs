//! NDVI statistics for a point and year.
//!
//! The pipeline searches the MODIS 13A1 collection for January, April, July
//! and October, loads the NDVI band of the first item of each month onto a
//! 500 m Web Mercator grid, and reports per-month and annual statistics.

pub mod config;
pub mod constants;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod response;
pub mod scaling;
pub mod statistics;

pub use config::PipelineConfig;
pub use error::{PipelineError, StatisticsError};
pub use pipeline::{LivePipeline, NdviPipeline, NdviRunner};
pub use response::NdviResponse;
pub use statistics::{AnnualStatistics, MonthlyStatistics};
