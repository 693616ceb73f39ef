//! Common types shared across the NDVI statistics services.

pub mod bbox;
pub mod error;
pub mod month;
pub mod query;

pub use bbox::BoundingBox;
pub use error::{ValidationError, ValidationResult};
pub use month::Month;
pub use query::{QueryParameters, QUERY_BUFFER_DEGREES};
