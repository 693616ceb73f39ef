//! Catalog abstraction used by the NDVI pipeline.

use async_trait::async_trait;
use chrono::NaiveDate;
use ndvi_common::BoundingBox;

use crate::client::StacClient;
use crate::error::{CatalogError, Result};
use crate::models::{StacItem, StacSearchParams};

/// One item search: a collection, an area and a calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub collection: String,
    pub bbox: BoundingBox,
    /// Year-month key such as `"2021-07"`.
    pub datetime: String,
}

impl SearchRequest {
    pub fn new(
        collection: impl Into<String>,
        bbox: BoundingBox,
        datetime: impl Into<String>,
    ) -> Self {
        Self {
            collection: collection.into(),
            bbox,
            datetime: datetime.into(),
        }
    }
}

/// Source of catalog items.
///
/// Implementations return items with downloadable hrefs, in catalog order.
/// An empty result is not an error at this level.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn search_items(&self, request: &SearchRequest) -> Result<Vec<StacItem>>;
}

/// Expand `"YYYY-MM"` to the closed RFC 3339 interval covering that month.
pub fn month_interval(year_month: &str) -> Result<String> {
    let invalid = || CatalogError::InvalidDatetime(year_month.to_string());

    let (year, month) = year_month.split_once('-').ok_or_else(invalid)?;
    if year.len() != 4 || month.len() != 2 {
        return Err(invalid());
    }
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = next.and_then(|d| d.pred_opt()).ok_or_else(invalid)?;

    Ok(format!(
        "{}T00:00:00Z/{}T23:59:59Z",
        first.format("%Y-%m-%d"),
        last.format("%Y-%m-%d")
    ))
}

#[async_trait]
impl CatalogClient for StacClient {
    async fn search_items(&self, request: &SearchRequest) -> Result<Vec<StacItem>> {
        let interval = month_interval(&request.datetime)?;
        let params = StacSearchParams::new()
            .collections(&[request.collection.as_str()])
            .bbox(&request.bbox)
            .datetime(&interval)
            .limit(self.page_limit());
        self.search_all(&params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_interval() {
        assert_eq!(
            month_interval("2021-07").unwrap(),
            "2021-07-01T00:00:00Z/2021-07-31T23:59:59Z"
        );
        assert_eq!(
            month_interval("2021-04").unwrap(),
            "2021-04-01T00:00:00Z/2021-04-30T23:59:59Z"
        );
        assert_eq!(
            month_interval("2021-12").unwrap(),
            "2021-12-01T00:00:00Z/2021-12-31T23:59:59Z"
        );
    }

    #[test]
    fn test_month_interval_leap_february() {
        assert!(month_interval("2020-02").unwrap().ends_with("2020-02-29T23:59:59Z"));
        assert!(month_interval("2021-02").unwrap().ends_with("2021-02-28T23:59:59Z"));
    }

    #[test]
    fn test_month_interval_rejects_bad_keys() {
        let keys = [
            "2021", "twenty-07", "2021-13", "2021-00", "2021-7", "20210-01", "-2021-01", "",
        ];
        for key in keys {
            assert!(
                matches!(month_interval(key), Err(CatalogError::InvalidDatetime(_))),
                "{}",
                key
            );
        }
    }
}
