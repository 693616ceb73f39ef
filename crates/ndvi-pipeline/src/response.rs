//! Response document.

use std::collections::BTreeMap;

use ndvi_common::{Month, QueryParameters};
use serde::{Deserialize, Serialize};

use crate::statistics::{AnnualStatistics, MonthlyStatistics};

/// Statistics plus the echoed request parameters.
///
/// Months serialize in calendar order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NdviResponse {
    pub ndvi_stats_by_month: BTreeMap<Month, MonthlyStatistics>,
    pub overall_stats: AnnualStatistics,
    pub latitude: f64,
    pub longitude: f64,
    pub buffer: f64,
    pub year: String,
}

impl NdviResponse {
    pub fn new(
        params: &QueryParameters,
        ndvi_stats_by_month: BTreeMap<Month, MonthlyStatistics>,
        overall_stats: AnnualStatistics,
    ) -> Self {
        Self {
            ndvi_stats_by_month,
            overall_stats,
            latitude: params.latitude,
            longitude: params.longitude,
            buffer: params.buffer,
            year: params.year.clone(),
        }
    }
}
