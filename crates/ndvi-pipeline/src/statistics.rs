//! Per-month and annual NDVI statistics.

use std::collections::BTreeMap;

use ndvi_common::Month;
use serde::{Deserialize, Serialize};

use crate::constants::{HARVESTABLE_THRESHOLD, NODATA_SENTINEL, NODATA_TOLERANCE};
use crate::error::StatisticsError;

/// Whether a scaled NDVI value is excluded from statistics.
pub fn is_masked(value: f64) -> bool {
    !value.is_finite() || (value - NODATA_SENTINEL).abs() <= NODATA_TOLERANCE
}

/// Summary of one month's valid pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStatistics {
    pub mean_ndvi: f64,
    pub max_ndvi: f64,
    pub min_ndvi: f64,
    /// Population standard deviation.
    pub std_ndvi: f64,
    /// Share of valid pixels above the harvestable threshold, 0 to 100.
    pub harvestable_area_percentage: f64,
}

impl MonthlyStatistics {
    /// Compute statistics over the unmasked values of a scaled slice.
    pub fn compute(month: Month, values: &[f64]) -> Result<Self, StatisticsError> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        let mut harvestable = 0usize;

        for &v in values.iter().filter(|v| !is_masked(**v)) {
            count += 1;
            sum += v;
            max = max.max(v);
            min = min.min(v);
            if v > HARVESTABLE_THRESHOLD {
                harvestable += 1;
            }
        }

        if count == 0 {
            return Err(StatisticsError::NoValidPixels { month });
        }

        let n = count as f64;
        let mean = sum / n;
        // Second pass for a numerically stable variance.
        let variance = values
            .iter()
            .filter(|v| !is_masked(**v))
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / n;

        Ok(Self {
            mean_ndvi: mean,
            max_ndvi: max,
            min_ndvi: min,
            std_ndvi: variance.sqrt(),
            harvestable_area_percentage: harvestable as f64 / n * 100.0,
        })
    }
}

/// Aggregates across the sampled months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualStatistics {
    /// Unweighted mean of the monthly means.
    pub mean_annual_ndvi: f64,
    pub peak_ndvi_month: Month,
    pub lowest_ndvi_month: Month,
    pub mean_harvestable_area_percentage: f64,
}

impl AnnualStatistics {
    /// Aggregate monthly statistics. Ties for peak or lowest go to the
    /// earliest month in calendar order.
    pub fn from_months(
        months: &BTreeMap<Month, MonthlyStatistics>,
    ) -> Result<Self, StatisticsError> {
        let mut iter = months.iter();
        let (first_month, first) = iter.next().ok_or(StatisticsError::NoMonths)?;

        let mut peak = (*first_month, first.mean_ndvi);
        let mut lowest = (*first_month, first.mean_ndvi);
        for (month, stats) in iter {
            if stats.mean_ndvi > peak.1 {
                peak = (*month, stats.mean_ndvi);
            }
            if stats.mean_ndvi < lowest.1 {
                lowest = (*month, stats.mean_ndvi);
            }
        }

        let n = months.len() as f64;
        Ok(Self {
            mean_annual_ndvi: months.values().map(|s| s.mean_ndvi).sum::<f64>() / n,
            peak_ndvi_month: peak.0,
            lowest_ndvi_month: lowest.0,
            mean_harvestable_area_percentage: months
                .values()
                .map(|s| s.harvestable_area_percentage)
                .sum::<f64>()
                / n,
        })
    }
}
