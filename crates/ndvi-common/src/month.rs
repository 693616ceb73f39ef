//! The fixed set of sampled months.
//!
//! Statistics are always computed for the same four months of a year, one per
//! season. The set is not configurable.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// One of the four sampled months.
///
/// Variants are declared in calendar order, so the derived `Ord` sorts
/// January first and October last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    April,
    July,
    October,
}

impl Month {
    /// All sampled months in calendar order.
    pub const ALL: [Month; 4] = [Month::January, Month::April, Month::July, Month::October];

    /// Full English month name, as produced by `%B` formatting.
    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::April => "April",
            Month::July => "July",
            Month::October => "October",
        }
    }

    /// Two-digit month code used in catalog date ranges.
    pub fn code(&self) -> &'static str {
        match self {
            Month::January => "01",
            Month::April => "04",
            Month::July => "07",
            Month::October => "10",
        }
    }

    /// Calendar month number (1-12).
    pub fn number(&self) -> u32 {
        match self {
            Month::January => 1,
            Month::April => 4,
            Month::July => 7,
            Month::October => 10,
        }
    }

    /// Map a calendar month number back to a sampled month.
    pub fn from_number(number: u32) -> Option<Month> {
        Month::ALL.into_iter().find(|m| m.number() == number)
    }

    /// Sampled month that a timestamp falls into, if any.
    pub fn from_timestamp(timestamp: &DateTime<Utc>) -> Option<Month> {
        Month::from_number(timestamp.month())
    }

    /// Year-month key for this month of `year`, e.g. `"2021-07"`.
    pub fn date_range(&self, year: &str) -> String {
        format!("{}-{}", year, self.code())
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = UnknownMonth;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Month::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownMonth(s.to_string()))
    }
}

/// Error returned when parsing a name outside the sampled month set.
#[derive(Debug, thiserror::Error)]
#[error("not a sampled month: {0}")]
pub struct UnknownMonth(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_month_codes() {
        let codes: Vec<_> = Month::ALL.iter().map(|m| m.code()).collect();
        assert_eq!(codes, vec!["01", "04", "07", "10"]);
    }

    #[test]
    fn test_calendar_order() {
        let mut months = vec![Month::October, Month::January, Month::July, Month::April];
        months.sort();
        assert_eq!(months, Month::ALL.to_vec());
    }

    #[test]
    fn test_date_range() {
        assert_eq!(Month::July.date_range("2021"), "2021-07");
        assert_eq!(Month::January.date_range("1999"), "1999-01");
    }

    #[test]
    fn test_from_timestamp() {
        let ts = Utc.with_ymd_and_hms(2021, 4, 7, 0, 0, 0).unwrap();
        assert_eq!(Month::from_timestamp(&ts), Some(Month::April));

        let ts = Utc.with_ymd_and_hms(2021, 5, 7, 0, 0, 0).unwrap();
        assert_eq!(Month::from_timestamp(&ts), None);
    }

    #[test]
    fn test_name_matches_chrono_format() {
        for month in Month::ALL {
            let ts = Utc.with_ymd_and_hms(2021, month.number(), 1, 0, 0, 0).unwrap();
            assert_eq!(ts.format("%B").to_string(), month.name());
        }
    }

    #[test]
    fn test_parse_and_serialize() {
        assert_eq!("july".parse::<Month>().unwrap(), Month::July);
        assert!("May".parse::<Month>().is_err());
        assert_eq!(serde_json::to_string(&Month::October).unwrap(), "\"October\"");
    }
}
