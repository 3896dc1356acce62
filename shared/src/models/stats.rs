//! Order statistics types
//!
//! A statistics page groups orders by a truncated creation timestamp. The
//! per-bucket JSON shape depends on the granularity:
//!
//! | group_by | bucket                       |
//! |----------|------------------------------|
//! | day      | `{period: "YYYY-MM-DD", count}` |
//! | month    | `{year, month, count}`       |
//! | year     | `{year, count}`              |

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Grouping granularity for order statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    Day,
    Month,
    Year,
}

impl GroupBy {
    pub const ALL: [GroupBy; 3] = [GroupBy::Day, GroupBy::Month, GroupBy::Year];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// `to_char` pattern producing the period key in PostgreSQL
    pub fn sql_pattern(&self) -> &'static str {
        match self {
            Self::Day => "YYYY-MM-DD",
            Self::Month => "YYYY-MM",
            Self::Year => "YYYY",
        }
    }

    /// Truncate a timestamp to this granularity.
    ///
    /// Keys are zero-padded so that lexicographic order equals
    /// chronological order.
    pub fn period_key(&self, at: &NaiveDateTime) -> String {
        match self {
            Self::Day => format!("{:04}-{:02}-{:02}", at.year(), at.month(), at.day()),
            Self::Month => format!("{:04}-{:02}", at.year(), at.month()),
            Self::Year => format!("{:04}", at.year()),
        }
    }

    /// Shape a period key and its count into the bucket for this granularity
    pub fn bucket(&self, period: &str, count: i64) -> Result<StatsBucket, InvalidPeriod> {
        let invalid = || InvalidPeriod {
            group_by: *self,
            period: period.to_string(),
        };
        match self {
            Self::Day => {
                NaiveDate::parse_from_str(period, "%Y-%m-%d").map_err(|_| invalid())?;
                Ok(StatsBucket::Day {
                    period: period.to_string(),
                    count,
                })
            }
            Self::Month => {
                let (year, month) = period.split_once('-').ok_or_else(invalid)?;
                let year: i32 = year.parse().map_err(|_| invalid())?;
                let month: u32 = month.parse().map_err(|_| invalid())?;
                if !(1..=12).contains(&month) {
                    return Err(invalid());
                }
                Ok(StatsBucket::Month { year, month, count })
            }
            Self::Year => {
                let year: i32 = period.parse().map_err(|_| invalid())?;
                Ok(StatsBucket::Year { year, count })
            }
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized granularity name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid groupBy parameter. Use: day, month, year (got {0:?})")]
pub struct InvalidGroupBy(pub String);

impl FromStr for GroupBy {
    type Err = InvalidGroupBy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(InvalidGroupBy(other.to_string())),
        }
    }
}

/// Period key that does not match its granularity
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("period {period:?} is not a valid {group_by} key")]
pub struct InvalidPeriod {
    pub group_by: GroupBy,
    pub period: String,
}

/// One aggregated statistics bucket
///
/// Serialized untagged so each variant keeps its own field set on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatsBucket {
    Day { period: String, count: i64 },
    Month { year: i32, month: u32, count: i64 },
    Year { year: i32, count: i64 },
}

impl StatsBucket {
    pub fn count(&self) -> i64 {
        match self {
            Self::Day { count, .. } | Self::Month { count, .. } | Self::Year { count, .. } => {
                *count
            }
        }
    }
}

/// Raw row: period key plus number of orders in it
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PeriodCount {
    pub period: String,
    pub order_count: i64,
}

/// Inclusive creation-date filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        Self { start, end }
    }

    /// Range covering whole calendar days, both ends inclusive
    pub fn from_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            start: start.map(|d| d.and_time(NaiveTime::MIN)),
            end: end.map(end_of_day),
        }
    }

    pub fn contains(&self, at: &NaiveDateTime) -> bool {
        self.start.is_none_or(|s| *at >= s) && self.end.is_none_or(|e| *at <= e)
    }
}

/// Last representable instant of a calendar day
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN))
}

/// `ceil(distinct_periods / limit)`; a non-positive limit yields 0 pages
pub fn total_pages(distinct_periods: i64, limit: i64) -> i64 {
    if limit <= 0 || distinct_periods <= 0 {
        return 0;
    }
    (distinct_periods - 1) / limit + 1
}

/// `GET /orders/stats` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStats {
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub group_by: GroupBy,
    pub data: Vec<StatsBucket>,
}
