//! Connection growth over time: real monthly counts when the export carries a
//! "Connected On" date, otherwise a synthetic quarterly curve.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::fallback::{share_of, GROWTH_QUARTERS};
use super::records::Record;

/// Column names that may hold the connection date, highest priority first.
pub const DATE_CANDIDATES: &[&str] = &["connected on", "connected_on", "connectedon", "date"];

/// `%d %b %Y` is LinkedIn's own export format ("05 Jan 2023").
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d %b %Y", "%d %B %Y", "%m/%d/%Y"];

/// One period on the growth chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub period: String,
    pub count: u64,
}

impl TimeBucket {
    pub fn new(period: impl Into<String>, count: u64) -> Self {
        Self {
            period: period.into(),
            count,
        }
    }
}

/// Parses a connection date in any of the accepted export formats.
pub fn parse_connection_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Groups records by the calendar month of `date_field`, labelled "YYYY-MM",
/// oldest first. Unparseable or missing dates are skipped.
pub fn monthly_series(records: &[Record], date_field: &str) -> Vec<TimeBucket> {
    let mut months: BTreeMap<String, u64> = BTreeMap::new();
    for date in records
        .iter()
        .filter_map(|r| r.value(date_field))
        .filter_map(parse_connection_date)
    {
        *months.entry(date.format("%Y-%m").to_string()).or_default() += 1;
    }

    // BTreeMap iteration is lexicographic, which is chronological for "YYYY-MM".
    months
        .into_iter()
        .map(|(period, count)| TimeBucket::new(period, count))
        .collect()
}

/// Six quarterly points rising to `total`.
pub fn synthetic_quarterly_series(total: usize) -> Vec<TimeBucket> {
    GROWTH_QUARTERS
        .iter()
        .map(|(label, fraction)| TimeBucket::new(*label, share_of(total, *fraction)))
        .collect()
}
