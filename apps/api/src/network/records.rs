//! Tabular records decoded from an uploaded connections export.

use std::collections::BTreeMap;

use csv::{ReaderBuilder, Trim};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("CSV file has no header row")]
    MissingHeader,

    #[error("Failed to read CSV: {0}")]
    Read(#[from] csv::Error),
}

/// One row of an upload, keyed by column name.
/// A key that is absent or maps to an empty string counts as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, String>);

impl Record {
    /// The cell value, or `None` when the column is absent or the cell is empty.
    pub fn value(&self, column: &str) -> Option<&str> {
        self.0
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A decoded CSV file: its header row in file order plus every data row.
#[derive(Debug, Clone, Default)]
pub struct ConnectionTable {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl ConnectionTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Concatenates several uploads. Headers are unioned in first-seen order.
    pub fn merge(tables: impl IntoIterator<Item = ConnectionTable>) -> Self {
        let mut merged = ConnectionTable::default();
        for table in tables {
            for header in table.headers {
                if !merged.headers.contains(&header) {
                    merged.headers.push(header);
                }
            }
            merged.records.extend(table.records);
        }
        merged
    }
}

/// Parses CSV text with a header row.
///
/// Empty lines are skipped, but a row of blank cells such as `,,` is kept.
/// Short rows are padded with empty cells, a UTF-8 BOM on the first header is
/// dropped, and repeated header names get a numeric suffix.
pub fn parse_csv(text: &str) -> Result<ConnectionTable, CsvError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = unique_headers(reader.headers()?.iter());
    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::MissingHeader);
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let record: Record = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !h.is_empty())
            .map(|(i, h)| (h.clone(), row.get(i).unwrap_or("").to_string()))
            .collect();
        records.push(record);
    }

    debug!("Parsed {} CSV rows with {} columns", records.len(), headers.len());
    Ok(ConnectionTable { headers, records })
}

/// "Name,Name,Name" becomes "Name,Name_2,Name_3" so no column is shadowed.
fn unique_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for header in raw {
        let mut name = header.to_string();
        if !name.is_empty() && headers.contains(&name) {
            let mut n = 2;
            while headers.contains(&format!("{header}_{n}")) {
                n += 1;
            }
            name = format!("{header}_{n}");
            warn!(header, renamed = %name, "Duplicate CSV header renamed");
        }
        headers.push(name);
    }
    headers
}
