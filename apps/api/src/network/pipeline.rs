//! Connection Aggregation Pipeline.
//!
//! records → field detection → normalization → counting/collapsing → series.
//! Never fails on data shape: missing fields degrade to synthetic series and
//! missing cells to "Unknown". Each degradation is reported for logging.

use serde::Serialize;
use tracing::{debug, info};

use super::aggregate::{aggregate, Bucket};
use super::fallback::fallback_buckets;
use super::field_detector::detect_field;
use super::growth::{monthly_series, synthetic_quarterly_series, TimeBucket, DATE_CANDIDATES};
use super::normalize::Category;
use super::records::ConnectionTable;

/// Why part of the output is not derived from real values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// No records at all: every series is synthetic.
    EmptyInput,
    /// No column matched the category's candidates.
    FieldNotFound(Category),
    /// No date column, or none of its values parsed.
    NoGrowthDates,
    /// Records whose cell for a detected field was missing or empty.
    MissingValues { category: Category, records: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySeries {
    /// The column the buckets were computed from; `None` for synthetic data.
    pub field: Option<String>,
    pub synthetic: bool,
    pub buckets: Vec<Bucket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthSeries {
    pub field: Option<String>,
    pub synthetic: bool,
    pub points: Vec<TimeBucket>,
}

/// Chart-ready output of one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkVisualization {
    pub total_connections: usize,
    pub connections: GrowthSeries,
    pub countries: CategorySeries,
    pub roles: CategorySeries,
    pub industries: CategorySeries,
}

/// Runs the full pipeline over one (possibly merged) upload.
pub fn build_visualization(table: &ConnectionTable) -> (NetworkVisualization, Vec<Degradation>) {
    let total = table.len();
    let mut degradations = Vec::new();
    if table.is_empty() {
        degradations.push(Degradation::EmptyInput);
    }

    let connections = growth_series(table, &mut degradations);
    let [countries, roles, industries] =
        Category::ALL.map(|category| category_series(table, category, &mut degradations));

    info!(
        total_connections = total,
        degradations = degradations.len(),
        "Built network visualization"
    );

    let visualization = NetworkVisualization {
        total_connections: total,
        connections,
        countries,
        roles,
        industries,
    };
    (visualization, degradations)
}

fn category_series(
    table: &ConnectionTable,
    category: Category,
    degradations: &mut Vec<Degradation>,
) -> CategorySeries {
    let field = detect_field(&table.headers, category.candidates(), &table.records);

    let real = field.as_deref().map(|column| {
        let mut missing = 0;
        let labels = table.records.iter().map(|record| {
            let raw = record.value(column);
            if raw.is_none() {
                missing += 1;
            }
            category.normalize(raw)
        });
        let buckets = aggregate(labels);
        (buckets, missing)
    });

    match real {
        Some((buckets, missing)) if !buckets.is_empty() => {
            if missing > 0 {
                degradations.push(Degradation::MissingValues {
                    category,
                    records: missing,
                });
            }
            debug!(?category, ?field, buckets = buckets.len(), "Aggregated category");
            CategorySeries {
                field,
                synthetic: false,
                buckets,
            }
        }
        _ => {
            if !table.is_empty() {
                degradations.push(Degradation::FieldNotFound(category));
            }
            CategorySeries {
                field: None,
                synthetic: true,
                buckets: fallback_buckets(category, table.len()),
            }
        }
    }
}

fn growth_series(table: &ConnectionTable, degradations: &mut Vec<Degradation>) -> GrowthSeries {
    let field = detect_field(&table.headers, DATE_CANDIDATES, &table.records);
    if let Some(column) = field.as_deref() {
        let points = monthly_series(&table.records, column);
        if !points.is_empty() {
            return GrowthSeries {
                field,
                synthetic: false,
                points,
            };
        }
    }

    if !table.is_empty() {
        degradations.push(Degradation::NoGrowthDates);
    }
    GrowthSeries {
        field: None,
        synthetic: true,
        points: synthetic_quarterly_series(table.len()),
    }
}
