//! Synthetic placeholder series for categories the upload does not contain.
//!
//! These numbers are not derived from the data; every series built here is
//! flagged `synthetic` so the client can show a disclaimer.

use super::aggregate::Bucket;
use super::normalize::Category;

const COUNTRY_SHARES: &[(&str, f64)] = &[
    ("United States", 0.40),
    ("United Kingdom", 0.15),
    ("Canada", 0.10),
    ("Germany", 0.08),
    ("France", 0.06),
    ("India", 0.05),
    ("Australia", 0.04),
    ("Other", 0.12),
];

const ROLE_SHARES: &[(&str, f64)] = &[
    ("Software Engineer", 0.25),
    ("Product Manager", 0.15),
    ("Data Scientist", 0.12),
    ("Designer", 0.10),
    ("Marketing", 0.08),
    ("Sales", 0.06),
    ("HR", 0.04),
    ("Other", 0.20),
];

const INDUSTRY_SHARES: &[(&str, f64)] = &[
    ("Technology", 0.35),
    ("Finance", 0.15),
    ("Healthcare", 0.12),
    ("Education", 0.10),
    ("Manufacturing", 0.08),
    ("Retail", 0.05),
    ("Other", 0.15),
];

/// Quarter labels and cumulative fractions of the synthetic growth curve.
pub const GROWTH_QUARTERS: &[(&str, f64)] = &[
    ("Q1 2023", 0.3),
    ("Q2 2023", 0.5),
    ("Q3 2023", 0.7),
    ("Q4 2023", 0.8),
    ("Q1 2024", 0.9),
    ("Q2 2024", 1.0),
];

fn shares(category: Category) -> &'static [(&'static str, f64)] {
    match category {
        Category::Countries => COUNTRY_SHARES,
        Category::Roles => ROLE_SHARES,
        Category::Industries => INDUSTRY_SHARES,
    }
}

/// `floor(total × share)`.
pub fn share_of(total: usize, share: f64) -> u64 {
    (total as f64 * share).floor() as u64
}

/// Deterministic placeholder buckets for `category`, scaled to `total` records.
pub fn fallback_buckets(category: Category, total: usize) -> Vec<Bucket> {
    shares(category)
        .iter()
        .map(|(label, share)| Bucket::new(*label, share_of(total, *share)))
        .collect()
}
