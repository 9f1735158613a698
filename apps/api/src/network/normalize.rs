//! Category definitions and the per-category cleanup applied to raw cells.

use serde::{Deserialize, Serialize};

pub const UNKNOWN_LABEL: &str = "Unknown";

/// Leading qualifiers stripped from roles so seniority variants share a bucket.
/// Order matters only for overlapping prefixes; none of these overlap.
const ROLE_QUALIFIERS: &[&str] = &["senior", "junior", "lead", "principal", "chief", "head of"];

/// A chartable category of connection data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Countries,
    Roles,
    Industries,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Countries, Category::Roles, Category::Industries];

    /// Column names that may hold this category, highest priority first.
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            Category::Countries => &["country", "location", "region", "geo"],
            Category::Roles => &["position", "title", "role", "job", "headline"],
            Category::Industries => &["industry", "company", "organization", "sector"],
        }
    }

    /// Cleans one raw cell into its display label. Missing or empty cells become "Unknown".
    pub fn normalize(self, raw: Option<&str>) -> String {
        let cleaned = match raw {
            Some(value) => match self {
                Category::Countries => normalize_country(value),
                Category::Roles => normalize_role(value),
                Category::Industries => value,
            },
            None => "",
        };

        if cleaned.is_empty() {
            UNKNOWN_LABEL.to_string()
        } else {
            cleaned.to_string()
        }
    }
}

/// "City, Region, Country" → "Country".
fn normalize_country(value: &str) -> &str {
    match value.rsplit_once(',') {
        Some((_, last)) => last.trim(),
        None => value,
    }
}

/// "Senior Software Engineer | Speaker" → "Software Engineer".
fn normalize_role(value: &str) -> &str {
    let main = match value.split_once('|') {
        Some((first, _)) => first.trim(),
        None => value,
    };
    strip_qualifier(main)
}

fn strip_qualifier(role: &str) -> &str {
    for qualifier in ROLE_QUALIFIERS {
        let Some(head) = role.get(..qualifier.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(qualifier) {
            continue;
        }
        let rest = &role[qualifier.len()..];
        // The qualifier must be a whole word followed by at least one whitespace character.
        let trimmed = rest.trim_start();
        if trimmed.len() < rest.len() {
            return trimmed;
        }
    }
    role
}
