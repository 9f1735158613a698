//! Post-processing of LLM replies and headline numbers for the dashboard.

use serde::Serialize;

use super::fallback::share_of;

const MAX_SUGGESTIONS: usize = 5;
const MIN_SUGGESTIONS: usize = 3;

const DEFAULT_SUGGESTIONS: [&str; 5] = [
    "Consider updating connection entries with missing company information.",
    "Organize your connections by adding tags for better network management.",
    "Connect with more industry influencers to expand your professional network.",
    "Engage more regularly with your connections' content to increase visibility.",
    "Consider reaching out to dormant connections to reactivate your network.",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub connection_count: usize,
    pub profile_score: u32,
    pub profile_views: u64,
    pub content_engagement: u64,
}

impl DashboardStats {
    pub fn from_connection_count(connection_count: usize) -> Self {
        Self {
            connection_count,
            profile_score: profile_score(connection_count),
            profile_views: share_of(connection_count, 0.3),
            content_engagement: share_of(connection_count, 0.15),
        }
    }
}

/// Coarse 50–90 score stepped by network size.
pub fn profile_score(connection_count: usize) -> u32 {
    match connection_count {
        0..=49 => 50,
        50..=99 => 60,
        100..=199 => 70,
        200..=499 => 80,
        _ => 90,
    }
}

/// Pulls bullet or numbered lines out of an LLM reply.
///
/// Lines must start with `-`, `*` or `N.`/`N)` and be longer than five
/// characters. Fewer than three hits returns the stock suggestions instead.
pub fn extract_suggestions(content: &str) -> Vec<String> {
    let suggestions: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > 5)
        .filter_map(strip_list_marker)
        .map(str::to_string)
        .collect();

    if suggestions.len() < MIN_SUGGESTIONS {
        return DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect();
    }
    suggestions.into_iter().take(MAX_SUGGESTIONS).collect()
}

fn strip_list_marker(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix('-').or_else(|| line.strip_prefix('*')) {
        return Some(rest.trim_start());
    }
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    line[digits..]
        .strip_prefix('.')
        .or_else(|| line[digits..].strip_prefix(')'))
        .map(str::trim_start)
}

/// Splits a reply into its non-blank lines.
pub fn insight_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}
