//! Resolves a semantic category ("country", "role", ...) to a real column name.
//!
//! Matching is literal: case-insensitive equality first, then case-insensitive
//! substring containment. Each tier runs over every candidate before the next
//! tier starts, so an exact hit on a low-priority candidate beats a substring
//! hit on a high-priority one.

use super::records::Record;

/// Returns the best-matching column for `candidates`, or `None`.
///
/// `headers` are searched first. Only when they are empty or all blank does
/// the key set of the first record take their place.
pub fn detect_field(headers: &[String], candidates: &[&str], records: &[Record]) -> Option<String> {
    let usable_headers = headers.iter().any(|h| !h.trim().is_empty());
    if usable_headers {
        return match_columns(headers.iter().map(String::as_str), candidates);
    }

    let first = records.first()?;
    match_columns(first.columns(), candidates)
}

fn match_columns<'a, I>(columns: I, candidates: &[&str]) -> Option<String>
where
    I: Iterator<Item = &'a str>,
{
    let lowered: Vec<(&str, String)> = columns.map(|c| (c, c.to_lowercase())).collect();

    let exact = candidates.iter().find_map(|candidate| {
        let candidate = candidate.to_lowercase();
        lowered.iter().find(|(_, l)| *l == candidate)
    });
    if let Some((column, _)) = exact {
        return Some(column.to_string());
    }

    candidates
        .iter()
        .find_map(|candidate| {
            let candidate = candidate.to_lowercase();
            lowered.iter().find(|(_, l)| l.contains(&candidate))
        })
        .map(|(column, _)| column.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_match_beats_candidate_order_of_headers() {
        let found = detect_field(&headers(&["location", "country"]), &["country", "location"], &[]);
        assert_eq!(found.as_deref(), Some("country"));
    }

    #[test]
    fn test_exact_tier_runs_over_all_candidates_before_substring() {
        // "Company Country" contains the first candidate, but "Location" is an exact hit.
        let found = detect_field(
            &headers(&["Company Country", "Location"]),
            &["country", "location"],
            &[],
        );
        assert_eq!(found.as_deref(), Some("Location"));
    }

    #[test]
    fn test_case_insensitive_exact() {
        let found = detect_field(&headers(&["First Name", "POSITION"]), &["position"], &[]);
        assert_eq!(found.as_deref(), Some("POSITION"));
    }

    #[test]
    fn test_substring_match_returns_real_header() {
        let found = detect_field(
            &headers(&["First Name", "Job Title", "Connected On"]),
            &["position", "title", "role"],
            &[],
        );
        assert_eq!(found.as_deref(), Some("Job Title"));
    }

    #[test]
    fn test_substring_follows_candidate_order() {
        let found = detect_field(
            &headers(&["Current Role", "Job Title"]),
            &["title", "role"],
            &[],
        );
        assert_eq!(found.as_deref(), Some("Job Title"));
    }

    #[test]
    fn test_not_found() {
        let found = detect_field(&headers(&["First Name", "Email Address"]), &["industry"], &[]);
        assert_eq!(found, None);
    }

    #[test]
    fn test_falls_back_to_first_record_keys_when_headers_empty() {
        let record: Record = [("Geo Region", "EMEA"), ("Name", "Ada")].into_iter().collect();
        let found = detect_field(&[], &["country", "geo"], &[record]);
        assert_eq!(found.as_deref(), Some("Geo Region"));
    }

    #[test]
    fn test_blank_headers_count_as_unusable() {
        let record: Record = [("Country", "France")].into_iter().collect();
        let found = detect_field(&headers(&["", "  "]), &["country"], &[record]);
        assert_eq!(found.as_deref(), Some("Country"));
    }

    #[test]
    fn test_no_headers_and_no_records_is_not_found() {
        assert_eq!(detect_field(&[], &["country"], &[]), None);
    }
}
