//! Counting, sorting and long-tail collapsing for category series.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Number of real buckets kept before the remainder collapses into "Other".
pub const TOP_BUCKETS: usize = 7;
pub const OTHER_LABEL: &str = "Other";

/// One distinct label of a category and how many records carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub count: u64,
}

impl Bucket {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Counts labels and returns at most `TOP_BUCKETS + 1` buckets, largest first.
///
/// Equal counts keep first-seen order. When more than `TOP_BUCKETS` distinct
/// labels exist, the tail is summed into a single terminal "Other" bucket.
/// A real "Other" label in the top 7 absorbs the tail, so labels stay unique.
/// Empty input yields an empty list.
pub fn aggregate<I, S>(values: I) -> Vec<Bucket>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<Bucket> = Vec::new();

    for value in values {
        let label = value.as_ref();
        match index.get(label) {
            Some(&i) => buckets[i].count += 1,
            None => {
                index.insert(label.to_string(), buckets.len());
                buckets.push(Bucket::new(label, 1));
            }
        }
    }

    // sort_by is stable, so ties stay in first-seen order
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    collapse_tail(buckets)
}

fn collapse_tail(mut buckets: Vec<Bucket>) -> Vec<Bucket> {
    if buckets.len() <= TOP_BUCKETS {
        return buckets;
    }
    let mut other: u64 = buckets.drain(TOP_BUCKETS..).map(|b| b.count).sum();
    if let Some(i) = buckets.iter().position(|b| b.label == OTHER_LABEL) {
        other += buckets.remove(i).count;
    }
    buckets.push(Bucket::new(OTHER_LABEL, other));
    buckets
}
