//! List request filters.
//!
//! A list request carries, per filterable field, a set of accepted values.
//! An empty set means the client did not filter on that field, so every
//! helper here treats an empty filter as matching everything.

use std::collections::HashMap;

use crate::store::By;

/// An empty filter places no constraint, otherwise `check` decides.
fn unfiltered_or(filter_is_empty: bool, check: impl FnOnce() -> bool) -> bool {
    filter_is_empty || check()
}

/// Builds the disjunction of `by(value)` for every value.
///
/// No values yields an empty [`By::Or`], which matches every object.
pub fn build_filters<F>(by: F, values: &[String]) -> By
where
    F: Fn(&str) -> By,
{
    By::Or(values.iter().map(|value| by(value)).collect())
}

/// `true` if `candidates` is empty or contains `matched` exactly.
pub fn filter_contains(matched: &str, candidates: &[String]) -> bool {
    unfiltered_or(candidates.is_empty(), || candidates.iter().any(|c| c == matched))
}

/// `true` if `candidates` is empty or `matched` starts with one of them.
pub fn filter_contains_prefix(matched: &str, candidates: &[String]) -> bool {
    unfiltered_or(candidates.is_empty(), || {
        candidates.iter().any(|prefix| matched.starts_with(prefix.as_str()))
    })
}

/// `true` if every label in `candidates` is present in `matched`.
///
/// A candidate with an empty value only requires the key to exist.
pub fn filter_match_labels(
    matched: &HashMap<String, String>,
    candidates: &HashMap<String, String>,
) -> bool {
    unfiltered_or(candidates.is_empty(), || {
        candidates.iter().all(|(key, value)| match matched.get(key) {
            Some(actual) => value.is_empty() || value == actual,
            None => false,
        })
    })
}
