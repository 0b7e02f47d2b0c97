//! Turns a search term and the full catalog into ordered suggestions.

use crate::model::{Country, SuggestionEntry};

/// Countries whose name or full calling code starts with `term`, ordered by
/// numeric calling-code root.
///
/// Countries without a parseable root sort after all others and keep their
/// catalog order among themselves.
#[must_use]
pub fn apply(term: &str, catalog: &[Country]) -> Vec<SuggestionEntry> {
    if term.is_empty() {
        return Vec::new();
    }

    let needle = term.to_lowercase();
    let mut ordered: Vec<&Country> = catalog.iter().collect();
    ordered.sort_by_key(|c| sort_key(c));

    ordered
        .into_iter()
        .filter(|c| matches(c, &needle))
        .map(SuggestionEntry::from_country)
        .collect()
}

fn sort_key(country: &Country) -> (bool, i64) {
    match country.numeric_root() {
        Some(root) => (false, root),
        None => (true, 0),
    }
}

fn matches(country: &Country, needle: &str) -> bool {
    if country.common_name.to_lowercase().starts_with(needle) {
        return true;
    }
    country
        .full_calling_code()
        .is_some_and(|code| code.to_lowercase().starts_with(needle))
}
