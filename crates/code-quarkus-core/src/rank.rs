//! Extension search: free-text filtering and ranking over a catalog.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::catalog::ExtensionEntry;

/// Returns true when `query` selects `entry`.
///
/// Blank queries select everything. Otherwise the lower-cased query must be
/// a prefix of the short name (or short id when the entry has no short
/// name), a substring of the name, or a prefix of a keyword, the category or
/// a tag.
pub fn matches(query: &str, entry: &ExtensionEntry) -> bool {
    let query = normalize_query(query);
    if query.is_empty() {
        return true;
    }

    matches_normalized(&query, entry)
}

/// Orders two entries for display under `query`.
///
/// Tiers are short name, keyword, name, category and tag prefix matches,
/// in that order; an entry hitting a tier the other misses sorts first.
/// Full ties fall back to ascending catalog `order`.
pub fn compare(query: &str, a: &ExtensionEntry, b: &ExtensionEntry) -> Ordering {
    let query = normalize_query(query);
    compare_normalized(&query, a, b)
}

/// Filters `entries` by `query` and sorts the survivors by rank.
pub fn search<'a, I>(entries: I, query: &str) -> Vec<&'a ExtensionEntry>
where
    I: IntoIterator<Item = &'a ExtensionEntry>,
{
    let query = normalize_query(query);
    let mut found: Vec<&ExtensionEntry> = entries
        .into_iter()
        .filter(|entry| query.is_empty() || matches_normalized(&query, entry))
        .collect();
    found.sort_by(|a, b| compare_normalized(&query, a, b));
    found
}

/// Memoized `matches` results keyed by normalized query and entry id.
///
/// Entries sharing an id must be identical; `Catalog::new` enforces this.
#[derive(Debug, Default)]
pub struct MatchCache {
    results: HashMap<(String, String), bool>,
}

impl MatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matches(&mut self, query: &str, entry: &ExtensionEntry) -> bool {
        let query = normalize_query(query);
        if query.is_empty() {
            return true;
        }

        let key = (query, entry.id.clone());
        if let Some(hit) = self.results.get(&key) {
            return *hit;
        }

        let result = matches_normalized(&key.0, entry);
        self.results.insert(key, result);
        result
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn clear(&mut self) {
        self.results.clear();
    }
}

fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

fn matches_normalized(query: &str, entry: &ExtensionEntry) -> bool {
    short_label_starts_with(entry, query)
        || entry.name.to_lowercase().contains(query)
        || any_starts_with(&entry.keywords, query)
        || starts_with_ignore_case(&entry.category, query)
        || any_starts_with(&entry.tags, query)
}

fn compare_normalized(query: &str, a: &ExtensionEntry, b: &ExtensionEntry) -> Ordering {
    if query.is_empty() {
        return a.order.cmp(&b.order);
    }

    let tiers_a = match_tiers(query, a);
    let tiers_b = match_tiers(query, b);

    // `true > false`, so comparing b against a puts hits first.
    tiers_b
        .cmp(&tiers_a)
        .then_with(|| a.order.cmp(&b.order))
}

fn match_tiers(query: &str, entry: &ExtensionEntry) -> [bool; 5] {
    [
        short_label_starts_with(entry, query),
        any_starts_with(&entry.keywords, query),
        starts_with_ignore_case(&entry.name, query),
        starts_with_ignore_case(&entry.category, query),
        any_starts_with(&entry.tags, query),
    ]
}

fn short_label_starts_with(entry: &ExtensionEntry, query: &str) -> bool {
    let label = entry.short_name.as_deref().unwrap_or(&entry.short_id);
    starts_with_ignore_case(label, query)
}

fn any_starts_with(values: &[String], query: &str) -> bool {
    values
        .iter()
        .any(|value| starts_with_ignore_case(value, query))
}

fn starts_with_ignore_case(value: &str, query: &str) -> bool {
    value.to_lowercase().starts_with(query)
}
