//! Merged, queryable view of built-in and custom patterns.
//!
//! # Merge policy
//!
//! Built-in patterns come first in catalog order, then custom patterns in
//! stored order. A custom pattern whose id collides with a built-in id
//! replaces that built-in in place and is not appended a second time.
//!
//! # Query semantics
//!
//! Case-insensitive substring containment over `trigger`, `purpose` and `id`.
//! Results keep merge order (filter only, never sort) and are truncated to
//! the caller's limit. An empty query matches every pattern.
//!
//! # Caching
//!
//! Match lists are cached per lower-cased query in a bounded cache that
//! evicts the least recently *inserted* entry (reads use `peek`, so they do
//! not refresh recency). Replacing the custom set clears the cache wholesale.

use crate::catalog::BuiltinCatalog;
use crate::models::{Pattern, TypeFilter};
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Default number of cached queries.
pub const DEFAULT_CACHE_CAPACITY: usize = 50;

/// Bounded cache of query → matching positions in the merged list.
pub struct QueryCache {
    entries: Option<LruCache<String, Arc<[usize]>>>,
}

impl QueryCache {
    /// Creates a cache holding at most `capacity` queries.
    ///
    /// A capacity of zero disables caching.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(LruCache::new),
        }
    }

    /// Looks up a query without refreshing its recency.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<[usize]>> {
        self.entries.as_ref()?.peek(key).cloned()
    }

    /// Inserts a query result, evicting the oldest insertion when full.
    pub fn insert(&mut self, key: String, positions: Arc<[usize]>) {
        if let Some(entries) = self.entries.as_mut() {
            entries.put(key, positions);
        }
    }

    /// Drops every cached entry.
    pub fn clear(&mut self) {
        if let Some(entries) = self.entries.as_mut() {
            entries.clear();
        }
    }

    /// Number of cached queries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, LruCache::len)
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory merged pattern index.
pub struct PatternIndex {
    builtin: Vec<Pattern>,
    custom: Vec<Pattern>,
    merged: Vec<Pattern>,
    cache: QueryCache,
}

impl PatternIndex {
    /// Creates an index over built-in patterns with no custom patterns.
    #[must_use]
    pub fn new(builtin: Vec<Pattern>, cache_capacity: usize) -> Self {
        let merged = builtin.clone();
        Self {
            builtin,
            custom: Vec::new(),
            merged,
            cache: QueryCache::new(cache_capacity),
        }
    }

    /// Creates an index over a catalog.
    #[must_use]
    pub fn from_catalog(catalog: &BuiltinCatalog, cache_capacity: usize) -> Self {
        Self::new(catalog.patterns().to_vec(), cache_capacity)
    }

    /// Replaces the custom pattern set and invalidates the query cache.
    #[instrument(skip(self, custom), fields(custom_count = custom.len()))]
    pub fn set_custom(&mut self, custom: Vec<Pattern>) {
        self.custom = custom;
        self.merged = merge(&self.builtin, &self.custom);
        self.cache.clear();
        debug!(merged = self.merged.len(), "pattern index rebuilt");
    }

    /// Returns up to `limit` patterns matching `query`.
    pub fn query(&mut self, query: &str, limit: usize) -> Vec<Pattern> {
        self.query_filtered(query, TypeFilter::All, limit)
    }

    /// Returns up to `limit` patterns matching `query` and `filter`.
    pub fn query_filtered(&mut self, query: &str, filter: TypeFilter, limit: usize) -> Vec<Pattern> {
        let positions = self.positions(query);
        positions
            .iter()
            .map(|&i| &self.merged[i])
            .filter(|pattern| filter.accepts(pattern))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Looks up a pattern by id in the merged view.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Pattern> {
        self.merged.iter().find(|pattern| pattern.id == id)
    }

    /// All patterns in merge order.
    #[must_use]
    pub fn patterns(&self) -> &[Pattern] {
        &self.merged
    }

    /// Built-in patterns only.
    #[must_use]
    pub fn builtin(&self) -> &[Pattern] {
        &self.builtin
    }

    /// Custom patterns only.
    #[must_use]
    pub fn custom(&self) -> &[Pattern] {
        &self.custom
    }

    /// Number of patterns in the merged view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.merged.len()
    }

    /// Returns true if the merged view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }

    /// Number of cached queries.
    #[must_use]
    pub fn cached_queries(&self) -> usize {
        self.cache.len()
    }

    fn positions(&mut self, query: &str) -> Arc<[usize]> {
        let key = query.to_lowercase();
        if let Some(hit) = self.cache.get(&key) {
            return hit;
        }

        let positions: Arc<[usize]> = self
            .merged
            .iter()
            .enumerate()
            .filter(|(_, pattern)| pattern.matches(&key))
            .map(|(i, _)| i)
            .collect();
        self.cache.insert(key, Arc::clone(&positions));
        positions
    }
}

/// Merges built-in and custom lists, letting custom ids shadow built-ins.
fn merge(builtin: &[Pattern], custom: &[Pattern]) -> Vec<Pattern> {
    let overrides: HashMap<&str, &Pattern> = custom
        .iter()
        .map(|pattern| (pattern.id.as_str(), pattern))
        .collect();

    let mut merged: Vec<Pattern> = builtin
        .iter()
        .map(|pattern| {
            overrides
                .get(pattern.id.as_str())
                .map_or_else(|| pattern.clone(), |&custom| custom.clone())
        })
        .collect();

    merged.extend(
        custom
            .iter()
            .filter(|pattern| !builtin.iter().any(|b| b.id == pattern.id))
            .cloned(),
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatternType;

    fn pattern(id: &str, trigger: &str) -> Pattern {
        Pattern::new(id, trigger, format!("purpose of {id}"), PatternType::DevPattern)
    }

    fn index() -> PatternIndex {
        PatternIndex::new(
            vec![
                pattern("ritual-rabbit", "Follow the white rabbit..."),
                pattern("pat-anchor", "Anchor on the following..."),
                pattern("pat-debug", "Debug step by step"),
            ],
            DEFAULT_CACHE_CAPACITY,
        )
    }

    #[test]
    fn test_query_filters_without_sorting() {
        let mut index = index();
        let ids: Vec<_> = index
            .query("follow", 8)
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["ritual-rabbit", "pat-anchor"]);
    }

    #[test]
    fn test_query_case_insensitive() {
        let mut index = index();
        assert_eq!(index.query("RABBIT", 8), index.query("rabbit", 8));
        assert_eq!(index.query("rabbit", 8).len(), 1);
    }

    #[test]
    fn test_empty_query_returns_bounded_full_set() {
        let mut index = index();
        assert_eq!(index.query("", 8).len(), 3);
        assert_eq!(index.query("", 2).len(), 2);
    }

    #[test]
    fn test_cache_hit_and_invalidation() {
        let mut index = index();
        assert!(index.query("zebra", 8).is_empty());
        assert_eq!(index.cached_queries(), 1);

        index.set_custom(vec![pattern("custom-1", "Think like a zebra")]);
        assert_eq!(index.cached_queries(), 0);

        let results = index.query("zebra", 8);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "custom-1");
    }

    #[test]
    fn test_custom_appended_after_builtin() {
        let mut index = index();
        index.set_custom(vec![pattern("custom-1", "Anchor twice")]);
        let ids: Vec<_> = index.query("anchor", 8).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["pat-anchor", "custom-1"]);
    }

    #[test]
    fn test_custom_shadows_builtin_in_place() {
        let mut index = index();
        index.set_custom(vec![pattern("pat-anchor", "My own anchor")]);
        assert_eq!(index.len(), 3);
        assert_eq!(index.patterns()[1].trigger, "My own anchor");
        assert_eq!(index.get("pat-anchor").unwrap().trigger, "My own anchor");
    }

    #[test]
    fn test_cache_evicts_oldest_insertion() {
        let mut cache = QueryCache::new(2);
        cache.insert("a".to_string(), Arc::from(vec![0]));
        cache.insert("b".to_string(), Arc::from(vec![1]));
        // Reading "a" must not refresh it.
        assert!(cache.get("a").is_some());
        cache.insert("c".to_string(), Arc::from(vec![2]));
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let mut index = PatternIndex::new(vec![pattern("a", "b")], 0);
        index.query("a", 8);
        assert_eq!(index.cached_queries(), 0);
    }

    #[test]
    fn test_type_filter() {
        let mut index = PatternIndex::new(
            vec![
                Pattern::new("r", "x", "p", PatternType::Ritual),
                Pattern::new("d", "x", "p", PatternType::DevPattern),
            ],
            4,
        );
        let rituals = index.query_filtered("x", TypeFilter::Only(PatternType::Ritual), 10);
        assert_eq!(rituals.len(), 1);
        assert_eq!(rituals[0].id, "r");
    }
}
