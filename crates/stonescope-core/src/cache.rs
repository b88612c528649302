//! Bounded in-memory resource cache.
//!
//! Shared across viewer sessions and keyed by resource path. The eviction
//! policy is a naive bounded accumulator: an insert that would exceed the
//! total budget clears the *entire* cache first, then inserts. This is
//! deliberately not LRU - the simple policy is pinned by tests, and
//! switching to LRU is a documented behavior change, not a bug fix.

use std::collections::HashMap;

/// One cached payload with its accounted size.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    payload: T,
    size_mb: f32,
}

/// A budgeted path-keyed cache.
#[derive(Debug)]
pub struct ResourceCache<T> {
    entries: HashMap<String, CacheEntry<T>>,
    budget_mb: f32,
    total_mb: f32,
    clears: u64,
}

impl<T> ResourceCache<T> {
    /// Creates a cache with the given total budget in megabytes.
    #[must_use]
    pub fn new(budget_mb: f32) -> Self {
        Self {
            entries: HashMap::new(),
            budget_mb,
            total_mb: 0.0,
            clears: 0,
        }
    }

    /// Looks up a payload by resource path.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key).map(|e| &e.payload)
    }

    /// Inserts a payload.
    ///
    /// If the insert would push the accounted total over budget, the whole
    /// cache is cleared first; the new entry is then stored alone, even
    /// when it is itself larger than the budget.
    pub fn set(&mut self, key: impl Into<String>, payload: T, size_mb: f32) {
        let key = key.into();
        let size_mb = size_mb.max(0.0);

        // Replacing a key frees its old accounting before the budget check.
        if let Some(old) = self.entries.remove(&key) {
            self.total_mb -= old.size_mb;
        }

        if self.total_mb + size_mb > self.budget_mb {
            log::debug!(
                "resource cache over budget ({:.1} + {:.1} > {:.1} MB), clearing",
                self.total_mb,
                size_mb,
                self.budget_mb
            );
            self.clear();
        }

        self.total_mb += size_mb;
        self.entries.insert(key, CacheEntry { payload, size_mb });
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.total_mb = 0.0;
        self.clears += 1;
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the cache holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of accounted entry sizes in megabytes.
    #[must_use]
    pub fn total_size_mb(&self) -> f32 {
        self.total_mb
    }

    /// Configured budget in megabytes.
    #[must_use]
    pub fn budget_mb(&self) -> f32 {
        self.budget_mb
    }

    /// Number of times the cache has been cleared (evictions and explicit
    /// calls), for diagnostics and tests.
    #[must_use]
    pub fn clears(&self) -> u64 {
        self.clears
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_get_set() {
        let mut cache = ResourceCache::new(100.0);
        cache.set("models/slab.obj", 1u32, 10.0);
        assert_eq!(cache.get("models/slab.obj"), Some(&1));
        assert_eq!(cache.get("missing"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_overflow_clears_whole_cache_once() {
        let mut cache = ResourceCache::new(100.0);
        cache.set("a", 1u32, 40.0);
        cache.set("b", 2u32, 40.0);
        assert_eq!(cache.len(), 2);
        let clears_before = cache.clears();

        // 40 + 40 + 30 > 100: one clear, then the new entry alone.
        cache.set("c", 3u32, 30.0);
        assert_eq!(cache.clears(), clears_before + 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("c"), Some(&3));
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), None);
        assert!((cache.total_size_mb() - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_oversized_entry_still_admitted_alone() {
        let mut cache = ResourceCache::new(10.0);
        cache.set("huge", 1u32, 50.0);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("huge"), Some(&1));
    }

    #[test]
    fn test_replacing_key_adjusts_accounting() {
        let mut cache = ResourceCache::new(100.0);
        cache.set("a", 1u32, 60.0);
        // Same key, smaller payload: no clear needed.
        let clears_before = cache.clears();
        cache.set("a", 2u32, 50.0);
        assert_eq!(cache.clears(), clears_before);
        assert_eq!(cache.get("a"), Some(&2));
        assert!((cache.total_size_mb() - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_clear() {
        let mut cache = ResourceCache::new(100.0);
        cache.set("a", 1u32, 10.0);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.total_size_mb(), 0.0);
    }

    proptest! {
        // The budget invariant must hold after any insert sequence, except
        // for the documented single-oversized-entry case.
        #[test]
        fn prop_budget_invariant(sizes in proptest::collection::vec(0.0f32..30.0, 1..50)) {
            let budget = 100.0f32;
            let mut cache = ResourceCache::new(budget);
            for (i, size) in sizes.iter().enumerate() {
                cache.set(format!("k{i}"), i, *size);
                prop_assert!(cache.total_size_mb() <= budget + 1e-3);
            }
        }
    }
}
