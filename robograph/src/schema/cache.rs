// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cache of compiled schemas keyed by base name and extension set
//!
//! Entries are immutable once inserted. Two concurrent first-time compositions
//! of the same key may both compute; the last insert wins.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;

/// Key for a composition: base name plus the sorted extension names
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositionKey {
    base: String,
    extensions: Vec<String>,
}

impl CompositionKey {
    pub fn new<S: AsRef<str>>(base: &str, extensions: &[S]) -> Self {
        let mut extensions: Vec<String> =
            extensions.iter().map(|e| e.as_ref().to_string()).collect();
        extensions.sort();
        Self {
            base: base.to_string(),
            extensions,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

impl fmt::Display for CompositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        for extension in &self.extensions {
            write!(f, "+{}", extension)?;
        }
        Ok(())
    }
}

/// Composition cache statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CompositionCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub current_entries: usize,
}

impl CompositionCacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Cache of values derived from one composition key
///
/// `V` is expected to be a cheap handle such as `Arc<Schema>`.
pub struct CompositionCache<V: Clone> {
    entries: RwLock<HashMap<CompositionKey, V>>,
    stats: RwLock<CompositionCacheStats>,
}

impl<V: Clone> CompositionCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            stats: RwLock::new(CompositionCacheStats::default()),
        }
    }

    pub fn get(&self, key: &CompositionKey) -> Option<V> {
        let found = self.entries.read().get(key).cloned();
        let mut stats = self.stats.write();
        if found.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        found
    }

    /// Insert a value unless one was stored concurrently for the same key
    ///
    /// Returns the stored value, so racing callers share one handle.
    pub fn insert(&self, key: CompositionKey, value: V) -> V {
        let mut entries = self.entries.write();
        if let Some(existing) = entries.get(&key) {
            return existing.clone();
        }
        entries.insert(key, value.clone());

        let mut stats = self.stats.write();
        stats.inserts += 1;
        stats.current_entries = entries.len();
        value
    }

    pub fn contains(&self, key: &CompositionKey) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
        self.stats.write().current_entries = 0;
    }

    pub fn stats(&self) -> CompositionCacheStats {
        *self.stats.read()
    }
}

impl<V: Clone> Default for CompositionCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_key_ignores_extension_order() {
        let a = CompositionKey::new("base", &["roboledger", "roboinvestor"]);
        let b = CompositionKey::new("base", &["roboinvestor", "roboledger"]);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "base+roboinvestor+roboledger");
        assert_eq!(CompositionKey::new::<&str>("base", &[]).to_string(), "base");
    }

    #[test]
    fn test_cache_hits_and_clear() {
        let cache: CompositionCache<Arc<String>> = CompositionCache::new();
        let key = CompositionKey::new("base", &["roboledger"]);

        assert!(cache.get(&key).is_none());
        let stored = cache.insert(key.clone(), Arc::new("compiled".to_string()));
        let fetched = cache.get(&key).unwrap();
        assert!(Arc::ptr_eq(&stored, &fetched));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.current_entries, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);

        let late = cache.insert(key.clone(), Arc::new("recompiled".to_string()));
        assert!(Arc::ptr_eq(&stored, &late));
        assert_eq!(cache.stats().inserts, 1);

        cache.clear();
        assert!(cache.is_empty());
        assert!(!cache.contains(&key));
    }
}
