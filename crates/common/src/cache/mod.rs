//! Entity resolution cache
//!
//! Memoizes surface-string to canonical-id resolutions. A cache is created by
//! whoever owns a session and passed by `&mut` to the code that resolves
//! entities; dropping it ends its lifetime. There is no process-wide instance.

use crate::metrics;
use crate::models::EntityId;
use std::collections::HashMap;
use tracing::debug;

/// Name used when recording cache metrics
const CACHE_NAME: &str = "resolution";

/// Session-scoped resolution cache
#[derive(Debug, Default)]
pub struct ResolutionCache {
    /// surface string -> resolved id (None records a confirmed miss)
    entries: HashMap<String, Option<EntityId>>,
    hits: u64,
    misses: u64,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached resolution, or resolve and remember it
    pub fn get_or_resolve<F>(&mut self, surface: &str, resolve: F) -> Option<EntityId>
    where
        F: FnOnce(&str) -> Option<EntityId>,
    {
        if let Some(cached) = self.entries.get(surface) {
            self.hits += 1;
            metrics::record_cache(true, CACHE_NAME);
            return cached.clone();
        }

        self.misses += 1;
        metrics::record_cache(false, CACHE_NAME);

        let resolved = resolve(surface);
        debug!(surface, resolved = ?resolved, "Cache set");
        self.entries.insert(surface.to_string(), resolved.clone());
        resolved
    }

    /// Cached resolution without resolving
    pub fn peek(&self, surface: &str) -> Option<&Option<EntityId>> {
        self.entries.get(surface)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Forget every resolution, e.g. after the graph snapshot changes
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolver_called_once() {
        let mut cache = ResolutionCache::new();
        let mut calls = 0;

        for _ in 0..3 {
            let id = cache.get_or_resolve("Apple", |s| {
                calls += 1;
                Some(EntityId::from(s))
            });
            assert_eq!(id, Some(EntityId::from("Apple")));
        }

        assert_eq!(calls, 1);
        assert_eq!(cache.hits(), 2);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_misses_are_cached_too() {
        let mut cache = ResolutionCache::new();
        assert_eq!(cache.get_or_resolve("Nobody", |_| None), None);
        assert_eq!(cache.peek("Nobody"), Some(&None));
        assert_eq!(cache.get_or_resolve("Nobody", |_| Some("X".into())), None);
    }

    #[test]
    fn test_caches_are_independent() {
        let mut first = ResolutionCache::new();
        let second = ResolutionCache::new();
        first.get_or_resolve("Apple", |s| Some(s.into()));
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }
}
