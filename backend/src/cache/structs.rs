use anyhow::Result;
use log::debug;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Logical groups a cache can be invalidated by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    Leaderboard,
    Equipment,
    Players,
    Tournaments,
}

struct CacheEntry<T> {
    value: T,
    stored_at: Instant,
}

/// In-memory cache for one query, owned by whoever issues the query.
///
/// Entries are keyed by the query arguments and expire `ttl` after they
/// were stored.
pub struct QueryCache<T> {
    name: &'static str,
    ttl: Duration,
    tags: Vec<CacheTag>,
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> QueryCache<T> {
    pub fn new(name: &'static str, ttl: Duration, tags: &[CacheTag]) -> Self {
        Self {
            name,
            ttl,
            tags: tags.to_vec(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn has_tag(&self, tag: CacheTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Fresh value for `key`, evicting it if expired
    pub fn get(&self, key: &str) -> Option<T> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: &str, value: T) {
        let entry = CacheEntry {
            value,
            stored_at: Instant::now(),
        };
        self.lock().insert(key.to_string(), entry);
    }

    /// Return the cached value or compute, store and return a new one.
    /// Failed computations are not cached.
    pub fn get_or_try_insert_with<F>(&self, key: &str, compute: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        if let Some(value) = self.get(key) {
            debug!("Cache hit: {}[{}]", self.name, key);
            return Ok(value);
        }

        debug!("Cache miss: {}[{}]", self.name, key);
        let value = compute()?;
        self.insert(key, value.clone());
        Ok(value)
    }

    pub fn invalidate(&self) {
        self.lock().clear();
        debug!("Invalidated cache {}", self.name);
    }

    /// Drop every entry if this cache belongs to `tag`
    pub fn invalidate_tag(&self, tag: CacheTag) -> bool {
        if self.has_tag(tag) {
            self.invalidate();
            return true;
        }
        false
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Poisoning is ignored: entries are replaced whole
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry<T>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_hit_within_ttl() {
        let cache = QueryCache::new("test", Duration::from_secs(60), &[CacheTag::Players]);
        let calls = Cell::new(0);
        let compute = || -> Result<Vec<i32>> {
            calls.set(calls.get() + 1);
            Ok(vec![1, 2, 3])
        };

        assert_eq!(cache.get_or_try_insert_with("10", compute).unwrap(), vec![1, 2, 3]);
        assert_eq!(cache.get_or_try_insert_with("10", compute).unwrap(), vec![1, 2, 3]);
        assert_eq!(calls.get(), 1);

        // Different arguments are different entries
        cache.get_or_try_insert_with("20", compute).unwrap();
        assert_eq!(calls.get(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_expired_entries_are_recomputed() {
        let cache = QueryCache::new("test", Duration::ZERO, &[]);
        cache.insert("k", 1);
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());

        let value = cache.get_or_try_insert_with("k", || Ok(2)).unwrap();
        assert_eq!(value, 2);
    }

    #[test]
    fn test_invalidate_by_tag() {
        let cache = QueryCache::new(
            "equipment-leaderboard",
            Duration::from_secs(60),
            &[CacheTag::Leaderboard, CacheTag::Equipment],
        );
        cache.insert("PADDLE:10", "paddles");

        assert!(!cache.invalidate_tag(CacheTag::Players));
        assert_eq!(cache.get("PADDLE:10"), Some("paddles"));

        assert!(cache.invalidate_tag(CacheTag::Equipment));
        assert_eq!(cache.get("PADDLE:10"), None);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache: QueryCache<u32> = QueryCache::new("test", Duration::from_secs(60), &[]);
        assert!(cache.get_or_try_insert_with("k", || anyhow::bail!("db down")).is_err());
        assert_eq!(cache.get_or_try_insert_with("k", || Ok(5)).unwrap(), 5);
    }
}
