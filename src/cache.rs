use dashmap::DashMap;
use std::time::{Duration, Instant};

struct CachedPage {
    body: String,
    expires_at: Instant,
}

/// Number of pages kept before the oldest are culled.
pub const MAX_ENTRIES: usize = 300;

/// Process-wide cache of rendered pages keyed by request URL.
///
/// Entries live for a fixed time; writes elsewhere never invalidate them,
/// only [`PageCache::clear`] does. Expired pages are purged on every insert
/// and the cache never holds more than its entry limit.
pub struct PageCache {
    entries: DashMap<String, CachedPage>,
    ttl: Duration,
    max_entries: usize,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_max_entries(ttl, MAX_ENTRIES)
    }

    pub fn with_max_entries(ttl: Duration, max_entries: usize) -> Self {
        PageCache {
            entries: DashMap::new(),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        let hit = self
            .entries
            .get(key)
            .and_then(|entry| (entry.expires_at > now).then(|| entry.body.clone()));
        if hit.is_none() {
            self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        }
        hit
    }

    pub fn insert(&self, key: String, body: String) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);
        if !self.entries.contains_key(&key) {
            self.cull();
        }
        self.entries.insert(
            key,
            CachedPage {
                body,
                expires_at: now + self.ttl,
            },
        );
    }

    /// Makes room for one more page by dropping at least a third of the
    /// entries, those closest to expiry first.
    fn cull(&self) {
        let len = self.entries.len();
        if len < self.max_entries {
            return;
        }
        let mut by_expiry: Vec<(Instant, String)> = self
            .entries
            .iter()
            .map(|entry| (entry.expires_at, entry.key().clone()))
            .collect();
        by_expiry.sort();

        let drop = (len + 1 - self.max_entries).max(self.max_entries / 3);
        for (_, key) in by_expiry.into_iter().take(drop) {
            self.entries.remove(&key);
        }
        log::debug!("Page cache culled {} entries", drop.min(len));
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serves_until_cleared() {
        let cache = PageCache::new(Duration::from_secs(20));
        cache.insert("/".to_string(), "first".to_string());
        assert_eq!(cache.get("/").as_deref(), Some("first"));
        assert_eq!(cache.get("/?page=2"), None);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get("/"), None);
    }

    #[test]
    fn expired_entries_are_dropped() {
        let cache = PageCache::new(Duration::ZERO);
        cache.insert("/".to_string(), "stale".to_string());
        assert_eq!(cache.get("/"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn insert_purges_expired_pages() {
        let cache = PageCache::new(Duration::ZERO);
        for i in 0..50 {
            cache.insert(format!("/?junk={}", i), "page".to_string());
        }
        // Only the page just written is left; the others had expired.
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn entry_count_is_capped() {
        let cache = PageCache::with_max_entries(Duration::from_secs(60), 10);
        for i in 0..25 {
            cache.insert(format!("/?page={}", i), format!("page {}", i));
        }
        assert!(cache.len() <= 10, "cache holds {} pages", cache.len());
        assert_eq!(cache.get("/?page=24").as_deref(), Some("page 24"));

        // Refreshing a cached key does not evict anything.
        let before = cache.len();
        cache.insert("/?page=24".to_string(), "fresh".to_string());
        assert_eq!(cache.len(), before);
    }
}
