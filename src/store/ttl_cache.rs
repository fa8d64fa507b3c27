// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::time::Instant;

/// Map whose entries expire a fixed time after insertion.
///
/// Expiry is lazy: stale entries are dropped when read, or in bulk by [`TtlCache::evict_expired`].
#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, (V, Instant)>,
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: HashMap::new() }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get<Q>(&mut self, key: &Q, now: Instant) -> Option<&V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let expired = match self.entries.get(key) {
            None => return None,
            Some((_, stored_at)) => self.is_expired(*stored_at, now),
        };
        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|(value, _)| value)
    }

    pub fn put(&mut self, key: K, value: V, now: Instant) {
        self.entries.insert(key, (value, now));
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.remove(key).map(|(value, _)| value)
    }

    /// Drops every expired entry; returns how many were removed.
    pub fn evict_expired(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, (_, stored_at)| now.saturating_duration_since(*stored_at) < ttl);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn is_expired(&self, stored_at: Instant, now: Instant) -> bool {
        now.saturating_duration_since(stored_at) >= self.ttl
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::TtlCache;

    const TTL: Duration = Duration::from_secs(300);

    #[test]
    fn entries_expire_lazily_on_read() {
        let start = Instant::now();
        let mut cache = TtlCache::new(TTL);
        cache.put("a".to_owned(), 1, start);

        assert_eq!(cache.get("a", start + Duration::from_secs(299)), Some(&1));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a", start + TTL), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn put_refreshes_timestamp() {
        let start = Instant::now();
        let mut cache = TtlCache::new(TTL);
        cache.put("a".to_owned(), 1, start);
        cache.put("a".to_owned(), 2, start + Duration::from_secs(200));
        assert_eq!(cache.get("a", start + Duration::from_secs(400)), Some(&2));
    }

    #[test]
    fn evict_expired_removes_only_stale_entries() {
        let start = Instant::now();
        let mut cache = TtlCache::new(TTL);
        cache.put("old".to_owned(), 1, start);
        cache.put("new".to_owned(), 2, start + Duration::from_secs(250));

        assert_eq!(cache.evict_expired(start + Duration::from_secs(301)), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.remove("new"), Some(2));
    }
}
