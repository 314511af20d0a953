//! In-memory cache of resolved surahs with a time-to-live.

use crate::models::SurahSession;
use bridge_traits::Clock;
use chrono::{DateTime, Utc};
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

struct CacheEntry {
    session: Arc<SurahSession>,
    stored_at: DateTime<Utc>,
}

/// LRU-bounded surah cache. Entries older than the TTL are treated as
/// missing and evicted on lookup.
pub struct SurahCache {
    entries: Mutex<LruCache<u16, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl SurahCache {
    pub fn new(capacity: usize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
            clock,
        }
    }

    pub fn get(&self, surah_number: u16) -> Option<Arc<SurahSession>> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        let expired = match entries.get(&surah_number) {
            Some(entry) if !self.is_expired(entry, now) => {
                return Some(Arc::clone(&entry.session));
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            debug!(surah_number, "Cached surah expired");
            entries.pop(&surah_number);
        }
        None
    }

    pub fn insert(&self, session: Arc<SurahSession>) {
        let entry = CacheEntry {
            stored_at: self.clock.now(),
            session,
        };
        self.entries.lock().put(entry.session.surah_number(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    fn is_expired(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(entry.stored_at);
        match chrono::Duration::from_std(self.ttl) {
            Ok(ttl) => age >= ttl,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RevelationType, SourceTier, SurahMeta};
    use chrono::TimeZone;

    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn advance(&self, by: Duration) {
            let mut now = self.0.lock();
            *now += chrono::Duration::from_std(by).unwrap();
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock()
        }
    }

    fn session(number: u16) -> Arc<SurahSession> {
        Arc::new(SurahSession {
            meta: SurahMeta {
                number,
                name: String::new(),
                english_name: format!("Surah {}", number),
                english_name_translation: String::new(),
                verse_count: 0,
                revelation_type: RevelationType::Unknown,
            },
            verses: Vec::new(),
            source: SourceTier::Primary,
        })
    }

    fn clock() -> Arc<ManualClock> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Arc::new(ManualClock(Mutex::new(start)))
    }

    #[test]
    fn entries_expire_after_ttl() {
        let clock = clock();
        let cache = SurahCache::new(4, Duration::from_secs(60), clock.clone());

        cache.insert(session(2));
        clock.advance(Duration::from_secs(59));
        assert!(cache.get(2).is_some());

        clock.advance(Duration::from_secs(1));
        assert!(cache.get(2).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn least_recently_used_is_evicted() {
        let cache = SurahCache::new(2, Duration::from_secs(60), clock());

        cache.insert(session(2));
        cache.insert(session(3));
        assert!(cache.get(2).is_some());
        cache.insert(session(4));

        assert!(cache.get(3).is_none());
        assert!(cache.get(2).is_some());
        assert!(cache.get(4).is_some());
    }

    #[test]
    fn zero_capacity_still_holds_one_entry() {
        let cache = SurahCache::new(0, Duration::from_secs(60), clock());
        cache.insert(session(5));
        assert_eq!(cache.len(), 1);
    }
}
