use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info};

use super::clock::Clock;
use super::key::QueryKey;
use crate::error::ApiError;

pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(5 * 60);

type Value = Arc<dyn Any + Send + Sync>;

/// What a reader finds under a key.
#[derive(Debug)]
pub enum Lookup<T> {
    /// Within the freshness window.
    Fresh(Arc<T>),
    /// Past the freshness window or invalidated: show it, refetch in the background.
    Stale(Arc<T>),
    /// Nothing was ever loaded and the last fetch failed.
    Failed(ApiError),
    Missing,
}

impl<T> Lookup<T> {
    pub fn value(&self) -> Option<&Arc<T>> {
        match self {
            Lookup::Fresh(v) | Lookup::Stale(v) => Some(v),
            _ => None,
        }
    }

    pub fn needs_fetch(&self) -> bool {
        matches!(self, Lookup::Stale(_) | Lookup::Missing)
    }
}

#[derive(Default)]
struct Entry {
    value: Option<(Value, Instant)>,
    invalidated: bool,
    error: Option<ApiError>,
}

/// Keyed store of fetched values with freshness tracking.
///
/// Entries are only ever replaced wholesale by a completed fetch or marked
/// stale by `invalidate`; nothing edits a cached value in place.
pub struct QueryCache {
    entries: HashMap<QueryKey, Entry>,
    in_flight: HashSet<QueryKey>,
    invalidated_in_flight: HashSet<QueryKey>,
    clock: Arc<dyn Clock>,
    stale_time: Duration,
}

impl QueryCache {
    pub fn new(clock: Arc<dyn Clock>, stale_time: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            in_flight: HashSet::new(),
            invalidated_in_flight: HashSet::new(),
            clock,
            stale_time,
        }
    }

    pub fn lookup<T: Any + Send + Sync>(&self, key: &QueryKey) -> Lookup<T> {
        let Some(entry) = self.entries.get(key) else {
            return Lookup::Missing;
        };
        // A failed refetch keeps serving the last value.
        let Some((value, fetched_at)) = &entry.value else {
            return match &entry.error {
                Some(err) => Lookup::Failed(err.clone()),
                None => Lookup::Missing,
            };
        };
        let Ok(typed) = value.clone().downcast::<T>() else {
            return Lookup::Missing;
        };
        let age = self.clock.now().saturating_duration_since(*fetched_at);
        if entry.invalidated || age >= self.stale_time {
            Lookup::Stale(typed)
        } else {
            Lookup::Fresh(typed)
        }
    }

    /// Error of the last fetch of `key`, if it failed and was not cleared.
    pub fn failure(&self, key: &QueryKey) -> Option<ApiError> {
        self.entries.get(key).and_then(|entry| entry.error.clone())
    }

    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.in_flight.contains(key)
    }

    /// Claims the fetch for `key`. Returns false when another fetch already owns it.
    pub fn try_begin(&mut self, key: &QueryKey) -> bool {
        self.in_flight.insert(key.clone())
    }

    /// Records the outcome of the fetch claimed with `try_begin`.
    pub fn complete<T: Any + Send + Sync>(
        &mut self,
        key: &QueryKey,
        result: Result<T, ApiError>,
    ) -> Result<Arc<T>, ApiError> {
        self.in_flight.remove(key);
        let invalidated_meanwhile = self.invalidated_in_flight.remove(key);
        let now = self.clock.now();
        let entry = self.entries.entry(key.clone()).or_default();
        match result {
            Ok(value) => {
                let value = Arc::new(value);
                entry.value = Some((value.clone() as Value, now));
                entry.invalidated = invalidated_meanwhile;
                entry.error = None;
                debug!("cached {key}");
                Ok(value)
            }
            Err(err) => {
                entry.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Marks every entry under `prefix` stale and returns the keys it touched.
    pub fn invalidate(&mut self, prefix: &QueryKey) -> Vec<QueryKey> {
        let mut touched = Vec::new();
        for (key, entry) in self.entries.iter_mut() {
            if key.starts_with(prefix) {
                entry.invalidated = true;
                entry.error = None;
                touched.push(key.clone());
            }
        }
        for key in &self.in_flight {
            if key.starts_with(prefix) {
                self.invalidated_in_flight.insert(key.clone());
            }
        }
        touched.sort();
        info!("invalidated {prefix} ({} entries)", touched.len());
        touched
    }

    /// Forgets a recorded failure so the next read tries again.
    pub fn clear_error(&mut self, key: &QueryKey) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.error = None;
        }
    }

    /// Returns the fresh value, or runs `loader` and caches what it yields.
    pub fn get_or_fetch<T, F>(&mut self, key: &QueryKey, loader: F) -> Result<Arc<T>, ApiError>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> Result<T, ApiError>,
    {
        if let Lookup::Fresh(value) = self.lookup::<T>(key) {
            return Ok(value);
        }
        self.try_begin(key);
        let result = loader();
        self.complete(key, result)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.invalidated_in_flight.clear();
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::clock::ManualClock;
    use std::cell::Cell;

    fn cache() -> (QueryCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        (QueryCache::new(clock.clone(), DEFAULT_STALE_TIME), clock)
    }

    #[test]
    fn fresh_values_are_served_without_loading() {
        let (mut cache, _) = cache();
        let key = QueryKey::stats();
        let calls = Cell::new(0);
        let load = || {
            calls.set(calls.get() + 1);
            Ok::<_, ApiError>(calls.get())
        };
        assert_eq!(*cache.get_or_fetch(&key, load).unwrap(), 1);
        assert_eq!(*cache.get_or_fetch(&key, load).unwrap(), 1);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn values_go_stale_after_the_window() {
        let (mut cache, clock) = cache();
        let key = QueryKey::stats();
        cache.get_or_fetch(&key, || Ok::<_, ApiError>(1u32)).unwrap();

        clock.advance(Duration::from_secs(299));
        assert!(matches!(cache.lookup::<u32>(&key), Lookup::Fresh(_)));

        clock.advance(Duration::from_secs(1));
        assert!(matches!(cache.lookup::<u32>(&key), Lookup::Stale(_)));
        assert_eq!(*cache.get_or_fetch(&key, || Ok::<_, ApiError>(2u32)).unwrap(), 2);
    }

    #[test]
    fn invalidation_matches_prefix_only() {
        let (mut cache, _) = cache();
        let page0 = QueryKey::comments(1, 0, 10);
        let page1 = QueryKey::comments(1, 1, 10);
        let other = QueryKey::comments(2, 0, 10);
        for key in [&page0, &page1, &other] {
            cache.get_or_fetch(key, || Ok::<_, ApiError>(0u8)).unwrap();
        }

        let touched = cache.invalidate(&QueryKey::comments_of(1));
        assert_eq!(touched, vec![page0.clone(), page1.clone()]);
        assert!(matches!(cache.lookup::<u8>(&page0), Lookup::Stale(_)));
        assert!(matches!(cache.lookup::<u8>(&other), Lookup::Fresh(_)));
    }

    #[test]
    fn failures_are_remembered_until_cleared() {
        let (mut cache, _) = cache();
        let key = QueryKey::review(1);
        assert!(cache.try_begin(&key));
        let _ = cache.complete::<u8>(&key, Err(ApiError::NotFound));
        assert!(matches!(cache.lookup::<u8>(&key), Lookup::Failed(ApiError::NotFound)));

        cache.clear_error(&key);
        assert!(matches!(cache.lookup::<u8>(&key), Lookup::Missing));
    }

    #[test]
    fn failed_refetch_keeps_the_stale_value() {
        let (mut cache, clock) = cache();
        let key = QueryKey::review(3);
        cache.get_or_fetch(&key, || Ok::<_, ApiError>(7u8)).unwrap();
        clock.advance(DEFAULT_STALE_TIME);

        let failed = cache.get_or_fetch::<u8, _>(&key, || Err(ApiError::Transport("reset".into())));
        assert!(failed.is_err());
        match cache.lookup::<u8>(&key) {
            Lookup::Stale(value) => assert_eq!(*value, 7),
            other => panic!("expected the old value, got {other:?}"),
        }
        assert_eq!(cache.failure(&key), Some(ApiError::Transport("reset".into())));

        cache.clear_error(&key);
        assert_eq!(cache.failure(&key), None);
        assert!(matches!(cache.lookup::<u8>(&key), Lookup::Stale(_)));
    }

    #[test]
    fn in_flight_claims_are_exclusive() {
        let (mut cache, _) = cache();
        let key = QueryKey::stats();
        assert!(cache.try_begin(&key));
        assert!(!cache.try_begin(&key));
        assert!(cache.is_fetching(&key));
        cache.complete(&key, Ok::<_, ApiError>(1u8)).unwrap();
        assert!(!cache.is_fetching(&key));
    }

    #[test]
    fn invalidation_during_fetch_leaves_result_stale() {
        let (mut cache, _) = cache();
        let key = QueryKey::review(9);
        assert!(cache.try_begin(&key));
        cache.invalidate(&QueryKey::review(9));
        cache.complete(&key, Ok::<_, ApiError>(1u8)).unwrap();
        assert!(matches!(cache.lookup::<u8>(&key), Lookup::Stale(_)));
    }

    #[test]
    fn wrong_type_reads_as_missing() {
        let (mut cache, _) = cache();
        let key = QueryKey::stats();
        cache.get_or_fetch(&key, || Ok::<_, ApiError>(1u8)).unwrap();
        assert!(matches!(cache.lookup::<String>(&key), Lookup::Missing));
    }
}
