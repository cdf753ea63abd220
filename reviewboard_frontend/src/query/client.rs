use std::any::Any;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Duration;

use log::info;

use super::cache::{Lookup, QueryCache};
use super::clock::Clock;
use super::key::QueryKey;
use super::mutation::{Mutation, MutationOutput};
use super::retry::RetryPolicy;
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{Comment, Page, Review, ReviewFilters, ReviewStats};
use crate::review_query::ReviewListQuery;

pub const RECENT_REVIEWS_SIZE: u32 = 6;
pub const COMMENT_PAGE_SIZE: u32 = 10;

struct Shared {
    cache: Mutex<QueryCache>,
    settled: Condvar,
}

/// API client plus the shared query cache. Cheap to clone into worker threads.
#[derive(Clone)]
pub struct QueryClient {
    api: ApiClient,
    shared: Arc<Shared>,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
}

impl QueryClient {
    pub fn new(
        api: ApiClient,
        clock: Arc<dyn Clock>,
        stale_time: Duration,
        retry: RetryPolicy,
    ) -> Self {
        let cache = QueryCache::new(clock.clone(), stale_time);
        Self {
            api,
            shared: Arc::new(Shared {
                cache: Mutex::new(cache),
                settled: Condvar::new(),
            }),
            clock,
            retry,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn cache(&self) -> MutexGuard<'_, QueryCache> {
        self.shared.cache.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn read<T: Any + Send + Sync>(&self, key: &QueryKey) -> Lookup<T> {
        self.cache().lookup(key)
    }

    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.cache().is_fetching(key)
    }

    pub fn failure(&self, key: &QueryKey) -> Option<ApiError> {
        self.cache().failure(key)
    }

    pub fn clear_error(&self, key: &QueryKey) {
        self.cache().clear_error(key);
    }

    /// Fresh cached value, or the result of one shared fetch.
    ///
    /// If another thread is already fetching `key`, this waits for that
    /// fetch instead of issuing a second request.
    pub fn fetch<T, F>(&self, key: &QueryKey, loader: F) -> Result<Arc<T>, ApiError>
    where
        T: Any + Send + Sync,
        F: Fn(&ApiClient) -> Result<T, ApiError>,
    {
        let mut cache = self.cache();
        loop {
            if let Lookup::Fresh(value) = cache.lookup::<T>(key) {
                return Ok(value);
            }
            if cache.try_begin(key) {
                break;
            }
            cache = self
                .shared
                .settled
                .wait(cache)
                .unwrap_or_else(|e| e.into_inner());
            if cache.is_fetching(key) {
                continue;
            }
            if let Lookup::Fresh(value) = cache.lookup::<T>(key) {
                return Ok(value);
            }
            if let Some(err) = cache.failure(key) {
                return Err(err);
            }
        }
        drop(cache);

        let result = self.retry.run(self.clock.as_ref(), || loader(&self.api));

        let outcome = self.cache().complete(key, result);
        self.shared.settled.notify_all();
        outcome
    }

    /// Runs a write once and, if it succeeds, invalidates what it affects.
    pub fn mutate(&self, mutation: &Mutation) -> Result<MutationOutput, ApiError> {
        let output = mutation.execute(&self.api)?;
        let mut cache = self.cache();
        for prefix in mutation.invalidates() {
            cache.invalidate(&prefix);
        }
        drop(cache);
        self.shared.settled.notify_all();
        info!("mutation succeeded: {}", mutation.success_message());
        Ok(output)
    }

    pub fn stats(&self) -> Result<Arc<ReviewStats>, ApiError> {
        self.fetch(&QueryKey::stats(), |api| api.get_stats())
    }

    pub fn recent_reviews(&self) -> Result<Arc<Page<Review>>, ApiError> {
        self.fetch(&QueryKey::recent_reviews(), |api| {
            api.list_reviews(&ReviewFilters {
                sort: Some("createdAt,desc".to_string()),
                size: Some(RECENT_REVIEWS_SIZE),
                page: Some(0),
                ..ReviewFilters::default()
            })
        })
    }

    pub fn reviews(&self, query: &ReviewListQuery) -> Result<Arc<Page<Review>>, ApiError> {
        let filters = query.to_filters();
        self.fetch(&query.query_key(), move |api| api.list_reviews(&filters))
    }

    pub fn review(&self, id: i64) -> Result<Arc<Review>, ApiError> {
        self.fetch(&QueryKey::review(id), move |api| api.get_review(id))
    }

    pub fn comments(
        &self,
        review_id: i64,
        page: u32,
        limit: u32,
    ) -> Result<Arc<Page<Comment>>, ApiError> {
        self.fetch(&QueryKey::comments(review_id, page, limit), move |api| {
            api.list_comments(review_id, page, limit)
        })
    }

    pub fn replies(
        &self,
        review_id: i64,
        comment_id: i64,
        page: u32,
        size: u32,
    ) -> Result<Arc<Page<Comment>>, ApiError> {
        self.fetch(
            &QueryKey::replies(review_id, comment_id, page, size),
            move |api| api.list_replies(review_id, comment_id, page, size),
        )
    }
}
