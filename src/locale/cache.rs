//! Reactive cache of the locales offered by the service.
//!
//! The first subscriber triggers a background read; once it resolves every
//! subscriber is notified, in registration order, with one shared copy of the
//! new list. At most one read is outstanding at a time. A failed or empty
//! read leaves the cache as it was and allows the next subscriber to retry.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::task::JoinHandle;

use super::types::{Locale, ObserverRef};
use crate::error::Result;

/// Where the cache loads its locales from
#[async_trait]
pub trait LocaleSource: Send + Sync {
    /// Read every locale the service knows about
    async fn read_locales(&self) -> Result<Vec<Locale>>;
}

#[derive(Default)]
struct CacheState {
    /// `None` until the first successful read
    locales: Option<Vec<Locale>>,
    /// Notified in this order; the same observer may appear more than once
    subscribers: Vec<ObserverRef>,
    fetch_in_flight: bool,
}

struct CacheInner {
    source: Arc<dyn LocaleSource>,
    state: Mutex<CacheState>,
}

impl CacheInner {
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn complete(&self, result: Result<Vec<Locale>>) {
        let update = {
            let mut state = self.lock();
            state.fetch_in_flight = false;

            match result {
                Ok(locales) if !locales.is_empty() => {
                    tracing::info!(count = locales.len(), "Locales refreshed");
                    let snapshot = locales.clone();
                    state.locales = Some(locales);
                    Some((snapshot, state.subscribers.clone()))
                }
                Ok(_) => {
                    tracing::warn!("Locale refresh returned no locales, keeping current list");
                    None
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Locale refresh failed, keeping current list");
                    None
                }
            }
        };

        // Observers run without the lock so they may call back into the cache
        if let Some((snapshot, subscribers)) = update {
            notify_all(&snapshot, &subscribers);
        }
    }
}

fn notify_all(snapshot: &[Locale], subscribers: &[ObserverRef]) {
    tracing::debug!(subscribers = subscribers.len(), "Notifying locale subscribers");
    for (index, observer) in subscribers.iter().enumerate() {
        // A panicking observer must not starve the ones registered after it
        if panic::catch_unwind(AssertUnwindSafe(|| observer.notify(snapshot))).is_err() {
            tracing::error!(index, "Locale observer panicked");
        }
    }
}

/// Handle to the locale cache.
///
/// Cloning shares the same cache; create one per application and pass it to
/// whoever needs locales.
#[derive(Clone)]
pub struct LocaleCache {
    inner: Arc<CacheInner>,
}

impl LocaleCache {
    pub fn new(source: Arc<dyn LocaleSource>) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                source,
                state: Mutex::new(CacheState::default()),
            }),
        }
    }

    /// Copy of the cached locales, empty if they were never loaded.
    ///
    /// Never triggers a read.
    pub fn get(&self) -> Vec<Locale> {
        self.inner.lock().locales.clone().unwrap_or_default()
    }

    /// Register `observer` for future refreshes and return the current list.
    ///
    /// If nothing is cached yet this starts a background read (unless one is
    /// already running) and returns an empty list right away; the real list
    /// arrives through `observer`. Must be called within a Tokio runtime for
    /// the read to start.
    pub fn subscribe(&self, observer: ObserverRef) -> Vec<Locale> {
        let cached = {
            let mut state = self.inner.lock();
            state.subscribers.push(observer);
            tracing::debug!(subscribers = state.subscribers.len(), "Locale subscriber added");
            state.locales.clone()
        };

        match cached {
            Some(locales) => locales,
            None => {
                self.refresh();
                Vec::new()
            }
        }
    }

    /// Remove the first registration of `observer`, compared by identity.
    pub fn unsubscribe(&self, observer: &ObserverRef) {
        let mut state = self.inner.lock();
        if let Some(pos) = state
            .subscribers
            .iter()
            .position(|s| Arc::ptr_eq(s, observer))
        {
            state.subscribers.remove(pos);
            tracing::debug!(subscribers = state.subscribers.len(), "Locale subscriber removed");
        }
    }

    /// Whether a successful read has populated the cache
    pub fn is_loaded(&self) -> bool {
        self.inner.lock().locales.is_some()
    }

    /// Whether a read is currently outstanding
    pub fn is_refreshing(&self) -> bool {
        self.inner.lock().fetch_in_flight
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    /// Drop every subscriber. Cached locales are kept.
    pub fn shutdown(&self) {
        let mut state = self.inner.lock();
        let dropped = state.subscribers.len();
        state.subscribers.clear();
        tracing::info!(dropped, "Locale cache shut down");
    }

    /// Start a background read unless one is already running.
    fn refresh(&self) -> Option<JoinHandle<()>> {
        {
            let mut state = self.inner.lock();
            if state.fetch_in_flight {
                tracing::debug!("Locale refresh already in flight");
                return None;
            }
            state.fetch_in_flight = true;
        }

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!(error = %e, "No Tokio runtime, cannot refresh locales");
                self.inner.lock().fetch_in_flight = false;
                return None;
            }
        };

        tracing::debug!("Refreshing locales");
        let inner = self.inner.clone();
        Some(handle.spawn(async move {
            let result = inner.source.read_locales().await;
            inner.complete(result);
        }))
    }
}

/// Create a cache reading from `source`
pub fn create_locale_cache<S: LocaleSource + 'static>(source: S) -> LocaleCache {
    LocaleCache::new(Arc::new(source))
}
