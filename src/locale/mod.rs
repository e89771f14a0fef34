//! Locale data for UI layers.
//!
//! This module provides:
//! - [`LocaleCache`], a subscribable cache of the service's locales
//! - [`sort_array`] / [`sort_object`], which turn per-record translations into
//!   per-locale option lists sorted by display text
//!
//! # Example
//!
//! ```ignore
//! let cache = create_locale_cache(ServiceClient::new(transport, events, &settings.service));
//!
//! let observer: ObserverRef = Arc::new(|locales: &[Locale]| {
//!     tracing::info!(count = locales.len(), "Locales changed");
//! });
//!
//! // Empty on first call, the observer receives the list once loaded
//! let current = cache.subscribe(observer.clone());
//!
//! cache.unsubscribe(&observer);
//! ```

mod cache;
mod sort;
mod types;

pub use cache::{create_locale_cache, LocaleCache, LocaleSource};
pub use sort::{
    sort_array, sort_array_by, sort_object, SortError, SortResult, DEFAULT_ID_KEY,
    DEFAULT_VALUE_KEY,
};
pub use types::{Locale, LocaleObserver, LocaleOption, LocaleOptions, ObserverRef};
