use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A language/region supported by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    /// Locale code, e.g. `en-US`
    #[serde(rename = "_id")]
    pub id: String,

    /// Display name
    pub name: String,
}

impl Locale {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A display option tagged with the id of the record it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleOption {
    pub id: String,
    pub text: String,
}

impl LocaleOption {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Locale code -> options sorted by display text
pub type LocaleOptions = BTreeMap<String, Vec<LocaleOption>>;

/// Receives the locale list whenever the cache refreshes.
///
/// The slice is shared by every observer of one refresh; copy it if you need
/// to keep or change it.
///
/// Observers run on the refresh task. A panic in one is caught and logged and
/// the remaining observers are still notified, so `notify` should not rely on
/// unwinding to signal anything.
pub trait LocaleObserver: Send + Sync {
    fn notify(&self, locales: &[Locale]);
}

impl<F> LocaleObserver for F
where
    F: Fn(&[Locale]) + Send + Sync,
{
    fn notify(&self, locales: &[Locale]) {
        self(locales)
    }
}

/// Shared observer handle; identity is the allocation, see [`Arc::ptr_eq`]
pub type ObserverRef = Arc<dyn LocaleObserver>;
