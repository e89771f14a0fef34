// Shared components
pub mod config;
pub mod error;
pub mod events;
pub mod telemetry;

// Request layer
pub mod client;
pub mod transport;

// Locale data for UI layers
pub mod locale;

pub use client::ServiceClient;
pub use error::{ClientError, Result};
pub use locale::{
    create_locale_cache, sort_array, sort_array_by, sort_object, Locale, LocaleCache,
    LocaleOption, LocaleOptions, ObserverRef,
};
