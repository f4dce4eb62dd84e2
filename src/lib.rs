//! `Wayfarer` - travel agency marketing and booking backend
//!
//! This library provides the domain model, the admin form-state editors and
//! submission serializer, persistence, and the public/admin HTTP API for a
//! tour-operator website.

pub mod api;
pub mod cache;
pub mod config;
pub mod currency;
pub mod email;
pub mod error;
pub mod form;
pub mod i18n;
pub mod models;
pub mod seed;
pub mod store;
pub mod web;

// Re-export core types for public API
pub use cache::CatalogCache;
pub use config::WayfarerConfig;
pub use currency::Currency;
pub use error::{ApiError, WayfarerError};
pub use form::{BlogPostDraft, FormError, ListEditor, RecordListEditor, TourDraft, TourPayload};
pub use i18n::Locale;
pub use models::{BlogPost, Booking, Difficulty, Faq, ItineraryDay, Month, Tour};
pub use store::Db;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WayfarerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
