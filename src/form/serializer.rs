//! Submission serialization: in-memory form state to the wire payload
//!
//! The persistence schema stores every ordered collection as a JSON string
//! in a text column, so the payload carries `String` fields for them. The
//! helpers here are the single encode/decode implementation shared by the
//! form layer and the store; both directions round-trip losslessly.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::FormError;
use crate::models::{Difficulty, Faq, ItineraryDay, Month};

/// Wire payload for tour create (POST) and update (PUT)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourPayload {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price_usd: f64,
    pub price_eur: Option<f64>,
    pub price_gbp: Option<f64>,
    pub price_inr: Option<f64>,
    pub duration_days: i64,
    pub country: String,
    pub country_code: String,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub difficulty: Difficulty,
    pub group_size_min: Option<i64>,
    pub group_size_max: Option<i64>,
    pub min_age: Option<i64>,
    pub accommodation: Option<String>,
    pub meal_plan: Option<String>,
    /// JSON-encoded `Vec<Month>`
    pub best_months: String,
    /// JSON-encoded `Vec<String>`
    pub highlights: String,
    pub inclusions: String,
    pub exclusions: String,
    pub requirements: String,
    /// JSON-encoded `Vec<ItineraryDay>`
    pub itinerary: String,
    /// JSON-encoded `Vec<Faq>`
    pub faqs: String,
    pub published: bool,
}

/// Wire payload for blog post create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPostPayload {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub body: String,
    pub cover_image: Option<String>,
    /// JSON-encoded `Vec<String>`
    pub tags: String,
    pub author: String,
    pub published: bool,
}

/// JSON-encode an ordered collection for a text column
pub fn encode_list<T: Serialize>(what: &'static str, items: &[T]) -> Result<String, FormError> {
    serde_json::to_string(items).map_err(|source| FormError::Decode { what, source })
}

fn decode_list<T: DeserializeOwned>(what: &'static str, raw: &str) -> Result<Vec<T>, FormError> {
    // Legacy rows may hold an empty string instead of an empty array
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw).map_err(|source| FormError::Decode { what, source })
}

/// Decode a stored string collection (highlights, inclusions, tags, ...)
pub fn decode_string_list(raw: &str) -> Result<Vec<String>, FormError> {
    decode_list("string list", raw)
}

/// Decode a stored itinerary
pub fn decode_itinerary(raw: &str) -> Result<Vec<ItineraryDay>, FormError> {
    decode_list("itinerary", raw)
}

/// Decode stored FAQs
pub fn decode_faqs(raw: &str) -> Result<Vec<Faq>, FormError> {
    decode_list("faqs", raw)
}

/// Decode a stored month set
pub fn decode_months(raw: &str) -> Result<Vec<Month>, FormError> {
    decode_list("months", raw)
}

/// Normalize a title or user-provided slug into a URL-path-safe slug:
/// lowercase, hyphen-separated, no leading/trailing/duplicate hyphens
#[must_use]
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_was_hyphen = true;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Required non-empty text field, trimmed
pub fn required_text(field: &'static str, raw: &str) -> Result<String, FormError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(FormError::MissingField { field });
    }
    Ok(value.to_string())
}

/// Optional text field: empty input becomes `None`, never `Some("")`
#[must_use]
pub fn optional_text(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Required non-negative decimal field
pub fn required_price(field: &'static str, raw: &str) -> Result<f64, FormError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(FormError::MissingField { field });
    }
    parse_price(field, value)
}

/// Optional non-negative decimal field: empty input becomes `None`,
/// anything unparsable is an error rather than a NaN passed downstream
pub fn optional_price(field: &'static str, raw: &str) -> Result<Option<f64>, FormError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    parse_price(field, value).map(Some)
}

fn parse_price(field: &'static str, value: &str) -> Result<f64, FormError> {
    let parsed: f64 = value.parse().map_err(|_| FormError::InvalidNumber {
        field,
        value: value.to_string(),
    })?;
    if !parsed.is_finite() {
        return Err(FormError::InvalidNumber {
            field,
            value: value.to_string(),
        });
    }
    if parsed < 0.0 {
        return Err(FormError::NegativeNumber { field });
    }
    Ok(parsed)
}

/// Required positive integer field
pub fn required_count(field: &'static str, raw: &str) -> Result<i64, FormError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(FormError::MissingField { field });
    }
    parse_count(field, value)
}

/// Optional non-negative integer field
pub fn optional_count(field: &'static str, raw: &str) -> Result<Option<i64>, FormError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    parse_count(field, value).map(Some)
}

fn parse_count(field: &'static str, value: &str) -> Result<i64, FormError> {
    let parsed: i64 = value.parse().map_err(|_| FormError::InvalidNumber {
        field,
        value: value.to_string(),
    })?;
    if parsed < 0 {
        return Err(FormError::NegativeNumber { field });
    }
    Ok(parsed)
}

/// Optional decimal field without the non-negative constraint (coordinates)
pub fn optional_decimal(field: &'static str, raw: &str) -> Result<Option<f64>, FormError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let parsed: f64 = value.parse().map_err(|_| FormError::InvalidNumber {
        field,
        value: value.to_string(),
    })?;
    if !parsed.is_finite() {
        return Err(FormError::InvalidNumber {
            field,
            value: value.to_string(),
        });
    }
    Ok(Some(parsed))
}

/// Renumber itinerary days so the stored `day` field always equals
/// position + 1, regardless of how the editor reordered or removed rows
#[must_use]
pub fn renumber_itinerary(mut days: Vec<ItineraryDay>) -> Vec<ItineraryDay> {
    for (index, day) in days.iter_mut().enumerate() {
        day.day = index as u32 + 1;
    }
    days
}
