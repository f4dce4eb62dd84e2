//! Admin form-state model for tour and blog authoring
//!
//! The admin UI edits a `TourDraft`: a single source of truth holding the
//! scalar field store (raw text, as delivered by controlled inputs) and one
//! list editor per ordered collection. All mutation flows through
//! [`TourDraft::apply`]; submission goes through the serializer, which
//! coerces numeric fields, normalizes the slug, renumbers itinerary days,
//! and JSON-encodes every collection into the wire payload the persistence
//! endpoint stores as text columns.
//!
//! List operations are bounds-checked and return [`FormError`] instead of
//! trusting caller-supplied indices.

mod draft;
mod list_editor;
mod record_editor;
mod serializer;

use thiserror::Error;

pub use draft::{
    BlogPostDraft, FaqEdit, ItineraryEdit, ListField, TourDraft, TourFormAction,
};
pub use list_editor::ListEditor;
pub use record_editor::RecordListEditor;
pub use serializer::{
    decode_faqs, decode_itinerary, decode_months, decode_string_list, encode_list, slugify,
    BlogPostPayload, TourPayload,
};

/// Errors raised by the form editors and the submission serializer
#[derive(Error, Debug)]
pub enum FormError {
    /// A list operation addressed a position that does not exist
    #[error("index {index} is out of bounds for a list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A required field was left empty
    #[error("field '{field}' is required")]
    MissingField { field: &'static str },

    /// A numeric field holds text that does not parse
    #[error("field '{field}' is not a valid number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    /// A numeric field holds a negative value where none is allowed
    #[error("field '{field}' must not be negative")]
    NegativeNumber { field: &'static str },

    /// A stored collection could not be decoded back into editor state
    #[error("stored {what} could not be decoded: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
