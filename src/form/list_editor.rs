//! Ordered collection of free-text strings within a larger form
//!
//! Highlights, inclusions, exclusions, and requirements each use one of
//! these, independent of the rest of the form. Order is insertion order;
//! duplicates and empty strings are allowed (list contents are not
//! validated, only scalar fields are at submit time).

use serde::{Deserialize, Serialize};

use super::FormError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEditor {
    items: Vec<String>,
}

impl ListEditor {
    /// Empty list
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The create-form default: a single empty placeholder row
    #[must_use]
    pub fn single_empty() -> Self {
        Self {
            items: vec![String::new()],
        }
    }

    /// Editor state decoded from persisted items
    #[must_use]
    pub fn from_items(items: Vec<String>) -> Self {
        Self { items }
    }

    /// Append a value at the end. Always succeeds.
    pub fn push(&mut self, value: impl Into<String>) {
        self.items.push(value.into());
    }

    /// Replace the element at `index`
    pub fn update(&mut self, index: usize, value: impl Into<String>) -> Result<(), FormError> {
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(FormError::IndexOutOfBounds { index, len })?;
        *slot = value.into();
        Ok(())
    }

    /// Remove the element at `index`, shifting later elements down by one
    pub fn remove(&mut self, index: usize) -> Result<String, FormError> {
        if index >= self.items.len() {
            return Err(FormError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    #[must_use]
    pub fn into_items(self) -> Vec<String> {
        self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
