//! Ordered collection of composite records within a larger form
//!
//! Same contract as [`super::ListEditor`] but each element is a record with
//! named fields (itinerary days, FAQs). Field-level updates go through a
//! mutator closure that receives exactly one record; sibling fields and
//! sibling records are never touched. No cross-record invariant is enforced
//! here - day renumbering is the serializer's job.

use serde::{Deserialize, Serialize};

use super::FormError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordListEditor<T> {
    records: Vec<T>,
}

impl<T> Default for RecordListEditor<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T> RecordListEditor<T> {
    /// Empty list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Editor state decoded from persisted records
    #[must_use]
    pub fn from_records(records: Vec<T>) -> Self {
        Self { records }
    }

    /// Append a record at the end. Always succeeds.
    pub fn push(&mut self, record: T) {
        self.records.push(record);
    }

    /// Update fields of the record at `index` through `mutate`
    pub fn update<F>(&mut self, index: usize, mutate: F) -> Result<(), FormError>
    where
        F: FnOnce(&mut T),
    {
        let len = self.records.len();
        let record = self
            .records
            .get_mut(index)
            .ok_or(FormError::IndexOutOfBounds { index, len })?;
        mutate(record);
        Ok(())
    }

    /// Remove the record at `index`, shifting later records down by one
    pub fn remove(&mut self, index: usize) -> Result<T, FormError> {
        if index >= self.records.len() {
            return Err(FormError::IndexOutOfBounds {
                index,
                len: self.records.len(),
            });
        }
        Ok(self.records.remove(index))
    }

    #[must_use]
    pub fn records(&self) -> &[T] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<T> {
        self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
