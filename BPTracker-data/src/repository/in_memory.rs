use std::sync::{Arc, Mutex};

use super::errors::RepositoryError;
use crate::models::reading::ReadingRecord;

/// In-memory storage implementation for readings
///
/// Keeps the readings as an ordered collection; clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    readings: Arc<Mutex<Vec<ReadingRecord>>>,
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reading to the collection
    pub async fn store_reading(&self, reading: &ReadingRecord) -> Result<ReadingRecord, RepositoryError> {
        let mut store = self.readings.lock()?;
        if store.iter().any(|r| r.id == reading.id) {
            return Err(RepositoryError::Validation(format!("duplicate reading id {}", reading.id)));
        }
        store.push(reading.clone());
        Ok(reading.clone())
    }

    /// Get all readings in collection order
    pub async fn get_all(&self) -> Result<Vec<ReadingRecord>, RepositoryError> {
        let store = self.readings.lock()?;
        Ok(store.clone())
    }

    /// Get a reading by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<ReadingRecord>, RepositoryError> {
        let store = self.readings.lock()?;
        Ok(store.iter().find(|r| r.id == id).cloned())
    }

    /// Remove a reading, returning whether it existed
    pub async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let mut store = self.readings.lock()?;
        let before = store.len();
        store.retain(|r| r.id != id);
        Ok(store.len() != before)
    }

    /// Remove every reading, returning how many were removed
    pub async fn clear(&self) -> Result<usize, RepositoryError> {
        let mut store = self.readings.lock()?;
        let removed = store.len();
        store.clear();
        Ok(removed)
    }

    /// Replace the whole collection, keeping the given order
    pub async fn replace_all(&self, readings: &[ReadingRecord]) -> Result<(), RepositoryError> {
        let mut store = self.readings.lock()?;
        *store = readings.to_vec();
        Ok(())
    }

    /// Append several readings at the end of the collection
    pub async fn append_all(&self, readings: &[ReadingRecord]) -> Result<(), RepositoryError> {
        let mut store = self.readings.lock()?;
        if let Some(dup) = readings.iter().find(|new| store.iter().any(|r| r.id == new.id)) {
            return Err(RepositoryError::Validation(format!("duplicate reading id {}", dup.id)));
        }
        store.extend_from_slice(readings);
        Ok(())
    }

    /// Number of stored readings
    pub async fn count(&self) -> Result<usize, RepositoryError> {
        let store = self.readings.lock()?;
        Ok(store.len())
    }
}
