use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::DatabaseStorage;
use crate::database::{get_db_pool, DatabasePool};
use crate::models::reading::{CreateReadingRecord, ReadingRecord};

/// Repository trait for readings
///
/// The repository owns the single ordered collection of readings. Collection
/// order is insertion order until it is replaced wholesale.
#[async_trait]
pub trait ReadingRepositoryTrait {
    /// Create a new reading from a request, assigning a fresh id
    async fn create(&self, request: CreateReadingRecord) -> Result<ReadingRecord, RepositoryError>;

    /// Get all readings in collection order
    async fn get_all(&self) -> Result<Vec<ReadingRecord>, RepositoryError>;

    /// Get a reading by ID
    async fn get_by_id(&self, id: &str) -> Result<Option<ReadingRecord>, RepositoryError>;

    /// Delete a reading by ID; `NotFound` if it does not exist
    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;

    /// Delete every reading, returning how many were removed
    async fn clear(&self) -> Result<usize, RepositoryError>;

    /// Replace the collection with the given readings, in the given order
    async fn replace_all(&self, readings: Vec<ReadingRecord>) -> Result<(), RepositoryError>;

    /// Append new readings, assigning fresh ids; returns the stored records
    async fn append_all(&self, requests: Vec<CreateReadingRecord>) -> Result<Vec<ReadingRecord>, RepositoryError>;

    /// Number of stored readings
    async fn count(&self) -> Result<usize, RepositoryError>;
}

#[derive(Debug, Clone)]
enum Backend {
    Memory(InMemoryStorage),
    Database(DatabasePool),
}

/// Repository for readings, backed by SQLite or by in-memory storage
#[derive(Debug, Clone)]
pub struct ReadingRepository {
    backend: Backend,
}

impl Default for ReadingRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingRepository {
    /// Create a repository on the global database pool, or in memory when no
    /// pool has been initialised
    pub fn new() -> Self {
        match get_db_pool() {
            Ok(pool) => Self::with_pool(pool),
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                Self::in_memory()
            }
        }
    }

    /// Create a repository on an explicit pool
    pub fn with_pool(pool: DatabasePool) -> Self {
        Self {
            backend: Backend::Database(pool),
        }
    }

    /// Create a repository that only keeps readings in memory
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(InMemoryStorage::new()),
        }
    }

    /// Whether readings are written to a database
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, Backend::Database(_))
    }
}

fn ensure_unique_ids(readings: &[ReadingRecord]) -> Result<(), RepositoryError> {
    let mut seen = std::collections::HashSet::with_capacity(readings.len());
    for reading in readings {
        if !seen.insert(reading.id.as_str()) {
            return Err(RepositoryError::Validation(format!("duplicate reading id {}", reading.id)));
        }
    }
    Ok(())
}

#[async_trait]
impl ReadingRepositoryTrait for ReadingRepository {
    async fn create(&self, request: CreateReadingRecord) -> Result<ReadingRecord, RepositoryError> {
        let reading = request.into_record(Uuid::new_v4().to_string());

        match &self.backend {
            Backend::Database(pool) => {
                DatabaseStorage::store_reading(pool, &reading).await?;
                Ok(reading)
            }
            Backend::Memory(storage) => storage.store_reading(&reading).await,
        }
    }

    async fn get_all(&self) -> Result<Vec<ReadingRecord>, RepositoryError> {
        match &self.backend {
            Backend::Database(pool) => DatabaseStorage::get_all(pool).await,
            Backend::Memory(storage) => storage.get_all().await,
        }
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<ReadingRecord>, RepositoryError> {
        match &self.backend {
            Backend::Database(pool) => DatabaseStorage::get_by_id(pool, id).await,
            Backend::Memory(storage) => storage.get_by_id(id).await,
        }
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let removed = match &self.backend {
            Backend::Database(pool) => DatabaseStorage::delete(pool, id).await?,
            Backend::Memory(storage) => storage.delete(id).await?,
        };

        if removed {
            Ok(())
        } else {
            Err(RepositoryError::NotFound(id.to_string()))
        }
    }

    async fn clear(&self) -> Result<usize, RepositoryError> {
        match &self.backend {
            Backend::Database(pool) => DatabaseStorage::clear(pool).await,
            Backend::Memory(storage) => storage.clear().await,
        }
    }

    async fn replace_all(&self, readings: Vec<ReadingRecord>) -> Result<(), RepositoryError> {
        ensure_unique_ids(&readings)?;

        match &self.backend {
            Backend::Database(pool) => DatabaseStorage::replace_all(pool, &readings).await,
            Backend::Memory(storage) => storage.replace_all(&readings).await,
        }
    }

    async fn append_all(&self, requests: Vec<CreateReadingRecord>) -> Result<Vec<ReadingRecord>, RepositoryError> {
        let readings: Vec<ReadingRecord> = requests
            .into_iter()
            .map(|request| request.into_record(Uuid::new_v4().to_string()))
            .collect();

        match &self.backend {
            Backend::Database(pool) => DatabaseStorage::append_all(pool, &readings).await?,
            Backend::Memory(storage) => storage.append_all(&readings).await?,
        }

        Ok(readings)
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        match &self.backend {
            Backend::Database(pool) => DatabaseStorage::count(pool).await,
            Backend::Memory(storage) => storage.count().await,
        }
    }
}
