use rusqlite::{params, Row, TransactionBehavior};
use tracing::debug;

use super::errors::RepositoryError;
use crate::database::DatabasePool;
use crate::models::reading::ReadingRecord;

const SELECT_COLUMNS: &str = "SELECT id, date, time, systolic, diastolic, pulse FROM readings";

/// Database storage operations for readings
pub struct DatabaseStorage;

fn map_row(row: &Row<'_>) -> rusqlite::Result<ReadingRecord> {
    Ok(ReadingRecord {
        id: row.get(0)?,
        date: row.get(1)?,
        time: row.get(2)?,
        systolic: row.get(3)?,
        diastolic: row.get(4)?,
        pulse: row.get(5)?,
    })
}

fn insert(conn: &rusqlite::Connection, reading: &ReadingRecord, position: i64) -> Result<(), RepositoryError> {
    conn.execute(
        "INSERT INTO readings (id, position, date, time, systolic, diastolic, pulse)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            &reading.id,
            position,
            &reading.date,
            &reading.time,
            reading.systolic,
            reading.diastolic,
            reading.pulse,
        ],
    )?;
    Ok(())
}

fn next_position(conn: &rusqlite::Connection) -> Result<i64, RepositoryError> {
    let position = conn.query_row("SELECT COALESCE(MAX(position) + 1, 0) FROM readings", [], |row| row.get(0))?;
    Ok(position)
}

impl DatabaseStorage {
    /// Append a reading at the end of the collection
    pub async fn store_reading(pool: &DatabasePool, reading: &ReadingRecord) -> Result<(), RepositoryError> {
        debug!("Storing reading in database: id={}", reading.id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let mut conn = pool.get()?;
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                let position = next_position(&tx)?;
                insert(&tx, reading, position)?;
                tx.commit()?;
                Ok(())
            }
        }
    }

    /// Get all readings in collection order
    pub async fn get_all(pool: &DatabasePool) -> Result<Vec<ReadingRecord>, RepositoryError> {
        debug!("Getting all readings from database");

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;
                let mut stmt = conn.prepare(&format!("{} ORDER BY position ASC", SELECT_COLUMNS))?;
                let readings = stmt.query_map([], map_row)?;

                let mut result = Vec::new();
                for reading in readings {
                    result.push(reading?);
                }
                Ok(result)
            }
        }
    }

    /// Get a reading by ID
    pub async fn get_by_id(pool: &DatabasePool, id: &str) -> Result<Option<ReadingRecord>, RepositoryError> {
        debug!("Getting reading by ID from database: id={}", id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;
                let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))?;

                match stmt.query_row([id], map_row) {
                    Ok(reading) => Ok(Some(reading)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(RepositoryError::Sqlite(e)),
                }
            }
        }
    }

    /// Delete a reading, returning whether a row was removed
    pub async fn delete(pool: &DatabasePool, id: &str) -> Result<bool, RepositoryError> {
        debug!("Deleting reading from database: id={}", id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;
                let affected = conn.execute("DELETE FROM readings WHERE id = ?1", [id])?;
                Ok(affected > 0)
            }
        }
    }

    /// Delete every reading
    pub async fn clear(pool: &DatabasePool) -> Result<usize, RepositoryError> {
        debug!("Clearing all readings from database");

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;
                let affected = conn.execute("DELETE FROM readings", [])?;
                Ok(affected)
            }
        }
    }

    /// Replace the whole collection in one transaction, renumbering positions
    pub async fn replace_all(pool: &DatabasePool, readings: &[ReadingRecord]) -> Result<(), RepositoryError> {
        debug!("Replacing all readings in database: count={}", readings.len());

        match pool {
            DatabasePool::SQLite(pool) => {
                let mut conn = pool.get()?;
                let tx = conn.transaction()?;
                tx.execute("DELETE FROM readings", [])?;
                for (position, reading) in readings.iter().enumerate() {
                    insert(&tx, reading, position as i64)?;
                }
                tx.commit()?;
                Ok(())
            }
        }
    }

    /// Append several readings in one transaction
    pub async fn append_all(pool: &DatabasePool, readings: &[ReadingRecord]) -> Result<(), RepositoryError> {
        debug!("Appending readings to database: count={}", readings.len());

        match pool {
            DatabasePool::SQLite(pool) => {
                let mut conn = pool.get()?;
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                let start = next_position(&tx)?;
                for (offset, reading) in readings.iter().enumerate() {
                    insert(&tx, reading, start + offset as i64)?;
                }
                tx.commit()?;
                Ok(())
            }
        }
    }

    /// Number of stored readings
    pub async fn count(pool: &DatabasePool) -> Result<usize, RepositoryError> {
        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;
                let total: i64 = conn.query_row("SELECT COUNT(*) FROM readings", [], |row| row.get(0))?;
                Ok(total as usize)
            }
        }
    }
}
