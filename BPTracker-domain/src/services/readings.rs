use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use bp_tracker_data::models::reading::ReadingRecord;
use bp_tracker_data::repository::{ReadingRepository, ReadingRepositoryTrait, RepositoryError};
use bp_tracker_data::transfer::{json, tab_text, TransferError};

use crate::entities::conversions;
use crate::entities::reading::{CreateReadingRequest, Reading};
use crate::services::aggregation::{aggregate_by_time_bucket, AggregateGroup};
use crate::services::sorting::{sort_readings, TimeOrder};
use crate::services::statistics::{summarize, ReadingStatistics};

/// Reading service errors
#[derive(Debug, Error)]
pub enum ReadingServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Not found error
    #[error("Reading not found: {0}")]
    NotFound(String),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// Insufficient data error
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A document could not be parsed or written
    #[error("Format error: {0}")]
    FormatError(String),
}

impl From<TransferError> for ReadingServiceError {
    fn from(err: TransferError) -> Self {
        ReadingServiceError::FormatError(err.to_string())
    }
}

/// Outcome of an import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ImportSummary {
    /// Number of readings added to the collection
    pub imported: usize,
    /// 1-based line numbers that looked like readings but could not be parsed
    pub rejected_lines: Vec<usize>,
}

/// Trait for reading service operations
#[async_trait]
pub trait ReadingServiceTrait {
    /// Validate a create request
    fn validate_create_request(&self, request: &CreateReadingRequest) -> Result<(), ReadingServiceError>;

    /// Record a new reading
    async fn create_reading(&self, request: CreateReadingRequest) -> Result<Reading, ReadingServiceError>;

    /// All readings in stored order
    async fn get_all_readings(&self) -> Result<Vec<Reading>, ReadingServiceError>;

    /// All readings by date descending, then time in the given order
    async fn get_sorted_readings(&self, order: TimeOrder) -> Result<Vec<Reading>, ReadingServiceError>;

    /// Get a reading by ID
    async fn get_reading_by_id(&self, id: &str) -> Result<Reading, ReadingServiceError>;

    /// Delete a reading by ID
    async fn delete_reading(&self, id: &str) -> Result<(), ReadingServiceError>;

    /// Delete every reading, returning how many were removed
    async fn clear_all_readings(&self) -> Result<usize, ReadingServiceError>;

    /// Reorder the stored collection by date descending, time ascending
    async fn sort_stored_readings(&self) -> Result<Vec<Reading>, ReadingServiceError>;

    /// Readings grouped by date and time bucket
    async fn get_aggregated_readings(&self) -> Result<Vec<AggregateGroup>, ReadingServiceError>;

    /// Summary over all readings
    async fn get_statistics(&self) -> Result<ReadingStatistics, ReadingServiceError>;

    /// Append the readings found in a tab-separated document
    async fn import_tab_separated(&self, content: &str) -> Result<ImportSummary, ReadingServiceError>;

    /// Replace the collection with a JSON document
    async fn load_json_document(&self, content: &str) -> Result<ImportSummary, ReadingServiceError>;

    /// The collection as a JSON document
    async fn export_json_document(&self) -> Result<String, ReadingServiceError>;

    /// The collection as a tab-separated document
    async fn export_tab_separated(&self) -> Result<String, ReadingServiceError>;

    /// Load the backup file into an empty store; returns how many readings were restored
    async fn restore_backup(&self) -> Result<usize, ReadingServiceError>;
}

/// Reading service for domain logic
///
/// Every mutation holds `write_guard` from its first repository call until
/// the backup is written, so read-modify-write steps never interleave.
pub struct ReadingService<R: ReadingRepositoryTrait> {
    repository: R,
    backup_path: Option<PathBuf>,
    write_guard: Mutex<()>,
}

impl<R: ReadingRepositoryTrait> ReadingService<R> {
    /// Create a new reading service
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            backup_path: None,
            write_guard: Mutex::new(()),
        }
    }

    /// Write the whole collection to `path` after every change
    pub fn with_backup(mut self, path: impl Into<PathBuf>) -> Self {
        self.backup_path = Some(path.into());
        self
    }

    pub fn backup_path(&self) -> Option<&Path> {
        self.backup_path.as_deref()
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> ReadingServiceError {
        match err {
            RepositoryError::NotFound(msg) => ReadingServiceError::NotFound(msg),
            RepositoryError::Validation(msg) => ReadingServiceError::ValidationError(msg),
            _ => ReadingServiceError::RepositoryError(err.to_string()),
        }
    }
}

impl<R: ReadingRepositoryTrait + Send + Sync> ReadingService<R> {
    async fn load_records(&self) -> Result<Vec<ReadingRecord>, ReadingServiceError> {
        self.repository.get_all().await.map_err(|e| self.map_repo_error(e))
    }

    async fn load_readings(&self) -> Result<Vec<Reading>, ReadingServiceError> {
        let records = self.load_records().await?;
        conversions::convert_to_domain_readings(records).map_err(ReadingServiceError::RepositoryError)
    }

    /// Check loaded readings against the same ranges as new readings
    fn validate_readings(&self, readings: &[Reading]) -> Result<(), ReadingServiceError> {
        for reading in readings {
            let request = CreateReadingRequest {
                date: reading.date,
                time: reading.time,
                systolic: reading.systolic,
                diastolic: reading.diastolic,
                pulse: reading.pulse,
            };
            self.validate_create_request(&request).map_err(|e| match e {
                ReadingServiceError::ValidationError(msg) => {
                    ReadingServiceError::ValidationError(format!("Reading {}: {}", reading.id, msg))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Best-effort write of the backup file; failures are only logged
    async fn write_backup(&self) {
        let Some(path) = &self.backup_path else {
            return;
        };

        let records = match self.repository.get_all().await {
            Ok(records) => records,
            Err(e) => {
                error!("Skipping backup, could not read readings: {}", e);
                return;
            }
        };

        match json::write_json_file(path, &records).await {
            Ok(()) => debug!("Backed up {} readings to {}", records.len(), path.display()),
            Err(e) => error!("Failed to write backup {}: {}", path.display(), e),
        }
    }
}

#[async_trait]
impl<R: ReadingRepositoryTrait + Send + Sync> ReadingServiceTrait for ReadingService<R> {
    fn validate_create_request(&self, request: &CreateReadingRequest) -> Result<(), ReadingServiceError> {
        if let Err(validation_errors) = request.validate() {
            let error_message = validation_errors
                .field_errors()
                .iter()
                .map(|(field, errors)| {
                    let error_msgs: Vec<String> = errors
                        .iter()
                        .map(|err| match &err.message {
                            Some(msg) => msg.to_string(),
                            None => format!("Invalid {}", field),
                        })
                        .collect();
                    format!("{}: {}", field, error_msgs.join(", "))
                })
                .collect::<Vec<String>>()
                .join("; ");

            return Err(ReadingServiceError::ValidationError(error_message));
        }

        Ok(())
    }

    async fn create_reading(&self, request: CreateReadingRequest) -> Result<Reading, ReadingServiceError> {
        self.validate_create_request(&request)?;

        let _guard = self.write_guard.lock().await;
        let data_request = conversions::convert_to_data_create_request(&request);
        let record = self
            .repository
            .create(data_request)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        let reading = conversions::convert_to_domain_reading(record).map_err(ReadingServiceError::RepositoryError)?;
        info!("Recorded reading {} ({}/{} pulse {})", reading.id, reading.systolic, reading.diastolic, reading.pulse);

        self.write_backup().await;
        Ok(reading)
    }

    async fn get_all_readings(&self) -> Result<Vec<Reading>, ReadingServiceError> {
        self.load_readings().await
    }

    async fn get_sorted_readings(&self, order: TimeOrder) -> Result<Vec<Reading>, ReadingServiceError> {
        let readings = self.load_readings().await?;
        Ok(sort_readings(&readings, order))
    }

    async fn get_reading_by_id(&self, id: &str) -> Result<Reading, ReadingServiceError> {
        let record = self
            .repository
            .get_by_id(id)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| ReadingServiceError::NotFound(format!("Reading with ID {} not found", id)))?;

        conversions::convert_to_domain_reading(record).map_err(ReadingServiceError::RepositoryError)
    }

    async fn delete_reading(&self, id: &str) -> Result<(), ReadingServiceError> {
        let _guard = self.write_guard.lock().await;
        self.repository.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound(_) => ReadingServiceError::NotFound(format!("Reading with ID {} not found", id)),
            other => self.map_repo_error(other),
        })?;

        info!("Deleted reading {}", id);
        self.write_backup().await;
        Ok(())
    }

    async fn clear_all_readings(&self) -> Result<usize, ReadingServiceError> {
        let _guard = self.write_guard.lock().await;
        let removed = self.repository.clear().await.map_err(|e| self.map_repo_error(e))?;

        info!("Cleared {} readings", removed);
        self.write_backup().await;
        Ok(removed)
    }

    async fn sort_stored_readings(&self) -> Result<Vec<Reading>, ReadingServiceError> {
        let _guard = self.write_guard.lock().await;
        let readings = self.load_readings().await?;
        let sorted = sort_readings(&readings, TimeOrder::Ascending);

        let records = sorted.iter().map(conversions::convert_to_data_reading).collect();
        self.repository
            .replace_all(records)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        info!("Sorted {} stored readings by date", sorted.len());
        self.write_backup().await;
        Ok(sorted)
    }

    async fn get_aggregated_readings(&self) -> Result<Vec<AggregateGroup>, ReadingServiceError> {
        let readings = self.load_readings().await?;
        Ok(aggregate_by_time_bucket(&readings))
    }

    async fn get_statistics(&self) -> Result<ReadingStatistics, ReadingServiceError> {
        let readings = self.load_readings().await?;
        summarize(&readings).ok_or_else(|| {
            ReadingServiceError::InsufficientData("No readings available to summarize".to_string())
        })
    }

    async fn import_tab_separated(&self, content: &str) -> Result<ImportSummary, ReadingServiceError> {
        let parsed = tab_text::import(content);

        if parsed.records.is_empty() {
            warn!("Tab-separated import found no readings ({} rejected lines)", parsed.rejected_lines.len());
            return Err(ReadingServiceError::InsufficientData(
                "No valid readings found in file".to_string(),
            ));
        }

        let _guard = self.write_guard.lock().await;
        let stored = self
            .repository
            .append_all(parsed.records)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        info!("Imported {} readings from tab-separated text", stored.len());
        self.write_backup().await;

        Ok(ImportSummary {
            imported: stored.len(),
            rejected_lines: parsed.rejected_lines,
        })
    }

    async fn load_json_document(&self, content: &str) -> Result<ImportSummary, ReadingServiceError> {
        let records = json::from_json_document(content)?;

        // Normalise and validate every reading before anything is replaced
        let readings = conversions::convert_to_domain_readings(records).map_err(ReadingServiceError::FormatError)?;
        self.validate_readings(&readings)?;
        let normalised: Vec<ReadingRecord> = readings.iter().map(conversions::convert_to_data_reading).collect();

        let _guard = self.write_guard.lock().await;
        self.repository
            .replace_all(normalised)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        info!("Loaded {} readings from JSON document", readings.len());
        self.write_backup().await;

        Ok(ImportSummary {
            imported: readings.len(),
            rejected_lines: Vec::new(),
        })
    }

    async fn export_json_document(&self) -> Result<String, ReadingServiceError> {
        let records = self.load_records().await?;
        Ok(json::to_json_document(&records)?)
    }

    async fn export_tab_separated(&self) -> Result<String, ReadingServiceError> {
        let records = self.load_records().await?;
        Ok(tab_text::export(&records))
    }

    async fn restore_backup(&self) -> Result<usize, ReadingServiceError> {
        let Some(path) = &self.backup_path else {
            return Ok(0);
        };

        if !tokio::fs::try_exists(path).await.map_err(TransferError::Io)? {
            debug!("No backup file at {}", path.display());
            return Ok(0);
        }

        let _guard = self.write_guard.lock().await;
        let existing = self.repository.count().await.map_err(|e| self.map_repo_error(e))?;
        if existing > 0 {
            debug!("Store already holds {} readings, not restoring backup", existing);
            return Ok(0);
        }

        let records = json::read_json_file(path).await?;
        let readings = conversions::convert_to_domain_readings(records).map_err(ReadingServiceError::FormatError)?;
        self.validate_readings(&readings)?;
        let count = readings.len();

        self.repository
            .replace_all(readings.iter().map(conversions::convert_to_data_reading).collect())
            .await
            .map_err(|e| self.map_repo_error(e))?;

        info!("Restored {} readings from {}", count, path.display());
        Ok(count)
    }
}

/// Create a reading service on the default repository, with an optional backup file
pub fn create_default_reading_service(backup_path: Option<PathBuf>) -> impl ReadingServiceTrait + Send + Sync {
    let service = ReadingService::new(ReadingRepository::new());
    match backup_path {
        Some(path) => service.with_backup(path),
        None => service,
    }
}

/// Create a mock reading service for testing
/// This function is only available when the mock feature is enabled
#[cfg(feature = "mock")]
pub fn create_mock_reading_service() -> impl ReadingServiceTrait + Send + Sync {
    crate::testing::MockReadingService::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::category::BloodPressureCategory;
    use bp_tracker_data::models::reading::CreateReadingRecord;
    use chrono::{NaiveDate, NaiveTime};
    use mockall::mock;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;

    mock! {
        pub Repo {}

        #[async_trait]
        impl ReadingRepositoryTrait for Repo {
            async fn create(&self, request: CreateReadingRecord) -> Result<ReadingRecord, RepositoryError>;
            async fn get_all(&self) -> Result<Vec<ReadingRecord>, RepositoryError>;
            async fn get_by_id(&self, id: &str) -> Result<Option<ReadingRecord>, RepositoryError>;
            async fn delete(&self, id: &str) -> Result<(), RepositoryError>;
            async fn clear(&self) -> Result<usize, RepositoryError>;
            async fn replace_all(&self, readings: Vec<ReadingRecord>) -> Result<(), RepositoryError>;
            async fn append_all(&self, requests: Vec<CreateReadingRecord>) -> Result<Vec<ReadingRecord>, RepositoryError>;
            async fn count(&self) -> Result<usize, RepositoryError>;
        }
    }

    /// Repository that can pause inside the next `get_all` call
    #[derive(Clone)]
    struct GatedRepo {
        inner: ReadingRepository,
        armed: Arc<AtomicBool>,
        reached: Arc<Notify>,
        resume: Arc<Notify>,
    }

    impl GatedRepo {
        fn new() -> Self {
            Self {
                inner: ReadingRepository::in_memory(),
                armed: Arc::new(AtomicBool::new(false)),
                reached: Arc::new(Notify::new()),
                resume: Arc::new(Notify::new()),
            }
        }

        fn pause_next_get_all(&self) {
            self.armed.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl ReadingRepositoryTrait for GatedRepo {
        async fn create(&self, request: CreateReadingRecord) -> Result<ReadingRecord, RepositoryError> {
            self.inner.create(request).await
        }

        async fn get_all(&self) -> Result<Vec<ReadingRecord>, RepositoryError> {
            let readings = self.inner.get_all().await?;
            if self.armed.swap(false, Ordering::SeqCst) {
                self.reached.notify_one();
                self.resume.notified().await;
            }
            Ok(readings)
        }

        async fn get_by_id(&self, id: &str) -> Result<Option<ReadingRecord>, RepositoryError> {
            self.inner.get_by_id(id).await
        }

        async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
            self.inner.delete(id).await
        }

        async fn clear(&self) -> Result<usize, RepositoryError> {
            self.inner.clear().await
        }

        async fn replace_all(&self, readings: Vec<ReadingRecord>) -> Result<(), RepositoryError> {
            self.inner.replace_all(readings).await
        }

        async fn append_all(&self, requests: Vec<CreateReadingRecord>) -> Result<Vec<ReadingRecord>, RepositoryError> {
            self.inner.append_all(requests).await
        }

        async fn count(&self) -> Result<usize, RepositoryError> {
            self.inner.count().await
        }
    }

    fn request(date: (i32, u32, u32), time: (u32, u32), systolic: u16, diastolic: u16, pulse: u16) -> CreateReadingRequest {
        CreateReadingRequest {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            time: NaiveTime::from_hms_opt(time.0, time.1, 0).unwrap(),
            systolic,
            diastolic,
            pulse,
        }
    }

    fn memory_service() -> ReadingService<ReadingRepository> {
        ReadingService::new(ReadingRepository::in_memory())
    }

    fn temp_backup(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bp-tracker-{}-{}.json", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_validate_create_request_valid() {
        let service = memory_service();
        assert!(service.validate_create_request(&request((2026, 1, 21), (8, 0), 120, 80, 72)).is_ok());
    }

    #[test]
    fn test_validate_create_request_invalid_values() {
        let service = memory_service();

        let err = service
            .validate_create_request(&request((2026, 1, 21), (8, 0), 450, 80, 72))
            .unwrap_err();
        assert!(err.to_string().contains("Systolic"));

        let err = service
            .validate_create_request(&request((2026, 1, 21), (8, 0), 120, 80, 0))
            .unwrap_err();
        assert!(matches!(err, ReadingServiceError::ValidationError(_)));
        assert!(err.to_string().contains("Pulse"));
    }

    #[tokio::test]
    async fn test_create_list_and_delete() {
        let service = memory_service();

        let morning = service.create_reading(request((2026, 1, 21), (7, 30), 118, 76, 64)).await.unwrap();
        let evening = service.create_reading(request((2026, 1, 21), (20, 0), 132, 84, 74)).await.unwrap();
        let older = service.create_reading(request((2026, 1, 20), (9, 0), 121, 79, 70)).await.unwrap();

        let stored: Vec<String> = service.get_all_readings().await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(stored, vec![morning.id.clone(), evening.id.clone(), older.id.clone()]);

        let sorted: Vec<String> = service
            .get_sorted_readings(TimeOrder::Descending)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(sorted, vec![evening.id.clone(), morning.id.clone(), older.id.clone()]);

        assert_eq!(service.get_reading_by_id(&evening.id).await.unwrap(), evening);

        service.delete_reading(&evening.id).await.unwrap();
        let err = service.get_reading_by_id(&evening.id).await.unwrap_err();
        assert!(matches!(err, ReadingServiceError::NotFound(_)));

        let err = service.delete_reading(&evening.id).await.unwrap_err();
        assert!(matches!(err, ReadingServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_sort_stored_readings_persists_order() {
        let service = memory_service();
        service.create_reading(request((2026, 1, 20), (9, 0), 121, 79, 70)).await.unwrap();
        service.create_reading(request((2026, 1, 21), (20, 0), 132, 84, 74)).await.unwrap();
        service.create_reading(request((2026, 1, 21), (7, 30), 118, 76, 64)).await.unwrap();

        let sorted = service.sort_stored_readings().await.unwrap();
        let stored = service.get_all_readings().await.unwrap();
        assert_eq!(sorted, stored);
        assert_eq!(stored[0].time, NaiveTime::from_hms_opt(7, 30, 0).unwrap());
        assert_eq!(stored[2].date, NaiveDate::from_ymd_opt(2026, 1, 20).unwrap());
    }

    #[tokio::test]
    async fn test_aggregation_and_statistics() {
        let service = memory_service();

        let err = service.get_statistics().await.unwrap_err();
        assert!(matches!(err, ReadingServiceError::InsufficientData(_)));
        assert!(service.get_aggregated_readings().await.unwrap().is_empty());

        service.create_reading(request((2026, 1, 21), (8, 0), 120, 80, 70)).await.unwrap();
        service.create_reading(request((2026, 1, 21), (9, 0), 130, 90, 80)).await.unwrap();

        let groups = service.get_aggregated_readings().await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].avg_diastolic, 85.0);
        assert_eq!(groups[0].bp_category, BloodPressureCategory::Hypertension1);

        let stats = service.get_statistics().await.unwrap();
        assert_eq!(stats.total_readings, 2);
        assert_eq!(stats.max_systolic, 130);
    }

    #[tokio::test]
    async fn test_tab_import_and_export() {
        let service = memory_service();

        let content = "Date\tTime\tSystolic\tDiastolic\tPulse\n2026-01-19\t06:30\t117\t75\t58\n2026-01-19\t07:00\t1\t119\t77\t60\n2026-01-19\t08:00\tx\t77\t60\n";
        let summary = service.import_tab_separated(content).await.unwrap();
        assert_eq!(summary.imported, 2);
        assert_eq!(summary.rejected_lines, vec![4]);

        let exported = service.export_tab_separated().await.unwrap();
        assert!(exported.contains("2026-01-19\t07:00\t119\t77\t60"));
        assert!(exported.contains("Total Readings: 2"));

        let err = service.import_tab_separated("nothing here\n").await.unwrap_err();
        assert!(matches!(err, ReadingServiceError::InsufficientData(_)));
    }

    #[tokio::test]
    async fn test_json_load_replaces_collection() {
        let service = memory_service();
        service.create_reading(request((2026, 1, 21), (8, 0), 120, 80, 70)).await.unwrap();

        let document = r#"[
            {"id": 1737442800000, "date": "2026-01-20", "time": "21:15:00", "systolic": 128, "diastolic": 82, "pulse": 77},
            {"id": "b", "date": "2026-01-19", "time": "06:45", "systolic": 116, "diastolic": 74, "pulse": 59}
        ]"#;
        let summary = service.load_json_document(document).await.unwrap();
        assert_eq!(summary.imported, 2);

        let readings = service.get_all_readings().await.unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].id, "1737442800000");

        let exported = service.export_json_document().await.unwrap();
        assert!(exported.contains("\"time\": \"21:15\""));
    }

    #[tokio::test]
    async fn test_json_load_rejects_bad_documents() {
        let service = memory_service();
        service.create_reading(request((2026, 1, 21), (8, 0), 120, 80, 70)).await.unwrap();

        let err = service.load_json_document("{not json").await.unwrap_err();
        assert!(matches!(err, ReadingServiceError::FormatError(_)));

        let bad_date = r#"[{"id": "a", "date": "yesterday", "time": "08:00", "systolic": 1, "diastolic": 1, "pulse": 1}]"#;
        let err = service.load_json_document(bad_date).await.unwrap_err();
        assert!(matches!(err, ReadingServiceError::FormatError(_)));

        // Nothing was replaced
        assert_eq!(service.get_all_readings().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_json_load_rejects_out_of_range_values() {
        let service = memory_service();
        service.create_reading(request((2026, 1, 21), (8, 0), 120, 80, 70)).await.unwrap();

        let zeros = r#"[{"id": "z", "date": "2026-01-20", "time": "08:00", "systolic": 0, "diastolic": 0, "pulse": 0}]"#;
        let err = service.load_json_document(zeros).await.unwrap_err();
        assert!(matches!(err, ReadingServiceError::ValidationError(_)));
        assert!(err.to_string().contains("Reading z"));

        let too_high = r#"[
            {"id": "ok", "date": "2026-01-20", "time": "08:00", "systolic": 118, "diastolic": 76, "pulse": 64},
            {"id": "big", "date": "2026-01-20", "time": "09:00", "systolic": 9999, "diastolic": 5000, "pulse": 999}
        ]"#;
        let err = service.load_json_document(too_high).await.unwrap_err();
        assert!(err.to_string().contains("Reading big"));

        let stored = service.get_all_readings().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].systolic, 120);
    }

    #[tokio::test]
    async fn test_restore_rejects_out_of_range_backup() {
        let path = temp_backup("invalid");
        std::fs::write(
            &path,
            r#"[{"id": "a", "date": "2026-01-20", "time": "08:00", "systolic": 120, "diastolic": 80, "pulse": 0}]"#,
        )
        .unwrap();

        let service = memory_service().with_backup(&path);
        let err = service.restore_backup().await.unwrap_err();
        assert!(matches!(err, ReadingServiceError::ValidationError(_)));
        assert!(service.get_all_readings().await.unwrap().is_empty());

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_restore_reports_unreadable_backup_location() {
        let blocker = temp_backup("not-a-dir");
        std::fs::write(&blocker, "[]").unwrap();

        let service = memory_service().with_backup(blocker.join("backup.json"));
        let err = service.restore_backup().await.unwrap_err();
        assert!(matches!(err, ReadingServiceError::FormatError(_)));

        let _ = std::fs::remove_file(&blocker);
    }

    #[tokio::test]
    async fn test_create_during_sort_is_kept() {
        let repo = GatedRepo::new();
        let service = Arc::new(ReadingService::new(repo.clone()));
        service.create_reading(request((2026, 1, 20), (9, 0), 121, 79, 70)).await.unwrap();

        repo.pause_next_get_all();
        let sorting = {
            let service = service.clone();
            tokio::spawn(async move { service.sort_stored_readings().await })
        };
        repo.reached.notified().await;

        let creating = {
            let service = service.clone();
            tokio::spawn(async move { service.create_reading(request((2026, 1, 21), (7, 30), 118, 76, 64)).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!creating.is_finished(), "create must wait for the sort to finish");

        repo.resume.notify_one();
        sorting.await.unwrap().unwrap();
        let created = creating.await.unwrap().unwrap();

        assert_eq!(service.get_all_readings().await.unwrap().len(), 2);
        assert_eq!(service.get_reading_by_id(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_backup_written_and_restored() {
        let path = temp_backup("roundtrip");

        let service = memory_service().with_backup(&path);
        service.create_reading(request((2026, 1, 21), (8, 0), 120, 80, 70)).await.unwrap();
        service.create_reading(request((2026, 1, 21), (15, 0), 124, 78, 68)).await.unwrap();

        let restored = memory_service().with_backup(&path);
        assert_eq!(restored.restore_backup().await.unwrap(), 2);
        assert_eq!(restored.get_all_readings().await.unwrap(), service.get_all_readings().await.unwrap());

        // A store that already has data is left alone
        assert_eq!(restored.restore_backup().await.unwrap(), 0);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_restore_without_backup_file() {
        let service = memory_service().with_backup(temp_backup("missing"));
        assert_eq!(service.restore_backup().await.unwrap(), 0);
        assert_eq!(memory_service().restore_backup().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_repository_failure_is_reported() {
        let mut repo = MockRepo::new();
        repo.expect_get_all()
            .returning(|| Err(RepositoryError::Lock("poisoned".to_string())));

        let service = ReadingService::new(repo);
        let err = service.get_aggregated_readings().await.unwrap_err();
        assert!(matches!(err, ReadingServiceError::RepositoryError(_)));
    }

    #[tokio::test]
    async fn test_repository_validation_maps_to_validation_error() {
        let mut repo = MockRepo::new();
        repo.expect_get_all().returning(|| Ok(Vec::new()));
        repo.expect_replace_all()
            .returning(|_| Err(RepositoryError::Validation("duplicate reading id a".to_string())));

        let service = ReadingService::new(repo);
        let document = r#"[{"id": "a", "date": "2026-01-21", "time": "08:00", "systolic": 120, "diastolic": 80, "pulse": 70}]"#;
        let err = service.load_json_document(document).await.unwrap_err();
        assert!(matches!(err, ReadingServiceError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_backup_failure_does_not_fail_mutation() {
        let mut repo = MockRepo::new();
        repo.expect_clear().returning(|| Ok(3));
        repo.expect_get_all()
            .returning(|| Err(RepositoryError::Lock("poisoned".to_string())));

        let service = ReadingService::new(repo).with_backup(temp_backup("unused"));
        assert_eq!(service.clear_all_readings().await.unwrap(), 3);
    }
}
