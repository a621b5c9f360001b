// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use bp_tracker_data::transfer::{json, tab_text};

use crate::entities::conversions;
use crate::entities::reading::{CreateReadingRequest, Reading};
use crate::health::{ComponentStatus, HealthComponent, HealthServiceTrait, SystemHealth, SystemStatus};
use crate::services::aggregation::{aggregate_by_time_bucket, AggregateGroup};
use crate::services::readings::{ImportSummary, ReadingServiceError, ReadingServiceTrait};
use crate::services::sorting::{sort_readings, TimeOrder};
use crate::services::statistics::{summarize, ReadingStatistics};

/// Mock implementation of the ReadingServiceTrait for testing
///
/// Keeps readings in memory in insertion order and runs the real
/// classification and aggregation code over them.
pub struct MockReadingService {
    readings: RwLock<Vec<Reading>>,
    next_id: AtomicUsize,
    should_fail_validation: bool,
    should_fail_repository: bool,
}

impl Default for MockReadingService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockReadingService {
    pub fn new() -> Self {
        Self {
            readings: RwLock::new(Vec::new()),
            next_id: AtomicUsize::new(1),
            should_fail_validation: false,
            should_fail_repository: false,
        }
    }

    /// Configure the mock to fail validation
    pub fn with_validation_failure(mut self) -> Self {
        self.should_fail_validation = true;
        self
    }

    /// Configure every storage operation to fail
    pub fn with_repository_failure(mut self) -> Self {
        self.should_fail_repository = true;
        self
    }

    /// Add a pre-defined reading to the mock
    pub fn with_reading(self, reading: Reading) -> Self {
        if let Ok(mut readings) = self.readings.write() {
            readings.push(reading);
        }
        self
    }

    /// Add multiple pre-defined readings to the mock
    pub fn with_readings(self, readings: Vec<Reading>) -> Self {
        readings.into_iter().fold(self, |mock, reading| mock.with_reading(reading))
    }

    fn check_repository(&self) -> Result<(), ReadingServiceError> {
        if self.should_fail_repository {
            Err(ReadingServiceError::RepositoryError(
                "Repository error - mock is configured to fail".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Reading>>, ReadingServiceError> {
        self.check_repository()?;
        self.readings
            .read()
            .map_err(|e| ReadingServiceError::RepositoryError(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Reading>>, ReadingServiceError> {
        self.check_repository()?;
        self.readings
            .write()
            .map_err(|e| ReadingServiceError::RepositoryError(e.to_string()))
    }

    fn next_id(&self) -> String {
        format!("mock-{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

#[async_trait]
impl ReadingServiceTrait for MockReadingService {
    fn validate_create_request(&self, _request: &CreateReadingRequest) -> Result<(), ReadingServiceError> {
        if self.should_fail_validation {
            Err(ReadingServiceError::ValidationError(
                "Validation failed - mock is configured to fail validation".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    async fn create_reading(&self, request: CreateReadingRequest) -> Result<Reading, ReadingServiceError> {
        self.validate_create_request(&request)?;

        let reading = Reading {
            id: self.next_id(),
            date: request.date,
            time: request.time,
            systolic: request.systolic,
            diastolic: request.diastolic,
            pulse: request.pulse,
        };
        self.write()?.push(reading.clone());
        Ok(reading)
    }

    async fn get_all_readings(&self) -> Result<Vec<Reading>, ReadingServiceError> {
        Ok(self.read()?.clone())
    }

    async fn get_sorted_readings(&self, order: TimeOrder) -> Result<Vec<Reading>, ReadingServiceError> {
        Ok(sort_readings(&self.read()?, order))
    }

    async fn get_reading_by_id(&self, id: &str) -> Result<Reading, ReadingServiceError> {
        self.read()?
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| ReadingServiceError::NotFound(format!("Reading with ID {} not found", id)))
    }

    async fn delete_reading(&self, id: &str) -> Result<(), ReadingServiceError> {
        let mut readings = self.write()?;
        let before = readings.len();
        readings.retain(|r| r.id != id);

        if readings.len() == before {
            Err(ReadingServiceError::NotFound(format!("Reading with ID {} not found", id)))
        } else {
            Ok(())
        }
    }

    async fn clear_all_readings(&self) -> Result<usize, ReadingServiceError> {
        let mut readings = self.write()?;
        let removed = readings.len();
        readings.clear();
        Ok(removed)
    }

    async fn sort_stored_readings(&self) -> Result<Vec<Reading>, ReadingServiceError> {
        let mut readings = self.write()?;
        *readings = sort_readings(&readings, TimeOrder::Ascending);
        Ok(readings.clone())
    }

    async fn get_aggregated_readings(&self) -> Result<Vec<AggregateGroup>, ReadingServiceError> {
        Ok(aggregate_by_time_bucket(&self.read()?))
    }

    async fn get_statistics(&self) -> Result<ReadingStatistics, ReadingServiceError> {
        summarize(&self.read()?).ok_or_else(|| {
            ReadingServiceError::InsufficientData("No readings available to summarize".to_string())
        })
    }

    async fn import_tab_separated(&self, content: &str) -> Result<ImportSummary, ReadingServiceError> {
        let parsed = tab_text::import(content);
        if parsed.records.is_empty() {
            return Err(ReadingServiceError::InsufficientData(
                "No valid readings found in file".to_string(),
            ));
        }

        let mut imported = Vec::with_capacity(parsed.records.len());
        for record in parsed.records {
            let record = record.into_record(self.next_id());
            imported.push(conversions::convert_to_domain_reading(record).map_err(ReadingServiceError::FormatError)?);
        }

        let count = imported.len();
        self.write()?.extend(imported);
        Ok(ImportSummary {
            imported: count,
            rejected_lines: parsed.rejected_lines,
        })
    }

    async fn load_json_document(&self, content: &str) -> Result<ImportSummary, ReadingServiceError> {
        let records = json::from_json_document(content)?;
        let readings = conversions::convert_to_domain_readings(records).map_err(ReadingServiceError::FormatError)?;
        let count = readings.len();
        *self.write()? = readings;
        Ok(ImportSummary {
            imported: count,
            rejected_lines: Vec::new(),
        })
    }

    async fn export_json_document(&self) -> Result<String, ReadingServiceError> {
        let records: Vec<_> = self.read()?.iter().map(conversions::convert_to_data_reading).collect();
        Ok(json::to_json_document(&records)?)
    }

    async fn export_tab_separated(&self) -> Result<String, ReadingServiceError> {
        let records: Vec<_> = self.read()?.iter().map(conversions::convert_to_data_reading).collect();
        Ok(tab_text::export(&records))
    }

    async fn restore_backup(&self) -> Result<usize, ReadingServiceError> {
        self.check_repository()?;
        Ok(0)
    }
}

/// Mock implementation of health services for testing system health
#[derive(Debug)]
pub struct MockHealthService {
    storage_status: ComponentStatus,
    system_status: SystemStatus,
    components: HashMap<String, HealthComponent>,
}

impl Default for MockHealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthService {
    /// Create a new mock health service with all components healthy
    pub fn new() -> Self {
        Self {
            storage_status: ComponentStatus::Healthy,
            system_status: SystemStatus::Healthy,
            components: HashMap::new(),
        }
    }

    pub fn with_degraded_storage(mut self) -> Self {
        self.storage_status = ComponentStatus::Degraded;
        self.system_status = SystemStatus::Degraded;
        self
    }

    pub fn with_unhealthy_storage(mut self) -> Self {
        self.storage_status = ComponentStatus::Unhealthy;
        self.system_status = SystemStatus::Unhealthy;
        self
    }

    /// Add a custom component with a specific status
    pub fn with_component(mut self, name: &str, status: ComponentStatus, details: Option<String>) -> Self {
        self.components
            .insert(name.to_string(), HealthComponent { status, details });
        self
    }
}

#[async_trait]
impl HealthServiceTrait for MockHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let mut components = self.components.clone();
        components.insert("storage".to_string(), self.check_storage_status().await);

        SystemHealth {
            status: self.system_status.clone(),
            components,
        }
    }

    async fn check_storage_status(&self) -> HealthComponent {
        let details = match self.storage_status {
            ComponentStatus::Healthy => None,
            ComponentStatus::Degraded => Some("Storage is responding slowly".to_string()),
            ComponentStatus::Unhealthy => Some("Storage connection failed".to_string()),
        };

        HealthComponent {
            status: self.storage_status.clone(),
            details,
        }
    }
}

/// Factory function to create a mock health service
pub fn create_mock_health_service() -> impl HealthServiceTrait {
    MockHealthService::new()
}
