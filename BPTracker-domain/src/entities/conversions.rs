use chrono::NaiveDate;

use bp_tracker_data::models::reading::{CreateReadingRecord, ReadingRecord};

use super::reading::{hour_minute, CreateReadingRequest, Reading};

/// Conversion functions between domain entities and data models
/// Naming follows convert_to_[target_layer]_[model_name]

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a stored `YYYY-MM-DD` date
pub fn parse_date(text: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", text))
}

/// Convert from data model to domain entity; fails when the stored date or time is malformed
pub fn convert_to_domain_reading(record: ReadingRecord) -> Result<Reading, String> {
    let date = parse_date(&record.date).map_err(|e| format!("Reading {}: {}", record.id, e))?;
    let time = hour_minute::parse(&record.time).map_err(|e| format!("Reading {}: {}", record.id, e))?;

    Ok(Reading {
        id: record.id,
        date,
        time,
        systolic: record.systolic,
        diastolic: record.diastolic,
        pulse: record.pulse,
    })
}

/// Convert a list of data models, failing on the first malformed record
pub fn convert_to_domain_readings(records: Vec<ReadingRecord>) -> Result<Vec<Reading>, String> {
    records.into_iter().map(convert_to_domain_reading).collect()
}

/// Convert from domain entity to data model
pub fn convert_to_data_reading(reading: &Reading) -> ReadingRecord {
    ReadingRecord {
        id: reading.id.clone(),
        date: reading.date.format(DATE_FORMAT).to_string(),
        time: hour_minute::format(&reading.time),
        systolic: reading.systolic,
        diastolic: reading.diastolic,
        pulse: reading.pulse,
    }
}

/// Convert from domain create request to data create model
pub fn convert_to_data_create_request(request: &CreateReadingRequest) -> CreateReadingRecord {
    CreateReadingRecord {
        date: request.date.format(DATE_FORMAT).to_string(),
        time: hour_minute::format(&request.time),
        systolic: request.systolic,
        diastolic: request.diastolic,
        pulse: request.pulse,
    }
}
