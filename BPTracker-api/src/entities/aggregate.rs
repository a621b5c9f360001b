use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use bp_tracker_domain::entities::{BloodPressureCategory, PulseCategory, TimeBucket};
use bp_tracker_domain::services::aggregation::AggregateGroup;
use bp_tracker_domain::services::statistics::ReadingStatistics;

use super::reading::ReadingResponse;

/// Averages for one date and time bucket
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AggregateGroupResponse {
    #[schema(example = "2026-01-21")]
    pub date: String,
    /// Time bucket label, e.g. `Midnight - 10 AM`
    pub bucket: TimeBucket,
    pub count: usize,
    /// Averages rounded to one decimal place
    pub avg_systolic: f64,
    pub avg_diastolic: f64,
    pub avg_pulse: f64,
    pub bp_category: BloodPressureCategory,
    pub bp_color: String,
    pub pulse_category: PulseCategory,
    pub pulse_color: String,
    pub readings: Vec<ReadingResponse>,
}

impl From<AggregateGroup> for AggregateGroupResponse {
    fn from(group: AggregateGroup) -> Self {
        Self {
            date: group.date.format("%Y-%m-%d").to_string(),
            bucket: group.bucket,
            count: group.count,
            avg_systolic: group.avg_systolic,
            avg_diastolic: group.avg_diastolic,
            avg_pulse: group.avg_pulse,
            bp_category: group.bp_category,
            bp_color: group.bp_category.color_label().to_string(),
            pulse_category: group.pulse_category,
            pulse_color: group.pulse_category.color_label().to_string(),
            readings: group.readings.into_iter().map(ReadingResponse::from).collect(),
        }
    }
}

/// Summary statistics over all readings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatisticsResponse {
    pub total_readings: usize,
    pub avg_systolic: f64,
    pub avg_diastolic: f64,
    pub avg_pulse: f64,
    pub min_systolic: u16,
    pub max_systolic: u16,
    pub min_diastolic: u16,
    pub max_diastolic: u16,
    pub category: BloodPressureCategory,
    pub color: String,
}

impl From<ReadingStatistics> for StatisticsResponse {
    fn from(stats: ReadingStatistics) -> Self {
        Self {
            total_readings: stats.total_readings,
            avg_systolic: stats.avg_systolic,
            avg_diastolic: stats.avg_diastolic,
            avg_pulse: stats.avg_pulse,
            min_systolic: stats.min_systolic,
            max_systolic: stats.max_systolic,
            min_diastolic: stats.min_diastolic,
            max_diastolic: stats.max_diastolic,
            color: stats.category.color_label().to_string(),
            category: stats.category,
        }
    }
}
