use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::aggregation::round_to_tenth;
use super::classification::classify_blood_pressure;
use crate::entities::category::BloodPressureCategory;
use crate::entities::reading::Reading;

/// Summary over a whole collection of readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ReadingStatistics {
    pub total_readings: usize,
    pub avg_systolic: f64,
    pub avg_diastolic: f64,
    pub avg_pulse: f64,
    pub min_systolic: u16,
    pub max_systolic: u16,
    pub min_diastolic: u16,
    pub max_diastolic: u16,
    /// Category of the rounded averages
    pub category: BloodPressureCategory,
}

/// Summarize a collection; `None` when there is nothing to summarize
///
/// Averages are the raw means. The category is taken from the means rounded to
/// one decimal, the same way grouped averages are classified.
pub fn summarize(readings: &[Reading]) -> Option<ReadingStatistics> {
    let first = readings.first()?;
    let count = readings.len() as f64;

    let mut systolic_sum = 0.0;
    let mut diastolic_sum = 0.0;
    let mut pulse_sum = 0.0;
    let (mut min_systolic, mut max_systolic) = (first.systolic, first.systolic);
    let (mut min_diastolic, mut max_diastolic) = (first.diastolic, first.diastolic);

    for reading in readings {
        systolic_sum += f64::from(reading.systolic);
        diastolic_sum += f64::from(reading.diastolic);
        pulse_sum += f64::from(reading.pulse);

        min_systolic = min_systolic.min(reading.systolic);
        max_systolic = max_systolic.max(reading.systolic);
        min_diastolic = min_diastolic.min(reading.diastolic);
        max_diastolic = max_diastolic.max(reading.diastolic);
    }

    let avg_systolic = systolic_sum / count;
    let avg_diastolic = diastolic_sum / count;

    Some(ReadingStatistics {
        total_readings: readings.len(),
        avg_systolic,
        avg_diastolic,
        avg_pulse: pulse_sum / count,
        min_systolic,
        max_systolic,
        min_diastolic,
        max_diastolic,
        category: classify_blood_pressure(round_to_tenth(avg_systolic), round_to_tenth(avg_diastolic)),
    })
}
