use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use bp_tracker_domain::entities::{BloodPressureCategory, PulseCategory, Reading};

/// Public representation of a reading, with its categories and display colours
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReadingResponse {
    pub id: String,

    /// Day of the measurement, `YYYY-MM-DD`
    #[schema(example = "2026-01-21")]
    pub date: String,

    /// Time of day, `HH:MM`
    #[schema(example = "08:30")]
    pub time: String,

    pub systolic: u16,
    pub diastolic: u16,
    pub pulse: u16,

    pub bp_category: BloodPressureCategory,
    /// Human-readable blood pressure category
    pub bp_label: String,
    /// Colour label for the blood pressure category
    #[schema(example = "green")]
    pub bp_color: String,

    pub pulse_category: PulseCategory,
    pub pulse_label: String,
    #[schema(example = "dark-green")]
    pub pulse_color: String,
}

impl From<Reading> for ReadingResponse {
    fn from(reading: Reading) -> Self {
        let bp_category = reading.bp_category();
        let pulse_category = reading.pulse_category();

        Self {
            date: reading.date.format("%Y-%m-%d").to_string(),
            time: reading.time.format("%H:%M").to_string(),
            id: reading.id,
            systolic: reading.systolic,
            diastolic: reading.diastolic,
            pulse: reading.pulse,
            bp_category,
            bp_label: bp_category.to_string(),
            bp_color: bp_category.color_label().to_string(),
            pulse_category,
            pulse_label: pulse_category.to_string(),
            pulse_color: pulse_category.color_label().to_string(),
        }
    }
}

/// Query parameters for listing readings
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListQueryParams {
    /// Order of readings within a day: `asc` or `desc` (default)
    pub sort: Option<String>,
}
