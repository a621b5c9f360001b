use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::category::{BloodPressureCategory, PulseCategory};
use super::time_bucket::TimeBucket;
use crate::services::classification::{classify_blood_pressure, classify_pulse};

/// A single blood pressure and pulse measurement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Reading {
    /// Unique identifier, assigned when the reading is stored
    pub id: String,

    /// Calendar day of the measurement
    #[cfg_attr(feature = "with-api", schema(value_type = String, example = "2026-01-21"))]
    pub date: NaiveDate,

    /// Time of day, minute precision
    #[serde(with = "hour_minute")]
    #[cfg_attr(feature = "with-api", schema(value_type = String, example = "08:30"))]
    pub time: NaiveTime,

    /// Systolic pressure (mmHg)
    pub systolic: u16,

    /// Diastolic pressure (mmHg)
    pub diastolic: u16,

    /// Pulse (beats per minute)
    pub pulse: u16,
}

impl Reading {
    pub fn bp_category(&self) -> BloodPressureCategory {
        classify_blood_pressure(f64::from(self.systolic), f64::from(self.diastolic))
    }

    pub fn pulse_category(&self) -> PulseCategory {
        classify_pulse(f64::from(self.pulse))
    }

    pub fn time_bucket(&self) -> TimeBucket {
        TimeBucket::from_time(self.time)
    }
}

/// Request to record a new reading
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CreateReadingRequest {
    #[cfg_attr(feature = "with-api", schema(value_type = String, example = "2026-01-21"))]
    pub date: NaiveDate,

    #[serde(with = "hour_minute")]
    #[cfg_attr(feature = "with-api", schema(value_type = String, example = "08:30"))]
    pub time: NaiveTime,

    #[validate(range(min = 1, max = 400, message = "Systolic pressure must be between 1 and 400 mmHg"))]
    pub systolic: u16,

    #[validate(range(min = 1, max = 400, message = "Diastolic pressure must be between 1 and 400 mmHg"))]
    pub diastolic: u16,

    #[validate(range(min = 1, max = 300, message = "Pulse must be between 1 and 300 bpm"))]
    pub pulse: u16,
}

/// Serde helpers for `HH:MM` times; `HH:MM:SS` is accepted on input and the
/// seconds are dropped
pub mod hour_minute {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse(&text).map_err(serde::de::Error::custom)
    }

    pub fn parse(text: &str) -> Result<NaiveTime, String> {
        let text = text.trim();
        NaiveTime::parse_from_str(text, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
            .ok()
            .and_then(|time| NaiveTime::from_hms_opt(time.hour(), time.minute(), 0))
            .ok_or_else(|| format!("Invalid time '{}', expected HH:MM", text))
    }

    pub fn format(time: &NaiveTime) -> String {
        time.format(FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_serializes_minute_precision() {
        let reading = Reading {
            id: "abc".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 1, 21).unwrap(),
            time: NaiveTime::from_hms_opt(8, 5, 0).unwrap(),
            systolic: 120,
            diastolic: 80,
            pulse: 70,
        };

        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["date"], "2026-01-21");
        assert_eq!(json["time"], "08:05");
        assert_eq!(reading.bp_category(), BloodPressureCategory::Hypertension1);
        assert_eq!(reading.pulse_category(), PulseCategory::Good);
        assert_eq!(reading.time_bucket(), TimeBucket::Morning);
    }

    #[test]
    fn test_time_with_seconds_is_truncated() {
        let time = hour_minute::parse("14:30:59").unwrap();
        assert_eq!(hour_minute::format(&time), "14:30");
        assert!(hour_minute::parse("25:00").is_err());
        assert!(hour_minute::parse("noon").is_err());
    }

    #[test]
    fn test_create_request_ranges() {
        let valid: CreateReadingRequest = serde_json::from_str(
            r#"{"date":"2026-01-21","time":"07:45","systolic":118,"diastolic":76,"pulse":64}"#,
        )
        .unwrap();
        assert!(valid.validate().is_ok());

        let mut invalid = valid.clone();
        invalid.pulse = 0;
        assert!(invalid.validate().is_err());

        let mut invalid = valid;
        invalid.systolic = 401;
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_create_request_requires_numbers() {
        let result: Result<CreateReadingRequest, _> = serde_json::from_str(
            r#"{"date":"2026-01-21","time":"07:45","systolic":"high","diastolic":76,"pulse":64}"#,
        );
        assert!(result.is_err());
    }
}
