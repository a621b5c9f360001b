use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::classification::{classify_blood_pressure, classify_pulse};
use crate::entities::category::{BloodPressureCategory, PulseCategory};
use crate::entities::reading::Reading;
use crate::entities::time_bucket::TimeBucket;

/// Readings sharing a date and time bucket, with averaged values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct AggregateGroup {
    #[cfg_attr(feature = "with-api", schema(value_type = String, example = "2026-01-21"))]
    pub date: NaiveDate,
    pub bucket: TimeBucket,
    pub count: usize,
    /// Member readings in input order
    pub readings: Vec<Reading>,
    pub avg_systolic: f64,
    pub avg_diastolic: f64,
    pub avg_pulse: f64,
    /// Category of the rounded averages
    pub bp_category: BloodPressureCategory,
    /// Category of the rounded average pulse
    pub pulse_category: PulseCategory,
}

/// Round to one decimal place, halves away from zero
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn mean(readings: &[Reading], value: impl Fn(&Reading) -> u16) -> f64 {
    let total: f64 = readings.iter().map(|r| f64::from(value(r))).sum();
    total / readings.len() as f64
}

/// Group readings by (date, time bucket) and average each group
///
/// Groups come out by date descending, then bucket in day order. Categories
/// are computed from the rounded averages.
pub fn aggregate_by_time_bucket(readings: &[Reading]) -> Vec<AggregateGroup> {
    let mut groups: BTreeMap<(Reverse<NaiveDate>, TimeBucket), Vec<Reading>> = BTreeMap::new();

    for reading in readings {
        groups
            .entry((Reverse(reading.date), reading.time_bucket()))
            .or_default()
            .push(reading.clone());
    }

    groups
        .into_iter()
        .map(|((Reverse(date), bucket), members)| {
            let avg_systolic = round_to_tenth(mean(&members, |r| r.systolic));
            let avg_diastolic = round_to_tenth(mean(&members, |r| r.diastolic));
            let avg_pulse = round_to_tenth(mean(&members, |r| r.pulse));

            AggregateGroup {
                date,
                bucket,
                count: members.len(),
                readings: members,
                avg_systolic,
                avg_diastolic,
                avg_pulse,
                bp_category: classify_blood_pressure(avg_systolic, avg_diastolic),
                pulse_category: classify_pulse(avg_pulse),
            }
        })
        .collect()
}
