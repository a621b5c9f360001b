use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::reading::Reading;

/// Secondary ordering of readings within a day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOrder {
    /// Earliest time first, used by the explicit "sort by date" action
    #[serde(alias = "asc")]
    Ascending,
    /// Latest time first, used by the default list view
    #[default]
    #[serde(alias = "desc")]
    Descending,
}

impl FromStr for TimeOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(TimeOrder::Ascending),
            "desc" | "descending" => Ok(TimeOrder::Descending),
            _ => Err(format!("Invalid time order '{}', expected 'asc' or 'desc'", s)),
        }
    }
}

impl fmt::Display for TimeOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeOrder::Ascending => f.write_str("asc"),
            TimeOrder::Descending => f.write_str("desc"),
        }
    }
}

/// Order readings by date descending, then by time in the given direction
///
/// The sort is stable: readings with equal date and time keep their input order.
pub fn sort_readings(readings: &[Reading], order: TimeOrder) -> Vec<Reading> {
    let mut sorted = readings.to_vec();
    sorted.sort_by(|a, b| compare(a, b, order));
    sorted
}

fn compare(a: &Reading, b: &Reading, order: TimeOrder) -> Ordering {
    let by_time = match order {
        TimeOrder::Ascending => a.time.cmp(&b.time),
        TimeOrder::Descending => b.time.cmp(&a.time),
    };
    b.date.cmp(&a.date).then(by_time)
}
