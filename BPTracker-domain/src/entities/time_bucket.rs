use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

const MIDDAY_START_MINUTES: u32 = 10 * 60;
const EVENING_START_MINUTES: u32 = 14 * 60;

/// Time-of-day interval used to group readings; the three buckets cover the whole day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum TimeBucket {
    /// 00:00 - 09:59
    #[serde(rename = "Midnight - 10 AM")]
    Morning,
    /// 10:00 - 13:59
    #[serde(rename = "10 AM - 2 PM")]
    Midday,
    /// 14:00 - 23:59
    #[serde(rename = "2 PM - Midnight")]
    Evening,
}

impl TimeBucket {
    /// Bucket for a number of minutes since midnight
    pub fn from_minutes(minutes: u32) -> Self {
        if minutes < MIDDAY_START_MINUTES {
            TimeBucket::Morning
        } else if minutes < EVENING_START_MINUTES {
            TimeBucket::Midday
        } else {
            TimeBucket::Evening
        }
    }

    /// Bucket for a time of day; seconds are ignored
    pub fn from_time(time: NaiveTime) -> Self {
        Self::from_minutes(time.hour() * 60 + time.minute())
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeBucket::Morning => "Midnight - 10 AM",
            TimeBucket::Midday => "10 AM - 2 PM",
            TimeBucket::Evening => "2 PM - Midnight",
        }
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
