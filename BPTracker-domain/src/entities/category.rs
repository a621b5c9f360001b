use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Blood pressure category based on measurements, ordered by severity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum BloodPressureCategory {
    /// Normal blood pressure (systolic < 120 and diastolic < 80)
    Normal,

    /// Elevated blood pressure (systolic 120-129 and diastolic < 80)
    Elevated,

    /// Stage 1 Hypertension (systolic 130-139 or diastolic 80-89)
    Hypertension1,

    /// Stage 2 Hypertension (systolic ≥ 140 or diastolic ≥ 90)
    Hypertension2,

    /// Hypertensive crisis (systolic ≥ 180 and/or diastolic ≥ 120)
    HypertensiveCrisis,
}

impl BloodPressureCategory {
    /// Colour label used by renderers to highlight a reading
    pub fn color_label(self) -> &'static str {
        match self {
            BloodPressureCategory::Normal => "green",
            BloodPressureCategory::Elevated => "yellow",
            BloodPressureCategory::Hypertension1 => "orange",
            BloodPressureCategory::Hypertension2 => "red",
            BloodPressureCategory::HypertensiveCrisis => "dark-red",
        }
    }
}

impl fmt::Display for BloodPressureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BloodPressureCategory::Normal => "Normal",
            BloodPressureCategory::Elevated => "Elevated",
            BloodPressureCategory::Hypertension1 => "Hypertension Stage 1",
            BloodPressureCategory::Hypertension2 => "Hypertension Stage 2",
            BloodPressureCategory::HypertensiveCrisis => "Hypertensive Crisis",
        };
        f.write_str(label)
    }
}

/// Pulse band, ordered from slowest to fastest
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum PulseCategory {
    /// Below 57 bpm
    VeryLow,
    /// 57-61 bpm
    Low,
    /// 62-67 bpm
    BelowNormal,
    /// 68-71 bpm
    Good,
    /// 72-75 bpm
    Normal,
    /// 76-81 bpm
    Elevated,
    /// 82 bpm and above
    High,
}

impl PulseCategory {
    /// Colour label used by renderers to highlight a pulse value
    pub fn color_label(self) -> &'static str {
        match self {
            PulseCategory::VeryLow => "white-red-text",
            PulseCategory::Low => "dark-blue",
            PulseCategory::BelowNormal => "blue",
            PulseCategory::Good => "dark-green",
            PulseCategory::Normal => "green",
            PulseCategory::Elevated => "yellow",
            PulseCategory::High => "red",
        }
    }
}

impl fmt::Display for PulseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PulseCategory::VeryLow => "Very Low",
            PulseCategory::Low => "Low",
            PulseCategory::BelowNormal => "Below Normal",
            PulseCategory::Good => "Good",
            PulseCategory::Normal => "Normal",
            PulseCategory::Elevated => "Elevated",
            PulseCategory::High => "High",
        };
        f.write_str(label)
    }
}
