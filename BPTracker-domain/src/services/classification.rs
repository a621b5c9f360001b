use crate::entities::category::{BloodPressureCategory, PulseCategory};

/// Categorize blood pressure based on measurements
///
/// Rules are checked from most to least severe and the first match wins.
/// Every pair of real numbers matches one of the first five rules; only a NaN
/// input reaches the final branch, which reports Stage 1.
pub fn classify_blood_pressure(systolic: f64, diastolic: f64) -> BloodPressureCategory {
    if systolic >= 180.0 || diastolic >= 120.0 {
        BloodPressureCategory::HypertensiveCrisis
    } else if systolic >= 140.0 || diastolic >= 90.0 {
        BloodPressureCategory::Hypertension2
    } else if systolic >= 130.0 || diastolic >= 80.0 {
        BloodPressureCategory::Hypertension1
    } else if (120.0..130.0).contains(&systolic) && diastolic < 80.0 {
        BloodPressureCategory::Elevated
    } else if systolic < 120.0 && diastolic < 80.0 {
        BloodPressureCategory::Normal
    } else {
        BloodPressureCategory::Hypertension1
    }
}

/// Categorize a pulse value; each bound belongs to the faster band
pub fn classify_pulse(pulse: f64) -> PulseCategory {
    if pulse < 57.0 {
        PulseCategory::VeryLow
    } else if pulse < 62.0 {
        PulseCategory::Low
    } else if pulse < 68.0 {
        PulseCategory::BelowNormal
    } else if pulse < 72.0 {
        PulseCategory::Good
    } else if pulse < 76.0 {
        PulseCategory::Normal
    } else if pulse < 82.0 {
        PulseCategory::Elevated
    } else {
        PulseCategory::High
    }
}
