// Domain entities and value objects
pub mod category;
pub mod conversions;
pub mod reading;
pub mod time_bucket;

// Re-export common types for easier imports
pub use category::{BloodPressureCategory, PulseCategory};
pub use reading::{CreateReadingRequest, Reading};
pub use time_bucket::TimeBucket;
