// Domain services
// Pure computation over snapshots of readings, plus the reading service that
// owns access to the repository.

pub mod aggregation;
pub mod classification;
pub mod readings;
pub mod sorting;
pub mod statistics;

// Re-export service traits and factory functions
pub use readings::{create_default_reading_service, ReadingServiceTrait};

#[cfg(feature = "mock")]
pub use readings::create_mock_reading_service;
