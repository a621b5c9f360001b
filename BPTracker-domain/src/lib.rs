// BPTracker Domain
// This crate contains the classification, aggregation and reading-management logic

// Domain entities
pub mod entities;

// Services that implement business logic
pub mod services;

// Health checks and system status
pub mod health;

// Re-export the database module from the data crate for convenience
pub use bp_tracker_data::database;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
