// Public entities for the BPTracker API
// Shapes sent to and received from HTTP clients

pub mod aggregate;
pub mod common;
pub mod reading;
