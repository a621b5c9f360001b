// BPTracker Data
// This crate handles storage of readings and the file formats used to move them around

// Database connection management
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;

// JSON and tab-separated file formats
pub mod transfer;
