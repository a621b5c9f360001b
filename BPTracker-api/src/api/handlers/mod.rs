pub mod health;
pub mod readings;

// Re-export handlers for easier imports
pub use health::health_check;
pub use readings::{
    clear_readings, create_reading, delete_reading, export_json, export_text, get_aggregated_readings, get_reading,
    get_statistics, import_json, import_text, list_readings, sort_readings,
};
