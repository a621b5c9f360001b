pub mod reading;

pub use reading::{CreateReadingRecord, ReadingRecord};
