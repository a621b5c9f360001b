use serde::{Deserialize, Deserializer, Serialize};

/// Storage model for a single reading
///
/// Dates and times are kept as the text the user entered (`YYYY-MM-DD`, `HH:MM`),
/// which is also how they appear in JSON and tab-separated files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingRecord {
    /// Unique identifier for the reading
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    /// Calendar date of the measurement
    pub date: String,

    /// Time of day of the measurement
    pub time: String,

    /// Systolic blood pressure (the higher number)
    pub systolic: u16,

    /// Diastolic blood pressure (the lower number)
    pub diastolic: u16,

    /// Pulse rate in beats per minute
    pub pulse: u16,
}

/// Input data for storing a new reading; the repository assigns the id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReadingRecord {
    pub date: String,
    pub time: String,
    pub systolic: u16,
    pub diastolic: u16,
    pub pulse: u16,
}

impl CreateReadingRecord {
    /// Attach an id, producing the record that gets stored
    pub fn into_record(self, id: String) -> ReadingRecord {
        ReadingRecord {
            id,
            date: self.date,
            time: self.time,
            systolic: self.systolic,
            diastolic: self.diastolic,
            pulse: self.pulse,
        }
    }
}

/// Older JSON backups stored millisecond timestamps (sometimes with a random
/// fraction) as ids. Accept both shapes and keep the decimal text.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}
