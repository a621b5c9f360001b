use std::path::Path;

use tracing::debug;

use super::TransferError;
use crate::models::reading::ReadingRecord;

/// Serialize the collection as a pretty-printed JSON array
pub fn to_json_document(readings: &[ReadingRecord]) -> Result<String, TransferError> {
    Ok(serde_json::to_string_pretty(readings)?)
}

/// Parse a JSON array of readings; every reading must carry all fields
pub fn from_json_document(content: &str) -> Result<Vec<ReadingRecord>, TransferError> {
    Ok(serde_json::from_str(content)?)
}

/// Write the collection to a JSON file, replacing its contents
pub async fn write_json_file(path: &Path, readings: &[ReadingRecord]) -> Result<(), TransferError> {
    debug!("Writing {} readings to {}", readings.len(), path.display());
    let document = to_json_document(readings)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, document).await?;
    Ok(())
}

/// Read a JSON file written by [`write_json_file`]
pub async fn read_json_file(path: &Path) -> Result<Vec<ReadingRecord>, TransferError> {
    debug!("Reading readings from {}", path.display());
    let content = tokio::fs::read_to_string(path).await?;
    from_json_document(&content)
}
