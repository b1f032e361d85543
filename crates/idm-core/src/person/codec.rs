//! Data entry payloads
//!
//! Register and merge commands carry their entries as a JSON array. Bad
//! payloads become validation errors returned to the caller.

use std::collections::HashSet;

use super::entity::DataEntry;
use crate::details;
use crate::usecase::UseCaseError;

/// Parse a caller-supplied JSON array of data entries and check the batch.
///
/// `null` is accepted as an empty batch.
pub fn decode_entries(payload: &str) -> Result<Vec<DataEntry>, UseCaseError> {
    let entries: Option<Vec<DataEntry>> = serde_json::from_str(payload).map_err(|e| {
        UseCaseError::validation_with_details(
            "MALFORMED_ENTRIES",
            "Data entries must be a JSON array of entry objects",
            details! { "reason" => e.to_string() },
        )
    })?;
    validate_entries(entries.unwrap_or_default())
}

/// Check a batch of incoming entries and normalize their visibility sets.
///
/// Every entry needs a non-empty key and keys must be distinct within the
/// batch; a duplicate is rejected rather than silently dropped.
pub fn validate_entries(mut entries: Vec<DataEntry>) -> Result<Vec<DataEntry>, UseCaseError> {
    let mut seen = HashSet::new();
    for (index, entry) in entries.iter().enumerate() {
        if entry.key.trim().is_empty() {
            return Err(UseCaseError::validation_with_details(
                "ENTRY_KEY_REQUIRED",
                "Every data entry needs a key",
                details! { "index" => index },
            ));
        }
        if !seen.insert(entry.key.as_str()) {
            return Err(UseCaseError::validation_with_details(
                "DUPLICATE_ENTRY_KEY",
                format!("Data entry key '{}' appears more than once", entry.key),
                details! { "dataKey" => entry.key },
            ));
        }
    }

    entries.iter_mut().for_each(DataEntry::normalize);
    Ok(entries)
}
