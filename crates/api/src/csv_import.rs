//! CSV parsing for the bulk-import endpoints.
//!
//! Parsing is strict about the header (the required columns must all be
//! present) but lenient about rows: a row that fails to deserialize is
//! returned as an error in place so the caller can skip it, import the
//! rest, and report how many succeeded.

use csv::ReaderBuilder;
use serde::de::DeserializeOwned;

/// The uploaded file's header is missing one or more required columns
/// (or is not readable as CSV at all).
#[derive(Debug, thiserror::Error)]
#[error("CSV header is missing required columns")]
pub struct MissingColumns;

/// Whether an uploaded filename looks like a CSV file.
pub fn is_csv_filename(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".csv")
}

/// Parse CSV bytes into typed rows.
///
/// Verifies that every column in `required` appears in the header, then
/// deserializes each record individually. Extra columns are ignored;
/// column order does not matter.
pub fn parse_rows<T: DeserializeOwned>(
    bytes: &[u8],
    required: &[&str],
) -> Result<Vec<Result<T, csv::Error>>, MissingColumns> {
    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader.headers().map_err(|_| MissingColumns)?.clone();
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(MissingColumns);
        }
    }

    Ok(reader.deserialize::<T>().collect())
}
