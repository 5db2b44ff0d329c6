use std::fs;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDateTime};
use revise_core::time::RECORD_STAMP_FORMAT;

use crate::repository::StorageError;

const BOM: char = '\u{feff}';

/// Decode file bytes as UTF-8, falling back to Latin-1 when they are not valid UTF-8.
///
/// Latin-1 maps every byte to the code point of the same value, so the fallback
/// never fails. A leading byte-order mark is dropped.
#[must_use]
pub fn decode_text(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().iter().map(|&b| char::from(b)).collect(),
    };
    match text.strip_prefix(BOM) {
        Some(rest) => rest.to_owned(),
        None => text,
    }
}

pub(super) fn read_text(path: &Path) -> Result<String, StorageError> {
    Ok(decode_text(fs::read(path)?))
}

/// Recover the stamp encoded in a record name (`20231114_2213_12`), falling
/// back to the file's modification time for names in another shape.
pub(super) fn recorded_at(name: &str, path: &Path) -> Result<NaiveDateTime, StorageError> {
    if let Some(stamp) = name.get(..13)
        && let Ok(at) = NaiveDateTime::parse_from_str(stamp, RECORD_STAMP_FORMAT)
    {
        return Ok(at);
    }
    let modified = fs::metadata(path)?.modified()?;
    Ok(DateTime::<Local>::from(modified).naive_local())
}

pub(super) fn csv_error(path: &Path, err: &csv::Error) -> StorageError {
    StorageError::Dataset(format!("{}: {err}", path.display()))
}
