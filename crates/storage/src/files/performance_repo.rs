use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use revise_core::model::{PerformanceRecord, is_null_cell};
use tempfile::NamedTempFile;

use super::mapping::{csv_error, read_text, recorded_at};
use super::{FileRepository, list_stems};
use crate::repository::{MAX_NAME_ATTEMPTS, PerformanceRepository, StorageError, suffixed};

const EXTENSION: &str = "csv";
const CORRECT_COLUMN: &str = "correct";
const INCORRECT_COLUMN: &str = "incorrect";

impl FileRepository {
    fn performance_path(&self, name: &str) -> PathBuf {
        self.layout
            .performance_dir
            .join(format!("{name}.{EXTENSION}"))
    }
}

/// Lay out two lists side by side, padding the shorter column with empty cells.
fn write_columns<W: Write>(out: W, correct: &[String], incorrect: &[String]) -> csv::Result<()> {
    let mut writer = WriterBuilder::new().from_writer(out);
    writer.write_record([CORRECT_COLUMN, INCORRECT_COLUMN])?;
    for i in 0..correct.len().max(incorrect.len()) {
        let c = correct.get(i).map_or("", String::as_str);
        let n = incorrect.get(i).map_or("", String::as_str);
        writer.write_record([c, n])?;
    }
    writer.flush()?;
    Ok(())
}

/// Read the `correct`/`incorrect` columns back, dropping null padding.
///
/// Columns are located by header name, so files carrying an extra leading
/// index column read the same.
fn read_columns(path: &Path) -> Result<(Vec<String>, Vec<String>), StorageError> {
    let text = read_text(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(|e| csv_error(path, &e))?.clone();
    let position = |column: &str| headers.iter().position(|h| h.trim() == column);
    let correct_idx = position(CORRECT_COLUMN);
    let Some(incorrect_idx) = position(INCORRECT_COLUMN) else {
        return Err(StorageError::Serialization(format!(
            "{}: missing `{INCORRECT_COLUMN}` column",
            path.display()
        )));
    };

    let mut correct = Vec::new();
    let mut incorrect = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| csv_error(path, &e))?;
        if let Some(cell) = correct_idx.and_then(|i| row.get(i))
            && !is_null_cell(cell)
        {
            correct.push(cell.to_owned());
        }
        if let Some(cell) = row.get(incorrect_idx)
            && !is_null_cell(cell)
        {
            incorrect.push(cell.to_owned());
        }
    }
    Ok((correct, incorrect))
}

impl PerformanceRepository for FileRepository {
    fn save_performance(&self, record: &PerformanceRecord) -> Result<String, StorageError> {
        let mut tmp = NamedTempFile::new_in(&self.layout.performance_dir)?;
        write_columns(
            tmp.as_file_mut(),
            &record.correct_words,
            &record.incorrect_words,
        )
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
        tmp.as_file().sync_all()?;

        let base = record.base_name();
        for attempt in 1..=MAX_NAME_ATTEMPTS {
            let name = suffixed(&base, attempt);
            match tmp.persist_noclobber(self.performance_path(&name)) {
                Ok(_) => {
                    tracing::info!(
                        record = %name,
                        attempted = record.attempted_count(),
                        "performance record saved"
                    );
                    return Ok(name);
                }
                Err(e) if e.error.kind() == ErrorKind::AlreadyExists => tmp = e.file,
                Err(e) => return Err(StorageError::Io(e.error)),
            }
        }
        Err(StorageError::Conflict(base))
    }

    fn list_performance_records(&self) -> Result<Vec<String>, StorageError> {
        list_stems(&self.layout.performance_dir, EXTENSION)
    }

    fn load_performance_records(&self) -> Result<Vec<PerformanceRecord>, StorageError> {
        let names = self.list_performance_records()?;
        let mut records = Vec::with_capacity(names.len());
        for name in names {
            let path = self.performance_path(&name);
            let (correct, incorrect) = read_columns(&path)?;
            records.push(PerformanceRecord::new(
                recorded_at(&name, &path)?,
                correct,
                incorrect,
            ));
        }
        tracing::debug!(count = records.len(), "loaded performance history");
        Ok(records)
    }
}
