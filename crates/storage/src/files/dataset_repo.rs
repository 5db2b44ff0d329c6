use csv::ReaderBuilder;
use revise_core::model::WordEntry;

use super::FileRepository;
use super::mapping::{csv_error, read_text};
use crate::repository::{StorageError, WordRepository};

impl WordRepository for FileRepository {
    fn load_words(&self) -> Result<Vec<WordEntry>, StorageError> {
        let path = &self.layout.dataset;
        if !path.exists() {
            return Err(StorageError::NotFound(path.display().to_string()));
        }
        let text = read_text(path)?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());

        let mut words = Vec::new();
        for row in reader.deserialize::<WordEntry>() {
            words.push(row.map_err(|e| csv_error(path, &e))?);
        }

        tracing::debug!(path = %path.display(), count = words.len(), "loaded dataset");
        Ok(words)
    }
}
