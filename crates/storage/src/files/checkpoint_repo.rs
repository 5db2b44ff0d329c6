use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use revise_core::model::SessionState;
use tempfile::NamedTempFile;

use super::{FileRepository, list_stems};
use crate::repository::{
    CheckpointRecord, CheckpointRepository, StorageError, validate_checkpoint_name,
};

const EXTENSION: &str = "json";

impl FileRepository {
    fn checkpoint_path(&self, name: &str) -> PathBuf {
        self.layout
            .checkpoint_dir
            .join(format!("{name}.{EXTENSION}"))
    }
}

impl CheckpointRepository for FileRepository {
    fn save_checkpoint(&self, name: &str, state: &SessionState) -> Result<(), StorageError> {
        validate_checkpoint_name(name)?;
        let record = CheckpointRecord::from_state(state);
        let json = serde_json::to_vec_pretty(&record)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        // Write beside the target and rename so a crash never leaves half a checkpoint.
        let mut tmp = NamedTempFile::new_in(&self.layout.checkpoint_dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        let path = self.checkpoint_path(name);
        tmp.persist(&path).map_err(|e| StorageError::Io(e.error))?;

        tracing::info!(checkpoint = name, remaining = state.remaining().len(), "checkpoint saved");
        Ok(())
    }

    fn load_checkpoint(&self, name: &str) -> Result<SessionState, StorageError> {
        validate_checkpoint_name(name)?;
        let path = self.checkpoint_path(name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(name.to_owned()));
            }
            Err(e) => return Err(e.into()),
        };

        let record: CheckpointRecord =
            serde_json::from_slice(&bytes).map_err(|e| StorageError::CorruptCheckpoint {
                name: name.to_owned(),
                reason: e.to_string(),
            })?;
        record.into_state(name)
    }

    fn delete_checkpoint(&self, name: &str) -> Result<(), StorageError> {
        validate_checkpoint_name(name)?;
        match fs::remove_file(self.checkpoint_path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn list_checkpoints(&self) -> Result<Vec<String>, StorageError> {
        list_stems(&self.layout.checkpoint_dir, EXTENSION)
    }
}
