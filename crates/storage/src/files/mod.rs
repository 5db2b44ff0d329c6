use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::repository::{
    CheckpointRepository, PerformanceRepository, Storage, StorageError, WordRepository,
};

mod checkpoint_repo;
mod dataset_repo;
mod mapping;
mod performance_repo;

pub use mapping::decode_text;

/// Where the dataset, checkpoints, and performance records live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    pub dataset: PathBuf,
    pub checkpoint_dir: PathBuf,
    pub performance_dir: PathBuf,
}

impl StorageLayout {
    #[must_use]
    pub fn new(
        dataset: impl Into<PathBuf>,
        checkpoint_dir: impl Into<PathBuf>,
        performance_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            dataset: dataset.into(),
            checkpoint_dir: checkpoint_dir.into(),
            performance_dir: performance_dir.into(),
        }
    }

    /// Conventional layout under a single root: `data/WordDatabase.csv`,
    /// `checkpoint/`, `performance/`.
    #[must_use]
    pub fn under(root: &Path) -> Self {
        Self::new(
            root.join("data").join("WordDatabase.csv"),
            root.join("checkpoint"),
            root.join("performance"),
        )
    }
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self::under(Path::new("."))
    }
}

/// File-backed repository: CSV dataset, JSON checkpoints, CSV performance records.
#[derive(Debug, Clone)]
pub struct FileRepository {
    layout: StorageLayout,
}

impl FileRepository {
    #[must_use]
    pub fn new(layout: StorageLayout) -> Self {
        Self { layout }
    }

    #[must_use]
    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    /// Create the checkpoint and performance directories if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if a directory cannot be created.
    pub fn prepare(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.layout.checkpoint_dir)?;
        fs::create_dir_all(&self.layout.performance_dir)?;
        Ok(())
    }
}

impl Storage {
    /// Build a `Storage` backed by files under the given layout.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the storage directories cannot be created.
    pub fn files(layout: StorageLayout) -> Result<Self, StorageError> {
        let repo = FileRepository::new(layout);
        repo.prepare()?;
        let words: Arc<dyn WordRepository> = Arc::new(repo.clone());
        let checkpoints: Arc<dyn CheckpointRepository> = Arc::new(repo.clone());
        let performance: Arc<dyn PerformanceRepository> = Arc::new(repo);
        Ok(Self {
            words,
            checkpoints,
            performance,
        })
    }
}

/// File stems in `dir` with the given extension, sorted. A missing directory lists as empty.
fn list_stems(dir: &Path, extension: &str) -> Result<Vec<String>, StorageError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut stems = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().is_none_or(|e| e != extension) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            stems.push(stem.to_owned());
        }
    }
    stems.sort();
    Ok(stems)
}
