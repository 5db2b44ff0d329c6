use revise_core::model::{PerformanceRecord, SessionState, WordEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Current on-disk layout version for checkpoints.
pub const CHECKPOINT_VERSION: u32 = 1;

/// Upper bound on `-N` suffixes tried before giving up on a unique record name.
pub(crate) const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid name: {0:?}")]
    InvalidName(String),

    #[error("checkpoint {name} is corrupt: {reason}")]
    CorruptCheckpoint { name: String, reason: String },

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Persisted shape of a checkpoint.
///
/// Mirrors `SessionState` so adapters can serialize it without the domain type
/// carrying serde concerns, and so rehydration always re-checks the invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckpointRecord {
    pub version: u32,
    pub state: CheckpointState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckpointState {
    pub original_subset: Vec<WordEntry>,
    pub remaining: Vec<WordEntry>,
    pub correct_words: Vec<String>,
    pub incorrect_words: Vec<String>,
    pub attempted_count: u32,
}

impl CheckpointRecord {
    #[must_use]
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            state: CheckpointState {
                original_subset: state.original_subset().to_vec(),
                remaining: state.remaining().to_vec(),
                correct_words: state.correct_words().to_vec(),
                incorrect_words: state.incorrect_words().to_vec(),
                attempted_count: state.attempted_count(),
            },
        }
    }

    /// Convert the record back into a domain `SessionState`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::CorruptCheckpoint` if the version is unknown or the
    /// stored words and counts do not describe a session over the original subset.
    pub fn into_state(self, name: &str) -> Result<SessionState, StorageError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(StorageError::CorruptCheckpoint {
                name: name.to_owned(),
                reason: format!("unsupported version {}", self.version),
            });
        }
        let s = self.state;
        SessionState::from_persisted(
            s.original_subset,
            s.remaining,
            s.correct_words,
            s.incorrect_words,
            s.attempted_count,
        )
        .map_err(|e| StorageError::CorruptCheckpoint {
            name: name.to_owned(),
            reason: e.to_string(),
        })
    }
}

/// Checkpoint names become file names, so they must not escape the directory.
///
/// # Errors
///
/// Returns `StorageError::InvalidName` for blank names, names with path
/// separators, or names starting with a dot.
pub fn validate_checkpoint_name(name: &str) -> Result<(), StorageError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed != name
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0'])
    {
        return Err(StorageError::InvalidName(name.to_owned()));
    }
    Ok(())
}

/// Read access to the vocabulary dataset.
pub trait WordRepository: Send + Sync {
    /// Load every dataset row in file order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Dataset` if the dataset is missing columns or
    /// cannot be parsed, or `StorageError::Io` on read failures.
    fn load_words(&self) -> Result<Vec<WordEntry>, StorageError>;
}

/// Repository contract for named session checkpoints.
pub trait CheckpointRepository: Send + Sync {
    /// Persist a checkpoint, replacing any checkpoint with the same name.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidName` for unusable names, or other storage errors.
    fn save_checkpoint(&self, name: &str, state: &SessionState) -> Result<(), StorageError>;

    /// Load a checkpoint by name.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, `StorageError::CorruptCheckpoint`
    /// if the stored data does not describe a valid session.
    fn load_checkpoint(&self, name: &str) -> Result<SessionState, StorageError>;

    /// Remove a checkpoint. Removing a missing checkpoint succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the checkpoint exists but cannot be removed.
    fn delete_checkpoint(&self, name: &str) -> Result<(), StorageError>;

    /// Checkpoint names, sorted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the checkpoint store cannot be listed.
    fn list_checkpoints(&self) -> Result<Vec<String>, StorageError>;
}

/// Repository contract for completed-session performance records.
pub trait PerformanceRepository: Send + Sync {
    /// Append a new record. Never overwrites; returns the name it was stored under.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if no free name is left, or other storage errors.
    fn save_performance(&self, record: &PerformanceRecord) -> Result<String, StorageError>;

    /// Record names, sorted (chronological for timestamp names).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record store cannot be listed.
    fn list_performance_records(&self) -> Result<Vec<String>, StorageError>;

    /// Load every stored record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if any record cannot be read.
    fn load_performance_records(&self) -> Result<Vec<PerformanceRecord>, StorageError>;
}

/// Picks the first of `base`, `base-2`, `base-3`, ... that `is_taken` rejects.
pub(crate) fn unique_name(
    base: &str,
    mut is_taken: impl FnMut(&str) -> bool,
) -> Result<String, StorageError> {
    for attempt in 1..=MAX_NAME_ATTEMPTS {
        let candidate = suffixed(base, attempt);
        if !is_taken(&candidate) {
            return Ok(candidate);
        }
    }
    Err(StorageError::Conflict(base.to_owned()))
}

pub(crate) fn suffixed(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_owned()
    } else {
        format!("{base}-{attempt}")
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    words: Arc<Mutex<Vec<WordEntry>>>,
    checkpoints: Arc<Mutex<BTreeMap<String, CheckpointRecord>>>,
    performance: Arc<Mutex<BTreeMap<String, PerformanceRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_words(words: Vec<WordEntry>) -> Self {
        Self {
            words: Arc::new(Mutex::new(words)),
            ..Self::default()
        }
    }

    /// Store a raw checkpoint record, bypassing validation (used to simulate corruption).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the lock is poisoned.
    pub fn put_checkpoint_record(
        &self,
        name: &str,
        record: CheckpointRecord,
    ) -> Result<(), StorageError> {
        lock(&self.checkpoints)?.insert(name.to_owned(), record);
        Ok(())
    }
}

fn lock<T>(m: &Mutex<T>) -> Result<std::sync::MutexGuard<'_, T>, StorageError> {
    m.lock()
        .map_err(|e| StorageError::Io(std::io::Error::other(e.to_string())))
}

impl WordRepository for InMemoryRepository {
    fn load_words(&self) -> Result<Vec<WordEntry>, StorageError> {
        Ok(lock(&self.words)?.clone())
    }
}

impl CheckpointRepository for InMemoryRepository {
    fn save_checkpoint(&self, name: &str, state: &SessionState) -> Result<(), StorageError> {
        validate_checkpoint_name(name)?;
        lock(&self.checkpoints)?.insert(name.to_owned(), CheckpointRecord::from_state(state));
        Ok(())
    }

    fn load_checkpoint(&self, name: &str) -> Result<SessionState, StorageError> {
        let record = lock(&self.checkpoints)?
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(name.to_owned()))?;
        record.into_state(name)
    }

    fn delete_checkpoint(&self, name: &str) -> Result<(), StorageError> {
        lock(&self.checkpoints)?.remove(name);
        Ok(())
    }

    fn list_checkpoints(&self) -> Result<Vec<String>, StorageError> {
        Ok(lock(&self.checkpoints)?.keys().cloned().collect())
    }
}

impl PerformanceRepository for InMemoryRepository {
    fn save_performance(&self, record: &PerformanceRecord) -> Result<String, StorageError> {
        let mut guard = lock(&self.performance)?;
        let name = unique_name(&record.base_name(), |n| guard.contains_key(n))?;
        guard.insert(name.clone(), record.clone());
        Ok(name)
    }

    fn list_performance_records(&self) -> Result<Vec<String>, StorageError> {
        Ok(lock(&self.performance)?.keys().cloned().collect())
    }

    fn load_performance_records(&self) -> Result<Vec<PerformanceRecord>, StorageError> {
        Ok(lock(&self.performance)?.values().cloned().collect())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub words: Arc<dyn WordRepository>,
    pub checkpoints: Arc<dyn CheckpointRepository>,
    pub performance: Arc<dyn PerformanceRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory(words: Vec<WordEntry>) -> Self {
        Self::from_repo(InMemoryRepository::with_words(words))
    }

    /// Build a `Storage` whose three repositories share one in-memory backend.
    #[must_use]
    pub fn from_repo(repo: InMemoryRepository) -> Self {
        let words: Arc<dyn WordRepository> = Arc::new(repo.clone());
        let checkpoints: Arc<dyn CheckpointRepository> = Arc::new(repo.clone());
        let performance: Arc<dyn PerformanceRepository> = Arc::new(repo);
        Self {
            words,
            checkpoints,
            performance,
        }
    }
}
