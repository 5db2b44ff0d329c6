use std::fs;

use revise_core::model::{Grade, PerformanceRecord, SessionState, WordEntry};
use revise_core::time::fixed_now;
use storage::files::{FileRepository, StorageLayout};
use storage::repository::{
    CheckpointRepository, PerformanceRepository, Storage, StorageError, WordRepository,
};
use tempfile::tempdir;

const DATASET: &str = "\
date,session,word,meaning,synonym_1,synonym_2,sentence_1,sentence_2
01-03-2024,1,abate,lessen,subside,wane,The storm abated.,Anger abated.
01-03-2024,1,benign,harmless,mild,kind,A benign tumour.,A benign smile.
02-03-2024,2,cajole,coax,wheedle,persuade,She cajoled him.,Cajoled into it.
";

fn repo_with_dataset(contents: &[u8]) -> (tempfile::TempDir, FileRepository) {
    let dir = tempdir().expect("tempdir");
    let layout = StorageLayout::under(dir.path());
    fs::create_dir_all(layout.dataset.parent().unwrap()).unwrap();
    fs::write(&layout.dataset, contents).unwrap();
    let repo = FileRepository::new(layout);
    repo.prepare().expect("prepare");
    (dir, repo)
}

#[test]
fn dataset_rows_load_in_file_order() {
    let (_dir, repo) = repo_with_dataset(DATASET.as_bytes());
    let words = repo.load_words().unwrap();

    let names: Vec<_> = words.iter().map(|w| w.word.as_str()).collect();
    assert_eq!(names, ["abate", "benign", "cajole"]);
    assert_eq!(words[2].date, "02-03-2024");
    assert_eq!(words[2].session, "2");
    assert_eq!(words[0].synonym_2, "wane");
    assert_eq!(words[1].sentence_2, "A benign smile.");
}

#[test]
fn latin1_dataset_is_decoded() {
    let mut bytes = b"date,session,word,meaning,synonym_1,synonym_2,sentence_1,sentence_2\n".to_vec();
    bytes.extend_from_slice(b"d1,1,na\xefve,innocent,,,,\n");
    let (_dir, repo) = repo_with_dataset(&bytes);

    let words = repo.load_words().unwrap();
    assert_eq!(words[0].word, "naïve");
}

#[test]
fn dataset_missing_a_column_is_rejected() {
    let (_dir, repo) = repo_with_dataset(b"date,session,word\nd1,1,abate\n");
    let err = repo.load_words().unwrap_err();
    assert!(matches!(err, StorageError::Dataset(_)));
}

#[test]
fn checkpoint_round_trips_through_disk_and_overwrites() {
    let (_dir, repo) = repo_with_dataset(DATASET.as_bytes());
    let words = repo.load_words().unwrap();

    let mut state = SessionState::new(words);
    state.grade(2, Grade::Correct).unwrap();
    repo.save_checkpoint("monday", &state).unwrap();
    assert_eq!(repo.load_checkpoint("monday").unwrap(), state);

    state.grade(0, Grade::Incorrect).unwrap();
    repo.save_checkpoint("monday", &state).unwrap();
    let reloaded = repo.load_checkpoint("monday").unwrap();
    assert_eq!(reloaded, state);
    assert_eq!(reloaded.attempted_count(), 2);
    assert_eq!(repo.list_checkpoints().unwrap(), vec!["monday".to_owned()]);

    repo.delete_checkpoint("monday").unwrap();
    assert!(repo.list_checkpoints().unwrap().is_empty());
    repo.delete_checkpoint("monday").unwrap();
}

#[test]
fn malformed_checkpoint_is_corrupt() {
    let (_dir, repo) = repo_with_dataset(DATASET.as_bytes());
    let path = repo.layout().checkpoint_dir.join("broken.json");

    fs::write(&path, b"{\"version\":1,\"state\":{\"remaining\":[]}}").unwrap();
    assert!(matches!(
        repo.load_checkpoint("broken").unwrap_err(),
        StorageError::CorruptCheckpoint { .. }
    ));

    fs::write(&path, b"\x80\x03}q\x00").unwrap();
    assert!(matches!(
        repo.load_checkpoint("broken").unwrap_err(),
        StorageError::CorruptCheckpoint { .. }
    ));
}

#[test]
fn checkpoints_list_sorted_and_ignore_other_files() {
    let (_dir, repo) = repo_with_dataset(DATASET.as_bytes());
    let state = SessionState::new(Vec::<WordEntry>::new());
    repo.save_checkpoint("zeta", &state).unwrap();
    repo.save_checkpoint("alpha", &state).unwrap();
    fs::write(repo.layout().checkpoint_dir.join("notes.txt"), b"x").unwrap();

    assert_eq!(
        repo.list_checkpoints().unwrap(),
        vec!["alpha".to_owned(), "zeta".to_owned()]
    );
}

#[test]
fn performance_records_are_ragged_and_never_overwritten() {
    let (_dir, repo) = repo_with_dataset(DATASET.as_bytes());
    let record = PerformanceRecord::new(
        fixed_now(),
        vec!["abate".into()],
        vec!["benign".into(), "cajole".into()],
    );

    let first = repo.save_performance(&record).unwrap();
    let second = repo.save_performance(&record).unwrap();
    assert_eq!(first, "20231114_2213_3");
    assert_eq!(second, "20231114_2213_3-2");

    let text = fs::read_to_string(repo.layout().performance_dir.join("20231114_2213_3.csv")).unwrap();
    assert_eq!(text, "correct,incorrect\nabate,benign\n,cajole\n");

    let loaded = repo.load_performance_records().unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].correct_words, record.correct_words);
    assert_eq!(loaded[0].incorrect_words, record.incorrect_words);
    assert_eq!(loaded[0].base_name(), first);
}

#[test]
fn performance_files_with_index_column_and_nan_cells_are_read() {
    let (_dir, repo) = repo_with_dataset(DATASET.as_bytes());
    fs::write(
        repo.layout().performance_dir.join("20240301_0930_3.csv"),
        b",correct,incorrect\n0,abate,cat\n1,,dog\n2,,NaN\n",
    )
    .unwrap();

    let loaded = repo.load_performance_records().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].correct_words, vec!["abate".to_owned()]);
    assert_eq!(loaded[0].incorrect_words, vec!["cat".to_owned(), "dog".to_owned()]);
    assert_eq!(
        repo.list_performance_records().unwrap(),
        vec!["20240301_0930_3".to_owned()]
    );
}

#[test]
fn storage_files_creates_directories() {
    let dir = tempdir().unwrap();
    let layout = StorageLayout::under(dir.path());
    let storage = Storage::files(layout.clone()).unwrap();

    assert!(layout.checkpoint_dir.is_dir());
    assert!(layout.performance_dir.is_dir());
    assert!(storage.checkpoints.list_checkpoints().unwrap().is_empty());
    assert!(matches!(
        storage.words.load_words().unwrap_err(),
        StorageError::NotFound(_)
    ));
}
