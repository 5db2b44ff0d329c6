use std::collections::BTreeSet;

use chrono::NaiveDateTime;

use crate::time::RECORD_STAMP_FORMAT;

/// Results of one completed revision session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformanceRecord {
    pub recorded_at: NaiveDateTime,
    pub correct_words: Vec<String>,
    pub incorrect_words: Vec<String>,
}

impl PerformanceRecord {
    #[must_use]
    pub fn new(
        recorded_at: NaiveDateTime,
        correct_words: Vec<String>,
        incorrect_words: Vec<String>,
    ) -> Self {
        Self {
            recorded_at,
            correct_words,
            incorrect_words,
        }
    }

    /// Number of words graded in the session.
    #[must_use]
    pub fn attempted_count(&self) -> usize {
        self.correct_words.len() + self.incorrect_words.len()
    }

    /// Storage name for this record: `<YYYYMMDD_HHMM>_<attempted>`.
    #[must_use]
    pub fn base_name(&self) -> String {
        format!(
            "{}_{}",
            self.recorded_at.format(RECORD_STAMP_FORMAT),
            self.attempted_count()
        )
    }
}

/// Returns true for cells that stand for "no value" in a ragged record column.
#[must_use]
pub fn is_null_cell(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || cell.eq_ignore_ascii_case("nan")
}

/// Union of every incorrectly answered word across the given records.
///
/// Comparison is case-sensitive; null cells are dropped.
#[must_use]
pub fn collect_mistakes<'a>(
    records: impl IntoIterator<Item = &'a PerformanceRecord>,
) -> BTreeSet<String> {
    records
        .into_iter()
        .flat_map(|r| r.incorrect_words.iter())
        .filter(|w| !is_null_cell(w))
        .cloned()
        .collect()
}
