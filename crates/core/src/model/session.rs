use std::collections::HashMap;

use thiserror::Error;

use crate::model::{Grade, WordEntry};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStateError {
    #[error("attempted count ({attempted}) does not match graded words ({graded})")]
    CountMismatch { attempted: u32, graded: usize },

    #[error("remaining words ({remaining}) exceed the original subset ({original})")]
    RemainingOverflow { remaining: usize, original: usize },

    #[error(
        "remaining words ({remaining}) plus attempted ({attempted}) do not make up the original subset ({original})"
    )]
    Unaccounted {
        remaining: usize,
        attempted: usize,
        original: usize,
    },

    #[error("remaining word {word:?} is not part of the original subset")]
    UnknownRemaining { word: String },

    #[error("graded word {word:?} is not an attempted word of the original subset")]
    UnknownGraded { word: String },

    #[error("no remaining word at index {index}")]
    NoSuchWord { index: usize },
}

/// Mutable progress of one revision session.
///
/// `original_subset` is frozen at session start and only feeds the progress
/// denominator. `remaining` shrinks by one entry per graded word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    original_subset: Vec<WordEntry>,
    remaining: Vec<WordEntry>,
    correct_words: Vec<String>,
    incorrect_words: Vec<String>,
    attempted_count: u32,
}

impl SessionState {
    /// Start a fresh session over the given working subset.
    #[must_use]
    pub fn new(subset: Vec<WordEntry>) -> Self {
        Self {
            remaining: subset.clone(),
            original_subset: subset,
            correct_words: Vec::new(),
            incorrect_words: Vec::new(),
            attempted_count: 0,
        }
    }

    /// Rehydrate a session from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::CountMismatch` if the attempted count does not
    /// equal the number of graded words, `RemainingOverflow` or `Unaccounted` if
    /// the sizes do not add up to the original subset, and `UnknownRemaining` or
    /// `UnknownGraded` if a word does not come from the original subset.
    pub fn from_persisted(
        original_subset: Vec<WordEntry>,
        remaining: Vec<WordEntry>,
        correct_words: Vec<String>,
        incorrect_words: Vec<String>,
        attempted_count: u32,
    ) -> Result<Self, SessionStateError> {
        let state = Self {
            original_subset,
            remaining,
            correct_words,
            incorrect_words,
            attempted_count,
        };
        state.validate()?;
        Ok(state)
    }

    /// Check that `remaining` and the graded words split the original subset.
    ///
    /// # Errors
    ///
    /// See [`SessionState::from_persisted`].
    pub fn validate(&self) -> Result<(), SessionStateError> {
        let graded = self.correct_words.len() + self.incorrect_words.len();
        if usize::try_from(self.attempted_count).ok() != Some(graded) {
            return Err(SessionStateError::CountMismatch {
                attempted: self.attempted_count,
                graded,
            });
        }
        if self.remaining.len() > self.original_subset.len() {
            return Err(SessionStateError::RemainingOverflow {
                remaining: self.remaining.len(),
                original: self.original_subset.len(),
            });
        }
        if self.remaining.len() + graded != self.original_subset.len() {
            return Err(SessionStateError::Unaccounted {
                remaining: self.remaining.len(),
                attempted: graded,
                original: self.original_subset.len(),
            });
        }

        let mut unseen: HashMap<&WordEntry, usize> = HashMap::new();
        for entry in &self.original_subset {
            *unseen.entry(entry).or_default() += 1;
        }
        for entry in &self.remaining {
            match unseen.get_mut(entry) {
                Some(n) if *n > 0 => *n -= 1,
                _ => {
                    return Err(SessionStateError::UnknownRemaining {
                        word: entry.word.clone(),
                    });
                }
            }
        }

        let mut attempted: HashMap<&str, usize> = HashMap::new();
        for (entry, n) in unseen {
            *attempted.entry(entry.word.as_str()).or_default() += n;
        }
        for word in self.correct_words.iter().chain(&self.incorrect_words) {
            match attempted.get_mut(word.as_str()) {
                Some(n) if *n > 0 => *n -= 1,
                _ => return Err(SessionStateError::UnknownGraded { word: word.clone() }),
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn original_subset(&self) -> &[WordEntry] {
        &self.original_subset
    }

    #[must_use]
    pub fn remaining(&self) -> &[WordEntry] {
        &self.remaining
    }

    #[must_use]
    pub fn correct_words(&self) -> &[String] {
        &self.correct_words
    }

    #[must_use]
    pub fn incorrect_words(&self) -> &[String] {
        &self.incorrect_words
    }

    #[must_use]
    pub fn attempted_count(&self) -> u32 {
        self.attempted_count
    }

    /// Size of the subset the session started with.
    #[must_use]
    pub fn total(&self) -> usize {
        self.original_subset.len()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Grade the remaining word at `index` and drop it from the working set.
    ///
    /// Returns the graded entry.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::NoSuchWord` if `index` is out of range.
    pub fn grade(&mut self, index: usize, grade: Grade) -> Result<WordEntry, SessionStateError> {
        if index >= self.remaining.len() {
            return Err(SessionStateError::NoSuchWord { index });
        }
        let entry = self.remaining.swap_remove(index);
        match grade {
            Grade::Correct => self.correct_words.push(entry.word.clone()),
            Grade::Incorrect => self.incorrect_words.push(entry.word.clone()),
        }
        self.attempted_count += 1;
        Ok(entry)
    }

    /// Consume the state, returning the graded word lists.
    #[must_use]
    pub fn into_results(self) -> (Vec<String>, Vec<String>) {
        (self.correct_words, self.incorrect_words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::word::entry;

    fn subset() -> Vec<WordEntry> {
        vec![
            entry("abate", "d1", "1"),
            entry("benign", "d1", "1"),
            entry("cajole", "d2", "1"),
        ]
    }

    #[test]
    fn grading_shrinks_remaining_and_keeps_counts_in_step() {
        let mut state = SessionState::new(subset());

        let first = state.grade(1, Grade::Correct).unwrap();
        assert_eq!(first.word, "benign");
        assert_eq!(state.remaining().len(), 2);
        assert!(state.remaining().iter().all(|e| e.word != "benign"));

        state.grade(0, Grade::Incorrect).unwrap();
        assert_eq!(state.remaining().len(), 1);
        assert_eq!(state.attempted_count(), 2);
        assert_eq!(state.correct_words(), ["benign".to_owned()]);
        assert_eq!(state.incorrect_words(), ["abate".to_owned()]);
        assert_eq!(state.total(), 3);
        assert!(state.validate().is_ok());
    }

    #[test]
    fn grading_out_of_range_is_rejected() {
        let mut state = SessionState::new(subset());
        let err = state.grade(3, Grade::Correct).unwrap_err();
        assert_eq!(err, SessionStateError::NoSuchWord { index: 3 });
        assert_eq!(state.attempted_count(), 0);
    }

    #[test]
    fn persisted_state_with_bad_count_is_rejected() {
        let err = SessionState::from_persisted(
            subset(),
            Vec::new(),
            vec!["abate".into()],
            Vec::new(),
            2,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SessionStateError::CountMismatch {
                attempted: 2,
                graded: 1
            }
        ));
    }

    #[test]
    fn persisted_state_with_too_many_remaining_is_rejected() {
        let mut remaining = subset();
        remaining.push(entry("dearth", "d3", "1"));
        let err =
            SessionState::from_persisted(subset(), remaining, Vec::new(), Vec::new(), 0)
                .unwrap_err();
        assert!(matches!(err, SessionStateError::RemainingOverflow { .. }));
    }

    #[test]
    fn persisted_state_must_add_up_to_the_original_subset() {
        let words = subset();
        let err = SessionState::from_persisted(
            words[..2].to_vec(),
            vec![entry("zealot", "d9", "1"), words[0].clone()],
            Vec::new(),
            vec!["benign".into()],
            1,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SessionStateError::Unaccounted {
                remaining: 2,
                attempted: 1,
                original: 2
            }
        );
    }

    #[test]
    fn persisted_remaining_word_outside_the_subset_is_rejected() {
        let words = subset();
        let err = SessionState::from_persisted(
            words.clone(),
            vec![entry("zealot", "d9", "1"), words[2].clone()],
            Vec::new(),
            vec!["benign".into()],
            1,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SessionStateError::UnknownRemaining {
                word: "zealot".into()
            }
        );
    }

    #[test]
    fn persisted_graded_word_still_remaining_is_rejected() {
        let words = subset();
        let err = SessionState::from_persisted(
            words.clone(),
            words[1..].to_vec(),
            vec!["benign".into()],
            Vec::new(),
            1,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SessionStateError::UnknownGraded {
                word: "benign".into()
            }
        );
    }

    #[test]
    fn persisted_state_from_a_real_session_is_accepted() {
        let mut state = SessionState::new(subset());
        state.grade(2, Grade::Incorrect).unwrap();
        let restored = SessionState::from_persisted(
            state.original_subset().to_vec(),
            state.remaining().to_vec(),
            state.correct_words().to_vec(),
            state.incorrect_words().to_vec(),
            state.attempted_count(),
        )
        .unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn empty_session_is_finished_immediately() {
        let state = SessionState::new(Vec::new());
        assert!(state.is_finished());
        assert_eq!(state.total(), 0);
    }
}
