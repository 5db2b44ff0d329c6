use rand::Rng;
use rand::rngs::StdRng;
use revise_core::model::{Grade, SessionState, WordEntry};

use super::console::WaitOutcome;
use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// Where a session is in its per-word cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No word drawn yet.
    Ready,
    /// A word is on screen and the reveal timer is running.
    AwaitingReveal,
    /// The answer is shown and the user owes a grade.
    AwaitingGrade,
    /// The word is graded; continue or stop.
    AwaitingContinue,
    /// The user stopped; the state is being saved or discarded.
    Checkpointing,
    /// Every word has been graded.
    Completed,
}

/// How the reveal wait resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// The user asked for the answer in time and must grade themselves.
    AwaitingGrade,
    /// Time ran out; the word was already recorded as incorrect.
    TimedOut,
}

/// The word currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presented {
    pub entry: WordEntry,
    pub progress: SessionProgress,
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Drives one revision session over a [`SessionState`].
///
/// Words are drawn uniformly at random from the remaining set using the
/// injected RNG. Each step checks the current phase, so callers cannot grade
/// a word twice or skip the reveal.
pub struct SessionEngine<R: Rng = StdRng> {
    state: SessionState,
    rng: R,
    phase: SessionPhase,
    current: Option<usize>,
    resumed_from: Option<String>,
}

impl<R: Rng> SessionEngine<R> {
    /// Start a fresh session over `subset`.
    #[must_use]
    pub fn new(subset: Vec<WordEntry>, rng: R) -> Self {
        Self::from_state(SessionState::new(subset), rng)
    }

    /// Continue a session from an existing state.
    #[must_use]
    pub fn from_state(state: SessionState, rng: R) -> Self {
        Self {
            state,
            rng,
            phase: SessionPhase::Ready,
            current: None,
            resumed_from: None,
        }
    }

    /// Continue a session loaded from the named checkpoint.
    ///
    /// The checkpoint is removed once this session completes.
    #[must_use]
    pub fn resumed(state: SessionState, checkpoint: impl Into<String>, rng: R) -> Self {
        let mut engine = Self::from_state(state, rng);
        engine.resumed_from = Some(checkpoint.into());
        engine
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn resumed_from(&self) -> Option<&str> {
        self.resumed_from.as_deref()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let attempted = self.state.attempted_count() as usize;
        SessionProgress {
            number: attempted + 1,
            total: self.state.total(),
            attempted,
            remaining: self.state.remaining().len(),
        }
    }

    fn expect_phase(&self, allowed: &[SessionPhase]) -> Result<(), SessionError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(SessionError::OutOfOrder(self.phase))
        }
    }

    /// Draw the next word, or move to `Completed` when none remain.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfOrder` unless the session is ready or the
    /// previous word has been graded.
    pub fn present(&mut self) -> Result<Option<Presented>, SessionError> {
        self.expect_phase(&[SessionPhase::Ready, SessionPhase::AwaitingContinue])?;

        let remaining = self.state.remaining().len();
        if remaining == 0 {
            self.phase = SessionPhase::Completed;
            self.current = None;
            return Ok(None);
        }

        let index = self.rng.random_range(0..remaining);
        self.current = Some(index);
        self.phase = SessionPhase::AwaitingReveal;

        let entry = self.state.remaining()[index].clone();
        tracing::debug!(word = %entry.word, remaining, "word drawn");
        Ok(Some(Presented {
            entry,
            progress: self.progress(),
        }))
    }

    /// Resolve the reveal wait. A timeout grades the word incorrect on the spot.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfOrder` unless a word is awaiting reveal.
    pub fn resolve_reveal(&mut self, outcome: WaitOutcome) -> Result<RevealOutcome, SessionError> {
        self.expect_phase(&[SessionPhase::AwaitingReveal])?;
        match outcome {
            WaitOutcome::Signaled => {
                self.phase = SessionPhase::AwaitingGrade;
                Ok(RevealOutcome::AwaitingGrade)
            }
            WaitOutcome::TimedOut => {
                self.apply_grade(Grade::Incorrect)?;
                Ok(RevealOutcome::TimedOut)
            }
        }
    }

    /// Grade the revealed word.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfOrder` unless a revealed word awaits a grade.
    pub fn grade(&mut self, grade: Grade) -> Result<(), SessionError> {
        self.expect_phase(&[SessionPhase::AwaitingGrade])?;
        self.apply_grade(grade)
    }

    fn apply_grade(&mut self, grade: Grade) -> Result<(), SessionError> {
        let index = self
            .current
            .take()
            .ok_or(SessionError::OutOfOrder(self.phase))?;
        let entry = self.state.grade(index, grade)?;
        tracing::debug!(word = %entry.word, ?grade, "word graded");
        self.phase = SessionPhase::AwaitingContinue;
        Ok(())
    }

    /// Stop after the current word; the caller saves or discards the state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfOrder` unless the last word has been graded.
    pub fn stop(&mut self) -> Result<(), SessionError> {
        self.expect_phase(&[SessionPhase::AwaitingContinue])?;
        self.phase = SessionPhase::Checkpointing;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn entry(word: &str) -> WordEntry {
        WordEntry {
            date: "d1".into(),
            session: "1".into(),
            word: word.into(),
            meaning: String::new(),
            synonym_1: String::new(),
            synonym_2: String::new(),
            sentence_1: String::new(),
            sentence_2: String::new(),
        }
    }

    fn engine(words: &[&str]) -> SessionEngine {
        SessionEngine::new(
            words.iter().map(|w| entry(w)).collect(),
            StdRng::seed_from_u64(42),
        )
    }

    #[test]
    fn every_word_is_presented_exactly_once() {
        let mut engine = engine(&["abate", "benign", "cajole", "dearth"]);
        let mut seen = HashSet::new();
        let mut expected_remaining = 4;

        while let Some(p) = engine.present().unwrap() {
            assert_eq!(p.progress.remaining, expected_remaining);
            assert_eq!(p.progress.number, 5 - expected_remaining);
            assert_eq!(p.progress.total, 4);
            assert!(seen.insert(p.entry.word.clone()), "word shown twice");

            engine.resolve_reveal(WaitOutcome::Signaled).unwrap();
            engine.grade(Grade::Correct).unwrap();
            expected_remaining -= 1;
            assert_eq!(engine.state().remaining().len(), expected_remaining);
            assert!(engine.state().remaining().iter().all(|e| e.word != p.entry.word));
        }

        assert_eq!(engine.phase(), SessionPhase::Completed);
        assert_eq!(seen.len(), 4);
        assert_eq!(engine.state().attempted_count(), 4);
        assert_eq!(engine.state().correct_words().len(), 4);
    }

    #[test]
    fn timeout_records_incorrect_without_grading() {
        let mut engine = engine(&["abate"]);
        engine.present().unwrap().unwrap();

        let outcome = engine.resolve_reveal(WaitOutcome::TimedOut).unwrap();
        assert_eq!(outcome, RevealOutcome::TimedOut);
        assert_eq!(engine.phase(), SessionPhase::AwaitingContinue);
        assert_eq!(engine.state().incorrect_words(), ["abate".to_owned()]);

        let err = engine.grade(Grade::Correct).unwrap_err();
        assert!(matches!(err, SessionError::OutOfOrder(SessionPhase::AwaitingContinue)));
        assert_eq!(engine.state().attempted_count(), 1);
    }

    #[test]
    fn cannot_grade_before_reveal_or_draw_twice() {
        let mut engine = engine(&["abate", "benign"]);
        assert!(matches!(
            engine.grade(Grade::Correct),
            Err(SessionError::OutOfOrder(SessionPhase::Ready))
        ));

        engine.present().unwrap();
        assert!(matches!(
            engine.present(),
            Err(SessionError::OutOfOrder(SessionPhase::AwaitingReveal))
        ));
        assert!(matches!(
            engine.stop(),
            Err(SessionError::OutOfOrder(SessionPhase::AwaitingReveal))
        ));
    }

    #[test]
    fn empty_subset_completes_immediately() {
        let mut engine = engine(&[]);
        assert!(engine.present().unwrap().is_none());
        assert_eq!(engine.phase(), SessionPhase::Completed);
        assert_eq!(engine.state().attempted_count(), 0);
    }

    #[test]
    fn stop_after_grading_moves_to_checkpointing() {
        let mut engine = engine(&["abate", "benign"]);
        engine.present().unwrap();
        engine.resolve_reveal(WaitOutcome::Signaled).unwrap();
        engine.grade(Grade::Incorrect).unwrap();
        engine.stop().unwrap();
        assert_eq!(engine.phase(), SessionPhase::Checkpointing);
        assert_eq!(engine.state().remaining().len(), 1);
    }

    #[test]
    fn same_seed_draws_same_order() {
        let order = |seed| {
            let mut engine = SessionEngine::new(
                ["a", "b", "c", "d", "e"].iter().map(|w| entry(w)).collect(),
                StdRng::seed_from_u64(seed),
            );
            let mut order = Vec::new();
            while let Some(p) = engine.present().unwrap() {
                order.push(p.entry.word);
                engine.resolve_reveal(WaitOutcome::TimedOut).unwrap();
            }
            order
        };
        assert_eq!(order(9), order(9));
    }
}
