use rand::Rng;
use revise_core::model::{Grade, PerformanceRecord, SelectionPolicy, is_deny};
use storage::repository::Storage;

use super::console::{Prompt, SessionConsole, SessionEvent};
use super::engine::{RevealOutcome, SessionEngine};
use crate::Clock;
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::selection::SubsetSelector;

/// Results of a completed session, as persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionSummary {
    /// Name the performance record was stored under.
    pub record_name: String,
    pub attempted: u32,
    pub correct_words: Vec<String>,
    pub incorrect_words: Vec<String>,
}

/// How a session run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Every word was graded and a performance record was written.
    Completed(RevisionSummary),
    /// The user stopped and saved a checkpoint.
    Checkpointed { name: String, attempted: u32 },
    /// The user stopped without saving; nothing was written.
    Discarded { attempted: u32 },
}

/// Orchestrates session start, the interactive loop, and persistence.
#[derive(Clone)]
pub struct RevisionService {
    clock: Clock,
    storage: Storage,
    config: SessionConfig,
}

impl RevisionService {
    #[must_use]
    pub fn new(clock: Clock, storage: Storage, config: SessionConfig) -> Self {
        Self {
            clock,
            storage,
            config,
        }
    }

    /// Names of saved checkpoints, sorted.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the checkpoints cannot be listed.
    pub fn checkpoints(&self) -> Result<Vec<String>, SessionError> {
        Ok(self.storage.checkpoints.list_checkpoints()?)
    }

    /// Start a new session over the subset chosen by `policy`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Selection` for invalid policy arguments, before
    /// anything is written, or `SessionError::Storage` if the dataset or the
    /// performance history cannot be read.
    pub fn start_session(&self, policy: SelectionPolicy) -> Result<SessionEngine, SessionError> {
        let dataset = self.storage.words.load_words()?;
        let history = if policy.needs_history() {
            self.storage.performance.load_performance_records()?
        } else {
            Vec::new()
        };

        let subset = SubsetSelector::new(policy).select(dataset, &history)?;
        tracing::info!(?policy, words = subset.len(), "starting revision session");
        Ok(SessionEngine::new(subset, self.config.rng()))
    }

    /// Resume the session saved under `name`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the checkpoint is missing or corrupt.
    pub fn resume_session(&self, name: &str) -> Result<SessionEngine, SessionError> {
        let state = self.storage.checkpoints.load_checkpoint(name)?;
        tracing::info!(
            checkpoint = name,
            remaining = state.remaining().len(),
            "resuming revision session"
        );
        Ok(SessionEngine::resumed(state, name, self.config.rng()))
    }

    /// Run the interactive loop until the session completes or the user stops.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Console` on terminal failures,
    /// `SessionError::InvalidChoice` for an unusable checkpoint selection, and
    /// `SessionError::Storage` if the checkpoint or performance record cannot
    /// be written.
    pub fn run<R, C>(
        &self,
        mut engine: SessionEngine<R>,
        console: &mut C,
    ) -> Result<SessionOutcome, SessionError>
    where
        R: Rng,
        C: SessionConsole + ?Sized,
    {
        while let Some(presented) = engine.present()? {
            console.show(SessionEvent::Presented(&presented))?;

            let waited = console.await_signal(self.config.reveal_timeout())?;
            let reveal = engine.resolve_reveal(waited)?;
            if reveal == RevealOutcome::TimedOut {
                console.show(SessionEvent::TimedOut)?;
            }
            console.show(SessionEvent::Revealed(&presented.entry))?;

            if reveal == RevealOutcome::AwaitingGrade {
                let answer = console.ask(Prompt::Grade)?;
                engine.grade(Grade::from_answer(&answer))?;
            }

            if is_deny(&console.ask(Prompt::ShowNext)?) {
                engine.stop()?;
                return self.checkpoint(engine, console);
            }
        }

        self.complete(engine, console)
    }

    fn checkpoint<R, C>(
        &self,
        engine: SessionEngine<R>,
        console: &mut C,
    ) -> Result<SessionOutcome, SessionError>
    where
        R: Rng,
        C: SessionConsole + ?Sized,
    {
        let attempted = engine.state().attempted_count();
        if is_deny(&console.ask(Prompt::SaveProgress)?) {
            tracing::info!(attempted, "session discarded");
            console.show(SessionEvent::Discarded { attempted })?;
            return Ok(SessionOutcome::Discarded { attempted });
        }

        let existing = self.checkpoints()?;
        let name = if existing.is_empty() || is_deny(&console.ask(Prompt::UseExistingCheckpoint)?)
        {
            let raw = console.ask(Prompt::CheckpointName)?;
            let name = raw.trim();
            if name.is_empty() {
                return Err(SessionError::InvalidChoice(raw));
            }
            name.to_owned()
        } else {
            let raw = console.ask(Prompt::ChooseCheckpoint(&existing))?;
            raw.trim()
                .parse::<usize>()
                .ok()
                .and_then(|i| existing.get(i).cloned())
                .ok_or(SessionError::InvalidChoice(raw))?
        };

        self.storage
            .checkpoints
            .save_checkpoint(&name, engine.state())?;
        console.show(SessionEvent::CheckpointSaved {
            name: &name,
            attempted,
        })?;
        Ok(SessionOutcome::Checkpointed { name, attempted })
    }

    fn complete<R, C>(
        &self,
        engine: SessionEngine<R>,
        console: &mut C,
    ) -> Result<SessionOutcome, SessionError>
    where
        R: Rng,
        C: SessionConsole + ?Sized,
    {
        let resumed_from = engine.resumed_from().map(str::to_owned);
        let state = engine.into_state();
        let attempted = state.attempted_count();
        let (correct_words, incorrect_words) = state.into_results();

        let record = PerformanceRecord::new(self.clock.now(), correct_words, incorrect_words);
        let record_name = self.storage.performance.save_performance(&record)?;

        if let Some(checkpoint) = resumed_from
            && let Err(err) = self.storage.checkpoints.delete_checkpoint(&checkpoint)
        {
            tracing::warn!(checkpoint = %checkpoint, error = %err, "could not remove finished checkpoint");
        }

        let summary = RevisionSummary {
            record_name,
            attempted,
            correct_words: record.correct_words,
            incorrect_words: record.incorrect_words,
        };
        console.show(SessionEvent::Completed(&summary))?;
        Ok(SessionOutcome::Completed(summary))
    }
}
