//! The seam between the session loop and the terminal.

use std::io;
use std::time::Duration;

use revise_core::model::WordEntry;

use super::engine::Presented;
use super::workflow::RevisionSummary;

/// How a bounded wait for the reveal signal ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Signaled,
    TimedOut,
}

/// A cancellable timed wait for the user's "show answer" signal.
///
/// Implementations must return once `timeout` elapses even if no input
/// arrives; a blocking line read does not qualify.
pub trait RevealSignal {
    /// Wait up to `timeout` for the signal.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the input source fails or the user aborts.
    fn await_signal(&mut self, timeout: Duration) -> io::Result<WaitOutcome>;
}

/// Questions the session loop asks. Answers are free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt<'a> {
    /// "Did you get it right?" Only `N` fails.
    Grade,
    /// "Show next?" `N` stops the session.
    ShowNext,
    /// "Do you wish to save?" `N` discards the session.
    SaveProgress,
    /// "Use existing checkpoint?" `N` asks for a new name.
    UseExistingCheckpoint,
    /// Name for a new checkpoint.
    CheckpointName,
    /// Index into the listed checkpoints.
    ChooseCheckpoint(&'a [String]),
}

/// Things the session loop wants shown to the user.
#[derive(Debug, Clone, Copy)]
pub enum SessionEvent<'a> {
    Presented(&'a Presented),
    TimedOut,
    Revealed(&'a WordEntry),
    CheckpointSaved { name: &'a str, attempted: u32 },
    Discarded { attempted: u32 },
    Completed(&'a RevisionSummary),
}

/// Everything the session loop needs from the user interface.
pub trait SessionConsole: RevealSignal {
    /// Display an event.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the output cannot be written.
    fn show(&mut self, event: SessionEvent<'_>) -> io::Result<()>;

    /// Ask a question and return the raw answer.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the input cannot be read.
    fn ask(&mut self, prompt: Prompt<'_>) -> io::Result<String>;
}
