#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod selection;
pub mod sessions;

pub use revise_core::Clock;
pub use sessions as session;

pub use config::SessionConfig;
pub use error::{SelectionError, SessionError};
pub use selection::SubsetSelector;

pub use sessions::{
    Presented, Prompt, RevealOutcome, RevealSignal, RevisionService, RevisionSummary,
    SessionConsole, SessionEngine, SessionEvent, SessionOutcome, SessionPhase, SessionProgress,
    WaitOutcome,
};
