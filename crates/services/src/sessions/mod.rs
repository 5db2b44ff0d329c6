mod console;
mod engine;
mod progress;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use console::{Prompt, RevealSignal, SessionConsole, SessionEvent, WaitOutcome};
pub use engine::{Presented, RevealOutcome, SessionEngine, SessionPhase};
pub use progress::SessionProgress;
pub use workflow::{RevisionService, RevisionSummary, SessionOutcome};
