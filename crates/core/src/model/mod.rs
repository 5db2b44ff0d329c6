mod grade;
mod performance;
mod selection;
mod session;
mod word;

pub use grade::{Grade, is_deny};
pub use performance::{PerformanceRecord, collect_mistakes, is_null_cell};
pub use selection::SelectionPolicy;
pub use session::{SessionState, SessionStateError};
pub use word::WordEntry;
