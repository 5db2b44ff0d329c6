/// Aggregated view of session progress, useful for the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    /// 1-based position of the word being shown (`attempted + 1`).
    pub number: usize,
    /// Size of the subset the session started with.
    pub total: usize,
    pub attempted: usize,
    pub remaining: usize,
}
