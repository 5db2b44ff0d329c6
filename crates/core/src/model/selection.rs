/// Which part of the dataset a session revises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Every word in the dataset.
    All,
    /// Nothing; the caller should not start a session.
    None,
    /// Words sharing the date and session of the last dataset row.
    LastSession,
    /// Words from the last `n` distinct dates, in order of appearance.
    LastNDays(i64),
    /// Words whose first letter matches, ignoring case.
    ByFirstCharacter(Option<char>),
    /// Words previously graded incorrect in any performance record.
    FromMistakes,
}

impl SelectionPolicy {
    /// Returns true if the policy needs the performance history to select words.
    #[must_use]
    pub fn needs_history(&self) -> bool {
        matches!(self, Self::FromMistakes)
    }
}
