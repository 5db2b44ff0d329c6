use std::collections::{BTreeSet, HashSet};

use revise_core::model::{PerformanceRecord, SelectionPolicy, WordEntry, collect_mistakes};

use crate::error::SelectionError;

/// Builds the working subset of a session from the dataset.
///
/// Selection is pure: it never touches storage. Callers supply the performance
/// history when the policy needs it (see [`SelectionPolicy::needs_history`]).
#[derive(Debug, Clone, Copy)]
pub struct SubsetSelector {
    policy: SelectionPolicy,
}

impl SubsetSelector {
    #[must_use]
    pub fn new(policy: SelectionPolicy) -> Self {
        Self { policy }
    }

    /// Select the words to revise. Dataset order is preserved.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError` when `LastNDays` is given a non-positive or
    /// too-large `n`, or `ByFirstCharacter` is given no character.
    pub fn select(
        &self,
        dataset: Vec<WordEntry>,
        history: &[PerformanceRecord],
    ) -> Result<Vec<WordEntry>, SelectionError> {
        let selected = match self.policy {
            SelectionPolicy::All => dataset,
            SelectionPolicy::None => Vec::new(),
            SelectionPolicy::LastSession => last_session(dataset),
            SelectionPolicy::LastNDays(n) => last_n_days(dataset, n)?,
            SelectionPolicy::ByFirstCharacter(ch) => {
                let ch = ch.ok_or(SelectionError::MissingCharacter)?;
                dataset
                    .into_iter()
                    .filter(|w| w.starts_with_ignore_case(ch))
                    .collect()
            }
            SelectionPolicy::FromMistakes => from_mistakes(dataset, history),
        };

        tracing::debug!(policy = ?self.policy, selected = selected.len(), "subset selected");
        Ok(selected)
    }
}

/// The last row's (date, session) pair marks the latest session.
fn last_session(dataset: Vec<WordEntry>) -> Vec<WordEntry> {
    let Some(last) = dataset.last() else {
        return Vec::new();
    };
    let (date, session) = (last.date.clone(), last.session.clone());
    dataset
        .into_iter()
        .filter(|w| w.is_in_slot(&date, &session))
        .collect()
}

/// Dates count in order of first appearance, not calendar order.
fn last_n_days(dataset: Vec<WordEntry>, n: i64) -> Result<Vec<WordEntry>, SelectionError> {
    if n <= 0 {
        return Err(SelectionError::NonPositiveDays(n));
    }

    let mut seen = HashSet::new();
    let distinct: Vec<&str> = dataset
        .iter()
        .map(|w| w.date.as_str())
        .filter(|d| seen.insert(*d))
        .collect();

    let requested = usize::try_from(n).unwrap_or(usize::MAX);
    if requested > distinct.len() {
        return Err(SelectionError::TooManyDays {
            requested: n,
            available: distinct.len(),
        });
    }

    let wanted: HashSet<String> = distinct[distinct.len() - requested..]
        .iter()
        .map(|d| (*d).to_owned())
        .collect();
    Ok(dataset
        .into_iter()
        .filter(|w| wanted.contains(&w.date))
        .collect())
}

fn from_mistakes(dataset: Vec<WordEntry>, history: &[PerformanceRecord]) -> Vec<WordEntry> {
    let mistakes: BTreeSet<String> = collect_mistakes(history);
    if mistakes.is_empty() {
        return Vec::new();
    }
    dataset
        .into_iter()
        .filter(|w| mistakes.contains(&w.word))
        .collect()
}
