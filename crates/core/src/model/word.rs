use serde::{Deserialize, Serialize};

/// One row of the vocabulary dataset.
///
/// Every field is kept as text. `date` and `session` are opaque labels that
/// are only ever compared for equality, never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordEntry {
    pub date: String,
    pub session: String,
    pub word: String,
    pub meaning: String,
    pub synonym_1: String,
    pub synonym_2: String,
    pub sentence_1: String,
    pub sentence_2: String,
}

impl WordEntry {
    /// Returns true if the word starts with `ch`, ignoring case.
    #[must_use]
    pub fn starts_with_ignore_case(&self, ch: char) -> bool {
        let Some(first) = self.word.chars().next() else {
            return false;
        };
        first == ch || first.to_lowercase().eq(ch.to_lowercase())
    }

    /// Returns true if this entry was recorded in the given date/session slot.
    #[must_use]
    pub fn is_in_slot(&self, date: &str, session: &str) -> bool {
        self.date == date && self.session == session
    }
}

#[cfg(test)]
pub(crate) fn entry(word: &str, date: &str, session: &str) -> WordEntry {
    WordEntry {
        date: date.to_owned(),
        session: session.to_owned(),
        word: word.to_owned(),
        meaning: format!("meaning of {word}"),
        synonym_1: String::new(),
        synonym_2: String::new(),
        sentence_1: String::new(),
        sentence_2: String::new(),
    }
}
