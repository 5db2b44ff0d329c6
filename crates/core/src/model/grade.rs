//
// ─── GRADE ────────────────────────────────────────────────────────────────────
//

/// Outcome of a single word in a revision session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    /// The user recalled the word.
    Correct,
    /// The user denied recalling it, or the reveal timed out.
    Incorrect,
}

impl Grade {
    /// Interprets a free-text grading answer.
    ///
    /// Only the deny answer (`N`, any case) fails; anything else, including an
    /// empty line, counts as correct.
    #[must_use]
    pub fn from_answer(answer: &str) -> Self {
        if is_deny(answer) {
            Self::Incorrect
        } else {
            Self::Correct
        }
    }
}

/// Returns true if the answer is the deny signal: a single `n` or `N`.
#[must_use]
pub fn is_deny(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("n")
}
