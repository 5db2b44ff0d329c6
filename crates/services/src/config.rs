use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Default time a word stays on screen before its answer is revealed automatically.
pub const DEFAULT_REVEAL_TIMEOUT: Duration = Duration::from_secs(15);

/// Tunables for a revision session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    reveal_timeout: Duration,
    seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reveal_timeout: DEFAULT_REVEAL_TIMEOUT,
            seed: None,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_reveal_timeout(mut self, timeout: Duration) -> Self {
        self.reveal_timeout = timeout;
        self
    }

    /// Fix the word-draw order. Without a seed the draw uses OS entropy.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn reveal_timeout(&self) -> Duration {
        self.reveal_timeout
    }

    /// Random source for drawing words.
    #[must_use]
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
