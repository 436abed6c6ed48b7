use std::fmt::Display;

use crate::{GuessFeedback, Result, Strategy, StrategyError, Word};

/// Plays a fixed list of guesses, one per round, and fails once it runs out.
#[derive(Debug, Clone)]
pub(crate) struct Mock {
    guesses: Vec<&'static str>,
    next: usize,
}

impl Mock {
    pub(crate) fn new(guesses: &[&'static str]) -> Self {
        Self {
            guesses: guesses.to_vec(),
            next: 0,
        }
    }
}

impl Default for Mock {
    fn default() -> Self {
        Self::new(&["nerds", "tithe", "doubt", "point", "parka", "sword"])
    }
}

impl Strategy for Mock {
    fn reset(&mut self) {
        self.next = 0;
    }

    fn pick_next_guess(&mut self, feedback: &GuessFeedback) -> Result<Word> {
        if !feedback.is_valid() {
            return Err(StrategyError::InvalidFeedback.into());
        }

        let guess = self
            .guesses
            .get(self.next)
            .ok_or(StrategyError::NoCandidates)?;
        self.next += 1;
        Word::from_str(guess)
    }

    fn version(&self) -> &'static str {
        "1.2.4"
    }
}

impl Display for Mock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mock {:?}", self.guesses)
    }
}
