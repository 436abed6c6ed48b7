#![doc = include_str!("../README.md")]

// Required to rename serde
#[cfg(feature = "serde")]
extern crate serde_crate as serde;

use std::path::PathBuf;

use thiserror::Error;

pub mod strategy;
pub use strategy::{GuessFeedback, Strategy, Word};

pub mod words;
pub use words::Dictionary;

pub mod harness;
pub use harness::Harness;

pub mod perf;
pub use perf::{Perf, Summary};

#[cfg(test)]
mod mock;

/// Shorthand for results whose error defaults to [`WordleError`].
pub type Result<T, E = WordleError> = std::result::Result<T, E>;

/// The errors that `wordle_bench` can produce.
#[derive(Debug, Error)]
pub enum WordleError {
    #[error("configuration error")]
    Config {
        #[from]
        kind: ConfigError,
    },

    #[error("puzzle encountered error")]
    Puzzle {
        #[from]
        kind: PuzzleError,
    },

    #[error("strategy encountered error")]
    Strategy {
        #[from]
        kind: StrategyError,
    },

    #[error("the test harness encountered an error")]
    Harness {
        #[from]
        kind: HarnessError,
    },

    #[error("general IO error")]
    Printing(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("trouble serializing a summary")]
    Serde(#[from] serde_json::Error),
}

/// Problems with the inputs needed before any game can start.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The word list file could not be opened or read.
    #[error("could not read the word list at {}", .path.display())]
    WordList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The word list contained no usable five letter words.
    #[error("the word list at {} has no five letter words", .0.display())]
    EmptyWordList(PathBuf),

    /// A strategy was configured with an opening word it could never play.
    #[error("the opening word \"{0}\" is not in the dictionary")]
    OpeningNotInDictionary(Word),
}

#[derive(Debug, Error)]
pub enum PuzzleError {
    /// The string provided is not five lowercase ascii letters.
    #[error("\"{0}\" is not a five letter lowercase word")]
    InvalidWord(String),

    /// The string provided when constructing a Wordle word is not in the
    /// dictionary in use.
    #[error("the string \"{0}\" is not in the wordlist")]
    NotInWordlist(String),

    /// The puzzle has already evaluated every guess it allows.
    #[error("the puzzle has no guesses left")]
    OutOfGuesses,
}

/// Failures raised by a [`Strategy`] while picking a guess.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StrategyError {
    /// The feedback passed in was marked invalid by the puzzle.
    ///
    /// Callers must never hand invalid feedback to a strategy, so this is a
    /// logic error on their side.
    #[error("the strategy was given invalid feedback")]
    InvalidFeedback,

    /// No word in the dictionary is consistent with the feedback so far.
    ///
    /// Either the answer is missing from the dictionary or the feedback
    /// could not have come from any dictionary word.
    #[error("no candidate words remain")]
    NoCandidates,
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("no strategies have been added to the harness")]
    NoStrategiesAdded,

    #[error("the harness has no answers to test against")]
    NoAnswers,
}
