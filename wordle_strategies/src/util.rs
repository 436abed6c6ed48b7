//! Building blocks for strategies that narrow down a set of candidates.

use itertools::Itertools;
use log::debug;
use wordle_bench::{
    strategy::{Grade, Round, Word, WORD_LENGTH},
    Dictionary, Result, StrategyError,
};

const A_ASCII: usize = 0x61;

fn index(letter: u8) -> usize {
    letter as usize - A_ASCII
}

/// Returns true if `word` could still be the answer after `guess` was graded
/// `grades`.
///
/// Each position is tested on its own:
///
/// - [`Grade::Correct`]: `word` has the guessed letter at that position.
/// - [`Grade::Misplaced`]: `word` has the guessed letter, but not at that
///   position.
/// - [`Grade::Unused`]: if the same letter is graded `Correct` or
///   `Misplaced` somewhere else in the guess, this position says nothing.
///   Otherwise `word` must not contain the letter at all.
///
/// Letter counts are not tracked beyond that, so a guess with more copies of
/// a letter than the answer can leave some words in that a count-aware
/// filter would drop.
pub fn is_consistent(word: &Word, guess: &Word, grades: &[Grade; WORD_LENGTH]) -> bool {
    let word_letters = word.letters();
    let guess_letters = guess.letters();

    for (i, (&g, grade)) in guess_letters.iter().zip(grades.iter()).enumerate() {
        match grade {
            Grade::Correct => {
                if word_letters[i] != g {
                    return false;
                }
            }
            Grade::Misplaced => {
                if word_letters[i] == g || !word.contains_letter(g) {
                    return false;
                }
            }
            Grade::Unused => {
                let elsewhere = guess_letters
                    .iter()
                    .zip(grades.iter())
                    .enumerate()
                    .any(|(j, (&other, &grade))| {
                        j != i && other == g && grade != Grade::Unused
                    });
                if !elsewhere && word.contains_letter(g) {
                    return false;
                }
            }
        }
    }

    true
}

/// Returns true if `word` is consistent with every round in `rounds`.
pub fn consistent_with_all(word: &Word, rounds: &[Round]) -> bool {
    rounds
        .iter()
        .all(|round| is_consistent(word, &round.guess, &round.grades))
}

/// Counts, for each letter, how many of `words` contain it at least once.
///
/// Index 0 is `a` and index 25 is `z`.
pub fn letter_presence<'a>(words: impl IntoIterator<Item = &'a Word>) -> [u32; 26] {
    let mut table = [0; 26];

    words
        .into_iter()
        .flat_map(|word| word.letters().iter().unique())
        .for_each(|&c| table[index(c)] += 1);

    table
}

/// Sums the `table` entries of every distinct letter in `word`.
pub fn score(word: &Word, table: &[u32; 26]) -> u32 {
    word.letters().iter().unique().map(|&c| table[index(c)]).sum()
}

/// The words still consistent with every piece of feedback in a game.
///
/// A set starts empty. [`reset()`](CandidateSet::reset()) fills it with the
/// whole dictionary, and from then on it can only shrink.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CandidateSet {
    words: Vec<Word>,
}

impl CandidateSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents with every word in `dictionary`.
    pub fn reset(&mut self, dictionary: &Dictionary) {
        self.words = dictionary.to_vec();
    }

    /// Keeps only the candidates consistent with `guess` graded `grades`.
    ///
    /// Returns how many candidates were dropped. Fails with
    /// [`StrategyError::NoCandidates`] if none are left; the set stays empty
    /// afterwards.
    pub fn prune(&mut self, guess: &Word, grades: &[Grade; WORD_LENGTH]) -> Result<usize> {
        let before = self.words.len();
        self.words = self
            .words
            .iter()
            .filter(|word| is_consistent(word, guess, grades))
            .copied()
            .collect();

        let dropped = before - self.words.len();
        debug!(
            "{} {:?} kept {} of {} candidates",
            guess,
            grades,
            self.words.len(),
            before
        );

        if self.words.is_empty() {
            return Err(StrategyError::NoCandidates.into());
        }

        Ok(dropped)
    }

    /// Removes `word`, returning whether it was a candidate.
    pub fn remove(&mut self, word: &Word) -> bool {
        match self.words.binary_search(word) {
            Ok(i) => {
                self.words.remove(i);
                true
            }
            Err(_) => false,
        }
    }

    /// Returns true if `word` is still a candidate.
    pub fn contains(&self, word: &Word) -> bool {
        self.words.binary_search(word).is_ok()
    }

    /// The number of candidates left.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if no candidates are left.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterates over the candidates in dictionary order.
    pub fn iter(&self) -> impl Iterator<Item = &Word> {
        self.words.iter()
    }

    /// The candidates in dictionary order.
    pub fn as_slice(&self) -> &[Word] {
        &self.words
    }
}
