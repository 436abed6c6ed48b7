use std::{cmp::Reverse, fmt::Display, sync::Arc};

use log::{debug, trace};
use wordle_bench::{
    strategy::{Strategy, Word},
    ConfigError, Dictionary, GuessFeedback, Result, StrategyError,
};

use crate::util::{letter_presence, score, CandidateSet};

/// The word [`Greedy`] opens with unless told otherwise.
pub const OPENING_WORD: &str = "raise";

/// A Wordle strategy that guesses the candidate sharing the most letters
/// with the other candidates.
///
/// `Greedy` keeps every dictionary word that is still consistent with the
/// feedback it has seen. To pick a guess, it counts how many candidates
/// contain each letter and scores every candidate by adding up those counts
/// over its distinct letters. The highest score wins, and ties go to the
/// alphabetically first word. The guess is then dropped from the candidates.
///
/// The first guess of every game is a fixed opening word.
///
/// # Examples
///
/// ```rust
/// # use std::sync::Arc;
/// use wordle_bench::{Dictionary, GuessFeedback, Strategy};
/// use wordle_strategies::Greedy;
///
/// let dictionary = Arc::new(Dictionary::from_words(["raise", "crane", "slate"]));
/// let mut greedy = Greedy::new(dictionary)?;
/// greedy.reset();
///
/// let guess = greedy.pick_next_guess(&GuessFeedback::start())?;
/// assert_eq!(&*guess, "raise");
/// #
/// # Ok::<_, wordle_bench::WordleError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Greedy {
    dictionary: Arc<Dictionary>,
    candidates: CandidateSet,
    opening: Word,
}

impl Greedy {
    /// Creates a strategy that plays from `dictionary`, opening with
    /// [`OPENING_WORD`].
    ///
    /// Fails if the opening word is not in `dictionary`. The candidate set
    /// starts empty until [`reset()`](Strategy::reset()) is called.
    pub fn new(dictionary: Arc<Dictionary>) -> Result<Self> {
        let opening = Word::from_str(OPENING_WORD)?;
        Self::with_opening_word(dictionary, opening)
    }

    /// Replaces the opening word.
    ///
    /// Fails if `word` is not in the dictionary.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::sync::Arc;
    /// use wordle_bench::{Dictionary, Word};
    /// use wordle_strategies::Greedy;
    ///
    /// let dictionary = Arc::new(Dictionary::from_words(["raise", "crane"]));
    /// let greedy = Greedy::new(dictionary.clone())?.opening_word(Word::from_str("crane")?)?;
    /// assert!(Greedy::new(dictionary)?.opening_word(Word::from_str("slate")?).is_err());
    /// #
    /// # Ok::<_, wordle_bench::WordleError>(())
    /// ```
    pub fn opening_word(self, word: Word) -> Result<Self> {
        Self::with_opening_word(self.dictionary, word)
    }

    /// Creates a strategy that opens with `opening`, for dictionaries that
    /// do not contain [`OPENING_WORD`].
    ///
    /// Fails if `opening` is not in `dictionary`.
    pub fn with_opening_word(dictionary: Arc<Dictionary>, opening: Word) -> Result<Self> {
        if !dictionary.contains(&opening) {
            return Err(ConfigError::OpeningNotInDictionary(opening).into());
        }

        Ok(Greedy {
            dictionary,
            candidates: CandidateSet::new(),
            opening,
        })
    }

    /// The words this strategy still considers possible answers.
    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    fn best_candidate(&self) -> Result<Word> {
        let table = letter_presence(self.candidates.iter());
        let best = self
            .candidates
            .iter()
            .map(|word| (score(word, &table), *word))
            .inspect(|(score, word)| trace!("{} scores {}", word, score))
            .max_by_key(|&(score, word)| (score, Reverse(word)))
            .map(|(_, word)| word)
            .ok_or(StrategyError::NoCandidates)?;

        Ok(best)
    }
}

impl Strategy for Greedy {
    fn reset(&mut self) {
        self.candidates.reset(&self.dictionary);
    }

    fn pick_next_guess(&mut self, feedback: &GuessFeedback) -> Result<Word> {
        if !feedback.is_valid() {
            return Err(StrategyError::InvalidFeedback.into());
        }

        if feedback.is_first() {
            self.candidates.remove(&self.opening);
            return Ok(self.opening);
        }

        let round = feedback.round().ok_or(StrategyError::InvalidFeedback)?;
        self.candidates.prune(&round.guess, &round.grades)?;

        let guess = self.best_candidate()?;
        self.candidates.remove(&guess);
        debug!(
            "guessing {} with {} candidates left",
            guess,
            self.candidates.len()
        );

        Ok(guess)
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }
}

impl Display for Greedy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "wordle_strategies::Greedy (start: {})", self.opening)
    }
}
