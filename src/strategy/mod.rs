//! Tools for defining Wordle strategies.

use std::{
    convert::TryFrom,
    fmt::{Debug, Display},
    ops::Deref,
    sync::Arc,
};

use itertools::Itertools;
use log::{trace, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{words::Dictionary, PuzzleError, Result, WordleError};

/// The number of letters in every Wordle word.
pub const WORD_LENGTH: usize = 5;

/// The number of guesses a [`Puzzle`] allows unless configured otherwise.
pub const DEFAULT_MAX_GUESSES: usize = 6;

/// A Wordle word.
///
/// This struct represents five lowercase ascii letters, and its construction
/// is validated to ensure that every instance is a well-formed word. Words
/// are ordered alphabetically.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", try_from = "String", into = "String")
)]
pub struct Word {
    letters: [u8; WORD_LENGTH],
}

impl Word {
    /// Creates a new [`Word`] from a five letter string.
    ///
    /// Returns an error if the string provided is not exactly five lowercase
    /// ascii letters. This does not check membership in any dictionary.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::ops::Deref;
    /// # use wordle_bench::strategy::Word;
    /// #
    /// let pints = Word::from_str("pints")?;
    /// assert_eq!(pints.deref(), "pints");
    ///
    /// assert!(Word::from_str("Pints").is_err());
    /// assert!(Word::from_str("pint").is_err());
    /// #
    /// # Ok::<_, wordle_bench::WordleError>(())
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(word: &str) -> Result<Self> {
        let bytes = word.as_bytes();
        if bytes.len() != WORD_LENGTH || !bytes.iter().all(|b| b.is_ascii_lowercase()) {
            return Err(PuzzleError::InvalidWord(word.to_string()).into());
        }

        let mut letters = [0; WORD_LENGTH];
        letters.copy_from_slice(bytes);
        Ok(Word { letters })
    }

    /// The letters of the word as ascii bytes.
    pub fn letters(&self) -> &[u8; WORD_LENGTH] {
        &self.letters
    }

    /// Returns true if `letter` appears anywhere in the word.
    pub fn contains_letter(&self, letter: u8) -> bool {
        self.letters.contains(&letter)
    }
}

impl Deref for Word {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        match std::str::from_utf8(&self.letters) {
            Ok(s) => s,
            Err(_) => unreachable!("words only hold ascii letters"),
        }
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.deref())
    }
}

impl Debug for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Word({})", self.deref())
    }
}

impl TryFrom<String> for Word {
    type Error = WordleError;

    fn try_from(value: String) -> Result<Self> {
        Word::from_str(&value)
    }
}

impl From<Word> for String {
    fn from(word: Word) -> Self {
        word.to_string()
    }
}

/// A Wordle "grade" that indicates the correctness of a letter in a guess.
///
/// The [`Puzzle::check()`] function returns an array of five of these, one
/// corresponding to each letter in the guess. `Correct` means that the letter
/// is in the correct position. `Misplaced` means that the letter is in the
/// word, but not in that position. `Unused` means that no copy of the letter
/// is left over for this position once the other positions are accounted
/// for, which is not the same as the letter being absent from the answer.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum Grade {
    /// The letter guessed is in the correct position.
    Correct,

    /// The letter guessed is in the word, but not there.
    Misplaced,

    /// The letter guessed has no copy left in the word for this position.
    Unused,
}

/// One graded guess: the word that was played and the grade of each letter.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct Round {
    pub guess: Word,
    pub grades: [Grade; WORD_LENGTH],
}

impl Round {
    /// Returns true if every letter was graded [`Grade::Correct`].
    pub fn is_win(&self) -> bool {
        self.grades.iter().all(|&g| g == Grade::Correct)
    }
}

/// What a strategy learns after each guess.
///
/// A [`Puzzle`] produces one of these every time it is asked to grade a
/// guess through [`Puzzle::respond()`]. At the start of a game the driver
/// passes [`GuessFeedback::start()`], which has no graded round and an empty
/// history.
///
/// Feedback can be marked invalid when the puzzle refused to grade a guess.
/// Strategies must reject invalid feedback instead of acting on it.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct GuessFeedback {
    round: Option<Round>,
    history: Vec<Word>,
    valid: bool,
}

impl GuessFeedback {
    /// The feedback handed to a strategy before its first guess.
    pub fn start() -> Self {
        GuessFeedback {
            round: None,
            history: Vec::new(),
            valid: true,
        }
    }

    /// Feedback for a guess that was graded, with every guess made so far.
    pub fn graded(guess: Word, grades: [Grade; WORD_LENGTH], history: Vec<Word>) -> Self {
        GuessFeedback {
            round: Some(Round { guess, grades }),
            history,
            valid: true,
        }
    }

    /// Feedback for a guess the puzzle refused to grade.
    pub fn invalid(history: Vec<Word>) -> Self {
        GuessFeedback {
            round: None,
            history,
            valid: false,
        }
    }

    /// The most recent graded guess, if there is one.
    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Every guess made so far this game, in order.
    pub fn history(&self) -> &[Word] {
        &self.history
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns true if no guess has been made yet this game.
    pub fn is_first(&self) -> bool {
        self.history.is_empty()
    }
}

/// A specific Wordle puzzle to solve.
///
/// The puzzle holds the secret answer and grades guesses against it. It only
/// accepts guesses that are in its dictionary, and only as many as its
/// guess budget allows.
///
/// # Examples
///
/// ```rust
/// # use std::sync::Arc;
/// use wordle_bench::{Dictionary, strategy::{Puzzle, Word, Grade::*}};
///
/// let dictionary = Arc::new(Dictionary::from_words(["earth", "ratio", "trick"]));
/// let mut puzzle = Puzzle::new(Word::from_str("earth")?, dictionary);
///
/// let (grades, correct) = puzzle.check(&Word::from_str("ratio")?)?;
/// assert!(!correct);
/// assert_eq!(grades, [Misplaced, Correct, Misplaced, Unused, Unused]);
/// assert_eq!(puzzle.attempts().inner().len(), 1);
/// #
/// # Ok::<_, wordle_bench::WordleError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Puzzle {
    word: Word,
    dictionary: Arc<Dictionary>,
    attempts: Attempts,
    max_guesses: usize,
}

impl Puzzle {
    /// Creates a new puzzle from a [`Word`] and the dictionary guesses must
    /// come from.
    pub fn new(word: Word, dictionary: Arc<Dictionary>) -> Self {
        Puzzle {
            word,
            dictionary,
            attempts: Attempts::new(),
            max_guesses: DEFAULT_MAX_GUESSES,
        }
    }

    /// Sets how many guesses the puzzle will grade.
    pub fn max_guesses(self, max_guesses: usize) -> Self {
        Puzzle {
            max_guesses,
            ..self
        }
    }

    /// The secret answer.
    pub fn answer(&self) -> Word {
        self.word
    }

    /// Checks if a guess is correct and returns partial information.
    ///
    /// This function checks `guess` against the puzzle word and returns a
    /// tuple containing five [`Grade`]s and a [`bool`]. The bool denotes
    /// whether or not the guess is correct, and the grades say how correct
    /// each letter in the guess is, in order.
    ///
    /// In the case that a guess contains two or more of the same letter,
    /// the following is true:
    ///
    /// 1. The function will return [`Grade::Correct`] for all of those letters
    ///    in the correct position.
    /// 2. The function will not return more copies of [`Grade::Correct`] and
    ///    [`Grade::Misplaced`] together than the copies of that letter in the
    ///    answer, handing out misplaced grades from left to right. For
    ///    instance, if the answer is `sober` and you guess `spool`, this
    ///    function will provide [`Grade::Misplaced`] for the first `o` and
    ///    [`Grade::Unused`] for the second.
    ///
    /// A graded guess is recorded in [`attempts()`](Puzzle::attempts()).
    /// Guesses outside the dictionary, or beyond the guess budget, are
    /// refused with an error and not recorded.
    pub fn check(&mut self, guess: &Word) -> Result<([Grade; WORD_LENGTH], bool)> {
        if !self.dictionary.contains(guess) {
            return Err(PuzzleError::NotInWordlist(guess.to_string()).into());
        }

        if self.attempts.len() >= self.max_guesses {
            return Err(PuzzleError::OutOfGuesses.into());
        }

        self.attempts.push(*guess);
        Ok(grade(&self.word, guess))
    }

    /// Grades `guess` and packages the outcome as [`GuessFeedback`].
    ///
    /// When [`check()`](Puzzle::check()) refuses the guess, the returned
    /// feedback is marked invalid.
    pub fn respond(&mut self, guess: Word) -> GuessFeedback {
        match self.check(&guess) {
            Ok((grades, _)) => {
                trace!("{} graded {:?} against {}", guess, grades, self.word);
                GuessFeedback::graded(guess, grades, self.attempts.inner().to_vec())
            }
            Err(e) => {
                warn!("puzzle {} refused guess {}: {}", self.word, guess, e);
                GuessFeedback::invalid(self.attempts.inner().to_vec())
            }
        }
    }

    /// The guesses graded so far.
    pub fn attempts(&self) -> &Attempts {
        &self.attempts
    }

    /// Consumes the puzzle and hands back its guesses.
    pub fn into_attempts(self) -> Attempts {
        self.attempts
    }

    /// Returns true if the last graded guess was the answer.
    pub fn solved(&self) -> bool {
        self.attempts.solved(&self.word)
    }

    /// Returns true if the puzzle is solved or cannot grade more guesses.
    pub fn finished(&self) -> bool {
        self.solved() || self.attempts.len() >= self.max_guesses
    }
}

/// Grades `guess` against `answer` with the standard Wordle rules.
pub fn grade(answer: &Word, guess: &Word) -> ([Grade; WORD_LENGTH], bool) {
    use std::cmp::Ordering;

    let mut used = Vec::with_capacity(WORD_LENGTH);
    let mut res = [Grade::Unused; WORD_LENGTH];
    let mut correct = true;

    // go through correct letters first, since those get priority
    for (i, (&guess, &answer_letter)) in guess
        .letters()
        .iter()
        .zip(answer.letters().iter())
        .enumerate()
        .sorted_unstable_by(|&(a_i, (a_guess, a_answer)), &(b_i, (b_guess, b_answer))| {
            let a_correct = a_guess == a_answer;
            let b_correct = b_guess == b_answer;
            match a_correct.cmp(&b_correct).reverse() {
                Ordering::Equal => a_i.cmp(&b_i),
                other => other,
            }
        })
    {
        if guess == answer_letter {
            used.push(guess);
            res[i] = Grade::Correct;
        } else {
            correct = false;
            let in_answer = answer.letters().iter().filter(|&&c| c == guess).count();
            let claimed = used.iter().filter(|&&c| c == guess).count();
            if claimed < in_answer {
                used.push(guess);
                res[i] = Grade::Misplaced;
            }
        }
    }

    (res, correct)
}

/// A collection of attempts to solve a Wordle puzzle.
///
/// A [`Puzzle`] keeps one of these up to date as it grades guesses, so a
/// strategy cannot inflate its performance by misreporting what it played.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Attempts {
    inner: Vec<Word>,
}

impl Attempts {
    /// Creates a new, empty [`Attempts`].
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, word: Word) -> usize {
        self.inner.push(word);
        self.inner.len() - 1
    }

    /// Returns a slice into the underlying data.
    pub fn inner(&self) -> &[Word] {
        self.inner.as_slice()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns true if the last word in this attempt list matches `word`.
    pub fn solved(&self, word: &Word) -> bool {
        matches!(self.inner().last(), Some(s) if s == word)
    }
}

impl Display for Attempts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some((last, rest)) = self.inner.split_last() {
            for word in rest {
                writeln!(f, "{}", word)?;
            }
            write!(f, "{}", last)?;
        }
        Ok(())
    }
}

/// Trait defining a Wordle strategy.
///
/// A strategy is driven one guess at a time. The driver calls
/// [`reset()`](Strategy::reset()) at the start of each game, then
/// [`pick_next_guess()`](Strategy::pick_next_guess()) with
/// [`GuessFeedback::start()`], and after that with whatever the puzzle
/// returned for the previous guess, until the game ends.
///
/// The test harness will use [`Display`] to format the name of the strategy,
/// so do not use linebreaks.
///
/// # Examples
///
/// ```rust
/// use std::fmt::Display;
/// use wordle_bench::{GuessFeedback, Result, Strategy, Word};
///
/// #[derive(Debug)]
/// struct Stubborn;
///
/// impl Display for Stubborn {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "Stubborn")
///     }
/// }
///
/// impl Strategy for Stubborn {
///     fn reset(&mut self) {}
///
///     fn pick_next_guess(&mut self, _feedback: &GuessFeedback) -> Result<Word> {
///         Word::from_str("tithe")
///     }
///
///     fn version(&self) -> &'static str {
///         "0.1.0"
///     }
/// }
/// ```
pub trait Strategy: Display + Debug + Send {
    /// Forgets the previous game and gets ready to play a new one.
    fn reset(&mut self);

    /// Consumes the outcome of the previous guess and returns the next one.
    ///
    /// Implementations must fail with
    /// [`StrategyError::InvalidFeedback`](crate::StrategyError::InvalidFeedback)
    /// when `feedback` is not valid, and must never return a word they know
    /// cannot be the answer when they have run out of candidates.
    fn pick_next_guess(&mut self, feedback: &GuessFeedback) -> Result<Word>;

    /// Provides a version for this strategy.
    ///
    /// You should ensure that this changes each time you update the logic of
    /// the strategy in order to produce meaningful comparisons.
    fn version(&self) -> &'static str;
}

#[cfg(test)]
mod test {
    use proptest::{prop_assert_eq, proptest};

    use super::*;
    use crate::WordleError;

    fn str_to_grades(input: &str) -> [Grade; 5] {
        let mut res = [Grade::Unused; 5];
        for (i, c) in input.chars().enumerate() {
            match c {
                'c' => res[i] = Grade::Correct,
                'm' => res[i] = Grade::Misplaced,
                _ => {}
            }
        }
        res
    }

    fn dictionary() -> Arc<Dictionary> {
        Arc::new(Dictionary::from_words([
            "sober", "spool", "soaks", "tills", "pines", "sills", "spoon", "odors", "crimp",
            "props", "primp", "error", "order", "trier", "lints", "limit", "minis", "bolts",
            "prick", "right", "allay", "tough", "might", "llama", "apple", "allot", "alloy",
            "earth", "ratio", "speed", "creep", "abbey", "kebab", "babes",
        ]))
    }

    macro_rules! puzzle_test {
        (I $answer:expr; $puzzle:ident, $count:ident; $guess:expr, $res:expr) => {{
            let (grades, correct) = $puzzle.check(&Word::from_str($guess)?)?;
            $count += 1;
            assert_eq!($puzzle.attempts().len(), $count);
            assert_eq!(correct, $answer == $guess);
            assert_eq!(grades, str_to_grades($res));
        }};

        ($fn_name:ident[$answer:expr => $( [$guess:expr, $res:expr] );*]) => {
            #[test]
            fn $fn_name() -> Result<(), WordleError> {
                let mut puzzle = Puzzle::new(Word::from_str($answer)?, dictionary());
                let mut count = 0;

                $(puzzle_test!(I $answer; puzzle, count; $guess, $res);)*

                Ok(())
            }
        };
    }

    puzzle_test! { repeat_letter_guesses ["sober" =>
        ["spool", "cumuu"];
        ["soaks", "ccuuu"]]
    }

    puzzle_test! { repeat_letter_guesses_before ["tills" =>
        ["pines", "ucuuc"];
        ["sills", "ucccc"]]
    }

    puzzle_test! { repeat_letter_answer ["spoon" =>
        ["odors", "mucum"]]
    }

    // Grades taken directly from Wordle 218.
    puzzle_test! { wordle_crimp ["crimp" =>
        ["props", "mcuuu"];
        ["primp", "ucccc"];
        ["crimp", "ccccc"]]
    }

    puzzle_test! { wordle_crimp_error_order_trier ["crimp" =>
        ["error", "ucuuu"];
        ["order", "ucuuu"];
        ["trier", "uccuu"];
        ["crimp", "ccccc"]]
    }

    puzzle_test! { wordle_crimp_lints_limit_minis ["crimp" =>
        ["lints", "umuuu"];
        ["limit", "ummuu"];
        ["minis", "mmuuu"];
        ["crimp", "ccccc"]]
    }

    puzzle_test! { misplaced_before_correct ["abbey" =>
        ["babes", "mmccu"];
        ["kebab", "umcmm"]]
    }

    puzzle_test! { both_copies_misplaced ["llama" =>
        ["apple", "muumu"];
        ["allot", "mcmuu"]]
    }

    puzzle_test! { single_copy_misplaced ["allot" =>
        ["apple", "cuumu"];
        ["llama", "mcmuu"]]
    }

    #[test]
    fn refuses_words_outside_dictionary() -> Result<(), WordleError> {
        let mut puzzle = Puzzle::new(Word::from_str("earth")?, dictionary());
        assert!(matches!(
            puzzle.check(&Word::from_str("zzzzz")?),
            Err(WordleError::Puzzle {
                kind: PuzzleError::NotInWordlist(_)
            })
        ));
        assert!(puzzle.attempts().is_empty());
        Ok(())
    }

    #[test]
    fn filling_up() -> Result<(), WordleError> {
        let mut puzzle = Puzzle::new(Word::from_str("right")?, dictionary()).max_guesses(2);
        puzzle.check(&Word::from_str("allay")?)?;
        assert!(!puzzle.finished());
        puzzle.check(&Word::from_str("tough")?)?;
        assert!(puzzle.finished());
        assert!(!puzzle.solved());
        assert!(matches!(
            puzzle.check(&Word::from_str("right")?),
            Err(WordleError::Puzzle {
                kind: PuzzleError::OutOfGuesses
            })
        ));
        assert_eq!(puzzle.attempts().len(), 2);
        Ok(())
    }

    #[test]
    fn respond_builds_feedback() -> Result<(), WordleError> {
        let mut puzzle = Puzzle::new(Word::from_str("allot")?, dictionary());
        let apple = Word::from_str("apple")?;

        let feedback = puzzle.respond(apple);
        assert!(feedback.is_valid());
        assert!(!feedback.is_first());
        assert_eq!(feedback.history(), &[apple]);
        let round = feedback.round().unwrap();
        assert_eq!(round.guess, apple);
        assert_eq!(round.grades, str_to_grades("cuumu"));
        assert!(!round.is_win());

        let feedback = puzzle.respond(Word::from_str("allot")?);
        assert!(feedback.round().unwrap().is_win());
        assert!(puzzle.solved());
        assert!(puzzle.finished());
        Ok(())
    }

    #[test]
    fn respond_marks_refused_guesses_invalid() -> Result<(), WordleError> {
        let mut puzzle = Puzzle::new(Word::from_str("allot")?, dictionary());
        let feedback = puzzle.respond(Word::from_str("qqqqq")?);
        assert!(!feedback.is_valid());
        assert!(feedback.round().is_none());
        assert!(feedback.is_first());
        Ok(())
    }

    #[test]
    fn start_feedback_is_first_and_valid() {
        let feedback = GuessFeedback::start();
        assert!(feedback.is_valid());
        assert!(feedback.is_first());
        assert!(feedback.round().is_none());
    }

    #[test]
    fn word_validation() {
        assert!(Word::from_str("crane").is_ok());
        assert!(Word::from_str("CRANE").is_err());
        assert!(Word::from_str("cranes").is_err());
        assert!(Word::from_str("cr4ne").is_err());
        assert!(Word::from_str("").is_err());
        assert!(Word::from_str("crané").is_err());
    }

    #[test]
    fn words_order_alphabetically() -> Result<(), WordleError> {
        assert!(Word::from_str("allot")? < Word::from_str("alloy")?);
        assert!(Word::from_str("zebra")? > Word::from_str("apple")?);
        Ok(())
    }

    #[cfg(feature = "serde")]
    #[test]
    fn words_serialize_as_strings() -> Result<(), WordleError> {
        let word = Word::from_str("crane")?;
        assert_eq!(serde_json::to_string(&word)?, "\"crane\"");
        let back: Word = serde_json::from_str("\"crane\"")?;
        assert_eq!(back, word);
        assert!(serde_json::from_str::<Word>("\"CRANE\"").is_err());
        Ok(())
    }

    proptest! {
        #[test]
        fn grades_never_overclaim_letters(answer in "[a-e]{5}", guess in "[a-e]{5}") {
            let answer = Word::from_str(&answer).unwrap();
            let guess = Word::from_str(&guess).unwrap();
            let (grades, correct) = grade(&answer, &guess);

            for &c in guess.letters() {
                let claimed = guess
                    .letters()
                    .iter()
                    .zip(grades.iter())
                    .filter(|&(&g, &grade)| g == c && grade != Grade::Unused)
                    .count();
                let in_guess = guess.letters().iter().filter(|&&g| g == c).count();
                let in_answer = answer.letters().iter().filter(|&&a| a == c).count();
                prop_assert_eq!(claimed, in_guess.min(in_answer));
            }
            prop_assert_eq!(correct, answer == guess);
        }

        #[test]
        fn correct_means_same_position(answer in "[a-e]{5}", guess in "[a-e]{5}") {
            let answer = Word::from_str(&answer).unwrap();
            let guess = Word::from_str(&guess).unwrap();
            let (grades, _) = grade(&answer, &guess);

            for i in 0..WORD_LENGTH {
                let same = answer.letters()[i] == guess.letters()[i];
                prop_assert_eq!(grades[i] == Grade::Correct, same);
            }
        }
    }
}
