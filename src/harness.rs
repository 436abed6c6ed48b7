//! The test harness for running Wordle strategies.

use std::{fmt::Debug, ops::Deref, sync::Arc};

use indicatif::{ParallelProgressIterator, ProgressBar};
use log::{info, warn};
use rand::{rngs::StdRng, seq::index::sample, SeedableRng};
use rayon::prelude::*;

use crate::{
    perf::{Game, Perf},
    strategy::{GuessFeedback, Puzzle, Strategy, Word, DEFAULT_MAX_GUESSES},
    words::Dictionary,
    HarnessError, Result, Summary,
};

type Factory = Box<dyn Fn() -> Box<dyn Strategy> + Send + Sync>;

/// Which answers the harness plays.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Answers {
    All,
    Sample(usize),
    Given(Vec<Word>),
}

/// A test harness that can run many strategies on many puzzles.
///
/// When you want to test your strategies, create a new test harness
/// with [`new()`](Harness::new()). You can then configure it using various
/// methods. Note that these configuration methods consume the existing
/// [`Harness`] and return a new one.
///
/// Strategies are added as factories rather than instances. Games run in
/// parallel, and every worker thread builds its own strategy from the
/// factory, calling [`reset()`](Strategy::reset()) before each game. The
/// dictionary is shared between all of them.
///
/// # Examples
///
/// ```rust
/// # use std::{fmt::Display, sync::Arc};
/// use wordle_bench::{Dictionary, GuessFeedback, Harness, Result, Strategy, Word};
///
/// # #[derive(Debug)]
/// # struct Stubborn;
/// #
/// # impl Display for Stubborn {
/// #     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
/// #         write!(f, "Stubborn")
/// #     }
/// # }
/// #
/// # impl Strategy for Stubborn {
/// #     fn reset(&mut self) {}
/// #
/// #     fn pick_next_guess(&mut self, _feedback: &GuessFeedback) -> Result<Word> {
/// #         Word::from_str("tithe")
/// #     }
/// #
/// #     fn version(&self) -> &'static str {
/// #         "0.1.0"
/// #     }
/// # }
/// #
/// let dictionary = Arc::new(Dictionary::from_words(["tithe", "crane", "slate"]));
/// let harness = Harness::new(dictionary)
///     .quiet()
///     .add_strategy(|| Stubborn)
///     .test_all();
///
/// let results = harness.run()?;
/// assert_eq!(results[0].num_tried(), 3);
/// assert_eq!(results[0].num_solved(), 1);
/// #
/// # Ok::<_, wordle_bench::WordleError>(())
/// ```
pub struct Harness {
    dictionary: Arc<Dictionary>,
    strategies: Vec<Factory>,
    verbose: bool,
    answers: Answers,
    max_guesses: usize,
    seed: Option<u64>,
}

impl Debug for Harness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harness")
            .field("dictionary", &self.dictionary.len())
            .field("strategies", &self.strategies.len())
            .field("verbose", &self.verbose)
            .field("answers", &self.answers)
            .field("max_guesses", &self.max_guesses)
            .field("seed", &self.seed)
            .finish()
    }
}

impl Harness {
    /// Creates a new test harness with default configuration.
    ///
    /// Defaults:
    /// 1. tests no strategies
    /// 2. quiet mode
    /// 3. runs each strategy on 100 answers chosen at random from the
    ///    dictionary
    /// 4. allows six guesses per puzzle
    pub fn new(dictionary: Arc<Dictionary>) -> Self {
        Harness {
            dictionary,
            strategies: Vec::new(),
            verbose: false,
            answers: Answers::Sample(100),
            max_guesses: DEFAULT_MAX_GUESSES,
            seed: None,
        }
    }

    /// Makes the harness verbose while testing.
    ///
    /// As of right now, this consists of a progress bar and nothing else.
    pub fn verbose(self) -> Self {
        Harness {
            verbose: true,
            ..self
        }
    }

    /// Makes the harness silent while testing.
    pub fn quiet(self) -> Self {
        Harness {
            verbose: false,
            ..self
        }
    }

    /// Adds a strategy to the harness for testing.
    ///
    /// `factory` is called once per worker thread to build the instance that
    /// thread plays with.
    pub fn add_strategy<S, F>(self, factory: F) -> Self
    where
        S: Strategy + 'static,
        F: Fn() -> S + Send + Sync + 'static,
    {
        let mut strategies = self.strategies;
        strategies.push(Box::new(move || Box::new(factory()) as Box<dyn Strategy>));
        Harness { strategies, ..self }
    }

    /// Sets the harness to test each strategy on every dictionary word.
    pub fn test_all(self) -> Self {
        Harness {
            answers: Answers::All,
            ..self
        }
    }

    /// Sets the harness to test each strategy on `n` random dictionary words.
    pub fn test_num(self, n: usize) -> Self {
        Harness {
            answers: Answers::Sample(n),
            ..self
        }
    }

    /// Sets the harness to test each strategy on exactly these answers.
    pub fn answers(self, answers: Vec<Word>) -> Self {
        Harness {
            answers: Answers::Given(answers),
            ..self
        }
    }

    /// Seeds the random choice of answers so runs can be repeated.
    pub fn seed(self, seed: u64) -> Self {
        Harness {
            seed: Some(seed),
            ..self
        }
    }

    /// Sets how many guesses each puzzle allows.
    pub fn max_guesses(self, max_guesses: usize) -> Self {
        Harness {
            max_guesses,
            ..self
        }
    }

    fn pick_answers(&self) -> Vec<Word> {
        match &self.answers {
            Answers::All => self.dictionary.to_vec(),
            Answers::Given(words) => words.clone(),
            Answers::Sample(n) => {
                let n = (*n).clamp(0, self.dictionary.len());
                let mut rng = match self.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                sample(&mut rng, self.dictionary.len(), n)
                    .iter()
                    .map(|i| self.dictionary[i])
                    .collect()
            }
        }
    }

    /// Runs the harness and produces performances for each strategy.
    ///
    /// The [`Perf`]s will be in the same order as the strategies were added
    /// to the harness.
    pub fn run(&self) -> Result<Record> {
        if self.strategies.is_empty() {
            return Err(HarnessError::NoStrategiesAdded.into());
        }

        let answers = self.pick_answers();
        if answers.is_empty() {
            return Err(HarnessError::NoAnswers.into());
        }

        let mut perfs = Vec::with_capacity(self.strategies.len());
        for factory in &self.strategies {
            let mut perf = Perf::new(factory().as_ref(), self.max_guesses);
            info!(
                "running {} on {} puzzles",
                perf.strategy_name(),
                answers.len()
            );

            let bar = if self.verbose {
                ProgressBar::new(answers.len() as u64)
            } else {
                ProgressBar::hidden()
            };

            perf.tries = answers
                .par_iter()
                .progress_with(bar)
                .map_init(factory, |strategy, &answer| {
                    self.play(strategy.as_mut(), answer)
                })
                .collect();

            info!(
                "{} solved {} of {}",
                perf.strategy_name(),
                perf.num_solved(),
                perf.num_tried()
            );
            perfs.push(perf);
        }

        Ok(Record::new(perfs))
    }

    /// Plays one game of `strategy` against `answer`.
    ///
    /// A strategy error ends the game early; it is kept on the [`Game`] and
    /// counts as a miss.
    fn play(&self, strategy: &mut dyn Strategy, answer: Word) -> Game {
        let mut puzzle =
            Puzzle::new(answer, self.dictionary.clone()).max_guesses(self.max_guesses);

        strategy.reset();
        let mut feedback = GuessFeedback::start();

        while !puzzle.finished() {
            let guess = match strategy.pick_next_guess(&feedback) {
                Ok(guess) => guess,
                Err(e) => {
                    warn!("{} gave up on {}: {}", strategy, answer, e);
                    let error = match std::error::Error::source(&e) {
                        Some(source) => source.to_string(),
                        None => e.to_string(),
                    };
                    return Game::aborted(answer, puzzle.into_attempts(), error);
                }
            };
            feedback = puzzle.respond(guess);
        }

        Game::new(answer, puzzle.into_attempts())
    }
}

/// The performance of every strategy from one harness run.
#[derive(Debug, Clone, Default)]
pub struct Record {
    perfs: Vec<Perf>,
}

impl Deref for Record {
    type Target = [Perf];

    fn deref(&self) -> &Self::Target {
        &self.perfs
    }
}

impl Record {
    fn new(perfs: Vec<Perf>) -> Self {
        Self { perfs }
    }

    /// Prints every strategy's summary along with its histogram.
    pub fn print_report(&self) -> Result<()> {
        for perf in self.perfs.iter() {
            let summary = perf.to_summary();
            summary.print(Summary::print_options().histogram(true))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{mock::Mock, WordleError};

    fn dictionary() -> Arc<Dictionary> {
        Arc::new(Dictionary::from_words([
            "nerds", "tithe", "doubt", "point", "parka", "sword", "crane",
        ]))
    }

    #[test]
    fn needs_a_strategy() {
        let harness = Harness::new(dictionary());
        assert!(matches!(
            harness.run(),
            Err(WordleError::Harness {
                kind: HarnessError::NoStrategiesAdded
            })
        ));
    }

    #[test]
    fn needs_answers() {
        let harness = Harness::new(dictionary())
            .add_strategy(Mock::default)
            .answers(Vec::new());
        assert!(matches!(
            harness.run(),
            Err(WordleError::Harness {
                kind: HarnessError::NoAnswers
            })
        ));
    }

    #[test]
    fn plays_every_answer() -> Result<(), WordleError> {
        let harness = Harness::new(dictionary())
            .add_strategy(Mock::default)
            .test_all();
        let record = harness.run()?;
        assert_eq!(record.len(), 1);

        let perf = &record[0];
        assert_eq!(perf.num_tried(), 7);
        // every answer but crane is somewhere in the mock's six guesses
        assert_eq!(perf.num_solved(), 6);
        assert_eq!(perf.num_errored(), 0);

        let doubt = perf
            .games()
            .iter()
            .find(|game| &*game.answer() == "doubt")
            .unwrap();
        assert_eq!(doubt.attempts().len(), 3);

        let crane = perf
            .games()
            .iter()
            .find(|game| &*game.answer() == "crane")
            .unwrap();
        assert!(!crane.solved());
        assert_eq!(crane.attempts().len(), 6);
        Ok(())
    }

    #[test]
    fn strategy_errors_abort_only_that_game() -> Result<(), WordleError> {
        let harness = Harness::new(dictionary())
            .add_strategy(|| Mock::new(&["nerds", "tithe"]))
            .answers(vec![Word::from_str("tithe")?, Word::from_str("sword")?]);
        let record = harness.run()?;

        let perf = &record[0];
        assert_eq!(perf.num_solved(), 1);
        assert_eq!(perf.num_errored(), 1);
        let sword = &perf.games()[1];
        assert_eq!(sword.attempts().len(), 2);
        assert_eq!(sword.error(), Some("no candidate words remain"));
        Ok(())
    }

    #[test]
    fn refused_guesses_abort_the_game() -> Result<(), WordleError> {
        let harness = Harness::new(dictionary())
            .add_strategy(|| Mock::new(&["zzzzz", "tithe"]))
            .answers(vec![Word::from_str("tithe")?]);
        let record = harness.run()?;

        let game = &record[0].games()[0];
        assert!(!game.solved());
        assert!(game.attempts().is_empty());
        assert_eq!(game.error(), Some("the strategy was given invalid feedback"));
        Ok(())
    }

    #[test]
    fn guess_budget_is_respected() -> Result<(), WordleError> {
        let harness = Harness::new(dictionary())
            .add_strategy(Mock::default)
            .max_guesses(2)
            .answers(vec![Word::from_str("sword")?, Word::from_str("tithe")?]);
        let record = harness.run()?;

        let perf = &record[0];
        assert_eq!(perf.num_solved(), 1);
        assert!(perf.games().iter().all(|game| game.attempts().len() <= 2));
        assert_eq!(perf.to_summary().histogram().len(), 2);
        Ok(())
    }

    #[test]
    fn seeded_samples_repeat() -> Result<(), WordleError> {
        let run = || -> Result<Vec<Word>, WordleError> {
            let record = Harness::new(dictionary())
                .add_strategy(Mock::default)
                .test_num(4)
                .seed(7)
                .run()?;
            Ok(record[0].games().iter().map(|game| game.answer()).collect())
        };

        let first = run()?;
        assert_eq!(first.len(), 4);
        assert_eq!(first, run()?);
        Ok(())
    }

    #[test]
    fn sample_is_clamped_to_dictionary() -> Result<(), WordleError> {
        let record = Harness::new(dictionary())
            .add_strategy(Mock::default)
            .test_num(1000)
            .run()?;
        assert_eq!(record[0].num_tried(), 7);
        Ok(())
    }
}
