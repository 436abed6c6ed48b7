//! Evaluating strategies.

use std::{fmt::Display, io::Write, ops::Deref};

use comfy_table::{Cell, Color, ColumnConstraint, Row, Table, Width};
use owo_colors::{AnsiColors, OwoColorize, Stream};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    strategy::{Attempts, Strategy, Word},
    Result,
};

/// One game played by the [test harness](crate::Harness).
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Game {
    pub(crate) answer: Word,
    pub(crate) attempts: Attempts,
    pub(crate) error: Option<String>,
}

impl Game {
    pub(crate) fn new(answer: Word, attempts: Attempts) -> Self {
        Game {
            answer,
            attempts,
            error: None,
        }
    }

    pub(crate) fn aborted(answer: Word, attempts: Attempts, error: String) -> Self {
        Game {
            answer,
            attempts,
            error: Some(error),
        }
    }

    pub fn answer(&self) -> Word {
        self.answer
    }

    pub fn attempts(&self) -> &Attempts {
        &self.attempts
    }

    /// The reason the game stopped early, if the strategy failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn solved(&self) -> bool {
        self.attempts.solved(&self.answer)
    }
}

/// A record of one strategy's guesses after run by the
/// [test harness](crate::Harness).
///
/// This struct can provide statistics about the attempts on its own, but it
/// is recommended to produce [`Summary`] first to cache the computations.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Perf {
    pub(crate) tries: Vec<Game>,
    strategy_name: String,
    max_guesses: usize,
}

impl Perf {
    /// Creates a new empty performance record.
    pub(crate) fn new(strat: &dyn Strategy, max_guesses: usize) -> Self {
        Perf {
            tries: Vec::new(),
            strategy_name: format!("{} v{}", strat, strat.version()),
            max_guesses,
        }
    }

    /// Gets the name of the strategy that produced this performance record.
    pub fn strategy_name(&self) -> &str {
        &self.strategy_name
    }

    /// Every game played, in the order the answers were chosen.
    pub fn games(&self) -> &[Game] {
        &self.tries
    }

    /// Gets the number of puzzles attempted by the strategy.
    pub fn num_tried(&self) -> u32 {
        self.tries.len() as u32
    }

    /// Gets the number of puzzles solved by the strategy.
    ///
    /// This function always returns a number less than or equal to
    /// [`num_tried()`](Self::num_tried()).
    pub fn num_solved(&self) -> u32 {
        self.tries.iter().filter(|game| game.solved()).count() as u32
    }

    /// Gets the number of games the strategy aborted with an error.
    pub fn num_errored(&self) -> u32 {
        self.tries.iter().filter(|game| game.error.is_some()).count() as u32
    }

    /// Gets the fraction of puzzles solved by the strategy.
    pub fn frac_solved(&self) -> f32 {
        (self.num_solved() as f32) / (self.num_tried() as f32)
    }

    /// Gets the number of guesses across all puzzle attempts.
    pub fn cumulative_guesses(&self) -> u32 {
        self.tries.iter().map(|game| game.attempts.len() as u32).sum()
    }

    /// Gets the number of guesses across all solved puzzles.
    pub fn cumulative_guesses_solved(&self) -> u32 {
        self.tries
            .iter()
            .filter(|game| game.solved())
            .map(|game| game.attempts.len() as u32)
            .sum()
    }

    /// Gets the average number of guesses needed to solve a puzzle.
    ///
    /// This function does not include guesses made on puzzles that the
    /// strategy was unable to solve.
    pub fn guesses_per_solution(&self) -> f32 {
        (self.cumulative_guesses_solved() as f32) / (self.num_solved() as f32)
    }

    /// Gets the number of puzzles the strategy could not solve.
    pub fn num_missed(&self) -> u32 {
        self.num_tried() - self.num_solved()
    }

    /// Prints the strategy's summary and then output a table showing the
    /// strategy's attempts for each puzzle.
    pub fn print(&self) {
        print!("{}", self);
        let mut table = Table::new();
        if !table.is_tty() {
            table.set_table_width(80);
        } else {
            table.load_preset(comfy_table::presets::UTF8_FULL);
        }
        let columns = (table.get_table_width().unwrap_or(80) / 9).max(1) as usize;
        for chunk in self.tries.chunks(columns) {
            let mut row = Row::new();
            for game in chunk {
                let mut cell = Cell::new(format!("{}\n-----\n{}", game.answer, game.attempts));
                if !game.solved() {
                    cell = cell.bg(Color::Red).fg(Color::Black);
                }
                row.add_cell(cell);
            }
            table.add_row(row);
        }
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(5));
            columns
        ]);
        println!("{}", table);
    }

    /// Converts this performance record to a pre-calculated summary.
    pub fn to_summary(&self) -> Summary<'_> {
        let mut bins = vec![0; self.max_guesses];

        self.tries
            .iter()
            .filter(|game| game.solved())
            .map(|game| game.attempts.len())
            .for_each(|n| bins[n - 1] += 1);

        Summary {
            strategy_name: &self.strategy_name,
            num_tried: self.num_tried(),
            num_solved: self.num_solved(),
            num_errored: self.num_errored(),
            cumulative_guesses: self.cumulative_guesses(),
            histogram: bins.into(),
        }
    }
}

impl Display for Perf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let perf_summary = self.to_summary();
        write!(f, "{}", perf_summary)
    }
}

/// A summary of a strategy's performance generated by the
/// [test harness](crate::Harness).
///
/// It is recommended to convert the [`Perf`] struct to this via the
/// [`Perf::to_summary()`] method when you want to report on a run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Summary<'a> {
    strategy_name: &'a str,
    num_tried: u32,
    num_solved: u32,
    num_errored: u32,
    cumulative_guesses: u32,
    histogram: Histogram,
}

impl<'a> Summary<'a> {
    /// Gets the name of the strategy that produced this performance record.
    pub fn strategy_name(&self) -> &'a str {
        self.strategy_name
    }

    /// Gets the number of puzzles attempted by the strategy.
    pub fn num_tried(&self) -> u32 {
        self.num_tried
    }

    /// Gets the number of puzzles solved by the strategy.
    pub fn num_solved(&self) -> u32 {
        self.num_solved
    }

    /// Gets the number of games aborted because the strategy failed.
    pub fn num_errored(&self) -> u32 {
        self.num_errored
    }

    /// Gets the fraction of puzzles solved by the strategy.
    pub fn frac_solved(&self) -> f32 {
        (self.num_solved as f32) / (self.num_tried as f32)
    }

    /// Gets the number of guesses across all puzzle attempts.
    pub fn cumulative_guesses(&self) -> u32 {
        self.cumulative_guesses
    }

    /// Gets the number of guesses across all solved puzzles.
    pub fn cumulative_guesses_solved(&self) -> u32 {
        self.histogram
            .iter()
            .enumerate()
            .map(|(i, v)| (i as u32 + 1) * v)
            .sum::<u32>()
    }

    /// Gets the average number of guesses needed to solve a puzzle.
    ///
    /// This function does not include guesses made on puzzles that the
    /// strategy was unable to solve.
    pub fn mean_guesses(&self) -> f32 {
        (self.cumulative_guesses_solved() as f32) / (self.num_solved as f32)
    }

    /// Gets the number of puzzles the strategy could not solve.
    pub fn num_missed(&self) -> u32 {
        self.num_tried - self.num_solved
    }

    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    /// Prints the summary to stdout, coloring the solve rate when the
    /// terminal supports it.
    pub fn print(&self, options: SummaryPrintOptions) -> Result<()> {
        let mut stdout = std::io::stdout();

        writeln!(stdout, "{:-^80}", self.strategy_name)?;
        writeln!(stdout, "Ran {} words", self.num_tried())?;

        let solved = format!("{:.1}%", self.frac_solved() * 100.);
        writeln!(
            stdout,
            "Guessed {} correctly, or {}, and {} incorrectly",
            self.num_solved(),
            solved.if_supports_color(Stream::Stdout, |text| {
                if self.num_missed() == 0 {
                    text.color(AnsiColors::Green)
                } else {
                    text.color(AnsiColors::Yellow)
                }
            }),
            self.num_missed()
        )?;

        if self.num_errored > 0 {
            writeln!(
                stdout,
                "{} games stopped early because the strategy failed",
                self.num_errored
                    .if_supports_color(Stream::Stdout, |text| text.color(AnsiColors::Red))
            )?;
        }

        writeln!(
            stdout,
            "Correct guesses took {:.2} attempts on average",
            self.mean_guesses(),
        )?;

        if options.histogram {
            write!(stdout, "{}", self.histogram)?;
        }

        Ok(())
    }

    pub fn print_options() -> SummaryPrintOptions {
        SummaryPrintOptions::default()
    }

    /// Serializes the summary as a JSON object.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SummaryPrintOptions {
    histogram: bool,
}

impl SummaryPrintOptions {
    pub fn histogram(self, histogram: bool) -> Self {
        Self { histogram }
    }
}

impl<'a> Display for Summary<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:-^80}", self.strategy_name)?;
        writeln!(f, "Ran {} words", self.num_tried(),)?;

        writeln!(
            f,
            "Guessed {} correctly, or {:.1}%, and {} incorrectly",
            self.num_solved(),
            self.frac_solved() * 100.,
            self.num_missed()
        )?;

        writeln!(
            f,
            "Correct guesses took {:.2} attempts on average",
            self.mean_guesses(),
        )?;

        Ok(())
    }
}

/// Solved games bucketed by the number of guesses they took.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Histogram {
    bins: Vec<u32>,
}

impl From<Vec<u32>> for Histogram {
    fn from(other: Vec<u32>) -> Self {
        Self { bins: other }
    }
}

impl Deref for Histogram {
    type Target = [u32];

    fn deref(&self) -> &Self::Target {
        &self.bins
    }
}

impl Display for Histogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let max = self.iter().copied().max().unwrap_or(0);
        let label_width = self.bins.len().to_string().len();
        let digits =
            std::iter::successors(Some(max), |&n| (n >= 10).then(|| n / 10)).count();
        // label, " |", " (", count, ")"
        let room = 80 - (label_width + 2 + 2 + digits + 1);
        let count_per_mark = (max as f32 / room as f32).max(1.0);

        for (i, &bin) in self.bins.iter().enumerate() {
            write!(f, "{:>label_width$} |", i + 1)?;
            let marks = (bin as f32 / count_per_mark).floor() as usize;
            writeln!(f, "{:#>marks$} ({})", "", bin)?;
        }

        Ok(())
    }
}
