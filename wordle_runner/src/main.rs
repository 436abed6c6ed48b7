use std::{error::Error, path::PathBuf, process, sync::Arc};

use clap::Parser;
use log::{error, info};
use owo_colors::{OwoColorize, Stream, Style};
use wordle_bench::{
    strategy::{Grade, Puzzle, Round, DEFAULT_MAX_GUESSES},
    Dictionary, GuessFeedback, Harness, Result, Strategy, Word,
};
use wordle_strategies::Greedy;

/// Plays Wordle automatically with a greedy letter-frequency strategy.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Word list with one five letter word per line
    #[arg(short, long, default_value = "words.txt")]
    words: PathBuf,

    /// Play this many answers sampled from the word list
    #[arg(short = 'n', long, conflicts_with = "all")]
    games: Option<usize>,

    /// Play every word in the word list as an answer (the default)
    #[arg(long)]
    all: bool,

    /// Play a single game against this answer and show every guess
    #[arg(long, conflicts_with_all = ["games", "all"])]
    answer: Option<String>,

    /// Open every game with this word instead of the default
    #[arg(long)]
    opening: Option<String>,

    /// Guesses allowed per game
    #[arg(long, default_value_t = DEFAULT_MAX_GUESSES)]
    max_guesses: usize,

    /// Seed for sampling answers, for repeatable runs
    #[arg(long)]
    seed: Option<u64>,

    /// Show a progress bar
    #[arg(short, long)]
    verbose: bool,

    /// Print summaries as JSON
    #[arg(long)]
    json: bool,

    /// Print a table of every game played
    #[arg(long)]
    table: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        let mut message = e.to_string();
        let mut source = e.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        error!("{}", message);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let dictionary = Arc::new(Dictionary::from_file(&args.words)?);

    let greedy = match &args.opening {
        Some(opening) => Greedy::with_opening_word(dictionary.clone(), Word::from_str(opening)?)?,
        None => Greedy::new(dictionary.clone())?,
    };

    if let Some(answer) = &args.answer {
        let answer = dictionary.word(answer)?;
        return play_one(greedy, dictionary, answer, args.max_guesses);
    }

    let mut harness = Harness::new(dictionary)
        .max_guesses(args.max_guesses)
        .add_strategy(move || greedy.clone());
    harness = match args.games {
        Some(n) => harness.test_num(n),
        None => harness.test_all(),
    };
    if let Some(seed) = args.seed {
        harness = harness.seed(seed);
    }
    if args.verbose {
        harness = harness.verbose();
    }

    info!("starting {:?}", harness);
    let record = harness.run()?;

    if args.table {
        for perf in record.iter() {
            perf.print();
        }
    }

    if args.json {
        for perf in record.iter() {
            println!("{}", perf.to_summary().to_json()?);
        }
    } else {
        record.print_report()?;
    }

    Ok(())
}

fn play_one(
    mut strategy: Greedy,
    dictionary: Arc<Dictionary>,
    answer: Word,
    max_guesses: usize,
) -> Result<()> {
    println!("{}", strategy);
    strategy.reset();

    let mut puzzle = Puzzle::new(answer, dictionary).max_guesses(max_guesses);
    let mut feedback = GuessFeedback::start();
    while !puzzle.finished() {
        let guess = strategy.pick_next_guess(&feedback)?;
        feedback = puzzle.respond(guess);
        if let Some(round) = feedback.round() {
            println!("{}", paint(round));
        }
    }

    if puzzle.solved() {
        println!("solved {} in {} guesses", answer, puzzle.attempts().len());
    } else {
        println!("missed {} after {} guesses", answer, puzzle.attempts().len());
    }

    Ok(())
}

fn paint(round: &Round) -> String {
    round
        .guess
        .letters()
        .iter()
        .zip(round.grades.iter())
        .map(|(&c, grade)| {
            let style = match grade {
                Grade::Correct => Style::new().black().on_green(),
                Grade::Misplaced => Style::new().black().on_yellow(),
                Grade::Unused => Style::new().white().on_bright_black(),
            };
            let cell = format!(" {} ", (c as char).to_ascii_uppercase());
            format!(
                "{}",
                cell.if_supports_color(Stream::Stdout, |text| text.style(style))
            )
        })
        .collect()
}
