//! Sigmar's Garden Solver
//!
//! Solves boards from the Sigmar's Garden minigame: pairs of matching
//! elemental tiles are removed until the board is empty, with metals
//! unlocked in order from Lead to Gold. Boards come from a file, from
//! stdin, or from the built-in example.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use sigmar::geometry::{row_len, ROWS};
use sigmar::notation::{self, DEFAULT_ROWS, UNSOLVABLE};
use sigmar::{persistence, solver, Board, Element, SolveOptions, SolveOutcome, SolveReport};

/// Finds a sequence of moves that clears a Sigmar's Garden board.
#[derive(Parser)]
#[command(name = "sigmar")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a board and print the moves.
    Solve(SolveArgs),
    /// Print a board and the moves available on it.
    Show {
        /// Board file; defaults to the built-in example.
        #[arg(short, long)]
        board: Option<PathBuf>,
    },
    /// Type a board in row by row, then solve it.
    Prompt(SearchArgs),
}

#[derive(Args, Default)]
struct SolveArgs {
    /// Board file; defaults to the built-in example.
    #[arg(short, long)]
    board: Option<PathBuf>,
    /// Also write the solution to this file.
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[command(flatten)]
    search: SearchArgs,
}

#[derive(Args, Default)]
struct SearchArgs {
    /// Give up after this many seconds.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
    /// Remember dead-end states and skip them when reached again.
    #[arg(long)]
    cache: bool,
}

impl SearchArgs {
    fn options(&self) -> SolveOptions {
        SolveOptions {
            deadline: self.timeout.map(Duration::from_secs),
            dead_end_cache: self.cache,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Solve(args)) => run_solve(&args),
        Some(Command::Show { board }) => run_show(board),
        Some(Command::Prompt(search)) => run_prompt(&search),
        // default: solve the built-in board
        None => run_solve(&SolveArgs::default()),
    }
}

/// Loads a board file, or the built-in example when no path is given.
fn load(path: Option<PathBuf>) -> Result<Board> {
    match path {
        Some(path) => Ok(persistence::load_board(&path)?),
        None => Board::from_rows(DEFAULT_ROWS).context("built-in board is malformed"),
    }
}

/// Solves the board and prints the moves, optionally saving them.
fn run_solve(args: &SolveArgs) -> Result<()> {
    let mut board = load(args.board.clone())?;
    println!("Solving a board of {} tiles...", board.remaining());

    let report = solver::solve_with(&mut board, &args.search.options())?;
    let text = render_outcome(&report);
    print!("{}", text);

    if let Some(path) = &args.output {
        persistence::save_solution(path, &text)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Prints the board and every currently legal move.
fn run_show(path: Option<PathBuf>) -> Result<()> {
    let board = load(path)?;
    print!("{}", notation::format_board(&board));
    println!(
        "{} tiles, next metal: {}",
        board.remaining(),
        board.current_metal()
    );

    let ops = board.feasible_ops();
    println!("{} legal moves:", ops.len());
    for op in ops {
        let first = board.tile(op.first).unwrap_or(Element::Void);
        let second = board.tile(op.second).unwrap_or(Element::Void);
        println!(
            "  {:?} {} + {:?} {}",
            op.first.to_row(),
            first,
            op.second.to_row(),
            second
        );
    }
    Ok(())
}

/// Reads the board from stdin one row at a time, then solves it.
fn run_prompt(search: &SearchArgs) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut rows = Vec::with_capacity(ROWS);

    for row in 0..ROWS {
        print!("Row {} ({} tiles): ", row + 1, row_len(row));
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            bail!("input ended after {} rows", row);
        };
        rows.push(line?.trim().to_string());
    }

    let mut board = Board::from_rows(&rows)?;
    let report = solver::solve_with(&mut board, &search.options())?;
    print!("{}", render_outcome(&report));
    Ok(())
}

/// Formats a search result for the terminal.
fn render_outcome(report: &SolveReport) -> String {
    match &report.outcome {
        SolveOutcome::Solved(steps) => notation::format_solution(steps),
        SolveOutcome::Unsolvable => format!("{}\n", UNSOLVABLE),
        SolveOutcome::TimedOut => format!(
            "Search timed out after {:.1}s.\n",
            report.elapsed.as_secs_f64()
        ),
    }
}
