use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use parity::{parse_parity_game, to_game, write_parity_sol};
use pg_solver::graph::{ParityGame, ParityGraph};
use pg_solver::recursive::RecursiveSolver;
use pg_solver::solution::{Regions, RsSolution, Strategies};
use pg_solver::spm::ProgressMeasuresSolver;
use pg_solver::Solver;
use tracing::Level;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SolverKind {
    /// Progressive small progress measures
    Spm,
    /// McNaughton–Zielonka
    Recursive,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Plain,
    Json,
    Sol,
}

/// Solves parity games in the PGSolver format.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Verbosity level (0-3)
    #[arg(long, short, help = "Verbosity level (0-3)", action = ArgAction::Count, env = "PARITY_VERBOSITY")]
    v: u8,

    /// The game file, `-` reads from stdin.
    #[arg(default_value = "-", env = "PARITY_INPUT")]
    input: String,

    #[arg(long, short, value_enum, default_value_t = SolverKind::Spm, env = "PARITY_SOLVER")]
    solver: SolverKind,

    #[arg(long, short, value_enum, default_value_t = Format::Plain, env = "PARITY_FORMAT")]
    format: Format,

    /// Fail instead of recursing this deep (recursive solver only).
    #[arg(long, env = "PARITY_MAX_DEPTH")]
    max_depth: Option<usize>,

    /// Only print the time it took to solve, in milliseconds.
    #[arg(long, short, env = "PARITY_TIME_ONLY")]
    time_only: bool,

    /// Print the name of the selected solver and exit.
    #[arg(long, env = "PARITY_SOLVER_NAME")]
    solver_name: bool,
}

type BoxedSolver = Box<dyn Solver<ParityGame, Solution = RsSolution>>;

fn select_solver(kind: SolverKind, max_depth: Option<usize>) -> Result<BoxedSolver> {
    let solver: BoxedSolver = match kind {
        SolverKind::Spm if max_depth.is_some() => {
            return Err(anyhow!("--max-depth only applies to the recursive solver"));
        }
        SolverKind::Spm => Box::new(ProgressMeasuresSolver::new()),
        SolverKind::Recursive => Box::new(RecursiveSolver { max_depth }),
    };
    Ok(solver)
}

fn main() -> Result<()> {
    let Args { v, input, solver, format, max_depth, time_only, solver_name } = Args::parse();

    init_tracing_subscriber(v)?;

    let solver = select_solver(solver, max_depth)?;

    if solver_name {
        println!("{}", solver.name());
        return Ok(());
    }

    tracing::info!(target: "parity-cli", "Parsing input from {}", if input == "-" { "stdin" } else { input.as_str() });
    let source = match input.as_str() {
        "-" => std::io::read_to_string(std::io::stdin()).context("failed to read stdin")?,
        path => std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?,
    };

    let parsed = parse_parity_game(&source).map_err(|errs| {
        let errs = errs.iter().map(ToString::to_string).collect::<Vec<_>>();
        anyhow!("failed to parse {input}: {}", errs.join("; "))
    })?;
    let (game, ids) = to_game(&parsed).context("invalid game")?;
    tracing::info!(target: "parity-cli", vertices = game.vertex_count(), edges = game.edge_count(), "Parsed game");

    tracing::debug!(target: "parity-cli", "Starting solver: {}", solver.name());
    let now = Instant::now();
    let solution = solver.solve(&game)?;
    let time = now.elapsed().as_secs_f64() * 1000.0;
    tracing::info!(target: "parity-cli", "Solver completed in {time} ms");

    if time_only {
        println!("Time to solve: {time} ms");
        return Ok(());
    }

    match format {
        Format::Plain => print_plain(&game, &solution, time),
        Format::Json => println!("{}", serde_json::json!({ "time": time, "solution": solution })),
        Format::Sol => print!("{}", write_parity_sol(&game, &ids, &solution)),
    }

    Ok(())
}

fn print_plain(game: &ParityGame, solution: &RsSolution, time: f64) {
    println!("Time to solve: {time}ms");

    for v in game.vertices() {
        let winner = match solution.winner(v) {
            Some(p) => format!("Player {p}"),
            None => "Unknown".to_string(),
        };
        match solution.strategy(v) {
            Some(w) => println!("  {}: {winner} -> {}", game.vertex(v).name, game.vertex(w).name),
            None => println!("  {}: {winner}", game.vertex(v).name),
        }
    }

    if !solution.statistics.is_empty() {
        println!("Statistics:");
        for (name, value) in solution.statistics.iter() {
            println!("  {name}: {value}");
        }
    }
}

/// Installs the fmt subscriber, warnings only unless asked for more.
fn init_tracing_subscriber(verbosity_level: u8) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(match verbosity_level {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        })
        .finish();
    tracing::subscriber::set_global_default(subscriber).map_err(|e| anyhow!(e))
}
