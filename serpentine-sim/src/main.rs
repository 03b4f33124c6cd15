mod report;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs;
use std::path::PathBuf;

use serpentine_game::constants::{DEFAULT_DIE_SIDES, DEFAULT_GAMES, DEFAULT_MAX_STEPS, MAX_DIE_SIDES};
use serpentine_game::{
    BatchConfig, Board, BoardConfig, ConnectionSpec, DICE_DOMAIN, DieRoller, MoveTable,
    derive_stream_seed, run_batch,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable summary on stdout
    Console,
    /// Machine-readable JSON
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "serpentine-sim", version)]
#[command(about = "Monte Carlo batch simulation for snakes-and-ladders race boards")]
struct Args {
    /// Board rows (1-10)
    #[arg(long, default_value_t = 10)]
    rows: usize,

    /// Board columns (1-10)
    #[arg(long, default_value_t = 10)]
    cols: usize,

    /// Die sides (1-10)
    #[arg(short = 'd', long, default_value_t = DEFAULT_DIE_SIDES)]
    die_sides: u32,

    /// Require landing exactly on the final cell; overshooting forfeits
    /// the turn. With false, any overshoot wins.
    #[arg(short = 'e', long, default_value_t = true, action = clap::ArgAction::Set)]
    exact_finish: bool,

    /// Snake or ladder as START:END cell indices (repeatable)
    #[arg(short = 's', long = "connection", value_name = "START:END", value_parser = parse_connection)]
    connections: Vec<ConnectionSpec>,

    /// Board layout JSON file (replaces the board flags above)
    #[arg(long, value_name = "FILE", conflicts_with_all = ["rows", "cols", "die_sides", "exact_finish", "connections"])]
    board: Option<PathBuf>,

    /// Number of games to simulate
    #[arg(short = 'n', long, default_value_t = DEFAULT_GAMES)]
    games: u32,

    /// Maximum rolls per game before it counts as timed out
    #[arg(short = 'l', long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: u32,

    /// Seed for the die stream; a fixed seed reproduces the batch exactly
    #[arg(long, default_value_t = 1337)]
    seed: u64,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the JSON report instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Parse a `START:END` connection argument.
fn parse_connection(raw: &str) -> Result<ConnectionSpec, String> {
    let (start, end) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected START:END (got '{raw}')"))?;
    let start = start
        .trim()
        .parse()
        .map_err(|_| format!("start must be a cell index (got '{start}')"))?;
    let end = end
        .trim()
        .parse()
        .map_err(|_| format!("end must be a cell index (got '{end}')"))?;
    Ok(ConnectionSpec { start, end })
}

fn build_board(args: &Args) -> Result<Board> {
    let config = if let Some(path) = &args.board {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading board layout {}", path.display()))?;
        serde_json::from_str::<BoardConfig>(&text)
            .with_context(|| format!("parsing board layout {}", path.display()))?
    } else {
        if args.die_sides == 0 || args.die_sides > MAX_DIE_SIDES {
            bail!("--die-sides must be between 1 and {MAX_DIE_SIDES} (got {})", args.die_sides);
        }
        BoardConfig {
            rows: args.rows,
            cols: args.cols,
            die_sides: args.die_sides,
            exact_finish: args.exact_finish,
            connections: args.connections.clone(),
        }
    };
    config.build().context("building board")
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let board = build_board(&args)?;
    let table = MoveTable::build(&board);
    log::info!(
        "simulating {} games (budget {} rolls) on: {}",
        args.games,
        args.max_steps,
        board
    );

    let mut roller = DieRoller::new(ChaCha8Rng::seed_from_u64(derive_stream_seed(
        args.seed,
        DICE_DOMAIN,
    )));
    let config = BatchConfig::new(args.games, args.max_steps);
    let stats = run_batch(&board, &table, config, &mut roller).context("simulation failed")?;
    log::debug!("batch consumed {} die draws", stats.die_draws);

    match args.report {
        ReportFormat::Console => report::print_console(&board, &config, &stats, args.seed),
        ReportFormat::Json => {
            let rendered = report::render_json(&board, &stats, args.seed)?;
            match &args.output {
                Some(path) => fs::write(path, rendered)
                    .with_context(|| format!("writing report to {}", path.display()))?,
                None => println!("{rendered}"),
            }
        }
    }
    Ok(())
}
