use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use serpentine_game::{BatchConfig, BatchStatistics, Board, ConnectionKind, StepRecord};

/// Render the batch outcome as a human-readable console report.
pub fn print_console(board: &Board, config: &BatchConfig, stats: &BatchStatistics, seed: u64) {
    println!();
    println!("{}", "Simulation statistics".bright_cyan().bold());
    println!("{}", "=====================".cyan());
    println!("Sample size: {}", stats.games);
    println!("Board size: {} x {}", board.rows(), board.cols());
    println!("Die: d{}", board.die_sides());
    println!("Roll limit: {}", config.max_steps);
    println!(
        "Finish rule: {}",
        if board.exact_finish() {
            "exact landing"
        } else {
            "overshoot wins"
        }
    );
    println!("Seed: {seed}");
    println!();

    let win_pct = stats.win_rate() * 100.0;
    println!(
        "Wins: {} / {} ({win_pct:.1}%)",
        stats.wins.to_string().green(),
        stats.games
    );
    println!("Average rolls to win: {:.4}", stats.mean_rolls);
    println!(
        "Fastest win: {} rolls",
        stats.min_rolls.to_string().green()
    );
    println!("  {}", roll_chain(&stats.best_path));
    println!();

    if board.connection_count() == 0 {
        println!("No snakes or ladders on this board.");
        return;
    }

    println!("{}", "Traversal counts".bright_yellow().bold());
    println!("{}", "================".yellow());
    let mut kind_totals = [0u64; 2];
    for (connection, count) in board.connections().iter().zip(&stats.traversals) {
        kind_totals[kind_slot(connection.kind)] += *count;
    }
    for (index, (connection, count)) in board
        .connections()
        .iter()
        .zip(&stats.traversals)
        .enumerate()
    {
        let total = kind_totals[kind_slot(connection.kind)];
        #[allow(clippy::cast_precision_loss)]
        let share = if total == 0 {
            0.0
        } else {
            (*count as f64 / total as f64) * 100.0
        };
        let label = match connection.kind {
            ConnectionKind::Ladder => connection.kind.label().green(),
            ConnectionKind::Snake => connection.kind.label().red(),
        };
        println!(
            "  #{index} {label} {:>2} -> {:<2}  {count} times ({share:.2}% of {}s)",
            connection.start,
            connection.end,
            connection.kind.label(),
        );
    }
}

const fn kind_slot(kind: ConnectionKind) -> usize {
    match kind {
        ConnectionKind::Ladder => 0,
        ConnectionKind::Snake => 1,
    }
}

fn roll_chain(path: &[StepRecord]) -> String {
    path.iter()
        .map(|step| step.face.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    seed: u64,
    games: u32,
    wins: u32,
    win_rate: f64,
    mean_rolls: f64,
    min_rolls: u32,
    best_path: &'a [StepRecord],
    die_draws: u64,
    connections: Vec<JsonConnection>,
}

#[derive(Debug, Serialize)]
struct JsonConnection {
    index: usize,
    start: usize,
    end: usize,
    kind: &'static str,
    traversals: u64,
}

/// Render the batch outcome as pretty-printed JSON.
pub fn render_json(board: &Board, stats: &BatchStatistics, seed: u64) -> Result<String> {
    let connections = board
        .connections()
        .iter()
        .zip(&stats.traversals)
        .enumerate()
        .map(|(index, (connection, count))| JsonConnection {
            index,
            start: connection.start,
            end: connection.end,
            kind: connection.kind.label(),
            traversals: *count,
        })
        .collect();
    let report = JsonReport {
        seed,
        games: stats.games,
        wins: stats.wins,
        win_rate: stats.win_rate(),
        mean_rolls: stats.mean_rolls,
        min_rolls: stats.min_rolls,
        best_path: &stats.best_path,
        die_draws: stats.die_draws,
        connections,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serpentine_game::{DICE_DOMAIN, DieRoller, MoveTable, derive_stream_seed, run_batch};

    #[test]
    fn json_report_carries_connection_metadata() {
        let mut board = Board::new(10, 10, 6, true).expect("valid board");
        board.add_connection(1, 38).expect("ladder");
        board.add_connection(62, 19).expect("snake");
        let table = MoveTable::build(&board);
        let mut roller = DieRoller::new(ChaCha8Rng::seed_from_u64(derive_stream_seed(
            7,
            DICE_DOMAIN,
        )));
        let stats = run_batch(&board, &table, BatchConfig::new(50, 1000), &mut roller)
            .expect("winnable board");
        let rendered = render_json(&board, &stats, 7).expect("serializes");
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");
        assert_eq!(value["seed"], 7);
        assert_eq!(value["connections"][0]["kind"], "ladder");
        assert_eq!(value["connections"][1]["start"], 62);
        assert_eq!(
            value["connections"].as_array().map(Vec::len),
            Some(board.connection_count())
        );
    }

    #[test]
    fn roll_chains_read_left_to_right() {
        let path = [
            StepRecord {
                face: 2,
                connection: Some(0),
            },
            StepRecord {
                face: 6,
                connection: None,
            },
        ];
        assert_eq!(roll_chain(&path), "2 -> 6");
    }
}
