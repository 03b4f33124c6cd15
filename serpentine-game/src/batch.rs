//! Batch runner: many playouts reduced into aggregate statistics.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::Board;
use crate::rng::DieRoller;
use crate::sim::{GameRecord, GameSimulator, StepRecord};
use crate::table::MoveTable;

/// Batch dimensions and limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Games to simulate; each is independent.
    pub num_games: u32,
    /// Roll budget per game before it counts as timed out.
    pub max_steps: u32,
    /// Recorded-path capacity per game; steps past it are counted but not
    /// stored.
    pub path_capacity: usize,
}

impl BatchConfig {
    /// Config with the path capacity matching the step budget, so winning
    /// paths are never truncated.
    #[must_use]
    pub const fn new(num_games: u32, max_steps: u32) -> Self {
        Self {
            num_games,
            max_steps,
            path_capacity: max_steps as usize,
        }
    }

    #[must_use]
    pub const fn with_path_capacity(mut self, path_capacity: usize) -> Self {
        self.path_capacity = path_capacity;
        self
    }

    const fn validate(self) -> Result<(), BatchError> {
        if self.num_games == 0 {
            return Err(BatchError::InvalidGameCount);
        }
        if self.max_steps == 0 {
            return Err(BatchError::InvalidStepBudget);
        }
        Ok(())
    }
}

/// Rejected batch parameters or an exhausted batch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("a batch needs at least one game")]
    InvalidGameCount,
    #[error("the per-game step budget must allow at least one roll")]
    InvalidStepBudget,
    #[error("none of the {games} games finished within {max_steps} rolls")]
    NoGamesWon { games: u32, max_steps: u32 },
}

/// Aggregate statistics over a finished batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStatistics {
    /// Games simulated, wins and timeouts alike.
    pub games: u32,
    /// Games that reached the finish cell within the step budget.
    pub wins: u32,
    /// Mean roll count among winning games.
    pub mean_rolls: f64,
    /// Minimum roll count among winning games.
    pub min_rolls: u32,
    /// Recorded step path of the fastest winning game; ties keep the
    /// earliest such game.
    pub best_path: Vec<StepRecord>,
    /// Times each connection fired across the whole batch, by insertion
    /// index, timed-out games included.
    pub traversals: Vec<u64>,
    /// Die draws consumed by the batch.
    pub die_draws: u64,
}

impl BatchStatistics {
    /// Fraction of games won, in `0.0..=1.0`.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        f64::from(self.wins) / f64::from(self.games)
    }
}

/// Simulate `config.num_games` independent games and reduce the results.
///
/// The board and table are borrowed read-only for the whole batch; one
/// [`GameRecord`] scratch is reused across games. The stored best path is
/// replaced only on a strict improvement of the winning roll count.
///
/// # Errors
///
/// Returns [`BatchError::InvalidGameCount`] or
/// [`BatchError::InvalidStepBudget`] before any simulation, and
/// [`BatchError::NoGamesWon`] when the whole batch times out — a
/// legitimate outcome of a hostile board, not a crash.
pub fn run_batch<R: RngCore>(
    board: &Board,
    table: &MoveTable,
    config: BatchConfig,
    roller: &mut DieRoller<R>,
) -> Result<BatchStatistics, BatchError> {
    config.validate()?;

    let simulator = GameSimulator::new(board, table);
    let mut record = GameRecord::with_capacity(board.connection_count(), config.path_capacity);
    let mut traversals = vec![0u64; board.connection_count()];
    let mut wins = 0u32;
    let mut roll_sum = 0.0_f64;
    let mut min_rolls = u32::MAX;
    let mut best_path: Vec<StepRecord> = Vec::new();
    let draws_before = roller.draws();

    for _ in 0..config.num_games {
        simulator.play_into(roller, config.max_steps, &mut record);
        for (total, seen) in traversals.iter_mut().zip(record.traversals()) {
            *total += *seen;
        }
        if !record.won() {
            continue;
        }
        wins += 1;
        roll_sum += f64::from(record.rolls());
        if record.rolls() < min_rolls {
            min_rolls = record.rolls();
            best_path.clear();
            best_path.extend_from_slice(record.steps());
        }
    }

    if wins == 0 {
        return Err(BatchError::NoGamesWon {
            games: config.num_games,
            max_steps: config.max_steps,
        });
    }

    Ok(BatchStatistics {
        games: config.num_games,
        wins,
        mean_rolls: roll_sum / f64::from(wins),
        min_rolls,
        best_path,
        traversals,
        die_draws: roller.draws() - draws_before,
    })
}
