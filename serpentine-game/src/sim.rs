//! Single-game playout against a finished board and its move table.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Position, Step};
use crate::rng::DieRoller;
use crate::table::MoveTable;

/// One recorded roll: the die face and the connection it fired, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub face: u32,
    pub connection: Option<usize>,
}

/// Reusable record of a single playout.
///
/// The step path is truncated at the configured capacity; the roll count
/// and the per-game traversal counters keep counting past it, so a
/// truncated record still aggregates correctly.
#[derive(Debug, Clone)]
pub struct GameRecord {
    won: bool,
    rolls: u32,
    steps: Vec<StepRecord>,
    traversals: Vec<u64>,
    capacity: usize,
}

impl GameRecord {
    /// Fresh record for a board with `connection_count` connections.
    #[must_use]
    pub fn with_capacity(connection_count: usize, path_capacity: usize) -> Self {
        Self {
            won: false,
            rolls: 0,
            steps: Vec::new(),
            traversals: vec![0; connection_count],
            capacity: path_capacity,
        }
    }

    /// Clear the record for the next game, keeping allocations.
    fn reset(&mut self, connection_count: usize) {
        self.won = false;
        self.rolls = 0;
        self.steps.clear();
        if self.traversals.len() == connection_count {
            self.traversals.fill(0);
        } else {
            self.traversals.clear();
            self.traversals.resize(connection_count, 0);
        }
    }

    /// Record one roll; the path respects capacity, the counters do not.
    fn record_step(&mut self, step: StepRecord) {
        if self.steps.len() < self.capacity {
            self.steps.push(step);
        }
        if let Some(index) = step.connection
            && let Some(count) = self.traversals.get_mut(index)
        {
            *count += 1;
        }
    }

    #[must_use]
    pub const fn won(&self) -> bool {
        self.won
    }

    /// Total rolls drawn, recorded or not.
    #[must_use]
    pub const fn rolls(&self) -> u32 {
        self.rolls
    }

    /// Recorded step path, possibly shorter than [`Self::rolls`].
    #[must_use]
    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Times each connection fired during this game, by insertion index.
    #[must_use]
    pub fn traversals(&self) -> &[u64] {
        &self.traversals
    }

    /// Whether capacity dropped any steps from the recorded path.
    #[must_use]
    pub fn truncated(&self) -> bool {
        (self.steps.len() as u64) < u64::from(self.rolls)
    }
}

/// Plays single games to completion or step-budget timeout.
#[derive(Debug, Clone, Copy)]
pub struct GameSimulator<'a> {
    board: &'a Board,
    table: &'a MoveTable,
}

impl<'a> GameSimulator<'a> {
    /// The table must have been built from this board after its last
    /// connection was added.
    #[must_use]
    pub const fn new(board: &'a Board, table: &'a MoveTable) -> Self {
        Self { board, table }
    }

    /// Play one game from off-board into a reusable record.
    ///
    /// A game that reaches the finish cell within `max_steps` rolls is
    /// marked won; otherwise the record stays timed out, with the rolls
    /// and traversal counters it accumulated on the way.
    pub fn play_into<R: RngCore>(
        &self,
        roller: &mut DieRoller<R>,
        max_steps: u32,
        record: &mut GameRecord,
    ) {
        record.reset(self.board.connection_count());
        let mut position = Position::OffBoard;
        while record.rolls < max_steps {
            let face = roller.roll(self.board.die_sides());
            let step = self.step_from(position, face);
            record.rolls += 1;
            record.record_step(StepRecord {
                face,
                connection: step.connection,
            });
            position = step.position;
            if self.board.is_finish(position) {
                record.won = true;
                return;
            }
        }
    }

    /// Convenience wrapper allocating a fresh record per game.
    #[must_use]
    pub fn play<R: RngCore>(
        &self,
        roller: &mut DieRoller<R>,
        max_steps: u32,
        path_capacity: usize,
    ) -> GameRecord {
        let mut record = GameRecord::with_capacity(self.board.connection_count(), path_capacity);
        self.play_into(roller, max_steps, &mut record);
        record
    }

    /// Table lookup for on-board cells, direct computation otherwise.
    fn step_from(&self, position: Position, face: u32) -> Step {
        if let Position::At(cell) = position
            && let Some(resolution) = self.table.get(cell, face)
        {
            return Step {
                position: Position::At(resolution.to),
                connection: resolution.connection,
            };
        }
        self.board.advance(position, face)
    }
}
