//! Serpentine Simulation Engine
//!
//! Platform-agnostic Monte Carlo core for linear race-board games in the
//! Snakes-and-Ladders family. This crate provides the board model, the
//! precomputed move table, single-game playouts, and the batch runner
//! without any I/O or platform-specific dependencies.
//!
//! A caller builds a [`Board`], appends connections, builds a
//! [`MoveTable`] from the finished board, then hands both to
//! [`run_batch`] together with a seeded [`DieRoller`]. The result is a
//! [`BatchStatistics`] or a structured [`BatchError::NoGamesWon`].

pub mod batch;
pub mod board;
pub mod constants;
pub mod rng;
pub mod sim;
pub mod table;

// Re-export commonly used types
pub use batch::{BatchConfig, BatchError, BatchStatistics, run_batch};
pub use board::{
    Board, BoardConfig, BoardError, Connection, ConnectionError, ConnectionKind, ConnectionList,
    ConnectionSpec, LayoutError, Position, Resolution, Step,
};
pub use rng::{DICE_DOMAIN, DieRoller, derive_stream_seed};
pub use sim::{GameRecord, GameSimulator, StepRecord};
pub use table::MoveTable;
