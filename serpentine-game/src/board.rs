//! Race-board model: cells, connections, and single-roll move resolution.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use thiserror::Error;

use crate::constants::{DEFAULT_DIE_SIDES, MAX_DIM, MIN_CELLS};

/// Connection storage stays inline for typical boards.
pub type ConnectionList = SmallVec<[Connection; 8]>;

/// Direction of a point-to-point connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    /// Moves the player forward (`end > start`).
    Ladder,
    /// Moves the player backward.
    Snake,
}

impl ConnectionKind {
    /// Derive the kind from the endpoints.
    #[must_use]
    pub const fn of(start: usize, end: usize) -> Self {
        if end > start { Self::Ladder } else { Self::Snake }
    }

    /// Lowercase label for reporting.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ladder => "ladder",
            Self::Snake => "snake",
        }
    }
}

/// A single snake or ladder between two cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Cell that triggers the connection when landed on.
    pub start: usize,
    /// Cell the player is carried to.
    pub end: usize,
    /// Derived direction.
    pub kind: ConnectionKind,
}

impl Connection {
    const fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            kind: ConnectionKind::of(start, end),
        }
    }
}

/// Rejected board construction parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("rows must be between 1 and {MAX_DIM} (got {rows})")]
    RowsOutOfRange { rows: usize },
    #[error("columns must be between 1 and {MAX_DIM} (got {cols})")]
    ColsOutOfRange { cols: usize },
    #[error("a board needs at least {MIN_CELLS} cells (got {cells})")]
    TooFewCells { cells: usize },
    #[error("the die must have at least one side")]
    InvalidDieSides,
}

/// Rejected connection placement. Rejection leaves the board untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("endpoints {start} -> {end} fall outside cells 0..={last}")]
    OutOfRange { start: usize, end: usize, last: usize },
    #[error("a connection may not start and end on cell {cell}")]
    SelfLoop { cell: usize },
    #[error("the finish cell {cell} cannot be a connection origin")]
    OriginIsFinish { cell: usize },
    #[error("connection {start} -> {end} already exists")]
    Duplicate { start: usize, end: usize },
    #[error("cell {cell} already belongs to another connection")]
    Overlap { cell: usize },
}

/// Player location, including the pre-entry state before the first roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    /// Not yet on the board; the first roll enters from here.
    OffBoard,
    /// Resting on the given cell.
    At(usize),
}

impl Position {
    /// The occupied cell, if any.
    #[must_use]
    pub const fn cell(self) -> Option<usize> {
        match self {
            Self::OffBoard => None,
            Self::At(cell) => Some(cell),
        }
    }
}

/// Where a roll from a known cell comes to rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Final resting cell after overshoot policy and connection hop.
    pub to: usize,
    /// Index of the connection traversed, if any.
    pub connection: Option<usize>,
}

/// Where a roll from an arbitrary position comes to rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub position: Position,
    pub connection: Option<usize>,
}

impl Step {
    const fn landed(resolution: Resolution) -> Self {
        Self {
            position: Position::At(resolution.to),
            connection: resolution.connection,
        }
    }
}

/// Immutable-after-setup description of the race track.
///
/// Connections are appended one at a time and identified by insertion
/// order; that index is the one reported in traversal statistics. A
/// [`crate::table::MoveTable`] built from this board goes stale if more
/// connections are added afterward, so always rebuild before simulating.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    rows: usize,
    cols: usize,
    total_cells: usize,
    die_sides: u32,
    exact_finish: bool,
    connections: ConnectionList,
}

impl Board {
    /// Create an empty board.
    ///
    /// # Errors
    ///
    /// Returns a [`BoardError`] when a dimension falls outside
    /// `1..=MAX_DIM`, the board has fewer than two cells, or the die has
    /// no sides.
    pub fn new(
        rows: usize,
        cols: usize,
        die_sides: u32,
        exact_finish: bool,
    ) -> Result<Self, BoardError> {
        if rows == 0 || rows > MAX_DIM {
            return Err(BoardError::RowsOutOfRange { rows });
        }
        if cols == 0 || cols > MAX_DIM {
            return Err(BoardError::ColsOutOfRange { cols });
        }
        let total_cells = rows * cols;
        if total_cells < MIN_CELLS {
            return Err(BoardError::TooFewCells { cells: total_cells });
        }
        if die_sides == 0 {
            return Err(BoardError::InvalidDieSides);
        }
        Ok(Self {
            rows,
            cols,
            total_cells,
            die_sides,
            exact_finish,
            connections: ConnectionList::new(),
        })
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub const fn total_cells(&self) -> usize {
        self.total_cells
    }

    /// Index of the finish cell.
    #[must_use]
    pub const fn last_cell(&self) -> usize {
        self.total_cells - 1
    }

    #[must_use]
    pub const fn die_sides(&self) -> u32 {
        self.die_sides
    }

    #[must_use]
    pub const fn exact_finish(&self) -> bool {
        self.exact_finish
    }

    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Whether the position rests on the finish cell.
    #[must_use]
    pub fn is_finish(&self, position: Position) -> bool {
        position == Position::At(self.last_cell())
    }

    /// Append a connection, validating every placement invariant.
    ///
    /// The overlap rule is strict: a cell may appear in at most one
    /// connection, in either role. Landing anywhere therefore triggers at
    /// most one hop, which is what keeps [`Self::resolve_cell`] a single
    /// lookup instead of a chain walk.
    ///
    /// Returns the insertion-order index of the new connection.
    ///
    /// # Errors
    ///
    /// Returns a [`ConnectionError`] naming the violated invariant; the
    /// board is left unchanged on rejection.
    pub fn add_connection(&mut self, start: usize, end: usize) -> Result<usize, ConnectionError> {
        let last = self.last_cell();
        if start > last || end > last {
            return Err(ConnectionError::OutOfRange { start, end, last });
        }
        if start == end {
            return Err(ConnectionError::SelfLoop { cell: start });
        }
        if start == last {
            return Err(ConnectionError::OriginIsFinish { cell: start });
        }
        if self
            .connections
            .iter()
            .any(|c| c.start == start && c.end == end)
        {
            return Err(ConnectionError::Duplicate { start, end });
        }
        for c in &self.connections {
            if c.start == start || c.end == start {
                return Err(ConnectionError::Overlap { cell: start });
            }
            if c.start == end || c.end == end {
                return Err(ConnectionError::Overlap { cell: end });
            }
        }
        self.connections.push(Connection::new(start, end));
        Ok(self.connections.len() - 1)
    }

    /// Resolve one roll from a cell on the board.
    ///
    /// Applies the overshoot policy first: with `exact_finish` a roll past
    /// the finish forfeits the turn and the cell is unchanged; otherwise
    /// the move clamps to the finish. The landing cell then takes at most
    /// one connection hop.
    ///
    /// `face` must be in `1..=die_sides` and `cell` on the board; both are
    /// caller contracts checked by `debug_assert!`.
    #[must_use]
    pub fn resolve_cell(&self, cell: usize, face: u32) -> Resolution {
        debug_assert!(cell < self.total_cells, "cell {cell} outside the board");
        debug_assert!(
            (1..=self.die_sides).contains(&face),
            "face {face} outside the die"
        );
        let raw = cell + face as usize;
        if raw > self.last_cell() {
            if self.exact_finish {
                return Resolution {
                    to: cell,
                    connection: None,
                };
            }
            return self.hop(self.last_cell());
        }
        self.hop(raw)
    }

    /// Resolve one roll from any position, including pre-entry.
    ///
    /// The off-board entry move lands face `f` on cell `f - 1` and is not
    /// covered by the move table, so callers holding a table fall back to
    /// this method for it. The arithmetic and policy are identical.
    #[must_use]
    pub fn advance(&self, from: Position, face: u32) -> Step {
        match from {
            Position::At(cell) => Step::landed(self.resolve_cell(cell, face)),
            Position::OffBoard => {
                debug_assert!(
                    (1..=self.die_sides).contains(&face),
                    "face {face} outside the die"
                );
                let landing = (face as usize).saturating_sub(1);
                if landing > self.last_cell() {
                    if self.exact_finish {
                        return Step {
                            position: Position::OffBoard,
                            connection: None,
                        };
                    }
                    return Step::landed(self.hop(self.last_cell()));
                }
                Step::landed(self.hop(landing))
            }
        }
    }

    /// Apply at most one connection hop to a landing cell.
    fn hop(&self, landed: usize) -> Resolution {
        match self
            .connections
            .iter()
            .enumerate()
            .find(|(_, c)| c.start == landed)
        {
            Some((index, c)) => Resolution {
                to: c.end,
                connection: Some(index),
            },
            None => Resolution {
                to: landed,
                connection: None,
            },
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let policy = if self.exact_finish {
            "exact finish"
        } else {
            "overshoot wins"
        };
        write!(
            f,
            "{rows} x {cols} board, d{die}, {policy}, {count} connections",
            rows = self.rows,
            cols = self.cols,
            die = self.die_sides,
            count = self.connections.len(),
        )?;
        for (index, c) in self.connections.iter().enumerate() {
            write!(
                f,
                "\n  #{index} {kind} {start} -> {end}",
                kind = c.kind.label(),
                start = c.start,
                end = c.end,
            )?;
        }
        Ok(())
    }
}

/// Declarative board layout, the serde boundary for board setup.
///
/// Deserializing a layout never bypasses validation: [`Self::build`] runs
/// the same checks as [`Board::new`] and [`Board::add_connection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub rows: usize,
    pub cols: usize,
    #[serde(default = "BoardConfig::default_die_sides")]
    pub die_sides: u32,
    #[serde(default = "BoardConfig::default_exact_finish")]
    pub exact_finish: bool,
    #[serde(default)]
    pub connections: Vec<ConnectionSpec>,
}

/// One connection entry of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSpec {
    pub start: usize,
    pub end: usize,
}

/// Rejected board layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("connection {start} -> {end}: {source}")]
    Connection {
        start: usize,
        end: usize,
        source: ConnectionError,
    },
}

impl BoardConfig {
    const fn default_die_sides() -> u32 {
        DEFAULT_DIE_SIDES
    }

    const fn default_exact_finish() -> bool {
        true
    }

    /// Build a validated board from the layout.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] for invalid dimensions or the first
    /// rejected connection.
    pub fn build(&self) -> Result<Board, LayoutError> {
        let mut board = Board::new(self.rows, self.cols, self.die_sides, self.exact_finish)?;
        for spec in &self.connections {
            board
                .add_connection(spec.start, spec.end)
                .map_err(|source| LayoutError::Connection {
                    start: spec.start,
                    end: spec.end,
                    source,
                })?;
        }
        Ok(board)
    }
}
