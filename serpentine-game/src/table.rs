//! Precomputed move table for the simulation hot loop.

use crate::board::{Board, Resolution};

/// Dense `(cell, face)` lookup of fully resolved moves.
///
/// Built once per finished board; one entry per cell and die face, each
/// the cached result of [`Board::resolve_cell`]. Lookups and the direct
/// computation agree bit-for-bit, so the per-roll branching (overshoot
/// policy plus connection hop) is paid once at build time instead of
/// rolls-times-games in the batch loop. The table goes stale if the board
/// gains connections afterward; callers rebuild before simulating.
#[derive(Debug, Clone)]
pub struct MoveTable {
    total_cells: usize,
    die_sides: u32,
    entries: Vec<Resolution>,
}

impl MoveTable {
    /// Precompute every `(cell, face)` resolution for the board.
    #[must_use]
    pub fn build(board: &Board) -> Self {
        let total_cells = board.total_cells();
        let die_sides = board.die_sides();
        let mut entries = Vec::with_capacity(total_cells * die_sides as usize);
        for cell in 0..total_cells {
            for face in 1..=die_sides {
                entries.push(board.resolve_cell(cell, face));
            }
        }
        Self {
            total_cells,
            die_sides,
            entries,
        }
    }

    /// Cached resolution for a cell and die face.
    ///
    /// Returns `None` outside the table's domain (off-board positions,
    /// faces outside `1..=die_sides`); callers fall back to
    /// [`Board::advance`] for those.
    #[must_use]
    pub fn get(&self, cell: usize, face: u32) -> Option<Resolution> {
        if cell >= self.total_cells || face == 0 || face > self.die_sides {
            return None;
        }
        let index = cell * self.die_sides as usize + (face as usize - 1);
        self.entries.get(index).copied()
    }

    #[must_use]
    pub const fn total_cells(&self) -> usize {
        self.total_cells
    }

    #[must_use]
    pub const fn die_sides(&self) -> u32 {
        self.die_sides
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;

    #[test]
    fn table_matches_direct_resolution() {
        let mut board = Board::new(10, 10, 6, true).expect("valid board");
        board.add_connection(1, 38).expect("ladder");
        board.add_connection(93, 3).expect("snake");
        let table = MoveTable::build(&board);
        for cell in 0..board.total_cells() {
            for face in 1..=board.die_sides() {
                assert_eq!(
                    table.get(cell, face),
                    Some(board.resolve_cell(cell, face)),
                    "table diverged at cell {cell}, face {face}"
                );
            }
        }
    }

    #[test]
    fn out_of_domain_lookups_return_none() {
        let board = Board::new(2, 2, 4, true).expect("valid board");
        let table = MoveTable::build(&board);
        assert_eq!(table.get(4, 1), None);
        assert_eq!(table.get(0, 0), None);
        assert_eq!(table.get(0, 5), None);
    }

    #[test]
    fn entries_bake_in_the_connection_hop() {
        let mut board = Board::new(1, 10, 6, true).expect("valid board");
        board.add_connection(3, 7).expect("ladder");
        let table = MoveTable::build(&board);
        let resolution = table.get(0, 3).expect("in domain");
        assert_eq!(resolution.to, 7);
        assert_eq!(resolution.connection, Some(0));
        // the hop target itself resolves as a plain cell
        assert_eq!(
            board.advance(Position::At(7), 1).position,
            Position::At(8)
        );
    }
}
