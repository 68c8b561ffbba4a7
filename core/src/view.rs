use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::*;

/// Read-only snapshot of a board for presentation layers.
///
/// Every cell carries both its value and its state, so a renderer can draw the player view
/// (see [`Cell::icon`]) as well as the full answer grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub config: BoardConfig,
    pub state: BoardState,
    pub remaining_safe: CellCount,
    pub cells: Array2<Cell>,
}

impl BoardView {
    pub fn from_board(board: &Board) -> Self {
        Self {
            config: board.config(),
            state: board.state(),
            remaining_safe: board.remaining_safe(),
            cells: board.cells().clone(),
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    /// Rows in printing order, `x` ascending.
    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, Cell>> {
        self.cells.outer_iter()
    }
}
