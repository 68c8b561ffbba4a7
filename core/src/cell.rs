use core::fmt;
use serde::{Deserialize, Serialize};

/// What a cell holds, fixed once the grid is generated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellValue {
    /// No black hole in any of the 8 surrounding cells.
    Void,
    /// Number of black holes (1..=8) in the 8 surrounding cells.
    Proximity(u8),
    /// A black hole.
    Hazard,
}

impl CellValue {
    pub const fn from_count(count: u8) -> Self {
        if count == 0 {
            Self::Void
        } else {
            Self::Proximity(count)
        }
    }

    pub const fn is_hazard(self) -> bool {
        matches!(self, Self::Hazard)
    }

    pub const fn is_void(self) -> bool {
        matches!(self, Self::Void)
    }

    /// Safe cell that borders at least one black hole, where flood fill stops.
    pub const fn is_touching_hazards(self) -> bool {
        matches!(self, Self::Proximity(_))
    }

    /// Proximity count of a safe cell, `None` for a black hole.
    pub const fn count(self) -> Option<u8> {
        match self {
            Self::Void => Some(0),
            Self::Proximity(count) => Some(count),
            Self::Hazard => None,
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::Void
    }
}

/// Player-visible state of a cell, only ever moves away from `Closed`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Closed,
    Opened,
    /// Black hole shown after the board was lost.
    Detonated,
}

impl CellState {
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Closed
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
    pub state: CellState,
}

impl Cell {
    pub const fn new(value: CellValue) -> Self {
        Self {
            value,
            state: CellState::Closed,
        }
    }

    /// Single character view of the cell as a player sees it.
    pub fn icon(self) -> char {
        match (self.state, self.value) {
            (CellState::Closed, _) => 'c',
            (CellState::Detonated, _) | (CellState::Opened, CellValue::Hazard) => 'H',
            (CellState::Opened, CellValue::Void) => '0',
            (CellState::Opened, CellValue::Proximity(count)) => {
                char::from_digit(count.into(), 10).unwrap_or('?')
            }
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.icon())
    }
}
