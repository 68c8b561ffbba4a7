#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use game::*;
pub use generator::*;
pub use graph::*;
pub use types::*;
pub use view::*;

mod board;
mod cell;
mod error;
mod game;
mod generator;
mod graph;
mod types;
mod view;

/// Dimensions of a square board and how many black holes it hides.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub side: Coord,
    pub hazards: CellCount,
}

impl BoardConfig {
    pub const fn new_unchecked(side: Coord, hazards: CellCount) -> Self {
        Self { side, hazards }
    }

    pub fn new(side: Coord, hazards: CellCount) -> Result<Self> {
        if side == 0 {
            return Err(GameError::InvalidSideLength);
        }
        let capacity = mult(side, side);
        if hazards > capacity {
            return Err(GameError::TooManyHazards {
                requested: hazards,
                capacity,
            });
        }
        Ok(Self::new_unchecked(side, hazards))
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.side, self.side)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.hazards)
    }
}

/// Distinct black hole coordinates chosen before the grid is populated.
#[derive(Clone, Debug, PartialEq)]
pub struct HazardPlacement {
    side: Coord,
    coords: Vec<Coord2>,
    mask: Array2<bool>,
}

impl HazardPlacement {
    /// Callers guarantee that every coordinate is in bounds and listed once.
    pub(crate) fn new_unchecked(side: Coord, coords: Vec<Coord2>) -> Self {
        let mut mask: Array2<bool> = Array2::default((side, side).to_nd_index());
        for &pos in &coords {
            mask[pos.to_nd_index()] = true;
        }
        Self { side, coords, mask }
    }

    pub fn side(&self) -> Coord {
        self.side
    }

    /// Coordinates in the order they were placed.
    pub fn coords(&self) -> &[Coord2] {
        &self.coords
    }

    pub fn len(&self) -> CellCount {
        // bounded by side * side, see `new_unchecked`
        self.coords.len() as CellCount
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.mask
            .get(coords.to_nd_index())
            .copied()
            .unwrap_or(false)
    }

    /// Black holes in the Moore neighborhood of `coords`, never counting `coords` itself.
    pub fn adjacent_hazard_count(&self, coords: Coord2) -> u8 {
        let count = Neighborhood::Moore
            .iter(coords, self.side)
            .filter(|&pos| self[pos])
            .count();
        // at most 8 neighbors
        count as u8
    }

    /// Builds the cell matrix: black holes where placed, proximity counts everywhere else.
    pub fn generate_grid(&self) -> Array2<Cell> {
        Array2::from_shape_fn(self.mask.raw_dim(), |(x, y)| {
            let coords = (x as Coord, y as Coord);
            if self[coords] {
                Cell::new(CellValue::Hazard)
            } else {
                Cell::new(CellValue::from_count(self.adjacent_hazard_count(coords)))
            }
        })
    }
}

impl Index<Coord2> for HazardPlacement {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mask[coords.to_nd_index()]
    }
}
