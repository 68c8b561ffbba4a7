use serde::{Deserialize, Serialize};

/// Single coordinate axis, used for the board side length and positions.
pub type Coord = u16;

/// Count type used for hazard counts and total-cell counts.
pub type CellCount = u32;

/// Two-dimensional coordinates `(x, y)`, `x` being the row.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

/// Number of cells in a `a` by `b` grid, cannot overflow for any pair of `Coord`.
pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Which cells count as neighbors of a given cell.
///
/// Proximity counts use [`Neighborhood::Moore`] while flood fill travels over
/// [`Neighborhood::Orthogonal`]; the two are not interchangeable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Neighborhood {
    /// All 8 surrounding cells, diagonals included.
    Moore,
    /// Up, down, left and right only.
    Orthogonal,
}

const MOORE_DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const ORTHOGONAL_DISPLACEMENTS: [(isize, isize); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

impl Neighborhood {
    pub const fn displacements(self) -> &'static [(isize, isize)] {
        match self {
            Self::Moore => &MOORE_DISPLACEMENTS,
            Self::Orthogonal => &ORTHOGONAL_DISPLACEMENTS,
        }
    }

    /// Iterate the in-bounds neighbors of `center` on a square grid of `side` cells.
    pub fn iter(self, center: Coord2, side: Coord) -> NeighborIter {
        NeighborIter::new(center, (side, side), self.displacements())
    }
}

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (isize, isize), bounds: Coord2) -> Option<Coord2> {
    let (x, y) = coords;
    let (dx, dy) = delta;
    let (max_x, max_y) = bounds;

    let next_x = x.checked_add_signed(dx.try_into().ok()?)?;
    if next_x >= max_x {
        return None;
    }

    let next_y = y.checked_add_signed(dy.try_into().ok()?)?;
    if next_y >= max_y {
        return None;
    }

    Some((next_x, next_y))
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    displacements: &'static [(isize, isize)],
    index: usize,
}

impl NeighborIter {
    fn new(center: Coord2, bounds: Coord2, displacements: &'static [(isize, isize)]) -> Self {
        Self {
            center,
            bounds,
            displacements,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&delta) = self.displacements.get(self.index) {
            self.index += 1;
            if let Some(next_item) = apply_delta(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
        None
    }
}
