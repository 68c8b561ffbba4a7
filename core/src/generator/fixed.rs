use hashbrown::HashSet;

use super::*;

/// Places black holes at explicitly given coordinates, for replays and hand-made layouts.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixedPlacer<'a> {
    coords: &'a [Coord2],
}

impl<'a> FixedPlacer<'a> {
    pub fn new(coords: &'a [Coord2]) -> Self {
        Self { coords }
    }
}

impl HazardPlacer for FixedPlacer<'_> {
    /// Only `config.side` is used, the count comes from the coordinate list.
    fn place(self, config: BoardConfig) -> Result<HazardPlacement> {
        let side = config.side;
        let mut seen: HashSet<Coord2> = HashSet::with_capacity(self.coords.len());

        for &(x, y) in self.coords {
            if x >= side || y >= side {
                return Err(GameError::InvalidCoords { x, y });
            }
            if !seen.insert((x, y)) {
                return Err(GameError::DuplicateHazard { x, y });
            }
        }

        if CellCount::try_from(self.coords.len()).ok() != Some(config.hazards) {
            log::debug!(
                "Fixed layout has {} black holes, config asked for {}",
                self.coords.len(),
                config.hazards
            );
        }

        Ok(HazardPlacement::new_unchecked(side, self.coords.to_vec()))
    }
}
