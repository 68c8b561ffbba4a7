use alloc::vec::Vec;
use hashbrown::HashSet;
use rand::Rng;

use super::*;

/// Uniform placement by rejection sampling: draw `(x, y)` until enough distinct cells were hit.
///
/// Draws are independent, nothing keeps black holes apart so clusters can happen. The random
/// source is borrowed so one generator can serve every board of a process, and tests can hand
/// in a seeded one.
#[derive(Debug)]
pub struct RandomPlacer<'r, R> {
    rng: &'r mut R,
}

impl<'r, R: Rng> RandomPlacer<'r, R> {
    pub fn new(rng: &'r mut R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> HazardPlacer for RandomPlacer<'_, R> {
    fn place(self, config: BoardConfig) -> Result<HazardPlacement> {
        let BoardConfig { side, hazards } = BoardConfig::new(config.side, config.hazards)?;

        // sampling a full board would only be waiting on the last few misses
        if hazards == config.total_cells() {
            log::warn!(
                "Board is full of black holes, every one of the {} cells is a hazard",
                hazards
            );
            let all = (0..side)
                .flat_map(|x| (0..side).map(move |y| (x, y)))
                .collect();
            return Ok(HazardPlacement::new_unchecked(side, all));
        }

        let rng = self.rng;
        let target = hazards as usize;
        let mut occupied: HashSet<Coord2> = HashSet::with_capacity(target);
        let mut coords = Vec::with_capacity(target);
        let mut draws: u64 = 0;

        while coords.len() < target {
            let pos = (rng.random_range(0..side), rng.random_range(0..side));
            draws += 1;
            if occupied.insert(pos) {
                coords.push(pos);
            }
        }

        log::debug!(
            "Placed {} black holes on a {}x{} board in {} draws",
            coords.len(),
            side,
            side,
            draws
        );
        Ok(HazardPlacement::new_unchecked(side, coords))
    }
}
