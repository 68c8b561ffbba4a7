use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Strategy that decides where the black holes of a board go.
pub trait HazardPlacer {
    fn place(self, config: BoardConfig) -> Result<HazardPlacement>;
}
