use alloc::{boxed::Box, collections::VecDeque, vec::Vec};
use core::fmt;
use hashbrown::HashSet;
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - InPlay -> Cleared
/// - InPlay -> Detonated
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardState {
    /// Neither won nor lost yet
    InPlay,
    /// Every safe cell has been opened
    Cleared,
    /// A black hole was clicked
    Detonated,
}

impl BoardState {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cleared | Self::Detonated)
    }

    pub const fn is_cleared(self) -> bool {
        matches!(self, Self::Cleared)
    }

    pub const fn is_detonated(self) -> bool {
        matches!(self, Self::Detonated)
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::InPlay
    }
}

/// Outcome of a successful click
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// One or more safe cells were opened, game goes on
    Revealed,
    /// The click opened the last safe cell
    Cleared,
    /// The click hit a black hole, the whole board is now revealed
    Detonated,
}

impl ClickOutcome {
    pub const fn ends_game(self) -> bool {
        matches!(self, Self::Cleared | Self::Detonated)
    }
}

/// Observer called with the new state on every board state transition.
pub type StateChangeHook = Box<dyn FnMut(BoardState)>;

pub struct Board {
    config: BoardConfig,
    cells: Array2<Cell>,
    graph: AdjacencyGraph,
    remaining_safe: CellCount,
    state: BoardState,
    detonated_at: Option<Coord2>,
    hooks: Vec<StateChangeHook>,
}

impl Board {
    /// Random board of `side * side` cells with `hazards` black holes drawn from `rng`.
    pub fn new<R: Rng>(side: Coord, hazards: CellCount, rng: &mut R) -> Result<Self> {
        let config = BoardConfig::new(side, hazards)?;
        Self::generate(config, RandomPlacer::new(rng))
    }

    /// Board with black holes exactly at `hazards`.
    pub fn from_hazards(side: Coord, hazards: &[Coord2]) -> Result<Self> {
        let count = CellCount::try_from(hazards.len()).unwrap_or(CellCount::MAX);
        let config = BoardConfig::new(side, count)?;
        Self::generate(config, FixedPlacer::new(hazards))
    }

    /// Runs placement, then grid generation, then graph construction.
    pub fn generate(config: BoardConfig, placer: impl HazardPlacer) -> Result<Self> {
        let placement = placer.place(config)?;
        let config = BoardConfig::new(placement.side(), placement.len())?;
        if config.hazards == 0 {
            log::warn!("Board has no black holes, the first click clears it");
        }

        let cells = placement.generate_grid();
        let graph = AdjacencyGraph::build(config.side);
        log::debug!(
            "Board ready: {}x{}, {} black holes, {} safe cells",
            config.side,
            config.side,
            config.hazards,
            config.safe_cells()
        );

        Ok(Self {
            config,
            cells,
            graph,
            remaining_safe: config.safe_cells(),
            state: Default::default(),
            detonated_at: None,
            hooks: Vec::new(),
        })
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn side(&self) -> Coord {
        self.config.side
    }

    pub fn hazard_count(&self) -> CellCount {
        self.config.hazards
    }

    /// Safe cells that still have to be opened to clear the board.
    pub fn remaining_safe(&self) -> CellCount {
        self.remaining_safe
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn win_state(&self) -> bool {
        self.state.is_cleared()
    }

    pub fn lose_state(&self) -> bool {
        self.state.is_detonated()
    }

    /// The black hole whose click lost the game.
    pub fn detonated_at(&self) -> Option<Coord2> {
        self.detonated_at
    }

    pub fn cell(&self, coords: Coord2) -> Option<Cell> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    /// Cell matrix in row order, `[x, y]` indexed.
    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    pub fn graph(&self) -> &AdjacencyGraph {
        &self.graph
    }

    pub fn view(&self) -> BoardView {
        BoardView::from_board(self)
    }

    /// Registers a hook fired, in registration order, on every board state transition.
    pub fn set_on_state_change_hook(&mut self, hook: impl FnMut(BoardState) + 'static) {
        self.hooks.push(Box::new(hook));
    }

    /// Opens the cell at zero-based `(x, y)`.
    ///
    /// Hitting a black hole is not an error: it succeeds with [`ClickOutcome::Detonated`] and
    /// [`Board::lose_state`] turns true.
    pub fn click(&mut self, x: i32, y: i32) -> Result<ClickOutcome> {
        let coords = self.validate_click(x, y)?;
        let cell = self.cells[coords.to_nd_index()];

        if !cell.state.is_closed() {
            return Err(GameError::AlreadyOpened);
        }
        if self.state.is_terminal() {
            return Err(GameError::AlreadyEnded);
        }

        if cell.value.is_hazard() {
            log::debug!("Black hole hit at {:?}", coords);
            self.detonated_at = Some(coords);
            self.reveal_entire_board();
            self.set_state(BoardState::Detonated);
            return Ok(ClickOutcome::Detonated);
        }

        if cell.value.is_void() {
            self.flood_fill(coords);
        } else {
            self.open_cell(coords);
        }

        Ok(if self.state.is_cleared() {
            ClickOutcome::Cleared
        } else {
            ClickOutcome::Revealed
        })
    }

    fn validate_click(&self, x: i32, y: i32) -> Result<Coord2> {
        let side = self.config.side;
        let in_bounds = |v: i32| Coord::try_from(v).ok().filter(|&v| v < side);

        match (in_bounds(x), in_bounds(y)) {
            (Some(x), Some(y)) => Ok((x, y)),
            _ => Err(GameError::OutOfBounds { x, y, side }),
        }
    }

    /// Opens a closed safe cell and counts it, returns whether anything changed.
    fn open_cell(&mut self, coords: Coord2) -> bool {
        let cell = &mut self.cells[coords.to_nd_index()];
        if !cell.state.is_closed() || cell.value.is_hazard() {
            return false;
        }
        cell.state = CellState::Opened;

        self.remaining_safe = self.remaining_safe.saturating_sub(1);
        if self.remaining_safe == 0 {
            self.set_state(BoardState::Cleared);
        }
        true
    }

    /// Breadth-first reveal of the void region around `start`, plus its one cell deep border of
    /// numbered cells. Returns how many cells were opened.
    fn flood_fill(&mut self, start: Coord2) -> CellCount {
        let mut opened = 0;
        let mut visited: HashSet<Coord2> = HashSet::new();
        let mut queue = VecDeque::from([start]);
        log::trace!("Starting flood fill from {:?}", start);

        while let Some(coords) = queue.pop_front() {
            if !visited.insert(coords) {
                continue;
            }

            if self.open_cell(coords) {
                opened += 1;
            }

            let value = self.cells[coords.to_nd_index()].value;
            log::trace!("Flood visited cell at {:?}, value: {:?}", coords, value);

            // numbered cells are the border of the region
            if !value.is_void() {
                continue;
            }

            queue.extend(
                self.graph
                    .neighbors(coords)
                    .iter()
                    .copied()
                    .filter(|pos| !visited.contains(pos))
                    .filter(|&pos| !self.cells[pos.to_nd_index()].value.is_hazard()),
            );
        }

        log::debug!("Flood fill from {:?} opened {} cells", start, opened);
        opened
    }

    /// Opens every safe cell and marks every black hole, without touching the safe counter.
    fn reveal_entire_board(&mut self) {
        for cell in self.cells.iter_mut() {
            if cell.value.is_hazard() {
                cell.state = CellState::Detonated;
            } else if cell.state.is_closed() {
                cell.state = CellState::Opened;
            }
        }
    }

    fn set_state(&mut self, state: BoardState) {
        if self.state.is_terminal() || self.state == state {
            return;
        }

        log::debug!("Board state {:?} -> {:?}", self.state, state);
        self.state = state;
        for hook in self.hooks.iter_mut() {
            hook(state);
        }
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("remaining_safe", &self.remaining_safe)
            .field("detonated_at", &self.detonated_at)
            .field("hooks", &self.hooks.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn board(side: Coord, hazards: &[Coord2]) -> Board {
        Board::from_hazards(side, hazards).unwrap()
    }

    fn states(board: &Board) -> Array2<CellState> {
        board.cells().map(|cell| cell.state)
    }

    fn record_transitions(board: &mut Board) -> Rc<RefCell<Vec<BoardState>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        board.set_on_state_change_hook(move |state| sink.borrow_mut().push(state));
        seen
    }

    #[test]
    fn example_board_values() {
        let board = board(3, &[(0, 1)]);

        assert_eq!(board.cell((0, 0)).unwrap().value, CellValue::Proximity(1));
        assert_eq!(board.cell((1, 1)).unwrap().value, CellValue::Proximity(1));
        assert_eq!(board.cell((2, 0)).unwrap().value, CellValue::Void);
        assert_eq!(board.cell((0, 1)).unwrap().value, CellValue::Hazard);
        assert_eq!(board.remaining_safe(), 8);
    }

    #[test]
    fn click_on_void_opens_connected_region() {
        use CellState::*;
        let mut board = board(3, &[(0, 1)]);

        assert_eq!(board.click(2, 2), Ok(ClickOutcome::Revealed));

        let expected = Array2::from_shape_vec(
            [3, 3],
            vec![
                Closed, Closed, Closed, //
                Opened, Opened, Opened, //
                Opened, Opened, Opened,
            ],
        )
        .unwrap();
        assert_eq!(states(&board), expected);
        assert_eq!(board.remaining_safe(), 2);
        assert_eq!(board.state(), BoardState::InPlay);
    }

    #[test]
    fn click_on_numbered_cell_opens_only_that_cell() {
        let mut board = board(3, &[(0, 1), (2, 2)]);

        assert_eq!(board.cell((1, 2)).unwrap().value, CellValue::Proximity(2));
        assert_eq!(board.click(1, 2), Ok(ClickOutcome::Revealed));

        let opened: Vec<_> = board
            .cells()
            .indexed_iter()
            .filter(|(_, cell)| cell.state == CellState::Opened)
            .map(|(pos, _)| pos)
            .collect();
        assert_eq!(opened, [(1, 2)]);
        assert_eq!(board.remaining_safe(), 6);
    }

    #[test]
    fn flood_fill_does_not_open_diagonal_border() {
        // (1, 1) counts as a neighbor of (0, 0) for proximity, but flood fill only walks
        // orthogonal edges, so it stays closed
        let mut board = board(4, &[(0, 2), (1, 2), (2, 0), (2, 1)]);
        assert_eq!(board.cell((0, 0)).unwrap().value, CellValue::Void);
        assert_eq!(board.cell((1, 1)).unwrap().value, CellValue::Proximity(4));
        assert_eq!(board.cell((3, 3)).unwrap().value, CellValue::Void);

        assert_eq!(board.click(0, 0), Ok(ClickOutcome::Revealed));

        let opened: Vec<_> = board
            .cells()
            .indexed_iter()
            .filter(|(_, cell)| cell.state == CellState::Opened)
            .map(|(pos, _)| pos)
            .collect();
        assert_eq!(opened, [(0, 0), (0, 1), (1, 0)]);
        assert_eq!(board.cell((1, 1)).unwrap().state, CellState::Closed);
        assert_eq!(board.cell((3, 3)).unwrap().state, CellState::Closed);
    }

    #[test]
    fn flood_fill_never_opens_hazards() {
        let mut rng = SmallRng::seed_from_u64(3);

        for _ in 0..20 {
            let mut board = Board::new(8, 10, &mut rng).unwrap();
            let void = board
                .cells()
                .indexed_iter()
                .find(|(_, cell)| cell.value.is_void())
                .map(|((x, y), _)| (x as i32, y as i32));
            let Some((x, y)) = void else { continue };

            board.click(x, y).unwrap();
            assert!(board.cells().iter().all(|cell| {
                !(cell.value.is_hazard() && cell.state != CellState::Closed)
            }));
        }
    }

    #[test]
    fn flood_fill_opens_reachable_void_region_and_border() {
        let hazards = [(0, 3), (2, 1), (4, 4), (5, 0)];
        let mut board = board(6, &hazards);
        board.click(0, 0).unwrap();

        // expected set: void cells reachable orthogonally through void cells, plus their
        // orthogonal non-hazard border
        let mut region = HashSet::new();
        let mut queue = VecDeque::from([(0u16, 0u16)]);
        while let Some(pos) = queue.pop_front() {
            if !region.insert(pos) {
                continue;
            }
            if board.cell(pos).unwrap().value.is_void() {
                queue.extend(board.graph().neighbors(pos).iter().copied());
            }
        }

        for ((x, y), cell) in board.cells().indexed_iter() {
            let pos = (x as Coord, y as Coord);
            let expected = if region.contains(&pos) {
                CellState::Opened
            } else {
                CellState::Closed
            };
            assert_eq!(cell.state, expected, "{pos:?}");
        }
    }

    #[test]
    fn clicking_hazard_reveals_everything() {
        use CellState::*;
        let mut board = board(3, &[(0, 1), (2, 2)]);
        let seen = record_transitions(&mut board);

        assert_eq!(board.click(0, 1), Ok(ClickOutcome::Detonated));

        let expected = Array2::from_shape_vec(
            [3, 3],
            vec![
                Opened, Detonated, Opened, //
                Opened, Opened, Opened, //
                Opened, Opened, Detonated,
            ],
        )
        .unwrap();
        assert_eq!(states(&board), expected);
        assert!(board.lose_state());
        assert!(!board.win_state());
        assert_eq!(board.detonated_at(), Some((0, 1)));
        assert_eq!(*seen.borrow(), [BoardState::Detonated]);
    }

    #[test]
    fn opening_every_safe_cell_wins() {
        let mut board = board(3, &[(0, 1)]);
        let seen = record_transitions(&mut board);

        assert_eq!(board.click(2, 2), Ok(ClickOutcome::Revealed));
        assert_eq!(board.click(0, 0), Ok(ClickOutcome::Revealed));
        assert!(seen.borrow().is_empty());
        assert_eq!(board.click(0, 2), Ok(ClickOutcome::Cleared));

        assert!(board.win_state());
        assert!(!board.lose_state());
        assert_eq!(board.remaining_safe(), 0);
        assert_eq!(*seen.borrow(), [BoardState::Cleared]);

        // the last closed cell is a black hole, the board stays cleared
        assert_eq!(board.click(0, 1), Err(GameError::AlreadyEnded));
        assert!(board.win_state());
        assert_eq!(*seen.borrow(), [BoardState::Cleared]);
    }

    #[test]
    fn flood_fill_counts_cells_opened_earlier_only_once() {
        let mut board = board(3, &[(0, 1)]);

        // border cell first, then the void region that contains it
        board.click(1, 1).unwrap();
        assert_eq!(board.remaining_safe(), 7);
        board.click(2, 0).unwrap();
        assert_eq!(board.remaining_safe(), 2);
    }

    #[test]
    fn second_click_on_same_cell_is_rejected_without_side_effects() {
        let mut board = board(3, &[(0, 1)]);
        board.click(1, 1).unwrap();
        let seen = record_transitions(&mut board);
        let before = states(&board);

        assert_eq!(board.click(1, 1), Err(GameError::AlreadyOpened));
        assert_eq!(states(&board), before);
        assert_eq!(board.remaining_safe(), 7);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn clicks_after_loss_report_already_opened() {
        let mut board = board(3, &[(0, 1)]);
        board.click(0, 1).unwrap();

        assert_eq!(board.click(2, 2), Err(GameError::AlreadyOpened));
        assert_eq!(board.click(0, 1), Err(GameError::AlreadyOpened));
    }

    #[test]
    fn out_of_bounds_checks_each_coordinate() {
        let mut board = board(3, &[(0, 1)]);

        for (x, y) in [(3, 0), (0, 3), (-1, 0), (0, -1), (5, 2)] {
            assert_eq!(
                board.click(x, y),
                Err(GameError::OutOfBounds { x, y, side: 3 })
            );
        }
        assert_eq!(board.remaining_safe(), 8);
    }

    #[test]
    fn out_of_bounds_message_names_click_and_bounds() {
        use alloc::string::ToString;

        let mut board = board(3, &[(0, 1)]);
        let err = board.click(5, 2).unwrap_err();

        assert_eq!(
            err.to_string(),
            "click coordinate [5 2] is out of board bounds 3 x 3"
        );
    }

    #[test]
    fn hooks_fire_in_registration_order() {
        let mut board = board(2, &[(0, 0)]);
        let order = Rc::new(RefCell::new(Vec::new()));
        for id in 0..3 {
            let order = Rc::clone(&order);
            board.set_on_state_change_hook(move |state| order.borrow_mut().push((id, state)));
        }

        board.click(1, 1).unwrap();
        board.click(0, 1).unwrap();
        assert!(order.borrow().is_empty());
        assert_eq!(board.click(1, 0), Ok(ClickOutcome::Cleared));

        assert_eq!(
            *order.borrow(),
            [
                (0, BoardState::Cleared),
                (1, BoardState::Cleared),
                (2, BoardState::Cleared)
            ]
        );
    }

    #[test]
    fn board_without_hazards_clears_on_first_click() {
        let mut board = board(4, &[]);

        assert_eq!(board.click(2, 1), Ok(ClickOutcome::Cleared));
        assert!(board.cells().iter().all(|cell| cell.state == CellState::Opened));
    }

    #[test]
    fn construction_errors() {
        let mut rng = SmallRng::seed_from_u64(0);

        assert_eq!(
            Board::new(3, 10, &mut rng).unwrap_err(),
            GameError::TooManyHazards {
                requested: 10,
                capacity: 9
            }
        );
        assert_eq!(
            Board::new(0, 0, &mut rng).unwrap_err(),
            GameError::InvalidSideLength
        );
        assert_eq!(
            Board::from_hazards(3, &[(1, 1), (1, 1)]).unwrap_err(),
            GameError::DuplicateHazard { x: 1, y: 1 }
        );
    }

    #[test]
    fn random_board_clears_when_all_safe_cells_are_clicked() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut board = Board::new(6, 8, &mut rng).unwrap();
        assert_eq!(board.remaining_safe(), 28);

        let safe: Vec<_> = board
            .cells()
            .indexed_iter()
            .filter(|(_, cell)| !cell.value.is_hazard())
            .map(|((x, y), _)| (x as i32, y as i32))
            .collect();

        for (x, y) in safe {
            match board.click(x, y) {
                Ok(_) | Err(GameError::AlreadyOpened) => {}
                Err(err) => panic!("unexpected error {err:?}"),
            }
            assert!(!board.lose_state());
        }

        assert!(board.win_state());
        assert_eq!(board.remaining_safe(), 0);
    }
}
