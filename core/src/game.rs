use alloc::{boxed::Box, rc::Rc};
use core::cell::Cell as StateCell;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a game loop needs from a board, so it can be driven by a substitute in tests.
pub trait Playground {
    fn click(&mut self, x: i32, y: i32) -> Result<ClickOutcome>;
    fn view(&self) -> BoardView;
    fn win_state(&self) -> bool;
    fn lose_state(&self) -> bool;
    fn set_on_state_change_hook(&mut self, hook: StateChangeHook);
}

impl Playground for Board {
    fn click(&mut self, x: i32, y: i32) -> Result<ClickOutcome> {
        Board::click(self, x, y)
    }

    fn view(&self) -> BoardView {
        Board::view(self)
    }

    fn win_state(&self) -> bool {
        Board::win_state(self)
    }

    fn lose_state(&self) -> bool {
        Board::lose_state(self)
    }

    fn set_on_state_change_hook(&mut self, hook: StateChangeHook) {
        Board::set_on_state_change_hook(self, hook)
    }
}

/// Valid transitions:
/// - InProgress -> Win
/// - InProgress -> Lose
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Implicit until the board is cleared or detonated
    InProgress,
    Win,
    Lose,
}

impl GameState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Win | Self::Lose)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::InProgress
    }
}

/// A session over a [`Playground`], tracking the outcome through its state change hook.
#[derive(Debug)]
pub struct Game<P> {
    playground: P,
    state: Rc<StateCell<GameState>>,
}

impl<P: Playground> Game<P> {
    pub fn new(mut playground: P) -> Self {
        let state = Rc::new(StateCell::new(GameState::default()));

        let observed = Rc::clone(&state);
        playground.set_on_state_change_hook(Box::new(move |board_state| {
            let next = match board_state {
                BoardState::Detonated => GameState::Lose,
                BoardState::Cleared => GameState::Win,
                BoardState::InPlay => return,
            };
            log::debug!("Game finished: {:?}", next);
            observed.set(next);
        }));

        Self { playground, state }
    }

    pub fn state(&self) -> GameState {
        self.state.get()
    }

    pub fn is_finished(&self) -> bool {
        self.state().is_finished()
    }

    pub fn click(&mut self, x: i32, y: i32) -> Result<ClickOutcome> {
        self.playground.click(x, y)
    }

    pub fn view(&self) -> BoardView {
        self.playground.view()
    }

    pub fn playground(&self) -> &P {
        &self.playground
    }

    pub fn into_playground(self) -> P {
        self.playground
    }
}
