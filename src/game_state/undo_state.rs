use std::ops::{Deref, DerefMut};

use crate::game_state::chess_types::*;

/// A move that has been applied to a borrowed `GameState` and is undone when
/// this guard goes out of scope, on every exit path.
///
/// The guard derefs to the position so nested search can keep applying moves
/// through it; nested guards drop first, which keeps undo in LIFO order.
#[derive(Debug)]
pub struct AppliedMove<'a> {
    game_state: &'a mut GameState,
    mv: Move,
}

impl<'a> AppliedMove<'a> {
    pub(crate) fn new(game_state: &'a mut GameState, mv: Move) -> Self {
        Self { game_state, mv }
    }
}

impl Deref for AppliedMove<'_> {
    type Target = GameState;

    fn deref(&self) -> &GameState {
        self.game_state
    }
}

impl DerefMut for AppliedMove<'_> {
    fn deref_mut(&mut self) -> &mut GameState {
        self.game_state
    }
}

impl Drop for AppliedMove<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.game_state.undo_move(&self.mv) {
            log::error!("failed to undo {:?}: {err}", self.mv);
        }
    }
}
