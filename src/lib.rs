//! # Multi-Game Minimax Arena
//!
//! A family of rule engines and difficulty-tiered computer opponents for
//! seven classic two-player board games: Connect Four, Othello (Reversi),
//! Checkers, Omok (Gomoku with Renju forbidden moves), Mancala, Battleship
//! and Dots and Boxes.
//!
//! ## Architecture
//! - Each game lives in its own module under [`games`] and exposes the same
//!   surface: an initial-state constructor, a legal-move generator, a pure
//!   apply-move operation producing a fresh state, and an `ai_move` entry
//!   point that selects a move for the requested [`Difficulty`].
//! - The shared adversarial search lives in [`search`]: depth-bounded
//!   minimax with alpha-beta pruning over the [`SearchState`] trait, which
//!   every game state implements.
//! - Cheap game-specific detectors (Omok threat ladder, Battleship
//!   hunt/target machine, Dots and Boxes chain analysis) run before the
//!   search so a single AI call stays within interactive latency.
//!
//! ## Determinism
//! The crate performs no I/O, never reads the clock, and keeps no global
//! state. The only source of nondeterminism is the random generator the
//! caller injects into `ai_move`; seed it (e.g. with
//! `rand_xoshiro::Xoshiro256PlusPlus`) to make every decision reproducible.
//!
//! ```
//! use arena::{games::connect_four::ConnectFourState, Difficulty, Player};
//! use rand::SeedableRng;
//!
//! let state = ConnectFourState::new();
//! let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(7);
//! let mv = state.ai_move(Player::One, Difficulty::Hard, &mut rng);
//! assert!(mv.is_some());
//! ```

pub mod difficulty;
pub mod games;
pub mod search;

pub use difficulty::{Difficulty, DifficultyProfile};
pub use search::SearchState;

use std::fmt;

/// One of the two players in any game.
///
/// Game modules map the tags onto their own color names: `One` is Black in
/// Omok and Othello, Red in Connect Four, and the first (bottom) side in
/// Mancala and Checkers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Returns the other player.
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "player 1"),
            Player::Two => write!(f, "player 2"),
        }
    }
}

/// The result of a finished game.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Win(Player),
    Draw,
}

impl Outcome {
    /// The winning player, if the game was not a draw.
    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::Win(p) => Some(p),
            Outcome::Draw => None,
        }
    }
}

/// Why a submitted move was rejected.
///
/// Every `apply` operation returns `Result<State, MoveError>`; a rejected
/// move leaves the caller's state untouched. Nothing in the crate panics on
/// illegal input.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveError {
    #[error("it is not that player's turn")]
    OutOfTurn,
    #[error("the game is already decided")]
    GameOver,
    #[error("coordinates are outside the board")]
    OutOfBounds,
    #[error("the move is not legal in this position")]
    Illegal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_is_involutive() {
        assert_eq!(Player::One.opponent(), Player::Two);
        assert_eq!(Player::Two.opponent(), Player::One);
        assert_eq!(Player::One.opponent().opponent(), Player::One);
    }

    #[test]
    fn test_outcome_winner() {
        assert_eq!(Outcome::Win(Player::Two).winner(), Some(Player::Two));
        assert_eq!(Outcome::Draw.winner(), None);
    }

    #[test]
    fn test_move_error_display() {
        assert_eq!(MoveError::OutOfTurn.to_string(), "it is not that player's turn");
        assert_eq!(MoveError::GameOver.to_string(), "the game is already decided");
    }
}
