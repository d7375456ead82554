//! # Game Implementations Module
//!
//! One module per supported game. Each game exposes the same surface:
//! - a state type with an initial-position constructor,
//! - `legal_moves` / `apply` (pure, returning a fresh state or a
//!   [`crate::MoveError`]),
//! - terminal/winner detection maintained by `apply`,
//! - an `ai_move` entry point selecting a move for a
//!   [`crate::Difficulty`] using the injected random generator.
//!
//! ## Supported Games
//! - **Connect Four**: gravity-based 4-in-a-row on a 6x7 grid
//! - **Othello (Reversi)**: 8x8 piece-flipping territory game
//! - **Checkers**: 8x8 draughts with mandatory multi-captures and kings
//! - **Omok**: five-in-a-row on 19x19 with Renju forbidden moves for Black
//! - **Mancala**: 6-pit sowing game with extra turns and captures
//! - **Battleship**: 10x10 salvo game with a hunt/target AI memory
//! - **Dots and Boxes**: 4x4 boxes with chain-aware play
//!
//! ## Adding New Games
//! To add a game, create a new module with:
//! 1. A move type (plus `Display`/`FromStr` notation)
//! 2. A state type whose `apply` enforces the rules and maintains `winner`
//! 3. A [`crate::SearchState`] implementation and an evaluation heuristic
//! 4. An `ai_move` wrapper wiring detectors, difficulty and search together

pub mod battleship;
pub mod checkers;
pub mod connect_four;
pub mod dots_and_boxes;
pub mod mancala;
pub mod omok;
pub mod othello;
