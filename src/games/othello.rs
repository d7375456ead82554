//! # Othello (Reversi) Game Implementation
//!
//! This module implements the classic Othello (also known as Reversi) board
//! game on the standard 8x8 board.
//!
//! ## Rules
//! - A move must "sandwich" at least one opponent disc between the new disc
//!   and an existing disc of the mover's color; every bracketed run flips
//! - If a player has no legal moves, their turn is skipped
//! - Game ends when neither player can move
//! - The side with more discs wins; equal counts draw

use crate::difficulty::{pick_random, roll_blunder, DifficultyProfile};
use crate::search::{best_move, SearchConfig, SearchState};
use crate::{Difficulty, MoveError, Outcome, Player};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Size of the board (8x8).
pub const SIZE: usize = 8;

const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1), (-1, 0), (-1, 1), (0, -1),
    (0, 1), (1, -1), (1, 0), (1, 1),
];

/// Positional weights: corners are decisive, the X- and C-squares beside
/// them are liabilities, edges are mildly good.
const WEIGHTS: [[i32; SIZE]; SIZE] = [
    [100, -40, 20, 5, 5, 20, -40, 100],
    [-40, -60, -5, -5, -5, -5, -60, -40],
    [20, -5, 15, 3, 3, 15, -5, 20],
    [5, -5, 3, 3, 3, 3, -5, 5],
    [5, -5, 3, 3, 3, 3, -5, 5],
    [20, -5, 15, 3, 3, 15, -5, 20],
    [-40, -60, -5, -5, -5, -5, -60, -40],
    [100, -40, 20, 5, 5, 20, -40, 100],
];

/// Empty-square count below which material outweighs position.
const ENDGAME_EMPTIES: usize = 12;

/// Represents a move in Othello
///
/// Contains the row and column coordinates where a player wants to place
/// their disc. Both coordinates are 0-based indices.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OthelloMove {
    pub row: usize,
    pub col: usize,
}

/// Represents the complete state of an Othello game
///
/// [`Player::One`] is Black and moves first. Applying a move never mutates
/// this value; `apply` returns the successor state.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OthelloState {
    board: [[Option<Player>; SIZE]; SIZE],
    to_move: Player,
    winner: Option<Outcome>,
    last_move: Option<(usize, usize)>,
    /// Discs flipped by the last move, for UI highlighting.
    last_flips: Vec<(usize, usize)>,
    moves: Vec<OthelloMove>,
}

impl OthelloState {
    /// Creates a new game with the four starting discs in the center.
    pub fn new() -> Self {
        let mut board = [[None; SIZE]; SIZE];
        let c = SIZE / 2;
        board[c - 1][c - 1] = Some(Player::Two); // White
        board[c - 1][c] = Some(Player::One); // Black
        board[c][c - 1] = Some(Player::One); // Black
        board[c][c] = Some(Player::Two); // White
        Self {
            board,
            to_move: Player::One, // Black starts
            winner: None,
            last_move: None,
            last_flips: Vec::new(),
            moves: Vec::new(),
        }
    }

    /// Gets the disc at a position.
    pub fn get(&self, row: usize, col: usize) -> Option<Player> {
        self.board[row][col]
    }

    /// The player who moves next.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// The result, once neither player can move.
    pub fn winner(&self) -> Option<Outcome> {
        self.winner
    }

    /// Coordinates of the most recently placed disc.
    pub fn last_move(&self) -> Option<(usize, usize)> {
        self.last_move
    }

    /// Discs flipped by the most recent move.
    pub fn last_flips(&self) -> &[(usize, usize)] {
        &self.last_flips
    }

    /// Append-only record of every move applied so far.
    pub fn history(&self) -> &[OthelloMove] {
        &self.moves
    }

    /// Current disc counts as (black, white).
    pub fn counts(&self) -> (usize, usize) {
        let mut black = 0;
        let mut white = 0;
        for row in &self.board {
            for cell in row {
                match cell {
                    Some(Player::One) => black += 1,
                    Some(Player::Two) => white += 1,
                    None => {}
                }
            }
        }
        (black, white)
    }

    /// All legal moves for `player`: empty squares that flip at least one
    /// opponent disc.
    pub fn legal_moves(&self, player: Player) -> Vec<OthelloMove> {
        if player != self.to_move || self.winner.is_some() {
            return Vec::new();
        }
        self.moves_for(player)
    }

    /// Legal placements for `player` regardless of whose turn it is; used
    /// for mobility evaluation and pass detection.
    fn moves_for(&self, player: Player) -> Vec<OthelloMove> {
        let mut moves = Vec::new();
        for row in 0..SIZE {
            for col in 0..SIZE {
                if self.board[row][col].is_none() && !self.flips_for(row, col, player).is_empty() {
                    moves.push(OthelloMove { row, col });
                }
            }
        }
        moves
    }

    /// All opponent discs a placement at (row, col) by `player` would flip.
    ///
    /// A direction contributes its run only when a strictly contiguous run
    /// of opponent discs is terminated by one of `player`'s own discs.
    pub fn flips_for(&self, row: usize, col: usize, player: Player) -> Vec<(usize, usize)> {
        let mut flips = Vec::new();
        let opponent = player.opponent();
        for (dr, dc) in DIRECTIONS {
            let mut run = Vec::new();
            let mut r = row as i32 + dr;
            let mut c = col as i32 + dc;
            while (0..SIZE as i32).contains(&r) && (0..SIZE as i32).contains(&c) {
                match self.board[r as usize][c as usize] {
                    Some(p) if p == opponent => run.push((r as usize, c as usize)),
                    Some(_) => {
                        flips.extend(run);
                        break;
                    }
                    None => break,
                }
                r += dr;
                c += dc;
            }
        }
        flips
    }

    /// Applies a move for `player`, returning the successor state.
    ///
    /// Rejects placements that are out of bounds, on an occupied square, or
    /// that flip nothing. Turn passes back to the mover when the opponent
    /// has no reply; the game ends when neither side can move.
    pub fn apply(&self, mv: OthelloMove, player: Player) -> Result<Self, MoveError> {
        if self.winner.is_some() {
            return Err(MoveError::GameOver);
        }
        if player != self.to_move {
            return Err(MoveError::OutOfTurn);
        }
        if mv.row >= SIZE || mv.col >= SIZE {
            return Err(MoveError::OutOfBounds);
        }
        if self.board[mv.row][mv.col].is_some() {
            return Err(MoveError::Illegal);
        }
        let flips = self.flips_for(mv.row, mv.col, player);
        if flips.is_empty() {
            return Err(MoveError::Illegal);
        }
        Ok(self.apply_with_flips(mv, flips))
    }

    fn apply_unchecked(&self, mv: OthelloMove) -> Self {
        let flips = self.flips_for(mv.row, mv.col, self.to_move);
        self.apply_with_flips(mv, flips)
    }

    fn apply_with_flips(&self, mv: OthelloMove, flips: Vec<(usize, usize)>) -> Self {
        let mut next = self.clone();
        let mover = self.to_move;
        next.board[mv.row][mv.col] = Some(mover);
        for &(r, c) in &flips {
            next.board[r][c] = Some(mover);
        }
        next.last_move = Some((mv.row, mv.col));
        next.last_flips = flips;
        next.moves.push(mv);

        let opponent = mover.opponent();
        if !next.moves_for(opponent).is_empty() {
            next.to_move = opponent;
        } else if !next.moves_for(mover).is_empty() {
            // Opponent passes; the mover goes again.
            next.to_move = mover;
        } else {
            let (black, white) = next.counts();
            next.winner = Some(if black > white {
                Outcome::Win(Player::One)
            } else if white > black {
                Outcome::Win(Player::Two)
            } else {
                Outcome::Draw
            });
        }
        next
    }

    /// Static evaluation combining positional weights, mobility and
    /// material.
    ///
    /// Material is nearly irrelevant in the opening and midgame (greedy
    /// flipping loses discs later), so it is weighted lightly until the
    /// board is nearly full, then dominates.
    pub fn evaluate(&self, perspective: Player) -> i32 {
        let (black, white) = self.counts();
        let empties = SIZE * SIZE - black - white;
        let material = match perspective {
            Player::One => black as i32 - white as i32,
            Player::Two => white as i32 - black as i32,
        };

        let mut positional = 0;
        for row in 0..SIZE {
            for col in 0..SIZE {
                match self.board[row][col] {
                    Some(p) if p == perspective => positional += WEIGHTS[row][col],
                    Some(_) => positional -= WEIGHTS[row][col],
                    None => {}
                }
            }
        }

        let mobility = self.moves_for(perspective).len() as i32
            - self.moves_for(perspective.opponent()).len() as i32;

        if empties <= ENDGAME_EMPTIES {
            material * 100 + positional + mobility * 2
        } else {
            positional + mobility * 8 + material * 2
        }
    }

    /// Selects a move for the AI at the given difficulty, or `None` when
    /// the AI has no legal move (the caller should treat that as a pass).
    pub fn ai_move<R: Rng + ?Sized>(
        &self,
        ai: Player,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Option<OthelloMove> {
        let legal = self.legal_moves(ai);
        if legal.is_empty() {
            return None;
        }

        let profile = DifficultyProfile::othello(difficulty);
        if roll_blunder(rng, profile.blunder_chance) {
            return pick_random(rng, &legal).copied();
        }

        let config = SearchConfig {
            depth: profile.depth,
            width: profile.width,
            jitter: profile.jitter,
        };
        best_move(self, ai, &config, rng).map(|(mv, score)| {
            tracing::debug!(row = mv.row, col = mv.col, score, "othello: searched move");
            mv
        })
    }
}

impl Default for OthelloState {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchState for OthelloState {
    type Move = OthelloMove;

    fn to_move(&self) -> Player {
        self.to_move
    }

    fn legal_moves(&self) -> Vec<OthelloMove> {
        self.legal_moves(self.to_move)
    }

    fn play(&self, mv: &OthelloMove) -> Self {
        self.apply_unchecked(*mv)
    }

    fn outcome(&self) -> Option<Outcome> {
        self.winner
    }

    fn evaluate(&self, perspective: Player) -> i32 {
        self.evaluate(perspective)
    }
}

impl fmt::Display for OthelloState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..SIZE {
            for col in 0..SIZE {
                let symbol = match self.board[row][col] {
                    Some(Player::One) => "B",
                    Some(Player::Two) => "W",
                    None => ".",
                };
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for OthelloMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl FromStr for OthelloMove {
    type Err = String;

    /// Parses a move from `"row,col"` (e.g. `"3,4"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(|p| p.trim()).collect();
        if parts.len() != 2 {
            return Err("Expected format: r,c".to_string());
        }
        let row = parts[0].parse::<usize>().map_err(|e| e.to_string())?;
        let col = parts[1].parse::<usize>().map_err(|e| e.to_string())?;
        Ok(OthelloMove { row, col })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_new_game() {
        let game = OthelloState::new();
        assert_eq!(game.to_move(), Player::One);
        assert_eq!(game.counts(), (2, 2));
        // Black's four classic opening squares.
        let legal = game.legal_moves(Player::One);
        assert_eq!(legal.len(), 4);
        for mv in [
            OthelloMove { row: 2, col: 3 },
            OthelloMove { row: 3, col: 2 },
            OthelloMove { row: 4, col: 5 },
            OthelloMove { row: 5, col: 4 },
        ] {
            assert!(legal.contains(&mv));
        }
    }

    #[test]
    fn test_apply_flips_bracketed_run() {
        let game = OthelloState::new();
        let next = game
            .apply(OthelloMove { row: 2, col: 3 }, Player::One)
            .unwrap();
        assert_eq!(next.get(3, 3), Some(Player::One));
        assert_eq!(next.last_flips(), &[(3, 3)]);
        assert_eq!(next.counts(), (4, 1));
        assert_eq!(next.to_move(), Player::Two);
    }

    #[test]
    fn test_apply_rejects_non_flipping_placement() {
        let game = OthelloState::new();
        assert_eq!(
            game.apply(OthelloMove { row: 0, col: 0 }, Player::One),
            Err(MoveError::Illegal)
        );
        assert_eq!(
            game.apply(OthelloMove { row: 3, col: 3 }, Player::One),
            Err(MoveError::Illegal)
        );
        assert_eq!(
            game.apply(OthelloMove { row: 2, col: 3 }, Player::Two),
            Err(MoveError::OutOfTurn)
        );
    }

    #[test]
    fn test_every_move_adds_exactly_one_disc() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let mut game = OthelloState::new();
        while game.winner().is_none() {
            let mover = game.to_move();
            let (black_before, white_before) = game.counts();
            let Some(mv) = game.ai_move(mover, Difficulty::Easy, &mut rng) else {
                break;
            };
            game = game.apply(mv, mover).unwrap();
            let (black, white) = game.counts();
            assert_eq!(black + white, black_before + white_before + 1);
            assert!(black <= 64 && white <= 64);
        }
    }

    #[test]
    fn test_player_to_move_always_has_a_reply() {
        // Pass-back invariant: while the game is running, to_move always
        // owns at least one legal move.
        let mut game = OthelloState::new();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        while game.winner().is_none() {
            assert!(!game.legal_moves(game.to_move()).is_empty());
            let mover = game.to_move();
            let mv = game.ai_move(mover, Difficulty::Easy, &mut rng).unwrap();
            game = game.apply(mv, mover).unwrap();
        }
    }

    #[test]
    fn test_full_game_ends_with_count_winner() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(8);
        let mut game = OthelloState::new();
        while game.winner().is_none() {
            let mover = game.to_move();
            let mv = game.ai_move(mover, Difficulty::Easy, &mut rng).unwrap();
            game = game.apply(mv, mover).unwrap();
        }
        let (black, white) = game.counts();
        match game.winner().unwrap() {
            Outcome::Win(Player::One) => assert!(black > white),
            Outcome::Win(Player::Two) => assert!(white > black),
            Outcome::Draw => assert_eq!(black, white),
        }
    }

    #[test]
    fn test_corner_outweighs_x_square() {
        let base = OthelloState::new();
        let mut with_corner = base.clone();
        with_corner.board[0][0] = Some(Player::One);
        let mut with_x_square = base.clone();
        with_x_square.board[1][1] = Some(Player::One);
        assert!(with_corner.evaluate(Player::One) > with_x_square.evaluate(Player::One));
        // The X-square is an outright liability.
        assert!(with_x_square.evaluate(Player::One) < base.evaluate(Player::One));
    }

    #[test]
    fn test_move_notation_round_trip() {
        let mv = OthelloMove::from_str("3,4").unwrap();
        assert_eq!(mv, OthelloMove { row: 3, col: 4 });
        assert_eq!(mv.to_string(), "3,4");
        assert!(OthelloMove::from_str("34").is_err());
    }
}
