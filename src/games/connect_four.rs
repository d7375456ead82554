//! # Connect Four Game Implementation
//!
//! This module implements the classic Connect Four board game.
//! Players take turns dropping pieces into columns, trying to get 4 pieces
//! in a row (horizontally, vertically, or diagonally).
//!
//! ## Rules
//! - Players alternate dropping pieces into columns
//! - Pieces fall to the lowest available spot in the column due to gravity
//! - First player to get 4 pieces in a row wins
//! - Game is a draw if the board fills up with no winner

use crate::difficulty::{pick_random, roll_blunder, DifficultyProfile};
use crate::search::{best_move, SearchConfig, SearchState};
use crate::{Difficulty, MoveError, Outcome, Player};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Number of rows on the board. Row 0 is the top.
pub const ROWS: usize = 6;
/// Number of columns on the board.
pub const COLS: usize = 7;

const CONNECT: usize = 4;

/// Positional weights rewarding central columns, where more winning lines
/// cross.
const WEIGHTS: [[i32; COLS]; ROWS] = [
    [3, 4, 5, 7, 5, 4, 3],
    [4, 6, 8, 10, 8, 6, 4],
    [5, 8, 11, 13, 11, 8, 5],
    [5, 8, 11, 13, 11, 8, 5],
    [4, 6, 8, 10, 8, 6, 4],
    [3, 4, 5, 7, 5, 4, 3],
];

/// Represents a move in Connect Four
///
/// Contains the column number where a player wants to drop their piece.
/// Column numbers are 0-based indices.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectFourMove(pub usize);

/// Represents the complete state of a Connect Four game
///
/// Player [`Player::One`] is Red and moves first. Applying a move never
/// mutates this value; `apply` returns the successor state.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectFourState {
    board: [[Option<Player>; COLS]; ROWS],
    to_move: Player,
    winner: Option<Outcome>,
    /// Landing cell of the last piece, if any (row, column).
    last_move: Option<(usize, usize)>,
    moves: Vec<ConnectFourMove>,
}

impl ConnectFourState {
    /// Creates a new game with an empty board; Red ([`Player::One`]) starts.
    pub fn new() -> Self {
        Self {
            board: [[None; COLS]; ROWS],
            to_move: Player::One,
            winner: None,
            last_move: None,
            moves: Vec::new(),
        }
    }

    /// Gets the cell at a position. Row 0 is the top, row 5 the bottom.
    pub fn get(&self, row: usize, col: usize) -> Option<Player> {
        self.board[row][col]
    }

    /// The player who moves next.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// The result, once the game has been decided.
    pub fn winner(&self) -> Option<Outcome> {
        self.winner
    }

    /// Landing cell of the most recent piece (row, column).
    pub fn last_move(&self) -> Option<(usize, usize)> {
        self.last_move
    }

    /// Append-only record of every move applied so far.
    pub fn history(&self) -> &[ConnectFourMove] {
        &self.moves
    }

    /// The row a piece dropped into `col` would land in, if the column has
    /// room.
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        (0..ROWS).rev().find(|&row| self.board[row][col].is_none())
    }

    /// All legal moves for `player`: the non-full columns, or nothing when
    /// it is not that player's turn or the game is over.
    pub fn legal_moves(&self, player: Player) -> Vec<ConnectFourMove> {
        if player != self.to_move || self.winner.is_some() {
            return Vec::new();
        }
        (0..COLS)
            .filter(|&col| self.board[0][col].is_none())
            .map(ConnectFourMove)
            .collect()
    }

    /// Applies a move for `player`, returning the successor state.
    ///
    /// Rejects the move when the column is out of range or full, the game
    /// is over, or it is not `player`'s turn.
    pub fn apply(&self, mv: ConnectFourMove, player: Player) -> Result<Self, MoveError> {
        if self.winner.is_some() {
            return Err(MoveError::GameOver);
        }
        if player != self.to_move {
            return Err(MoveError::OutOfTurn);
        }
        if mv.0 >= COLS {
            return Err(MoveError::OutOfBounds);
        }
        if self.board[0][mv.0].is_some() {
            return Err(MoveError::Illegal);
        }
        Ok(self.apply_unchecked(mv))
    }

    /// Move application once legality is established.
    fn apply_unchecked(&self, mv: ConnectFourMove) -> Self {
        let mut next = self.clone();
        let row = next
            .landing_row(mv.0)
            .unwrap_or(ROWS - 1);
        next.board[row][mv.0] = Some(self.to_move);
        next.last_move = Some((row, mv.0));
        next.moves.push(mv);

        if next.wins_through(row, mv.0) {
            next.winner = Some(Outcome::Win(self.to_move));
        } else if (0..COLS).all(|col| next.board[0][col].is_some()) {
            next.winner = Some(Outcome::Draw);
        } else {
            next.to_move = self.to_move.opponent();
        }
        next
    }

    /// Checks for 4-in-a-row along the 4 axes through the given cell.
    fn wins_through(&self, row: usize, col: usize) -> bool {
        let Some(player) = self.board[row][col] else {
            return false;
        };
        for (dr, dc) in [(0i32, 1i32), (1, 0), (1, 1), (1, -1)] {
            let mut count = 1;
            for sign in [1i32, -1] {
                let (mut r, mut c) = (row as i32 + dr * sign, col as i32 + dc * sign);
                while (0..ROWS as i32).contains(&r)
                    && (0..COLS as i32).contains(&c)
                    && self.board[r as usize][c as usize] == Some(player)
                {
                    count += 1;
                    r += dr * sign;
                    c += dc * sign;
                }
            }
            if count >= CONNECT {
                return true;
            }
        }
        false
    }

    /// Static evaluation: positional weights plus open-window threats.
    ///
    /// Every 4-cell window that contains only one side's pieces scores that
    /// side; three-of-four windows dominate so the search blocks and builds
    /// threats before chasing position.
    pub fn evaluate(&self, perspective: Player) -> i32 {
        let mut score = 0;
        for row in 0..ROWS {
            for col in 0..COLS {
                match self.board[row][col] {
                    Some(p) if p == perspective => score += WEIGHTS[row][col],
                    Some(_) => score -= WEIGHTS[row][col],
                    None => {}
                }
            }
        }
        for row in 0..ROWS {
            for col in 0..COLS {
                for (dr, dc) in [(0usize, 1usize), (1, 0), (1, 1)] {
                    if row + dr * (CONNECT - 1) < ROWS && col + dc * (CONNECT - 1) < COLS {
                        score += self.window_score(row, col, dr as i32, dc as i32, perspective);
                    }
                }
                // Anti-diagonal windows start from the right edge of range.
                if row + CONNECT - 1 < ROWS && col >= CONNECT - 1 {
                    score += self.window_score(row, col, 1, -1, perspective);
                }
            }
        }
        score
    }

    fn window_score(&self, row: usize, col: usize, dr: i32, dc: i32, perspective: Player) -> i32 {
        let mut own = 0;
        let mut theirs = 0;
        for k in 0..CONNECT as i32 {
            let r = (row as i32 + dr * k) as usize;
            let c = (col as i32 + dc * k) as usize;
            match self.board[r][c] {
                Some(p) if p == perspective => own += 1,
                Some(_) => theirs += 1,
                None => {}
            }
        }
        match (own, theirs) {
            (_, 0) => match own {
                3 => 50,
                2 => 10,
                1 => 1,
                _ => 0,
            },
            (0, _) => match theirs {
                3 => -80,
                2 => -10,
                1 => -1,
                _ => 0,
            },
            _ => 0,
        }
    }

    /// Selects a move for the AI at the given difficulty.
    ///
    /// An immediately winning column is played at every difficulty before
    /// the blunder probability is rolled; otherwise easy/normal modes may
    /// substitute a random legal column for the search result.
    pub fn ai_move<R: Rng + ?Sized>(
        &self,
        ai: Player,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Option<ConnectFourMove> {
        let legal = self.legal_moves(ai);
        if legal.is_empty() {
            return None;
        }

        if let Some(winning) = legal
            .iter()
            .find(|mv| self.apply_unchecked(**mv).winner == Some(Outcome::Win(ai)))
        {
            tracing::debug!(col = winning.0, "connect four: immediate win");
            return Some(*winning);
        }

        let profile = DifficultyProfile::connect_four(difficulty);
        if roll_blunder(rng, profile.blunder_chance) {
            return pick_random(rng, &legal).copied();
        }

        let config = SearchConfig {
            depth: profile.depth,
            width: profile.width,
            jitter: profile.jitter,
        };
        best_move(self, ai, &config, rng).map(|(mv, score)| {
            tracing::debug!(col = mv.0, score, "connect four: searched move");
            mv
        })
    }
}

impl Default for ConnectFourState {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchState for ConnectFourState {
    type Move = ConnectFourMove;

    fn to_move(&self) -> Player {
        self.to_move
    }

    fn legal_moves(&self) -> Vec<ConnectFourMove> {
        self.legal_moves(self.to_move)
    }

    fn play(&self, mv: &ConnectFourMove) -> Self {
        self.apply_unchecked(*mv)
    }

    fn outcome(&self) -> Option<Outcome> {
        self.winner
    }

    fn evaluate(&self, perspective: Player) -> i32 {
        self.evaluate(perspective)
    }
}

impl fmt::Display for ConnectFourState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..ROWS {
            for col in 0..COLS {
                let symbol = match self.board[row][col] {
                    Some(Player::One) => "X",
                    Some(Player::Two) => "O",
                    None => ".",
                };
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for ConnectFourMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConnectFourMove {
    type Err = String;

    /// Parses a move from its column number (e.g. `"3"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let col = s.trim().parse::<usize>().map_err(|e| e.to_string())?;
        Ok(ConnectFourMove(col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn play(state: &ConnectFourState, col: usize) -> ConnectFourState {
        state.apply(ConnectFourMove(col), state.to_move()).unwrap()
    }

    #[test]
    fn test_new_game() {
        let game = ConnectFourState::new();
        assert_eq!(game.to_move(), Player::One);
        assert_eq!(game.legal_moves(Player::One).len(), 7);
        assert!(game.winner().is_none());
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_pieces_fall_to_bottom() {
        let game = ConnectFourState::new();
        let game = play(&game, 3);
        assert_eq!(game.get(5, 3), Some(Player::One));
        assert_eq!(game.last_move(), Some((5, 3)));
        let game = play(&game, 3);
        assert_eq!(game.get(4, 3), Some(Player::Two));
    }

    #[test]
    fn test_apply_rejects_illegal_input() {
        let game = ConnectFourState::new();
        assert_eq!(
            game.apply(ConnectFourMove(9), Player::One),
            Err(MoveError::OutOfBounds)
        );
        assert_eq!(
            game.apply(ConnectFourMove(0), Player::Two),
            Err(MoveError::OutOfTurn)
        );
        let mut game = game;
        for _ in 0..ROWS {
            game = play(&game, 0);
        }
        assert_eq!(
            game.apply(ConnectFourMove(0), game.to_move()),
            Err(MoveError::Illegal)
        );
    }

    #[test]
    fn test_apply_is_pure() {
        let game = ConnectFourState::new();
        let _ = play(&game, 2);
        assert_eq!(game.get(5, 2), None);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_win_condition_horizontal() {
        let mut game = ConnectFourState::new();
        // P1: 0, 1, 2, 3 / P2: 0, 1, 2
        for col in [0, 0, 1, 1, 2, 2] {
            game = play(&game, col);
        }
        let game = play(&game, 3);
        assert_eq!(game.winner(), Some(Outcome::Win(Player::One)));
        assert!(game.legal_moves(Player::Two).is_empty());
    }

    #[test]
    fn test_win_condition_vertical() {
        let mut game = ConnectFourState::new();
        for col in [0, 1, 0, 1, 0, 1] {
            game = play(&game, col);
        }
        let game = play(&game, 0);
        assert_eq!(game.winner(), Some(Outcome::Win(Player::One)));
    }

    #[test]
    fn test_win_condition_diagonal() {
        let mut game = ConnectFourState::new();
        for col in [0, 1, 1, 2, 2, 3, 2, 3, 3, 0] {
            game = play(&game, col);
        }
        let game = play(&game, 3);
        assert_eq!(game.winner(), Some(Outcome::Win(Player::One)));
    }

    #[test]
    fn test_game_over_rejects_moves() {
        let mut game = ConnectFourState::new();
        for col in [0, 0, 1, 1, 2, 2] {
            game = play(&game, col);
        }
        let game = play(&game, 3);
        assert_eq!(
            game.apply(ConnectFourMove(4), Player::Two),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn test_ai_takes_immediate_win_at_every_difficulty() {
        // Red on (5,0..=2); column 3 wins on the spot.
        let mut game = ConnectFourState::new();
        for col in [0, 0, 1, 1, 2, 2] {
            game = play(&game, col);
        }
        for difficulty in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            for seed in 0..20 {
                let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
                let mv = game.ai_move(Player::One, difficulty, &mut rng).unwrap();
                assert_eq!(mv, ConnectFourMove(3));
                let next = game.apply(mv, Player::One).unwrap();
                assert_eq!(next.winner(), Some(Outcome::Win(Player::One)));
            }
        }
    }

    #[test]
    fn test_ai_blocks_immediate_loss_on_hard() {
        // Red holds (5,0..=2); column 3 is the only completing cell, so
        // Yellow must drop there.
        let mut game = ConnectFourState::new();
        for col in [0, 6, 1, 6, 2] {
            game = play(&game, col);
        }
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        let mv = game.ai_move(Player::Two, Difficulty::Hard, &mut rng).unwrap();
        assert!(mv == ConnectFourMove(3), "expected block at 3, got {}", mv);
    }

    #[test]
    fn test_ai_move_is_always_legal() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(99);
        let mut game = ConnectFourState::new();
        while game.winner().is_none() {
            let mover = game.to_move();
            let mv = game.ai_move(mover, Difficulty::Easy, &mut rng).unwrap();
            assert!(game.legal_moves(mover).contains(&mv));
            game = game.apply(mv, mover).unwrap();
        }
    }

    #[test]
    fn test_evaluation_is_pure() {
        let game = play(&play(&ConnectFourState::new(), 3), 2);
        assert_eq!(game.evaluate(Player::One), game.evaluate(Player::One));
    }

    #[test]
    fn test_move_notation_round_trip() {
        let mv = ConnectFourMove::from_str("3").unwrap();
        assert_eq!(mv, ConnectFourMove(3));
        assert_eq!(mv.to_string(), "3");
        assert!(ConnectFourMove::from_str("x").is_err());
    }
}
