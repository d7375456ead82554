//! # Checkers Game Implementation
//!
//! 8x8 draughts. Men move one square diagonally forward and jump-capture
//! over adjacent enemy pieces; captures are mandatory and chain until no
//! further jump exists. Reaching the far row promotes a man to a king,
//! which also moves and captures backward (promotion ends a capture
//! chain). A side with no pieces or no legal move loses.
//!
//! Multi-jump chains are pre-resolved into single logical moves, so the
//! search and the caller both see one `CheckersMove` per turn.

use crate::difficulty::{pick_random, roll_blunder, DifficultyProfile};
use crate::search::{best_move, SearchConfig, SearchState};
use crate::{Difficulty, MoveError, Outcome, Player};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Size of the board (8x8).
pub const SIZE: usize = 8;

type Square = (usize, usize);
type Board = [[Option<Piece>; SIZE]; SIZE];

/// A checker on the board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece {
    pub player: Player,
    pub king: bool,
}

/// A complete turn: the starting square, every landing square in order, and
/// the enemy pieces removed along the way.
///
/// `captures` and `promotes` are derived by the rules engine when moves are
/// generated; they are outputs for the caller, never inputs. `apply`
/// matches submitted moves on `from` and `path` alone.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckersMove {
    pub from: Square,
    /// Landing squares in order; a single entry for a plain step.
    pub path: Vec<Square>,
    /// Captured enemy squares, one per jump.
    pub captures: Vec<Square>,
    /// Whether the move ends with a promotion to king.
    pub promotes: bool,
}

/// Represents the complete state of a Checkers game
///
/// [`Player::One`] owns the bottom three rows and moves up the board
/// (toward row 0); [`Player::Two`] moves down. Applying a move never
/// mutates this value; `apply` returns the successor state.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckersState {
    board: Board,
    to_move: Player,
    winner: Option<Outcome>,
    last_move: Option<CheckersMove>,
    moves: Vec<CheckersMove>,
}

impl CheckersState {
    /// Creates a new game with twelve men per side on the dark squares.
    pub fn new() -> Self {
        let mut board = [[None; SIZE]; SIZE];
        for row in 0..3 {
            for col in 0..SIZE {
                if (row + col) % 2 == 1 {
                    board[row][col] = Some(Piece { player: Player::Two, king: false });
                }
            }
        }
        for row in SIZE - 3..SIZE {
            for col in 0..SIZE {
                if (row + col) % 2 == 1 {
                    board[row][col] = Some(Piece { player: Player::One, king: false });
                }
            }
        }
        Self {
            board,
            to_move: Player::One,
            winner: None,
            last_move: None,
            moves: Vec::new(),
        }
    }

    /// Gets the piece at a square.
    pub fn get(&self, row: usize, col: usize) -> Option<Piece> {
        self.board[row][col]
    }

    /// The player who moves next.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// The result, once one side cannot continue.
    pub fn winner(&self) -> Option<Outcome> {
        self.winner
    }

    /// The most recently applied move, with its derived effects.
    pub fn last_move(&self) -> Option<&CheckersMove> {
        self.last_move.as_ref()
    }

    /// Append-only record of every move applied so far.
    pub fn history(&self) -> &[CheckersMove] {
        &self.moves
    }

    /// Number of pieces `player` still owns.
    pub fn piece_count(&self, player: Player) -> usize {
        self.board
            .iter()
            .flatten()
            .filter(|cell| cell.map(|p| p.player) == Some(player))
            .count()
    }

    /// All legal moves for `player`. Capture is mandatory: when any piece
    /// has a jump available, only capture chains are returned.
    pub fn legal_moves(&self, player: Player) -> Vec<CheckersMove> {
        if player != self.to_move || self.winner.is_some() {
            return Vec::new();
        }
        moves_on(&self.board, player)
    }

    /// Applies a move for `player`, returning the successor state.
    ///
    /// The submitted move is matched against the legal set on `from` and
    /// `path`; derived fields on the input are ignored, so moves parsed
    /// from notation apply cleanly.
    pub fn apply(&self, mv: &CheckersMove, player: Player) -> Result<Self, MoveError> {
        if self.winner.is_some() {
            return Err(MoveError::GameOver);
        }
        if player != self.to_move {
            return Err(MoveError::OutOfTurn);
        }
        if mv.from.0 >= SIZE
            || mv.from.1 >= SIZE
            || mv.path.iter().any(|&(r, c)| r >= SIZE || c >= SIZE)
        {
            return Err(MoveError::OutOfBounds);
        }
        let legal = self.legal_moves(player);
        let resolved = legal
            .into_iter()
            .find(|candidate| candidate.from == mv.from && candidate.path == mv.path)
            .ok_or(MoveError::Illegal)?;
        Ok(self.apply_unchecked(&resolved))
    }

    /// Move application once legality is established; `mv` must carry the
    /// derived capture/promotion fields produced by move generation.
    fn apply_unchecked(&self, mv: &CheckersMove) -> Self {
        let mut next = self.clone();
        let mover = self.to_move;
        let mut piece = next.board[mv.from.0][mv.from.1].take().unwrap_or(Piece {
            player: mover,
            king: false,
        });
        for &(r, c) in &mv.captures {
            next.board[r][c] = None;
        }
        let landing = *mv.path.last().unwrap_or(&mv.from);
        if mv.promotes {
            piece.king = true;
        }
        next.board[landing.0][landing.1] = Some(piece);
        next.last_move = Some(mv.clone());
        next.moves.push(mv.clone());

        let opponent = mover.opponent();
        if next.piece_count(opponent) == 0 || moves_on(&next.board, opponent).is_empty() {
            next.winner = Some(Outcome::Win(mover));
        } else {
            next.to_move = opponent;
        }
        next
    }

    /// Static evaluation: material, advancement of men, and mobility.
    ///
    /// Kings are worth more than men; men are rewarded for progress toward
    /// promotion so the search keeps pushing instead of shuffling.
    pub fn evaluate(&self, perspective: Player) -> i32 {
        let mut score = 0;
        for row in 0..SIZE {
            for col in 0..SIZE {
                let Some(piece) = self.board[row][col] else {
                    continue;
                };
                let mut value = if piece.king { 160 } else { 100 };
                if !piece.king {
                    let advance = match piece.player {
                        Player::One => (SIZE - 1 - row) as i32,
                        Player::Two => row as i32,
                    };
                    value += advance * 2;
                }
                if piece.player == perspective {
                    score += value;
                } else {
                    score -= value;
                }
            }
        }
        let mobility = moves_on(&self.board, perspective).len() as i32
            - moves_on(&self.board, perspective.opponent()).len() as i32;
        score + mobility * 2
    }

    /// Selects a move for the AI at the given difficulty.
    ///
    /// A blunder picks uniformly from the legal list, which is already
    /// capture-restricted; easy mode never skips a mandatory capture.
    pub fn ai_move<R: Rng + ?Sized>(
        &self,
        ai: Player,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Option<CheckersMove> {
        let legal = self.legal_moves(ai);
        if legal.is_empty() {
            return None;
        }

        let profile = DifficultyProfile::checkers(difficulty);
        if roll_blunder(rng, profile.blunder_chance) {
            return pick_random(rng, &legal).cloned();
        }

        let config = SearchConfig {
            depth: profile.depth,
            width: profile.width,
            jitter: profile.jitter,
        };
        best_move(self, ai, &config, rng).map(|(mv, score)| {
            tracing::debug!(%mv, score, "checkers: searched move");
            mv
        })
    }
}

impl Default for CheckersState {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward jump/step directions for a piece; kings use all four diagonals.
fn directions(piece: Piece) -> &'static [(i32, i32)] {
    if piece.king {
        &[(-1, -1), (-1, 1), (1, -1), (1, 1)]
    } else {
        match piece.player {
            Player::One => &[(-1, -1), (-1, 1)],
            Player::Two => &[(1, -1), (1, 1)],
        }
    }
}

fn promotion_row(player: Player) -> usize {
    match player {
        Player::One => 0,
        Player::Two => SIZE - 1,
    }
}

fn on_board(r: i32, c: i32) -> bool {
    (0..SIZE as i32).contains(&r) && (0..SIZE as i32).contains(&c)
}

/// All legal moves for `player` on a raw board, captures first and
/// exclusive when present.
fn moves_on(board: &Board, player: Player) -> Vec<CheckersMove> {
    let mut captures = Vec::new();
    for row in 0..SIZE {
        for col in 0..SIZE {
            if let Some(piece) = board[row][col] {
                if piece.player == player {
                    // Lift the piece off so a king can land back on its
                    // own origin square mid-chain.
                    let mut working = *board;
                    working[row][col] = None;
                    chain_captures(
                        &working,
                        piece,
                        (row, col),
                        (row, col),
                        &mut Vec::new(),
                        &mut Vec::new(),
                        &mut captures,
                    );
                }
            }
        }
    }
    if !captures.is_empty() {
        return captures;
    }

    let mut steps = Vec::new();
    for row in 0..SIZE {
        for col in 0..SIZE {
            let Some(piece) = board[row][col] else {
                continue;
            };
            if piece.player != player {
                continue;
            }
            for &(dr, dc) in directions(piece) {
                let (r, c) = (row as i32 + dr, col as i32 + dc);
                if on_board(r, c) && board[r as usize][c as usize].is_none() {
                    let landing = (r as usize, c as usize);
                    steps.push(CheckersMove {
                        from: (row, col),
                        path: vec![landing],
                        captures: Vec::new(),
                        promotes: !piece.king && landing.0 == promotion_row(player),
                    });
                }
            }
        }
    }
    steps
}

/// Depth-first expansion of jump chains from `pos`. The working board has
/// the moving piece lifted off and already-captured pieces removed, so a
/// piece is never jumped twice. A chain is recorded when no further jump
/// exists, or immediately when a man lands on the promotion row.
fn chain_captures(
    board: &Board,
    piece: Piece,
    origin: Square,
    pos: Square,
    path: &mut Vec<Square>,
    captured: &mut Vec<Square>,
    out: &mut Vec<CheckersMove>,
) {
    let mut extended = false;
    for &(dr, dc) in directions(piece) {
        let (over_r, over_c) = (pos.0 as i32 + dr, pos.1 as i32 + dc);
        let (land_r, land_c) = (pos.0 as i32 + 2 * dr, pos.1 as i32 + 2 * dc);
        if !on_board(over_r, over_c) || !on_board(land_r, land_c) {
            continue;
        }
        let over = (over_r as usize, over_c as usize);
        let land = (land_r as usize, land_c as usize);
        match board[over.0][over.1] {
            Some(p) if p.player != piece.player => {}
            _ => continue,
        }
        if board[land.0][land.1].is_some() {
            continue;
        }
        extended = true;

        let mut working = *board;
        working[over.0][over.1] = None;
        path.push(land);
        captured.push(over);

        if !piece.king && land.0 == promotion_row(piece.player) {
            // Promotion ends the chain even if further jumps exist.
            out.push(CheckersMove {
                from: origin,
                path: path.clone(),
                captures: captured.clone(),
                promotes: true,
            });
        } else {
            chain_captures(&working, piece, origin, land, path, captured, out);
        }

        path.pop();
        captured.pop();
    }

    if !extended && !path.is_empty() {
        out.push(CheckersMove {
            from: origin,
            path: path.clone(),
            captures: captured.clone(),
            promotes: false,
        });
    }
}

impl SearchState for CheckersState {
    type Move = CheckersMove;

    fn to_move(&self) -> Player {
        self.to_move
    }

    fn legal_moves(&self) -> Vec<CheckersMove> {
        self.legal_moves(self.to_move)
    }

    fn play(&self, mv: &CheckersMove) -> Self {
        self.apply_unchecked(mv)
    }

    fn outcome(&self) -> Option<Outcome> {
        self.winner
    }

    fn evaluate(&self, perspective: Player) -> i32 {
        self.evaluate(perspective)
    }
}

impl fmt::Display for CheckersState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..SIZE {
            for col in 0..SIZE {
                let symbol = match self.board[row][col] {
                    Some(Piece { player: Player::One, king: false }) => "x",
                    Some(Piece { player: Player::One, king: true }) => "X",
                    Some(Piece { player: Player::Two, king: false }) => "o",
                    Some(Piece { player: Player::Two, king: true }) => "O",
                    None => ".",
                };
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for CheckersMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.from.0, self.from.1)?;
        for (r, c) in &self.path {
            write!(f, "->{},{}", r, c)?;
        }
        Ok(())
    }
}

impl FromStr for CheckersMove {
    type Err = String;

    /// Parses `"r,c->r,c[->r,c...]"`. Derived fields are left empty; they
    /// are resolved against the legal move set by `apply`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut squares = Vec::new();
        for part in s.split("->") {
            let coords: Vec<&str> = part.split(',').map(|p| p.trim()).collect();
            if coords.len() != 2 {
                return Err("Expected format: r,c->r,c".to_string());
            }
            let r = coords[0].parse::<usize>().map_err(|e| e.to_string())?;
            let c = coords[1].parse::<usize>().map_err(|e| e.to_string())?;
            squares.push((r, c));
        }
        if squares.len() < 2 {
            return Err("A move needs a source and a destination".to_string());
        }
        let from = squares.remove(0);
        Ok(CheckersMove {
            from,
            path: squares,
            captures: Vec::new(),
            promotes: false,
        })
    }
}
