//! # Omok (Five in a Row) Game Implementation
//!
//! Gomoku on a 19x19 board with the Renju forbidden-move restriction for
//! Black: a placement that simultaneously creates two or more open three
//! patterns is illegal for Black ([`Player::One`]) and always legal for
//! White. Five or more in a row wins.
//!
//! The AI runs a strict-priority threat ladder before falling back to
//! minimax over a candidate set restricted to the neighborhood of existing
//! stones; unrestricted search over 361 intersections is intractable at
//! interactive latency.

use crate::difficulty::{pick_random, roll_blunder, DifficultyProfile};
use crate::search::{best_move, SearchConfig, SearchState};
use crate::{Difficulty, MoveError, Outcome, Player};
use rand::Rng;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Size of the board (19x19).
pub const SIZE: usize = 19;

/// Chebyshev radius around existing stones searched for candidate moves.
const CANDIDATE_RADIUS: usize = 2;

const AXES: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Per-run pattern values summed by the evaluation. The hierarchy matters
/// more than the magnitudes: a five dwarfs an open four, which dwarfs any
/// number of threes.
mod pattern {
    pub const FIVE: i32 = 100_000;
    pub const OPEN_FOUR: i32 = 10_000;
    pub const CLOSED_FOUR: i32 = 4_000;
    pub const OPEN_THREE: i32 = 1_000;
    pub const CLOSED_THREE: i32 = 100;
    pub const OPEN_TWO: i32 = 50;
    pub const CLOSED_TWO: i32 = 10;
}

type Board = [[Option<Player>; SIZE]; SIZE];

/// A stone placement at a 0-based intersection.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OmokMove {
    pub row: usize,
    pub col: usize,
}

/// Represents the complete state of an Omok game
///
/// [`Player::One`] is Black and moves first; the Renju double-three
/// restriction applies to Black only. Applying a move never mutates this
/// value; `apply` returns the successor state.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OmokState {
    board: Board,
    to_move: Player,
    winner: Option<Outcome>,
    last_move: Option<(usize, usize)>,
    moves: Vec<OmokMove>,
}

impl OmokState {
    /// Creates a new game with an empty board; Black starts.
    pub fn new() -> Self {
        Self {
            board: [[None; SIZE]; SIZE],
            to_move: Player::One,
            winner: None,
            last_move: None,
            moves: Vec::new(),
        }
    }

    /// Gets the stone at an intersection.
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

    /// Coordinates of the most recently placed stone.
    pub fn last_move(&self) -> Option<(usize, usize)> {
        self.last_move
    }

    /// Append-only record of every move applied so far.
    pub fn history(&self) -> &[OmokMove] {
        &self.moves
    }

    /// Whether placing at (row, col) is forbidden for `player`.
    ///
    /// Only Black is restricted: a placement creating two or more distinct
    /// open three patterns (double-three) is illegal, unless it also
    /// completes a five, which always wins. White is never restricted.
    pub fn is_forbidden(&self, row: usize, col: usize, player: Player) -> bool {
        if player != Player::One || self.board[row][col].is_some() {
            return false;
        }
        let after = with_stone(&self.board, row, col, player);
        if max_run(&after, row, col, player) >= 5 {
            return false;
        }
        open_threes_through(&after, row, col, player) >= 2
    }

    /// All legal moves for `player`: every empty intersection, minus
    /// Black's forbidden points.
    pub fn legal_moves(&self, player: Player) -> Vec<OmokMove> {
        if player != self.to_move || self.winner.is_some() {
            return Vec::new();
        }
        let mut moves = Vec::new();
        for row in 0..SIZE {
            for col in 0..SIZE {
                if self.board[row][col].is_none() && !self.is_forbidden(row, col, player) {
                    moves.push(OmokMove { row, col });
                }
            }
        }
        moves
    }

    /// Applies a move for `player`, returning the successor state.
    pub fn apply(&self, mv: OmokMove, player: Player) -> Result<Self, MoveError> {
        if self.winner.is_some() {
            return Err(MoveError::GameOver);
        }
        if player != self.to_move {
            return Err(MoveError::OutOfTurn);
        }
        if mv.row >= SIZE || mv.col >= SIZE {
            return Err(MoveError::OutOfBounds);
        }
        if self.board[mv.row][mv.col].is_some() || self.is_forbidden(mv.row, mv.col, player) {
            return Err(MoveError::Illegal);
        }
        Ok(self.apply_unchecked(mv))
    }

    fn apply_unchecked(&self, mv: OmokMove) -> Self {
        let mut next = self.clone();
        let mover = self.to_move;
        next.board[mv.row][mv.col] = Some(mover);
        next.last_move = Some((mv.row, mv.col));
        next.moves.push(mv);

        if max_run(&next.board, mv.row, mv.col, mover) >= 5 {
            next.winner = Some(Outcome::Win(mover));
        } else if next.moves.len() == SIZE * SIZE {
            next.winner = Some(Outcome::Draw);
        } else {
            next.to_move = mover.opponent();
        }
        next
    }

    /// Legal empty intersections within [`CANDIDATE_RADIUS`] of an existing
    /// stone; the center point on an empty board. This is the move set the
    /// search and the detectors operate over.
    fn candidate_moves(&self) -> Vec<OmokMove> {
        if self.winner.is_some() {
            return Vec::new();
        }
        if self.moves.is_empty() {
            return vec![OmokMove { row: SIZE / 2, col: SIZE / 2 }];
        }
        let mut near = [[false; SIZE]; SIZE];
        for row in 0..SIZE {
            for col in 0..SIZE {
                if self.board[row][col].is_some() {
                    let r0 = row.saturating_sub(CANDIDATE_RADIUS);
                    let c0 = col.saturating_sub(CANDIDATE_RADIUS);
                    for r in r0..=(row + CANDIDATE_RADIUS).min(SIZE - 1) {
                        for c in c0..=(col + CANDIDATE_RADIUS).min(SIZE - 1) {
                            near[r][c] = true;
                        }
                    }
                }
            }
        }
        let mut candidates = Vec::new();
        for row in 0..SIZE {
            for col in 0..SIZE {
                if near[row][col]
                    && self.board[row][col].is_none()
                    && !self.is_forbidden(row, col, self.to_move)
                {
                    candidates.push(OmokMove { row, col });
                }
            }
        }
        candidates
    }

    /// Static evaluation: classifies every maximal run of both colors into
    /// the pattern classes and sums their values, own minus opponent.
    pub fn evaluate(&self, perspective: Player) -> i32 {
        pattern_sum(&self.board, perspective) - pattern_sum(&self.board, perspective.opponent())
    }

    /// Selects a move for the AI at the given difficulty.
    ///
    /// Runs the threat ladder in strict priority order before search:
    /// complete a five, block the opponent's five, create an open four,
    /// block an opponent four threat, block an opponent open three. Every
    /// detector answer is drawn from the legal candidate set, so Black
    /// never receives a forbidden point.
    pub fn ai_move<R: Rng + ?Sized>(
        &self,
        ai: Player,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Option<OmokMove> {
        if ai != self.to_move || self.winner.is_some() {
            return None;
        }
        let candidates = self.candidate_moves();
        if candidates.is_empty() {
            // Every nearby point is forbidden; fall back to any legal one.
            return self.legal_moves(ai).first().copied();
        }
        let opponent = ai.opponent();

        if let Some(mv) = self.find_five_completion(&candidates, ai) {
            tracing::debug!(row = mv.row, col = mv.col, "omok: completing five");
            return Some(mv);
        }
        if let Some(mv) = self.find_five_completion(&candidates, opponent) {
            tracing::debug!(row = mv.row, col = mv.col, "omok: blocking five");
            return Some(mv);
        }

        let profile = DifficultyProfile::omok(difficulty);
        if roll_blunder(rng, profile.blunder_chance) {
            // A blunder is uniform over the whole legal board, not just the
            // neighborhood the search looks at.
            return pick_random(rng, &self.legal_moves(ai)).copied();
        }

        if let Some(mv) = self.find_open_four(&candidates, ai) {
            tracing::debug!(row = mv.row, col = mv.col, "omok: making open four");
            return Some(mv);
        }
        if let Some(mv) = self.find_open_four(&candidates, opponent) {
            tracing::debug!(row = mv.row, col = mv.col, "omok: blocking four threat");
            return Some(mv);
        }
        if let Some(mv) = self.find_open_three_block(&candidates, opponent) {
            tracing::debug!(row = mv.row, col = mv.col, "omok: blocking open three");
            return Some(mv);
        }

        let config = SearchConfig {
            depth: profile.depth,
            width: profile.width,
            jitter: profile.jitter,
        };
        best_move(self, ai, &config, rng)
            .map(|(mv, score)| {
                tracing::debug!(row = mv.row, col = mv.col, score, "omok: searched move");
                mv
            })
            .or_else(|| candidates.first().copied())
    }

    /// A candidate that completes five or more for `player`, gaps included
    /// (place-and-check counts the run through the new stone).
    fn find_five_completion(&self, candidates: &[OmokMove], player: Player) -> Option<OmokMove> {
        candidates.iter().copied().find(|mv| {
            let after = with_stone(&self.board, mv.row, mv.col, player);
            max_run(&after, mv.row, mv.col, player) >= 5
        })
    }

    /// A candidate where `player` would create an open four (four in a row
    /// with both extension cells empty).
    fn find_open_four(&self, candidates: &[OmokMove], player: Player) -> Option<OmokMove> {
        candidates.iter().copied().find(|mv| {
            let after = with_stone(&self.board, mv.row, mv.col, player);
            AXES.iter().any(|&(dr, dc)| {
                let (len, open_low, open_high) =
                    run_through(&after, mv.row, mv.col, dr, dc, player);
                len == 4 && open_low && open_high
            })
        })
    }

    /// A candidate that occupies an extension cell of an opponent open
    /// three, preventing it from growing into an open four.
    fn find_open_three_block(&self, candidates: &[OmokMove], opponent: Player) -> Option<OmokMove> {
        candidates.iter().copied().find(|mv| {
            AXES.iter().any(|&(dr, dc)| {
                // Would this cell extend an adjacent opponent run of three
                // that is currently open on both ends?
                neighbor_run(&self.board, mv.row, mv.col, dr, dc, opponent)
                    .map(|(len, other_end_open)| len == 3 && other_end_open)
                    .unwrap_or(false)
            })
        })
    }
}

impl Default for OmokState {
    fn default() -> Self {
        Self::new()
    }
}

fn in_bounds(r: i32, c: i32) -> bool {
    (0..SIZE as i32).contains(&r) && (0..SIZE as i32).contains(&c)
}

fn stone(board: &Board, r: i32, c: i32) -> Option<Player> {
    if in_bounds(r, c) {
        board[r as usize][c as usize]
    } else {
        None
    }
}

fn with_stone(board: &Board, row: usize, col: usize, player: Player) -> Board {
    let mut next = *board;
    next[row][col] = Some(player);
    next
}

/// Longest run through (row, col) over the four axes, assuming the cell
/// holds `player`'s stone.
fn max_run(board: &Board, row: usize, col: usize, player: Player) -> usize {
    AXES.iter()
        .map(|&(dr, dc)| run_through(board, row, col, dr, dc, player).0)
        .max()
        .unwrap_or(1)
}

/// Contiguous run of `player` stones through (row, col) along one axis,
/// plus whether the cell beyond each end is in-bounds and empty.
fn run_through(
    board: &Board,
    row: usize,
    col: usize,
    dr: i32,
    dc: i32,
    player: Player,
) -> (usize, bool, bool) {
    let mut len = 1;
    let mut ends = [false; 2];
    for (i, sign) in [1i32, -1].into_iter().enumerate() {
        let (mut r, mut c) = (row as i32 + dr * sign, col as i32 + dc * sign);
        while stone(board, r, c) == Some(player) {
            len += 1;
            r += dr * sign;
            c += dc * sign;
        }
        ends[i] = in_bounds(r, c) && stone(board, r, c).is_none();
    }
    (len, ends[1], ends[0])
}

/// Run of `player` stones starting adjacent to the empty cell (row, col) in
/// direction (dr, dc) or its reverse; returns the run length and whether
/// the far end of that run is open. `None` when neither neighbor matches.
fn neighbor_run(
    board: &Board,
    row: usize,
    col: usize,
    dr: i32,
    dc: i32,
    player: Player,
) -> Option<(usize, bool)> {
    for sign in [1i32, -1] {
        let (mut r, mut c) = (row as i32 + dr * sign, col as i32 + dc * sign);
        if stone(board, r, c) != Some(player) {
            continue;
        }
        let mut len = 0;
        while stone(board, r, c) == Some(player) {
            len += 1;
            r += dr * sign;
            c += dc * sign;
        }
        let far_open = in_bounds(r, c) && stone(board, r, c).is_none();
        return Some((len, far_open));
    }
    None
}

/// Counts distinct open three patterns through (row, col) for `player`,
/// with the stone already placed there.
///
/// Two shapes count, both bounded by cells that are in-bounds and not
/// opponent-occupied:
/// - a contiguous run of exactly three with both immediate extensions
///   empty (a three blocked on either end never counts);
/// - a split three: three stones over a four-cell span with one interior
///   gap.
///
/// Patterns are deduplicated by their stone sets, so a single axis can
/// contribute more than one distinct three.
fn open_threes_through(board: &Board, row: usize, col: usize, player: Player) -> usize {
    let mut sets: BTreeSet<Vec<(usize, usize)>> = BTreeSet::new();
    let opponent = player.opponent();

    for &(dr, dc) in &AXES {
        // Contiguous three with both ends empty.
        let (len, open_low, open_high) = run_through(board, row, col, dr, dc, player);
        if len == 3 && open_low && open_high {
            let mut cells = axis_run_cells(board, row, col, dr, dc, player);
            cells.sort_unstable();
            sets.insert(cells);
        }

        // Split threes over a four-cell span containing the placed stone.
        for offset in -3i32..=0 {
            let mut cells = Vec::new();
            let mut gap = None;
            let mut blocked = false;
            for k in 0..4 {
                let r = row as i32 + dr * (offset + k);
                let c = col as i32 + dc * (offset + k);
                match stone(board, r, c) {
                    Some(p) if p == player => cells.push((r as usize, c as usize)),
                    Some(_) => blocked = true,
                    None if in_bounds(r, c) => gap = Some(k),
                    None => blocked = true,
                }
            }
            // The gap must be interior; an edge gap means the stones are
            // contiguous and handled above.
            if blocked || cells.len() != 3 || !matches!(gap, Some(1) | Some(2)) {
                continue;
            }
            if !cells.contains(&(row, col)) {
                continue;
            }
            let before = (row as i32 + dr * (offset - 1), col as i32 + dc * (offset - 1));
            let after = (row as i32 + dr * (offset + 4), col as i32 + dc * (offset + 4));
            if !in_bounds(before.0, before.1) || !in_bounds(after.0, after.1) {
                continue;
            }
            if stone(board, before.0, before.1) == Some(opponent)
                || stone(board, after.0, after.1) == Some(opponent)
            {
                continue;
            }
            cells.sort_unstable();
            sets.insert(cells);
        }
    }
    sets.len()
}

/// The cells of the contiguous run through (row, col) along one axis.
fn axis_run_cells(
    board: &Board,
    row: usize,
    col: usize,
    dr: i32,
    dc: i32,
    player: Player,
) -> Vec<(usize, usize)> {
    let mut cells = vec![(row, col)];
    for sign in [1i32, -1] {
        let (mut r, mut c) = (row as i32 + dr * sign, col as i32 + dc * sign);
        while stone(board, r, c) == Some(player) {
            cells.push((r as usize, c as usize));
            r += dr * sign;
            c += dc * sign;
        }
    }
    cells
}

/// Sum of pattern values over all maximal runs of `player`'s stones.
fn pattern_sum(board: &Board, player: Player) -> i32 {
    let mut total = 0;
    for row in 0..SIZE {
        for col in 0..SIZE {
            if board[row][col] != Some(player) {
                continue;
            }
            for &(dr, dc) in &AXES {
                // Count each run once, from its first stone only.
                if stone(board, row as i32 - dr, col as i32 - dc) == Some(player) {
                    continue;
                }
                let (len, open_low, open_high) = run_through(board, row, col, dr, dc, player);
                let open_ends = open_low as u8 + open_high as u8;
                total += match (len, open_ends) {
                    (5.., _) => pattern::FIVE,
                    (4, 2) => pattern::OPEN_FOUR,
                    (4, 1) => pattern::CLOSED_FOUR,
                    (3, 2) => pattern::OPEN_THREE,
                    (3, 1) => pattern::CLOSED_THREE,
                    (2, 2) => pattern::OPEN_TWO,
                    (2, 1) => pattern::CLOSED_TWO,
                    _ => 0,
                };
            }
        }
    }
    total
}

impl SearchState for OmokState {
    type Move = OmokMove;

    fn to_move(&self) -> Player {
        self.to_move
    }

    /// The search expands the stone-neighborhood candidate set, not all
    /// 361 intersections.
    fn legal_moves(&self) -> Vec<OmokMove> {
        self.candidate_moves()
    }

    fn play(&self, mv: &OmokMove) -> Self {
        self.apply_unchecked(*mv)
    }

    fn outcome(&self) -> Option<Outcome> {
        self.winner
    }

    fn evaluate(&self, perspective: Player) -> i32 {
        self.evaluate(perspective)
    }
}

impl fmt::Display for OmokState {
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

impl fmt::Display for OmokMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl FromStr for OmokMove {
    type Err = String;

    /// Parses a move from `"row,col"` (e.g. `"9,9"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(|p| p.trim()).collect();
        if parts.len() != 2 {
            return Err("Expected format: r,c".to_string());
        }
        let row = parts[0].parse::<usize>().map_err(|e| e.to_string())?;
        let col = parts[1].parse::<usize>().map_err(|e| e.to_string())?;
        Ok(OmokMove { row, col })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn state_with(stones: &[(usize, usize, Player)], to_move: Player) -> OmokState {
        let mut state = OmokState::new();
        for &(r, c, p) in stones {
            state.board[r][c] = Some(p);
        }
        state.to_move = to_move;
        // History length only matters for draw detection.
        state.moves = stones
            .iter()
            .map(|&(r, c, _)| OmokMove { row: r, col: c })
            .collect();
        state
    }

    #[test]
    fn test_first_move_and_win() {
        let mut game = OmokState::new();
        let black = [(9, 9), (9, 10), (9, 11), (9, 12)];
        let white = [(10, 9), (10, 10), (10, 11), (10, 12)];
        for i in 0..4 {
            game = game
                .apply(OmokMove { row: black[i].0, col: black[i].1 }, Player::One)
                .unwrap();
            game = game
                .apply(OmokMove { row: white[i].0, col: white[i].1 }, Player::Two)
                .unwrap();
        }
        let game = game.apply(OmokMove { row: 9, col: 13 }, Player::One).unwrap();
        assert_eq!(game.winner(), Some(Outcome::Win(Player::One)));
    }

    #[test]
    fn test_overline_also_wins() {
        // Five-or-more: six in a row still wins.
        let stones: Vec<(usize, usize, Player)> = (0..5)
            .map(|i| (5, 3 + i, Player::One))
            .chain((0..4).map(|i| (12, 3 + i, Player::Two)))
            .collect();
        let game = state_with(&stones, Player::One);
        // Placing at (5,8) with stones already at 3..=7 makes six.
        let next = game.apply(OmokMove { row: 5, col: 8 }, Player::One);
        // (5,3)..(5,7) is already five, but winner is only set by apply;
        // the placement extends the run and wins.
        assert_eq!(next.unwrap().winner(), Some(Outcome::Win(Player::One)));
    }

    #[test]
    fn test_double_three_is_forbidden_for_black_only() {
        // Black at (9,8), (9,10), (9,12); placing at
        // (9,9) forms the contiguous three {8,9,10} and the split three
        // {9,10,12}, both open.
        let black = state_with(
            &[(9, 8, Player::One), (9, 10, Player::One), (9, 12, Player::One)],
            Player::One,
        );
        assert!(black.is_forbidden(9, 9, Player::One));
        assert_eq!(
            black.apply(OmokMove { row: 9, col: 9 }, Player::One),
            Err(MoveError::Illegal)
        );
        assert!(!black
            .legal_moves(Player::One)
            .contains(&OmokMove { row: 9, col: 9 }));

        // The identical shape in white is never restricted.
        let white = state_with(
            &[(9, 8, Player::Two), (9, 10, Player::Two), (9, 12, Player::Two)],
            Player::Two,
        );
        assert!(!white.is_forbidden(9, 9, Player::Two));
        assert!(white.apply(OmokMove { row: 9, col: 9 }, Player::Two).is_ok());
    }

    #[test]
    fn test_blocked_three_does_not_count() {
        // The horizontal three is blocked by white at (9,7): placing at
        // (9,9) leaves only one open three (the vertical one), so the
        // point stays legal.
        let game = state_with(
            &[
                (9, 7, Player::Two),
                (9, 8, Player::One),
                (9, 10, Player::One),
                (8, 9, Player::One),
                (7, 9, Player::One),
            ],
            Player::One,
        );
        assert!(!game.is_forbidden(9, 9, Player::One));
    }

    #[test]
    fn test_crossing_double_three_is_forbidden() {
        // Two contiguous open threes on different axes through (9,9).
        let game = state_with(
            &[
                (9, 8, Player::One),
                (9, 10, Player::One),
                (8, 9, Player::One),
                (7, 9, Player::One),
            ],
            Player::One,
        );
        assert!(game.is_forbidden(9, 9, Player::One));
    }

    #[test]
    fn test_winning_placement_overrides_forbidden() {
        // The point would be a double three, but it also completes five.
        let game = state_with(
            &[
                (9, 5, Player::One),
                (9, 6, Player::One),
                (9, 7, Player::One),
                (9, 8, Player::One),
                (8, 9, Player::One),
                (7, 9, Player::One),
                (10, 9, Player::One),
            ],
            Player::One,
        );
        assert!(!game.is_forbidden(9, 9, Player::One));
        let next = game.apply(OmokMove { row: 9, col: 9 }, Player::One).unwrap();
        assert_eq!(next.winner(), Some(Outcome::Win(Player::One)));
    }

    #[test]
    fn test_ai_completes_five() {
        let game = state_with(
            &[
                (9, 5, Player::One),
                (9, 6, Player::One),
                (9, 7, Player::One),
                (9, 8, Player::One),
                (5, 5, Player::Two),
                (5, 6, Player::Two),
                (5, 7, Player::Two),
            ],
            Player::One,
        );
        for difficulty in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(4);
            let mv = game.ai_move(Player::One, difficulty, &mut rng).unwrap();
            assert!(
                mv == OmokMove { row: 9, col: 9 } || mv == OmokMove { row: 9, col: 4 },
                "expected a five-completing point, got {}",
                mv
            );
        }
    }

    #[test]
    fn test_ai_blocks_opponent_five() {
        let game = state_with(
            &[
                (9, 5, Player::One),
                (9, 6, Player::One),
                (9, 7, Player::One),
                (9, 8, Player::One),
                (3, 3, Player::Two),
            ],
            Player::Two,
        );
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(4);
        let mv = game.ai_move(Player::Two, Difficulty::Hard, &mut rng).unwrap();
        assert!(
            mv == OmokMove { row: 9, col: 9 } || mv == OmokMove { row: 9, col: 4 },
            "expected a blocking point, got {}",
            mv
        );
    }

    #[test]
    fn test_ai_blocks_open_three() {
        // White open three with no white threats on the board: black must
        // occupy one of its extension points.
        let game = state_with(
            &[
                (9, 6, Player::Two),
                (9, 7, Player::Two),
                (9, 8, Player::Two),
                (3, 3, Player::One),
            ],
            Player::One,
        );
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(4);
        let mv = game.ai_move(Player::One, Difficulty::Hard, &mut rng).unwrap();
        assert!(
            mv == OmokMove { row: 9, col: 5 } || mv == OmokMove { row: 9, col: 9 },
            "expected an open-three block, got {}",
            mv
        );
    }

    #[test]
    fn test_ai_moves_are_legal_near_stones() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(17);
        let mut game = OmokState::new();
        for _ in 0..12 {
            if game.winner().is_some() {
                break;
            }
            let mover = game.to_move();
            let mv = game.ai_move(mover, Difficulty::Normal, &mut rng).unwrap();
            assert!(game.legal_moves(mover).contains(&mv));
            game = game.apply(mv, mover).unwrap();
        }
    }

    #[test]
    fn test_easy_blunders_roam_the_whole_board() {
        // A blunder is uniform over every legal intersection; with one
        // stone on the board some seeds must land outside the radius-2
        // neighborhood the search restricts itself to.
        let game = OmokState::new()
            .apply(OmokMove { row: 9, col: 9 }, Player::One)
            .unwrap();
        let mut far = false;
        for seed in 0..50 {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
            let mv = game.ai_move(Player::Two, Difficulty::Easy, &mut rng).unwrap();
            assert!(game.legal_moves(Player::Two).contains(&mv));
            if mv.row.abs_diff(9) > 2 || mv.col.abs_diff(9) > 2 {
                far = true;
            }
        }
        assert!(far);
    }

    #[test]
    fn test_evaluation_orders_patterns() {
        let open_three = state_with(
            &[(9, 7, Player::One), (9, 8, Player::One), (9, 9, Player::One)],
            Player::Two,
        );
        let closed_three = state_with(
            &[
                (9, 7, Player::One),
                (9, 8, Player::One),
                (9, 9, Player::One),
                (9, 10, Player::Two),
            ],
            Player::Two,
        );
        assert!(open_three.evaluate(Player::One) > closed_three.evaluate(Player::One));
    }

    #[test]
    fn test_move_notation_round_trip() {
        let mv = OmokMove::from_str("9, 13").unwrap();
        assert_eq!(mv, OmokMove { row: 9, col: 13 });
        assert_eq!(mv.to_string(), "9,13");
    }
}
