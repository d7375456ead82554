//! # Dots and Boxes Game Implementation
//!
//! A 5x5 grid of dots bounding 4x4 boxes. Players alternate drawing one
//! edge; closing the fourth side of a box claims it and grants another
//! turn (a single edge can close two boxes at once). When all forty edges
//! are drawn the player owning more boxes wins.
//!
//! The AI classifies edges before searching: an edge is *completing* when
//! it closes a box, *safe* when it leaves no adjacent box with three
//! sides, and *risky* otherwise. Completing edges are always taken. When
//! only risky edges remain, the board has decomposed into chains of
//! two-sided boxes; the AI flood-fills those chains and sacrifices the
//! shortest one, the move that concedes the fewest boxes. On hard the
//! late endgame is handed to the full search instead, which sees
//! double-cross plays the classifier cannot.

use crate::difficulty::{pick_random, roll_blunder, DifficultyProfile};
use crate::search::{best_move, SearchConfig, SearchState};
use crate::{Difficulty, MoveError, Outcome, Player};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Boxes per side (4x4 boxes under a 5x5 dot grid).
pub const BOXES: usize = 4;

/// Dots per side.
pub const DOTS: usize = BOXES + 1;

/// Total number of boxes.
pub const TOTAL_BOXES: u32 = (BOXES * BOXES) as u32;

/// Total number of edges.
pub const TOTAL_EDGES: u32 = 2 * (DOTS * BOXES) as u32;

/// Undrawn-edge count at which hard hands the endgame to the search.
const ENDGAME_EDGES: u32 = 12;

/// Which way an edge runs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// One edge of the dot grid.
///
/// Horizontal edges are indexed `[row 0..5][col 0..4]`, vertical edges
/// `[row 0..4][col 0..5]`; box (r, c) is bounded by horizontal edges
/// (r, c) and (r+1, c) and vertical edges (r, c) and (r, c+1).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeMove {
    pub orientation: Orientation,
    pub row: usize,
    pub col: usize,
}

/// What a move did, recorded on the resulting state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveRecord {
    pub edge: EdgeMove,
    /// Boxes closed by this edge (0, 1 or 2).
    pub claimed: u32,
    /// The mover closed at least one box and moves again.
    pub extra_turn: bool,
}

/// Represents the complete state of a Dots and Boxes game
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DotsAndBoxesState {
    h_edges: [[bool; BOXES]; DOTS],
    v_edges: [[bool; DOTS]; BOXES],
    owners: [[Option<Player>; BOXES]; BOXES],
    scores: [u32; 2],
    drawn: u32,
    to_move: Player,
    winner: Option<Outcome>,
    last_record: Option<MoveRecord>,
    moves: Vec<EdgeMove>,
}

fn side(player: Player) -> usize {
    match player {
        Player::One => 0,
        Player::Two => 1,
    }
}

impl DotsAndBoxesState {
    /// Creates a new game with no edges drawn.
    pub fn new() -> Self {
        Self {
            h_edges: [[false; BOXES]; DOTS],
            v_edges: [[false; DOTS]; BOXES],
            owners: [[None; BOXES]; BOXES],
            scores: [0, 0],
            drawn: 0,
            to_move: Player::One,
            winner: None,
            last_record: None,
            moves: Vec::new(),
        }
    }

    /// Whether an edge has been drawn.
    pub fn edge_drawn(&self, edge: EdgeMove) -> bool {
        match edge.orientation {
            Orientation::Horizontal => self.h_edges[edge.row][edge.col],
            Orientation::Vertical => self.v_edges[edge.row][edge.col],
        }
    }

    /// Who owns box (row, col), if it has been claimed.
    pub fn owner(&self, row: usize, col: usize) -> Option<Player> {
        self.owners[row][col]
    }

    /// Boxes claimed by `player`.
    pub fn score(&self, player: Player) -> u32 {
        self.scores[side(player)]
    }

    /// The player who moves next.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// The result, once all edges are drawn.
    pub fn winner(&self) -> Option<Outcome> {
        self.winner
    }

    /// Record of the most recently applied move.
    pub fn last_record(&self) -> Option<MoveRecord> {
        self.last_record
    }

    /// Append-only record of every edge drawn so far.
    pub fn history(&self) -> &[EdgeMove] {
        &self.moves
    }

    fn in_bounds(edge: EdgeMove) -> bool {
        match edge.orientation {
            Orientation::Horizontal => edge.row < DOTS && edge.col < BOXES,
            Orientation::Vertical => edge.row < BOXES && edge.col < DOTS,
        }
    }

    /// Drawn sides of box (row, col), 0..=4.
    fn box_sides(&self, row: usize, col: usize) -> u32 {
        self.h_edges[row][col] as u32
            + self.h_edges[row + 1][col] as u32
            + self.v_edges[row][col] as u32
            + self.v_edges[row][col + 1] as u32
    }

    /// The one or two boxes bordered by an edge.
    fn adjacent_boxes(edge: EdgeMove) -> Vec<(usize, usize)> {
        let mut boxes = Vec::with_capacity(2);
        match edge.orientation {
            Orientation::Horizontal => {
                if edge.row > 0 {
                    boxes.push((edge.row - 1, edge.col));
                }
                if edge.row < BOXES {
                    boxes.push((edge.row, edge.col));
                }
            }
            Orientation::Vertical => {
                if edge.col > 0 {
                    boxes.push((edge.row, edge.col - 1));
                }
                if edge.col < BOXES {
                    boxes.push((edge.row, edge.col));
                }
            }
        }
        boxes
    }

    /// All legal moves for `player`: every undrawn edge.
    pub fn legal_moves(&self, player: Player) -> Vec<EdgeMove> {
        if player != self.to_move || self.winner.is_some() {
            return Vec::new();
        }
        let mut moves = Vec::new();
        for row in 0..DOTS {
            for col in 0..BOXES {
                if !self.h_edges[row][col] {
                    moves.push(EdgeMove { orientation: Orientation::Horizontal, row, col });
                }
            }
        }
        for row in 0..BOXES {
            for col in 0..DOTS {
                if !self.v_edges[row][col] {
                    moves.push(EdgeMove { orientation: Orientation::Vertical, row, col });
                }
            }
        }
        moves
    }

    /// Applies a move for `player`, returning the successor state.
    pub fn apply(&self, mv: EdgeMove, player: Player) -> Result<Self, MoveError> {
        if self.winner.is_some() {
            return Err(MoveError::GameOver);
        }
        if player != self.to_move {
            return Err(MoveError::OutOfTurn);
        }
        if !Self::in_bounds(mv) {
            return Err(MoveError::OutOfBounds);
        }
        if self.edge_drawn(mv) {
            return Err(MoveError::Illegal);
        }
        Ok(self.apply_unchecked(mv))
    }

    fn apply_unchecked(&self, mv: EdgeMove) -> Self {
        let mut next = self.clone();
        let mover = self.to_move;
        match mv.orientation {
            Orientation::Horizontal => next.h_edges[mv.row][mv.col] = true,
            Orientation::Vertical => next.v_edges[mv.row][mv.col] = true,
        }
        next.drawn += 1;

        let mut claimed = 0;
        for (row, col) in Self::adjacent_boxes(mv) {
            if next.owners[row][col].is_none() && next.box_sides(row, col) == 4 {
                next.owners[row][col] = Some(mover);
                next.scores[side(mover)] += 1;
                claimed += 1;
            }
        }
        let extra_turn = claimed > 0;
        next.last_record = Some(MoveRecord { edge: mv, claimed, extra_turn });
        next.moves.push(mv);

        if next.drawn == TOTAL_EDGES {
            next.winner = Some(match next.scores[0].cmp(&next.scores[1]) {
                std::cmp::Ordering::Greater => Outcome::Win(Player::One),
                std::cmp::Ordering::Less => Outcome::Win(Player::Two),
                std::cmp::Ordering::Equal => Outcome::Draw,
            });
        } else if !extra_turn {
            next.to_move = mover.opponent();
        }
        next
    }

    /// Whether the edge closes at least one box.
    pub fn is_completing(&self, mv: EdgeMove) -> bool {
        Self::adjacent_boxes(mv)
            .into_iter()
            .any(|(r, c)| self.box_sides(r, c) == 3)
    }

    /// Whether the edge leaves every adjacent box below three sides.
    pub fn is_safe(&self, mv: EdgeMove) -> bool {
        Self::adjacent_boxes(mv)
            .into_iter()
            .all(|(r, c)| self.box_sides(r, c) <= 1)
    }

    /// Static evaluation: claimed-box lead.
    pub fn evaluate(&self, perspective: Player) -> i32 {
        let me = side(perspective);
        (self.scores[me] as i32 - self.scores[1 - me] as i32) * 100
    }

    /// Selects a move for the AI at the given difficulty.
    ///
    /// Completing edges are taken at every difficulty before the blunder
    /// roll. Otherwise safe edges are preferred; with none left, the AI
    /// opens the shortest chain. On hard the final [`ENDGAME_EDGES`]
    /// edges go through the search instead of the classifier.
    pub fn ai_move<R: Rng + ?Sized>(
        &self,
        ai: Player,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Option<EdgeMove> {
        let legal = self.legal_moves(ai);
        if legal.is_empty() {
            return None;
        }
        if let Some(mv) = legal.iter().copied().find(|&mv| self.is_completing(mv)) {
            tracing::debug!(?mv, "dots: closing a box");
            return Some(mv);
        }

        let profile = DifficultyProfile::dots_and_boxes(difficulty);
        if roll_blunder(rng, profile.blunder_chance) {
            return pick_random(rng, &legal).copied();
        }

        let remaining = TOTAL_EDGES - self.drawn;
        if difficulty == Difficulty::Hard && remaining <= ENDGAME_EDGES {
            let config = SearchConfig {
                depth: profile.depth,
                width: profile.width,
                jitter: profile.jitter,
            };
            if let Some((mv, score)) = best_move(self, ai, &config, rng) {
                tracing::debug!(?mv, score, "dots: endgame search");
                return Some(mv);
            }
        }

        let safe: Vec<EdgeMove> = legal.iter().copied().filter(|&mv| self.is_safe(mv)).collect();
        if !safe.is_empty() {
            return pick_random(rng, &safe).copied();
        }

        let mv = self.shortest_chain_opening(&legal);
        tracing::debug!(?mv, "dots: sacrificing shortest chain");
        Some(mv)
    }

    /// Among risky edges, the one whose adjacent chain of two-sided boxes
    /// is shortest, minimizing what the opponent can harvest.
    fn shortest_chain_opening(&self, legal: &[EdgeMove]) -> EdgeMove {
        let chains = self.chain_map();
        let mut best = legal[0];
        let mut best_len = u32::MAX;
        for &mv in legal {
            let len = Self::adjacent_boxes(mv)
                .into_iter()
                .filter(|&(r, c)| self.owners[r][c].is_none())
                .map(|(r, c)| chains[r][c])
                .max()
                .unwrap_or(0);
            if len < best_len {
                best_len = len;
                best = mv;
            }
        }
        best
    }

    /// Flood-fills the unclaimed boxes into chains: boxes with two or
    /// more drawn sides connected through shared undrawn edges. Returns
    /// the size of each box's chain (0 for boxes not in any chain).
    fn chain_map(&self) -> [[u32; BOXES]; BOXES] {
        let in_chain = |r: usize, c: usize| {
            self.owners[r][c].is_none() && self.box_sides(r, c) >= 2
        };
        let mut component = [[usize::MAX; BOXES]; BOXES];
        let mut sizes: Vec<u32> = Vec::new();
        for row in 0..BOXES {
            for col in 0..BOXES {
                if !in_chain(row, col) || component[row][col] != usize::MAX {
                    continue;
                }
                let id = sizes.len();
                sizes.push(0);
                let mut stack = vec![(row, col)];
                component[row][col] = id;
                while let Some((r, c)) = stack.pop() {
                    sizes[id] += 1;
                    let mut visit = |nr: usize, nc: usize, open: bool| {
                        if open && in_chain(nr, nc) && component[nr][nc] == usize::MAX {
                            component[nr][nc] = id;
                            stack.push((nr, nc));
                        }
                    };
                    if r > 0 {
                        visit(r - 1, c, !self.h_edges[r][c]);
                    }
                    if r + 1 < BOXES {
                        visit(r + 1, c, !self.h_edges[r + 1][c]);
                    }
                    if c > 0 {
                        visit(r, c - 1, !self.v_edges[r][c]);
                    }
                    if c + 1 < BOXES {
                        visit(r, c + 1, !self.v_edges[r][c + 1]);
                    }
                }
            }
        }
        let mut map = [[0u32; BOXES]; BOXES];
        for row in 0..BOXES {
            for col in 0..BOXES {
                if component[row][col] != usize::MAX {
                    map[row][col] = sizes[component[row][col]];
                }
            }
        }
        map
    }
}

impl Default for DotsAndBoxesState {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchState for DotsAndBoxesState {
    type Move = EdgeMove;

    fn to_move(&self) -> Player {
        self.to_move
    }

    fn legal_moves(&self) -> Vec<EdgeMove> {
        self.legal_moves(self.to_move)
    }

    fn play(&self, mv: &EdgeMove) -> Self {
        self.apply_unchecked(*mv)
    }

    fn outcome(&self) -> Option<Outcome> {
        self.winner
    }

    fn evaluate(&self, perspective: Player) -> i32 {
        self.evaluate(perspective)
    }
}

impl fmt::Display for DotsAndBoxesState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..DOTS {
            for col in 0..BOXES {
                write!(f, "+{}", if self.h_edges[row][col] { "---" } else { "   " })?;
            }
            writeln!(f, "+")?;
            if row < BOXES {
                for col in 0..DOTS {
                    write!(f, "{}", if self.v_edges[row][col] { "|" } else { " " })?;
                    if col < BOXES {
                        let mark = match self.owners[row][col] {
                            Some(Player::One) => " 1 ",
                            Some(Player::Two) => " 2 ",
                            None => "   ",
                        };
                        write!(f, "{}", mark)?;
                    }
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for EdgeMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.orientation {
            Orientation::Horizontal => 'h',
            Orientation::Vertical => 'v',
        };
        write!(f, "{},{},{}", tag, self.row, self.col)
    }
}

impl FromStr for EdgeMove {
    type Err = String;

    /// Parses an edge from `"h,row,col"` or `"v,row,col"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(|p| p.trim()).collect();
        if parts.len() != 3 {
            return Err("Expected format: h|v,row,col".to_string());
        }
        let orientation = match parts[0] {
            "h" | "H" => Orientation::Horizontal,
            "v" | "V" => Orientation::Vertical,
            other => return Err(format!("Unknown orientation: {}", other)),
        };
        let row = parts[1].parse::<usize>().map_err(|e| e.to_string())?;
        let col = parts[2].parse::<usize>().map_err(|e| e.to_string())?;
        let edge = EdgeMove { orientation, row, col };
        if !DotsAndBoxesState::in_bounds(edge) {
            return Err("Edge is outside the grid".to_string());
        }
        Ok(edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn h(row: usize, col: usize) -> EdgeMove {
        EdgeMove { orientation: Orientation::Horizontal, row, col }
    }

    fn v(row: usize, col: usize) -> EdgeMove {
        EdgeMove { orientation: Orientation::Vertical, row, col }
    }

    #[test]
    fn test_initial_position() {
        let game = DotsAndBoxesState::new();
        assert_eq!(game.legal_moves(Player::One).len(), TOTAL_EDGES as usize);
        assert_eq!(game.score(Player::One), 0);
    }

    #[test]
    fn test_closing_a_box_claims_it_and_grants_extra_turn() {
        let mut game = DotsAndBoxesState::new();
        // One draws three sides of box (0,0) while Two plays far away.
        game = game.apply(h(0, 0), Player::One).unwrap();
        game = game.apply(h(4, 3), Player::Two).unwrap();
        game = game.apply(h(1, 0), Player::One).unwrap();
        game = game.apply(h(4, 2), Player::Two).unwrap();
        game = game.apply(v(0, 0), Player::One).unwrap();
        game = game.apply(h(4, 1), Player::Two).unwrap();
        game = game.apply(v(0, 1), Player::One).unwrap();
        assert_eq!(game.owner(0, 0), Some(Player::One));
        assert_eq!(game.score(Player::One), 1);
        assert_eq!(game.to_move(), Player::One);
        let record = game.last_record().unwrap();
        assert_eq!(record.claimed, 1);
        assert!(record.extra_turn);
    }

    #[test]
    fn test_history_records_every_edge() {
        let game = DotsAndBoxesState::new();
        assert!(game.history().is_empty());
        let game = game.apply(h(0, 0), Player::One).unwrap();
        let game = game.apply(v(2, 3), Player::Two).unwrap();
        assert_eq!(game.history(), [h(0, 0), v(2, 3)]);
    }

    #[test]
    fn test_double_box_edge_claims_both() {
        let mut game = DotsAndBoxesState::new();
        // Boxes (0,0) and (0,1) both miss only the shared edge v(0,1).
        game.h_edges[0][0] = true;
        game.h_edges[0][1] = true;
        game.h_edges[1][0] = true;
        game.h_edges[1][1] = true;
        game.v_edges[0][0] = true;
        game.v_edges[0][2] = true;
        game.drawn = 6;
        let next = game.apply(v(0, 1), Player::One).unwrap();
        assert_eq!(next.score(Player::One), 2);
        assert_eq!(next.last_record().unwrap().claimed, 2);
        assert_eq!(next.to_move(), Player::One);
    }

    #[test]
    fn test_illegal_moves_rejected() {
        let game = DotsAndBoxesState::new();
        let game = game.apply(h(0, 0), Player::One).unwrap();
        assert_eq!(game.apply(h(0, 0), Player::Two), Err(MoveError::Illegal));
        assert_eq!(game.apply(h(5, 0), Player::Two), Err(MoveError::OutOfBounds));
        assert_eq!(game.apply(h(0, 1), Player::One), Err(MoveError::OutOfTurn));
    }

    #[test]
    fn test_edge_classification() {
        let mut game = DotsAndBoxesState::new();
        assert!(game.is_safe(h(2, 2)));
        game.h_edges[0][0] = true;
        game.v_edges[0][0] = true;
        game.drawn = 2;
        // A third side on box (0,0) would hand it to the opponent.
        assert!(!game.is_safe(h(1, 0)));
        assert!(!game.is_completing(h(1, 0)));
        game.v_edges[0][1] = true;
        game.drawn = 3;
        assert!(game.is_completing(h(1, 0)));
    }

    #[test]
    fn test_ai_sacrifices_the_shortest_chain() {
        // All horizontal edges drawn except the tops of boxes (0,0) and
        // (0,1); the vertical edge between them is drawn. Box (0,0) forms
        // a chain of one, boxes (0,1)..(0,3) a chain of three, and rows
        // 1..3 chains of four. Every remaining edge is risky.
        let mut game = DotsAndBoxesState::new();
        for row in 0..DOTS {
            for col in 0..BOXES {
                game.h_edges[row][col] = true;
            }
        }
        game.h_edges[0][0] = false;
        game.h_edges[0][1] = false;
        game.v_edges[0][1] = true;
        game.drawn = 19;

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(9);
        let mv = game.ai_move(Player::One, Difficulty::Hard, &mut rng).unwrap();
        let touches_short_chain = DotsAndBoxesState::adjacent_boxes(mv).contains(&(0, 0));
        assert!(touches_short_chain, "expected the one-box chain, got {}", mv);
    }

    #[test]
    fn test_ai_ladder_over_a_full_game() {
        // Completing edges are always taken, and safe edges are never
        // passed over outside the endgame search window.
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(33);
        let mut game = DotsAndBoxesState::new();
        while game.winner().is_none() {
            let mover = game.to_move();
            let had_completing = game
                .legal_moves(mover)
                .iter()
                .any(|&mv| game.is_completing(mv));
            let had_safe = game.legal_moves(mover).iter().any(|&mv| game.is_safe(mv));
            let in_search_window = TOTAL_EDGES - game.drawn <= 12;
            let mv = game.ai_move(mover, Difficulty::Hard, &mut rng).unwrap();
            assert!(game.legal_moves(mover).contains(&mv));
            if had_completing {
                assert!(game.is_completing(mv));
            } else if had_safe && !in_search_window {
                assert!(game.is_safe(mv));
            }
            game = game.apply(mv, mover).unwrap();
            let unowned = (0..BOXES)
                .flat_map(|r| (0..BOXES).map(move |c| (r, c)))
                .filter(|&(r, c)| game.owner(r, c).is_none())
                .count() as u32;
            assert_eq!(
                game.score(Player::One) + game.score(Player::Two) + unowned,
                TOTAL_BOXES
            );
        }
        assert_eq!(
            game.score(Player::One) + game.score(Player::Two),
            TOTAL_BOXES
        );
    }

    #[test]
    fn test_move_notation() {
        let mv = EdgeMove::from_str("v, 2, 4").unwrap();
        assert_eq!(mv, v(2, 4));
        assert!(EdgeMove::from_str("h,5,0").is_err());
        assert_eq!(mv.to_string(), "v,2,4");
        assert_eq!(h(1, 3).to_string(), "h,1,3");
    }
}
