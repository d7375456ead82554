//! # Mancala (Kalah) Game Implementation
//!
//! Two rows of six pits with a store per player, four seeds per pit at the
//! start. Sowing runs counterclockwise, drops a seed into the sower's own
//! store but skips the opponent's. Landing the last seed in the own store
//! grants an extra turn; landing it in an empty own pit captures that seed
//! together with the opposite pit's contents. When either side runs out of
//! seeds the other side sweeps its remainder and the fuller store wins.
//!
//! Seed count is conserved at 48 across pits and stores in every reachable
//! state.

use crate::difficulty::{pick_random, roll_blunder, DifficultyProfile};
use crate::search::{best_move, SearchConfig, SearchState};
use crate::{Difficulty, MoveError, Outcome, Player};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Pits per side, excluding the store.
pub const PITS: usize = 6;

/// Seeds in each pit at the start of the game.
pub const INITIAL_SEEDS: u32 = 4;

/// Total seeds on the board, invariant across the whole game.
pub const TOTAL_SEEDS: u32 = 2 * PITS as u32 * INITIAL_SEEDS;

/// Selects one of the mover's pits, indexed 0..6 counterclockwise (pit 5
/// is adjacent to the mover's store).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MancalaMove(pub usize);

/// What a move did, recorded on the resulting state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveRecord {
    pub pit: usize,
    /// Seeds banked by an empty-pit capture, zero when none fired.
    pub captured: u32,
    /// The sower landed in their own store and moves again.
    pub extra_turn: bool,
}

/// Represents the complete state of a Mancala game
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MancalaState {
    pits: [[u32; PITS]; 2],
    stores: [u32; 2],
    to_move: Player,
    winner: Option<Outcome>,
    last_record: Option<MoveRecord>,
    moves: Vec<MancalaMove>,
}

fn side(player: Player) -> usize {
    match player {
        Player::One => 0,
        Player::Two => 1,
    }
}

impl MancalaState {
    /// Creates a new game with four seeds in every pit.
    pub fn new() -> Self {
        Self {
            pits: [[INITIAL_SEEDS; PITS]; 2],
            stores: [0, 0],
            to_move: Player::One,
            winner: None,
            last_record: None,
            moves: Vec::new(),
        }
    }

    /// Seeds in one of `player`'s pits.
    pub fn pit(&self, player: Player, index: usize) -> u32 {
        self.pits[side(player)][index]
    }

    /// Seeds banked in `player`'s store.
    pub fn store(&self, player: Player) -> u32 {
        self.stores[side(player)]
    }

    /// The player who moves next.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// The result, once the game has been decided.
    pub fn winner(&self) -> Option<Outcome> {
        self.winner
    }

    /// Record of the most recently applied move.
    pub fn last_record(&self) -> Option<MoveRecord> {
        self.last_record
    }

    /// Append-only record of every move applied so far.
    pub fn history(&self) -> &[MancalaMove] {
        &self.moves
    }

    /// All legal moves for `player`: their non-empty pits.
    pub fn legal_moves(&self, player: Player) -> Vec<MancalaMove> {
        if player != self.to_move || self.winner.is_some() {
            return Vec::new();
        }
        (0..PITS)
            .filter(|&i| self.pits[side(player)][i] > 0)
            .map(MancalaMove)
            .collect()
    }

    /// Applies a move for `player`, returning the successor state.
    pub fn apply(&self, mv: MancalaMove, player: Player) -> Result<Self, MoveError> {
        if self.winner.is_some() {
            return Err(MoveError::GameOver);
        }
        if player != self.to_move {
            return Err(MoveError::OutOfTurn);
        }
        if mv.0 >= PITS {
            return Err(MoveError::OutOfBounds);
        }
        if self.pits[side(player)][mv.0] == 0 {
            return Err(MoveError::Illegal);
        }
        Ok(self.apply_unchecked(mv))
    }

    fn apply_unchecked(&self, mv: MancalaMove) -> Self {
        let mut next = self.clone();
        let mover = side(self.to_move);
        let mut seeds = next.pits[mover][mv.0];
        next.pits[mover][mv.0] = 0;

        // Positions 0..5 are the mover's pits, 6 the mover's store,
        // 7..12 the opponent's pits; the opponent's store is skipped.
        let mut pos = mv.0;
        while seeds > 0 {
            pos = (pos + 1) % (2 * PITS + 1);
            match pos {
                p if p < PITS => next.pits[mover][p] += 1,
                PITS => next.stores[mover] += 1,
                p => next.pits[1 - mover][p - PITS - 1] += 1,
            }
            seeds -= 1;
        }

        let extra_turn = pos == PITS;
        let mut captured = 0;
        // Last seed into a previously empty own pit captures it and the
        // opposite pit, whatever the opposite pit holds.
        if pos < PITS && next.pits[mover][pos] == 1 {
            let opposite = PITS - 1 - pos;
            captured = next.pits[mover][pos] + next.pits[1 - mover][opposite];
            next.pits[mover][pos] = 0;
            next.pits[1 - mover][opposite] = 0;
            next.stores[mover] += captured;
        }
        next.last_record = Some(MoveRecord { pit: mv.0, captured, extra_turn });
        next.moves.push(mv);

        if !extra_turn {
            next.to_move = self.to_move.opponent();
        }

        // A side with no seeds ends the game: the other side sweeps.
        if next.pits.iter().any(|row| row.iter().all(|&s| s == 0)) {
            for s in 0..2 {
                next.stores[s] += next.pits[s].iter().sum::<u32>();
                next.pits[s] = [0; PITS];
            }
            next.winner = Some(match next.stores[0].cmp(&next.stores[1]) {
                std::cmp::Ordering::Greater => Outcome::Win(Player::One),
                std::cmp::Ordering::Less => Outcome::Win(Player::Two),
                std::cmp::Ordering::Equal => Outcome::Draw,
            });
        }
        next
    }

    /// Static evaluation: store lead dominates, seeds still on the own
    /// side count as potential.
    pub fn evaluate(&self, perspective: Player) -> i32 {
        let me = side(perspective);
        let store_lead = self.stores[me] as i32 - self.stores[1 - me] as i32;
        let side_lead = self.pits[me].iter().sum::<u32>() as i32
            - self.pits[1 - me].iter().sum::<u32>() as i32;
        store_lead * 10 + side_lead
    }

    /// Selects a move for the AI at the given difficulty.
    ///
    /// A move that banks a majority of all seeds is a guaranteed win and
    /// is played before any blunder roll.
    pub fn ai_move<R: Rng + ?Sized>(
        &self,
        ai: Player,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Option<MancalaMove> {
        let legal = self.legal_moves(ai);
        if legal.is_empty() {
            return None;
        }
        if let Some(mv) = legal.iter().copied().find(|&mv| {
            self.apply_unchecked(mv).stores[side(ai)] > TOTAL_SEEDS / 2
        }) {
            tracing::debug!(pit = mv.0, "mancala: banking a winning majority");
            return Some(mv);
        }

        let profile = DifficultyProfile::mancala(difficulty);
        if roll_blunder(rng, profile.blunder_chance) {
            return pick_random(rng, &legal).copied();
        }

        let config = SearchConfig {
            depth: profile.depth,
            width: profile.width,
            jitter: profile.jitter,
        };
        best_move(self, ai, &config, rng).map(|(mv, score)| {
            tracing::debug!(pit = mv.0, score, "mancala: searched move");
            mv
        })
    }
}

impl Default for MancalaState {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchState for MancalaState {
    type Move = MancalaMove;

    fn to_move(&self) -> Player {
        self.to_move
    }

    fn legal_moves(&self) -> Vec<MancalaMove> {
        self.legal_moves(self.to_move)
    }

    fn play(&self, mv: &MancalaMove) -> Self {
        self.apply_unchecked(*mv)
    }

    fn outcome(&self) -> Option<Outcome> {
        self.winner
    }

    fn evaluate(&self, perspective: Player) -> i32 {
        self.evaluate(perspective)
    }
}

impl fmt::Display for MancalaState {
    /// Renders the board from Player One's seat: Two's pits across the
    /// top (reversed, matching the counterclockwise flow), stores at the
    /// edges.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "    ")?;
        for i in (0..PITS).rev() {
            write!(f, "{:>3}", self.pits[1][i])?;
        }
        writeln!(f)?;
        write!(f, "{:>3} ", self.stores[1])?;
        write!(f, "{:>width$}", "", width = 3 * PITS)?;
        writeln!(f, " {:>3}", self.stores[0])?;
        write!(f, "    ")?;
        for i in 0..PITS {
            write!(f, "{:>3}", self.pits[0][i])?;
        }
        writeln!(f)
    }
}

impl fmt::Display for MancalaMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MancalaMove {
    type Err = String;

    /// Parses a pit index `"0"`..`"5"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pit = s.trim().parse::<usize>().map_err(|e| e.to_string())?;
        if pit >= PITS {
            return Err(format!("Pit must be 0-{}", PITS - 1));
        }
        Ok(MancalaMove(pit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn total(state: &MancalaState) -> u32 {
        state.pits.iter().flatten().sum::<u32>() + state.stores.iter().sum::<u32>()
    }

    #[test]
    fn test_initial_position() {
        let game = MancalaState::new();
        assert_eq!(game.legal_moves(Player::One).len(), PITS);
        assert_eq!(total(&game), TOTAL_SEEDS);
        assert_eq!(game.store(Player::One), 0);
    }

    #[test]
    fn test_store_landing_grants_extra_turn() {
        // Pit 2 holds four seeds: they land in pits 3, 4, 5 and the store.
        let game = MancalaState::new();
        let next = game.apply(MancalaMove(2), Player::One).unwrap();
        assert_eq!(next.store(Player::One), 1);
        assert_eq!(next.to_move(), Player::One);
        assert!(next.last_record().unwrap().extra_turn);
    }

    #[test]
    fn test_history_is_append_only() {
        let game = MancalaState::new();
        assert!(game.history().is_empty());
        let next = game.apply(MancalaMove(2), Player::One).unwrap();
        // Pit 2 grants an extra turn, so One sows again.
        let next = next.apply(MancalaMove(0), Player::One).unwrap();
        assert_eq!(next.history(), [MancalaMove(2), MancalaMove(0)]);
        // Applying never touched the earlier states.
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_landing_short_or_past_the_store_is_a_normal_turn() {
        let game = MancalaState::new();
        // Pit 1 ends one pit short of the store.
        let short = game.apply(MancalaMove(1), Player::One).unwrap();
        assert!(!short.last_record().unwrap().extra_turn);
        assert_eq!(short.to_move(), Player::Two);
        // Pit 3 sows past the store into the opponent's row.
        let past = game.apply(MancalaMove(3), Player::One).unwrap();
        assert!(!past.last_record().unwrap().extra_turn);
        assert_eq!(past.to_move(), Player::Two);
    }

    #[test]
    fn test_sowing_skips_opponent_store() {
        let mut game = MancalaState::new();
        // Load pit 5 with enough seeds to lap the board.
        game.pits[0][5] = 9;
        let next = game.apply(MancalaMove(5), Player::One).unwrap();
        // Seeds: own store, opponent pits 0..5, then own pits 0 and 1;
        // the opponent store stays empty.
        assert_eq!(next.store(Player::One), 1);
        assert_eq!(next.store(Player::Two), 0);
        assert_eq!(next.pit(Player::One, 0), INITIAL_SEEDS + 1);
        assert_eq!(next.pit(Player::One, 1), INITIAL_SEEDS + 1);
        assert_eq!(next.pit(Player::Two, 5), INITIAL_SEEDS + 1);
    }

    #[test]
    fn test_empty_pit_landing_captures_opposite() {
        let mut game = MancalaState::new();
        game.pits[0] = [1, 0, 4, 4, 4, 4];
        // One seed from pit 0 lands in the empty pit 1, capturing it and
        // the opponent's pit 4 across from it.
        let next = game.apply(MancalaMove(0), Player::One).unwrap();
        assert_eq!(next.pit(Player::One, 1), 0);
        assert_eq!(next.pit(Player::Two, 4), 0);
        assert_eq!(next.store(Player::One), 1 + INITIAL_SEEDS);
        assert_eq!(next.last_record().unwrap().captured, 1 + INITIAL_SEEDS);
        assert_eq!(next.to_move(), Player::Two);
    }

    #[test]
    fn test_capture_fires_even_when_opposite_is_empty() {
        let mut game = MancalaState::new();
        game.pits[0] = [1, 0, 4, 4, 4, 4];
        game.stores[1] += game.pits[1][4];
        game.pits[1][4] = 0;
        let next = game.apply(MancalaMove(0), Player::One).unwrap();
        assert_eq!(next.pit(Player::One, 1), 0);
        assert_eq!(next.last_record().unwrap().captured, 1);
        assert_eq!(next.store(Player::One), 1);
    }

    #[test]
    fn test_empty_side_triggers_sweep() {
        let mut game = MancalaState::new();
        game.pits[0] = [0, 0, 0, 0, 0, 1];
        game.stores[0] = 23;
        game.pits[1] = [4, 4, 4, 4, 4, 0];
        game.stores[1] = 1;
        let next = game.apply(MancalaMove(5), Player::One).unwrap();
        // One's side is empty after the extra-turn seed reaches the store;
        // Two sweeps 20 seeds and wins.
        assert_eq!(next.store(Player::One), 24);
        assert_eq!(next.store(Player::Two), 21);
        assert_eq!(next.winner(), Some(Outcome::Win(Player::One)));
    }

    #[test]
    fn test_illegal_moves_rejected() {
        let mut game = MancalaState::new();
        game.pits[0][3] = 0;
        assert_eq!(game.apply(MancalaMove(3), Player::One), Err(MoveError::Illegal));
        assert_eq!(game.apply(MancalaMove(6), Player::One), Err(MoveError::OutOfBounds));
        assert_eq!(game.apply(MancalaMove(0), Player::Two), Err(MoveError::OutOfTurn));
    }

    #[test]
    fn test_seed_conservation_over_full_game() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        let mut game = MancalaState::new();
        let mut turns = 0;
        while game.winner().is_none() && turns < 500 {
            let mover = game.to_move();
            let mv = game.ai_move(mover, Difficulty::Normal, &mut rng).unwrap();
            assert!(game.legal_moves(mover).contains(&mv));
            game = game.apply(mv, mover).unwrap();
            assert_eq!(total(&game), TOTAL_SEEDS);
            turns += 1;
        }
        assert!(game.winner().is_some());
        assert_eq!(
            game.store(Player::One) + game.store(Player::Two),
            TOTAL_SEEDS
        );
    }

    #[test]
    fn test_search_exploits_extra_turns() {
        // Pit 2 gives a free extra move; the searching AI should see the
        // extra turn rather than treating it as a wasted tempo.
        let game = MancalaState::new();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let mv = game.ai_move(Player::One, Difficulty::Hard, &mut rng).unwrap();
        assert_eq!(mv, MancalaMove(2));
    }

    #[test]
    fn test_move_notation() {
        assert_eq!(MancalaMove::from_str("4").unwrap(), MancalaMove(4));
        assert!(MancalaMove::from_str("6").is_err());
        assert_eq!(MancalaMove(2).to_string(), "2");
    }
}
