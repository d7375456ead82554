//! # Difficulty Controller
//!
//! Maps the three player-facing difficulty levels onto the knobs each game's
//! AI actually turns: search depth, candidate width, the probability of
//! deliberately discarding the computed best move for a random legal one,
//! and the small score jitter normal mode uses to vary otherwise-tied best
//! moves. Hard mode searches at full depth, never blunders and never
//! jitters.
//!
//! The profile is pure configuration: the engine never adjusts it at
//! runtime, and all randomness flows through the generator the caller
//! injects.

use rand::Rng;

/// Player-facing strength of the computer opponent.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

/// Concrete search knobs derived from a [`Difficulty`] for one game.
#[derive(Clone, Copy, Debug)]
pub struct DifficultyProfile {
    /// Minimax depth in plies.
    pub depth: u32,
    /// Cap on the number of child positions searched per node, for games
    /// whose branching factor makes full expansion intractable.
    pub width: Option<usize>,
    /// Probability of replacing the computed move with a uniformly random
    /// legal move.
    pub blunder_chance: f64,
    /// Amplitude of the random score offset added when comparing root
    /// moves; zero disables it.
    pub jitter: i32,
}

impl DifficultyProfile {
    /// Connect Four: depth-dominant game with a small branching factor.
    pub fn connect_four(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self { depth: 2, width: None, blunder_chance: 0.35, jitter: 0 },
            Difficulty::Normal => Self { depth: 4, width: None, blunder_chance: 0.10, jitter: 8 },
            Difficulty::Hard => Self { depth: 6, width: None, blunder_chance: 0.0, jitter: 0 },
        }
    }

    /// Othello: wider branching, so shallower ceilings.
    pub fn othello(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self { depth: 2, width: None, blunder_chance: 0.30, jitter: 0 },
            Difficulty::Normal => Self { depth: 3, width: None, blunder_chance: 0.10, jitter: 6 },
            Difficulty::Hard => Self { depth: 5, width: None, blunder_chance: 0.0, jitter: 0 },
        }
    }

    /// Checkers: searched over pre-resolved capture chains.
    pub fn checkers(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self { depth: 2, width: None, blunder_chance: 0.35, jitter: 0 },
            Difficulty::Normal => Self { depth: 4, width: None, blunder_chance: 0.15, jitter: 10 },
            Difficulty::Hard => Self { depth: 6, width: None, blunder_chance: 0.0, jitter: 0 },
        }
    }

    /// Omok: 361 intersections force a narrow candidate set.
    pub fn omok(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self { depth: 1, width: Some(8), blunder_chance: 0.30, jitter: 0 },
            Difficulty::Normal => Self { depth: 2, width: Some(10), blunder_chance: 0.10, jitter: 50 },
            Difficulty::Hard => Self { depth: 3, width: Some(12), blunder_chance: 0.0, jitter: 0 },
        }
    }

    /// Mancala: cheap moves allow the deepest search in the arena.
    pub fn mancala(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self { depth: 3, width: None, blunder_chance: 0.35, jitter: 0 },
            Difficulty::Normal => Self { depth: 5, width: None, blunder_chance: 0.10, jitter: 3 },
            Difficulty::Hard => Self { depth: 8, width: None, blunder_chance: 0.0, jitter: 0 },
        }
    }

    /// Battleship: no tree search; only the blunder probability applies.
    pub fn battleship(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self { depth: 0, width: None, blunder_chance: 0.40, jitter: 0 },
            Difficulty::Normal => Self { depth: 0, width: None, blunder_chance: 0.10, jitter: 0 },
            Difficulty::Hard => Self { depth: 0, width: None, blunder_chance: 0.0, jitter: 0 },
        }
    }

    /// Dots and Boxes: chain analysis first, bounded minimax in the endgame.
    pub fn dots_and_boxes(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self { depth: 1, width: None, blunder_chance: 0.35, jitter: 0 },
            Difficulty::Normal => Self { depth: 3, width: None, blunder_chance: 0.10, jitter: 5 },
            Difficulty::Hard => Self { depth: 5, width: None, blunder_chance: 0.0, jitter: 0 },
        }
    }
}

/// Rolls the difficulty's blunder probability on the injected generator.
pub(crate) fn roll_blunder<R: Rng + ?Sized>(rng: &mut R, chance: f64) -> bool {
    chance > 0.0 && rng.random::<f64>() < chance
}

/// Uniformly picks one element of a non-empty slice.
pub(crate) fn pick_random<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        Some(&items[rng.random_range(0..items.len())])
    }
}
