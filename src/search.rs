//! # Generic Adversarial Search
//!
//! Depth-bounded minimax with alpha-beta pruning over the [`SearchState`]
//! trait. The engine is instantiated per game: each game state supplies its
//! own move generator, transition function and static evaluation, and the
//! search works the same way for all of them.
//!
//! The maximizing role at every node is derived from whose turn it is in
//! that node's state, not from alternating a flag. Games that grant the
//! mover an extra turn (Mancala store landings, Dots and Boxes box
//! completions) therefore recurse with the same role automatically.

use crate::{Outcome, Player};
use rand::Rng;

/// Base magnitude of a terminal win/loss score. Remaining depth is added on
/// top so the search prefers faster wins and slower losses; static
/// evaluations must stay well below this.
pub const WIN_SCORE: i32 = 1_000_000;

/// The seam between the shared search engine and a game's rules.
///
/// `play` is only ever called with moves returned by `legal_moves`, so
/// implementations may assume legality. All methods are pure: `play`
/// returns a fresh state and never mutates the receiver.
pub trait SearchState: Clone {
    type Move: Clone;

    /// The player who moves next in this state.
    fn to_move(&self) -> Player;
    /// All legal moves for the player to move; empty once the game is over.
    fn legal_moves(&self) -> Vec<Self::Move>;
    /// Applies a legal move, returning the resulting state.
    fn play(&self, mv: &Self::Move) -> Self;
    /// The game result, if this state is terminal.
    fn outcome(&self) -> Option<Outcome>;
    /// Static heuristic value of this state from `perspective`'s side.
    fn evaluate(&self, perspective: Player) -> i32;
}

/// Per-call knobs for [`best_move`].
#[derive(Clone, Copy, Debug)]
pub struct SearchConfig {
    /// Search depth in plies; the root move itself consumes one ply.
    pub depth: u32,
    /// Cap on the number of child positions searched per node. When set,
    /// children are ordered by their static evaluation before truncation,
    /// which also tightens alpha-beta pruning.
    pub width: Option<usize>,
    /// Amplitude of the random offset added to root scores when comparing
    /// moves; zero compares raw scores.
    pub jitter: i32,
}

/// Recursive minimax over `state`, scored from `ai`'s perspective.
///
/// Terminal positions score `±(WIN_SCORE + depth)`; at depth zero (or when
/// the mover has no legal reply) the static evaluation is returned.
pub fn minimax<S: SearchState>(
    state: &S,
    depth: u32,
    mut alpha: i32,
    mut beta: i32,
    ai: Player,
    width: Option<usize>,
) -> i32 {
    if let Some(outcome) = state.outcome() {
        return match outcome {
            Outcome::Win(winner) if winner == ai => WIN_SCORE + depth as i32,
            Outcome::Win(_) => -(WIN_SCORE + depth as i32),
            Outcome::Draw => 0,
        };
    }
    if depth == 0 {
        return state.evaluate(ai);
    }

    let moves = state.legal_moves();
    if moves.is_empty() {
        return state.evaluate(ai);
    }

    let maximizing = state.to_move() == ai;
    let children = expand_ordered(state, &moves, ai, maximizing, width);

    if maximizing {
        let mut best = -(WIN_SCORE * 2);
        for child in &children {
            let score = minimax(child, depth - 1, alpha, beta, ai, width);
            best = best.max(score);
            alpha = alpha.max(best);
            if beta <= alpha {
                break;
            }
        }
        best
    } else {
        let mut best = WIN_SCORE * 2;
        for child in &children {
            let score = minimax(child, depth - 1, alpha, beta, ai, width);
            best = best.min(score);
            beta = beta.min(best);
            if beta <= alpha {
                break;
            }
        }
        best
    }
}

/// Expands all children, pre-sorting by static evaluation and truncating to
/// the configured width when one is set.
fn expand_ordered<S: SearchState>(
    state: &S,
    moves: &[S::Move],
    ai: Player,
    maximizing: bool,
    width: Option<usize>,
) -> Vec<S> {
    let mut children: Vec<S> = moves.iter().map(|mv| state.play(mv)).collect();
    if let Some(width) = width {
        if children.len() > width {
            children.sort_by_cached_key(|child| {
                let value = child.evaluate(ai);
                if maximizing {
                    -value
                } else {
                    value
                }
            });
            children.truncate(width);
        }
    }
    children
}

/// Runs the search from the root and returns the best move with its score,
/// or `None` when `ai` is not the player to move or has no legal move.
///
/// When `config.jitter` is non-zero, a uniform random offset in
/// `[-jitter, jitter]` is added to each root score before comparison, so
/// near-ties resolve differently from game to game; the returned score is
/// the unjittered one.
pub fn best_move<S, R>(
    state: &S,
    ai: Player,
    config: &SearchConfig,
    rng: &mut R,
) -> Option<(S::Move, i32)>
where
    S: SearchState,
    R: Rng + ?Sized,
{
    if state.to_move() != ai || state.outcome().is_some() {
        return None;
    }
    let moves = state.legal_moves();
    if moves.is_empty() {
        return None;
    }

    let child_depth = config.depth.saturating_sub(1);
    let mut alpha = -(WIN_SCORE * 2);
    let beta = WIN_SCORE * 2;
    let mut best: Option<(S::Move, i32)> = None;
    let mut best_biased = i32::MIN;

    for mv in moves {
        let child = state.play(&mv);
        let score = minimax(&child, child_depth, alpha, beta, ai, config.width);
        let biased = if config.jitter > 0 {
            score + rng.random_range(-config.jitter..=config.jitter)
        } else {
            score
        };
        if best.is_none() || biased > best_biased {
            best_biased = biased;
            best = Some((mv, score));
        }
        alpha = alpha.max(score);
    }

    if let Some((_, score)) = &best {
        tracing::trace!(depth = config.depth, score, "minimax root finished");
    }
    best
}
