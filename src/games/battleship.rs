//! # Battleship Game Implementation
//!
//! Two hidden 10x10 grids with the classic five-ship fleet (5, 4, 3, 3, 2).
//! Players alternate single shots; a shot reports miss, hit, or sunk, and
//! the first player to sink the whole opposing fleet wins. Repeating a
//! shot is illegal.
//!
//! The computer opponent is not a minimax player: it keeps an explicit
//! memory ([`AiState`]) owned by the caller and updated from shot results.
//! In hunt mode it fires at the highest ship-placement density over the
//! unknown cells, restricted to a checkerboard parity while the smallest
//! surviving ship spans two cells. A hit switches it to target mode, where
//! it works a stack of neighboring cells, locking onto the ship's axis
//! after a second aligned hit.

use crate::difficulty::{pick_random, roll_blunder, DifficultyProfile};
use crate::{Difficulty, MoveError, Outcome, Player};
use rand::Rng;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Size of each grid (10x10).
pub const SIZE: usize = 10;

/// Ship lengths making up a full fleet.
pub const FLEET_LENGTHS: [usize; 5] = [5, 4, 3, 3, 2];

/// Density multiplier applied next to unresolved hits on hard.
const ADJACENCY_BOOST: u32 = 3;

/// A grid coordinate, also used as the attack move.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

/// What a shot found.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShotResult {
    Miss,
    Hit,
    /// The hit sank a ship of the given length.
    Sunk { length: usize },
}

/// Shot record kept on the state after each attack.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShotReport {
    pub shooter: Player,
    pub coord: Coord,
    pub result: ShotResult,
}

/// Rejected fleet layouts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FleetError {
    #[error("Fleet must consist of ships of lengths {FLEET_LENGTHS:?}")]
    WrongComposition,
    #[error("Ship extends outside the grid")]
    OutOfBounds,
    #[error("Ships overlap at {0}")]
    Overlap(Coord),
}

/// A single ship: its cells and how many have been hit.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ship {
    cells: Vec<Coord>,
    hits: usize,
}

impl Ship {
    /// A straight ship of `length` cells starting at (row, col).
    pub fn new(row: usize, col: usize, length: usize, horizontal: bool) -> Self {
        let cells = (0..length)
            .map(|i| {
                if horizontal {
                    Coord { row, col: col + i }
                } else {
                    Coord { row: row + i, col }
                }
            })
            .collect();
        Self { cells, hits: 0 }
    }

    pub fn length(&self) -> usize {
        self.cells.len()
    }

    pub fn is_sunk(&self) -> bool {
        self.hits == self.cells.len()
    }

    fn covers(&self, coord: Coord) -> bool {
        self.cells.contains(&coord)
    }
}

/// Validates a fleet layout: correct composition, in bounds, no overlap.
fn validate_fleet(ships: &[Ship]) -> Result<(), FleetError> {
    let mut lengths: Vec<usize> = ships.iter().map(Ship::length).collect();
    lengths.sort_unstable_by(|a, b| b.cmp(a));
    let mut expected = FLEET_LENGTHS.to_vec();
    expected.sort_unstable_by(|a, b| b.cmp(a));
    if lengths != expected {
        return Err(FleetError::WrongComposition);
    }
    let mut occupied = [[false; SIZE]; SIZE];
    for ship in ships {
        for &cell in &ship.cells {
            if cell.row >= SIZE || cell.col >= SIZE {
                return Err(FleetError::OutOfBounds);
            }
            if occupied[cell.row][cell.col] {
                return Err(FleetError::Overlap(cell));
            }
            occupied[cell.row][cell.col] = true;
        }
    }
    Ok(())
}

/// Places a full fleet at random, rejecting overlaps until every ship
/// fits. The board is sparse enough that this always terminates quickly.
pub fn place_fleet_randomly<R: Rng + ?Sized>(rng: &mut R) -> Vec<Ship> {
    let mut ships: Vec<Ship> = Vec::with_capacity(FLEET_LENGTHS.len());
    let mut occupied = [[false; SIZE]; SIZE];
    for &length in &FLEET_LENGTHS {
        loop {
            let horizontal = rng.random::<bool>();
            let (max_row, max_col) = if horizontal {
                (SIZE, SIZE - length + 1)
            } else {
                (SIZE - length + 1, SIZE)
            };
            let row = rng.random_range(0..max_row);
            let col = rng.random_range(0..max_col);
            let ship = Ship::new(row, col, length, horizontal);
            if ship.cells.iter().all(|c| !occupied[c.row][c.col]) {
                for c in &ship.cells {
                    occupied[c.row][c.col] = true;
                }
                ships.push(ship);
                break;
            }
        }
    }
    ships
}

/// Represents the complete state of a Battleship game
///
/// Each side has a fleet and a grid of incoming shots. Applying an attack
/// never mutates this value; `apply` returns the successor state with the
/// result recorded in [`BattleshipState::last_shot`].
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleshipState {
    fleets: [Vec<Ship>; 2],
    /// shots[s][r][c]: the shot the opponent fired at side `s`, if any;
    /// `true` for a hit.
    shots: [[[Option<bool>; SIZE]; SIZE]; 2],
    to_move: Player,
    winner: Option<Outcome>,
    last_shot: Option<ShotReport>,
    moves: Vec<Coord>,
}

fn side(player: Player) -> usize {
    match player {
        Player::One => 0,
        Player::Two => 1,
    }
}

impl BattleshipState {
    /// Creates a new game from two validated fleet layouts.
    pub fn new(fleet_one: Vec<Ship>, fleet_two: Vec<Ship>) -> Result<Self, FleetError> {
        validate_fleet(&fleet_one)?;
        validate_fleet(&fleet_two)?;
        Ok(Self {
            fleets: [fleet_one, fleet_two],
            shots: [[[None; SIZE]; SIZE]; 2],
            to_move: Player::One,
            winner: None,
            last_shot: None,
            moves: Vec::new(),
        })
    }

    /// Creates a new game with both fleets placed at random.
    pub fn new_random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            fleets: [place_fleet_randomly(rng), place_fleet_randomly(rng)],
            shots: [[[None; SIZE]; SIZE]; 2],
            to_move: Player::One,
            winner: None,
            last_shot: None,
            moves: Vec::new(),
        }
    }

    /// The player who shoots next.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// The result, once one fleet is fully sunk.
    pub fn winner(&self) -> Option<Outcome> {
        self.winner
    }

    /// The most recent shot and what it found.
    pub fn last_shot(&self) -> Option<ShotReport> {
        self.last_shot
    }

    /// Append-only record of every shot fired so far, both sides
    /// interleaved in turn order.
    pub fn history(&self) -> &[Coord] {
        &self.moves
    }

    /// The shot `viewer` has fired at (row, col), if any; `true` for a hit.
    pub fn shot_at(&self, viewer: Player, row: usize, col: usize) -> Option<bool> {
        self.shots[side(viewer.opponent())][row][col]
    }

    /// Lengths of `player`'s ships still afloat.
    pub fn remaining_ships(&self, player: Player) -> Vec<usize> {
        self.fleets[side(player)]
            .iter()
            .filter(|s| !s.is_sunk())
            .map(Ship::length)
            .collect()
    }

    /// All legal attacks for `player`: every opponent cell not yet shot.
    pub fn legal_moves(&self, player: Player) -> Vec<Coord> {
        if player != self.to_move || self.winner.is_some() {
            return Vec::new();
        }
        let defender = side(player.opponent());
        let mut moves = Vec::new();
        for row in 0..SIZE {
            for col in 0..SIZE {
                if self.shots[defender][row][col].is_none() {
                    moves.push(Coord { row, col });
                }
            }
        }
        moves
    }

    /// Fires at a coordinate, returning the successor state; the outcome
    /// of the shot is available via [`BattleshipState::last_shot`].
    pub fn apply(&self, coord: Coord, player: Player) -> Result<Self, MoveError> {
        if self.winner.is_some() {
            return Err(MoveError::GameOver);
        }
        if player != self.to_move {
            return Err(MoveError::OutOfTurn);
        }
        if coord.row >= SIZE || coord.col >= SIZE {
            return Err(MoveError::OutOfBounds);
        }
        let defender = side(player.opponent());
        if self.shots[defender][coord.row][coord.col].is_some() {
            return Err(MoveError::Illegal);
        }

        let mut next = self.clone();
        let mut result = ShotResult::Miss;
        for ship in next.fleets[defender].iter_mut() {
            if ship.covers(coord) {
                ship.hits += 1;
                result = if ship.is_sunk() {
                    ShotResult::Sunk { length: ship.length() }
                } else {
                    ShotResult::Hit
                };
                break;
            }
        }
        next.shots[defender][coord.row][coord.col] = Some(result != ShotResult::Miss);
        next.last_shot = Some(ShotReport { shooter: player, coord, result });
        next.moves.push(coord);

        if next.fleets[defender].iter().all(Ship::is_sunk) {
            next.winner = Some(Outcome::Win(player));
        } else {
            next.to_move = player.opponent();
        }
        Ok(next)
    }

    /// Selects a shot for the AI at the given difficulty.
    ///
    /// `memory` is the caller-owned [`AiState`] for this player; the
    /// caller feeds the shot result back with [`AiState::update`] after
    /// applying the move.
    pub fn ai_move<R: Rng + ?Sized>(
        &self,
        ai: Player,
        difficulty: Difficulty,
        memory: &AiState,
        rng: &mut R,
    ) -> Option<Coord> {
        let legal = self.legal_moves(ai);
        if legal.is_empty() {
            return None;
        }
        let profile = DifficultyProfile::battleship(difficulty);
        if roll_blunder(rng, profile.blunder_chance) {
            return pick_random(rng, &legal).copied();
        }

        // Target mode: work the stack top-down, skipping anything that
        // was revealed since it was pushed.
        for &coord in memory.target_stack.iter().rev() {
            if legal.contains(&coord) {
                tracing::debug!(row = coord.row, col = coord.col, "battleship: targeting");
                return Some(coord);
            }
        }

        let remaining = self.remaining_ships(ai.opponent());
        Some(memory.hunt_shot(&legal, &remaining, difficulty == Difficulty::Hard, rng))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl FromStr for Coord {
    type Err = String;

    /// Parses a coordinate from `"row,col"` (e.g. `"4,7"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(|p| p.trim()).collect();
        if parts.len() != 2 {
            return Err("Expected format: r,c".to_string());
        }
        let row = parts[0].parse::<usize>().map_err(|e| e.to_string())?;
        let col = parts[1].parse::<usize>().map_err(|e| e.to_string())?;
        if row >= SIZE || col >= SIZE {
            return Err(format!("Coordinates must be below {}", SIZE));
        }
        Ok(Coord { row, col })
    }
}

/// Targeting mode of the AI memory.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AiMode {
    /// Searching for a new ship.
    Hunt,
    /// Finishing off a ship after at least one unresolved hit.
    Target,
}

/// Ship orientation inferred from two aligned hits.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
enum Axis {
    Horizontal,
    Vertical,
}

/// Caller-owned shot memory for one AI player.
///
/// Holds everything the AI is entitled to know: its own shot history, the
/// hits it has not yet resolved into a sunk ship, and the stack of cells
/// queued for target mode. [`AiState::update`] is pure; it consumes a shot
/// result and returns the successor memory, never touching the game state.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AiState {
    mode: AiMode,
    /// Cells queued for target mode; never contains a revealed cell.
    target_stack: Vec<Coord>,
    /// Hits not yet attributed to a sunk ship.
    hits: Vec<Coord>,
    axis: Option<Axis>,
    /// Checkerboard color hunted first; flipped on each return to hunt.
    parity: usize,
    /// fired[r][c]: what this AI's own shot at (r, c) found, if fired.
    fired: [[Option<bool>; SIZE]; SIZE],
}

impl AiState {
    /// Fresh memory: hunt mode, nothing fired.
    pub fn new() -> Self {
        Self {
            mode: AiMode::Hunt,
            target_stack: Vec::new(),
            hits: Vec::new(),
            axis: None,
            parity: 0,
            fired: [[None; SIZE]; SIZE],
        }
    }

    pub fn mode(&self) -> AiMode {
        self.mode
    }

    /// Cells currently queued for target mode, bottom to top.
    pub fn target_stack(&self) -> &[Coord] {
        &self.target_stack
    }

    /// Folds a shot result into the memory, returning the successor.
    pub fn update(&self, coord: Coord, result: ShotResult) -> AiState {
        let mut next = self.clone();
        next.fired[coord.row][coord.col] = Some(result != ShotResult::Miss);
        next.target_stack.retain(|c| *c != coord);

        match result {
            ShotResult::Miss => {}
            ShotResult::Hit => {
                next.hits.push(coord);
                next.mode = AiMode::Target;
                if next.axis.is_none() && next.hits.len() >= 2 {
                    next.axis = infer_axis(&next.hits);
                }
                next.rebuild_stack();
            }
            ShotResult::Sunk { length } => {
                next.hits.push(coord);
                next.remove_sunk_run(coord, length);
                if next.hits.is_empty() {
                    next.mode = AiMode::Hunt;
                    next.axis = None;
                    next.target_stack.clear();
                    next.parity ^= 1;
                } else {
                    // Leftover hits belong to a neighboring ship; keep
                    // working them without the stale axis.
                    next.mode = AiMode::Target;
                    next.axis = infer_axis(&next.hits);
                    next.rebuild_stack();
                }
            }
        }
        next
    }

    /// Rebuilds the target stack from the unresolved hits: with a locked
    /// axis, only the two line extensions; otherwise every untried
    /// orthogonal neighbor.
    fn rebuild_stack(&mut self) {
        self.target_stack.clear();
        match self.axis {
            Some(axis) => {
                let (far, near) = line_extensions(&self.hits, axis);
                for coord in [far, near].into_iter().flatten() {
                    self.push_unfired(coord);
                }
            }
            None => {
                let hits = self.hits.clone();
                for hit in hits {
                    for coord in orthogonal_neighbors(hit) {
                        self.push_unfired(coord);
                    }
                }
            }
        }
    }

    fn push_unfired(&mut self, coord: Coord) {
        if self.fired[coord.row][coord.col].is_none() && !self.target_stack.contains(&coord) {
            self.target_stack.push(coord);
        }
    }

    /// Drops the sunk ship's cells from the unresolved hits: the run of
    /// hits collinear and contiguous with the sinking shot, capped at the
    /// reported length.
    fn remove_sunk_run(&mut self, coord: Coord, length: usize) {
        let axis = self.axis.or_else(|| infer_axis(&self.hits)).unwrap_or(Axis::Horizontal);
        let mut run = vec![coord];
        loop {
            let mut grew = false;
            for &hit in &self.hits {
                if run.contains(&hit) || run.len() >= length {
                    continue;
                }
                let touches = run.iter().any(|&r| match axis {
                    Axis::Horizontal => {
                        r.row == hit.row && r.col.abs_diff(hit.col) == 1
                    }
                    Axis::Vertical => {
                        r.col == hit.col && r.row.abs_diff(hit.row) == 1
                    }
                });
                if touches {
                    run.push(hit);
                    grew = true;
                    break;
                }
            }
            if !grew {
                break;
            }
        }
        self.hits.retain(|h| !run.contains(h));
    }

    /// Hunt-mode shot: the legal cell with the highest count of remaining
    /// ship placements covering it, over cells the fleet could still
    /// occupy. Candidates are restricted to a checkerboard parity while
    /// every surviving ship spans at least two cells; on hard, density is
    /// tripled next to unresolved hits.
    fn hunt_shot<R: Rng + ?Sized>(
        &self,
        legal: &[Coord],
        remaining: &[usize],
        boost_adjacency: bool,
        rng: &mut R,
    ) -> Coord {
        let min_length = remaining.iter().copied().min().unwrap_or(2);
        let parity_cells: Vec<Coord> = legal
            .iter()
            .copied()
            .filter(|c| (c.row + c.col) % 2 == self.parity)
            .collect();
        let candidates: &[Coord] = if min_length >= 2 && !parity_cells.is_empty() {
            &parity_cells
        } else {
            legal
        };

        let density = self.density_map(remaining, boost_adjacency);
        let best = candidates
            .iter()
            .map(|c| density[c.row][c.col])
            .max()
            .unwrap_or(0);
        let top: Vec<Coord> = candidates
            .iter()
            .copied()
            .filter(|c| density[c.row][c.col] == best)
            .collect();
        // Ties broken at random so hunts do not always sweep the same
        // corner first.
        pick_random(rng, &top)
            .copied()
            .unwrap_or(candidates[0])
    }

    /// Counts, per cell, the placements of each remaining ship length
    /// that fit entirely over unknown cells.
    fn density_map(&self, remaining: &[usize], boost_adjacency: bool) -> [[u32; SIZE]; SIZE] {
        let mut density = [[0u32; SIZE]; SIZE];
        for &length in remaining {
            for row in 0..SIZE {
                for col in 0..=(SIZE - length) {
                    if (0..length).all(|i| self.fired[row][col + i].is_none()) {
                        for i in 0..length {
                            density[row][col + i] += 1;
                        }
                    }
                }
            }
            for col in 0..SIZE {
                for row in 0..=(SIZE - length) {
                    if (0..length).all(|i| self.fired[row + i][col].is_none()) {
                        for i in 0..length {
                            density[row + i][col] += 1;
                        }
                    }
                }
            }
        }
        if boost_adjacency {
            for &hit in &self.hits {
                for coord in orthogonal_neighbors(hit) {
                    density[coord.row][coord.col] *= ADJACENCY_BOOST;
                }
            }
        }
        density
    }
}

impl Default for AiState {
    fn default() -> Self {
        Self::new()
    }
}

fn orthogonal_neighbors(coord: Coord) -> Vec<Coord> {
    let mut out = Vec::with_capacity(4);
    if coord.row > 0 {
        out.push(Coord { row: coord.row - 1, col: coord.col });
    }
    if coord.row + 1 < SIZE {
        out.push(Coord { row: coord.row + 1, col: coord.col });
    }
    if coord.col > 0 {
        out.push(Coord { row: coord.row, col: coord.col - 1 });
    }
    if coord.col + 1 < SIZE {
        out.push(Coord { row: coord.row, col: coord.col + 1 });
    }
    out
}

/// The shared axis of the hits, when they all line up.
fn infer_axis(hits: &[Coord]) -> Option<Axis> {
    if hits.len() < 2 {
        return None;
    }
    if hits.iter().all(|h| h.row == hits[0].row) {
        Some(Axis::Horizontal)
    } else if hits.iter().all(|h| h.col == hits[0].col) {
        Some(Axis::Vertical)
    } else {
        None
    }
}

/// The two cells extending the hit line beyond its endpoints.
fn line_extensions(hits: &[Coord], axis: Axis) -> (Option<Coord>, Option<Coord>) {
    match axis {
        Axis::Horizontal => {
            let row = hits[0].row;
            let min = hits.iter().map(|h| h.col).min().unwrap_or(0);
            let max = hits.iter().map(|h| h.col).max().unwrap_or(0);
            (
                (max + 1 < SIZE).then(|| Coord { row, col: max + 1 }),
                (min > 0).then(|| Coord { row, col: min - 1 }),
            )
        }
        Axis::Vertical => {
            let col = hits[0].col;
            let min = hits.iter().map(|h| h.row).min().unwrap_or(0);
            let max = hits.iter().map(|h| h.row).max().unwrap_or(0);
            (
                (max + 1 < SIZE).then(|| Coord { row: max + 1, col }),
                (min > 0).then(|| Coord { row: min - 1, col }),
            )
        }
    }
}
