use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::state::{Position, is_valid_position};

/// Rejected draws allowed per grid cell before falling back to enumerating
/// the free cells.
const REJECTION_BUDGET_PER_CELL: usize = 4;

/// The single fruit on the board and the random source that places it
#[derive(Debug, Clone)]
pub struct FruitSpawner {
    position: Position,
    grid_width: usize,
    grid_height: usize,
    rng: StdRng,
}

impl FruitSpawner {
    /// Spawn at a random cell, seeding from `seed` or from OS entropy
    pub fn new(grid_width: usize, grid_height: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(grid_width, grid_height, rng)
    }

    pub fn with_rng(grid_width: usize, grid_height: usize, mut rng: StdRng) -> Self {
        let position = random_cell(&mut rng, grid_width, grid_height);
        Self {
            position,
            grid_width,
            grid_height,
            rng,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Move the fruit to a uniformly random cell outside `occupied`.
    ///
    /// Returns `None`, leaving the fruit where it was, when `occupied` covers
    /// every cell of the grid.
    pub fn respawn(&mut self, occupied: &HashSet<Position>) -> Option<Position> {
        let cells = self.grid_width * self.grid_height;
        let blocked = occupied
            .iter()
            .filter(|pos| is_valid_position(**pos, self.grid_width, self.grid_height))
            .count();
        if blocked >= cells {
            debug!(cells, "no free cell left for fruit");
            return None;
        }

        for _ in 0..cells * REJECTION_BUDGET_PER_CELL {
            let candidate = random_cell(&mut self.rng, self.grid_width, self.grid_height);
            if !occupied.contains(&candidate) {
                self.position = candidate;
                debug!(x = candidate.x, y = candidate.y, "fruit respawned");
                return Some(candidate);
            }
        }

        // Nearly full board: pick among the free cells directly
        let free: Vec<Position> = (0..self.grid_height as i32)
            .flat_map(|y| (0..self.grid_width as i32).map(move |x| Position::new(x, y)))
            .filter(|pos| !occupied.contains(pos))
            .collect();
        let candidate = *free.choose(&mut self.rng)?;
        self.position = candidate;
        debug!(x = candidate.x, y = candidate.y, free = free.len(), "fruit respawned from free list");
        Some(candidate)
    }

    /// Place the fruit explicitly
    pub fn place(&mut self, position: Position) {
        self.position = position;
    }
}

fn random_cell(rng: &mut StdRng, width: usize, height: usize) -> Position {
    let x = rng.gen_range(0..width) as i32;
    let y = rng.gen_range(0..height) as i32;
    Position::new(x, y)
}
