use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use super::state::{Position, is_valid_position};

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Head position at game start; grid centre when unset
    pub start: Option<Position>,

    /// Tick interval at the start of a game, in milliseconds
    pub base_tick_ms: f32,
    /// Interval reduction per fruit eaten
    pub speed_step_ms: f32,
    /// Fastest allowed interval
    pub min_tick_ms: f32,
    pub points_per_fruit: u32,

    /// Seed for fruit placement; OS entropy when unset
    pub seed: Option<u64>,

    pub sound_enabled: bool,
    pub music_enabled: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 40,
            grid_height: 30,
            initial_snake_length: 3,
            start: None,
            base_tick_ms: 150.0,
            speed_step_ms: 5.0,
            min_tick_ms: 50.0,
            points_per_fruit: 10,
            seed: None,
            sound_enabled: true,
            music_enabled: true,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Read a JSON config file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config
            .validate()
            .map_err(|e| anyhow!("Invalid config {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Head position the snake spawns at
    pub fn start_position(&self) -> Position {
        self.start.unwrap_or(Position::new(
            (self.grid_width / 2) as i32,
            (self.grid_height / 2) as i32,
        ))
    }

    pub fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }

    /// Validate the configuration
    ///
    /// The starting snake faces right, so its tail extends to the left of
    /// the head and must stay on the grid.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err("grid dimensions must be positive".to_string());
        }
        if i32::try_from(self.grid_width).is_err() || i32::try_from(self.grid_height).is_err() {
            return Err("grid dimensions are too large".to_string());
        }
        if self.initial_snake_length == 0 {
            return Err("initial_snake_length must be at least 1".to_string());
        }
        if self.initial_snake_length >= self.cell_count() {
            return Err("grid must have room for the snake and a fruit".to_string());
        }

        let head = self.start_position();
        let tail = Position::new(head.x - (self.initial_snake_length as i32 - 1), head.y);
        if !is_valid_position(head, self.grid_width, self.grid_height)
            || !is_valid_position(tail, self.grid_width, self.grid_height)
        {
            return Err(format!(
                "snake of length {} starting at ({}, {}) does not fit the grid",
                self.initial_snake_length, head.x, head.y
            ));
        }

        if self.base_tick_ms.is_nan() || self.base_tick_ms <= 0.0 {
            return Err("base_tick_ms must be positive".to_string());
        }
        if self.min_tick_ms.is_nan() || self.min_tick_ms <= 0.0 {
            return Err("min_tick_ms must be positive".to_string());
        }
        if self.min_tick_ms > self.base_tick_ms {
            return Err("min_tick_ms must not exceed base_tick_ms".to_string());
        }
        if self.speed_step_ms.is_nan() || self.speed_step_ms < 0.0 {
            return Err("speed_step_ms must be non-negative".to_string());
        }
        if self.points_per_fruit == 0 {
            return Err("points_per_fruit must be positive".to_string());
        }

        Ok(())
    }
}
