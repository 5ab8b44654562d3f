use std::time::Duration;

use super::config::GameConfig;

/// Score and tick interval of the running game.
///
/// The interval is tracked directly and decremented by a fixed step with a
/// floor, never recomputed from the score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBoard {
    score: u32,
    interval_ms: f32,
    base_ms: f32,
    step_ms: f32,
    floor_ms: f32,
    points_per_fruit: u32,
}

impl ScoreBoard {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            score: 0,
            interval_ms: config.base_tick_ms,
            base_ms: config.base_tick_ms,
            step_ms: config.speed_step_ms,
            floor_ms: config.min_tick_ms,
            points_per_fruit: config.points_per_fruit,
        }
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.interval_ms = self.base_ms;
    }

    pub fn on_fruit_eaten(&mut self) {
        self.score = self.score.saturating_add(self.points_per_fruit);
        self.interval_ms = (self.interval_ms - self.step_ms).max(self.floor_ms);
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Milliseconds between ticks
    pub fn interval_ms(&self) -> f32 {
        self.interval_ms
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_micros((self.interval_ms * 1000.0).round() as u64)
    }

    /// Speed shown to the player: milliseconds shaved off the base interval,
    /// offset by one step so a fresh game reads 5 with the default timings
    pub fn speed_level(&self) -> u32 {
        (self.base_ms - self.interval_ms + self.step_ms) as u32
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}
