//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! It can be driven headlessly by tests or by the terminal front end.

pub mod action;
pub mod clock;
pub mod config;
pub mod engine;
pub mod events;
pub mod fruit;
pub mod score;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use clock::{Clock, ManualClock, MonotonicClock, TickScheduler};
pub use config::GameConfig;
pub use engine::{AudioSettings, GameEngine, GamePhase, Snapshot};
pub use events::{GameEvent, GameOverReason, TickOutcome};
pub use fruit::FruitSpawner;
pub use score::ScoreBoard;
pub use state::{CollisionType, Position, Snake, is_valid_position};
