//! Snake Arcade - a terminal Snake game built around a headless core
//!
//! This library provides:
//! - Core game logic: grid, snake, fruit, score/speed, tick scheduling and the
//!   menu/play/pause/game-over state machine (game module)
//! - Audio cue routing behind a pluggable sink (audio module)
//! - Keyboard mapping (input module) and TUI rendering (render module)
//! - Session statistics (metrics module)
//! - The interactive terminal front end (modes module)

pub mod audio;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
