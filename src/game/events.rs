//! Events emitted by the engine for presentation and audio collaborators.

use super::action::Direction;
use super::engine::GamePhase;
use super::state::{CollisionType, Position};

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    Collision(CollisionType),
    /// The snake covers every cell; there is nowhere left for fruit
    BoardFilled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    /// A turn command arrived while playing; `accepted` is false for reversals
    TurnRequested { direction: Direction, accepted: bool },
    FruitEaten { at: Position, score: u32 },
    GameOver { reason: GameOverReason, score: u32 },
    SoundToggled { enabled: bool },
    MusicToggled { enabled: bool },
    QuitRequested,
}

/// What the most recent tick did. Reset on every poll of the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// A simulation tick ran during this poll
    pub ticked: bool,
    pub ate_fruit: bool,
    pub game_over: Option<GameOverReason>,
}
