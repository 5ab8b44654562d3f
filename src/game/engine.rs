use std::time::Duration;

use tracing::{debug, info, trace, warn};

use super::{
    action::{Command, Direction},
    clock::{Clock, MonotonicClock, TickScheduler},
    config::GameConfig,
    events::{GameEvent, GameOverReason, TickOutcome},
    fruit::FruitSpawner,
    score::ScoreBoard,
    state::{CollisionType, Position, Snake, is_valid_position},
};

/// Top level state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// Whether sound effects and music should play. Toggled in any phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioSettings {
    pub sound_enabled: bool,
    pub music_enabled: bool,
}

/// Read-only view of everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    /// Snake segments, head first
    pub body: &'a [Position],
    /// Committed heading of the snake
    pub direction: Direction,
    pub fruit: Position,
    pub score: u32,
    pub speed_level: u32,
    pub tick_interval: Duration,
    pub grid_width: usize,
    pub grid_height: usize,
    pub audio: AudioSettings,
    pub game_over_reason: Option<GameOverReason>,
}

/// The game engine: owns the snake, fruit, score and phase, and advances the
/// simulation on a fixed interval read from its clock.
///
/// All mutation goes through [`GameEngine::handle`] and
/// [`GameEngine::update`]; both are meant to be called from a single frame
/// loop.
pub struct GameEngine<C: Clock = MonotonicClock> {
    config: GameConfig,
    clock: C,
    phase: GamePhase,
    snake: Snake,
    fruit: FruitSpawner,
    score: ScoreBoard,
    scheduler: TickScheduler,
    audio: AudioSettings,
    events: Vec<GameEvent>,
    last_outcome: TickOutcome,
    game_over_reason: Option<GameOverReason>,
    ticks: u64,
    quit: bool,
}

impl GameEngine<MonotonicClock> {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self::with_clock(config, MonotonicClock::new())
    }

    /// Like [`GameEngine::new`], but rejects an invalid configuration
    pub fn try_new(config: GameConfig) -> anyhow::Result<Self> {
        Self::try_with_clock(config, MonotonicClock::new())
    }
}

impl<C: Clock> GameEngine<C> {
    /// Build an engine after checking the configuration
    pub fn try_with_clock(config: GameConfig, clock: C) -> anyhow::Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid game config: {e}"))?;
        Ok(Self::with_clock(config, clock))
    }

    /// Build an engine from a configuration that already passed
    /// [`GameConfig::validate`].
    ///
    /// # Panics
    ///
    /// Panics when the grid has no cells. Use [`GameEngine::try_with_clock`]
    /// for configurations that were not validated.
    pub fn with_clock(config: GameConfig, clock: C) -> Self {
        let snake = Snake::new(
            config.start_position(),
            Direction::Right,
            config.initial_snake_length,
        );
        let mut fruit = FruitSpawner::new(config.grid_width, config.grid_height, config.seed);
        fruit.respawn(&snake.occupied_cells());

        let scheduler = TickScheduler::new(clock.now());

        Self {
            score: ScoreBoard::new(&config),
            audio: AudioSettings {
                sound_enabled: config.sound_enabled,
                music_enabled: config.music_enabled,
            },
            config,
            clock,
            phase: GamePhase::Menu,
            snake,
            fruit,
            scheduler,
            events: Vec::new(),
            last_outcome: TickOutcome::default(),
            game_over_reason: None,
            ticks: 0,
            quit: false,
        }
    }

    /// Apply one input command. Commands that do not fit the current phase
    /// are ignored.
    pub fn handle(&mut self, command: Command) {
        if self.quit {
            return;
        }

        match command {
            Command::Turn(direction) => {
                if self.phase == GamePhase::Playing {
                    let accepted = self.snake.set_direction(direction);
                    debug!(?direction, accepted, "turn requested");
                    self.events
                        .push(GameEvent::TurnRequested { direction, accepted });
                }
            }
            Command::Start => {
                if matches!(self.phase, GamePhase::Menu | GamePhase::GameOver) {
                    self.start_game();
                }
            }
            Command::TogglePause => match self.phase {
                GamePhase::Playing => self.set_phase(GamePhase::Paused),
                GamePhase::Paused => self.set_phase(GamePhase::Playing),
                GamePhase::Menu | GamePhase::GameOver => {}
            },
            Command::Quit => {
                info!(phase = ?self.phase, "quit requested");
                self.quit = true;
                self.events.push(GameEvent::QuitRequested);
            }
            Command::ToggleSound => {
                self.audio.sound_enabled = !self.audio.sound_enabled;
                self.events.push(GameEvent::SoundToggled {
                    enabled: self.audio.sound_enabled,
                });
            }
            Command::ToggleMusic => {
                self.audio.music_enabled = !self.audio.music_enabled;
                self.events.push(GameEvent::MusicToggled {
                    enabled: self.audio.music_enabled,
                });
            }
        }
    }

    /// Poll the clock and run at most one tick if one is due.
    pub fn update(&mut self) -> TickOutcome {
        self.last_outcome = TickOutcome::default();

        if self.phase != GamePhase::Playing || self.quit {
            return self.last_outcome;
        }

        let interval = self.score.tick_interval();
        if self.scheduler.poll(self.clock.now(), interval) {
            self.last_outcome = self.tick();
        }

        self.last_outcome
    }

    /// One simulation step: move, then wall, self and fruit checks in that
    /// order. A fatal collision returns before any fruit is eaten.
    fn tick(&mut self) -> TickOutcome {
        self.ticks += 1;
        let mut outcome = TickOutcome {
            ticked: true,
            ..TickOutcome::default()
        };

        self.snake.advance();
        let head = self.snake.head();
        trace!(tick = self.ticks, x = head.x, y = head.y, "tick");

        if !is_valid_position(head, self.config.grid_width, self.config.grid_height) {
            let reason = GameOverReason::Collision(CollisionType::Wall);
            self.end_game(reason);
            outcome.game_over = Some(reason);
            return outcome;
        }

        if self.snake.check_self_collision() {
            let reason = GameOverReason::Collision(CollisionType::SelfCollision);
            self.end_game(reason);
            outcome.game_over = Some(reason);
            return outcome;
        }

        if head == self.fruit.position() {
            self.snake.grow();
            self.score.on_fruit_eaten();
            outcome.ate_fruit = true;
            debug!(
                score = self.score.score(),
                interval_ms = self.score.interval_ms(),
                length = self.snake.len(),
                "fruit eaten"
            );
            self.events.push(GameEvent::FruitEaten {
                at: head,
                score: self.score.score(),
            });

            if self.fruit.respawn(&self.snake.occupied_cells()).is_none() {
                self.end_game(GameOverReason::BoardFilled);
                outcome.game_over = Some(GameOverReason::BoardFilled);
            }
        }

        outcome
    }

    fn start_game(&mut self) {
        self.snake.reset();
        if self.fruit.respawn(&self.snake.occupied_cells()).is_none() {
            warn!("no free cell for the first fruit");
        }
        self.score.reset();
        self.scheduler.restart(self.clock.now());
        self.game_over_reason = None;
        self.ticks = 0;
        self.set_phase(GamePhase::Playing);
    }

    fn end_game(&mut self, reason: GameOverReason) {
        info!(?reason, score = self.score.score(), ticks = self.ticks, "game over");
        self.game_over_reason = Some(reason);
        self.events.push(GameEvent::GameOver {
            reason,
            score: self.score.score(),
        });
        self.set_phase(GamePhase::GameOver);
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        info!(?from, ?to, "phase changed");
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    /// Take every event emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events emitted since the last drain
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Outcome of the latest [`GameEngine::update`]; cleared on the next one
    pub fn last_outcome(&self) -> TickOutcome {
        self.last_outcome
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            body: self.snake.body(),
            direction: self.snake.direction(),
            fruit: self.fruit.position(),
            score: self.score.score(),
            speed_level: self.score.speed_level(),
            tick_interval: self.score.tick_interval(),
            grid_width: self.config.grid_width,
            grid_height: self.config.grid_height,
            audio: self.audio,
            game_over_reason: self.game_over_reason,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn fruit(&self) -> Position {
        self.fruit.position()
    }

    pub fn score(&self) -> u32 {
        self.score.score()
    }

    pub fn score_board(&self) -> &ScoreBoard {
        &self.score
    }

    pub fn audio(&self) -> AudioSettings {
        self.audio
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Ticks taken in the current game
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Swap in a snake for a scripted scenario. The next start restores the
    /// configured layout.
    pub fn set_snake(&mut self, snake: Snake) {
        self.snake = snake;
    }

    /// Put the fruit on a chosen cell for a scripted scenario
    pub fn place_fruit(&mut self, position: Position) {
        self.fruit.place(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::clock::ManualClock;

    const TICK: Duration = Duration::from_millis(150);

    fn engine() -> (GameEngine<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let config = GameConfig {
            seed: Some(11),
            ..GameConfig::default()
        };
        (GameEngine::with_clock(config, clock.clone()), clock)
    }

    fn playing() -> (GameEngine<ManualClock>, ManualClock) {
        let (mut engine, clock) = engine();
        engine.handle(Command::Start);
        engine.place_fruit(Position::new(0, 0));
        engine.drain_events();
        (engine, clock)
    }

    #[test]
    fn test_starts_in_menu() {
        let (mut engine, clock) = engine();
        assert_eq!(engine.phase(), GamePhase::Menu);
        assert_eq!(engine.score(), 0);
        assert!(!engine.snake().body().contains(&engine.fruit()));

        clock.advance(Duration::from_secs(5));
        assert!(!engine.update().ticked);
        assert_eq!(engine.snake().head(), Position::new(20, 15));
    }

    #[test]
    fn test_menu_ignores_everything_but_start() {
        let (mut engine, _clock) = engine();
        engine.handle(Command::TogglePause);
        engine.handle(Command::Turn(Direction::Up));
        assert_eq!(engine.phase(), GamePhase::Menu);
        assert_eq!(engine.snake().next_direction(), Direction::Right);
        assert!(engine.pending_events().is_empty());

        engine.handle(Command::Start);
        assert_eq!(engine.phase(), GamePhase::Playing);
        assert_eq!(
            engine.drain_events(),
            vec![GameEvent::PhaseChanged {
                from: GamePhase::Menu,
                to: GamePhase::Playing
            }]
        );
    }

    #[test]
    fn test_tick_gated_by_interval() {
        let (mut engine, clock) = playing();
        clock.advance(Duration::from_millis(149));
        assert!(!engine.update().ticked);
        clock.advance(Duration::from_millis(1));
        assert!(engine.update().ticked);
        assert_eq!(engine.snake().head(), Position::new(21, 15));
        assert_eq!(engine.ticks(), 1);
    }

    #[test]
    fn test_one_tick_per_poll() {
        let (mut engine, clock) = playing();
        clock.advance(TICK * 5);
        assert!(engine.update().ticked);
        assert!(!engine.update().ticked);
        assert_eq!(engine.snake().head(), Position::new(21, 15));
    }

    #[test]
    fn test_pause_and_resume() {
        let (mut engine, clock) = playing();
        engine.handle(Command::TogglePause);
        assert_eq!(engine.phase(), GamePhase::Paused);

        clock.advance(TICK * 3);
        assert!(!engine.update().ticked);

        engine.handle(Command::Turn(Direction::Up));
        assert_eq!(engine.snake().next_direction(), Direction::Right);
        engine.handle(Command::Start);
        assert_eq!(engine.phase(), GamePhase::Paused);

        engine.handle(Command::TogglePause);
        assert_eq!(engine.phase(), GamePhase::Playing);
        assert!(engine.update().ticked);
    }

    #[test]
    fn test_turn_events() {
        let (mut engine, _clock) = playing();
        engine.handle(Command::Turn(Direction::Left));
        engine.handle(Command::Turn(Direction::Down));
        assert_eq!(
            engine.drain_events(),
            vec![
                GameEvent::TurnRequested {
                    direction: Direction::Left,
                    accepted: false
                },
                GameEvent::TurnRequested {
                    direction: Direction::Down,
                    accepted: true
                },
            ]
        );
        assert_eq!(engine.snake().next_direction(), Direction::Down);
    }

    #[test]
    fn test_wall_collision_ends_game() {
        let (mut engine, clock) = playing();
        engine.set_snake(Snake::new(Position::new(0, 15), Direction::Left, 3));
        clock.advance(TICK);
        let outcome = engine.update();

        assert_eq!(
            outcome.game_over,
            Some(GameOverReason::Collision(CollisionType::Wall))
        );
        assert_eq!(engine.phase(), GamePhase::GameOver);
        assert_eq!(engine.snake().head(), Position::new(-1, 15));
        assert_eq!(
            engine.snapshot().game_over_reason,
            Some(GameOverReason::Collision(CollisionType::Wall))
        );
    }

    #[test]
    fn test_wall_checked_before_fruit() {
        let (mut engine, clock) = playing();
        engine.set_snake(Snake::new(Position::new(0, 15), Direction::Left, 3));
        engine.place_fruit(Position::new(-1, 15));
        clock.advance(TICK);
        let outcome = engine.update();

        assert!(!outcome.ate_fruit);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.snake().len(), 3);
    }

    #[test]
    fn test_self_collision_checked_before_fruit() {
        let (mut engine, clock) = playing();
        // Hook shape whose next move lands on its own body
        let mut snake = Snake::new(Position::new(10, 10), Direction::Right, 5);
        snake.set_direction(Direction::Down);
        snake.advance();
        snake.set_direction(Direction::Left);
        snake.advance();
        snake.set_direction(Direction::Up);
        engine.set_snake(snake);
        engine.place_fruit(Position::new(9, 10));

        clock.advance(TICK);
        let outcome = engine.update();
        assert_eq!(
            outcome.game_over,
            Some(GameOverReason::Collision(CollisionType::SelfCollision))
        );
        assert!(!outcome.ate_fruit);
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn test_eating_fruit() {
        let (mut engine, clock) = playing();
        engine.place_fruit(Position::new(21, 15));
        clock.advance(TICK);
        let outcome = engine.update();

        assert!(outcome.ate_fruit);
        assert_eq!(engine.last_outcome(), outcome);
        assert_eq!(engine.score(), 10);
        assert_eq!(engine.score_board().interval_ms(), 145.0);
        assert_eq!(engine.snake().len(), 4);
        assert!(!engine.snake().body().contains(&engine.fruit()));
        assert_eq!(
            engine.drain_events(),
            vec![GameEvent::FruitEaten {
                at: Position::new(21, 15),
                score: 10
            }]
        );

        // Next tick waits for the shorter interval
        clock.advance(Duration::from_millis(145));
        assert!(engine.update().ticked);
    }

    #[test]
    fn test_growth_at_edge_is_checked_next_tick() {
        let (mut engine, clock) = playing();
        engine.set_snake(Snake::new(Position::new(38, 7), Direction::Right, 3));
        engine.place_fruit(Position::new(39, 7));
        clock.advance(TICK);
        let outcome = engine.update();

        // The grown head sits past the right edge until the next move
        assert!(outcome.ate_fruit);
        assert_eq!(outcome.game_over, None);
        assert_eq!(engine.phase(), GamePhase::Playing);
        assert_eq!(engine.snake().head(), Position::new(40, 7));
        assert_eq!(engine.snake().len(), 4);

        clock.advance(TICK);
        let outcome = engine.update();
        assert_eq!(
            outcome.game_over,
            Some(GameOverReason::Collision(CollisionType::Wall))
        );
        assert_eq!(engine.score(), 10);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = GameEngine::try_with_clock(GameConfig::new(0, 10), ManualClock::new());
        assert!(result.is_err());

        let config = GameConfig {
            seed: Some(3),
            ..GameConfig::default()
        };
        let engine = GameEngine::try_with_clock(config, ManualClock::new()).unwrap();
        assert_eq!(engine.phase(), GamePhase::Menu);
    }

    #[test]
    fn test_outcome_is_transient() {
        let (mut engine, clock) = playing();
        engine.place_fruit(Position::new(21, 15));
        clock.advance(TICK);
        assert!(engine.update().ate_fruit);
        assert!(!engine.update().ate_fruit);
        assert_eq!(engine.last_outcome(), TickOutcome::default());
    }

    #[test]
    fn test_filling_board_ends_game() {
        let clock = ManualClock::new();
        let config = GameConfig {
            grid_width: 3,
            grid_height: 1,
            initial_snake_length: 2,
            seed: Some(5),
            ..GameConfig::default()
        };
        let mut engine = GameEngine::with_clock(config, clock.clone());
        engine.handle(Command::Start);
        // Tail still outside the grid; after moving and growing the snake
        // covers (0,0), (1,0) and (2,0)
        engine.set_snake(Snake::new(Position::new(0, 0), Direction::Right, 2));
        engine.place_fruit(Position::new(1, 0));
        clock.advance(TICK);
        let outcome = engine.update();

        assert!(outcome.ate_fruit);
        assert_eq!(outcome.game_over, Some(GameOverReason::BoardFilled));
        assert_eq!(engine.phase(), GamePhase::GameOver);
        assert_eq!(engine.snake().len(), 3);
    }

    #[test]
    fn test_restart_after_game_over() {
        let (mut engine, clock) = playing();
        engine.place_fruit(Position::new(21, 15));
        clock.advance(TICK);
        engine.update();
        engine.set_snake(Snake::new(Position::new(0, 3), Direction::Left, 3));
        clock.advance(Duration::from_millis(145));
        engine.update();
        assert_eq!(engine.phase(), GamePhase::GameOver);

        engine.handle(Command::TogglePause);
        assert_eq!(engine.phase(), GamePhase::GameOver);

        engine.handle(Command::Start);
        assert_eq!(engine.phase(), GamePhase::Playing);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.score_board().interval_ms(), 150.0);
        assert_eq!(engine.snake().head(), Position::new(20, 15));
        assert_eq!(engine.snake().len(), 3);
        assert_eq!(engine.snapshot().game_over_reason, None);

        // Clock restarted with the game
        clock.advance(Duration::from_millis(149));
        assert!(!engine.update().ticked);
    }

    #[test]
    fn test_toggles_in_any_phase() {
        let (mut engine, _clock) = engine();
        engine.handle(Command::ToggleSound);
        assert!(!engine.audio().sound_enabled);
        engine.handle(Command::Start);
        engine.handle(Command::ToggleMusic);
        assert!(!engine.audio().music_enabled);
        engine.handle(Command::TogglePause);
        engine.handle(Command::ToggleSound);
        assert!(engine.audio().sound_enabled);
    }

    #[test]
    fn test_quit_latches() {
        let (mut engine, clock) = playing();
        engine.handle(Command::Quit);
        assert!(engine.should_quit());
        engine.handle(Command::TogglePause);
        assert_eq!(engine.phase(), GamePhase::Playing);
        clock.advance(TICK);
        assert!(!engine.update().ticked);
        assert_eq!(engine.drain_events(), vec![GameEvent::QuitRequested]);
    }

    #[test]
    fn test_snapshot() {
        let (mut engine, clock) = playing();
        engine.handle(Command::Turn(Direction::Down));
        clock.advance(TICK);
        engine.update();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.phase, GamePhase::Playing);
        assert_eq!(snapshot.direction, Direction::Down);
        assert_eq!(snapshot.body[0], Position::new(20, 16));
        assert_eq!(snapshot.fruit, Position::new(0, 0));
        assert_eq!(snapshot.speed_level, 5);
        assert_eq!(snapshot.tick_interval, TICK);
        assert_eq!((snapshot.grid_width, snapshot.grid_height), (40, 30));
    }
}
