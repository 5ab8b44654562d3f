use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::info;

use crate::audio::{AudioDirector, AudioSink};
use crate::game::{Command, GameConfig, GameEngine};
use crate::input::InputHandler;
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Frame pacing for input polling, simulation polling and drawing (~60 FPS)
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct HumanMode {
    engine: GameEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    audio: AudioDirector<Box<dyn AudioSink>>,
}

impl HumanMode {
    pub fn new(config: GameConfig, sink: Box<dyn AudioSink>) -> Result<Self> {
        let engine = GameEngine::try_new(config)?;
        let audio = AudioDirector::new(sink, engine.audio());

        Ok(Self {
            engine,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            audio,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        self.audio.start();

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        self.audio.stop();
        self.cleanup_terminal(&mut terminal)?;

        info!(
            games_played = self.metrics.games_played,
            high_score = self.metrics.high_score,
            "session finished"
        );
        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut frame_timer = interval(FRAME_INTERVAL);
        frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                        None => break,
                    }
                }

                // Advance the simulation and draw
                _ = frame_timer.tick() => {
                    self.frame();
                    let snapshot = self.engine.snapshot();
                    let metrics = &self.metrics;
                    let renderer = &self.renderer;
                    terminal.draw(|frame| {
                        renderer.render(frame, &snapshot, metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.engine.handle(Command::Quit);
                }
            }

            if self.engine.should_quit() {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            if let Some(command) = self.input_handler.handle_key_event(key) {
                self.engine.handle(command);
            }
        }
    }

    /// Poll the engine once and hand its events to the collaborators
    fn frame(&mut self) {
        self.engine.update();
        let events = self.engine.drain_events();
        self.audio.dispatch(&events);
        self.metrics.observe(&events);
        self.metrics.update();
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
