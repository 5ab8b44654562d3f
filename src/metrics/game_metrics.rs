use std::time::{Duration, Instant};

use crate::game::{GameEvent, GamePhase};

/// Per-process play statistics. Nothing here outlives the process.
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    running: bool,
    /// Play time banked before the latest pause
    banked: Duration,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            running: false,
            banked: Duration::ZERO,
        }
    }

    /// Refresh the play timer; it stands still while paused and outside a
    /// running game
    pub fn update(&mut self) {
        if self.running {
            self.elapsed_time = self.banked + self.start_time.elapsed();
        }
    }

    /// Follow game starts and endings in the engine's event stream
    pub fn observe(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::PhaseChanged {
                    from: GamePhase::Menu | GamePhase::GameOver,
                    to: GamePhase::Playing,
                } => self.on_game_start(),
                GameEvent::PhaseChanged {
                    from: GamePhase::Playing,
                    to: GamePhase::Paused,
                } => self.on_pause(),
                GameEvent::PhaseChanged {
                    from: GamePhase::Paused,
                    to: GamePhase::Playing,
                } => self.on_resume(),
                GameEvent::GameOver { score, .. } => self.on_game_over(*score),
                _ => {}
            }
        }
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.banked = Duration::ZERO;
        self.running = true;
    }

    pub fn on_pause(&mut self) {
        if self.running {
            self.update();
            self.banked = self.elapsed_time;
            self.running = false;
        }
    }

    pub fn on_resume(&mut self) {
        self.start_time = Instant::now();
        self.running = true;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.update();
        self.running = false;
        self.games_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CollisionType, GameOverReason};

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(0);
        assert_eq!(metrics.format_time(), "00:00");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_high_score_tracking() {
        let mut metrics = GameMetrics::new();

        metrics.on_game_over(10);
        assert_eq!(metrics.high_score, 10);
        assert_eq!(metrics.games_played, 1);

        metrics.on_game_over(5);
        assert_eq!(metrics.high_score, 10); // Should not decrease
        assert_eq!(metrics.games_played, 2);

        metrics.on_game_over(15);
        assert_eq!(metrics.high_score, 15); // Should update
        assert_eq!(metrics.games_played, 3);
    }

    #[test]
    fn test_game_start_resets_time() {
        let mut metrics = GameMetrics::new();
        metrics.on_game_start();
        std::thread::sleep(Duration::from_millis(50));
        metrics.update();

        assert!(metrics.elapsed_time.as_millis() >= 50);

        metrics.on_game_start();
        metrics.update();
        assert!(metrics.elapsed_time.as_millis() < 50);
    }

    #[test]
    fn test_timer_idle_before_first_game() {
        let mut metrics = GameMetrics::new();
        std::thread::sleep(Duration::from_millis(20));
        metrics.update();
        assert_eq!(metrics.elapsed_time, Duration::ZERO);
    }

    #[test]
    fn test_observe_events() {
        let mut metrics = GameMetrics::new();
        metrics.observe(&[
            GameEvent::PhaseChanged {
                from: GamePhase::Menu,
                to: GamePhase::Playing,
            },
            GameEvent::GameOver {
                reason: GameOverReason::Collision(CollisionType::Wall),
                score: 30,
            },
        ]);
        assert_eq!(metrics.games_played, 1);
        assert_eq!(metrics.high_score, 30);

        // Resuming from pause is not a new game
        metrics.observe(&[GameEvent::PhaseChanged {
            from: GamePhase::Paused,
            to: GamePhase::Playing,
        }]);
        assert_eq!(metrics.games_played, 1);
    }

    #[test]
    fn test_pause_stops_timer() {
        let mut metrics = GameMetrics::new();
        metrics.observe(&[GameEvent::PhaseChanged {
            from: GamePhase::Menu,
            to: GamePhase::Playing,
        }]);
        std::thread::sleep(Duration::from_millis(20));

        metrics.observe(&[GameEvent::PhaseChanged {
            from: GamePhase::Playing,
            to: GamePhase::Paused,
        }]);
        let frozen = metrics.elapsed_time;
        assert!(frozen.as_millis() >= 20);

        std::thread::sleep(Duration::from_millis(60));
        metrics.update();
        assert_eq!(metrics.elapsed_time, frozen);

        metrics.observe(&[GameEvent::PhaseChanged {
            from: GamePhase::Paused,
            to: GamePhase::Playing,
        }]);
        metrics.update();
        assert!(metrics.elapsed_time >= frozen);
        assert!(metrics.elapsed_time < frozen + Duration::from_millis(60));
    }
}
