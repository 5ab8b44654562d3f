use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Command, Direction};

/// Maps terminal key presses onto engine commands
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> Option<Command> {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        let command = match key.code {
            KeyCode::Up => Command::Turn(Direction::Up),
            KeyCode::Down => Command::Turn(Direction::Down),
            KeyCode::Left => Command::Turn(Direction::Left),
            KeyCode::Right => Command::Turn(Direction::Right),

            KeyCode::Char(' ') | KeyCode::Enter => Command::Start,
            KeyCode::Char('p') | KeyCode::Char('P') => Command::TogglePause,
            KeyCode::Char('s') | KeyCode::Char('S') => Command::ToggleSound,
            KeyCode::Char('m') | KeyCode::Char('M') => Command::ToggleMusic,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Command::Quit,

            _ => return None,
        };

        Some(command)
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
