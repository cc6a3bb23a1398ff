//! Event handling for the preflight screen.
//!
//! Polls crossterm for key and resize events and maps keys onto
//! [`PreflightApp`] actions.

use super::app::PreflightApp;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Application event
#[derive(Debug)]
pub enum Event {
    /// Key press event
    Key(KeyEvent),
    /// Terminal tick (for status expiry)
    Tick,
    /// Resize event
    Resize(u16, u16),
}

/// Event handler
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a new event handler polling every `tick_rate` milliseconds
    pub const fn new(tick_rate: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate),
        }
    }

    /// Poll for the next event
    pub fn next(&self) -> Result<Event, std::io::Error> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                CrosstermEvent::Key(key) => Ok(Event::Key(key)),
                CrosstermEvent::Resize(width, height) => Ok(Event::Resize(width, height)),
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(250)
    }
}

/// Handle key events and update app state
pub fn handle_key_event(app: &mut PreflightApp, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('r') | KeyCode::F(5) => app.reload(),
        KeyCode::Char('m') => app.cycle_mode(),
        KeyCode::Char('t') => app.toggle_tooltip(),
        KeyCode::Char('T') => app.cycle_theme(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PreflightStatus;
    use crate::preflight::{ControllerOptions, PreflightController, StaticStatusSource};

    fn app() -> PreflightApp {
        PreflightApp::new(PreflightController::init(
            Box::new(StaticStatusSource::Fixed(PreflightStatus::default())),
            ControllerOptions::default(),
        ))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_reload_key_fetches() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char('r')));
        assert_eq!(app.controller().fetch_count(), 2);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char('x')));
        assert!(!app.should_quit());
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit());
    }

    #[test]
    fn test_mode_key() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char('m')));
        assert!(app.controller().preflight_mode().is_some());
    }
}
