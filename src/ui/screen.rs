use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;

use crate::{App, AppState};

/// A UI Screen boundary: responsible for rendering and optional key handling
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
    /// Optional per-screen key handling. Returns true if the key was handled.
    fn on_key(&mut self, _key: KeyEvent, _app: &mut App) -> bool {
        false
    }
}

/// Wheel screen - spins and opens the editor
pub struct WheelScreen;

impl Screen for WheelScreen {
    fn on_key(&mut self, key: KeyEvent, app: &mut App) -> bool {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => {
                app.spin();
                true
            }
            KeyCode::Char('e') => {
                app.open_editor();
                true
            }
            _ => false,
        }
    }
}

/// Entry editor - a plain text buffer, one entry per line
pub struct EditScreen;

impl Screen for EditScreen {
    fn on_key(&mut self, key: KeyEvent, app: &mut App) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Tab => {
                app.apply_editor();
                true
            }
            KeyCode::Enter => {
                app.editor.push('\n');
                true
            }
            KeyCode::Backspace => {
                app.editor.pop();
                true
            }
            KeyCode::Char(c) => {
                app.editor.push(c);
                true
            }
            _ => false,
        }
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Wheel => Box::new(WheelScreen),
        AppState::Edit => Box::new(EditScreen),
    }
}
