use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::time::Duration;

use super::state::{App, Focus};

/// Ctrl, or Super on terminals that report the macOS command key
fn has_primary(key: &KeyEvent) -> bool {
    key.modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER)
}

impl App {
    /// Wait up to `timeout` for one terminal event and handle it
    pub fn handle_events(&mut self, timeout: Duration) -> io::Result<()> {
        if !event::poll(timeout)? {
            return Ok(());
        }
        match event::read()? {
            // Check that it's a key press event to avoid duplicates
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                self.handle_key_event(key_event);
            }
            Event::Paste(text) => {
                if self.focus == Focus::Editor {
                    self.editor.insert_str(text);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Handle key press events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        // Try global keys first
        if self.handle_global_keys(key) {
            return;
        }

        match self.focus {
            Focus::Editor => {
                self.editor.input(key);
            }
            Focus::Suggestions => self.handle_suggestions_key(key),
            Focus::Completion => self.handle_completion_key(key),
        }
    }

    /// Handle keys that work regardless of focus
    /// Returns true if key was handled, false otherwise
    fn handle_global_keys(&mut self, key: KeyEvent) -> bool {
        let primary = has_primary(&key);

        // Ctrl+C / Ctrl+Q: quit
        if primary && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            self.should_quit = true;
            return true;
        }

        // Ctrl+Shift+Enter or F6: completion
        if (primary && key.code == KeyCode::Enter && key.modifiers.contains(KeyModifiers::SHIFT))
            || key.code == KeyCode::F(6)
        {
            self.request_completion();
            return true;
        }

        // Ctrl+Enter or F5: three suggestions
        if (primary && key.code == KeyCode::Enter) || key.code == KeyCode::F(5) {
            self.request_suggestions();
            return true;
        }

        if primary && key.code == KeyCode::Char('s') {
            self.export_pdf();
            return true;
        }

        match key.code {
            KeyCode::F(7) => {
                self.detect_characters();
                true
            }
            KeyCode::F(8) => {
                self.clear_panels();
                true
            }
            KeyCode::F(9) => {
                self.clear_story();
                true
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                true
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                true
            }
            KeyCode::Esc => {
                // Cancelling takes priority over leaving a panel
                if !self.cancel_streams() {
                    self.focus = Focus::Editor;
                }
                true
            }
            _ => false,
        }
    }

    fn handle_suggestions_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.select_next_suggestion(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev_suggestion(),
            KeyCode::Enter => {
                self.accept_suggestion();
            }
            KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('d') => {
                self.discard_suggestion();
            }
            _ => {}
        }
    }

    fn handle_completion_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.accept_completion();
            }
            KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('d') => {
                self.discard_completion();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "app_events_tests.rs"]
mod app_events_tests;
