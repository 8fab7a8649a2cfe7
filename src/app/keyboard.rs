//! Scoped keyboard enhancement
//!
//! Most terminals report Ctrl+Enter as a bare Enter. Where the kitty
//! keyboard protocol is available, pushing `DISAMBIGUATE_ESCAPE_CODES` makes
//! the modifier visible. The flags are popped again when the guard drops.

use std::io;

use ratatui::crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::supports_keyboard_enhancement,
};

/// Holds the keyboard enhancement subscription for the editor's lifetime
#[derive(Debug)]
pub struct ShortcutCapture {
    active: bool,
}

impl ShortcutCapture {
    /// Subscribe to modified-key reporting if the terminal supports it
    ///
    /// Unsupported terminals get an inactive guard; F5 and F6 still work.
    pub fn begin() -> Self {
        let supported = supports_keyboard_enhancement().unwrap_or(false);
        if !supported {
            log::debug!("Keyboard enhancement unsupported, using F5/F6 fallbacks");
            return Self { active: false };
        }

        let pushed = execute!(
            io::stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        );
        if let Err(e) = &pushed {
            log::warn!("Failed to enable keyboard enhancement: {}", e);
        }
        Self {
            active: pushed.is_ok(),
        }
    }
}

impl Drop for ShortcutCapture {
    fn drop(&mut self) {
        if self.active {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
        }
    }
}
