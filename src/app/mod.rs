mod events;
mod keyboard;
mod render;
mod state;

// Re-export public types
pub use keyboard::ShortcutCapture;
pub use state::{App, Focus};
