//! Transient status messages
//!
//! Export results and cancellations are reported here instead of the status
//! line, which is reserved for service errors.

mod render;
mod state;

pub use render::render_notification;
pub use state::{Notification, NotificationState};
