//! Notification rendering

use ratatui::{
    Frame,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use super::NotificationState;
use crate::widgets::popup;

/// Draw the active notification in the top-right corner
///
/// Expired notifications are cleared first.
pub fn render_notification(frame: &mut Frame, state: &mut NotificationState) {
    state.clear_expired();
    let Some(notification) = state.current() else {
        return;
    };

    let width = (notification.message.width() as u16).saturating_add(4);
    let area = popup::top_right_popup(frame.area(), width, 3, 1);

    popup::clear_area(frame, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let paragraph = Paragraph::new(notification.message.as_str())
        .block(block)
        .style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, area);
}
