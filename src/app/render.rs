use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use super::state::{App, Focus};
use crate::client::StreamKind;
use crate::notification::render_notification;
use crate::stream::Slot;
use crate::widgets::popup::inset_rect;

/// Key hints, dropped from the end when the terminal is too narrow
const HINTS: &[&str] = &[
    "^Enter/F5 suggest",
    "^Shift+Enter/F6 complete",
    "F7 characters",
    "^S export",
    "Tab focus",
    "Esc cancel",
    "F8 clear panels",
    "F9 clear story",
    "^Q quit",
];

const HINT_SEPARATOR: &str = "  ";

fn border_color(focused: bool) -> Color {
    if focused { Color::Cyan } else { Color::DarkGray }
}

/// Join as many hints as fit in `width` columns
pub(crate) fn fit_hints(width: usize) -> String {
    let mut line = String::new();
    for hint in HINTS {
        let extra = if line.is_empty() {
            hint.width()
        } else {
            HINT_SEPARATOR.width() + hint.width()
        };
        if line.width() + extra > width {
            break;
        }
        if !line.is_empty() {
            line.push_str(HINT_SEPARATOR);
        }
        line.push_str(hint);
    }
    line
}

/// Card title suffix and body for one slot
fn slot_view(slot: Option<&Slot>, streaming: bool) -> (&'static str, Paragraph<'_>) {
    let dim = Style::default().fg(Color::DarkGray);
    match slot {
        None => ("", Paragraph::new("").style(dim)),
        Some(slot) if slot.is_failed() => (
            " failed",
            Paragraph::new(slot.text.as_str()).style(Style::default().fg(Color::Red)),
        ),
        Some(slot) if slot.is_empty_result() => (
            "",
            Paragraph::new("No content produced").style(dim.add_modifier(Modifier::ITALIC)),
        ),
        Some(slot) => {
            let status = match (slot.is_done(), streaming) {
                (true, _) => "",
                (false, true) => " streaming...",
                (false, false) => " stopped",
            };
            (status, Paragraph::new(slot.text.as_str()))
        }
    }
}

impl App {
    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let [header_area, body_area, status_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let [editor_area, side_area] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .areas(body_area);

        let [suggestions_area, completion_area, characters_area] = Layout::vertical([
            Constraint::Percentage(50),
            Constraint::Percentage(30),
            Constraint::Min(3),
        ])
        .areas(side_area);

        self.render_header(frame, header_area);
        self.render_editor(frame, editor_area);
        self.render_suggestions(frame, suggestions_area);
        self.render_completion(frame, completion_area);
        self.render_characters(frame, characters_area);
        self.render_status(frame, status_area);
        render_hints(frame, hints_area);

        render_notification(frame, &mut self.notification);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let stats = self.stats();
        let line = Line::from(vec![
            Span::styled(
                "costory",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  {} words  {} chars", stats.words, stats.chars)),
        ]);
        frame.render_widget(Paragraph::new(line), inset_rect(area, 1, 0));
    }

    fn render_editor(&mut self, frame: &mut Frame, area: Rect) {
        self.editor.set_block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Story ")
                .border_style(Style::default().fg(border_color(self.focus == Focus::Editor))),
        );
        frame.render_widget(&self.editor, area);
    }

    fn render_suggestions(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Suggestions;
        let outer = Block::default()
            .borders(Borders::ALL)
            .title(" Suggestions ")
            .border_style(Style::default().fg(border_color(focused)));
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let streaming = self.is_streaming(StreamKind::Suggestions);
        if !self.suggestions.has_active() {
            let hint = if streaming { "Waiting..." } else { "Press F5 for suggestions" };
            frame.render_widget(
                Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
                inner,
            );
            return;
        }

        let cards = Layout::vertical([Constraint::Ratio(1, 3); 3]).split(inner);
        for (idx, (slot, card_area)) in self.suggestions.iter().zip(cards.iter()).enumerate() {
            let (status, body) = slot_view(slot, streaming);
            let selected = focused && idx == self.selected_suggestion && slot.is_some();
            let title_style = if selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let block = Block::default()
                .borders(Borders::TOP)
                .title(Span::styled(format!(" {}{} ", idx + 1, status), title_style))
                .border_style(Style::default().fg(border_color(selected)));
            frame.render_widget(body.block(block).wrap(Wrap { trim: false }), *card_area);
        }
    }

    fn render_completion(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Completion;
        let streaming = self.is_streaming(StreamKind::Completion);
        let (status, body) = match self.completion.get(0) {
            None => (
                "",
                Paragraph::new("Press F6 for a completion")
                    .style(Style::default().fg(Color::DarkGray)),
            ),
            slot => slot_view(slot, streaming),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Completion{} ", status))
            .border_style(Style::default().fg(border_color(focused)));
        frame.render_widget(body.block(block).wrap(Wrap { trim: false }), area);
    }

    fn render_characters(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Characters ")
            .border_style(Style::default().fg(Color::DarkGray));
        let body = if self.is_extracting() {
            Paragraph::new("Detecting...").style(Style::default().fg(Color::DarkGray))
        } else if self.characters.is_empty() {
            Paragraph::new("Press F7 to detect").style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(self.characters.join(", ")).style(Style::default().fg(Color::Green))
        };
        frame.render_widget(body.block(block).wrap(Wrap { trim: true }), area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let line = match &self.error {
            Some(error) => Line::styled(error.as_str(), Style::default().fg(Color::Red)),
            None => {
                let busy: Vec<&str> = [StreamKind::Suggestions, StreamKind::Completion]
                    .into_iter()
                    .filter(|kind| self.is_streaming(*kind))
                    .map(StreamKind::label)
                    .collect();
                if busy.is_empty() {
                    Line::styled("Ready", Style::default().fg(Color::DarkGray))
                } else {
                    Line::styled(
                        format!("Streaming {}", busy.join(" and ")),
                        Style::default().fg(Color::Yellow),
                    )
                }
            }
        };
        frame.render_widget(Paragraph::new(line), inset_rect(area, 1, 0));
    }
}

fn render_hints(frame: &mut Frame, area: Rect) {
    let area = inset_rect(area, 1, 0);
    frame.render_widget(
        Paragraph::new(fit_hints(area.width as usize))
            .style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod render_tests;
