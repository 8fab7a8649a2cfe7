use ratatui::{Frame, layout::Rect, widgets::Clear};

/// Area anchored to the top-right corner of `frame_area`, clamped to fit
pub fn top_right_popup(frame_area: Rect, width: u16, height: u16, margin: u16) -> Rect {
    let popup_width = width.min(frame_area.width.saturating_sub(margin * 2));
    let popup_height = height.min(frame_area.height.saturating_sub(margin));

    Rect {
        x: frame_area.x + frame_area.width.saturating_sub(popup_width + margin),
        y: frame_area.y + margin.min(frame_area.height),
        width: popup_width,
        height: popup_height,
    }
}

pub fn inset_rect(area: Rect, horizontal_margin: u16, vertical_margin: u16) -> Rect {
    Rect {
        x: area.x + horizontal_margin.min(area.width),
        y: area.y + vertical_margin.min(area.height),
        width: area.width.saturating_sub(horizontal_margin * 2),
        height: area.height.saturating_sub(vertical_margin * 2),
    }
}

pub fn clear_area(frame: &mut Frame, area: Rect) {
    frame.render_widget(Clear, area);
}

#[cfg(test)]
#[path = "popup_tests.rs"]
mod popup_tests;
