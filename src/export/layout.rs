//! Page layout for exported stories
//!
//! All positions are millimetres measured from the top-left corner of the
//! page. Rendering flips them for PDF's bottom-left origin.

/// Points to millimetres
const PT_TO_MM: f32 = 25.4 / 72.0;

/// Text width measurement for a given font
pub trait TextMeasure {
    /// Width of `text` in millimetres at `font_size` points
    fn width_mm(&self, text: &str, font_size: f32) -> f32;
}

/// Fixed-pitch font: every glyph is `advance` em wide
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Monospace {
    pub advance: f32,
}

/// Metrics of the built-in Courier family
pub const COURIER: Monospace = Monospace { advance: 0.6 };

impl TextMeasure for Monospace {
    fn width_mm(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * self.advance * font_size * PT_TO_MM
    }
}

/// Page geometry and type sizes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageMetrics {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub line_height: f32,
    /// First body line on page one, below the title block
    pub body_top: f32,
    pub title_y: f32,
    pub date_y: f32,
    /// Footer baseline distance from the bottom edge
    pub footer_offset: f32,
    pub body_font_size: f32,
    pub title_font_size: f32,
    pub date_font_size: f32,
    pub footer_font_size: f32,
}

impl Default for PageMetrics {
    /// A4 portrait
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 20.0,
            line_height: 7.0,
            body_top: 40.0,
            title_y: 20.0,
            date_y: 28.0,
            footer_offset: 10.0,
            body_font_size: 12.0,
            title_font_size: 18.0,
            date_font_size: 10.0,
            footer_font_size: 9.0,
        }
    }
}

impl PageMetrics {
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Lowest baseline a body line may sit on
    pub fn bottom_limit(&self) -> f32 {
        self.page_height - self.margin
    }

    pub fn footer_y(&self) -> f32 {
        self.page_height - self.footer_offset
    }
}

/// A wrapped line at its vertical position
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub y: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub lines: Vec<PlacedLine>,
    pub footer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<PageLayout>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Footer text for page `page` (1-based) of `total`
pub fn footer_text(page: usize, total: usize, words: usize) -> String {
    format!("Page {} of {} | {} words", page, total, words)
}

/// Lay out the story over as many pages as it needs
///
/// Lines are placed top to bottom; a line that would cross the bottom
/// margin starts a new page at the top margin. Footers are written in a
/// second pass, once the page count is known.
pub fn paginate(
    text: &str,
    words: usize,
    metrics: &PageMetrics,
    measure: &impl TextMeasure,
) -> DocumentLayout {
    let lines = wrap_text(text, metrics.content_width(), metrics.body_font_size, measure);

    let mut pages = Vec::new();
    let mut current = PageLayout::default();
    let mut y = metrics.body_top;

    for line in lines {
        if y + metrics.line_height > metrics.bottom_limit() {
            pages.push(std::mem::take(&mut current));
            y = metrics.margin;
        }
        current.lines.push(PlacedLine { text: line, y });
        y += metrics.line_height;
    }
    pages.push(current);

    let total = pages.len();
    for (i, page) in pages.iter_mut().enumerate() {
        page.footer = footer_text(i + 1, total, words);
    }

    DocumentLayout { pages }
}

/// Wrap text to `max_width` millimetres
///
/// Each newline-separated paragraph is wrapped greedily on whitespace. Blank
/// paragraphs stay as empty lines. Words wider than a line are broken
/// between characters.
pub fn wrap_text(
    text: &str,
    max_width: f32,
    font_size: f32,
    measure: &impl TextMeasure,
) -> Vec<String> {
    let fits = |candidate: &str| measure.width_mm(candidate, font_size) <= max_width;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            if !fits(word) {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let mut pieces = break_word(word, &fits);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
                continue;
            }

            if current.is_empty() {
                current.push_str(word);
                continue;
            }

            let candidate = format!("{} {}", current, word);
            if fits(&candidate) {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }

        lines.push(current);
    }

    lines
}

/// Split an overlong word into pieces that each fit, at least one char each
fn break_word(word: &str, fits: &impl Fn(&str) -> bool) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();

    for ch in word.chars() {
        piece.push(ch);
        if !fits(&piece) && piece.chars().count() > 1 {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(ch);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }

    pieces
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod layout_tests;
