//! PDF rendering of a laid-out story
//!
//! Uses the built-in Courier faces so no font files are embedded and the
//! layout's monospace metrics match what is drawn.

use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rgb};

use super::ExportError;
use super::layout::{DocumentLayout, PageMetrics, TextMeasure};

/// Title block printed on the first page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHeader {
    pub title: String,
    /// Already formatted, e.g. "October 18, 2026"
    pub date: String,
}

fn pdf_error(e: impl std::fmt::Debug) -> ExportError {
    ExportError::Pdf(format!("{:?}", e))
}

/// Render the layout into PDF bytes
pub fn render_pdf(
    layout: &DocumentLayout,
    header: &DocumentHeader,
    metrics: &PageMetrics,
    measure: &impl TextMeasure,
) -> Result<Vec<u8>, ExportError> {
    let width = Mm(metrics.page_width);
    let height = Mm(metrics.page_height);
    // Layout y grows downwards, PDF y grows upwards
    let flip = |y: f32| Mm(metrics.page_height - y);

    let (doc, first_page, first_layer) = PdfDocument::new(header.title.as_str(), width, height, "Story");
    let body_font = doc.add_builtin_font(BuiltinFont::Courier).map_err(pdf_error)?;
    let title_font = doc
        .add_builtin_font(BuiltinFont::CourierBold)
        .map_err(pdf_error)?;

    let mut layers: Vec<PdfLayerReference> = vec![doc.get_page(first_page).get_layer(first_layer)];
    for _ in 1..layout.page_count() {
        let (page, layer) = doc.add_page(width, height, "Story");
        layers.push(doc.get_page(page).get_layer(layer));
    }

    let first = &layers[0];
    first.use_text(
        header.title.as_str(),
        metrics.title_font_size,
        Mm(metrics.margin),
        flip(metrics.title_y),
        &title_font,
    );
    first.use_text(
        header.date.as_str(),
        metrics.date_font_size,
        Mm(metrics.margin),
        flip(metrics.date_y),
        &body_font,
    );

    for (page, layer) in layout.pages.iter().zip(&layers) {
        for line in page.lines.iter().filter(|l| !l.text.is_empty()) {
            layer.use_text(
                line.text.as_str(),
                metrics.body_font_size,
                Mm(metrics.margin),
                flip(line.y),
                &body_font,
            );
        }
    }

    // Footers go on last so the grey fill does not leak into body text
    for (page, layer) in layout.pages.iter().zip(&layers) {
        draw_footer(layer, &page.footer, metrics, measure, &body_font);
    }

    drop(layers);
    doc.save_to_bytes().map_err(pdf_error)
}

fn draw_footer(
    layer: &PdfLayerReference,
    footer: &str,
    metrics: &PageMetrics,
    measure: &impl TextMeasure,
    font: &IndirectFontRef,
) {
    let text_width = measure.width_mm(footer, metrics.footer_font_size);
    let x = ((metrics.page_width - text_width) / 2.0).max(0.0);

    layer.set_fill_color(Color::Rgb(Rgb::new(0.5, 0.5, 0.5, None)));
    layer.use_text(
        footer,
        metrics.footer_font_size,
        Mm(x),
        Mm(metrics.page_height - metrics.footer_y()),
        font,
    );
}
