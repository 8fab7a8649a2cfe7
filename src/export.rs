//! Story export to PDF
//!
//! [`layout`] paginates the text, [`pdf`] draws the pages and [`filename`]
//! names the file. [`export_story`] runs the whole pipeline.

use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Local, Utc};
use thiserror::Error;

use crate::config::ExportConfig;
use crate::story;

pub mod filename;
pub mod layout;
pub mod pdf;

pub use filename::export_filename;
pub use layout::{COURIER, DocumentLayout, PageLayout, PageMetrics, TextMeasure, paginate};
pub use pdf::{DocumentHeader, render_pdf};

/// Errors producing an export file
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export: the story is empty")]
    EmptyStory,

    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Paginate, render and write the story
///
/// Returns the path of the written file.
pub fn export_story(
    text: &str,
    config: &ExportConfig,
    now: DateTime<Utc>,
) -> Result<PathBuf, ExportError> {
    if story::is_blank(text) {
        return Err(ExportError::EmptyStory);
    }

    let metrics = PageMetrics::default();
    let words = story::word_count(text);
    let layout = paginate(text, words, &metrics, &COURIER);

    let header = DocumentHeader {
        title: config.title.clone(),
        date: now.with_timezone(&Local).format("%B %-d, %Y").to_string(),
    };
    let bytes = render_pdf(&layout, &header, &metrics, &COURIER)?;

    let path = config.output_dir.join(export_filename(now));
    std::fs::write(&path, bytes).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;

    log::debug!(
        "Exported {} words on {} pages to {}",
        words,
        layout.page_count(),
        path.display()
    );
    Ok(path)
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod export_tests;
