//! Newline-delimited JSON stream ingestion
//!
//! Turns the chunked body of a streaming endpoint into per-slot text:
//! [`LineBuffer`] reassembles records across reads, [`StreamEvent`] is the
//! record schema, [`SlotBoard`] holds the accumulated text, and
//! [`EventDecoder`]/[`drive`] glue them together.

mod event;
mod ingest;
mod line_buffer;
mod slots;

pub use event::StreamEvent;
pub use ingest::{EventDecoder, IngestError, IngestSummary, drive};
pub use line_buffer::LineBuffer;
pub use slots::{Slot, SlotBoard};

/// Number of concurrent suggestion streams served by `/suggestions_stream`
pub const SUGGESTION_SLOTS: usize = 3;

/// The completion stream has a single, unindexed slot
pub const COMPLETION_SLOTS: usize = 1;
