//! Event decoding and the async ingestion loop
//!
//! [`EventDecoder`] is the synchronous core: bytes in, parsed events out.
//! [`drive`] pulls a byte stream through it until the stream ends, the
//! caller stops listening, or the cancellation token fires.

use std::ops::ControlFlow;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::{LineBuffer, StreamEvent};

/// Why ingestion stopped before the end of the stream
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IngestError {
    #[error("Stream cancelled")]
    Cancelled,

    /// Reading the next chunk failed
    #[error("{0}")]
    Read(String),
}

/// Counts reported once a stream has been consumed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub events: usize,
    pub malformed: usize,
}

/// Decodes newline-delimited event records from raw chunks
#[derive(Debug, Default)]
pub struct EventDecoder {
    lines: LineBuffer,
    malformed: usize,
}

impl EventDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one network read and return the events it completed
    ///
    /// Records that fail to parse are logged and skipped.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.lines
            .push(chunk)
            .into_iter()
            .filter_map(|line| match StreamEvent::parse(&line) {
                Ok(event) => Some(event),
                Err(e) => {
                    log::warn!("Skipping malformed stream record {:?}: {}", line, e);
                    self.malformed += 1;
                    None
                }
            })
            .collect()
    }

    /// End of stream; an unterminated trailing record is dropped
    pub fn finish(self) -> usize {
        if let Some(rest) = self.lines.finish() {
            log::debug!("Discarding unterminated record at end of stream: {:?}", rest);
        }
        self.malformed
    }
}

/// Consume a byte stream, handing each decoded event to `on_event` in order
///
/// `on_event` returns `ControlFlow::Break` when nobody is listening any more;
/// ingestion then stops quietly. Cancellation is checked before every read.
pub async fn drive<S, E, F>(
    stream: S,
    cancel: &CancellationToken,
    mut on_event: F,
) -> Result<IngestSummary, IngestError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
    F: FnMut(StreamEvent) -> ControlFlow<()>,
{
    let mut stream = std::pin::pin!(stream);
    let mut decoder = EventDecoder::new();
    let mut events = 0;

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(IngestError::Cancelled),
            next = stream.next() => next,
        };

        match next {
            Some(Ok(chunk)) => {
                for event in decoder.feed(&chunk) {
                    events += 1;
                    if on_event(event).is_break() {
                        let malformed = decoder.finish();
                        return Ok(IngestSummary { events, malformed });
                    }
                }
            }
            Some(Err(e)) => return Err(IngestError::Read(e.to_string())),
            None => break,
        }
    }

    let malformed = decoder.finish();
    Ok(IngestSummary { events, malformed })
}

#[cfg(test)]
#[path = "ingest_tests.rs"]
mod ingest_tests;
