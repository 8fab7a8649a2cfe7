//! Incremental line reader
//!
//! Buffers raw bytes across reads and hands out complete, trimmed lines.
//! Knows nothing about the record format carried on each line.

use memchr::memchr;

/// Reassembles newline-terminated lines from arbitrarily split byte chunks
///
/// Lines are split on the raw `\n` byte before decoding, so a multi-byte
/// UTF-8 sequence cut in half by the network stays in the pending buffer
/// until its line is complete.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every line it completed
    ///
    /// Lines are whitespace-trimmed; blank lines are dropped. Whatever
    /// follows the last newline is kept for the next call.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(pos) = memchr(b'\n', &self.pending[start..]) {
            let end = start + pos;
            let line = String::from_utf8_lossy(&self.pending[start..end]);
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                lines.push(trimmed.to_string());
            }
            start = end + 1;
        }
        self.pending.drain(..start);

        lines
    }

    /// Consume the buffer, returning the unterminated remainder if it holds
    /// anything besides whitespace
    pub fn finish(self) -> Option<String> {
        let rest = String::from_utf8_lossy(&self.pending);
        let rest = rest.trim();
        (!rest.is_empty()).then(|| rest.to_string())
    }
}

#[cfg(test)]
#[path = "line_buffer_tests.rs"]
mod line_buffer_tests;
