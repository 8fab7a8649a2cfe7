//! Stream event records
//!
//! One JSON object per line:
//! `{"type":"chunk","idx":1,"text":"..."}`, `{"type":"done","idx":1}`,
//! `{"type":"error","idx":1,"text":"..."}`. The completion stream omits `idx`.

use serde::{Deserialize, Serialize};

/// A single record of the newline-delimited event protocol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    /// More text for a slot
    Chunk {
        #[serde(default)]
        idx: usize,
        text: String,
    },
    /// The slot will receive no more text
    Done {
        #[serde(default)]
        idx: usize,
    },
    /// The slot failed; `text` describes why
    Error {
        #[serde(default)]
        idx: usize,
        #[serde(default)]
        text: String,
    },
}

impl StreamEvent {
    /// Parse one trimmed line of the stream
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Slot index this event addresses
    pub fn idx(&self) -> usize {
        match self {
            StreamEvent::Chunk { idx, .. }
            | StreamEvent::Done { idx }
            | StreamEvent::Error { idx, .. } => *idx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chunk() {
        let event = StreamEvent::parse(r#"{"type":"chunk","idx":2,"text":"Once"}"#).unwrap();
        assert_eq!(
            event,
            StreamEvent::Chunk {
                idx: 2,
                text: "Once".to_string()
            }
        );
    }

    #[test]
    fn test_parse_done_without_idx_defaults_to_zero() {
        let event = StreamEvent::parse(r#"{"type":"done"}"#).unwrap();
        assert_eq!(event, StreamEvent::Done { idx: 0 });
    }

    #[test]
    fn test_parse_error_event() {
        let event = StreamEvent::parse(r#"{"type":"error","idx":1,"text":"model offline"}"#).unwrap();
        assert_eq!(event.idx(), 1);
        assert!(matches!(event, StreamEvent::Error { ref text, .. } if text == "model offline"));
    }

    #[test]
    fn test_parse_error_event_without_text() {
        let event = StreamEvent::parse(r#"{"type":"error","idx":0}"#).unwrap();
        assert_eq!(
            event,
            StreamEvent::Error {
                idx: 0,
                text: String::new()
            }
        );
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let event =
            StreamEvent::parse(r#"{"type":"chunk","idx":0,"text":"a","model":"gemma"}"#).unwrap();
        assert_eq!(event.idx(), 0);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(StreamEvent::parse(r#"{"type":"heartbeat","idx":0}"#).is_err());
    }

    #[test]
    fn test_chunk_without_text_is_rejected() {
        assert!(StreamEvent::parse(r#"{"type":"chunk","idx":0}"#).is_err());
    }

    #[test]
    fn test_missing_type_is_rejected() {
        assert!(StreamEvent::parse(r#"{"idx":0,"text":"x"}"#).is_err());
    }

    #[test]
    fn test_serialized_form_uses_lowercase_tag() {
        let line = serde_json::to_string(&StreamEvent::Done { idx: 1 }).unwrap();
        assert_eq!(line, r#"{"type":"done","idx":1}"#);
    }
}
