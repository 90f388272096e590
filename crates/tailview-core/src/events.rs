//! Inbound transport events
//!
//! The server pushes named events over a publish/subscribe channel. On the
//! wire each one is a JSON frame shaped like a socket.io emit:
//! `["event-name", payload]`, where the payload is optional.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::highlight::HighlightConfig;

// ─────────────────────────────────────────────────────────
// Event names
// ─────────────────────────────────────────────────────────

pub const EVENT_LINES: &str = "options:lines";
pub const EVENT_HIDE_TOPBAR: &str = "options:hide-topbar";
pub const EVENT_NO_INDENT: &str = "options:no-indent";
pub const EVENT_HIGHLIGHT_CONFIG: &str = "options:highlightConfig";
pub const EVENT_LINE: &str = "line";

// ─────────────────────────────────────────────────────────
// EventFrame
// ─────────────────────────────────────────────────────────

/// A decoded `["name", payload]` frame
#[derive(Debug, Clone, PartialEq)]
pub struct EventFrame {
    pub name: String,
    pub payload: Option<Value>,
}

impl EventFrame {
    pub fn new(name: impl Into<String>, payload: Option<Value>) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// Parse a single JSON frame
    pub fn parse(frame: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(frame.trim())?;
        let Value::Array(mut parts) = value else {
            return Err(Error::protocol("frame is not a JSON array"));
        };
        if parts.is_empty() || parts.len() > 2 {
            return Err(Error::protocol(format!(
                "frame must have 1 or 2 elements, got {}",
                parts.len()
            )));
        }

        let payload = if parts.len() == 2 { parts.pop() } else { None };
        let name = match parts.pop() {
            Some(Value::String(name)) => name,
            _ => return Err(Error::protocol("event name must be a string")),
        };

        Ok(Self { name, payload })
    }
}

// ─────────────────────────────────────────────────────────
// InboundEvent
// ─────────────────────────────────────────────────────────

/// Fully typed inbound event
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// Display-buffer cap
    LinesLimit(usize),
    /// Hide the top bar
    HideTopbar,
    /// Switch the log container to the no-indent presentation
    NoIndent,
    /// Replace the highlight rule set
    HighlightConfig(HighlightConfig),
    /// One log line
    Line(String),
}

impl InboundEvent {
    /// Build an event from its name and payload
    pub fn from_parts(name: &str, payload: Option<Value>) -> Result<Self> {
        match name {
            EVENT_LINES => {
                let limit = payload
                    .as_ref()
                    .and_then(Value::as_u64)
                    .ok_or_else(|| Error::protocol("options:lines needs a non-negative integer"))?;
                let limit = usize::try_from(limit).unwrap_or(usize::MAX);
                Ok(InboundEvent::LinesLimit(limit))
            }
            EVENT_HIDE_TOPBAR => Ok(InboundEvent::HideTopbar),
            EVENT_NO_INDENT => Ok(InboundEvent::NoIndent),
            EVENT_HIGHLIGHT_CONFIG => {
                let value = payload.ok_or_else(|| {
                    Error::protocol("options:highlightConfig needs a config object")
                })?;
                Ok(InboundEvent::HighlightConfig(HighlightConfig::from_value(
                    value,
                )?))
            }
            EVENT_LINE => match payload {
                Some(Value::String(line)) => Ok(InboundEvent::Line(line)),
                _ => Err(Error::protocol("line needs a string payload")),
            },
            other => Err(Error::protocol(format!("unknown event '{}'", other))),
        }
    }

    /// Decode a frame into a typed event
    pub fn from_frame(frame: EventFrame) -> Result<Self> {
        Self::from_parts(&frame.name, frame.payload)
    }

    /// Parse a raw JSON frame
    pub fn parse(frame: &str) -> Result<Self> {
        Self::from_frame(EventFrame::parse(frame)?)
    }

    /// Wire name of this event
    pub fn name(&self) -> &'static str {
        match self {
            InboundEvent::LinesLimit(_) => EVENT_LINES,
            InboundEvent::HideTopbar => EVENT_HIDE_TOPBAR,
            InboundEvent::NoIndent => EVENT_NO_INDENT,
            InboundEvent::HighlightConfig(_) => EVENT_HIGHLIGHT_CONFIG,
            InboundEvent::Line(_) => EVENT_LINE,
        }
    }

    /// Whether this is one of the `options:*` events
    pub fn is_option(&self) -> bool {
        !matches!(self, InboundEvent::Line(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_line_frame() {
        let event = InboundEvent::parse(r#"["line", "hello world"]"#).unwrap();
        assert_eq!(event, InboundEvent::Line("hello world".to_string()));
        assert!(!event.is_option());
    }

    #[test]
    fn test_parse_lines_limit() {
        let event = InboundEvent::parse(r#"["options:lines", 500]"#).unwrap();
        assert_eq!(event, InboundEvent::LinesLimit(500));
        assert_eq!(event.name(), "options:lines");
    }

    #[test]
    fn test_parse_payloadless_options() {
        assert_eq!(
            InboundEvent::parse(r#"["options:hide-topbar"]"#).unwrap(),
            InboundEvent::HideTopbar
        );
        assert_eq!(
            InboundEvent::parse(r#"["options:no-indent"]"#).unwrap(),
            InboundEvent::NoIndent
        );
    }

    #[test]
    fn test_parse_highlight_config() {
        let frame = r#"["options:highlightConfig", {"words": {"ERR": "color:red"}}]"#;
        let InboundEvent::HighlightConfig(config) = InboundEvent::parse(frame).unwrap() else {
            panic!("expected highlight config");
        };
        assert_eq!(config.words.len(), 1);
    }

    #[test]
    fn test_negative_limit_rejected() {
        let err = InboundEvent::from_parts(EVENT_LINES, Some(json!(-1))).unwrap_err();
        assert!(matches!(err, Error::Protocol { .. }));
    }

    #[test]
    fn test_line_requires_string() {
        assert!(InboundEvent::from_parts(EVENT_LINE, Some(json!(42))).is_err());
        assert!(InboundEvent::from_parts(EVENT_LINE, None).is_err());
    }

    #[test]
    fn test_unknown_event_rejected() {
        let err = InboundEvent::parse(r#"["options:nope", 1]"#).unwrap_err();
        assert!(err.to_string().contains("options:nope"));
    }

    #[test]
    fn test_malformed_frames_rejected() {
        assert!(EventFrame::parse("not json").is_err());
        assert!(EventFrame::parse(r#"{"event": "line"}"#).is_err());
        assert!(EventFrame::parse("[]").is_err());
        assert!(EventFrame::parse(r#"[1, "x"]"#).is_err());
        assert!(EventFrame::parse(r#"["a", 1, 2]"#).is_err());
    }

    #[test]
    fn test_frame_keeps_payload() {
        let frame = EventFrame::parse(r#"["ui:click", 3]"#).unwrap();
        assert_eq!(frame.name, "ui:click");
        assert_eq!(frame.payload, Some(json!(3)));
    }
}
