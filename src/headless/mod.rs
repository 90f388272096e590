//! Headless mode - NDJSON event output
//!
//! This module drives the engine against an in-memory surface and writes
//! every engine event to stdout as structured JSON. This lets scripts and
//! integration tests observe the rendering pipeline without a browser.
//!
//! # Event Format
//!
//! Events are output as NDJSON (newline-delimited JSON), one event per line.
//! Each event has an "event" field indicating its type, along with event-specific data.
//!
//! # Example Output
//!
//! ```json
//! {"event":"started","url":"http://localhost:9001/","cap":null,"timestamp":1704700001000}
//! {"event":"line_rendered","id":0,"text":"error: x","markup":"<span class=\"error\">error</span>: x","classes":["line"],"visible":true,"timestamp":1704700002000}
//! {"event":"filter_applied","query":"err","visible":1,"total":2,"timestamp":1704700003000}
//! ```

pub mod runner;

use std::io::{self, Write};

use chrono::Utc;
use serde::Serialize;
use tracing::error;

use tailview_app::EngineEvent;

/// Events emitted in headless mode
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// Engine initialised, input about to be read
    Started {
        url: String,
        cap: Option<usize>,
        timestamp: i64,
    },

    LineRendered {
        id: u64,
        text: String,
        markup: String,
        classes: Vec<String>,
        visible: bool,
        timestamp: i64,
    },

    /// The newest line was replaced (the paused `SKIPPED: n` placeholder)
    LineReplaced {
        id: u64,
        text: String,
        markup: String,
        classes: Vec<String>,
        visible: bool,
        timestamp: i64,
    },

    LineEvicted { id: u64, timestamp: i64 },

    LineSelected {
        id: u64,
        selected: bool,
        timestamp: i64,
    },

    FilterApplied {
        query: String,
        visible: usize,
        total: usize,
        timestamp: i64,
    },

    UrlChanged { url: String, timestamp: i64 },

    PauseChanged { paused: bool, timestamp: i64 },

    ThemeChanged { theme: String, timestamp: i64 },

    UnreadChanged { count: u32, timestamp: i64 },

    /// Error occurred
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },

    /// Input exhausted, final buffer contents
    Finished {
        lines: usize,
        visible: usize,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Emit this event to stdout as JSON
    pub fn emit(&self) {
        let mut stdout = io::stdout().lock();
        self.write_to(&mut stdout);
    }

    /// Write this event as one NDJSON line
    pub fn write_to(&self, out: &mut impl Write) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        if let Err(e) = writeln!(out, "{}", json) {
            error!("Failed to write headless event: {}", e);
            return;
        }

        // Flush to ensure immediate output
        if let Err(e) = out.flush() {
            error!("Failed to flush headless output: {}", e);
        }
    }

    /// Event type tag, as written in the "event" field
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::LineRendered { .. } => "line_rendered",
            Self::LineReplaced { .. } => "line_replaced",
            Self::LineEvicted { .. } => "line_evicted",
            Self::LineSelected { .. } => "line_selected",
            Self::FilterApplied { .. } => "filter_applied",
            Self::UrlChanged { .. } => "url_changed",
            Self::PauseChanged { .. } => "pause_changed",
            Self::ThemeChanged { .. } => "theme_changed",
            Self::UnreadChanged { .. } => "unread_changed",
            Self::Error { .. } => "error",
            Self::Finished { .. } => "finished",
        }
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn started(url: &str, cap: Option<usize>) -> Self {
        Self::Started {
            url: url.to_string(),
            cap,
            timestamp: Self::now(),
        }
    }

    pub fn error(message: impl Into<String>, fatal: bool) -> Self {
        Self::Error {
            message: message.into(),
            fatal,
            timestamp: Self::now(),
        }
    }

    pub fn finished(lines: usize, visible: usize) -> Self {
        Self::Finished {
            lines,
            visible,
            timestamp: Self::now(),
        }
    }
}

impl From<EngineEvent> for HeadlessEvent {
    fn from(event: EngineEvent) -> Self {
        let timestamp = Self::now();
        match event {
            EngineEvent::LineRendered {
                id,
                text,
                markup,
                classes,
                visible,
            } => Self::LineRendered {
                id: id.0,
                text,
                markup,
                classes,
                visible,
                timestamp,
            },
            EngineEvent::LineReplaced {
                id,
                text,
                markup,
                classes,
                visible,
            } => Self::LineReplaced {
                id: id.0,
                text,
                markup,
                classes,
                visible,
                timestamp,
            },
            EngineEvent::LineEvicted { id } => Self::LineEvicted {
                id: id.0,
                timestamp,
            },
            EngineEvent::LineSelected { id, selected } => Self::LineSelected {
                id: id.0,
                selected,
                timestamp,
            },
            EngineEvent::FilterApplied {
                query,
                visible,
                total,
            } => Self::FilterApplied {
                query,
                visible,
                total,
                timestamp,
            },
            EngineEvent::UrlChanged { url } => Self::UrlChanged { url, timestamp },
            EngineEvent::PauseChanged { paused } => Self::PauseChanged { paused, timestamp },
            EngineEvent::ThemeChanged { theme } => Self::ThemeChanged {
                theme: theme.as_str().to_string(),
                timestamp,
            },
            EngineEvent::UnreadChanged { count } => Self::UnreadChanged { count, timestamp },
            EngineEvent::Error { message, fatal } => Self::Error {
                message,
                fatal,
                timestamp,
            },
        }
    }
}
