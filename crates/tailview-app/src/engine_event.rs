//! Domain events emitted by the Engine for external consumers
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`. The headless driver turns them into NDJSON; tests
//! use them to observe the pipeline without inspecting the surface.

use tailview_core::{EntryId, Theme};

/// Domain events emitted by the Engine for external consumers.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    // ─────────────────────────────────────────────────────────
    // Display Buffer
    // ─────────────────────────────────────────────────────────
    /// A line container was appended
    LineRendered {
        id: EntryId,
        text: String,
        markup: String,
        classes: Vec<String>,
        visible: bool,
    },

    /// The newest line container was replaced
    LineReplaced {
        id: EntryId,
        text: String,
        markup: String,
        classes: Vec<String>,
        visible: bool,
    },

    /// The oldest line container was removed by the cap
    LineEvicted { id: EntryId },

    /// A line's selection highlight was toggled
    LineSelected { id: EntryId, selected: bool },

    // ─────────────────────────────────────────────────────────
    // Filter
    // ─────────────────────────────────────────────────────────
    /// The filter changed and was re-applied to every line
    FilterApplied {
        query: String,
        visible: usize,
        total: usize,
    },

    /// The address bar was rewritten
    UrlChanged { url: String },

    // ─────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────
    PauseChanged { paused: bool },

    ThemeChanged { theme: Theme },

    /// The favicon badge count changed
    UnreadChanged { count: u32 },

    // ─────────────────────────────────────────────────────────
    // Errors
    // ─────────────────────────────────────────────────────────
    /// An event or action was rejected. The session continues unless
    /// `fatal` is set, in which case the engine stops.
    Error { message: String, fatal: bool },
}

impl EngineEvent {
    /// Returns a short string label for this event type (for logging/debugging).
    pub fn event_type(&self) -> &'static str {
        match self {
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
        }
    }
}
