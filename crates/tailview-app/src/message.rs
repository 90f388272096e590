//! Message types for the application (TEA pattern)

use serde_json::Value;
use tailview_core::events::EventFrame;
use tailview_core::prelude::*;
use tailview_core::{EntryId, InboundEvent, Theme};

use crate::input_key::InputKey;

// ─────────────────────────────────────────────────────────
// UI frame names (headless driver / scripted sessions)
// ─────────────────────────────────────────────────────────

pub const UI_FILTER: &str = "ui:filter";
pub const UI_CLEAR_FILTER: &str = "ui:clear-filter";
pub const UI_PAUSE: &str = "ui:pause";
pub const UI_THEME: &str = "ui:theme";
pub const UI_BLUR: &str = "ui:blur";
pub const UI_FOCUS: &str = "ui:focus";
pub const UI_CLICK: &str = "ui:click";

/// All possible messages/actions in the application
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Page load: apply the persisted theme and seed the filter from the URL
    Init { persisted_theme: Option<Theme> },

    /// Event pushed by the server
    Inbound(InboundEvent),

    // ─────────────────────────────────────────────────────────
    // Filter Messages
    // ─────────────────────────────────────────────────────────
    /// Key released in the filter box, with the box's current value
    FilterKeyUp { key: InputKey, value: String },
    /// Value typed into the filter box (the box already shows it)
    FilterTyped(String),
    /// Set the filter programmatically (the box is updated to match)
    SetFilter(String),
    /// Clear the filter and the box
    ClearFilter,

    // ─────────────────────────────────────────────────────────
    // Session Messages
    // ─────────────────────────────────────────────────────────
    /// Pause button pressed
    TogglePause,
    /// Theme button pressed
    ToggleTheme,
    /// Window lost focus
    WindowBlur,
    /// Window gained focus
    WindowFocus,
    /// The theme transition period is over
    ThemeTransitionEnd,

    /// A rendered line was clicked
    LineClicked(EntryId),

    /// Stop the event loop (end of input in the headless driver)
    Quit,
}

impl Message {
    /// Decode a frame into a message.
    ///
    /// `ui:*` frames map to user-interface messages; everything else must be
    /// an inbound transport event.
    pub fn from_frame(frame: EventFrame) -> Result<Self> {
        match frame.name.as_str() {
            UI_FILTER => match frame.payload {
                Some(Value::String(value)) => Ok(Message::SetFilter(value)),
                _ => Err(Error::protocol("ui:filter needs a string payload")),
            },
            UI_CLEAR_FILTER => Ok(Message::ClearFilter),
            UI_PAUSE => Ok(Message::TogglePause),
            UI_THEME => Ok(Message::ToggleTheme),
            UI_BLUR => Ok(Message::WindowBlur),
            UI_FOCUS => Ok(Message::WindowFocus),
            UI_CLICK => frame
                .payload
                .as_ref()
                .and_then(Value::as_u64)
                .map(|id| Message::LineClicked(EntryId(id)))
                .ok_or_else(|| Error::protocol("ui:click needs an entry id")),
            _ => Ok(Message::Inbound(InboundEvent::from_frame(frame)?)),
        }
    }

    /// Parse a raw JSON frame
    pub fn parse_frame(frame: &str) -> Result<Self> {
        Self::from_frame(EventFrame::parse(frame)?)
    }

    /// Shorthand for an inbound `line` event
    pub fn line(text: impl Into<String>) -> Self {
        Message::Inbound(InboundEvent::Line(text.into()))
    }
}
