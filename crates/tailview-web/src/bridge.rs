//! Target-independent glue between browser values and engine messages

use tailview_app::Message;
use tailview_core::prelude::*;
use tailview_core::{EntryId, InboundEvent};

/// Attribute carrying the entry id on every line container
pub const LINE_ID_ATTRIBUTE: &str = "data-id";

/// Local-storage key of the persisted theme
pub const THEME_STORAGE_KEY: &str = "theme";

/// Window events that track page focus. They are registered in the capture
/// phase, so focus and blur dispatched to elements inside the page count too.
pub const WINDOW_FOCUS_EVENTS: [(&str, Message); 2] = [
    ("blur", Message::WindowBlur),
    ("focus", Message::WindowFocus),
];

/// Decode a transport event whose payload was serialised with
/// `JSON.stringify` (`None` when the event carried no payload).
pub fn decode_event(name: &str, payload_json: Option<&str>) -> Result<Message> {
    let payload = match payload_json {
        Some(json) => Some(serde_json::from_str(json)?),
        None => None,
    };
    InboundEvent::from_parts(name, payload).map(Message::Inbound)
}

/// Parse the `data-id` attribute of a line container
pub fn parse_line_id(attribute: &str) -> Option<EntryId> {
    attribute.trim().parse().ok().map(EntryId)
}

/// Whether the viewport shows the end of the page.
///
/// Mirrors `innerHeight + ceil(pageYOffset + 1) >= body.offsetHeight`, which
/// tolerates sub-pixel scroll offsets.
pub fn is_pinned(inner_height: f64, page_y_offset: f64, body_height: f64) -> bool {
    inner_height + (page_y_offset + 1.0).ceil() >= body_height
}
