//! Main update function - handles state transitions (TEA pattern)

use tailview_core::InboundEvent;

use super::{filter, keys, options, render, session, UpdateResult};
use crate::message::Message;
use crate::state::AppState;

/// Process a message and update state
/// Returns an UpdateResult with optional follow-up message and actions
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Init { persisted_theme } => session::handle_init(state, persisted_theme),

        Message::Inbound(event) => match event {
            InboundEvent::LinesLimit(limit) => options::handle_lines_limit(state, limit),
            InboundEvent::HideTopbar => options::handle_hide_topbar(state),
            InboundEvent::NoIndent => options::handle_no_indent(state),
            InboundEvent::HighlightConfig(config) => {
                options::handle_highlight_config(state, &config)
            }
            InboundEvent::Line(line) => render::handle_line(state, &line),
        },

        // ─────────────────────────────────────────────────────────
        // Filter Messages
        // ─────────────────────────────────────────────────────────
        Message::FilterKeyUp { key, value } => keys::handle_filter_key(key, value),
        Message::FilterTyped(value) => filter::set_filter(state, &value, false),
        Message::SetFilter(value) => filter::set_filter(state, &value, true),
        Message::ClearFilter => filter::set_filter(state, "", true),

        // ─────────────────────────────────────────────────────────
        // Session Messages
        // ─────────────────────────────────────────────────────────
        Message::TogglePause => session::handle_toggle_pause(state),
        Message::ToggleTheme => session::handle_toggle_theme(state),
        Message::ThemeTransitionEnd => session::handle_theme_transition_end(),
        Message::WindowBlur => session::handle_window_blur(state),
        Message::WindowFocus => session::handle_window_focus(state),

        Message::LineClicked(id) => render::handle_line_clicked(state, id),

        Message::Quit => {
            state.quit = true;
            UpdateResult::none()
        }
    }
}
