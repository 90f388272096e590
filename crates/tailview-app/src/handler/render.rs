//! Line rendering: format, highlight, insert, filter, evict, follow tail

use tailview_core::prelude::*;
use tailview_core::{strip_markup, EntryId, Highlighted, LogEntry};

use super::{UpdateAction, UpdateResult};
use crate::state::AppState;
use crate::surface::{LineView, SurfaceOp};

/// Handle an inbound `line` event.
///
/// While paused the line itself is dropped and a single collapsing
/// `SKIPPED: N` placeholder is rendered in its place.
pub fn handle_line(state: &mut AppState, line: &str) -> UpdateResult {
    if state.session.paused {
        let skipped = state.session.next_skip();
        let placeholder = format!("SKIPPED: {}", skipped);
        return UpdateResult::actions(render_line(state, &placeholder, skipped > 1));
    }

    UpdateResult::actions(render_line(state, line, false))
}

/// Render one line into the display buffer.
///
/// With `replace` set the newest entry is swapped for the new one (appends
/// when the buffer is empty). At most one entry is evicted per call.
pub fn render_line(state: &mut AppState, text: &str, replace: bool) -> Vec<UpdateAction> {
    let formatted = state.formatter.to_html(text);
    let Highlighted { markup, line_class } = state.highlight.highlight(&formatted);
    let content = strip_markup(&markup);

    let id = state.buffer.next_id();
    let mut entry = LogEntry::new(id, text, markup, content, line_class);
    entry.visible = state.filter.matches(&entry.text);
    let view = LineView::from(&entry);

    let mut actions = Vec::with_capacity(4);

    if replace && !state.buffer.is_empty() {
        state.buffer.replace_last(entry);
        actions.push(SurfaceOp::ReplaceLastLine(view).into());
    } else {
        state.buffer.push(entry);
        actions.push(SurfaceOp::AppendLine(view).into());
    }

    if let Some(evicted) = state.buffer.evict_overflow() {
        trace!("Evicted line {} (cap {:?})", evicted.id, state.buffer.cap());
        actions.push(SurfaceOp::EvictLine(evicted.id).into());
    }

    actions.push(SurfaceOp::FollowTail.into());

    if let Some(unread) = state.session.note_rendered_line() {
        actions.push(UpdateAction::SetBadge(unread));
    }

    actions
}

/// Toggle the selection highlight of a rendered line
pub fn handle_line_clicked(state: &mut AppState, id: EntryId) -> UpdateResult {
    match state.buffer.get_mut(id) {
        Some(entry) => {
            let selected = entry.toggle_selected();
            UpdateResult::action(SurfaceOp::SetLineSelected { id, selected })
        }
        None => {
            debug!("Click on unknown line {}", id);
            UpdateResult::none()
        }
    }
}
