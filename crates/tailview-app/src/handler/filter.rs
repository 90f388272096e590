//! Filter changes: re-apply to every line and mirror into input and URL

use tailview_core::prelude::*;

use super::{UpdateAction, UpdateResult};
use crate::state::AppState;
use crate::surface::SurfaceOp;

/// Set the active filter.
///
/// `sync_input` writes the value into the filter box, for changes that did
/// not originate from typing.
pub fn set_filter(state: &mut AppState, value: &str, sync_input: bool) -> UpdateResult {
    let mut actions = apply_query(state, value);

    if sync_input {
        actions.push(SurfaceOp::SetFilterInput(value.to_string()).into());
    }

    if state.location.set_filter(value) {
        actions.push(UpdateAction::ReplaceUrl(state.location.url().clone()));
    }

    if !state.buffer.is_empty() {
        actions.push(SurfaceOp::ScrollToBottom.into());
    }

    UpdateResult::actions(actions)
}

/// Compile `value` and update the visibility of every buffered line.
///
/// An invalid pattern is kept as the query but matches everything; it is
/// reported, never fatal.
pub(crate) fn apply_query(state: &mut AppState, value: &str) -> Vec<UpdateAction> {
    state.filter.set_query(value);

    let mut actions = Vec::new();
    if let Some(err) = state.filter.error() {
        warn!("Invalid filter '{}': {}", value, err);
        actions.push(UpdateAction::ReportError(format!(
            "invalid filter '{}': {}",
            value, err
        )));
    }

    for entry in state.buffer.iter_mut() {
        let visible = state.filter.matches(&entry.text);
        if visible != entry.visible {
            entry.visible = visible;
            actions.push(
                SurfaceOp::SetLineVisible {
                    id: entry.id,
                    visible,
                }
                .into(),
            );
        }
    }

    debug!(
        "Filter '{}' applied to {} lines ({} actions)",
        value,
        state.buffer.len(),
        actions.len()
    );
    actions
}
