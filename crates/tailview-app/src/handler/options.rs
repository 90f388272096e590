//! Server-pushed `options:*` events

use tailview_core::prelude::*;
use tailview_core::{HighlightConfig, HighlightEngine};

use super::{UpdateAction, UpdateResult};
use crate::state::AppState;
use crate::surface::{SurfaceOp, Target};

/// Set the display-buffer cap.
///
/// Lines already over the cap are evicted one per subsequent render.
pub fn handle_lines_limit(state: &mut AppState, limit: usize) -> UpdateResult {
    debug!("Line cap set to {}", limit);
    state.buffer.set_cap(Some(limit));
    UpdateResult::none()
}

pub fn handle_hide_topbar(state: &mut AppState) -> UpdateResult {
    UpdateResult::actions(hide_topbar(state))
}

pub fn handle_no_indent(state: &mut AppState) -> UpdateResult {
    UpdateResult::actions(no_indent(state))
}

/// Replace the highlight rules.
///
/// A config with an invalid pattern is rejected as a whole and the previous
/// rules stay in effect.
pub fn handle_highlight_config(state: &mut AppState, config: &HighlightConfig) -> UpdateResult {
    match HighlightEngine::new(config) {
        Ok(engine) => {
            info!("Loaded {} highlight rules", config.rule_count());
            state.highlight = engine;
            UpdateResult::none()
        }
        Err(e) => {
            warn!("Rejected highlight config: {}", e);
            UpdateResult::action(UpdateAction::ReportError(e.to_string()))
        }
    }
}

pub(crate) fn hide_topbar(state: &mut AppState) -> Vec<UpdateAction> {
    state.layout.topbar_hidden = true;
    vec![
        SurfaceOp::add_class(Target::Topbar, "hide").into(),
        SurfaceOp::SetClass {
            target: Target::Body,
            class: "no-topbar".to_string(),
        }
        .into(),
    ]
}

pub(crate) fn no_indent(state: &mut AppState) -> Vec<UpdateAction> {
    state.layout.no_indent = true;
    vec![SurfaceOp::add_class(Target::LogContainer, "no-indent").into()]
}
