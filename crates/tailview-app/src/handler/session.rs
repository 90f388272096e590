//! Session handlers: page init, pause, theme and window focus

use tailview_core::prelude::*;
use tailview_core::Theme;

use super::{filter, options, UpdateAction, UpdateResult};
use crate::message::Message;
use crate::state::AppState;
use crate::surface::{SurfaceOp, Target};

pub const PLAY_CLASS: &str = "play";
pub const DARK_CLASS: &str = "dark";
pub const TRANSITION_CLASS: &str = "transition";
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Page load: restore the theme, seed the filter from the URL, apply
/// layout settings and focus the filter box.
pub fn handle_init(state: &mut AppState, persisted_theme: Option<Theme>) -> UpdateResult {
    let mut actions = Vec::new();

    let theme = persisted_theme.unwrap_or_default();
    state.session.theme = theme;
    if let Some(theme) = persisted_theme {
        actions.push(set_theme_attribute(theme));
    }
    actions.push(theme_button_class(theme));

    actions.push(SurfaceOp::FocusFilterInput.into());

    if let Some(value) = state.location.filter() {
        actions.extend(filter::apply_query(state, &value));
        actions.push(SurfaceOp::SetFilterInput(value).into());
    }

    if state.settings.ui.hide_topbar {
        actions.extend(options::hide_topbar(state));
    }
    if state.settings.ui.no_indent {
        actions.extend(options::no_indent(state));
    }

    info!(
        "Session initialised (theme {}, filter '{}')",
        theme,
        state.filter.query()
    );
    UpdateResult::actions(actions)
}

pub fn handle_toggle_pause(state: &mut AppState) -> UpdateResult {
    let paused = state.session.toggle_pause();
    debug!("Paused: {}", paused);

    if paused {
        UpdateResult::action(SurfaceOp::add_class(Target::PauseButton, PLAY_CLASS))
    } else {
        UpdateResult::action(SurfaceOp::remove_class(Target::PauseButton, PLAY_CLASS))
    }
}

pub fn handle_toggle_theme(state: &mut AppState) -> UpdateResult {
    let theme = state.session.toggle_theme();
    debug!("Theme: {}", theme);

    UpdateResult::actions(vec![
        SurfaceOp::add_class(Target::Root, TRANSITION_CLASS).into(),
        UpdateAction::Schedule {
            delay: state.settings.ui.theme_transition(),
            message: Message::ThemeTransitionEnd,
        },
        set_theme_attribute(theme),
        theme_button_class(theme),
        UpdateAction::PersistTheme(theme),
    ])
}

pub fn handle_theme_transition_end() -> UpdateResult {
    UpdateResult::action(SurfaceOp::remove_class(Target::Root, TRANSITION_CLASS))
}

pub fn handle_window_blur(state: &mut AppState) -> UpdateResult {
    state.session.blur();
    UpdateResult::none()
}

pub fn handle_window_focus(state: &mut AppState) -> UpdateResult {
    state.session.focus();
    UpdateResult::action(UpdateAction::SetBadge(0))
}

fn set_theme_attribute(theme: Theme) -> UpdateAction {
    SurfaceOp::SetRootAttribute {
        name: THEME_ATTRIBUTE.to_string(),
        value: theme.as_str().to_string(),
    }
    .into()
}

fn theme_button_class(theme: Theme) -> UpdateAction {
    if theme.is_dark() {
        SurfaceOp::add_class(Target::ThemeButton, DARK_CLASS).into()
    } else {
        SurfaceOp::remove_class(Target::ThemeButton, DARK_CLASS).into()
    }
}
