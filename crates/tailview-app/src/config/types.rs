//! Configuration types for tailview
//!
//! Defines `Settings` (`.tailview/config.toml`) and its sections.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Application settings (.tailview/config.toml)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub buffer: BufferSettings,

    #[serde(default)]
    pub ui: UiSettings,

    #[serde(default)]
    pub highlight: HighlightSettings,
}

/// Display buffer settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BufferSettings {
    /// Initial cap on rendered lines; `options:lines` overrides it.
    /// Unset means unbounded until the server sends a cap.
    #[serde(default)]
    pub lines: Option<usize>,
}

/// Presentation settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UiSettings {
    #[serde(default)]
    pub hide_topbar: bool,

    #[serde(default)]
    pub no_indent: bool,

    /// How long the `transition` class stays on the document root after a
    /// theme switch
    #[serde(default = "default_theme_transition_ms")]
    pub theme_transition_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            hide_topbar: false,
            no_indent: false,
            theme_transition_ms: default_theme_transition_ms(),
        }
    }
}

impl UiSettings {
    pub fn theme_transition(&self) -> Duration {
        Duration::from_millis(self.theme_transition_ms)
    }
}

fn default_theme_transition_ms() -> u64 {
    1000
}

/// Highlight rules applied before the server sends its own
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct HighlightSettings {
    /// JSON file holding a highlight config, relative to the config directory
    #[serde(default)]
    pub preset: Option<PathBuf>,
}
