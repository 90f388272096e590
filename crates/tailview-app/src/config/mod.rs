//! Configuration file parsing for tailview
//!
//! Supports:
//! - `.tailview/config.toml` - Global settings
//! - a JSON highlight preset referenced from `[highlight] preset`

pub mod settings;
pub mod types;

pub use settings::{config_path, init_config_dir, load_highlight_preset, load_settings};
pub use types::*;
