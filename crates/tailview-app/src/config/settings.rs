//! Settings loading from `.tailview/config.toml`

use std::path::{Path, PathBuf};

use tailview_core::prelude::*;
use tailview_core::HighlightConfig;

use super::types::Settings;

pub const CONFIG_DIR: &str = ".tailview";
pub const CONFIG_FILENAME: &str = "config.toml";

/// Path of the settings file below `base`
pub fn config_path(base: &Path) -> PathBuf {
    base.join(CONFIG_DIR).join(CONFIG_FILENAME)
}

/// Load settings from `<base>/.tailview/config.toml`.
///
/// A missing file yields defaults. A file that cannot be read or parsed is
/// logged and also yields defaults.
pub fn load_settings(base: &Path) -> Settings {
    let path = config_path(base);

    if !path.exists() {
        debug!("No config file at {:?}, using defaults", path);
        return Settings::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", path, e);
            Settings::default()
        }
    }
}

/// Create `.tailview/config.toml` with commented defaults if missing
pub fn init_config_dir(base: &Path) -> Result<PathBuf> {
    let dir = base.join(CONFIG_DIR);

    if !dir.exists() {
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::config(format!("Failed to create {} dir: {}", CONFIG_DIR, e)))?;
        info!("Created {} directory", CONFIG_DIR);
    }

    let path = dir.join(CONFIG_FILENAME);
    if !path.exists() {
        std::fs::write(&path, generate_default_config())
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created default config.toml");
    }

    Ok(path)
}

fn generate_default_config() -> &'static str {
    r#"# tailview configuration

[buffer]
# lines = 2000          # Initial cap on rendered lines (server may override)

[ui]
hide_topbar = false
no_indent = false
theme_transition_ms = 1000

[highlight]
# preset = "highlight.json"   # Highlight rules applied at startup
"#
}

/// Load the highlight preset named in the settings, if any.
///
/// Relative paths resolve against `<base>/.tailview/`.
pub fn load_highlight_preset(base: &Path, settings: &Settings) -> Result<Option<HighlightConfig>> {
    let Some(preset) = &settings.highlight.preset else {
        return Ok(None);
    };

    let path = if preset.is_absolute() {
        preset.clone()
    } else {
        base.join(CONFIG_DIR).join(preset)
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("reading highlight preset {}", path.display()))?;
    let config = HighlightConfig::from_json(&content)
        .with_context(|| format!("parsing highlight preset {}", path.display()))?;

    debug!("Loaded {} highlight rules from {:?}", config.rule_count(), path);
    Ok(Some(config))
}
