//! File-backed theme persistence for native builds

use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tailview_core::prelude::*;
use tailview_core::Theme;

/// File name of the persisted theme inside the data directory
pub const THEME_FILENAME: &str = "theme";

/// Persists the theme as a single word (`dark`/`light`) in a file
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under `<dir>/theme`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(THEME_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored theme. A missing file means no theme was stored.
    pub fn load(&self) -> Result<Option<Theme>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => content.trim().parse().map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::storage(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    pub fn store(&self, theme: Theme) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::storage(format!("Failed to create {:?}: {}", parent, e)))?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| Error::storage(format!("Failed to open theme file: {}", e)))?;

        // Released when the file is dropped
        file.lock_exclusive()
            .map_err(|e| Error::storage(format!("Failed to lock theme file: {}", e)))?;

        file.write_all(theme.as_str().as_bytes())
            .map_err(|e| Error::storage(format!("Failed to write theme file: {}", e)))?;
        file.flush()
            .map_err(|e| Error::storage(format!("Failed to flush theme file: {}", e)))?;

        debug!("Stored theme '{}' in {:?}", theme, self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_means_no_theme() {
        let temp = tempdir().unwrap();
        let store = FileThemeStore::in_dir(temp.path());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_store_then_load() {
        let temp = tempdir().unwrap();
        let store = FileThemeStore::in_dir(&temp.path().join("nested"));

        store.store(Theme::Dark).unwrap();
        assert_eq!(store.load().unwrap(), Some(Theme::Dark));

        store.store(Theme::Light).unwrap();
        assert_eq!(store.load().unwrap(), Some(Theme::Light));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "light");
    }

    #[test]
    fn test_garbage_is_a_storage_error() {
        let temp = tempdir().unwrap();
        let store = FileThemeStore::in_dir(temp.path());
        std::fs::write(store.path(), "purple").unwrap();
        assert!(matches!(store.load(), Err(Error::Storage { .. })));
    }
}
