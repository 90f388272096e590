//! Pause, focus, unread and theme state of one page session

use tailview_core::Theme;

/// Highest value the unread counter reaches
pub const UNREAD_CAP: u32 = 99;

/// Session-wide flags driven by the pause/theme buttons and window focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub paused: bool,
    /// Lines received since the pause started
    pub skip_counter: u64,
    pub window_focused: bool,
    /// Lines rendered while the window was unfocused
    pub unread: u32,
    pub theme: Theme,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            paused: false,
            skip_counter: 0,
            window_focused: true,
            unread: 0,
            theme: Theme::default(),
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the pause flag and return the new value.
    ///
    /// Resuming resets the skip counter.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        if !self.paused {
            self.skip_counter = 0;
        }
        self.paused
    }

    /// Count one skipped line and return the new count
    pub fn next_skip(&mut self) -> u64 {
        self.skip_counter += 1;
        self.skip_counter
    }

    pub fn blur(&mut self) {
        self.window_focused = false;
    }

    /// Mark the window focused and reset the unread counter
    pub fn focus(&mut self) {
        self.window_focused = true;
        self.unread = 0;
    }

    /// Account for one rendered line.
    ///
    /// Returns the new unread count when it changed. Ignored while the
    /// window is focused or the stream is paused, and saturates at
    /// [`UNREAD_CAP`].
    pub fn note_rendered_line(&mut self) -> Option<u32> {
        if self.window_focused || self.paused || self.unread >= UNREAD_CAP {
            return None;
        }
        self.unread += 1;
        Some(self.unread)
    }

    /// Switch theme and return the new one
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_resume_resets_skip_counter() {
        let mut s = SessionState::new();
        assert!(s.toggle_pause());
        assert_eq!(s.next_skip(), 1);
        assert_eq!(s.next_skip(), 2);
        assert!(!s.toggle_pause());
        assert_eq!(s.skip_counter, 0);
        s.toggle_pause();
        assert_eq!(s.next_skip(), 1);
    }

    #[test]
    fn test_unread_only_counts_when_unfocused() {
        let mut s = SessionState::new();
        assert_eq!(s.note_rendered_line(), None);

        s.blur();
        assert_eq!(s.note_rendered_line(), Some(1));
        assert_eq!(s.note_rendered_line(), Some(2));

        s.focus();
        assert_eq!(s.unread, 0);
        assert_eq!(s.note_rendered_line(), None);
    }

    #[test]
    fn test_unread_ignored_while_paused() {
        let mut s = SessionState::new();
        s.blur();
        s.toggle_pause();
        assert_eq!(s.note_rendered_line(), None);
        assert_eq!(s.unread, 0);
    }

    #[test]
    fn test_unread_saturates() {
        let mut s = SessionState::new();
        s.blur();
        for _ in 0..150 {
            s.note_rendered_line();
        }
        assert_eq!(s.unread, UNREAD_CAP);
        assert_eq!(s.note_rendered_line(), None);
    }

    #[test]
    fn test_toggle_theme() {
        let mut s = SessionState::new();
        assert_eq!(s.toggle_theme(), Theme::Dark);
        assert_eq!(s.toggle_theme(), Theme::Light);
    }
}
