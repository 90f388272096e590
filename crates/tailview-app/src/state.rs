//! Application state (Model in TEA pattern)

use tailview_core::{DisplayBuffer, FilterState, HighlightEngine};

use crate::config::Settings;
use crate::format::{AnsiFormatter, TextFormatter};
use crate::location::Location;
use crate::session::SessionState;

/// Presentation flags set by `options:*` events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutState {
    pub topbar_hidden: bool,
    pub no_indent: bool,
}

/// Complete application state (the Model in TEA)
#[derive(Debug)]
pub struct AppState {
    /// Rendered lines, oldest first
    pub buffer: DisplayBuffer,

    /// Active filter (mirrored into the input box and `location`)
    pub filter: FilterState,

    /// Pause, focus, unread and theme
    pub session: SessionState,

    /// Compiled highlight rules
    pub highlight: HighlightEngine,

    pub layout: LayoutState,

    /// Page address as last written to the address bar
    pub location: Location,

    /// Settings loaded at startup
    pub settings: Settings,

    /// Escaping and ANSI conversion applied before highlighting
    pub formatter: Box<dyn TextFormatter>,

    /// Set by `Message::Quit`
    pub quit: bool,
}

impl AppState {
    pub fn new(location: Location) -> Self {
        Self::with_settings(location, Settings::default())
    }

    pub fn with_settings(location: Location, settings: Settings) -> Self {
        let buffer = match settings.buffer.lines {
            Some(cap) => DisplayBuffer::with_cap(cap),
            None => DisplayBuffer::new(),
        };

        Self {
            buffer,
            filter: FilterState::new(),
            session: SessionState::new(),
            highlight: HighlightEngine::default(),
            layout: LayoutState::default(),
            location,
            settings,
            formatter: Box::new(AnsiFormatter),
            quit: false,
        }
    }

    /// Swap the text formatter used for new lines
    pub fn with_formatter(mut self, formatter: impl TextFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location() -> Location {
        Location::parse("http://localhost:9001/").unwrap()
    }

    #[test]
    fn test_new_state_defaults() {
        let state = AppState::new(location());
        assert!(state.buffer.is_empty());
        assert_eq!(state.buffer.cap(), None);
        assert!(!state.filter.is_active());
        assert!(state.session.window_focused);
        assert!(state.highlight.is_empty());
        assert!(!state.should_quit());
    }

    #[test]
    fn test_settings_seed_buffer_cap() {
        let mut settings = Settings::default();
        settings.buffer.lines = Some(50);
        let state = AppState::with_settings(location(), settings);
        assert_eq!(state.buffer.cap(), Some(50));
    }
}
