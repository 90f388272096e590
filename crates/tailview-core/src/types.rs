//! Core domain types: rendered entries, the display buffer, and the theme

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Stable identifier of a rendered line container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LogEntry
// ─────────────────────────────────────────────────────────────────────────────

/// One rendered log line
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub id: EntryId,
    /// Line as received from the transport
    pub raw: String,
    /// Decorated markup for the inner text element
    pub markup: String,
    /// Text content of the markup (what the filter tests)
    pub text: String,
    /// Class set by a line rule; replaces `line` as the container class
    pub line_class: Option<String>,
    /// Toggled by clicking the line
    pub selected: bool,
    /// Derived from the active filter
    pub visible: bool,
}

impl LogEntry {
    pub fn new(
        id: EntryId,
        raw: impl Into<String>,
        markup: impl Into<String>,
        text: impl Into<String>,
        line_class: Option<String>,
    ) -> Self {
        Self {
            id,
            raw: raw.into(),
            markup: markup.into(),
            text: text.into(),
            line_class,
            selected: false,
            visible: true,
        }
    }

    /// Flip the selection flag and return the new value
    pub fn toggle_selected(&mut self) -> bool {
        self.selected = !self.selected;
        self.selected
    }

    /// Full class list of the container element.
    ///
    /// A matching line rule overwrites the class attribute, so `line` only
    /// survives on lines no rule matched.
    pub fn container_classes(&self) -> Vec<&str> {
        let mut classes = vec![self.line_class.as_deref().unwrap_or("line")];
        if self.selected {
            classes.push("line-selected");
        }
        classes
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DisplayBuffer
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered collection of rendered lines, optionally capped
///
/// The cap is unknown (unbounded) until the server sends it. Overflow is
/// handled by [`DisplayBuffer::evict_overflow`], which removes at most one
/// entry per call so that the caller can mirror every removal on the
/// rendering surface.
#[derive(Debug, Clone, Default)]
pub struct DisplayBuffer {
    entries: VecDeque<LogEntry>,
    cap: Option<usize>,
    next_id: u64,
}

impl DisplayBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cap(cap: usize) -> Self {
        Self {
            cap: Some(cap),
            ..Self::default()
        }
    }

    /// Allocate the id for the next entry
    pub fn next_id(&mut self) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn cap(&self) -> Option<usize> {
        self.cap
    }

    pub fn set_cap(&mut self, cap: Option<usize>) {
        self.cap = cap;
    }

    /// Append an entry at the tail
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push_back(entry);
    }

    /// Replace the most recent entry, returning the one removed.
    ///
    /// On an empty buffer the entry is appended instead and `None` is
    /// returned.
    pub fn replace_last(&mut self, entry: LogEntry) -> Option<LogEntry> {
        let replaced = self.entries.pop_back();
        self.entries.push_back(entry);
        replaced
    }

    /// Remove the oldest entry if the buffer is over its cap
    pub fn evict_overflow(&mut self) -> Option<LogEntry> {
        match self.cap {
            Some(cap) if self.entries.len() > cap => self.entries.pop_front(),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&LogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut LogEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut LogEntry> {
        self.entries.iter_mut()
    }

    /// Raw text of every entry, oldest first
    pub fn raw_lines(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.raw.as_str()).collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Theme
// ─────────────────────────────────────────────────────────────────────────────

/// Colour theme of the page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Value stored under the `theme` key and written to `data-theme`
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(Error::storage(format!("unknown theme '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(buffer: &mut DisplayBuffer, text: &str) -> LogEntry {
        let id = buffer.next_id();
        LogEntry::new(id, text, text, text, None)
    }

    fn push(buffer: &mut DisplayBuffer, text: &str) {
        let e = entry(buffer, text);
        buffer.push(e);
        buffer.evict_overflow();
    }

    #[test]
    fn test_buffer_unbounded_by_default() {
        let mut buffer = DisplayBuffer::new();
        for i in 0..1000 {
            push(&mut buffer, &i.to_string());
        }
        assert_eq!(buffer.cap(), None);
        assert_eq!(buffer.len(), 1000);
    }

    #[test]
    fn test_buffer_cap_evicts_oldest_first() {
        let mut buffer = DisplayBuffer::with_cap(3);
        for text in ["a", "b", "c", "d"] {
            push(&mut buffer, text);
        }
        assert_eq!(buffer.raw_lines(), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_buffer_evicts_one_entry_per_call() {
        let mut buffer = DisplayBuffer::new();
        for text in ["a", "b", "c", "d"] {
            push(&mut buffer, text);
        }
        buffer.set_cap(Some(2));
        assert_eq!(buffer.evict_overflow().map(|e| e.raw), Some("a".to_string()));
        assert_eq!(buffer.len(), 3);
        assert!(buffer.evict_overflow().is_some());
        assert!(buffer.evict_overflow().is_none());
        assert_eq!(buffer.raw_lines(), vec!["c", "d"]);
    }

    #[test]
    fn test_replace_last_swaps_tail() {
        let mut buffer = DisplayBuffer::new();
        push(&mut buffer, "a");
        push(&mut buffer, "SKIPPED: 1");
        let replacement = entry(&mut buffer, "SKIPPED: 2");
        let old = buffer.replace_last(replacement).unwrap();
        assert_eq!(old.raw, "SKIPPED: 1");
        assert_eq!(buffer.raw_lines(), vec!["a", "SKIPPED: 2"]);
    }

    #[test]
    fn test_replace_last_on_empty_appends() {
        let mut buffer = DisplayBuffer::new();
        let e = entry(&mut buffer, "x");
        assert!(buffer.replace_last(e).is_none());
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let mut buffer = DisplayBuffer::new();
        let a = buffer.next_id();
        let b = buffer.next_id();
        assert!(b > a);
    }

    #[test]
    fn test_toggle_selected_updates_classes() {
        let mut buffer = DisplayBuffer::new();
        let mut e = entry(&mut buffer, "x");
        assert_eq!(e.container_classes(), vec!["line"]);
        e.line_class = Some("warn".to_string());
        assert_eq!(e.container_classes(), vec!["warn"]);
        assert!(e.toggle_selected());
        assert_eq!(e.container_classes(), vec!["warn", "line-selected"]);
        assert!(!e.toggle_selected());
    }

    #[test]
    fn test_theme_round_trip_and_toggle() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert!("null".parse::<Theme>().is_err());
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.to_string(), "dark");
    }
}
