//! Text filter state
//!
//! One active pattern, matched case-insensitively as a regular expression
//! against the text content of each rendered line.

use regex::{Regex, RegexBuilder};

/// The active line filter
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    /// The raw value as typed (mirrored to the input box and the URL)
    query: String,
    /// Compiled pattern (None if the query is empty or invalid)
    matcher: Option<Regex>,
    /// Error message if regex compilation failed
    error: Option<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter seeded with an initial query
    pub fn with_query(query: &str) -> Self {
        let mut state = Self::new();
        state.set_query(query);
        state
    }

    /// Set the query and compile it.
    ///
    /// An invalid pattern is still recorded as the query, but leaves no
    /// matcher behind, so every line matches until it is corrected.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();

        if query.is_empty() {
            self.matcher = None;
            self.error = None;
            return;
        }

        match RegexBuilder::new(query).case_insensitive(true).build() {
            Ok(regex) => {
                self.matcher = Some(regex);
                self.error = None;
            }
            Err(e) => {
                self.matcher = None;
                self.error = Some(e.to_string());
            }
        }
    }

    /// Reset to the empty filter
    pub fn clear(&mut self) {
        self.query.clear();
        self.matcher = None;
        self.error = None;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether a valid, non-empty pattern is hiding lines
    pub fn is_active(&self) -> bool {
        self.matcher.is_some()
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Check if a line's text content passes the filter
    pub fn matches(&self, text: &str) -> bool {
        self.matcher.as_ref().map_or(true, |re| re.is_match(text))
    }
}
