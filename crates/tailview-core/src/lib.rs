//! # tailview-core - Core Domain Types
//!
//! Foundation crate for tailview. Provides domain types, error handling,
//! inbound event decoding, text formatting, highlighting and filtering.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, regex, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`LogEntry`] - One rendered line with markup, class, selection and visibility
//! - [`DisplayBuffer`] - Insertion-ordered, optionally capped collection of entries
//! - [`Theme`] - Light/dark page theme
//!
//! ### Filtering and Highlighting
//! - [`FilterState`] - The active case-insensitive regex filter
//! - [`HighlightConfig`], [`HighlightEngine`] - Server-supplied decoration rules
//!
//! ### Events (`events`)
//! - [`InboundEvent`] - Typed `options:*` and `line` events
//! - [`EventFrame`] - Raw `["name", payload]` frame
//!
//! ### Text Formatting (`ansi`)
//! - [`escape_for_html()`], [`ansi_to_html()`], [`strip_markup()`]
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use tailview_core::prelude::*;
//! ```

pub mod ansi;
pub mod error;
pub mod events;
pub mod filter;
pub mod highlight;
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;
pub mod types;

/// Prelude for common imports used throughout all tailview crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use ansi::{ansi_to_html, escape_for_html, strip_markup};
pub use error::{Error, Result, ResultExt};
pub use events::{EventFrame, InboundEvent};
pub use filter::FilterState;
pub use highlight::{HighlightConfig, HighlightEngine, Highlighted, RuleTable};
pub use types::{DisplayBuffer, EntryId, LogEntry, Theme};
