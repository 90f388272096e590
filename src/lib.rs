//! tailview Library
//!
//! Headless driver for the tailview engine: reads log lines or event frames
//! and reports what the page would render as NDJSON.

pub mod headless;

// Re-export main entry points
pub use headless::runner::{run_headless, HeadlessOptions};
pub use headless::HeadlessEvent;
