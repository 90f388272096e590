//! Text-formatting collaborator invoked before highlighting

use std::fmt::Debug;

use tailview_core::{ansi_to_html, escape_for_html};

/// Turns a raw line into safe markup
pub trait TextFormatter: Debug + Send {
    fn to_html(&self, raw: &str) -> String;
}

/// HTML-escapes the line, then converts SGR escapes to styled spans
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiFormatter;

impl TextFormatter for AnsiFormatter {
    fn to_html(&self, raw: &str) -> String {
        ansi_to_html(&escape_for_html(raw))
    }
}
