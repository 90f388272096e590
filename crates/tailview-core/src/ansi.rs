//! ANSI escape code and HTML escaping utilities
//!
//! Default text formatter for inbound log lines. Lines arrive with terminal
//! SGR colouring; before highlighting they are HTML-escaped and every SGR run
//! is turned into an inline-styled `<span>`. Any other escape sequence
//! (cursor movement, OSC titles, hyperlinks) is dropped.

use regex::{Captures, Regex};
use std::fmt::Write;
use std::sync::LazyLock;

/// Regex pattern for ANSI escape sequences.
///
/// Covers:
/// - CSI sequences: ESC [ ... letter (colors, cursor, etc.)
/// - OSC sequences: ESC ] ... BEL or ST (hyperlinks, titles)
/// - Simple escapes: ESC letter
static ANSI_ESCAPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        \x1b\[(?P<params>[0-9;?]*)(?P<cmd>[A-Za-z])   # CSI sequences
        | \x1b\][^\x07\x1b]*(?:\x07|\x1b\\)          # OSC sequences
        | \x1b[A-Za-z]                               # Simple escapes
        ",
    )
    .expect("ANSI regex pattern is valid")
});

/// Regex pattern for markup tags produced by the formatter and highlighter.
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Tag regex pattern is valid"));

/// Standard and bright palette entries 0-15.
const BASE_PALETTE: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (187, 0, 0),
    (0, 187, 0),
    (187, 187, 0),
    (0, 0, 187),
    (187, 0, 187),
    (0, 187, 187),
    (255, 255, 255),
    (85, 85, 85),
    (255, 85, 85),
    (0, 255, 0),
    (255, 255, 85),
    (85, 85, 255),
    (255, 85, 255),
    (85, 255, 255),
    (255, 255, 255),
];

/// Channel levels of the 6x6x6 colour cube (palette entries 16-231).
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// Escape the characters that would otherwise be interpreted as markup.
///
/// # Examples
///
/// ```
/// use tailview_core::ansi::escape_for_html;
///
/// assert_eq!(escape_for_html("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
/// ```
pub fn escape_for_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Convert SGR escape sequences into inline-styled spans.
///
/// The input is expected to be HTML-escaped already; text between escapes is
/// copied verbatim.
///
/// # Examples
///
/// ```
/// use tailview_core::ansi::ansi_to_html;
///
/// assert_eq!(
///     ansi_to_html("\x1b[31mred\x1b[0m plain"),
///     "<span style=\"color:rgb(187,0,0)\">red</span> plain"
/// );
/// ```
pub fn ansi_to_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut style = SgrStyle::default();
    let mut span_open = false;
    let mut last = 0;

    for caps in ANSI_ESCAPE_PATTERN.captures_iter(input) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&input[last..whole.start()]);
        last = whole.end();

        if !is_sgr(&caps) {
            continue;
        }

        let params = caps.name("params").map_or("", |m| m.as_str());
        let next = style.apply(params);
        if next == style {
            continue;
        }
        style = next;

        if span_open {
            out.push_str("</span>");
            span_open = false;
        }
        if let Some(css) = style.css() {
            let _ = write!(out, "<span style=\"{}\">", css);
            span_open = true;
        }
    }

    out.push_str(&input[last..]);
    if span_open {
        out.push_str("</span>");
    }
    out
}

fn is_sgr(caps: &Captures<'_>) -> bool {
    caps.name("cmd").is_some_and(|m| m.as_str() == "m")
}

/// Text content of rendered markup: tags removed, entities decoded.
///
/// This is what a browser reports as `textContent` for a rendered line and
/// is what the filter is tested against.
pub fn strip_markup(markup: &str) -> String {
    TAG_PATTERN
        .replace_all(markup, "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

// ─────────────────────────────────────────────────────────────────────────────
// SGR state
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rgb(u8, u8, u8);

impl Rgb {
    fn palette(index: u8) -> Self {
        match index {
            0..=15 => {
                let (r, g, b) = BASE_PALETTE[index as usize];
                Rgb(r, g, b)
            }
            16..=231 => {
                let i = index - 16;
                Rgb(
                    CUBE_LEVELS[(i / 36) as usize],
                    CUBE_LEVELS[((i / 6) % 6) as usize],
                    CUBE_LEVELS[(i % 6) as usize],
                )
            }
            _ => {
                let level = 8 + (index - 232) * 10;
                Rgb(level, level, level)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SgrStyle {
    bold: bool,
    faint: bool,
    italic: bool,
    underline: bool,
    fg: Option<Rgb>,
    bg: Option<Rgb>,
}

impl SgrStyle {
    /// Apply an SGR parameter list (`"1;31"`) and return the resulting style.
    fn apply(mut self, params: &str) -> Self {
        let codes: Vec<u16> = params
            .split(';')
            .map(|p| p.parse::<u16>().unwrap_or(0))
            .collect();

        let mut i = 0;
        while i < codes.len() {
            match codes[i] {
                0 => self = SgrStyle::default(),
                1 => self.bold = true,
                2 => self.faint = true,
                3 => self.italic = true,
                4 => self.underline = true,
                22 => {
                    self.bold = false;
                    self.faint = false;
                }
                23 => self.italic = false,
                24 => self.underline = false,
                c @ 30..=37 => self.fg = Some(Rgb::palette((c - 30) as u8)),
                39 => self.fg = None,
                c @ 40..=47 => self.bg = Some(Rgb::palette((c - 40) as u8)),
                49 => self.bg = None,
                c @ 90..=97 => self.fg = Some(Rgb::palette((c - 90 + 8) as u8)),
                c @ 100..=107 => self.bg = Some(Rgb::palette((c - 100 + 8) as u8)),
                c @ (38 | 48) => {
                    let (color, consumed) = extended_color(&codes[i + 1..]);
                    if let Some(color) = color {
                        if c == 38 {
                            self.fg = Some(color);
                        } else {
                            self.bg = Some(color);
                        }
                    }
                    i += consumed;
                }
                _ => {}
            }
            i += 1;
        }
        self
    }

    fn css(&self) -> Option<String> {
        let mut parts = Vec::new();
        if self.bold {
            parts.push("font-weight:bold".to_string());
        }
        if self.faint {
            parts.push("opacity:0.7".to_string());
        }
        if self.italic {
            parts.push("font-style:italic".to_string());
        }
        if self.underline {
            parts.push("text-decoration:underline".to_string());
        }
        if let Some(Rgb(r, g, b)) = self.fg {
            parts.push(format!("color:rgb({},{},{})", r, g, b));
        }
        if let Some(Rgb(r, g, b)) = self.bg {
            parts.push(format!("background-color:rgb({},{},{})", r, g, b));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(";"))
        }
    }
}

/// Parse the tail of a `38;...` / `48;...` sequence.
///
/// Returns the colour (if well-formed) and how many parameters were consumed.
fn extended_color(rest: &[u16]) -> (Option<Rgb>, usize) {
    match rest {
        [5, n, ..] => (Some(Rgb::palette((*n).min(255) as u8)), 2),
        [2, r, g, b, ..] => (
            Some(Rgb(
                (*r).min(255) as u8,
                (*g).min(255) as u8,
                (*b).min(255) as u8,
            )),
            4,
        ),
        [5] | [2, ..] => (None, rest.len()),
        _ => (None, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_for_html() {
        assert_eq!(
            escape_for_html("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
        assert_eq!(escape_for_html("plain"), "plain");
    }

    #[test]
    fn test_ansi_to_html_plain_text_unchanged() {
        assert_eq!(ansi_to_html("no colour here"), "no colour here");
    }

    #[test]
    fn test_ansi_to_html_simple_color() {
        assert_eq!(
            ansi_to_html("\x1b[32mok\x1b[0m"),
            "<span style=\"color:rgb(0,187,0)\">ok</span>"
        );
    }

    #[test]
    fn test_ansi_to_html_bold_and_color_combined() {
        assert_eq!(
            ansi_to_html("\x1b[1;31mfail\x1b[0m"),
            "<span style=\"font-weight:bold;color:rgb(187,0,0)\">fail</span>"
        );
    }

    #[test]
    fn test_ansi_to_html_style_change_closes_previous_span() {
        assert_eq!(
            ansi_to_html("\x1b[31ma\x1b[34mb\x1b[0mc"),
            "<span style=\"color:rgb(187,0,0)\">a</span><span style=\"color:rgb(0,0,187)\">b</span>c"
        );
    }

    #[test]
    fn test_ansi_to_html_unterminated_span_is_closed() {
        assert_eq!(
            ansi_to_html("\x1b[4munder"),
            "<span style=\"text-decoration:underline\">under</span>"
        );
    }

    #[test]
    fn test_ansi_to_html_256_color() {
        assert_eq!(
            ansi_to_html("\x1b[38;5;196mx\x1b[0m"),
            "<span style=\"color:rgb(255,0,0)\">x</span>"
        );
        assert_eq!(
            ansi_to_html("\x1b[48;5;244mx\x1b[0m"),
            "<span style=\"background-color:rgb(128,128,128)\">x</span>"
        );
    }

    #[test]
    fn test_ansi_to_html_truecolor() {
        assert_eq!(
            ansi_to_html("\x1b[38;2;255;100;50mx\x1b[m"),
            "<span style=\"color:rgb(255,100,50)\">x</span>"
        );
    }

    #[test]
    fn test_ansi_to_html_bright_colors() {
        assert_eq!(
            ansi_to_html("\x1b[91mx\x1b[0m"),
            "<span style=\"color:rgb(255,85,85)\">x</span>"
        );
    }

    #[test]
    fn test_ansi_to_html_drops_non_sgr_sequences() {
        assert_eq!(ansi_to_html("\x1b[2Kcleared\x1b]0;title\x07"), "cleared");
    }

    #[test]
    fn test_ansi_to_html_reset_without_open_span_emits_nothing() {
        assert_eq!(ansi_to_html("\x1b[0mplain"), "plain");
    }

    #[test]
    fn test_strip_markup_restores_text_content() {
        let markup = "<span style=\"color:red\">a &lt;b&gt;</span> &amp; c";
        assert_eq!(strip_markup(markup), "a <b> & c");
    }

    #[test]
    fn test_escape_then_convert_keeps_escaping() {
        let html = ansi_to_html(&escape_for_html("\x1b[31m<err>\x1b[0m"));
        assert_eq!(html, "<span style=\"color:rgb(187,0,0)\">&lt;err&gt;</span>");
    }
}
