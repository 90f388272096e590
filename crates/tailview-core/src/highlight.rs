//! Highlight rules and the engine that applies them to rendered lines
//!
//! A [`HighlightConfig`] arrives from the server once per connection as a JSON
//! object with four rule tables. Rule order is significant (later rules see
//! the output of earlier ones), so every table keeps the key order of the
//! received object.
//!
//! ```json
//! {
//!   "words": { "ERROR": "color: red;" },
//!   "lines": { "WARN": "line-warn" },
//!   "wordsRegExClass": { "\\d+ms": "timing" },
//!   "wordsRegExMatchClass": { "user=(\\w+)": "user" }
//! }
//! ```

use std::fmt;

use regex::Regex;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

// ─────────────────────────────────────────────────────────────────────────────
// RuleTable
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered `key → value` rule table.
///
/// Deserialized from a JSON object, preserving the order in which keys
/// appear in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable(Vec<(String, String)>);

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule (builder style, used by tests and presets)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((key.into(), value.into()));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for RuleTable {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RuleTableVisitor;

        impl<'de> Visitor<'de> for RuleTableVisitor {
            type Value = RuleTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping patterns to strings")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut rules = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, String>()? {
                    rules.push((key, value));
                }
                Ok(RuleTable(rules))
            }
        }

        deserializer.deserialize_map(RuleTableVisitor)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HighlightConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Server-supplied decoration rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightConfig {
    /// Literal word → inline CSS style
    #[serde(default)]
    pub words: RuleTable,
    /// Literal substring → container class
    #[serde(default)]
    pub lines: RuleTable,
    /// Regex → class wrapped around every match
    #[serde(default, rename = "wordsRegExClass")]
    pub words_regex_class: RuleTable,
    /// Regex with a capture group → class wrapped around the first capture
    #[serde(default, rename = "wordsRegExMatchClass")]
    pub words_regex_match_class: RuleTable,
}

impl HighlightConfig {
    /// Parse a config from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn rule_count(&self) -> usize {
        self.words.len()
            + self.lines.len()
            + self.words_regex_class.len()
            + self.words_regex_match_class.len()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HighlightEngine
// ─────────────────────────────────────────────────────────────────────────────

/// Result of highlighting one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted {
    /// Decorated markup for the inner text element
    pub markup: String,
    /// Class for the line container, if a line rule matched
    pub line_class: Option<String>,
}

/// Compiled form of a [`HighlightConfig`]
///
/// Regexes are compiled once when the config is received. Applying the
/// engine never fails and never mutates it.
#[derive(Debug, Clone, Default)]
pub struct HighlightEngine {
    words: Vec<(String, String)>,
    lines: Vec<(String, String)>,
    regex_class: Vec<(Regex, String)>,
    regex_match_class: Vec<(Regex, String)>,
}

impl HighlightEngine {
    /// Compile a config.
    ///
    /// Fails with [`Error::InvalidPattern`] if any regex rule does not
    /// compile, or if a match-class rule has no capturing group.
    pub fn new(config: &HighlightConfig) -> Result<Self> {
        let regex_class = config
            .words_regex_class
            .iter()
            .map(|(pattern, class)| Ok((compile(pattern)?, class.to_string())))
            .collect::<Result<Vec<_>>>()?;

        let regex_match_class = config
            .words_regex_match_class
            .iter()
            .map(|(pattern, class)| {
                let regex = compile(pattern)?;
                if regex.captures_len() < 2 {
                    return Err(Error::invalid_pattern(
                        pattern,
                        "match-class rule needs a capturing group",
                    ));
                }
                Ok((regex, class.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            words: owned(&config.words),
            lines: owned(&config.lines),
            regex_class,
            regex_match_class,
        })
    }

    /// True when no rules are configured
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
            && self.lines.is_empty()
            && self.regex_class.is_empty()
            && self.regex_match_class.is_empty()
    }

    /// Decorate a line and compute its container class
    pub fn highlight(&self, line: &str) -> Highlighted {
        Highlighted {
            markup: self.highlight_words(line),
            line_class: self.line_class(line).map(str::to_string),
        }
    }

    /// Apply word, regex-class and regex-match-class rules, in that order.
    ///
    /// Word rules do not protect earlier spans: a later word that occurs
    /// inside an earlier replacement (including its `style` attribute) is
    /// wrapped again.
    pub fn highlight_words(&self, line: &str) -> String {
        let mut output = line.to_string();

        for (word, style) in &self.words {
            let wrapped = format!("<span style=\"{}\">{}</span>", style, word);
            output = output.replace(word.as_str(), &wrapped);
        }

        for (regex, class) in &self.regex_class {
            output = regex
                .replace_all(&output, |caps: &regex::Captures<'_>| {
                    format!("<span class=\"{}\">{}</span>", class, &caps[0])
                })
                .into_owned();
        }

        for (regex, class) in &self.regex_match_class {
            let captured = regex
                .captures(&output)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string());
            if let Some(text) = captured.filter(|t| !t.is_empty()) {
                let wrapped = format!("<span class=\"{}\">{}</span>", class, text);
                output = output.replacen(&text, &wrapped, 1);
            }
        }

        output
    }

    /// Container class for a line: the last matching line rule wins
    pub fn line_class(&self, line: &str) -> Option<&str> {
        self.lines
            .iter()
            .rev()
            .find(|(needle, _)| line.contains(needle.as_str()))
            .map(|(_, class)| class.as_str())
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::invalid_pattern(pattern, e.to_string()))
}

fn owned(table: &RuleTable) -> Vec<(String, String)> {
    table
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(config: HighlightConfig) -> HighlightEngine {
        HighlightEngine::new(&config).unwrap()
    }

    #[test]
    fn test_config_preserves_key_order() {
        let config = HighlightConfig::from_json(
            r#"{"words": {"zeta": "a", "alpha": "b", "mid": "c"}}"#,
        )
        .unwrap();
        let keys: Vec<_> = config.words.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_config_missing_tables_default_to_empty() {
        let config = HighlightConfig::from_json(r#"{"lines": {"WARN": "warn"}}"#).unwrap();
        assert!(config.words.is_empty());
        assert!(config.words_regex_class.is_empty());
        assert_eq!(config.rule_count(), 1);
    }

    #[test]
    fn test_config_rejects_non_string_values() {
        assert!(HighlightConfig::from_json(r#"{"words": {"x": 1}}"#).is_err());
    }

    #[test]
    fn test_word_rule_wraps_every_occurrence() {
        let e = engine(HighlightConfig {
            words: RuleTable::new().with("ERR", "color: red"),
            ..Default::default()
        });
        assert_eq!(
            e.highlight_words("ERR one ERR two"),
            "<span style=\"color: red\">ERR</span> one <span style=\"color: red\">ERR</span> two"
        );
    }

    #[test]
    fn test_word_rules_can_rewrap_earlier_output() {
        // "red" appears inside the style written by the first rule
        let e = engine(HighlightConfig {
            words: RuleTable::new()
                .with("fail", "color:red")
                .with("red", "x"),
            ..Default::default()
        });
        assert_eq!(
            e.highlight_words("fail"),
            "<span style=\"color:<span style=\"x\">red</span>\">fail</span>"
        );
    }

    #[test]
    fn test_regex_class_wraps_all_matches() {
        let e = engine(HighlightConfig {
            words_regex_class: RuleTable::new().with(r"\d+ms", "timing"),
            ..Default::default()
        });
        assert_eq!(
            e.highlight_words("took 12ms then 7ms"),
            "took <span class=\"timing\">12ms</span> then <span class=\"timing\">7ms</span>"
        );
    }

    #[test]
    fn test_regex_class_does_not_expand_dollar_in_class() {
        let e = engine(HighlightConfig {
            words_regex_class: RuleTable::new().with("a", "$0"),
            ..Default::default()
        });
        assert_eq!(e.highlight_words("a"), "<span class=\"$0\">a</span>");
    }

    #[test]
    fn test_regex_match_class_wraps_first_capture_only() {
        let e = engine(HighlightConfig {
            words_regex_match_class: RuleTable::new().with(r"user=(\w+)", "user"),
            ..Default::default()
        });
        assert_eq!(
            e.highlight_words("user=bob user=bob"),
            "user=<span class=\"user\">bob</span> user=bob"
        );
    }

    #[test]
    fn test_regex_match_class_replaces_first_occurrence_of_captured_text() {
        // The captured text also occurs earlier in the line; the first
        // occurrence is the one wrapped.
        let e = engine(HighlightConfig {
            words_regex_match_class: RuleTable::new().with(r"id=(\d+)", "id"),
            ..Default::default()
        });
        assert_eq!(
            e.highlight_words("42 id=42"),
            "<span class=\"id\">42</span> id=42"
        );
    }

    #[test]
    fn test_regex_match_class_no_match_leaves_line() {
        let e = engine(HighlightConfig {
            words_regex_match_class: RuleTable::new().with(r"user=(\w+)", "user"),
            ..Default::default()
        });
        assert_eq!(e.highlight_words("nothing here"), "nothing here");
    }

    #[test]
    fn test_regex_match_class_requires_group() {
        let config = HighlightConfig {
            words_regex_match_class: RuleTable::new().with(r"\w+", "word"),
            ..Default::default()
        };
        let err = HighlightEngine::new(&config).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let config = HighlightConfig {
            words_regex_class: RuleTable::new().with("(unclosed", "x"),
            ..Default::default()
        };
        let err = HighlightEngine::new(&config).unwrap_err();
        assert!(err.to_string().contains("(unclosed"));
    }

    #[test]
    fn test_line_class_last_match_wins() {
        let e = engine(HighlightConfig {
            lines: RuleTable::new()
                .with("WARN", "warn")
                .with("db", "database")
                .with("nope", "never"),
            ..Default::default()
        });
        assert_eq!(e.line_class("WARN db slow"), Some("database"));
        assert_eq!(e.line_class("WARN cache"), Some("warn"));
        assert_eq!(e.line_class("INFO"), None);
    }

    #[test]
    fn test_rules_apply_in_table_order() {
        let e = engine(HighlightConfig {
            words: RuleTable::new().with("took", "b"),
            words_regex_class: RuleTable::new().with(r"\d+ms", "timing"),
            ..Default::default()
        });
        assert_eq!(
            e.highlight_words("took 5ms"),
            "<span style=\"b\">took</span> <span class=\"timing\">5ms</span>"
        );
    }

    #[test]
    fn test_highlight_combines_markup_and_class() {
        let e = engine(HighlightConfig {
            words: RuleTable::new().with("boom", "c"),
            lines: RuleTable::new().with("boom", "explode"),
            ..Default::default()
        });
        let out = e.highlight("boom");
        assert_eq!(out.markup, "<span style=\"c\">boom</span>");
        assert_eq!(out.line_class.as_deref(), Some("explode"));
    }

    #[test]
    fn test_empty_engine_is_identity() {
        let e = HighlightEngine::default();
        assert!(e.is_empty());
        assert_eq!(e.highlight_words("a <b>"), "a <b>");
        assert_eq!(e.line_class("anything"), None);
    }
}
