//! Page address and its `filter` query parameter

use std::fmt;

use tailview_core::prelude::*;
use url::Url;

/// Query parameter mirroring the active filter
pub const FILTER_PARAM: &str = "filter";

/// The page URL as shown in the address bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    url: Url,
}

impl Location {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn parse(href: &str) -> Result<Self> {
        Url::parse(href)
            .map(Self::new)
            .map_err(|e| Error::url(format!("'{}': {}", href, e)))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// First value of the `filter` parameter, if present
    pub fn filter(&self) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == FILTER_PARAM)
            .map(|(_, v)| v.into_owned())
    }

    /// Write `value` into the `filter` parameter.
    ///
    /// An empty value removes every `filter` parameter. Otherwise the first
    /// occurrence takes the new value and any later duplicates are dropped.
    /// Other parameters keep their order. Returns whether the URL changed.
    pub fn set_filter(&mut self, value: &str) -> bool {
        let mut pairs: Vec<(String, String)> = self
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let mut seen = false;
        pairs.retain_mut(|(k, v)| {
            if k != FILTER_PARAM {
                return true;
            }
            if value.is_empty() || seen {
                return false;
            }
            seen = true;
            *v = value.to_string();
            true
        });
        if !value.is_empty() && !seen {
            pairs.push((FILTER_PARAM.to_string(), value.to_string()));
        }

        let before = self.url.clone();
        if pairs.is_empty() {
            self.url.set_query(None);
        } else {
            self.url
                .query_pairs_mut()
                .clear()
                .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        self.url != before
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(href: &str) -> Location {
        Location::parse(href).unwrap()
    }

    #[test]
    fn test_filter_read() {
        assert_eq!(loc("http://h/?filter=err").filter().as_deref(), Some("err"));
        assert_eq!(loc("http://h/?filter=a%20b").filter().as_deref(), Some("a b"));
        assert_eq!(loc("http://h/").filter(), None);
        assert_eq!(loc("http://h/?filter=").filter().as_deref(), Some(""));
    }

    #[test]
    fn test_set_filter_adds_param() {
        let mut l = loc("http://h/");
        assert!(l.set_filter("err"));
        assert_eq!(l.as_str(), "http://h/?filter=err");
    }

    #[test]
    fn test_set_filter_replaces_in_place() {
        let mut l = loc("http://h/?a=1&filter=x&b=2&filter=y");
        l.set_filter("z");
        assert_eq!(l.as_str(), "http://h/?a=1&filter=z&b=2");
    }

    #[test]
    fn test_empty_filter_removes_param() {
        let mut l = loc("http://h/?filter=x&a=1");
        l.set_filter("");
        assert_eq!(l.as_str(), "http://h/?a=1");

        let mut l = loc("http://h/path?filter=x#frag");
        l.set_filter("");
        assert_eq!(l.as_str(), "http://h/path#frag");
        assert_eq!(l.filter(), None);
    }

    #[test]
    fn test_set_filter_roundtrips_special_characters() {
        let mut l = loc("http://h/");
        l.set_filter("a&b=c d");
        assert_eq!(l.filter().as_deref(), Some("a&b=c d"));
    }

    #[test]
    fn test_unchanged_filter_reports_no_change() {
        let mut l = loc("http://h/?filter=x");
        assert!(!l.set_filter("x"));
        let mut l = loc("http://h/");
        assert!(!l.set_filter(""));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(Location::parse("not a url"), Err(Error::Url(_))));
    }
}
