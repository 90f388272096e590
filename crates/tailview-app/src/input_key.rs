//! Abstract input key event, independent of the host toolkit.
//!
//! The filter box reports every key release together with the box's
//! current value. Frontends convert their native key events (DOM
//! `KeyboardEvent.key`, terminal key codes) into [`InputKey`] at the
//! boundary so that the handlers never see toolkit types.

/// Abstract input key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKey {
    /// Regular character key (a-z, 0-9, symbols)
    Char(char),
    /// Enter/Return key
    Enter,
    /// Escape key
    Esc,
    /// Backspace key
    Backspace,
    /// Delete key
    Delete,
    /// Any other key (arrows, modifiers, function keys)
    Other,
}

impl InputKey {
    /// Convert a DOM `KeyboardEvent.key` value
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => InputKey::Esc,
            "Enter" => InputKey::Enter,
            "Backspace" => InputKey::Backspace,
            "Delete" => InputKey::Delete,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => InputKey::Char(c),
                    _ => InputKey::Other,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dom_key_named_keys() {
        assert_eq!(InputKey::from_dom_key("Escape"), InputKey::Esc);
        assert_eq!(InputKey::from_dom_key("Esc"), InputKey::Esc);
        assert_eq!(InputKey::from_dom_key("Enter"), InputKey::Enter);
        assert_eq!(InputKey::from_dom_key("Backspace"), InputKey::Backspace);
    }

    #[test]
    fn test_from_dom_key_characters() {
        assert_eq!(InputKey::from_dom_key("a"), InputKey::Char('a'));
        assert_eq!(InputKey::from_dom_key("é"), InputKey::Char('é'));
        assert_eq!(InputKey::from_dom_key("ArrowUp"), InputKey::Other);
        assert_eq!(InputKey::from_dom_key(""), InputKey::Other);
    }
}
