//! Filter box key handling

use super::UpdateResult;
use crate::input_key::InputKey;
use crate::message::Message;

/// A key was released in the filter box.
///
/// Escape clears the filter; any other key takes the box's value as the new
/// filter.
pub fn handle_filter_key(key: InputKey, value: String) -> UpdateResult {
    match key {
        InputKey::Esc => UpdateResult::message(Message::ClearFilter),
        _ => UpdateResult::message(Message::FilterTyped(value)),
    }
}
