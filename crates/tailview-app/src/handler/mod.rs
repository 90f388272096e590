//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `render`: Line rendering into the display buffer
//! - `filter`: Filter changes and re-application
//! - `session`: Pause, theme, focus and page initialisation
//! - `options`: Server-pushed `options:*` events
//! - `keys`: Filter box key handling

pub(crate) mod filter;
pub(crate) mod keys;
pub(crate) mod options;
pub(crate) mod render;
pub(crate) mod session;
pub(crate) mod update;


use std::time::Duration;

use tailview_core::Theme;
use url::Url;

use crate::message::Message;
use crate::surface::SurfaceOp;

// Re-export main entry point
pub use update::update;

/// Actions that the engine should perform after update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// Mutate the rendering surface
    Surface(SurfaceOp),

    /// Write a new address into the address bar (no navigation)
    ReplaceUrl(Url),

    /// Redraw the favicon badge
    SetBadge(u32),

    /// Persist the theme in client-local storage
    PersistTheme(Theme),

    /// Deliver `message` after `delay`
    Schedule { delay: Duration, message: Message },

    /// Report a rejected input to subscribers
    ReportError(String),
}

impl From<SurfaceOp> for UpdateAction {
    fn from(op: SurfaceOp) -> Self {
        UpdateAction::Surface(op)
    }
}

/// Result of processing a message
///
/// A single message can patch the surface in several places, so actions
/// are an ordered list applied as one batch.
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Actions for the engine to perform, in order
    pub actions: Vec<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            actions: Vec::new(),
        }
    }

    pub fn action(action: impl Into<UpdateAction>) -> Self {
        Self {
            message: None,
            actions: vec![action.into()],
        }
    }

    pub fn actions(actions: Vec<UpdateAction>) -> Self {
        Self {
            message: None,
            actions,
        }
    }
}
