//! Collaborators outside the document: address bar, favicon badge and
//! client-local storage.

use std::time::Duration;

use tailview_core::prelude::*;
use tailview_core::Theme;
use url::Url;

use crate::message::Message;

/// Page-level services the engine reaches through narrow calls
pub trait Host {
    /// Replace the current history entry's URL without navigating
    fn replace_url(&mut self, url: &Url) -> Result<()>;

    /// Draw `count` on the favicon badge (0 clears it)
    fn set_badge(&mut self, count: u32) -> Result<()>;

    /// Theme persisted by an earlier session, if any
    fn load_theme(&self) -> Result<Option<Theme>>;

    fn store_theme(&mut self, theme: Theme) -> Result<()>;

    /// Deliver `message` back to the engine once `delay` has elapsed
    fn schedule(&mut self, delay: Duration, message: Message) -> Result<()>;
}

/// Host that records every call, for tests and the headless driver
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    /// URLs passed to `replace_url`, oldest first
    pub history: Vec<Url>,
    pub badge: u32,
    pub badge_updates: usize,
    pub stored_theme: Option<Theme>,
    /// Timers requested through `schedule`, not yet delivered
    pub scheduled: Vec<(Duration, Message)>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(theme: Theme) -> Self {
        Self {
            stored_theme: Some(theme),
            ..Self::default()
        }
    }

    pub fn current_url(&self) -> Option<&Url> {
        self.history.last()
    }

    /// Take every pending timer message, as if all of them had fired
    pub fn fire_timers(&mut self) -> Vec<Message> {
        self.scheduled.drain(..).map(|(_, m)| m).collect()
    }
}

impl Host for MemoryHost {
    fn replace_url(&mut self, url: &Url) -> Result<()> {
        self.history.push(url.clone());
        Ok(())
    }

    fn set_badge(&mut self, count: u32) -> Result<()> {
        self.badge = count;
        self.badge_updates += 1;
        Ok(())
    }

    fn load_theme(&self) -> Result<Option<Theme>> {
        Ok(self.stored_theme)
    }

    fn store_theme(&mut self, theme: Theme) -> Result<()> {
        self.stored_theme = Some(theme);
        Ok(())
    }

    fn schedule(&mut self, delay: Duration, message: Message) -> Result<()> {
        self.scheduled.push((delay, message));
        Ok(())
    }
}
