//! Rendering surface abstraction
//!
//! Handlers never touch the document directly. They emit [`SurfaceOp`]s,
//! which the engine applies to a [`RenderSurface`]: the browser DOM in the
//! web frontend, or [`MemorySurface`] in tests and the headless driver.

use std::collections::HashMap;

use tailview_core::prelude::*;
use tailview_core::{EntryId, LogEntry};

/// Page elements the handlers can address besides the log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// `<html>` (theme attribute and transition class)
    Root,
    /// `<body>`
    Body,
    Topbar,
    /// The log container holding one element per line
    LogContainer,
    PauseButton,
    ThemeButton,
}

/// Everything a surface needs to build one line container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineView {
    pub id: EntryId,
    /// Markup for the inner `inner-line` element
    pub markup: String,
    /// Text content (for surfaces that cannot render markup)
    pub text: String,
    /// Classes of the container (`line` or the matching rule class first)
    pub classes: Vec<String>,
    pub visible: bool,
}

impl From<&LogEntry> for LineView {
    fn from(entry: &LogEntry) -> Self {
        Self {
            id: entry.id,
            markup: entry.markup.clone(),
            text: entry.text.clone(),
            classes: entry
                .container_classes()
                .into_iter()
                .map(str::to_string)
                .collect(),
            visible: entry.visible,
        }
    }
}

/// One document mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOp {
    AppendLine(LineView),
    /// Replace the last line container
    ReplaceLastLine(LineView),
    /// Remove the first (oldest) line container
    EvictLine(EntryId),
    SetLineVisible { id: EntryId, visible: bool },
    SetLineSelected { id: EntryId, selected: bool },
    /// Scroll to the bottom if the viewport was there before this batch
    FollowTail,
    ScrollToBottom,
    SetRootAttribute { name: String, value: String },
    AddClass { target: Target, class: String },
    RemoveClass { target: Target, class: String },
    /// Replace the whole class attribute
    SetClass { target: Target, class: String },
    SetFilterInput(String),
    FocusFilterInput,
}

impl SurfaceOp {
    pub fn add_class(target: Target, class: &str) -> Self {
        SurfaceOp::AddClass {
            target,
            class: class.to_string(),
        }
    }

    pub fn remove_class(target: Target, class: &str) -> Self {
        SurfaceOp::RemoveClass {
            target,
            class: class.to_string(),
        }
    }
}

/// The document the engine renders into
pub trait RenderSurface {
    /// Whether the viewport currently shows the end of the document
    fn is_scrolled_to_bottom(&self) -> bool;

    fn append_line(&mut self, line: &LineView) -> Result<()>;
    fn replace_last_line(&mut self, line: &LineView) -> Result<()>;
    fn remove_first_line(&mut self) -> Result<()>;
    fn set_line_visible(&mut self, id: EntryId, visible: bool) -> Result<()>;
    fn set_line_selected(&mut self, id: EntryId, selected: bool) -> Result<()>;
    fn scroll_to_bottom(&mut self) -> Result<()>;

    fn set_root_attribute(&mut self, name: &str, value: &str) -> Result<()>;
    fn add_class(&mut self, target: Target, class: &str) -> Result<()>;
    fn remove_class(&mut self, target: Target, class: &str) -> Result<()>;
    fn set_class(&mut self, target: Target, class: &str) -> Result<()>;

    fn set_filter_input(&mut self, value: &str) -> Result<()>;
    fn focus_filter_input(&mut self) -> Result<()>;
}

// ─────────────────────────────────────────────────────────────────────────────
// MemorySurface
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory document used by tests and the headless driver
#[derive(Debug, Clone)]
pub struct MemorySurface {
    pub lines: Vec<LineView>,
    /// Reported by [`RenderSurface::is_scrolled_to_bottom`]
    pub at_bottom: bool,
    /// Number of scroll-to-bottom operations performed
    pub scrolls: usize,
    pub root_attributes: HashMap<String, String>,
    pub classes: HashMap<Target, Vec<String>>,
    pub filter_input: String,
    pub filter_focused: bool,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            at_bottom: true,
            scrolls: 0,
            root_attributes: HashMap::new(),
            classes: HashMap::new(),
            filter_input: String::new(),
            filter_focused: false,
        }
    }

    pub fn line(&self, id: EntryId) -> Option<&LineView> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// Text of every line container, top to bottom
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }

    /// Text of the lines currently shown
    pub fn visible_texts(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| l.visible)
            .map(|l| l.text.as_str())
            .collect()
    }

    pub fn has_class(&self, target: Target, class: &str) -> bool {
        self.classes
            .get(&target)
            .is_some_and(|c| c.iter().any(|x| x == class))
    }

    fn line_mut(&mut self, id: EntryId) -> Result<&mut LineView> {
        self.lines
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| Error::surface(format!("no line with id {}", id)))
    }
}

impl RenderSurface for MemorySurface {
    fn is_scrolled_to_bottom(&self) -> bool {
        self.at_bottom
    }

    fn append_line(&mut self, line: &LineView) -> Result<()> {
        self.lines.push(line.clone());
        Ok(())
    }

    fn replace_last_line(&mut self, line: &LineView) -> Result<()> {
        match self.lines.last_mut() {
            Some(last) => *last = line.clone(),
            None => return Err(Error::surface("no line to replace")),
        }
        Ok(())
    }

    fn remove_first_line(&mut self) -> Result<()> {
        if self.lines.is_empty() {
            return Err(Error::surface("no line to remove"));
        }
        self.lines.remove(0);
        Ok(())
    }

    fn set_line_visible(&mut self, id: EntryId, visible: bool) -> Result<()> {
        self.line_mut(id)?.visible = visible;
        Ok(())
    }

    fn set_line_selected(&mut self, id: EntryId, selected: bool) -> Result<()> {
        let line = self.line_mut(id)?;
        line.classes.retain(|c| c != "line-selected");
        if selected {
            line.classes.push("line-selected".to_string());
        }
        Ok(())
    }

    fn scroll_to_bottom(&mut self) -> Result<()> {
        self.scrolls += 1;
        self.at_bottom = true;
        Ok(())
    }

    fn set_root_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        self.root_attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn add_class(&mut self, target: Target, class: &str) -> Result<()> {
        let classes = self.classes.entry(target).or_default();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
        Ok(())
    }

    fn remove_class(&mut self, target: Target, class: &str) -> Result<()> {
        if let Some(classes) = self.classes.get_mut(&target) {
            classes.retain(|c| c != class);
        }
        Ok(())
    }

    fn set_class(&mut self, target: Target, class: &str) -> Result<()> {
        self.classes.insert(
            target,
            class.split_whitespace().map(str::to_string).collect(),
        );
        Ok(())
    }

    fn set_filter_input(&mut self, value: &str) -> Result<()> {
        self.filter_input = value.to_string();
        Ok(())
    }

    fn focus_filter_input(&mut self) -> Result<()> {
        self.filter_focused = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(id: u64, text: &str) -> LineView {
        LineView {
            id: EntryId(id),
            markup: text.to_string(),
            text: text.to_string(),
            classes: vec!["line".to_string()],
            visible: true,
        }
    }

    #[test]
    fn test_memory_surface_line_ops() {
        let mut s = MemorySurface::new();
        s.append_line(&view(0, "a")).unwrap();
        s.append_line(&view(1, "b")).unwrap();
        s.replace_last_line(&view(2, "c")).unwrap();
        assert_eq!(s.texts(), vec!["a", "c"]);

        s.remove_first_line().unwrap();
        assert_eq!(s.texts(), vec!["c"]);

        s.set_line_visible(EntryId(2), false).unwrap();
        assert!(s.visible_texts().is_empty());
    }

    #[test]
    fn test_memory_surface_errors_on_missing_lines() {
        let mut s = MemorySurface::new();
        assert!(s.replace_last_line(&view(0, "a")).is_err());
        assert!(s.remove_first_line().is_err());
        assert!(s.set_line_visible(EntryId(9), true).is_err());
    }

    #[test]
    fn test_memory_surface_classes() {
        let mut s = MemorySurface::new();
        s.add_class(Target::PauseButton, "play").unwrap();
        s.add_class(Target::PauseButton, "play").unwrap();
        assert_eq!(s.classes[&Target::PauseButton], vec!["play"]);
        s.remove_class(Target::PauseButton, "play").unwrap();
        assert!(!s.has_class(Target::PauseButton, "play"));

        s.set_class(Target::Body, "no-topbar").unwrap();
        assert!(s.has_class(Target::Body, "no-topbar"));
    }

    #[test]
    fn test_line_selection_toggles_class() {
        let mut s = MemorySurface::new();
        s.append_line(&view(0, "a")).unwrap();
        s.set_line_selected(EntryId(0), true).unwrap();
        assert!(s.lines[0].classes.contains(&"line-selected".to_string()));
        s.set_line_selected(EntryId(0), false).unwrap();
        assert_eq!(s.lines[0].classes, vec!["line"]);
    }
}
