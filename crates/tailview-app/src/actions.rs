//! Action dispatch: applies UpdateActions to the surface and host

use tailview_core::prelude::*;

use crate::engine_event::EngineEvent;
use crate::handler::UpdateAction;
use crate::host::Host;
use crate::surface::{LineView, RenderSurface, SurfaceOp};

/// Apply one update's actions in order.
///
/// Whether the viewport is at the bottom is sampled once, before the first
/// mutation, so `FollowTail` reflects the position the user left it at.
/// A failing action is logged by severity and reported; the rest of the
/// batch still runs. Returns the events produced by the batch.
pub fn handle_actions<S, H>(actions: Vec<UpdateAction>, surface: &mut S, host: &mut H) -> Vec<EngineEvent>
where
    S: RenderSurface + ?Sized,
    H: Host + ?Sized,
{
    if actions.is_empty() {
        return Vec::new();
    }

    let pinned = surface.is_scrolled_to_bottom();
    let mut events = Vec::new();

    for action in actions {
        let label = action_label(&action);
        match handle_action(action, surface, host, pinned) {
            Ok(Some(event)) => events.push(event),
            Ok(None) => {}
            Err(e) => {
                if e.is_recoverable() {
                    warn!("Action {} failed: {}", label, e);
                } else {
                    error!("Action {} failed: {}", label, e);
                }
                events.push(EngineEvent::Error {
                    message: e.to_string(),
                    fatal: e.is_fatal(),
                });
            }
        }
    }

    events
}

fn handle_action<S, H>(
    action: UpdateAction,
    surface: &mut S,
    host: &mut H,
    pinned: bool,
) -> Result<Option<EngineEvent>>
where
    S: RenderSurface + ?Sized,
    H: Host + ?Sized,
{
    match action {
        UpdateAction::Surface(op) => apply_op(op, surface, pinned),

        UpdateAction::ReplaceUrl(url) => {
            host.replace_url(&url)?;
            Ok(Some(EngineEvent::UrlChanged {
                url: url.to_string(),
            }))
        }

        // UnreadChanged comes from the state snapshot
        UpdateAction::SetBadge(count) => host.set_badge(count).map(|_| None),

        UpdateAction::PersistTheme(theme) => host.store_theme(theme).map(|_| None),

        UpdateAction::Schedule { delay, message } => host.schedule(delay, message).map(|_| None),

        UpdateAction::ReportError(message) => Ok(Some(EngineEvent::Error {
            message,
            fatal: false,
        })),
    }
}

fn apply_op<S>(op: SurfaceOp, surface: &mut S, pinned: bool) -> Result<Option<EngineEvent>>
where
    S: RenderSurface + ?Sized,
{
    match op {
        SurfaceOp::AppendLine(view) => {
            surface.append_line(&view)?;
            Ok(Some(line_event(view, false)))
        }
        SurfaceOp::ReplaceLastLine(view) => {
            surface.replace_last_line(&view)?;
            Ok(Some(line_event(view, true)))
        }
        SurfaceOp::EvictLine(id) => {
            surface.remove_first_line()?;
            Ok(Some(EngineEvent::LineEvicted { id }))
        }
        SurfaceOp::SetLineVisible { id, visible } => {
            surface.set_line_visible(id, visible)?;
            Ok(None)
        }
        SurfaceOp::SetLineSelected { id, selected } => {
            surface.set_line_selected(id, selected)?;
            Ok(Some(EngineEvent::LineSelected { id, selected }))
        }
        SurfaceOp::FollowTail => {
            if pinned {
                surface.scroll_to_bottom()?;
            }
            Ok(None)
        }
        SurfaceOp::ScrollToBottom => surface.scroll_to_bottom().map(|_| None),
        SurfaceOp::SetRootAttribute { name, value } => {
            surface.set_root_attribute(&name, &value).map(|_| None)
        }
        SurfaceOp::AddClass { target, class } => surface.add_class(target, &class).map(|_| None),
        SurfaceOp::RemoveClass { target, class } => {
            surface.remove_class(target, &class).map(|_| None)
        }
        SurfaceOp::SetClass { target, class } => surface.set_class(target, &class).map(|_| None),
        SurfaceOp::SetFilterInput(value) => surface.set_filter_input(&value).map(|_| None),
        SurfaceOp::FocusFilterInput => surface.focus_filter_input().map(|_| None),
    }
}

fn line_event(view: LineView, replaced: bool) -> EngineEvent {
    let LineView {
        id,
        markup,
        text,
        classes,
        visible,
    } = view;

    if replaced {
        EngineEvent::LineReplaced {
            id,
            text,
            markup,
            classes,
            visible,
        }
    } else {
        EngineEvent::LineRendered {
            id,
            text,
            markup,
            classes,
            visible,
        }
    }
}

fn action_label(action: &UpdateAction) -> &'static str {
    match action {
        UpdateAction::Surface(_) => "surface",
        UpdateAction::ReplaceUrl(_) => "replace_url",
        UpdateAction::SetBadge(_) => "set_badge",
        UpdateAction::PersistTheme(_) => "persist_theme",
        UpdateAction::Schedule { .. } => "schedule",
        UpdateAction::ReportError(_) => "report_error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::surface::{MemorySurface, Target};
    use tailview_core::EntryId;

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
    fn test_follow_tail_only_when_pinned() {
        let mut surface = MemorySurface::new();
        let mut host = MemoryHost::new();

        surface.at_bottom = false;
        handle_actions(
            vec![
                SurfaceOp::AppendLine(view(0, "a")).into(),
                SurfaceOp::FollowTail.into(),
            ],
            &mut surface,
            &mut host,
        );
        assert_eq!(surface.scrolls, 0);

        surface.at_bottom = true;
        handle_actions(
            vec![
                SurfaceOp::AppendLine(view(1, "b")).into(),
                SurfaceOp::FollowTail.into(),
            ],
            &mut surface,
            &mut host,
        );
        assert_eq!(surface.scrolls, 1);
    }

    #[test]
    fn test_failed_action_reports_and_continues() {
        let mut surface = MemorySurface::new();
        let mut host = MemoryHost::new();

        let events = handle_actions(
            vec![
                SurfaceOp::EvictLine(EntryId(0)).into(),
                SurfaceOp::add_class(Target::PauseButton, "play").into(),
            ],
            &mut surface,
            &mut host,
        );

        assert!(matches!(
            events.as_slice(),
            [EngineEvent::Error { fatal: false, .. }]
        ));
        assert!(surface.has_class(Target::PauseButton, "play"));
    }

    /// Host whose timers cannot be delivered
    struct UnwiredHost(MemoryHost);

    impl Host for UnwiredHost {
        fn replace_url(&mut self, url: &url::Url) -> Result<()> {
            self.0.replace_url(url)
        }

        fn set_badge(&mut self, count: u32) -> Result<()> {
            self.0.set_badge(count)
        }

        fn load_theme(&self) -> Result<Option<tailview_core::Theme>> {
            self.0.load_theme()
        }

        fn store_theme(&mut self, theme: tailview_core::Theme) -> Result<()> {
            self.0.store_theme(theme)
        }

        fn schedule(&mut self, _: std::time::Duration, _: crate::message::Message) -> Result<()> {
            Err(Error::config("no timer channel"))
        }
    }

    #[test]
    fn test_config_failure_is_reported_as_fatal() {
        let mut surface = MemorySurface::new();
        let mut host = UnwiredHost(MemoryHost::new());

        let events = handle_actions(
            vec![
                UpdateAction::Schedule {
                    delay: std::time::Duration::from_millis(10),
                    message: crate::message::Message::ThemeTransitionEnd,
                },
                UpdateAction::PersistTheme(tailview_core::Theme::Dark),
            ],
            &mut surface,
            &mut host,
        );

        assert!(matches!(
            events.as_slice(),
            [EngineEvent::Error { fatal: true, .. }]
        ));
        // The rest of the batch still ran
        assert_eq!(host.0.stored_theme, Some(tailview_core::Theme::Dark));
    }

    #[test]
    fn test_host_actions() {
        let mut surface = MemorySurface::new();
        let mut host = MemoryHost::new();
        let url = url::Url::parse("http://h/?filter=x").unwrap();

        let events = handle_actions(
            vec![
                UpdateAction::ReplaceUrl(url.clone()),
                UpdateAction::SetBadge(4),
                UpdateAction::PersistTheme(tailview_core::Theme::Dark),
            ],
            &mut surface,
            &mut host,
        );

        assert_eq!(host.current_url(), Some(&url));
        assert_eq!(host.badge, 4);
        assert_eq!(host.stored_theme, Some(tailview_core::Theme::Dark));
        assert_eq!(
            events,
            vec![EngineEvent::UrlChanged {
                url: "http://h/?filter=x".to_string()
            }]
        );
    }
}
