//! Engine - owns the state, the surface and the host, and drives the
//! TEA loop for every frontend (browser and headless driver).

use tokio::sync::{broadcast, mpsc};

use tailview_core::prelude::*;
use tailview_core::Theme;

use crate::config::Settings;
use crate::engine_event::EngineEvent;
use crate::host::Host;
use crate::location::Location;
use crate::message::Message;
use crate::process;
use crate::state::AppState;
use crate::surface::RenderSurface;

/// Capacity of the message and event channels
const CHANNEL_CAPACITY: usize = 256;

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to detect
/// what changed and emit appropriate EngineEvents.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StateSnapshot {
    paused: bool,
    theme: Theme,
    unread: u32,
    filter: String,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        Self {
            paused: state.session.paused,
            theme: state.session.theme,
            unread: state.session.unread,
            filter: state.filter.query().to_string(),
        }
    }
}

/// Orchestration engine for one page session.
pub struct Engine<S, H> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Document the state is rendered into
    surface: S,

    /// Address bar, badge, storage and timers
    host: H,

    /// Sender half of the message channel.
    /// Clone this to give to input sources (stdin reader, timers).
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the message channel.
    pub msg_rx: mpsc::Receiver<Message>,

    /// Event broadcaster for external consumers.
    event_tx: broadcast::Sender<EngineEvent>,
}

impl<S: RenderSurface, H: Host> Engine<S, H> {
    /// Create an engine for the page at `location`.
    ///
    /// Nothing is rendered until [`Engine::init`] runs.
    pub fn new(surface: S, host: H, location: Location, settings: Settings) -> Self {
        let state = AppState::with_settings(location, settings);
        Self::with_state(surface, host, state)
    }

    pub fn with_state(surface: S, host: H, state: AppState) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel::<Message>(CHANNEL_CAPACITY);
        let (event_tx, _) = broadcast::channel(CHANNEL_CAPACITY);

        Self {
            state,
            surface,
            host,
            msg_tx,
            msg_rx,
            event_tx,
        }
    }

    /// Page load: restore the persisted theme and seed the filter.
    ///
    /// An unreadable theme store is logged and treated as "no theme".
    pub fn init(&mut self) {
        let persisted_theme = match self.host.load_theme() {
            Ok(theme) => theme,
            Err(e) => {
                warn!("Failed to load persisted theme: {}", e);
                None
            }
        };
        self.process_message(Message::Init { persisted_theme });
    }

    /// Subscribe to engine events.
    ///
    /// If the subscriber falls behind (buffer full), older events are
    /// dropped. Use `broadcast::error::RecvError::Lagged` to detect this.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Process a single message through the TEA update cycle.
    ///
    /// Action events are broadcast first, in the order the actions ran,
    /// followed by events derived from comparing before/after snapshots.
    /// A fatal error event stops the engine.
    pub fn process_message(&mut self, msg: Message) {
        trace!("Processing {:?}", msg);
        let pre = StateSnapshot::capture(&self.state);

        let events =
            process::process_message(&mut self.state, msg, &mut self.surface, &mut self.host);

        if events
            .iter()
            .any(|e| matches!(e, EngineEvent::Error { fatal: true, .. }))
        {
            error!("Fatal error while processing message, stopping");
            self.state.quit = true;
        }

        let post = StateSnapshot::capture(&self.state);

        for event in events {
            self.emit(event);
        }
        self.emit_events(&pre, &post);
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Emit EngineEvents based on state changes after processing.
    fn emit_events(&self, pre: &StateSnapshot, post: &StateSnapshot) {
        if pre.filter != post.filter {
            let visible = self.state.buffer.iter().filter(|e| e.visible).count();
            self.emit(EngineEvent::FilterApplied {
                query: post.filter.clone(),
                visible,
                total: self.state.buffer.len(),
            });
        }

        if pre.paused != post.paused {
            self.emit(EngineEvent::PauseChanged {
                paused: post.paused,
            });
        }

        if pre.theme != post.theme {
            self.emit(EngineEvent::ThemeChanged { theme: post.theme });
        }

        if pre.unread != post.unread {
            self.emit(EngineEvent::UnreadChanged { count: post.unread });
        }
    }

    /// Emit a single EngineEvent to all subscribers.
    ///
    /// send() returns Err only if there are no receivers -- that's fine,
    /// we don't want to panic or log errors for having no subscribers.
    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::surface::{MemorySurface, Target};

    fn engine_at(href: &str, host: MemoryHost) -> Engine<MemorySurface, MemoryHost> {
        Engine::new(
            MemorySurface::new(),
            host,
            Location::parse(href).unwrap(),
            Settings::default(),
        )
    }

    fn engine() -> Engine<MemorySurface, MemoryHost> {
        engine_at("http://localhost:9001/", MemoryHost::new())
    }

    fn drain(rx: &mut broadcast::Receiver<EngineEvent>) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_engine_process_quit_message() {
        let mut engine = engine();
        assert!(!engine.should_quit());
        engine.process_message(Message::Quit);
        assert!(engine.should_quit());
    }

    #[test]
    fn test_engine_drain_empty_channel() {
        let mut engine = engine();
        assert_eq!(engine.drain_pending_messages(), 0);
    }

    #[test]
    fn test_engine_drains_sent_messages() {
        let mut engine = engine();
        let tx = engine.msg_sender();
        tokio_test::block_on(async {
            tx.send(Message::line("a")).await.unwrap();
            tx.send(Message::line("b")).await.unwrap();
        });

        assert_eq!(engine.drain_pending_messages(), 2);
        assert_eq!(engine.surface().texts(), vec!["a", "b"]);
    }

    #[test]
    fn test_init_restores_persisted_theme() {
        let mut engine = engine_at("http://localhost/", MemoryHost::with_theme(Theme::Dark));
        let mut rx = engine.subscribe();
        engine.init();

        assert_eq!(engine.state.session.theme, Theme::Dark);
        assert_eq!(
            engine.surface().root_attributes.get("data-theme").map(String::as_str),
            Some("dark")
        );
        assert!(engine.surface().has_class(Target::ThemeButton, "dark"));
        assert!(engine.surface().filter_focused);
        assert_eq!(
            drain(&mut rx),
            vec![EngineEvent::ThemeChanged { theme: Theme::Dark }]
        );
    }

    #[test]
    fn test_init_seeds_filter_from_url() {
        let mut engine = engine_at("http://localhost/?filter=err", MemoryHost::new());
        engine.init();

        assert_eq!(engine.state.filter.query(), "err");
        assert_eq!(engine.surface().filter_input, "err");
        // The URL already carries the value
        assert!(engine.host().history.is_empty());
    }

    #[test]
    fn test_line_events_are_broadcast() {
        let mut engine = engine();
        let mut rx = engine.subscribe();

        engine.process_message(Message::line("hello"));

        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "line_rendered");
    }

    #[test]
    fn test_snapshot_events() {
        let mut engine = engine();
        let mut rx = engine.subscribe();

        engine.process_message(Message::TogglePause);
        engine.process_message(Message::SetFilter("x".to_string()));

        let events = drain(&mut rx);
        assert!(events.contains(&EngineEvent::PauseChanged { paused: true }));
        assert!(events.contains(&EngineEvent::FilterApplied {
            query: "x".to_string(),
            visible: 0,
            total: 0,
        }));
    }

    /// Host without a timer channel
    struct NoTimers(MemoryHost);

    impl Host for NoTimers {
        fn replace_url(&mut self, url: &url::Url) -> Result<()> {
            self.0.replace_url(url)
        }

        fn set_badge(&mut self, count: u32) -> Result<()> {
            self.0.set_badge(count)
        }

        fn load_theme(&self) -> Result<Option<Theme>> {
            self.0.load_theme()
        }

        fn store_theme(&mut self, theme: Theme) -> Result<()> {
            self.0.store_theme(theme)
        }

        fn schedule(&mut self, _: std::time::Duration, _: Message) -> Result<()> {
            Err(Error::config("no timer channel"))
        }
    }

    #[test]
    fn test_fatal_error_stops_engine() {
        let mut engine = Engine::new(
            MemorySurface::new(),
            NoTimers(MemoryHost::new()),
            Location::parse("http://localhost/").unwrap(),
            Settings::default(),
        );
        let mut rx = engine.subscribe();

        engine.process_message(Message::ToggleTheme);

        assert!(engine.should_quit());
        let events = drain(&mut rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, EngineEvent::Error { fatal: true, .. })));
        // Theme still switched: the batch ran to the end
        assert_eq!(engine.host().0.stored_theme, Some(Theme::Dark));
    }

    #[test]
    fn test_recoverable_error_keeps_engine_running() {
        let mut engine = engine();
        engine.process_message(Message::SetFilter("(".to_string()));
        assert!(!engine.should_quit());
    }

    #[test]
    fn test_no_subscribers_no_error() {
        let mut engine = engine();
        engine.process_message(Message::line("unobserved"));
        assert_eq!(engine.state.buffer.len(), 1);
    }
}
