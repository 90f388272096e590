//! Headless mode runner - main event loop without a browser
//!
//! Reads log lines (or event frames) from a file or stdin, processes them
//! through the engine against an in-memory surface, and writes every engine
//! event as NDJSON.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};
use url::Url;

use tailview_app::config::{load_highlight_preset, load_settings, Settings};
use tailview_app::{
    Engine, EngineEvent, FileThemeStore, Host, Location, MemorySurface, Message,
};
use tailview_core::prelude::*;
use tailview_core::{logging, InboundEvent, Theme};

use super::HeadlessEvent;

/// Page address used when none is given
pub const DEFAULT_URL: &str = "http://localhost:9001/";

/// Capacity of the channel between the input reader thread and the loop
const INPUT_CHANNEL_CAPACITY: usize = 256;

/// Command-line choices for one headless run
#[derive(Debug, Clone)]
pub struct HeadlessOptions {
    /// Treat every input line as a `["name", payload]` frame
    pub frames: bool,
    /// Initial display-buffer cap (overrides the config file)
    pub lines: Option<usize>,
    /// Initial filter, written into the page URL before start
    pub filter: Option<String>,
    /// Highlight preset, relative to `base_dir` unless absolute
    pub highlight: Option<PathBuf>,
    pub url: String,
    pub no_indent: bool,
    pub hide_topbar: bool,
    /// Directory holding `.tailview/config.toml`
    pub base_dir: PathBuf,
    /// Where the theme is persisted; the user data directory when unset
    pub theme_dir: Option<PathBuf>,
}

impl HeadlessOptions {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            frames: false,
            lines: None,
            filter: None,
            highlight: None,
            url: DEFAULT_URL.to_string(),
            no_indent: false,
            hide_topbar: false,
            base_dir: base_dir.into(),
            theme_dir: None,
        }
    }

    /// Config-file settings with the command-line overrides applied
    fn settings(&self) -> Settings {
        let mut settings = load_settings(&self.base_dir);
        if let Some(lines) = self.lines {
            settings.buffer.lines = Some(lines);
        }
        settings.ui.hide_topbar |= self.hide_topbar;
        settings.ui.no_indent |= self.no_indent;
        if let Some(path) = &self.highlight {
            // Absolute paths survive the join unchanged
            settings.highlight.preset = Some(self.base_dir.join(path));
        }
        settings
    }
}

/// Host for headless runs: file-backed theme, tokio timers, logged URL
/// and badge updates
struct HeadlessHost {
    store: FileThemeStore,
    /// Connected once the engine (which owns the channel) exists
    msg_tx: Option<mpsc::Sender<Message>>,
}

impl Host for HeadlessHost {
    fn replace_url(&mut self, url: &Url) -> Result<()> {
        debug!("Address bar: {}", url);
        Ok(())
    }

    fn set_badge(&mut self, count: u32) -> Result<()> {
        debug!("Badge: {}", count);
        Ok(())
    }

    fn load_theme(&self) -> Result<Option<Theme>> {
        self.store.load()
    }

    fn store_theme(&mut self, theme: Theme) -> Result<()> {
        self.store.store(theme)
    }

    fn schedule(&mut self, delay: Duration, message: Message) -> Result<()> {
        let Some(tx) = self.msg_tx.clone() else {
            return Err(Error::config("timer scheduled before the engine was connected"));
        };
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(message).await.is_err() {
                debug!("Timer fired after the engine stopped");
            }
        });
        Ok(())
    }
}

/// What the loop woke up for
enum Next {
    Input(String),
    EndOfInput,
    Message(Message),
}

/// Run in headless mode - write NDJSON engine events to `out`
pub async fn run_headless<W: Write>(
    options: HeadlessOptions,
    input: Box<dyn BufRead + Send>,
    out: &mut W,
) -> Result<()> {
    info!("═══════════════════════════════════════════════════════");
    info!("tailview starting in HEADLESS mode");
    info!("Config base: {}", options.base_dir.display());
    info!("═══════════════════════════════════════════════════════");

    let settings = options.settings();
    let mut location = Location::parse(&options.url)?;
    if let Some(filter) = &options.filter {
        location.set_filter(filter);
    }

    let theme_dir = options
        .theme_dir
        .clone()
        .unwrap_or_else(logging::data_directory);
    let host = HeadlessHost {
        store: FileThemeStore::in_dir(&theme_dir),
        msg_tx: None,
    };
    let preset = load_highlight_preset(&options.base_dir, &settings);

    HeadlessEvent::started(location.as_str(), settings.buffer.lines).write_to(out);

    let mut engine = Engine::new(MemorySurface::new(), host, location, settings);
    engine.host_mut().msg_tx = Some(engine.msg_sender());
    let mut events = engine.subscribe();

    engine.init();
    match preset {
        Ok(Some(config)) => engine.process_message(Message::Inbound(
            InboundEvent::HighlightConfig(config),
        )),
        Ok(None) => {}
        Err(e) => {
            warn!("Highlight preset ignored: {}", e);
            HeadlessEvent::error(e.to_string(), false).write_to(out);
        }
    }
    flush_events(&mut events, out);

    // Blocking reads stay off the runtime
    let (line_tx, mut line_rx) = mpsc::channel::<String>(INPUT_CHANNEL_CAPACITY);
    std::thread::spawn(move || {
        spawn_input_reader_blocking(input, line_tx);
    });

    loop {
        if engine.should_quit() {
            info!("Quit requested");
            break;
        }

        let next = tokio::select! {
            line = line_rx.recv() => match line {
                Some(line) => Next::Input(line),
                None => Next::EndOfInput,
            },
            Some(msg) = engine.msg_rx.recv() => Next::Message(msg),
        };

        match next {
            Next::Input(line) => match decode_input(&line, options.frames) {
                Ok(Some(msg)) => engine.process_message(msg),
                Ok(None) => {}
                Err(e) => {
                    warn!("Rejected input {:?}: {}", line, e);
                    HeadlessEvent::error(e.to_string(), false).write_to(out);
                }
            },
            Next::Message(msg) => engine.process_message(msg),
            Next::EndOfInput => {
                info!("Input exhausted");
                engine.process_message(Message::Quit);
            }
        }

        flush_events(&mut events, out);
    }

    let buffer = &engine.state.buffer;
    let visible = buffer.iter().filter(|e| e.visible).count();
    HeadlessEvent::finished(buffer.len(), visible).write_to(out);

    info!("tailview headless mode exiting");
    Ok(())
}

/// Turn one input line into a message.
///
/// In plain mode every line (blank ones included) is a log line. In frame
/// mode blank lines are skipped and everything else must be a frame.
fn decode_input(line: &str, frames: bool) -> Result<Option<Message>> {
    if !frames {
        return Ok(Some(Message::line(line)));
    }

    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Message::parse_frame(trimmed).map(Some)
}

/// Write every event broadcast since the last call
fn flush_events(events: &mut broadcast::Receiver<EngineEvent>, out: &mut impl Write) {
    loop {
        match events.try_recv() {
            Ok(event) => HeadlessEvent::from(event).write_to(out),
            Err(broadcast::error::TryRecvError::Lagged(n)) => {
                warn!("Headless output fell behind, {} events dropped", n);
                HeadlessEvent::error(format!("{} events dropped", n), false).write_to(out);
            }
            Err(_) => break,
        }
    }
}

/// Forward input lines to the event loop (blocking version)
fn spawn_input_reader_blocking(input: Box<dyn BufRead + Send>, line_tx: mpsc::Sender<String>) {
    for line in input.lines() {
        match line {
            Ok(line) => {
                if line_tx.blocking_send(line).is_err() {
                    break;
                }
            }
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        }
    }

    info!("Input reader exiting");
}
