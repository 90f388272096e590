//! tailview - live log viewer
//!
//! This is the binary entry point for the headless driver. All logic lives
//! in the library and the workspace crates.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};

use tailview::headless::runner::{run_headless, HeadlessOptions, DEFAULT_URL};
use tailview::headless::HeadlessEvent;
use tailview_app::config::init_config_dir;
use tailview_core::logging;

/// tailview - follow, highlight and filter a stream of log lines
#[derive(Parser, Debug)]
#[command(name = "tailview")]
#[command(about = "Follow, highlight and filter a stream of log lines", long_about = None)]
struct Args {
    /// Log file to read (stdin when omitted)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Read `["event", payload]` frames instead of plain log lines
    #[arg(long)]
    frames: bool,

    /// Keep at most N rendered lines
    #[arg(long, value_name = "N")]
    lines: Option<usize>,

    /// Initial filter (case-insensitive regex)
    #[arg(long, value_name = "REGEX")]
    filter: Option<String>,

    /// Highlight preset (JSON HighlightConfig)
    #[arg(long, value_name = "PATH")]
    highlight: Option<PathBuf>,

    /// Page address the filter is mirrored into
    #[arg(long, default_value = DEFAULT_URL)]
    url: String,

    #[arg(long)]
    no_indent: bool,

    #[arg(long)]
    hide_topbar: bool,

    /// Create .tailview/config.toml in the current directory and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let base_path = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    if args.init_config {
        let path = init_config_dir(&base_path)?;
        eprintln!("Config file ready: {}", path.display());
        return Ok(());
    }

    logging::init()?;

    let input: Box<dyn BufRead + Send> = match &args.file {
        Some(path) => Box::new(BufReader::new(
            File::open(path).wrap_err_with(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let options = HeadlessOptions {
        frames: args.frames,
        lines: args.lines,
        filter: args.filter,
        highlight: args.highlight,
        url: args.url,
        no_indent: args.no_indent,
        hide_topbar: args.hide_topbar,
        base_dir: base_path,
        theme_dir: None,
    };

    let mut stdout = io::stdout();
    if let Err(e) = run_headless(options, input, &mut stdout).await {
        HeadlessEvent::error(e.to_string(), true).emit();
        return Err(e.into());
    }
    Ok(())
}
