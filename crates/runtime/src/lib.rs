//! Console runtime for `routerdash`.
//!
//! Owns the [`Console`] controller and wires together all background tasks:
//! - one poll task per status source (stats, usage history, PBX, interfaces)
//! - config file watcher (live reload on change)
//! - 1-second timer (alert expiry, delayed refresh, clock)
//! - stdin command reader (`refresh`, `restart network`, `quit`, ...)

pub mod console;

pub use console::Console;

use dash_config::{ConfigWatcher, DashConfig};
use dash_core::event::Message;
use dash_core::state::WifiNetwork;
use dash_core::{DashError, Result, ServiceAction};
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Event bus depth. Poll tasks wait when the controller falls behind.
const BUS_CAPACITY: usize = 64;

/// Where the configuration comes from, plus command-line overrides.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub config_path: PathBuf,
    /// Replaces `global.base_url` from the file, on every (re)load.
    pub base_url:    Option<String>,
}

impl Options {
    pub fn load(&self) -> Result<DashConfig> {
        let mut config = dash_config::load(&self.config_path)?;
        if let Some(url) = &self.base_url {
            config.global.base_url = url.clone();
            dash_config::validate(&config)?;
        }
        Ok(config)
    }
}

// ── Entry points ──────────────────────────────────────────────────────────────

/// Run the live console until Ctrl-C or `quit`. Redraws once a second.
pub async fn watch(options: Options) -> Result<()> {
    let config = options.load()?;
    let (tx, mut rx) = mpsc::channel(BUS_CAPACITY);
    let mut console = Console::new(options.clone(), config, tx.clone())?;
    console.start();

    let (_watcher, changes) = ConfigWatcher::spawn(&options.config_path);
    let tasks: Vec<JoinHandle<()>> = vec![
        tokio::spawn(forward_config_changes(changes, tx.clone())),
        tokio::spawn(tick(tx.clone())),
        tokio::spawn(read_commands(tx.clone())),
        tokio::spawn(shutdown_on_ctrl_c(tx)),
    ];

    while let Some(message) = rx.recv().await {
        let redraw = matches!(message, Message::Tick);
        if console.handle(message, Instant::now()).is_break() {
            break;
        }
        if redraw {
            let mut out = std::io::stdout().lock();
            let _ = write!(out, "\x1b[2J\x1b[H{}", console.frame());
            let _ = out.flush();
        }
    }

    for task in tasks {
        task.abort();
    }
    info!("Console stopped");
    Ok(())
}

/// Poll every source once and return the rendered frame.
pub async fn once(options: Options) -> Result<String> {
    let config = options.load()?;
    let (tx, mut rx) = mpsc::channel(BUS_CAPACITY);
    let mut console = Console::new(options, config, tx)?;

    let mut pending = console.poll_once();
    while pending > 0 {
        let Some(message) = rx.recv().await else { break };
        pending -= 1;
        let _ = console.handle(message, Instant::now());
    }
    Ok(console.frame())
}

/// Run one service action through the controller. `Ok` carries the
/// console's reply message.
pub async fn restart(options: Options, action: ServiceAction) -> Result<String> {
    let config = options.load()?;
    let (tx, mut rx) = mpsc::channel(BUS_CAPACITY);
    let mut console = Console::new(options, config, tx)?;

    if !console.buttons().iter().any(|b| b.action() == action) {
        return Err(DashError::Config(format!("{action} is disabled by the configuration")));
    }

    let _ = console.handle(Message::ActionRequested(action), Instant::now());
    while let Some(message) = rx.recv().await {
        if let Message::ActionCompleted { outcome, .. } = &message {
            let outcome = outcome.clone();
            let _ = console.handle(message, Instant::now());
            return outcome.map_err(DashError::Action);
        }
    }
    Err(DashError::Action(format!("{action} finished without a result")))
}

/// Ask the console for visible WiFi networks.
pub async fn scan_wifi(options: &Options) -> Result<Vec<WifiNetwork>> {
    let config = options.load()?;
    console::client_for(&config)?.scan_wifi().await
}

// ── Bus feeders ───────────────────────────────────────────────────────────────

async fn forward_config_changes(mut changes: mpsc::Receiver<()>, tx: mpsc::Sender<Message>) {
    while changes.recv().await.is_some() {
        if tx.send(Message::ConfigReloaded).await.is_err() {
            break;
        }
    }
}

async fn tick(tx: mpsc::Sender<Message>) {
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    loop {
        ticker.tick().await;
        if tx.send(Message::Tick).await.is_err() {
            break;
        }
    }
}

async fn read_commands(tx: mpsc::Sender<Message>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        let Some(message) = parse_command(&line) else {
            warn!("Unknown command '{}' (try: refresh, restart network, restart pbx, quit)", line.trim());
            continue;
        };
        if tx.send(message).await.is_err() {
            break;
        }
    }
}

async fn shutdown_on_ctrl_c(tx: mpsc::Sender<Message>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C: {e}");
        return;
    }
    let _ = tx.send(Message::Shutdown).await;
}

/// Map a line typed into the live console to a bus message.
pub fn parse_command(line: &str) -> Option<Message> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["refresh" | "r"] => Some(Message::RefreshRequested),
        ["restart", "network"] => Some(Message::ActionRequested(ServiceAction::RestartNetwork)),
        ["restart", "pbx"] => Some(Message::ActionRequested(ServiceAction::RestartPbx)),
        ["quit" | "q" | "exit"] => Some(Message::Shutdown),
        _ => None,
    }
}
