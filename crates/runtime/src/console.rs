use crate::Options;
use chrono::{DateTime, Local, Utc};
use dash_api::ConsoleClient;
use dash_config::DashConfig;
use dash_core::event::{Message, PollData, PollResult, PollSource};
use dash_core::state::{AppState, NetPoint, StatsSnapshot, UsageHistory};
use dash_core::{DashError, DashWidget, Result, Sample, ServiceAction};
use dash_monitor::{PollTask, RateTracker, SequenceGen};
use dash_renderer::{render_frame, ActionButton, AlertKind, AlertQueue, Bindings, DisplayBoard};
use std::collections::BTreeMap;
use std::future::Future;
use std::ops::ControlFlow;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The console controller.
///
/// Owns the state, the display board, alerts and buttons, and is the only
/// place any of them change. Background tasks (pollers, action requests,
/// the config watcher, the clock) report over the event bus and
/// [`Console::handle`] applies their messages one at a time.
pub struct Console {
    options:     Options,
    config:      DashConfig,
    client:      ConsoleClient,
    tx:          mpsc::Sender<Message>,
    seq:         SequenceGen,
    pollers:     Vec<PollTask>,
    /// Highest sequence number applied per source.
    last_seq:    BTreeMap<PollSource, u64>,
    rates:       RateTracker,
    state:       AppState,
    widgets:     Vec<Box<dyn DashWidget>>,
    board:       DisplayBoard,
    alerts:      AlertQueue,
    buttons:     Vec<ActionButton>,
    refresh_due: Option<Instant>,
}

impl Console {
    /// Build the controller. Nothing is polled until [`Console::start`].
    pub fn new(options: Options, config: DashConfig, tx: mpsc::Sender<Message>) -> Result<Self> {
        let client = client_for(&config)?;
        let widgets = dash_widgets::from_config(&config);
        let board = DisplayBoard::new(Bindings::from_widgets(&widgets));

        let mut console = Self {
            options,
            client,
            tx,
            seq: SequenceGen::new(),
            pollers: Vec::new(),
            last_seq: BTreeMap::new(),
            rates: RateTracker::new(),
            state: AppState::new(config.history.cpu_points, config.history.network_points),
            widgets,
            board,
            alerts: AlertQueue::new(Duration::from_millis(config.alerts.ttl_ms)),
            buttons: buttons_for(&config),
            refresh_due: None,
            config,
        };
        console.render();
        Ok(console)
    }

    /// Spawn the periodic poll tasks plus the one-shot usage history fetch.
    pub fn start(&mut self) {
        self.spawn_pollers(true);
        let sources: Vec<String> = self.pollers.iter().map(|p| p.source().to_string()).collect();
        info!("Polling {} against {}", sources.join(", "), self.client.base_url());
    }

    /// Fetch every source exactly once. Returns how many results to expect.
    pub fn poll_once(&mut self) -> usize {
        self.spawn_pollers(false)
    }

    /// Apply one bus message. Breaks on [`Message::Shutdown`].
    pub fn handle(&mut self, message: Message, now: Instant) -> ControlFlow<()> {
        match message {
            Message::Polled(result) => self.apply_poll(result),
            Message::PollFailed { source, seq, error } => self.apply_failure(source, seq, &error, now),
            Message::ActionRequested(action) => self.request_action(action),
            Message::ActionCompleted { action, outcome } => self.complete_action(action, outcome, now),
            Message::RefreshRequested => self.refresh(),
            Message::ConfigReloaded => self.reload_config(now),
            Message::Tick => self.tick(now),
            Message::Shutdown => {
                info!("Shutting down; stopping {} poll tasks", self.pollers.len());
                self.pollers.clear();
                return ControlFlow::Break(());
            }
        }
        self.render();
        ControlFlow::Continue(())
    }

    /// Swap in a new configuration. Histories are kept (resized to the new
    /// capacities); bindings, buttons and running pollers are rebuilt.
    pub fn apply_config(&mut self, config: DashConfig) -> Result<()> {
        self.client = client_for(&config)?;
        if config.global.base_url != self.config.global.base_url {
            // Counters from another console cannot be diffed against these.
            debug!("Console changed to {}; dropping rate baselines", config.global.base_url);
            self.rates.clear();
        }
        self.state.cpu_history.resize(config.history.cpu_points);
        self.state.net_history.resize(config.history.network_points);
        self.alerts.set_ttl(Duration::from_millis(config.alerts.ttl_ms));

        self.widgets = dash_widgets::from_config(&config);
        // Targets a partial response left untouched keep their last value.
        self.board = self.board.rebind(Bindings::from_widgets(&self.widgets));

        let mut buttons = buttons_for(&config);
        for button in &mut buttons {
            let pending = self
                .buttons
                .iter()
                .any(|b| b.action() == button.action() && !b.is_enabled());
            if pending {
                button.press();
            }
        }
        self.buttons = buttons;
        self.config = config;

        if !self.pollers.is_empty() {
            self.spawn_pollers(true);
        }
        Ok(())
    }

    /// The plain-text frame for the current state.
    pub fn frame(&self) -> String {
        render_frame(&self.board, &self.alerts, &self.buttons, self.state.time)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn board(&self) -> &DisplayBoard {
        &self.board
    }

    pub fn alerts(&self) -> &AlertQueue {
        &self.alerts
    }

    pub fn buttons(&self) -> &[ActionButton] {
        &self.buttons
    }

    pub fn config(&self) -> &DashConfig {
        &self.config
    }

    /// When the post-restart refresh fires, if one is scheduled.
    pub fn refresh_due(&self) -> Option<Instant> {
        self.refresh_due
    }

    // ── Polling ───────────────────────────────────────────────────────────────

    fn spawn_pollers(&mut self, periodic: bool) -> usize {
        // Dropping the old tasks aborts them.
        self.pollers.clear();

        let every = |ms: u64| periodic.then_some(ms);
        let dashboard = &self.config.dashboard;
        let pbx = &self.config.pbx;
        let mut tasks = Vec::new();

        let path = dashboard.stats_endpoint.clone();
        tasks.push(self.poll(PollSource::Stats, every(dashboard.interval_ms), move |c| {
            let path = path.clone();
            async move { c.fetch_stats(&path).await.map(PollData::Stats) }
        }));

        let path = dashboard.history_endpoint.clone();
        tasks.push(self.poll(PollSource::UsageHistory, None, move |c| {
            let path = path.clone();
            async move { c.fetch_usage_history(&path).await.map(PollData::UsageHistory) }
        }));

        if pbx.enabled {
            let path = pbx.status_endpoint.clone();
            tasks.push(self.poll(PollSource::PbxStatus, every(pbx.interval_ms), move |c| {
                let path = path.clone();
                async move { c.fetch_pbx_status(&path).await.map(PollData::Pbx) }
            }));

            let path = pbx.registrations_endpoint.clone();
            tasks.push(self.poll(PollSource::Registrations, every(pbx.interval_ms), move |c| {
                let path = path.clone();
                async move { c.fetch_registrations(&path).await.map(PollData::Registrations) }
            }));
        }

        for stats in &self.config.interface_stats {
            let id = stats.id;
            tasks.push(self.poll(PollSource::InterfaceStats(id), every(stats.interval_ms), move |c| {
                async move { c.fetch_interface_stats(id).await.map(PollData::InterfaceStats) }
            }));
        }

        let count = tasks.len();
        self.pollers = tasks;
        count
    }

    /// Periodic task when `every_ms` is set, one-shot otherwise.
    fn poll<F, Fut>(&self, source: PollSource, every_ms: Option<u64>, fetch: F) -> PollTask
    where
        F: Fn(ConsoleClient) -> Fut + Send + 'static,
        Fut: Future<Output = Result<PollData>> + Send + 'static,
    {
        let client = self.client.clone();
        let fetch = move || fetch(client.clone());
        let (seq, tx) = (self.seq.clone(), self.tx.clone());

        match every_ms {
            Some(ms) => PollTask::spawn(source, Duration::from_millis(ms), self.config.global.overlap, seq, tx, fetch),
            None => PollTask::once(source, seq, tx, fetch),
        }
    }

    /// Re-poll everything now, as a page reload would.
    fn refresh(&mut self) {
        self.refresh_due = None;
        let count = self.spawn_pollers(true);
        info!("Refreshing {count} sources");
    }

    /// Record `seq` as applied for `source`, unless a newer result already was.
    fn accept(&mut self, source: &PollSource, seq: u64) -> bool {
        let last = self.last_seq.entry(source.clone()).or_insert(0);
        if seq <= *last {
            debug!("Discarding stale {source} result (seq {seq}, applied {last})");
            return false;
        }
        *last = seq;
        true
    }

    fn apply_poll(&mut self, result: PollResult) {
        if !self.accept(&result.source, result.seq) {
            return;
        }

        let PollResult { source, at, data, .. } = result;
        match data {
            PollData::Stats(stats) => self.apply_stats(at, stats),
            PollData::UsageHistory(history) => self.apply_usage_history(at, history),
            PollData::Pbx(status) => {
                self.state.pbx = Some(status);
                self.state.pbx_unreachable = false;
            }
            PollData::Registrations(registrations) => {
                self.state.registrations = Some(registrations);
            }
            PollData::InterfaceStats(stats) => match source {
                PollSource::InterfaceStats(id) => {
                    self.state.interface_stats.insert(id, stats);
                }
                other => warn!("Interface stats arrived tagged as {other}; ignored"),
            },
        }
    }

    fn apply_stats(&mut self, at: DateTime<Utc>, stats: StatsSnapshot) {
        if let Some(usage) = stats.system.cpu_usage {
            self.state.cpu_history.push(at, usage);
        }
        self.state.system = stats.system;
        self.state.stats_at = Some(at);

        let rates = self.rates.update(at, &stats.interfaces);
        if let Some(wan) = rates.get(&self.config.dashboard.wan_interface) {
            self.state.net_history.push(
                at,
                NetPoint {
                    download: wan.mbits_recv(),
                    upload:   wan.mbits_sent(),
                },
            );
        }
        self.state.interfaces.extend(rates);
    }

    fn apply_usage_history(&mut self, at: DateTime<Utc>, history: UsageHistory) {
        let UsageHistory { timestamps, download, upload } = history;
        let samples = download
            .into_iter()
            .zip(upload)
            .enumerate()
            .map(|(i, (download, upload))| {
                // Unparsable labels (e.g. "14:05") take the receive time.
                let timestamp = timestamps
                    .get(i)
                    .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
                    .map(|t| t.with_timezone(&Utc))
                    .unwrap_or(at);
                Sample { timestamp, value: NetPoint { download, upload } }
            });
        self.state.net_history.replace(samples);
        debug!("Network chart seeded with {} samples", self.state.net_history.len());
    }

    fn apply_failure(&mut self, source: PollSource, seq: u64, error: &str, now: Instant) {
        if !self.accept(&source, seq) {
            return;
        }
        if source == PollSource::PbxStatus {
            self.state.pbx_unreachable = true;
        }
        self.alerts.push(AlertKind::Warning, format!("Could not refresh {source}: {error}"), now);
    }

    // ── Actions ───────────────────────────────────────────────────────────────

    fn request_action(&mut self, action: ServiceAction) {
        let Some(button) = self.buttons.iter_mut().find(|b| b.action() == action) else {
            warn!("{action} is not available with the current configuration");
            return;
        };
        if !button.press() {
            debug!("{action} already pending; ignored");
            return;
        }

        info!("Requesting {action}");
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = client.run_action(action).await.map_err(|e| match e {
                DashError::Action(message) => message,
                other => other.to_string(),
            });
            let _ = tx.send(Message::ActionCompleted { action, outcome }).await;
        });
    }

    fn complete_action(
        &mut self,
        action: ServiceAction,
        outcome: std::result::Result<String, String>,
        now: Instant,
    ) {
        if let Some(button) = self.buttons.iter_mut().find(|b| b.action() == action) {
            button.release();
        }

        match outcome {
            Ok(message) => {
                let delay = Duration::from_millis(self.config.alerts.reload_delay_ms);
                info!("{action} succeeded ({message}); refreshing in {delay:?}");
                self.alerts.push(AlertKind::Success, action.success_message(), now);
                self.refresh_due = Some(now + delay);
            }
            Err(message) => {
                warn!("{action} failed: {message}");
                self.alerts
                    .push(AlertKind::Danger, format!("{}: {message}", action.failure_message()), now);
            }
        }
    }

    // ── Housekeeping ──────────────────────────────────────────────────────────

    fn tick(&mut self, now: Instant) {
        let expired = self.alerts.expire(now);
        if expired > 0 {
            debug!("{expired} alerts expired");
        }
        if self.refresh_due.is_some_and(|due| due <= now) {
            self.refresh();
        }
    }

    fn reload_config(&mut self, now: Instant) {
        let result = self.options.load().and_then(|config| self.apply_config(config));
        match result {
            Ok(()) => info!("Config reloaded"),
            Err(e) => {
                warn!("Config reload failed: {e}");
                self.alerts.push(AlertKind::Warning, format!("Config reload failed: {e}"), now);
            }
        }
    }

    fn render(&mut self) {
        self.state.time = Local::now();
        for widget in &self.widgets {
            self.board.apply(widget.render(&self.state));
        }
    }
}

pub(crate) fn client_for(config: &DashConfig) -> Result<ConsoleClient> {
    ConsoleClient::new(
        &config.global.base_url,
        Duration::from_millis(config.global.request_timeout_ms),
    )
}

fn buttons_for(config: &DashConfig) -> Vec<ActionButton> {
    ServiceAction::ALL
        .into_iter()
        .filter(|a| config.pbx.enabled || *a != ServiceAction::RestartPbx)
        .map(ActionButton::new)
        .collect()
}
