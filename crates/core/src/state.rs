use crate::history::BoundedHistory;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Central console state — all widgets read from this snapshot.
///
/// Only the controller in `dash-runtime` mutates it, one message at a time.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Latest system section of the dashboard stats. Absent fields stay `None`.
    pub system: SystemSnapshot,
    /// When the last stats response was applied, `None` before the first one.
    pub stats_at: Option<DateTime<Utc>>,
    /// Latest derived rate per interface (present from the second poll on).
    pub interfaces: BTreeMap<String, InterfaceRate>,
    /// CPU usage samples (%) for the CPU chart.
    pub cpu_history: BoundedHistory<f64>,
    /// WAN throughput samples for the network chart.
    pub net_history: BoundedHistory<NetPoint>,
    /// Latest PBX status, `None` until the first successful poll.
    pub pbx: Option<PbxStatus>,
    /// Set when the last PBX status poll failed.
    pub pbx_unreachable: bool,
    /// Currently registered extensions, `None` until the first poll.
    pub registrations: Option<Vec<Registration>>,
    /// Per interface id: latest stat key → rendered value.
    pub interface_stats: BTreeMap<u32, BTreeMap<String, String>>,
    /// Local time of the last processed message.
    pub time: DateTime<Local>,
}

impl AppState {
    pub fn new(cpu_points: usize, network_points: usize) -> Self {
        Self {
            system: SystemSnapshot::default(),
            stats_at: None,
            interfaces: BTreeMap::new(),
            cpu_history: BoundedHistory::new(cpu_points),
            net_history: BoundedHistory::new(network_points),
            pbx: None,
            pbx_unreachable: false,
            registrations: None,
            interface_stats: BTreeMap::new(),
            time: Local::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(24, 30)
    }
}

/// The `system` section of a dashboard stats response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemSnapshot {
    /// Average CPU usage (0.0 – 100.0).
    pub cpu_usage:       Option<f64>,
    /// RAM usage (0.0 – 100.0).
    pub memory_percent:  Option<f64>,
    /// RAM used in bytes.
    pub memory_used:     Option<u64>,
    /// Total RAM in bytes.
    pub memory_total:    Option<u64>,
    pub uptime:          Option<Uptime>,
    /// Degrees Celsius.
    pub cpu_temperature: Option<f64>,
}

impl SystemSnapshot {
    /// RAM usage as a fraction in `[0, 1]`, if the percentage is known.
    #[must_use]
    pub fn memory_fraction(&self) -> Option<f32> {
        self.memory_percent
            .map(|p| (p / 100.0).clamp(0.0, 1.0) as f32)
    }
}

/// Consoles report uptime either as seconds or as a preformatted string.
#[derive(Debug, Clone, PartialEq)]
pub enum Uptime {
    Seconds(u64),
    Text(String),
}

/// Absolute byte counters of one interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterfaceCounters {
    pub bytes_recv: u64,
    pub bytes_sent: u64,
}

/// Throughput derived from two successive counter samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InterfaceRate {
    pub recv_bytes_per_sec: f64,
    pub sent_bytes_per_sec: f64,
}

impl InterfaceRate {
    pub fn mbits_recv(&self) -> f64 {
        self.recv_bytes_per_sec * 8.0 / 1_000_000.0
    }

    pub fn mbits_sent(&self) -> f64 {
        self.sent_bytes_per_sec * 8.0 / 1_000_000.0
    }
}

/// One point of the two-series network chart (Mbit/s).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NetPoint {
    pub download: f64,
    pub upload:   f64,
}

/// A full dashboard stats response.
#[derive(Debug, Clone, Default)]
pub struct StatsSnapshot {
    pub system:     SystemSnapshot,
    pub interfaces: BTreeMap<String, InterfaceCounters>,
}

/// Server-side WAN usage history, used to seed the network chart.
#[derive(Debug, Clone, Default)]
pub struct UsageHistory {
    pub timestamps: Vec<String>,
    pub download:   Vec<f64>,
    pub upload:     Vec<f64>,
}

/// FreeSWITCH service status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PbxStatus {
    pub installed:     Option<bool>,
    pub running:       bool,
    pub version:       Option<String>,
    pub uptime_secs:   Option<u64>,
    pub calls:         Option<u64>,
    pub channels:      Option<u64>,
    pub registrations: Option<u64>,
}

/// A SIP extension currently registered with the PBX.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub extension:  String,
    #[serde(default)]
    pub ip:         String,
    #[serde(default)]
    pub user_agent: String,
}

/// One network found by a WiFi scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiNetwork {
    pub ssid:            String,
    #[serde(default)]
    pub channel:         Option<u32>,
    #[serde(default)]
    pub security:        Option<String>,
    #[serde(default)]
    pub signal_strength: Option<i32>,
}
