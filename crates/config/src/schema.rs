use serde::{Deserialize, Serialize};

/// Root configuration structure parsed from `routerdash.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DashConfig {
    /// Connection settings shared by every request.
    pub global: GlobalConfig,
    /// Sample counts kept for the charts.
    pub history: HistoryConfig,
    /// System dashboard sources.
    pub dashboard: DashboardConfig,
    /// FreeSWITCH status and registrations.
    pub pbx: PbxConfig,
    /// Per-interface stats pollers.
    pub interface_stats: Vec<InterfaceStatsConfig>,
    /// Alert banner behaviour.
    pub alerts: AlertConfig,
}

/// Global console settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Console base URL, e.g. `"http://192.168.1.1"`.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// What a poll task does with ticks that fall due while a request is in flight.
    pub overlap: OverlapPolicy,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            base_url: "http://192.168.1.1".to_string(),
            request_timeout_ms: 5_000,
            overlap: OverlapPolicy::Skip,
        }
    }
}

/// Handling of ticks missed while a poll request is still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Drop missed ticks; poll again on the next scheduled tick.
    #[default]
    Skip,
    /// Run missed ticks back-to-back once the request resolves.
    Queue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub cpu_points:     usize,
    pub network_points: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            cpu_points:     24,
            network_points: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub stats_endpoint:   String,
    /// Fetched once at start (and on every refresh) to seed the network chart.
    pub history_endpoint: String,
    pub interval_ms:      u64,
    /// Interfaces that have download/upload readouts.
    pub interfaces:       Vec<String>,
    /// Interface whose throughput feeds the network chart.
    pub wan_interface:    String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            stats_endpoint:   "/dashboard/api/stats".to_string(),
            history_endpoint: "/dashboard/api/network_usage_history".to_string(),
            interval_ms:      10_000,
            interfaces:       vec!["wan".to_string(), "lan".to_string()],
            wan_interface:    "wan".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PbxConfig {
    pub enabled:                bool,
    pub status_endpoint:        String,
    pub registrations_endpoint: String,
    pub interval_ms:            u64,
    /// Extensions shown in the registration list.
    pub extensions:             Vec<String>,
}

impl Default for PbxConfig {
    fn default() -> Self {
        Self {
            enabled:                true,
            status_endpoint:        "/api/freeswitch/status".to_string(),
            registrations_endpoint: "/freeswitch/registrations".to_string(),
            interval_ms:            10_000,
            extensions:             Vec::new(),
        }
    }
}

/// One `/network/interface/{id}/stats` poller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceStatsConfig {
    pub id: u32,
    #[serde(default = "default_interface_interval")]
    pub interval_ms: u64,
    /// Stat keys that get a display target; other keys are ignored.
    #[serde(default)]
    pub keys: Vec<String>,
}

fn default_interface_interval() -> u64 {
    5_000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// How long an alert banner stays visible.
    pub ttl_ms: u64,
    /// Delay between a successful restart and the full refresh.
    pub reload_delay_ms: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            ttl_ms:          5_000,
            reload_delay_ms: 3_000,
        }
    }
}
