use crate::action::ServiceAction;
use crate::state::{PbxStatus, Registration, StatsSnapshot, UsageHistory};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// All messages (events) that can flow through the console event bus.
///
/// Sources:
/// - Poll tasks          → `Polled`, `PollFailed`
/// - Action runner       → `ActionCompleted`
/// - Config watcher task → `ConfigReloaded`
/// - Timer               → `Tick`
#[derive(Debug, Clone)]
pub enum Message {
    // ── Polling ───────────────────────────────────────────────────────────────
    /// A status endpoint answered and its body decoded.
    Polled(PollResult),
    /// A status request failed (transport error or undecodable body).
    PollFailed {
        source: PollSource,
        seq:    u64,
        error:  String,
    },

    // ── Actions ───────────────────────────────────────────────────────────────
    /// User asked for a service action (restart button pressed).
    ActionRequested(ServiceAction),
    /// The action request finished. `Ok` carries the server message.
    ActionCompleted {
        action:  ServiceAction,
        outcome: Result<String, String>,
    },
    /// Re-poll every source immediately (the console's "page reload").
    RefreshRequested,

    // ── Config ────────────────────────────────────────────────────────────────
    /// Config file changed on disk — triggers a live reload.
    ConfigReloaded,

    // ── Internal ──────────────────────────────────────────────────────────────
    /// One-second timer tick — expires alerts and fires delayed refreshes.
    Tick,
    /// Graceful shutdown requested.
    Shutdown,
}

/// Identity of a poll source. Sequence numbers are compared per source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PollSource {
    Stats,
    UsageHistory,
    PbxStatus,
    Registrations,
    InterfaceStats(u32),
}

impl fmt::Display for PollSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stats             => f.write_str("stats"),
            Self::UsageHistory      => f.write_str("usage-history"),
            Self::PbxStatus         => f.write_str("pbx-status"),
            Self::Registrations     => f.write_str("registrations"),
            Self::InterfaceStats(i) => write!(f, "interface-{i}-stats"),
        }
    }
}

/// A decoded poll response, stamped with its request sequence number.
#[derive(Debug, Clone)]
pub struct PollResult {
    pub source: PollSource,
    /// Monotonic across every source and every poll task generation.
    pub seq:    u64,
    /// When the response was received.
    pub at:     DateTime<Utc>,
    pub data:   PollData,
}

#[derive(Debug, Clone)]
pub enum PollData {
    Stats(StatsSnapshot),
    UsageHistory(UsageHistory),
    Pbx(PbxStatus),
    Registrations(Vec<Registration>),
    InterfaceStats(BTreeMap<String, String>),
}
