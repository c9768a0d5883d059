use chrono::{DateTime, Utc};
use dash_core::state::{InterfaceCounters, InterfaceRate};
use std::collections::BTreeMap;

/// Bytes per second between two counter readings.
///
/// A counter that went backwards (interface reset) and a zero or negative
/// interval both give `0.0`.
pub fn compute_rate(previous: u64, current: u64, elapsed_secs: f64) -> f64 {
    if !elapsed_secs.is_finite() || elapsed_secs <= 0.0 {
        return 0.0;
    }
    current.saturating_sub(previous) as f64 / elapsed_secs
}

/// Remembers the last counter sample per interface and turns each new
/// sample into a rate.
#[derive(Debug, Default)]
pub struct RateTracker {
    last: BTreeMap<String, (DateTime<Utc>, InterfaceCounters)>,
}

impl RateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `counters` taken at `at`.
    ///
    /// Returns a rate only for interfaces that already had a sample, so the
    /// first poll after start yields an empty map.
    pub fn update(
        &mut self,
        at: DateTime<Utc>,
        counters: &BTreeMap<String, InterfaceCounters>,
    ) -> BTreeMap<String, InterfaceRate> {
        let mut rates = BTreeMap::new();

        for (name, current) in counters {
            if let Some((prev_at, prev)) = self.last.get(name) {
                let elapsed = (at - *prev_at).num_milliseconds() as f64 / 1000.0;
                rates.insert(
                    name.clone(),
                    InterfaceRate {
                        recv_bytes_per_sec: compute_rate(prev.bytes_recv, current.bytes_recv, elapsed),
                        sent_bytes_per_sec: compute_rate(prev.bytes_sent, current.bytes_sent, elapsed),
                    },
                );
            }
            self.last.insert(name.clone(), (at, *current));
        }

        rates
    }

    pub fn clear(&mut self) {
        self.last.clear();
    }
}
