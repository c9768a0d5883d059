//! JSON shapes returned by the console, and their conversion to core types.
//!
//! Every field is optional on the wire: a missing field must leave the
//! matching display target untouched, so absence survives into the core
//! types as `None` instead of failing the whole response.

use dash_core::state::{
    InterfaceCounters, PbxStatus, Registration, StatsSnapshot, SystemSnapshot, UsageHistory,
    Uptime, WifiNetwork,
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

// ── Dashboard stats ───────────────────────────────────────────────────────────

/// `GET /dashboard/api/stats`
#[derive(Debug, Default, Deserialize)]
pub struct StatsPayload {
    #[serde(default)]
    pub system:  Option<SystemPayload>,
    #[serde(default)]
    pub network: Option<NetworkPayload>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SystemPayload {
    #[serde(default)]
    pub cpu:             Option<CpuPayload>,
    #[serde(default)]
    pub memory:          Option<MemoryPayload>,
    #[serde(default)]
    pub uptime:          Option<Value>,
    #[serde(default)]
    pub cpu_temperature: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CpuPayload {
    #[serde(default)]
    pub usage: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MemoryPayload {
    #[serde(default)]
    pub percent: Option<f64>,
    #[serde(default)]
    pub used:    Option<u64>,
    #[serde(default)]
    pub total:   Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NetworkPayload {
    #[serde(default)]
    pub interfaces: BTreeMap<String, CountersPayload>,
    /// Aggregate over all interfaces; not bound to any target.
    #[serde(default)]
    pub total:      Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CountersPayload {
    #[serde(default)]
    pub bytes_recv: Option<u64>,
    #[serde(default)]
    pub bytes_sent: Option<u64>,
}

impl StatsPayload {
    pub fn into_core(self) -> StatsSnapshot {
        let system = self.system.unwrap_or_default();
        let cpu = system.cpu.unwrap_or_default();
        let memory = system.memory.unwrap_or_default();

        let interfaces = self
            .network
            .map(|n| n.interfaces)
            .unwrap_or_default()
            .into_iter()
            .filter(|(name, _)| name != "total")
            .filter_map(|(name, c)| match (c.bytes_recv, c.bytes_sent) {
                (Some(bytes_recv), Some(bytes_sent)) => {
                    Some((name, InterfaceCounters { bytes_recv, bytes_sent }))
                }
                _ => None,
            })
            .collect();

        StatsSnapshot {
            system: SystemSnapshot {
                cpu_usage:       cpu.usage,
                memory_percent:  memory.percent,
                memory_used:     memory.used,
                memory_total:    memory.total,
                uptime:          system.uptime.as_ref().and_then(uptime_from_json),
                cpu_temperature: system.cpu_temperature,
            },
            interfaces,
        }
    }
}

/// Numbers are seconds, strings are shown verbatim, anything else is absent.
fn uptime_from_json(value: &Value) -> Option<Uptime> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|s| s.is_finite() && *s >= 0.0 && *s < u64::MAX as f64)
            .map(|s| Uptime::Seconds(s as u64)),
        Value::String(s) => Some(Uptime::Text(s.clone())),
        Value::Object(_) => seconds_from_parts(value).map(Uptime::Seconds),
        _ => None,
    }
}

/// `{days, hours, minutes, seconds}` → total seconds. `None` on overflow.
fn seconds_from_parts(value: &Value) -> Option<u64> {
    let obj = value.as_object()?;
    let part = |key: &str| obj.get(key).and_then(Value::as_u64).unwrap_or(0);
    if ["days", "hours", "minutes", "seconds"].iter().all(|k| !obj.contains_key(*k)) {
        return None;
    }
    part("days")
        .checked_mul(86_400)?
        .checked_add(part("hours").checked_mul(3_600)?)?
        .checked_add(part("minutes").checked_mul(60)?)?
        .checked_add(part("seconds"))
}

// ── Network usage history ────────────────────────────────────────────────────

/// `GET /dashboard/api/network_usage_history`
#[derive(Debug, Default, Deserialize)]
pub struct UsageHistoryPayload {
    #[serde(default)]
    pub timestamps:   Vec<String>,
    #[serde(default)]
    pub wan_download: Vec<f64>,
    #[serde(default)]
    pub wan_upload:   Vec<f64>,
}

impl UsageHistoryPayload {
    pub fn into_core(self) -> UsageHistory {
        UsageHistory {
            timestamps: self.timestamps,
            download:   self.wan_download,
            upload:     self.wan_upload,
        }
    }
}

// ── PBX status ────────────────────────────────────────────────────────────────

/// `GET /api/freeswitch/status` and `GET /api/v1/freeswitch/status`.
///
/// The first answers `{status: "success", data: {...}}`, the second
/// `{success: true, status: {...}}`. A body with a `success` flag is always
/// the second shape, even when its failure `status` is a plain string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PbxStatusPayload {
    Flagged {
        success: bool,
        #[serde(default)]
        status:  Option<Value>,
        #[serde(default)]
        error:   Option<String>,
        #[serde(default)]
        message: Option<String>,
    },
    Wrapped {
        status: String,
        #[serde(default)]
        data:   Option<PbxData>,
        #[serde(default)]
        message: Option<String>,
    },
}

#[derive(Debug, Default, Deserialize)]
pub struct PbxData {
    #[serde(default)]
    pub installed:     Option<bool>,
    #[serde(default)]
    pub running:       bool,
    #[serde(default)]
    pub version:       Option<String>,
    #[serde(default)]
    pub uptime:        Option<Value>,
    #[serde(default, alias = "active_calls")]
    pub calls:         Option<u64>,
    #[serde(default)]
    pub channels:      Option<u64>,
    #[serde(default, alias = "sip_registrations")]
    pub registrations: Option<u64>,
}

impl PbxStatusPayload {
    /// `Err` carries the console's own failure text.
    pub fn into_core(self) -> Result<PbxStatus, String> {
        let data = match self {
            Self::Wrapped { status, data, message } => {
                if status != "success" {
                    return Err(message.unwrap_or(status));
                }
                data.unwrap_or_default()
            }
            Self::Flagged { success, status, error, message } => {
                if !success {
                    return Err(error.or(message).unwrap_or_else(|| "unknown error".to_string()));
                }
                match status {
                    Some(value @ Value::Object(_)) => {
                        serde_json::from_value(value).map_err(|e| format!("invalid PBX status: {e}"))?
                    }
                    _ => PbxData::default(),
                }
            }
        };

        let uptime_secs = data.uptime.as_ref().and_then(|v| match uptime_from_json(v) {
            Some(Uptime::Seconds(s)) => Some(s),
            _ => None,
        });

        Ok(PbxStatus {
            installed: data.installed,
            running: data.running,
            version: data.version,
            uptime_secs,
            calls: data.calls,
            channels: data.channels,
            registrations: data.registrations,
        })
    }
}

// ── `{success, ...}` envelopes ───────────────────────────────────────────────

/// Common `{success, message, error, ...}` wrapper used by most endpoints.
#[derive(Debug, Deserialize)]
pub struct Flagged<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error:   Option<String>,
    #[serde(flatten)]
    pub body:    T,
}

impl<T> Flagged<T> {
    /// Unwrap the body, or the console's failure text.
    pub fn into_result(self) -> Result<T, String> {
        if self.success {
            Ok(self.body)
        } else {
            Err(self
                .message
                .or(self.error)
                .unwrap_or_else(|| "unknown error".to_string()))
        }
    }
}

/// `GET /freeswitch/registrations`
#[derive(Debug, Default, Deserialize)]
pub struct RegistrationsBody {
    #[serde(default)]
    pub registrations: Vec<Registration>,
}

/// `GET /network/scan_wifi`
#[derive(Debug, Default, Deserialize)]
pub struct WifiScanBody {
    #[serde(default)]
    pub networks: Vec<WifiNetwork>,
}

/// `GET /network/interface/{id}/stats`
#[derive(Debug, Default, Deserialize)]
pub struct InterfaceStatsBody {
    #[serde(default)]
    pub stats: BTreeMap<String, Value>,
}

impl InterfaceStatsBody {
    /// Render every scalar stat as display text; `null`s and nested values are dropped.
    pub fn into_core(self) -> BTreeMap<String, String> {
        self.stats
            .into_iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b)   => b.to_string(),
                    _ => return None,
                };
                Some((key, text))
            })
            .collect()
    }
}

/// `POST /network/restart`, `POST /freeswitch/restart`
#[derive(Debug, Default, Deserialize)]
pub struct ActionBody {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stats_full_payload() {
        let raw = json!({
            "system": {
                "cpu": {"usage": 12.5},
                "memory": {"percent": 40.0, "used": 1024, "total": 4096},
                "uptime": 3600,
                "cpu_temperature": 51.3
            },
            "network": {
                "interfaces": {
                    "wan": {"bytes_recv": 100, "bytes_sent": 50},
                    "lan": {"bytes_recv": 7}
                },
                "total": {"bytes_recv": 107}
            }
        });
        let snap = serde_json::from_value::<StatsPayload>(raw).unwrap().into_core();
        assert_eq!(snap.system.cpu_usage, Some(12.5));
        assert_eq!(snap.system.memory_total, Some(4096));
        assert_eq!(snap.system.uptime, Some(Uptime::Seconds(3600)));
        assert_eq!(snap.interfaces.len(), 1);
        assert_eq!(snap.interfaces["wan"].bytes_sent, 50);
    }

    #[test]
    fn stats_missing_sections_stay_absent() {
        let snap = serde_json::from_value::<StatsPayload>(json!({"system": {"cpu_temperature": null}}))
            .unwrap()
            .into_core();
        assert_eq!(snap.system, SystemSnapshot::default());
        assert!(snap.interfaces.is_empty());
    }

    #[test]
    fn uptime_text_and_parts() {
        assert_eq!(uptime_from_json(&json!("3 days")), Some(Uptime::Text("3 days".into())));
        assert_eq!(
            uptime_from_json(&json!({"days": 1, "hours": 2, "minutes": 3, "seconds": 4})),
            Some(Uptime::Seconds(93_784))
        );
        assert_eq!(uptime_from_json(&json!(-5)), None);
        assert_eq!(uptime_from_json(&json!({"foo": 1})), None);
    }

    #[test]
    fn oversized_uptime_is_absent() {
        assert_eq!(uptime_from_json(&json!({"days": u64::MAX})), None);
        assert_eq!(uptime_from_json(&json!({"hours": u64::MAX / 2, "seconds": u64::MAX})), None);
        assert_eq!(uptime_from_json(&json!(1e300)), None);

        let raw = json!({"system": {"cpu": {"usage": 5.0}, "uptime": {"days": u64::MAX}}});
        let snap = serde_json::from_value::<StatsPayload>(raw).unwrap().into_core();
        assert_eq!(snap.system.uptime, None);
        assert_eq!(snap.system.cpu_usage, Some(5.0));

        let raw = json!({"success": true, "status": {"running": true, "uptime": {"days": u64::MAX}}});
        let status = serde_json::from_value::<PbxStatusPayload>(raw).unwrap().into_core().unwrap();
        assert!(status.running);
        assert_eq!(status.uptime_secs, None);
    }

    #[test]
    fn pbx_wrapped_shape() {
        let raw = json!({"status": "success", "data": {"installed": true, "running": true, "version": "1.10.9"}});
        let status = serde_json::from_value::<PbxStatusPayload>(raw).unwrap().into_core().unwrap();
        assert!(status.running);
        assert_eq!(status.installed, Some(true));
        assert_eq!(status.version.as_deref(), Some("1.10.9"));
    }

    #[test]
    fn pbx_flagged_shape() {
        let raw = json!({
            "success": true,
            "status": {
                "running": true,
                "uptime": {"days": 0, "hours": 0, "minutes": 5, "seconds": 32},
                "active_calls": 2,
                "sip_registrations": 4
            }
        });
        let status = serde_json::from_value::<PbxStatusPayload>(raw).unwrap().into_core().unwrap();
        assert_eq!(status.uptime_secs, Some(332));
        assert_eq!(status.calls, Some(2));
        assert_eq!(status.registrations, Some(4));
    }

    #[test]
    fn pbx_failure_is_reported() {
        let raw = json!({"success": false, "error": "not installed"});
        let err = serde_json::from_value::<PbxStatusPayload>(raw).unwrap().into_core().unwrap_err();
        assert_eq!(err, "not installed");

        let raw = json!({"status": "error", "message": "boom"});
        let err = serde_json::from_value::<PbxStatusPayload>(raw).unwrap().into_core().unwrap_err();
        assert_eq!(err, "boom");
    }

    #[test]
    fn flagged_failure_with_string_status_keeps_the_error() {
        let raw = json!({"success": false, "status": "error", "error": "FreeSWITCH is not running"});
        let err = serde_json::from_value::<PbxStatusPayload>(raw).unwrap().into_core().unwrap_err();
        assert_eq!(err, "FreeSWITCH is not running");

        let raw = json!({"success": false, "status": "error", "message": "timeout"});
        let err = serde_json::from_value::<PbxStatusPayload>(raw).unwrap().into_core().unwrap_err();
        assert_eq!(err, "timeout");
    }

    #[test]
    fn flagged_registrations() {
        let raw = json!({"success": true, "registrations": [{"extension": "101", "ip": "10.0.0.5", "user_agent": "Yealink"}]});
        let regs = serde_json::from_value::<Flagged<RegistrationsBody>>(raw)
            .unwrap()
            .into_result()
            .unwrap()
            .registrations;
        assert_eq!(regs.len(), 1);
        assert_eq!(regs[0].user_agent, "Yealink");
    }

    #[test]
    fn flagged_failure_prefers_message() {
        let raw = json!({"success": false, "message": "X", "error": "Y"});
        let err = serde_json::from_value::<Flagged<ActionBody>>(raw).unwrap().into_result().unwrap_err();
        assert_eq!(err, "X");
    }

    #[test]
    fn interface_stats_render_scalars() {
        let raw = json!({"success": true, "stats": {"rx_packets": 42, "state": "up", "carrier": true, "extra": null, "nested": {"a": 1}}});
        let stats = serde_json::from_value::<Flagged<InterfaceStatsBody>>(raw)
            .unwrap()
            .into_result()
            .unwrap()
            .into_core();
        assert_eq!(stats.len(), 3);
        assert_eq!(stats["rx_packets"], "42");
        assert_eq!(stats["carrier"], "true");
    }
}
