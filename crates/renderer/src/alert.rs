use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Danger,
    Warning,
}

impl AlertKind {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::Danger  => "ERROR",
            Self::Warning => "WARN",
        }
    }
}

/// A transient banner message.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub kind:       AlertKind,
    pub message:    String,
    pub expires_at: Instant,
}

/// Banner messages that disappear after a fixed time.
#[derive(Debug, Clone)]
pub struct AlertQueue {
    ttl:    Duration,
    alerts: Vec<Alert>,
}

impl AlertQueue {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, alerts: Vec::new() }
    }

    pub fn set_ttl(&mut self, ttl: Duration) {
        self.ttl = ttl;
    }

    pub fn push(&mut self, kind: AlertKind, message: impl Into<String>, now: Instant) {
        let message = message.into();
        // The same message raised again just extends its lifetime.
        self.alerts.retain(|a| !(a.kind == kind && a.message == message));
        self.alerts.push(Alert {
            kind,
            message,
            expires_at: now + self.ttl,
        });
    }

    /// Drop every alert whose time is up. Returns how many were removed.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.alerts.len();
        self.alerts.retain(|a| a.expires_at > now);
        before - self.alerts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}
