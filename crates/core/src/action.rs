use std::fmt;

/// Service actions the console can trigger with a POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceAction {
    RestartNetwork,
    RestartPbx,
}

impl ServiceAction {
    pub const ALL: [Self; 2] = [Self::RestartNetwork, Self::RestartPbx];

    /// Endpoint path, relative to the console base URL.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::RestartNetwork => "/network/restart",
            Self::RestartPbx     => "/freeswitch/restart",
        }
    }

    /// Button label while idle.
    pub fn label(self) -> &'static str {
        match self {
            Self::RestartNetwork => "Restart network",
            Self::RestartPbx     => "Restart PBX",
        }
    }

    /// Button label while the request is in flight.
    pub fn pending_label(self) -> &'static str {
        match self {
            Self::RestartNetwork => "Restarting network…",
            Self::RestartPbx     => "Starting PBX…",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Self::RestartNetwork => "Network services restarted successfully.",
            Self::RestartPbx     => "PBX started successfully.",
        }
    }

    /// Prefix of the alert shown when the action fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::RestartNetwork => "Error while restarting network services",
            Self::RestartPbx     => "Error while starting the PBX",
        }
    }
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RestartNetwork => f.write_str("restart-network"),
            Self::RestartPbx     => f.write_str("restart-pbx"),
        }
    }
}
