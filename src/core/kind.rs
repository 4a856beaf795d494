//! Monitor kinds and the groups they are started and stopped in.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::SupervisorError;

/// One of the fixed background monitors the supervisor owns a slot for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorKind {
    /// Device reachability polling.
    Device,
    /// Configuration compliance checks.
    Compliance,
    /// Configuration backup.
    Configuration,
    /// Host liveness.
    Host,
    /// Service checks.
    Service,
    /// Topology discovery.
    Discovery,
    /// Summary aggregation.
    Summaries,
    /// Worker-pool health.
    Worker,
    /// Database maintenance.
    DbMaintenance,
}

impl MonitorKind {
    /// Number of kinds, and so of supervisor slots.
    pub const COUNT: usize = 9;

    /// Every kind, in slot order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Device,
        Self::Compliance,
        Self::Configuration,
        Self::Host,
        Self::Service,
        Self::Discovery,
        Self::Summaries,
        Self::Worker,
        Self::DbMaintenance,
    ];

    /// Position of this kind's slot in [`MonitorKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable snake-case name, used in logs, config keys and env vars.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Device => "device",
            Self::Compliance => "compliance",
            Self::Configuration => "configuration",
            Self::Host => "host",
            Self::Service => "service",
            Self::Discovery => "discovery",
            Self::Summaries => "summaries",
            Self::Worker => "worker",
            Self::DbMaintenance => "db_maintenance",
        }
    }

    /// Interval used when neither the caller nor the config supplies one.
    #[must_use]
    pub const fn default_interval(self) -> Duration {
        let secs = match self {
            Self::Compliance => 300,
            Self::Configuration => 604_800,
            Self::Discovery => 3_600,
            Self::Device
            | Self::Host
            | Self::Service
            | Self::Summaries
            | Self::Worker
            | Self::DbMaintenance => 60,
        };
        Duration::from_secs(secs)
    }
}

impl fmt::Display for MonitorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MonitorKind {
    type Err = SupervisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| SupervisorError::UnknownKind(s.to_string()))
    }
}

/// Kinds that share a monitoring domain and are started and stopped together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorGroup {
    /// Device, compliance and configuration monitors.
    Device,
}

impl MonitorGroup {
    /// Members in declared order. Group starts and joins follow this order.
    #[must_use]
    pub const fn members(self) -> &'static [MonitorKind] {
        match self {
            Self::Device => &[
                MonitorKind::Device,
                MonitorKind::Compliance,
                MonitorKind::Configuration,
            ],
        }
    }

    /// Human-readable description for status lines.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Device => "device monitoring threads (device, configuration and compliance)",
        }
    }
}
