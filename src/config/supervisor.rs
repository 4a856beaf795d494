//! Supervisor configuration structures.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::MonitorKind;

/// Default monitor thread stack size (2 MiB).
pub const DEFAULT_STACK_SIZE: usize = 2 * 1024 * 1024;

/// Supervisor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Per-kind interval overrides in milliseconds. Kinds absent here use their default.
    pub intervals_ms: HashMap<MonitorKind, u64>,
    /// Stack size for each monitor thread.
    pub thread_stack_size: usize,
    /// Monitor threads are named `{prefix}-{kind}`.
    pub thread_name_prefix: String,
    /// Capacity of the default in-memory audit buffer.
    pub audit_buffer: usize,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            intervals_ms: HashMap::new(),
            thread_stack_size: DEFAULT_STACK_SIZE,
            thread_name_prefix: "monitor".into(),
            audit_buffer: 256,
        }
    }
}

impl SupervisorConfig {
    /// Create a configuration with defaults for every field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the interval for one kind. Stored with millisecond precision.
    #[must_use]
    pub fn with_interval(mut self, kind: MonitorKind, interval: Duration) -> Self {
        let millis = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self.intervals_ms.insert(kind, millis);
        self
    }

    /// Set the monitor thread stack size.
    #[must_use]
    pub const fn with_thread_stack_size(mut self, size: usize) -> Self {
        self.thread_stack_size = size;
        self
    }

    /// Set the monitor thread name prefix.
    #[must_use]
    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Interval for `kind`: the configured override, else the kind's default.
    #[must_use]
    pub fn interval_for(&self, kind: MonitorKind) -> Duration {
        self.intervals_ms
            .get(&kind)
            .map_or_else(|| kind.default_interval(), |ms| Duration::from_millis(*ms))
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        for (kind, ms) in &self.intervals_ms {
            if *ms == 0 {
                return Err(format!("interval for `{kind}` must be greater than 0"));
            }
        }
        if self.thread_stack_size == 0 {
            return Err("thread_stack_size must be greater than 0".into());
        }
        if self.thread_name_prefix.trim().is_empty() {
            return Err("thread_name_prefix must not be empty".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from the process environment, loading `.env` first if present.
    ///
    /// Reads `MONITOR_<KIND>_INTERVAL_MS` or `MONITOR_<KIND>_INTERVAL_SECS`
    /// (e.g. `MONITOR_DB_MAINTENANCE_INTERVAL_SECS`), `MONITOR_THREAD_STACK_SIZE`
    /// and `MONITOR_THREAD_NAME_PREFIX`. A missing `.env` is fine; a malformed one is an error.
    pub fn from_env() -> Result<Self, String> {
        check_dotenv(dotenvy::dotenv())?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, using the same keys as [`Self::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        for kind in MonitorKind::ALL {
            let upper = kind.as_str().to_ascii_uppercase();
            let ms_key = format!("MONITOR_{upper}_INTERVAL_MS");
            let secs_key = format!("MONITOR_{upper}_INTERVAL_SECS");
            if let Some(raw) = lookup(&ms_key) {
                let ms = parse_u64(&ms_key, &raw)?;
                cfg.intervals_ms.insert(kind, ms);
            } else if let Some(raw) = lookup(&secs_key) {
                let ms = parse_u64(&secs_key, &raw)?
                    .checked_mul(1_000)
                    .ok_or_else(|| format!("{secs_key}: interval too large"))?;
                cfg.intervals_ms.insert(kind, ms);
            }
        }

        if let Some(raw) = lookup("MONITOR_THREAD_STACK_SIZE") {
            cfg.thread_stack_size = raw
                .trim()
                .parse()
                .map_err(|e| format!("MONITOR_THREAD_STACK_SIZE: {e}"))?;
        }
        if let Some(prefix) = lookup("MONITOR_THREAD_NAME_PREFIX") {
            cfg.thread_name_prefix = prefix;
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_u64(key: &str, raw: &str) -> Result<u64, String> {
    raw.trim().parse::<u64>().map_err(|e| format!("{key}: {e}"))
}

/// Treat a missing `.env` as empty and surface every other load error.
fn check_dotenv<T>(result: Result<T, dotenvy::Error>) -> Result<(), String> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(format!(".env: {e}")),
    }
}
