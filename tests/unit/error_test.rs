//! Tests for error types

use monitor_supervisor::core::{CycleError, MonitorKind, SupervisorError};
use std::time::Duration;

#[test]
fn test_already_running_error() {
    let err = SupervisorError::AlreadyRunning(MonitorKind::Compliance);
    assert_eq!(format!("{}", err), "compliance monitor is already running");
    assert_eq!(err.as_label(), "already_running");
}

#[test]
fn test_unknown_kind_error() {
    let err = SupervisorError::UnknownKind("printer".to_string());
    assert_eq!(format!("{}", err), "unknown monitor kind: printer");
}

#[test]
fn test_spawn_error() {
    let err = SupervisorError::Spawn {
        kind: MonitorKind::DbMaintenance,
        reason: "resource temporarily unavailable".to_string(),
    };
    assert_eq!(
        format!("{}", err),
        "failed to spawn db_maintenance monitor thread: resource temporarily unavailable"
    );
    assert_eq!(err.as_label(), "spawn_failed");
}

#[test]
fn test_cycle_errors() {
    assert_eq!(CycleError::failed("ssh refused").to_string(), "cycle failed: ssh refused");
    assert_eq!(
        CycleError::Timeout(Duration::from_secs(30)).to_string(),
        "cycle timed out after 30s"
    );
}
