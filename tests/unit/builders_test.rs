//! Tests for the supervisor builder

use monitor_supervisor::builders::SupervisorBuilder;
use monitor_supervisor::config::SupervisorConfig;
use monitor_supervisor::core::{CycleReport, FnCycle, MonitorCycle, MonitorKind, SupervisorError};
use std::time::Duration;

fn factory(_kind: MonitorKind) -> Option<Box<dyn MonitorCycle>> {
    Some(Box::new(FnCycle::new(|| Ok(CycleReport::ok()))))
}

#[test]
fn test_builder_applies_interval() {
    let supervisor = SupervisorBuilder::new()
        .with_interval(MonitorKind::Host, Duration::from_secs(15))
        .build(factory)
        .unwrap();
    assert_eq!(
        supervisor.config().interval_for(MonitorKind::Host),
        Duration::from_secs(15)
    );
}

#[test]
fn test_builder_rejects_invalid_config() {
    let result = SupervisorBuilder::new()
        .with_config(SupervisorConfig::new().with_thread_name_prefix(""))
        .build(factory);
    assert!(matches!(result, Err(SupervisorError::InvalidConfig(_))));
}

#[test]
fn test_builder_keeps_sub_second_interval() {
    let supervisor = SupervisorBuilder::new()
        .with_interval(MonitorKind::Host, Duration::from_millis(1500))
        .with_interval(MonitorKind::Worker, Duration::from_millis(500))
        .build(factory)
        .unwrap();

    supervisor.start(MonitorKind::Host, None).unwrap();
    assert_eq!(
        supervisor.snapshot(MonitorKind::Host).unwrap().interval,
        Duration::from_millis(1500)
    );
    supervisor.start(MonitorKind::Worker, None).unwrap();
    assert_eq!(
        supervisor.snapshot(MonitorKind::Worker).unwrap().interval,
        Duration::from_millis(500)
    );
    supervisor.shutdown();
}
