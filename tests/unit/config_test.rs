//! Tests for configuration validation

use monitor_supervisor::config::SupervisorConfig;
use monitor_supervisor::core::MonitorKind;
use std::time::Duration;

#[test]
fn test_default_config_is_valid() {
    let config = SupervisorConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.thread_name_prefix, "monitor");
    assert!(config.intervals_ms.is_empty());
}

#[test]
fn test_zero_interval_invalid() {
    let config = SupervisorConfig::new().with_interval(MonitorKind::Host, Duration::ZERO);
    assert!(config.validate().is_err());
}

#[test]
fn test_sub_second_override_round_trips() {
    let config = SupervisorConfig::new()
        .with_interval(MonitorKind::Host, Duration::from_millis(1500))
        .with_interval(MonitorKind::Worker, Duration::from_millis(500));
    assert!(config.validate().is_ok());
    assert_eq!(config.interval_for(MonitorKind::Host), Duration::from_millis(1500));
    assert_eq!(config.interval_for(MonitorKind::Worker), Duration::from_millis(500));
}

#[test]
fn test_empty_prefix_invalid() {
    let config = SupervisorConfig::new().with_thread_name_prefix("  ");
    assert!(config.validate().is_err());
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "intervals_ms": {
            "device": 30000,
            "db_maintenance": 900000,
            "host": 250
        },
        "thread_stack_size": 1048576,
        "thread_name_prefix": "quokka"
    }"#;

    let config = SupervisorConfig::from_json_str(json).unwrap();
    assert_eq!(config.interval_for(MonitorKind::Device), Duration::from_secs(30));
    assert_eq!(config.interval_for(MonitorKind::DbMaintenance), Duration::from_secs(900));
    assert_eq!(config.interval_for(MonitorKind::Host), Duration::from_millis(250));
    assert_eq!(config.interval_for(MonitorKind::Discovery), Duration::from_secs(3_600));
    assert_eq!(config.thread_stack_size, 1_048_576);
    assert_eq!(config.audit_buffer, 256);
}

#[test]
fn test_config_from_json_unknown_kind() {
    let json = r#"{ "intervals_ms": { "printer": 30 } }"#;
    let err = SupervisorConfig::from_json_str(json).unwrap_err();
    assert!(err.starts_with("parse error"));
}

#[test]
fn test_config_from_json_zero_interval() {
    let json = r#"{ "intervals_ms": { "host": 0 } }"#;
    assert!(SupervisorConfig::from_json_str(json).is_err());
}

#[test]
fn test_config_from_env_defaults() {
    // No MONITOR_* variables are set in the test environment.
    let config = SupervisorConfig::from_env().unwrap();
    assert_eq!(config.interval_for(MonitorKind::Configuration), Duration::from_secs(604_800));
}
