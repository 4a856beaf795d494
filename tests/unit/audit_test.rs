//! Tests for audit sink

use monitor_supervisor::core::{
    build_audit_event, AuditAction, AuditSink, InMemoryAuditSink, MonitorKind,
};
use uuid::Uuid;

#[test]
fn test_in_memory_audit_sink() {
    let sink = InMemoryAuditSink::new(10);
    let run_id = Uuid::new_v4();

    sink.record(build_audit_event(
        MonitorKind::Host,
        AuditAction::Started,
        run_id,
        Some("interval_ms=60000".to_string()),
    ));
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].kind, MonitorKind::Host);
    assert_eq!(events[0].action, AuditAction::Started);
    assert_eq!(events[0].run_id, run_id);
    assert!(events[0].created_at_ms > 0);
}

#[test]
fn test_audit_sink_overflow() {
    let sink = InMemoryAuditSink::new(2);
    let run_id = Uuid::new_v4();

    sink.record(build_audit_event(MonitorKind::Device, AuditAction::Started, run_id, None));
    sink.record(build_audit_event(MonitorKind::Device, AuditAction::StopRequested, run_id, None));
    sink.record(build_audit_event(MonitorKind::Device, AuditAction::Stopped, run_id, None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].action, AuditAction::StopRequested); // First one popped
    assert_eq!(events[1].action, AuditAction::Stopped);
}

#[test]
fn test_clones_share_buffer() {
    let sink = InMemoryAuditSink::new(8);
    let other = sink.clone();
    let terminate = AuditAction::TerminateRequested;
    other.record(build_audit_event(MonitorKind::Worker, terminate, Uuid::new_v4(), None));
    other.record(build_audit_event(MonitorKind::Host, AuditAction::Started, Uuid::new_v4(), None));

    assert_eq!(sink.events().len(), 2);
    assert_eq!(sink.events_for(MonitorKind::Worker).len(), 1);
}

#[test]
fn test_audit_action_display() {
    assert_eq!(AuditAction::TerminateRequested.to_string(), "terminate_requested");
    assert_eq!(AuditAction::StopRequested.to_string(), "stop_requested");
}
