//! Tests for monitor kinds and groups

use monitor_supervisor::core::{MonitorGroup, MonitorKind};

#[test]
fn test_all_kinds_are_distinct() {
    let mut names: Vec<&str> = MonitorKind::ALL.iter().map(|k| k.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), 9);
}

#[test]
fn test_kind_serde_names() {
    let json = serde_json::to_string(&MonitorKind::DbMaintenance).unwrap();
    assert_eq!(json, "\"db_maintenance\"");
    let kind: MonitorKind = serde_json::from_str("\"summaries\"").unwrap();
    assert_eq!(kind, MonitorKind::Summaries);
}

#[test]
fn test_group_description_names_members() {
    let text = MonitorGroup::Device.describe();
    for kind in MonitorGroup::Device.members() {
        assert!(text.contains(kind.as_str()));
    }
}
