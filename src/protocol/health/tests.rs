//! Unit tests for change-only bus health reporting.
use super::*;

#[test]
/// A healthy bus polled repeatedly never reports.
fn test_unchanged_poll_is_silent() {
    let mut monitor = BusHealthMonitor::new();
    for _ in 0..3 {
        assert_eq!(monitor.observe(BusStatus::default()), None);
    }
}

#[test]
/// Each of the four fields triggers a report on its own.
fn test_each_field_reports_change() {
    let mut monitor = BusHealthMonitor::new();
    let mut status = BusStatus::default();

    status.code = 3;
    assert_eq!(monitor.observe(status), Some(status));
    status.tx_errors = 1;
    assert_eq!(monitor.observe(status), Some(status));
    status.rx_errors = 7;
    assert_eq!(monitor.observe(status), Some(status));
    status.other_errors = 2;
    assert_eq!(monitor.observe(status), Some(status));

    assert_eq!(monitor.observe(status), None);
    assert_eq!(monitor.last(), status);
}

#[test]
/// Going back to a previous value is a change too.
fn test_recovery_reports() {
    let mut monitor = BusHealthMonitor::new();
    let faulty = BusStatus {
        code: 1,
        tx_errors: 4,
        rx_errors: 0,
        other_errors: 0,
    };
    assert!(monitor.observe(faulty).is_some());
    assert_eq!(
        monitor.observe(BusStatus::default()),
        Some(BusStatus::default())
    );
}
