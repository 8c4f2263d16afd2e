//! Scenario tests for the axis conditioning filters: jittery input sequences
//! must produce stable outputs.

use gesture_controller::axis::{AxisConfig, AxisFilter, Zone, ZoneConfig, ZoneFilter};

#[test]
fn throttle_lock_engages_on_steady_input() {
    let mut filter = AxisFilter::new(AxisConfig {
        deadzone: 0.0,
        lock_tolerance: Some(1.0),
        lock_samples: 1,
    });

    // First sample is taken as-is
    assert_eq!(filter.update(40.0), (40.0, true));
    assert!(!filter.is_locked());

    // A full tolerance step does not lock
    assert_eq!(filter.update(41.0), (41.0, true));
    assert!(!filter.is_locked());

    // A sub-tolerance step does
    let (value, _) = filter.update(40.5);
    assert!((value - 40.5).abs() < 1e-12);
    assert!(filter.is_locked());

    // Locked: further input is ignored
    assert_eq!(filter.update(95.0), (40.5, false));
    assert_eq!(filter.update(0.0), (40.5, false));

    // Unlock: the next sample applies again
    filter.unlock();
    assert_eq!(filter.update(95.0), (95.0, true));
}

#[test]
fn lock_requires_sustained_stability() {
    let mut filter = AxisFilter::new(AxisConfig {
        deadzone: 0.0,
        lock_tolerance: Some(1.0),
        lock_samples: 3,
    });

    filter.update(50.0);
    filter.update(50.2);
    filter.update(50.4);
    assert!(!filter.is_locked()); // only two in-tolerance steps

    filter.update(50.3);
    assert!(filter.is_locked());
}

#[test]
fn jitter_at_the_zone_boundary_never_chatters() {
    // Steering threshold 8 with a 2-degree hysteresis band
    let mut filter = ZoneFilter::new(ZoneConfig {
        threshold: 8.0,
        margin: 2.0,
    });

    // Oscillation right at the threshold stays in Center
    for _ in 0..20 {
        assert_eq!(filter.update(7.9), Zone::Center);
        assert_eq!(filter.update(8.1), Zone::Center);
    }

    // A decisive push crosses into High
    assert_eq!(filter.update(10.5), Zone::High);

    // The same oscillation now stays in High: exit needs < 6
    for _ in 0..20 {
        assert_eq!(filter.update(7.9), Zone::High);
        assert_eq!(filter.update(8.1), Zone::High);
    }

    // Dropping below the exit threshold recenters
    assert_eq!(filter.update(5.0), Zone::Center);
}

#[test]
fn zone_filter_is_symmetric() {
    let mut filter = ZoneFilter::new(ZoneConfig {
        threshold: 8.0,
        margin: 2.0,
    });

    assert_eq!(filter.update(-10.5), Zone::Low);
    assert_eq!(filter.update(-7.0), Zone::Low); // inside the hysteresis band
    assert_eq!(filter.update(-5.0), Zone::Center);
}

#[test]
fn zone_filter_handles_a_hard_swing() {
    let mut filter = ZoneFilter::new(ZoneConfig {
        threshold: 8.0,
        margin: 2.0,
    });

    // Low to High in one sample, no intermediate Center required
    assert_eq!(filter.update(-15.0), Zone::Low);
    assert_eq!(filter.update(15.0), Zone::High);
    assert_eq!(filter.update(-15.0), Zone::Low);
}

#[test]
fn deadzone_and_lock_compose() {
    let mut filter = AxisFilter::new(AxisConfig {
        deadzone: 0.5,
        lock_tolerance: Some(0.1),
        lock_samples: 2,
    });

    filter.update(10.0);
    // Deadzone-sized wiggle holds the value but spoils the lock streak
    assert_eq!(filter.update(10.4), (10.0, false));
    assert!(!filter.is_locked());

    // Two sub-tolerance samples against the stable value lock it
    assert_eq!(filter.update(10.05), (10.0, false));
    assert!(!filter.is_locked());
    let (value, _) = filter.update(10.08);
    assert!(filter.is_locked());
    assert!((value - 10.08).abs() < 1e-12);
}
