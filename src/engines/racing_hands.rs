//! Racing engine driven by two hands on an imaginary wheel.
//!
//! Steering comes from the relative angle between the palms, discretized
//! with hysteresis. Throttle is automatic while both hands are tracked; a
//! double peace sign brakes, a double fist pulses nitro.

use crate::config::RacingConfig;
use crate::constants::DEFAULT_PINCH_DISTANCE;
use crate::gestures::{classify_hand, relative_angle_degrees, Gesture};
use crate::landmarks::LandmarkFrame;
use crate::latch::{Action, DesiredState};
use crate::session_log::SessionLog;
use crate::Result;
use crate::axis::{Zone, ZoneConfig, ZoneFilter};
use crate::engines::{Engine, EngineKind};
use std::time::Instant;

/// Per-tick steering angle change (degrees) logged as a jerk
const STEER_JERK_DEG: f64 = 30.0;

pub struct RacingHandsEngine {
    steer: ZoneFilter,
    last_angle: Option<f64>,
}

impl RacingHandsEngine {
    #[must_use]
    pub fn new(config: RacingConfig) -> Self {
        Self {
            steer: ZoneFilter::new(ZoneConfig {
                threshold: config.steer_threshold_deg,
                margin: config.steer_margin_deg,
            }),
            last_angle: None,
        }
    }
}

impl Engine for RacingHandsEngine {
    fn update(&mut self, frame: &LandmarkFrame, _now: Instant, log: &mut SessionLog) -> Result<DesiredState> {
        let mut desired = DesiredState::new();
        let hands = frame.sorted_hands();

        // The wheel needs both hands; with fewer, everything releases
        if hands.len() != 2 {
            self.steer.reset();
            self.last_angle = None;
            return Ok(desired);
        }
        let (left, right) = (hands[0], hands[1]);

        let angle = relative_angle_degrees(left.palm_center(), right.palm_center());
        match self.steer.update(angle) {
            Zone::High => desired.hold(Action::SteerRight),
            Zone::Low => desired.hold(Action::SteerLeft),
            Zone::Center => {}
        }

        if let Some(last) = self.last_angle {
            if (angle - last).abs() > STEER_JERK_DEG {
                log.record("Steer Jerk", &format!("{angle:.0}deg"), "Smooth Hands", "Stability");
            }
        }
        self.last_angle = Some(angle);

        let (_, left_gesture) = classify_hand(left, DEFAULT_PINCH_DISTANCE);
        let (_, right_gesture) = classify_hand(right, DEFAULT_PINCH_DISTANCE);

        // Double peace sign brakes and overrides the auto-throttle
        if left_gesture == Gesture::Peace && right_gesture == Gesture::Peace {
            desired.hold(Action::Brake);
            log.record("Brake", "Manual Input", "Corner Entry", "Speed Check");
        } else {
            desired.hold(Action::Accelerate);
        }

        if left_gesture == Gesture::Fist && right_gesture == Gesture::Fist {
            desired.pulse(Action::Nitro);
        }

        desired.validate()?;
        Ok(desired)
    }

    fn reset(&mut self) {
        self.steer.reset();
        self.last_angle = None;
    }

    fn kind(&self) -> EngineKind {
        EngineKind::RacingHands
    }
}
