//! Shooter engine: dual virtual joysticks.
//!
//! The leftmost hand is a WASD joystick around a fixed movement center; the
//! rightmost hand aims the pointer around a fixed aim center, fires while
//! clenched into a fist, and reloads on an open hand.

use crate::config::ShooterConfig;
use crate::constants::DEFAULT_PINCH_DISTANCE;
use crate::gestures::{classify_hand, Gesture};
use crate::landmarks::LandmarkFrame;
use crate::latch::{Action, DesiredState};
use crate::session_log::SessionLog;
use crate::Result;
use crate::axis::{Zone, ZoneConfig, ZoneFilter};
use crate::engines::{Engine, EngineKind};
use log::debug;
use std::time::Instant;

/// Aim delta magnitude (pixels) beyond which a fast-aim event is logged
const FAST_AIM_PIXELS: f64 = 50.0;

pub struct ShooterEngine {
    config: ShooterConfig,
    move_x: ZoneFilter,
    move_y: ZoneFilter,
    was_firing: bool,
}

impl ShooterEngine {
    #[must_use]
    pub fn new(config: ShooterConfig) -> Self {
        let zone = ZoneConfig {
            threshold: config.move_deadzone,
            margin: config.move_margin,
        };
        Self {
            config,
            move_x: ZoneFilter::new(zone),
            move_y: ZoneFilter::new(zone),
            was_firing: false,
        }
    }
}

impl Engine for ShooterEngine {
    fn update(&mut self, frame: &LandmarkFrame, _now: Instant, log: &mut SessionLog) -> Result<DesiredState> {
        let mut desired = DesiredState::new();
        let hands = frame.sorted_hands();

        // Leftmost hand: movement joystick, independent X/Y axes
        if let Some(off_hand) = hands.first() {
            let palm = off_hand.palm_center();
            match self.move_y.update(palm.y - self.config.move_center_y) {
                Zone::Low => desired.hold(Action::MoveForward),
                Zone::High => desired.hold(Action::MoveBack),
                Zone::Center => {}
            }
            match self.move_x.update(palm.x - self.config.move_center_x) {
                Zone::Low => desired.hold(Action::StrafeLeft),
                Zone::High => desired.hold(Action::StrafeRight),
                Zone::Center => {}
            }
        } else {
            // No movement hand: the joystick re-centers rather than holding
            // the last direction
            self.move_x.reset();
            self.move_y.reset();
        }

        // Rightmost hand (when two are tracked): aim and combat
        if hands.len() > 1 {
            let dominant = hands[1];
            let palm = dominant.palm_center();

            let dx = palm.x - self.config.aim_center_x;
            let dy = palm.y - self.config.aim_center_y;
            let deadzone = self.config.aim_deadzone;

            let aim_x = if dx.abs() > deadzone {
                (dx - deadzone.copysign(dx)) * self.config.aim_sensitivity
            } else {
                0.0
            };
            let aim_y = if dy.abs() > deadzone {
                (dy - deadzone.copysign(dy)) * self.config.aim_sensitivity
            } else {
                0.0
            };
            if aim_x != 0.0 || aim_y != 0.0 {
                desired.set_aim(aim_x, aim_y);
                if aim_x.abs() > FAST_AIM_PIXELS || aim_y.abs() > FAST_AIM_PIXELS {
                    log.record("Fast Aim", &format!("dx:{aim_x:.0}"), "Reduce Sens", "Precision");
                }
            }

            let (fingers, gesture) = classify_hand(dominant, DEFAULT_PINCH_DISTANCE);

            let firing = gesture == Gesture::Fist;
            if firing {
                desired.hold(Action::Fire);
            }
            if firing && !self.was_firing {
                debug!("Trigger engaged");
                log.record("Trigger", "Fist Clench", "N/A", "Shot Fired");
            }
            self.was_firing = firing;

            if fingers.count() >= 4 {
                desired.pulse(Action::Reload);
            }
        } else {
            self.was_firing = false;
        }

        desired.validate()?;
        Ok(desired)
    }

    fn reset(&mut self) {
        self.move_x.reset();
        self.move_y.reset();
        self.was_firing = false;
    }

    fn kind(&self) -> EngineKind {
        EngineKind::Shooter
    }
}
