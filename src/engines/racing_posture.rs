//! Racing engine driven by upper-body posture.
//!
//! Head lean (nose offset from the shoulder midpoint) steers; a strong lean
//! pulses a spin move, a raised right wrist jumps, a raised left wrist
//! brakes.

use crate::config::PostureConfig;
use crate::gestures::classify_pose;
use crate::landmarks::LandmarkFrame;
use crate::latch::{Action, DesiredState};
use crate::session_log::SessionLog;
use crate::Result;
use crate::axis::{Zone, ZoneConfig, ZoneFilter};
use crate::engines::{Engine, EngineKind};
use std::time::Instant;

pub struct RacingPostureEngine {
    config: PostureConfig,
    steer: ZoneFilter,
}

impl RacingPostureEngine {
    #[must_use]
    pub fn new(config: PostureConfig) -> Self {
        let zone = ZoneConfig {
            threshold: config.steer_threshold,
            margin: config.steer_margin,
        };
        Self {
            config,
            steer: ZoneFilter::new(zone),
        }
    }
}

impl Engine for RacingPostureEngine {
    fn update(&mut self, frame: &LandmarkFrame, _now: Instant, log: &mut SessionLog) -> Result<DesiredState> {
        let mut desired = DesiredState::new();

        // No body tracked: no contribution, steering re-centers
        let Some(body) = &frame.body else {
            self.steer.reset();
            return Ok(desired);
        };
        let reading = classify_pose(body);

        match self.steer.update(reading.nose_offset) {
            Zone::Low => desired.hold(Action::SteerLeft),
            Zone::High => desired.hold(Action::SteerRight),
            Zone::Center => {}
        }

        // A hard lean past the spin threshold pulses the spin move; the
        // latch cooldown keeps it from re-firing every tick
        if reading.nose_offset > self.config.spin_threshold {
            desired.pulse(Action::Spin);
            log.record(
                "Spin",
                &format!("{:.2}", reading.nose_offset),
                "Ease Lean",
                "Trick Bonus",
            );
        }

        if reading.right_wrist_raised {
            desired.pulse(Action::Jump);
        }

        if reading.left_wrist_raised {
            desired.hold(Action::Brake);
        }

        desired.validate()?;
        Ok(desired)
    }

    fn reset(&mut self) {
        self.steer.reset();
    }

    fn kind(&self) -> EngineKind {
        EngineKind::RacingPosture
    }
}
