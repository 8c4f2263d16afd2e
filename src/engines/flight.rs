//! Flight engine: lockable throttle plus a two-hand flight stick.
//!
//! A hand held right of the throttle boundary sets throttle from its height,
//! quantized to levels 0-9. Once the hand holds steady the throttle locks
//! and ignores jitter until the hand leaves the zone. Two hands left of the
//! boundary form the stick: vertical delta banks, average height pitches.

use crate::config::FlightConfig;
use crate::landmarks::{HandLandmarks, LandmarkFrame};
use crate::latch::{Action, DesiredState};
use crate::session_log::SessionLog;
use crate::Result;
use crate::axis::{AxisConfig, AxisFilter, Zone, ZoneConfig, ZoneFilter};
use crate::engines::{Engine, EngineKind};
use log::debug;
use std::time::Instant;

pub struct FlightEngine {
    config: FlightConfig,
    throttle: AxisFilter,
    bank: ZoneFilter,
    pitch: ZoneFilter,
}

impl FlightEngine {
    #[must_use]
    pub fn new(config: FlightConfig) -> Self {
        let throttle = AxisFilter::new(AxisConfig {
            deadzone: 0.0,
            lock_tolerance: Some(config.lock_tolerance),
            lock_samples: config.lock_samples,
        });
        let bank = ZoneFilter::new(ZoneConfig {
            threshold: config.bank_threshold,
            margin: config.bank_margin,
        });
        let pitch = ZoneFilter::new(ZoneConfig {
            threshold: config.pitch_threshold,
            margin: config.pitch_margin,
        });
        Self {
            config,
            throttle,
            bank,
            pitch,
        }
    }

    /// Map a throttle hand's height to the 0-100 throttle range, clamping
    /// inside the configured vertical margins
    fn throttle_percent(&self, y: f64) -> f64 {
        let top = self.config.throttle_margin;
        let bottom = 1.0 - self.config.throttle_margin;
        let clamped = y.clamp(top, bottom);
        (bottom - clamped) / (bottom - top) * 100.0
    }
}

impl Engine for FlightEngine {
    fn update(&mut self, frame: &LandmarkFrame, _now: Instant, log: &mut SessionLog) -> Result<DesiredState> {
        let mut desired = DesiredState::new();

        // Split hands at the throttle boundary
        let mut throttle_hand: Option<&HandLandmarks> = None;
        let mut stick_hands: Vec<&HandLandmarks> = Vec::new();
        for hand in frame.sorted_hands() {
            if hand.palm_center().x > self.config.throttle_boundary {
                throttle_hand = Some(hand);
            } else {
                stick_hands.push(hand);
            }
        }

        if let Some(hand) = throttle_hand {
            let raw = self.throttle_percent(hand.palm_center().y);
            let was_locked = self.throttle.is_locked();
            let (stable, _) = self.throttle.update(raw);
            if self.throttle.is_locked() && !was_locked {
                debug!("Throttle locked at {stable:.0}%");
                log.record("Throttle Lock", &format!("{stable:.0}%"), "Hold Steady", "Cruise");
            }

            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let level = ((stable / 10.0) as u8).min(9);
            desired.pulse(Action::Throttle(level));
        } else if self.throttle.is_locked() {
            // Losing the throttle hand is the explicit unlock condition
            debug!("Throttle hand lost, unlocking");
            self.throttle.unlock();
        }

        // The flight stick needs both remaining hands
        if stick_hands.len() == 2 {
            let left_y = stick_hands[0].palm_center().y;
            let right_y = stick_hands[1].palm_center().y;

            match self.bank.update(right_y - left_y) {
                Zone::High => desired.hold(Action::BankRight),
                Zone::Low => desired.hold(Action::BankLeft),
                Zone::Center => {}
            }

            // High hands push the stick (dive), low hands pull it (climb)
            let avg_offset = (left_y + right_y) / 2.0 - 0.5;
            match self.pitch.update(avg_offset) {
                Zone::Low => desired.hold(Action::PitchDown),
                Zone::High => desired.hold(Action::PitchUp),
                Zone::Center => {}
            }
        } else {
            self.bank.reset();
            self.pitch.reset();
        }

        desired.validate()?;
        Ok(desired)
    }

    fn reset(&mut self) {
        self.throttle.reset();
        self.bank.reset();
        self.pitch.reset();
    }

    fn kind(&self) -> EngineKind {
        EngineKind::Flight
    }
}
