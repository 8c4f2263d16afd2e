//! Engine mapping tables: one per control mode.
//!
//! Each engine is a mapping from the current landmark frame (plus its
//! private axis-filter state) to a [`DesiredState`]. Exactly one engine is
//! active at a time; switching modes resets all engine, filter, and latch
//! state so no lock or hold carries over.

pub mod flight;
pub mod racing_hands;
pub mod racing_posture;
pub mod shooter;

use crate::config::Config;
use crate::landmarks::LandmarkFrame;
use crate::latch::DesiredState;
use crate::session_log::SessionLog;
use crate::Result;
use std::fmt;
use std::time::Instant;

/// The four mutually-exclusive control modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    Shooter,
    RacingHands,
    RacingPosture,
    Flight,
}

impl EngineKind {
    /// Parse a mode identifier as supplied by the mode-select surface
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "shooter" => Some(Self::Shooter),
            "racing" | "racing-hands" => Some(Self::RacingHands),
            "posture" | "racing-posture" => Some(Self::RacingPosture),
            "flight" => Some(Self::Flight),
            _ => None,
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shooter => write!(f, "shooter"),
            Self::RacingHands => write!(f, "racing-hands"),
            Self::RacingPosture => write!(f, "racing-posture"),
            Self::Flight => write!(f, "flight"),
        }
    }
}

/// A mode's mapping table plus its private filter state
pub trait Engine: Send {
    /// Map one landmark frame to the desired control state.
    ///
    /// Absent hands or body contribute nothing to their axes; the returned
    /// state is validated against exclusive-pair conflicts before it
    /// reaches the latch.
    fn update(&mut self, frame: &LandmarkFrame, now: Instant, log: &mut SessionLog) -> Result<DesiredState>;

    /// Clear all private filter state
    fn reset(&mut self);

    fn kind(&self) -> EngineKind;
}

/// Build the engine for a mode from configuration
#[must_use]
pub fn create_engine(kind: EngineKind, config: &Config) -> Box<dyn Engine> {
    match kind {
        EngineKind::Shooter => Box::new(shooter::ShooterEngine::new(config.shooter.clone())),
        EngineKind::RacingHands => Box::new(racing_hands::RacingHandsEngine::new(config.racing.clone())),
        EngineKind::RacingPosture => {
            Box::new(racing_posture::RacingPostureEngine::new(config.posture.clone()))
        }
        EngineKind::Flight => Box::new(flight::FlightEngine::new(config.flight.clone())),
    }
}
