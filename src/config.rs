//! Configuration management for the gesture controller

use crate::constants::{
    DEFAULT_LOCK_TOLERANCE, DEFAULT_MOVE_DEADZONE, DEFAULT_PINCH_DISTANCE, DEFAULT_QUIT_HOLD_SECS,
    DEFAULT_STEER_MARGIN_DEG, DEFAULT_STEER_THRESHOLD_DEG, DEFAULT_THROTTLE_BOUNDARY,
    DEFAULT_TICK_RATE,
};
use crate::latch::Cooldowns;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dispatcher loop configuration
    pub dispatcher: DispatcherConfig,

    /// Shooter engine configuration
    pub shooter: ShooterConfig,

    /// Racing-by-hands engine configuration
    pub racing: RacingConfig,

    /// Racing-by-posture engine configuration
    pub posture: PostureConfig,

    /// Flight engine configuration
    pub flight: FlightConfig,
}

/// Dispatcher loop parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Target tick rate in Hz
    pub tick_rate: u32,

    /// Continuous pinch hold required to confirm quit, seconds
    pub quit_hold_secs: f64,

    /// Normalized thumb-to-index distance counting as a pinch
    pub pinch_distance: f64,
}

/// Shooter engine parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShooterConfig {
    /// Movement joystick center, normalized frame coordinates
    pub move_center_x: f64,
    pub move_center_y: f64,

    /// Per-axis deadzone around the movement center
    pub move_deadzone: f64,

    /// Hysteresis margin for the movement axes
    pub move_margin: f64,

    /// Aim joystick center, normalized frame coordinates
    pub aim_center_x: f64,
    pub aim_center_y: f64,

    /// Radius around the aim center producing no pointer motion
    pub aim_deadzone: f64,

    /// Pointer pixels per normalized unit beyond the aim deadzone
    pub aim_sensitivity: f64,

    /// Reload pulse cooldown, seconds
    pub reload_cooldown: f64,
}

/// Racing-by-hands engine parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RacingConfig {
    /// Two-hand angle beyond which steering engages, degrees
    pub steer_threshold_deg: f64,

    /// Hysteresis margin around the steering threshold, degrees
    pub steer_margin_deg: f64,

    /// Nitro pulse cooldown, seconds
    pub nitro_cooldown: f64,
}

/// Racing-by-posture engine parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostureConfig {
    /// Nose offset beyond which steering engages, normalized units
    pub steer_threshold: f64,

    /// Hysteresis margin around the steering threshold
    pub steer_margin: f64,

    /// Nose offset beyond which a spin triggers
    pub spin_threshold: f64,

    /// Spin pulse cooldown, seconds
    pub spin_cooldown: f64,

    /// Jump pulse cooldown, seconds
    pub jump_cooldown: f64,
}

/// Flight engine parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightConfig {
    /// Normalized x position right of which a hand drives the throttle
    pub throttle_boundary: f64,

    /// Vertical margin clipped off both frame edges for the throttle range
    pub throttle_margin: f64,

    /// Throttle lock tolerance, 0-100 throttle units
    pub lock_tolerance: f64,

    /// Consecutive in-tolerance samples required before the throttle locks
    pub lock_samples: u32,

    /// Throttle level re-pulse cooldown, seconds
    pub throttle_cooldown: f64,

    /// Two-hand vertical delta beyond which banking engages
    pub bank_threshold: f64,

    /// Hysteresis margin around the bank threshold
    pub bank_margin: f64,

    /// Average hand height offset from frame center engaging pitch
    pub pitch_threshold: f64,

    /// Hysteresis margin around the pitch threshold
    pub pitch_margin: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dispatcher: DispatcherConfig::default(),
            shooter: ShooterConfig::default(),
            racing: RacingConfig::default(),
            posture: PostureConfig::default(),
            flight: FlightConfig::default(),
        }
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            quit_hold_secs: DEFAULT_QUIT_HOLD_SECS,
            pinch_distance: DEFAULT_PINCH_DISTANCE,
        }
    }
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self {
            move_center_x: 0.30,
            move_center_y: 0.50,
            move_deadzone: DEFAULT_MOVE_DEADZONE,
            move_margin: 0.03,
            aim_center_x: 0.50,
            aim_center_y: 0.50,
            aim_deadzone: 0.055,
            aim_sensitivity: 450.0,
            reload_cooldown: 0.5,
        }
    }
}

impl Default for RacingConfig {
    fn default() -> Self {
        Self {
            steer_threshold_deg: DEFAULT_STEER_THRESHOLD_DEG,
            steer_margin_deg: DEFAULT_STEER_MARGIN_DEG,
            nitro_cooldown: 1.0,
        }
    }
}

impl Default for PostureConfig {
    fn default() -> Self {
        Self {
            steer_threshold: 0.05,
            steer_margin: 0.015,
            spin_threshold: 0.15,
            spin_cooldown: 1.5,
            jump_cooldown: 0.5,
        }
    }
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            throttle_boundary: DEFAULT_THROTTLE_BOUNDARY,
            throttle_margin: 0.14,
            lock_tolerance: DEFAULT_LOCK_TOLERANCE,
            lock_samples: 1,
            throttle_cooldown: 0.2,
            bank_threshold: 0.04,
            bank_margin: 0.012,
            pitch_threshold: 0.14,
            pitch_margin: 0.03,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Pulse cooldown table for the action latch
    #[must_use]
    pub fn cooldowns(&self) -> Cooldowns {
        Cooldowns {
            reload: Duration::from_secs_f64(self.shooter.reload_cooldown),
            jump: Duration::from_secs_f64(self.posture.jump_cooldown),
            nitro: Duration::from_secs_f64(self.racing.nitro_cooldown),
            spin: Duration::from_secs_f64(self.posture.spin_cooldown),
            throttle: Duration::from_secs_f64(self.flight.throttle_cooldown),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.dispatcher.tick_rate == 0 {
            return Err(Error::Config("Tick rate must be greater than 0".to_string()));
        }
        if self.dispatcher.quit_hold_secs <= 0.0 {
            return Err(Error::Config("Quit hold duration must be positive".to_string()));
        }
        if !(0.0..=0.5).contains(&self.dispatcher.pinch_distance) {
            return Err(Error::Config(
                "Pinch distance must be between 0.0 and 0.5".to_string(),
            ));
        }

        if self.shooter.move_deadzone <= 0.0 || self.shooter.move_margin < 0.0 {
            return Err(Error::Config(
                "Shooter deadzone must be positive and margin non-negative".to_string(),
            ));
        }
        if self.shooter.move_margin >= self.shooter.move_deadzone {
            return Err(Error::Config(
                "Shooter movement margin must be below the deadzone".to_string(),
            ));
        }
        if self.shooter.aim_sensitivity <= 0.0 {
            return Err(Error::Config("Aim sensitivity must be positive".to_string()));
        }

        if self.racing.steer_margin_deg >= self.racing.steer_threshold_deg {
            return Err(Error::Config(
                "Racing steer margin must be below the threshold".to_string(),
            ));
        }
        if self.posture.steer_margin >= self.posture.steer_threshold {
            return Err(Error::Config(
                "Posture steer margin must be below the threshold".to_string(),
            ));
        }
        if self.posture.spin_threshold <= self.posture.steer_threshold {
            return Err(Error::Config(
                "Spin threshold must exceed the steering threshold".to_string(),
            ));
        }

        if !(0.5..1.0).contains(&self.flight.throttle_boundary) {
            return Err(Error::Config(
                "Throttle boundary must be between 0.5 and 1.0".to_string(),
            ));
        }
        if !(0.0..0.5).contains(&self.flight.throttle_margin) {
            return Err(Error::Config(
                "Throttle margin must be between 0.0 and 0.5".to_string(),
            ));
        }
        if self.flight.lock_tolerance <= 0.0 {
            return Err(Error::Config("Lock tolerance must be positive".to_string()));
        }
        if self.flight.lock_samples == 0 {
            return Err(Error::Config("Lock samples must be greater than 0".to_string()));
        }
        if self.flight.bank_margin >= self.flight.bank_threshold
            || self.flight.pitch_margin >= self.flight.pitch_threshold
        {
            return Err(Error::Config(
                "Flight hysteresis margins must be below their thresholds".to_string(),
            ));
        }

        let cooldowns = [
            self.shooter.reload_cooldown,
            self.racing.nitro_cooldown,
            self.posture.spin_cooldown,
            self.posture.jump_cooldown,
            self.flight.throttle_cooldown,
        ];
        if cooldowns.iter().any(|c| *c <= 0.0) {
            return Err(Error::Config("Pulse cooldowns must be positive".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Gesture Controller Configuration

# Dispatcher loop
dispatcher:
  tick_rate: 40
  quit_hold_secs: 3.0
  pinch_distance: 0.05

# Shooter engine
shooter:
  move_center_x: 0.30
  move_center_y: 0.50
  move_deadzone: 0.10
  move_margin: 0.03
  aim_center_x: 0.50
  aim_center_y: 0.50
  aim_deadzone: 0.055
  aim_sensitivity: 450.0
  reload_cooldown: 0.5

# Racing by hands
racing:
  steer_threshold_deg: 8.0
  steer_margin_deg: 2.0
  nitro_cooldown: 1.0

# Racing by posture
posture:
  steer_threshold: 0.05
  steer_margin: 0.015
  spin_threshold: 0.15
  spin_cooldown: 1.5
  jump_cooldown: 0.5

# Flight
flight:
  throttle_boundary: 0.80
  throttle_margin: 0.14
  lock_tolerance: 2.0
  lock_samples: 1
  throttle_cooldown: 0.2
  bank_threshold: 0.04
  bank_margin: 0.012
  pitch_threshold: 0.14
  pitch_margin: 0.03
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_example_config_parses() {
        let config: Config = serde_yaml::from_str(EXAMPLE_CONFIG).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.dispatcher.tick_rate, 40);
        assert!((config.racing.steer_threshold_deg - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_wide_margin() {
        let mut config = Config::default();
        config.racing.steer_margin_deg = 9.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_cooldown() {
        let mut config = Config::default();
        config.racing.nitro_cooldown = 0.0;
        assert!(config.validate().is_err());
    }
}
