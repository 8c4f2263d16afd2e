//! Per-axis signal conditioning: deadzone, value lock, and hysteresis.
//!
//! Raw scalars from the gesture classifier are too jittery to drive key
//! transitions directly. [`AxisFilter`] stabilizes a continuous axis with a
//! deadzone and an optional value lock ("throttle lock"); [`ZoneFilter`]
//! discretizes a scalar into three zones with a hysteresis band so the
//! output cannot chatter at a threshold boundary.

/// Configuration for a continuous axis filter
#[derive(Debug, Clone, Copy)]
pub struct AxisConfig {
    /// Movement within this band around the last stable value is ignored
    pub deadzone: f64,
    /// When set, the axis latches once the raw value stays within this
    /// tolerance of the previous sample for `lock_samples` updates
    pub lock_tolerance: Option<f64>,
    /// Consecutive in-tolerance samples required before locking
    pub lock_samples: u32,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            deadzone: 0.0,
            lock_tolerance: None,
            lock_samples: 1,
        }
    }
}

/// Stateful filter for one continuous control axis
#[derive(Debug, Clone)]
pub struct AxisFilter {
    config: AxisConfig,
    last_value: Option<f64>,
    locked: bool,
    locked_value: f64,
    streak: u32,
}

impl AxisFilter {
    /// Create a new axis filter
    ///
    /// # Panics
    ///
    /// Panics if `lock_samples` is zero while a lock tolerance is set
    #[must_use]
    pub fn new(config: AxisConfig) -> Self {
        assert!(
            config.lock_tolerance.is_none() || config.lock_samples > 0,
            "Lock samples must be greater than 0"
        );
        Self {
            config,
            last_value: None,
            locked: false,
            locked_value: 0.0,
            streak: 0,
        }
    }

    /// Feed a raw sample and get back `(stable_value, changed)`.
    ///
    /// While locked the filter returns the locked value regardless of input
    /// until [`unlock`](Self::unlock) is called.
    pub fn update(&mut self, raw: f64) -> (f64, bool) {
        if self.locked {
            return (self.locked_value, false);
        }

        let Some(last) = self.last_value else {
            self.last_value = Some(raw);
            return (raw, true);
        };

        if let Some(tolerance) = self.config.lock_tolerance {
            if (raw - last).abs() < tolerance {
                self.streak += 1;
                if self.streak >= self.config.lock_samples {
                    self.locked = true;
                    self.locked_value = raw;
                    self.last_value = Some(raw);
                    return (raw, true);
                }
            } else {
                self.streak = 0;
            }
        }

        if (raw - last).abs() <= self.config.deadzone {
            return (last, false);
        }

        self.last_value = Some(raw);
        (raw, true)
    }

    /// Whether the axis is currently locked
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Release the value lock; the next sample is taken as-is
    pub fn unlock(&mut self) {
        self.locked = false;
        self.streak = 0;
    }

    /// Clear all state (used on mode switch)
    pub fn reset(&mut self) {
        self.last_value = None;
        self.locked = false;
        self.locked_value = 0.0;
        self.streak = 0;
    }
}

/// Discrete output zone of a [`ZoneFilter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    Low,
    #[default]
    Center,
    High,
}

/// Configuration for a three-zone discretizer
#[derive(Debug, Clone, Copy)]
pub struct ZoneConfig {
    /// Symmetric threshold around zero separating the zones
    pub threshold: f64,
    /// Hysteresis margin: the output flips only past `threshold + margin`
    /// and un-flips only after crossing back past `threshold - margin`
    pub margin: f64,
}

/// Discretizes a raw scalar into {Low, Center, High} with hysteresis.
///
/// The asymmetric entry/exit thresholds are what keep a value oscillating
/// exactly at the boundary from toggling the output every sample.
#[derive(Debug, Clone)]
pub struct ZoneFilter {
    config: ZoneConfig,
    zone: Zone,
}

impl ZoneFilter {
    /// Create a new zone filter, starting in `Center`
    ///
    /// # Panics
    ///
    /// Panics if the margin is negative or not below the threshold
    #[must_use]
    pub fn new(config: ZoneConfig) -> Self {
        assert!(config.margin >= 0.0, "Margin must be non-negative");
        assert!(config.margin < config.threshold, "Margin must be below the threshold");
        Self {
            config,
            zone: Zone::Center,
        }
    }

    /// Feed a raw sample and get the stable zone
    pub fn update(&mut self, raw: f64) -> Zone {
        let enter = self.config.threshold + self.config.margin;
        let exit = self.config.threshold - self.config.margin;

        self.zone = match self.zone {
            Zone::Center => {
                if raw > enter {
                    Zone::High
                } else if raw < -enter {
                    Zone::Low
                } else {
                    Zone::Center
                }
            }
            Zone::High => {
                if raw < -enter {
                    Zone::Low
                } else if raw < exit {
                    Zone::Center
                } else {
                    Zone::High
                }
            }
            Zone::Low => {
                if raw > enter {
                    Zone::High
                } else if raw > -exit {
                    Zone::Center
                } else {
                    Zone::Low
                }
            }
        };
        self.zone
    }

    /// Current zone without feeding a sample
    #[must_use]
    pub const fn zone(&self) -> Zone {
        self.zone
    }

    /// Clear back to `Center` (used on mode switch)
    pub fn reset(&mut self) {
        self.zone = Zone::Center;
    }
}
