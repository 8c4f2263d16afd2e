//! Debounced action latch: minimal transition events from desired state.
//!
//! The latch owns the authoritative held-action set. Each tick it reconciles
//! the engine's freshly-computed [`DesiredState`] against what is actually
//! held and emits only the transitions needed to close the gap, so the
//! injection sink never sees a double press or an unmatched release.

use crate::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::{Duration, Instant};

/// A logical controller action. The sink decides what key or button each one
/// maps to; the control core only reasons about these names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    // Shooter
    MoveForward,
    MoveBack,
    StrafeLeft,
    StrafeRight,
    Fire,
    Reload,
    // Racing (hands and posture)
    SteerLeft,
    SteerRight,
    Accelerate,
    Brake,
    Nitro,
    Spin,
    Jump,
    // Flight
    BankLeft,
    BankRight,
    PitchUp,
    PitchDown,
    /// Quantized throttle setting, level 0-9
    Throttle(u8),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoveForward => write!(f, "move_forward"),
            Self::MoveBack => write!(f, "move_back"),
            Self::StrafeLeft => write!(f, "strafe_left"),
            Self::StrafeRight => write!(f, "strafe_right"),
            Self::Fire => write!(f, "fire"),
            Self::Reload => write!(f, "reload"),
            Self::SteerLeft => write!(f, "steer_left"),
            Self::SteerRight => write!(f, "steer_right"),
            Self::Accelerate => write!(f, "accelerate"),
            Self::Brake => write!(f, "brake"),
            Self::Nitro => write!(f, "nitro"),
            Self::Spin => write!(f, "spin"),
            Self::Jump => write!(f, "jump"),
            Self::BankLeft => write!(f, "bank_left"),
            Self::BankRight => write!(f, "bank_right"),
            Self::PitchUp => write!(f, "pitch_up"),
            Self::PitchDown => write!(f, "pitch_down"),
            Self::Throttle(level) => write!(f, "throttle_{level}"),
        }
    }
}

/// Action pairs that a mapping table must never assert together
pub const EXCLUSIVE_PAIRS: [(Action, Action); 6] = [
    (Action::MoveForward, Action::MoveBack),
    (Action::StrafeLeft, Action::StrafeRight),
    (Action::SteerLeft, Action::SteerRight),
    (Action::Accelerate, Action::Brake),
    (Action::BankLeft, Action::BankRight),
    (Action::PitchUp, Action::PitchDown),
];

/// Desired control state produced fresh by an engine each tick
#[derive(Debug, Clone, Default)]
pub struct DesiredState {
    held: BTreeSet<Action>,
    pulses: Vec<Action>,
    aim: Option<(f64, f64)>,
}

impl DesiredState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that an action be held this tick
    pub fn hold(&mut self, action: Action) {
        self.held.insert(action);
    }

    /// Request a cooldown-gated pulse (press and release) this tick
    pub fn pulse(&mut self, action: Action) {
        self.pulses.push(action);
    }

    /// Attach an analog aim delta (pixels) for this tick
    pub fn set_aim(&mut self, dx: f64, dy: f64) {
        self.aim = Some((dx, dy));
    }

    #[must_use]
    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// True when no action is held this tick
    #[must_use]
    pub fn held_is_empty(&self) -> bool {
        self.held.is_empty()
    }

    #[must_use]
    pub fn aim(&self) -> Option<(f64, f64)> {
        self.aim
    }

    #[must_use]
    pub fn pulses(&self) -> &[Action] {
        &self.pulses
    }

    /// Reject any state that asserts both members of an exclusive pair.
    ///
    /// A conflict here is a programming defect in a mapping table, caught at
    /// the table boundary rather than silently resolved downstream.
    pub fn validate(&self) -> Result<()> {
        for (a, b) in EXCLUSIVE_PAIRS {
            if self.held.contains(&a) && self.held.contains(&b) {
                return Err(Error::ExclusiveConflict(a.to_string(), b.to_string()));
            }
        }
        Ok(())
    }
}

/// Kind of transition forwarded to the injection sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    BeginHold,
    EndHold,
    Pulse,
}

/// One ordered transition emitted by [`ActionLatch::reconcile`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEvent {
    pub action: Action,
    pub kind: TransitionKind,
}

/// Cooldown durations for pulse-style actions
#[derive(Debug, Clone, Copy)]
pub struct Cooldowns {
    pub reload: Duration,
    pub jump: Duration,
    pub nitro: Duration,
    pub spin: Duration,
    pub throttle: Duration,
}

impl Default for Cooldowns {
    fn default() -> Self {
        Self {
            reload: Duration::from_millis(500),
            jump: Duration::from_millis(500),
            nitro: Duration::from_millis(1000),
            spin: Duration::from_millis(1500),
            throttle: Duration::from_millis(200),
        }
    }
}

impl Cooldowns {
    fn for_action(&self, action: Action) -> Duration {
        match action {
            Action::Reload => self.reload,
            Action::Jump => self.jump,
            Action::Nitro => self.nitro,
            Action::Spin => self.spin,
            Action::Throttle(_) => self.throttle,
            // Held actions never pulse; a zero cooldown is inert
            _ => Duration::ZERO,
        }
    }
}

/// Tracks the actions currently asserted to the injection sink and emits the
/// minimal transition set each tick.
#[derive(Debug, Clone)]
pub struct ActionLatch {
    held: BTreeSet<Action>,
    last_pulse: BTreeMap<Action, Instant>,
    cooldowns: Cooldowns,
}

impl ActionLatch {
    #[must_use]
    pub fn new(cooldowns: Cooldowns) -> Self {
        Self {
            held: BTreeSet::new(),
            last_pulse: BTreeMap::new(),
            cooldowns,
        }
    }

    /// Reconcile the desired state against the held set.
    ///
    /// Releases are emitted before presses so an exclusive swap (steer left
    /// to steer right) never has both keys down between events. Reconciling
    /// an unchanged state emits nothing.
    pub fn reconcile(&mut self, desired: &DesiredState, now: Instant) -> Vec<TransitionEvent> {
        let mut events = Vec::new();

        let to_release: Vec<Action> = self
            .held
            .iter()
            .copied()
            .filter(|a| !desired.is_held(*a))
            .collect();
        for action in to_release {
            self.held.remove(&action);
            events.push(TransitionEvent {
                action,
                kind: TransitionKind::EndHold,
            });
        }

        for &action in &desired.held {
            if self.held.insert(action) {
                events.push(TransitionEvent {
                    action,
                    kind: TransitionKind::BeginHold,
                });
            }
        }

        for &action in desired.pulses() {
            let ready = self
                .last_pulse
                .get(&action)
                .map_or(true, |last| now.duration_since(*last) >= self.cooldowns.for_action(action));
            if ready {
                self.last_pulse.insert(action, now);
                events.push(TransitionEvent {
                    action,
                    kind: TransitionKind::Pulse,
                });
            }
        }

        events
    }

    /// Release every held action, in order. Used on mode exit so no hold can
    /// leak into the next mode or the OS input state.
    pub fn release_all(&mut self) -> Vec<TransitionEvent> {
        let events = self
            .held
            .iter()
            .map(|&action| TransitionEvent {
                action,
                kind: TransitionKind::EndHold,
            })
            .collect();
        self.held.clear();
        events
    }

    /// Forget all state including pulse timers (used on mode switch)
    pub fn reset(&mut self) {
        self.held.clear();
        self.last_pulse.clear();
    }

    /// Actions currently asserted to the sink
    #[must_use]
    pub fn held(&self) -> Vec<Action> {
        self.held.iter().copied().collect()
    }

    #[must_use]
    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }
}

/// Timed confirmation gesture (hold-to-quit).
///
/// While the gating gesture stays continuously active, elapsed time
/// accumulates; any interruption resets it. Reaching the required duration
/// fires exactly once per session. This is a monotonic commit, never
/// retracted.
#[derive(Debug, Clone)]
pub struct HoldToConfirm {
    required: Duration,
    started: Option<Instant>,
    fired: bool,
}

impl HoldToConfirm {
    #[must_use]
    pub fn new(required: Duration) -> Self {
        Self {
            required,
            started: None,
            fired: false,
        }
    }

    /// Feed the gesture state for this tick; returns true exactly once when
    /// the hold duration is reached.
    pub fn update(&mut self, active: bool, now: Instant) -> bool {
        if self.fired {
            return false;
        }
        if !active {
            self.started = None;
            return false;
        }
        let started = *self.started.get_or_insert(now);
        if now.duration_since(started) >= self.required {
            self.fired = true;
            return true;
        }
        false
    }

    /// Fraction of the required hold completed, for status display
    #[must_use]
    pub fn progress(&self, now: Instant) -> f64 {
        match self.started {
            Some(started) if !self.fired => {
                (now.duration_since(started).as_secs_f64() / self.required.as_secs_f64()).min(1.0)
            }
            _ => {
                if self.fired {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desired_holding(actions: &[Action]) -> DesiredState {
        let mut state = DesiredState::new();
        for &a in actions {
            state.hold(a);
        }
        state
    }

    #[test]
    fn test_reconcile_idempotent() {
        let mut latch = ActionLatch::new(Cooldowns::default());
        let now = Instant::now();
        let desired = desired_holding(&[Action::Fire, Action::MoveForward]);

        let first = latch.reconcile(&desired, now);
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|e| e.kind == TransitionKind::BeginHold));

        let second = latch.reconcile(&desired, now);
        assert!(second.is_empty());
    }

    #[test]
    fn test_exclusive_swap_releases_before_press() {
        let mut latch = ActionLatch::new(Cooldowns::default());
        let now = Instant::now();

        latch.reconcile(&desired_holding(&[Action::SteerLeft]), now);
        let events = latch.reconcile(&desired_holding(&[Action::SteerRight]), now);

        assert_eq!(
            events,
            vec![
                TransitionEvent {
                    action: Action::SteerLeft,
                    kind: TransitionKind::EndHold
                },
                TransitionEvent {
                    action: Action::SteerRight,
                    kind: TransitionKind::BeginHold
                },
            ]
        );
    }

    #[test]
    fn test_pulse_cooldown_gating() {
        let mut latch = ActionLatch::new(Cooldowns {
            nitro: Duration::from_millis(500),
            ..Cooldowns::default()
        });
        let t0 = Instant::now();
        let mut desired = DesiredState::new();
        desired.pulse(Action::Nitro);

        let events = latch.reconcile(&desired, t0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, TransitionKind::Pulse);

        // Still true 0.3s later: cooldown blocks it
        let events = latch.reconcile(&desired, t0 + Duration::from_millis(300));
        assert!(events.is_empty());

        // 0.6s later: fires again
        let events = latch.reconcile(&desired, t0 + Duration::from_millis(600));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_release_all() {
        let mut latch = ActionLatch::new(Cooldowns::default());
        let now = Instant::now();
        latch.reconcile(&desired_holding(&[Action::Fire, Action::Accelerate]), now);

        let events = latch.release_all();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.kind == TransitionKind::EndHold));
        assert!(latch.held().is_empty());

        // Nothing left to release
        assert!(latch.release_all().is_empty());
    }

    #[test]
    fn test_validate_rejects_exclusive_pair() {
        let state = desired_holding(&[Action::SteerLeft, Action::SteerRight]);
        assert!(matches!(state.validate(), Err(Error::ExclusiveConflict(_, _))));

        let ok = desired_holding(&[Action::SteerLeft, Action::Accelerate]);
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_hold_to_confirm_fires_once() {
        let mut confirm = HoldToConfirm::new(Duration::from_secs(3));
        let t0 = Instant::now();

        assert!(!confirm.update(true, t0));
        assert!(!confirm.update(true, t0 + Duration::from_secs(2)));
        assert!(confirm.update(true, t0 + Duration::from_secs(3)));

        // Gesture still true for many more seconds: never fires again
        for extra in 4..14 {
            assert!(!confirm.update(true, t0 + Duration::from_secs(extra)));
        }
    }

    #[test]
    fn test_hold_to_confirm_interruption_resets() {
        let mut confirm = HoldToConfirm::new(Duration::from_secs(3));
        let t0 = Instant::now();

        assert!(!confirm.update(true, t0));
        assert!(!confirm.update(true, t0 + Duration::from_secs(2)));
        // Interrupted just before the deadline
        assert!(!confirm.update(false, t0 + Duration::from_millis(2500)));
        // Elapsed starts over
        assert!(!confirm.update(true, t0 + Duration::from_secs(3)));
        assert!(!confirm.update(true, t0 + Duration::from_secs(5)));
        assert!(confirm.update(true, t0 + Duration::from_secs(6)));
    }

    #[test]
    fn test_throttle_levels_pulse_independently() {
        let mut latch = ActionLatch::new(Cooldowns::default());
        let t0 = Instant::now();

        let mut desired = DesiredState::new();
        desired.pulse(Action::Throttle(5));
        assert_eq!(latch.reconcile(&desired, t0).len(), 1);

        // A different level is a different cooldown key
        let mut desired = DesiredState::new();
        desired.pulse(Action::Throttle(6));
        assert_eq!(latch.reconcile(&desired, t0 + Duration::from_millis(10)).len(), 1);

        // Same level inside its cooldown stays quiet
        let mut desired = DesiredState::new();
        desired.pulse(Action::Throttle(5));
        assert!(latch.reconcile(&desired, t0 + Duration::from_millis(20)).is_empty());
    }
}
