//! Tick-driven dispatcher: drains the frame slot, runs the active engine,
//! reconciles the latch, and forwards transitions to the injection sink.
//!
//! The dispatcher owns every piece of mutable control state. Mode switches
//! and shutdown go through it so held keys are always released before the
//! next mode (or the process) takes over.

use crate::config::Config;
use crate::engines::{create_engine, Engine, EngineKind};
use crate::gestures::{classify_hand, Gesture};
use crate::landmarks::{FrameSlot, LandmarkFrame};
use crate::latch::{ActionLatch, HoldToConfirm, TransitionKind};
use crate::session_log::SessionLog;
use crate::sink::InjectionSink;
use crate::Result;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No fresh frame arrived; all state untouched
    Idle,
    /// A frame was processed and the sink updated
    Ran,
    /// The hold-to-quit gesture committed; the caller should stop the loop
    Quit,
}

/// Owns the active engine, the latch, and the sink
pub struct Dispatcher {
    config: Config,
    engine: Option<Box<dyn Engine>>,
    latch: ActionLatch,
    quit: HoldToConfirm,
    sink: Box<dyn InjectionSink>,
    log: SessionLog,
    exit_requested: bool,
}

impl Dispatcher {
    pub fn new(config: Config, sink: Box<dyn InjectionSink>) -> Self {
        let latch = ActionLatch::new(config.cooldowns());
        let quit = HoldToConfirm::new(Duration::from_secs_f64(config.dispatcher.quit_hold_secs));
        Self {
            config,
            engine: None,
            latch,
            quit,
            sink,
            log: SessionLog::new(),
            exit_requested: false,
        }
    }

    /// Switch the active mode, or deactivate with `None`.
    ///
    /// Every held action is released to the sink and the latch reset before
    /// the new engine is installed, so no hold or cooldown leaks across the
    /// switch. Safe to call with the current mode (full reset).
    pub fn switch_mode(&mut self, kind: Option<EngineKind>) {
        for event in self.latch.release_all() {
            if let Err(e) = self.sink.end_hold(event.action) {
                warn!("Failed to release {} during mode switch: {e}", event.action);
            }
        }
        self.latch.reset();

        match kind {
            Some(kind) => {
                info!("Switching control mode to {kind}");
                self.log.record("Mode", &kind.to_string(), "", "");
                self.engine = Some(create_engine(kind, &self.config));
            }
            None => {
                info!("Deactivating control mode");
                self.engine = None;
            }
        }
    }

    /// Ask the run loop to stop after releasing everything
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    /// The mode currently driving the sink, if any
    #[must_use]
    pub fn active_mode(&self) -> Option<EngineKind> {
        self.engine.as_ref().map(|e| e.kind())
    }

    /// Actions currently asserted to the sink
    #[must_use]
    pub fn held_actions(&self) -> Vec<crate::latch::Action> {
        self.latch.held()
    }

    /// The bounded session log accumulated so far
    #[must_use]
    pub fn session_log(&self) -> &SessionLog {
        &self.log
    }

    /// Process one tick.
    ///
    /// With no fresh frame this is a no-op: the sink keeps whatever is held
    /// and no filter state advances. A sink failure on one transition is
    /// logged and does not abort the tick; the latch still records the
    /// transition so a later release is not skipped.
    pub fn tick(&mut self, frame: Option<&LandmarkFrame>, now: Instant) -> Result<TickOutcome> {
        if self.exit_requested {
            self.shutdown();
            return Ok(TickOutcome::Quit);
        }

        let Some(frame) = frame else {
            return Ok(TickOutcome::Idle);
        };

        let pinching = frame.hands.iter().any(|hand| {
            classify_hand(hand, self.config.dispatcher.pinch_distance).1 == Gesture::Pinch
        });
        if self.quit.update(pinching, now) {
            self.log.record("Quit", "pinch held to confirmation", "", "");
            self.shutdown();
            return Ok(TickOutcome::Quit);
        }

        let Some(engine) = self.engine.as_mut() else {
            return Ok(TickOutcome::Idle);
        };

        let desired = engine.update(frame, now, &mut self.log)?;

        for event in self.latch.reconcile(&desired, now) {
            let result = match event.kind {
                TransitionKind::BeginHold => self.sink.begin_hold(event.action),
                TransitionKind::EndHold => self.sink.end_hold(event.action),
                TransitionKind::Pulse => self.sink.pulse(event.action),
            };
            if let Err(e) = result {
                warn!("Injection failed for {}: {e}", event.action);
                self.log
                    .record("InjectFail", &event.action.to_string(), &e.to_string(), "");
            }
        }

        if let Some((dx, dy)) = desired.aim() {
            if let Err(e) = self.sink.move_pointer(dx, dy) {
                warn!("Pointer move failed: {e}");
            }
        }

        Ok(TickOutcome::Ran)
    }

    /// Release everything held and reset the latch
    fn shutdown(&mut self) {
        debug!("Dispatcher shutdown, releasing {} held actions", self.latch.held().len());
        for event in self.latch.release_all() {
            if let Err(e) = self.sink.end_hold(event.action) {
                warn!("Failed to release {} during shutdown: {e}", event.action);
            }
        }
        self.latch.reset();
        if let Some(engine) = self.engine.as_mut() {
            engine.reset();
        }
    }

    /// Run the paced tick loop until quit is committed, `stop` returns true,
    /// or exit is requested.
    pub fn run<F>(&mut self, slot: &Arc<FrameSlot>, mut stop: F) -> Result<()>
    where
        F: FnMut() -> bool,
    {
        let interval = Duration::from_secs_f64(1.0 / f64::from(self.config.dispatcher.tick_rate));
        info!(
            "Dispatcher running at {} Hz in mode {}",
            self.config.dispatcher.tick_rate,
            self.active_mode().map_or_else(|| "none".to_string(), |k| k.to_string()),
        );

        loop {
            let tick_start = Instant::now();

            if stop() {
                self.request_exit();
            }

            let frame = slot.take();
            match self.tick(frame.as_ref(), tick_start)? {
                TickOutcome::Quit => break,
                TickOutcome::Idle | TickOutcome::Ran => {}
            }

            let elapsed = tick_start.elapsed();
            if let Some(remaining) = interval.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            } else {
                debug!("Tick overran interval: {elapsed:?}");
            }
        }

        info!("Dispatcher stopped");
        Ok(())
    }
}
