//! Gesture-driven game controller core.
//!
//! Turns a noisy stream of hand and body landmark frames into stable,
//! low-latency keyboard and mouse input. Four control modes (engines) map
//! the same landmark vocabulary onto different games: a shooter, two racing
//! variants, and a flight sim.
//!
//! The pipeline per tick: the freshest [`landmarks::LandmarkFrame`] is taken
//! from a latest-wins slot, the active [`engines::Engine`] maps it to a
//! [`latch::DesiredState`], the [`latch::ActionLatch`] reconciles that
//! against what is already held, and the resulting transitions go to an
//! XTEST-backed [`sink::InjectionSink`].
//!
//! # Example
//!
//! ```no_run
//! use gesture_controller::config::Config;
//! use gesture_controller::dispatcher::Dispatcher;
//! use gesture_controller::engines::EngineKind;
//! use gesture_controller::landmarks::FrameSlot;
//! use gesture_controller::sink::NullSink;
//! use std::sync::Arc;
//!
//! fn main() -> gesture_controller::Result<()> {
//!     let slot = Arc::new(FrameSlot::new());
//!     let mut dispatcher = Dispatcher::new(Config::default(), Box::new(NullSink));
//!     dispatcher.switch_mode(Some(EngineKind::Shooter));
//!     dispatcher.run(&slot, || false)?;
//!     Ok(())
//! }
//! ```

pub mod axis;
pub mod config;
pub mod constants;
pub mod dispatcher;
pub mod engines;
pub mod error;
pub mod gestures;
pub mod landmarks;
pub mod latch;
pub mod session_log;
pub mod sink;
pub mod source;

pub use error::{Error, Result};
