//! End-to-end dispatcher scenarios over a recording sink: mode switches,
//! quit confirmation, sink failures, and frame-slot semantics.


use gesture_controller::config::Config;
use gesture_controller::dispatcher::{Dispatcher, TickOutcome};
use gesture_controller::engines::EngineKind;
use gesture_controller::landmarks::{FrameSlot, HandSide};
use gesture_controller::latch::Action;
use std::time::{Duration, Instant};
use test_helpers::*;

/// Left hand at the movement center, fist inside the aim deadzone: the
/// shooter engine holds Fire and nothing else.
fn firing_frame() -> gesture_controller::landmarks::LandmarkFrame {
    frame_with_hands(vec![
        neutral_hand(HandSide::Left, 0.30, 0.50),
        fist_hand(HandSide::Right, 0.52, 0.50),
    ])
}

#[test]
fn mode_switch_releases_held_actions_first() {
    let sink = RecordingSink::new();
    let mut dispatcher = Dispatcher::new(Config::default(), Box::new(sink.clone()));
    dispatcher.switch_mode(Some(EngineKind::Shooter));

    let outcome = dispatcher.tick(Some(&firing_frame()), Instant::now()).unwrap();
    assert_eq!(outcome, TickOutcome::Ran);
    assert_eq!(sink.taken(), vec![SinkEvent::Begin(Action::Fire)]);
    assert_eq!(dispatcher.held_actions(), vec![Action::Fire]);

    dispatcher.switch_mode(Some(EngineKind::Flight));
    assert_eq!(sink.taken(), vec![SinkEvent::End(Action::Fire)]);
    assert!(dispatcher.held_actions().is_empty());
    assert_eq!(dispatcher.active_mode(), Some(EngineKind::Flight));
}

#[test]
fn switching_to_the_same_mode_still_resets() {
    let sink = RecordingSink::new();
    let mut dispatcher = Dispatcher::new(Config::default(), Box::new(sink.clone()));
    dispatcher.switch_mode(Some(EngineKind::Shooter));

    dispatcher.tick(Some(&firing_frame()), Instant::now()).unwrap();
    sink.taken();

    dispatcher.switch_mode(Some(EngineKind::Shooter));
    assert_eq!(sink.taken(), vec![SinkEvent::End(Action::Fire)]);
    assert!(dispatcher.held_actions().is_empty());
}

#[test]
fn tick_without_frame_touches_nothing() {
    let sink = RecordingSink::new();
    let mut dispatcher = Dispatcher::new(Config::default(), Box::new(sink.clone()));
    dispatcher.switch_mode(Some(EngineKind::Shooter));

    dispatcher.tick(Some(&firing_frame()), Instant::now()).unwrap();
    sink.taken();

    // No new frame: held actions stay down, no events, no releases
    let outcome = dispatcher.tick(None, Instant::now()).unwrap();
    assert_eq!(outcome, TickOutcome::Idle);
    assert!(sink.taken().is_empty());
    assert_eq!(dispatcher.held_actions(), vec![Action::Fire]);
}

#[test]
fn sustained_pinch_quits_and_releases_everything() {
    let sink = RecordingSink::new();
    let mut dispatcher = Dispatcher::new(Config::default(), Box::new(sink.clone()));
    dispatcher.switch_mode(Some(EngineKind::Shooter));
    let t0 = Instant::now();

    // Moving hand plus a pinching hand: MoveForward goes down, quit arms
    let frame = frame_with_hands(vec![
        neutral_hand(HandSide::Left, 0.30, 0.30),
        pinch_hand(HandSide::Right, 0.52, 0.50),
    ]);
    let outcome = dispatcher.tick(Some(&frame), t0).unwrap();
    assert_eq!(outcome, TickOutcome::Ran);
    assert!(dispatcher.held_actions().contains(&Action::MoveForward));
    sink.taken();

    // Pinch released early: the timer resets, nothing quits
    let outcome = dispatcher
        .tick(Some(&firing_frame()), t0 + Duration::from_secs(2))
        .unwrap();
    assert_eq!(outcome, TickOutcome::Ran);

    // Pinch held across the full window
    dispatcher.tick(Some(&frame), t0 + Duration::from_secs(4)).unwrap();
    let outcome = dispatcher
        .tick(Some(&frame), t0 + Duration::from_secs(8))
        .unwrap();
    assert_eq!(outcome, TickOutcome::Quit);
    assert!(dispatcher.held_actions().is_empty());

    // The final sink event is the release of the last hold
    let events = sink.taken();
    assert!(matches!(events.last(), Some(SinkEvent::End(_))));
}

#[test]
fn sink_failure_does_not_abort_the_tick() {
    let sink = RecordingSink::new();
    let mut dispatcher = Dispatcher::new(Config::default(), Box::new(sink.clone()));
    dispatcher.switch_mode(Some(EngineKind::Shooter));

    // The press is lost at the sink but the latch still tracks the hold
    sink.set_failing(true);
    let outcome = dispatcher.tick(Some(&firing_frame()), Instant::now()).unwrap();
    assert_eq!(outcome, TickOutcome::Ran);
    assert_eq!(dispatcher.held_actions(), vec![Action::Fire]);

    // Once the sink recovers, the release still goes out
    sink.set_failing(false);
    let empty = frame_with_hands(vec![]);
    dispatcher.tick(Some(&empty), Instant::now()).unwrap();
    assert_eq!(sink.taken(), vec![SinkEvent::End(Action::Fire)]);
}

#[test]
fn aim_deltas_reach_the_pointer() {
    let sink = RecordingSink::new();
    let mut dispatcher = Dispatcher::new(Config::default(), Box::new(sink.clone()));
    dispatcher.switch_mode(Some(EngineKind::Shooter));

    // Aim hand far right of the aim center
    let frame = frame_with_hands(vec![
        neutral_hand(HandSide::Left, 0.30, 0.50),
        neutral_hand(HandSide::Right, 0.70, 0.50),
    ]);
    dispatcher.tick(Some(&frame), Instant::now()).unwrap();

    let events = sink.taken();
    assert!(events
        .iter()
        .any(|e| matches!(e, SinkEvent::Move(dx, _) if *dx > 0.0)));
}

#[test]
fn frame_slot_keeps_only_the_latest() {
    let slot = FrameSlot::new();
    slot.publish(frame_with_hands(vec![neutral_hand(HandSide::Left, 0.10, 0.50)]));
    slot.publish(firing_frame());

    let frame = slot.take().unwrap();
    assert_eq!(frame.hands.len(), 2);
    assert!(slot.take().is_none());
}

#[test]
fn inactive_dispatcher_ignores_frames() {
    let sink = RecordingSink::new();
    let mut dispatcher = Dispatcher::new(Config::default(), Box::new(sink.clone()));

    let outcome = dispatcher.tick(Some(&firing_frame()), Instant::now()).unwrap();
    assert_eq!(outcome, TickOutcome::Idle);
    assert!(sink.taken().is_empty());
}
