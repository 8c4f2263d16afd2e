//! Landmark frame source: a reader thread feeding the frame slot.
//!
//! Frames arrive as newline-delimited JSON, either streamed on stdin from a
//! tracking front-end or replayed from a capture file. Malformed or invalid
//! lines are logged and skipped; the stream never stalls the control loop
//! because frames land in the latest-wins [`FrameSlot`].

use crate::landmarks::{FrameSlot, LandmarkFrame};
use crate::{Error, Result};
use log::{debug, info, warn};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Parse one JSON line into a validated frame
pub fn decode_frame(line: &str) -> Result<LandmarkFrame> {
    let frame: LandmarkFrame = serde_json::from_str(line)?;
    frame.validate()?;
    Ok(frame)
}

fn pump(reader: impl BufRead, slot: &FrameSlot, pace: Option<Duration>) {
    let mut accepted = 0u64;
    let mut rejected = 0u64;

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Frame stream read error: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match decode_frame(&line) {
            Ok(frame) => {
                slot.publish(frame);
                accepted += 1;
            }
            Err(e) => {
                rejected += 1;
                warn!("Dropping malformed frame: {e}");
            }
        }
        if let Some(interval) = pace {
            thread::sleep(interval);
        }
    }

    info!("Frame stream ended: {accepted} frames accepted, {rejected} rejected");
}

/// Spawn a reader thread pumping stdin into the slot
pub fn spawn_stdin_reader(slot: Arc<FrameSlot>) -> JoinHandle<()> {
    info!("Reading landmark frames from stdin");
    thread::spawn(move || {
        let stdin = io::stdin();
        pump(stdin.lock(), &slot, None);
    })
}

/// Spawn a reader thread replaying a capture file into the slot.
///
/// `replay_rate` paces the replay in frames per second so filter and
/// cooldown timing behave as they did live.
pub fn spawn_file_reader(
    path: &Path,
    slot: Arc<FrameSlot>,
    replay_rate: u32,
) -> Result<JoinHandle<()>> {
    if replay_rate == 0 {
        return Err(Error::InvalidInput("Replay rate must be positive".to_string()));
    }
    let file = File::open(path)
        .map_err(|e| Error::InvalidInput(format!("Cannot open {}: {e}", path.display())))?;
    info!("Replaying landmark frames from {} at {replay_rate} fps", path.display());

    let interval = Duration::from_secs_f64(1.0 / f64::from(replay_rate));
    Ok(thread::spawn(move || {
        pump(BufReader::new(file), &slot, Some(interval));
        debug!("Replay reader finished");
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::HAND_KEYPOINTS;

    fn frame_json(hands: usize) -> String {
        let point = r#"{"x":0.5,"y":0.5}"#;
        let points = std::iter::repeat(point)
            .take(HAND_KEYPOINTS)
            .collect::<Vec<_>>()
            .join(",");
        let hand = format!(r#"{{"side":"Left","points":[{points}]}}"#);
        let hands = std::iter::repeat(hand).take(hands).collect::<Vec<_>>().join(",");
        format!(r#"{{"hands":[{hands}]}}"#)
    }

    #[test]
    fn test_decode_valid_frame() {
        let frame = decode_frame(&frame_json(1)).unwrap();
        assert_eq!(frame.hands.len(), 1);
        assert_eq!(frame.hands[0].points.len(), HAND_KEYPOINTS);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_frame("not json").is_err());
        assert!(decode_frame(r#"{"hands":[{"side":"Left","points":[]}]}"#).is_err());
    }

    #[test]
    fn test_pump_skips_bad_lines() {
        let slot = FrameSlot::new();
        let input = format!("garbage\n\n{}\n", frame_json(1));
        pump(input.as_bytes(), &slot, None);
        assert!(slot.take().is_some());
        assert!(slot.take().is_none());
    }
}
