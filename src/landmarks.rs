//! Landmark frame data model and the latest-wins frame buffer.
//!
//! A [`LandmarkFrame`] is one camera tick's worth of keypoint observations,
//! as reported by the external landmark-estimation model. Hands and body may
//! each be absent; that is a normal tracking state, not an error.

use crate::constants::{BODY_KEYPOINTS, HAND_KEYPOINTS, PALM_CENTER};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

/// A single normalized 2D keypoint. Coordinates are in [0, 1] with y growing
/// downward (camera space).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
}

impl Keypoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another keypoint
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Hand chirality as tagged by the external model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandSide {
    Left,
    Right,
}

/// One tracked hand: 21 keypoints plus its detected side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandLandmarks {
    pub side: HandSide,
    pub points: Vec<Keypoint>,
}

impl HandLandmarks {
    /// The palm-center reference keypoint (middle-finger MCP)
    #[must_use]
    pub fn palm_center(&self) -> Keypoint {
        self.points[PALM_CENTER]
    }

    #[must_use]
    pub fn point(&self, index: usize) -> Keypoint {
        self.points[index]
    }
}

/// One tracked body: 33 keypoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyLandmarks {
    pub points: Vec<Keypoint>,
}

impl BodyLandmarks {
    #[must_use]
    pub fn point(&self, index: usize) -> Keypoint {
        self.points[index]
    }
}

/// All keypoint observations for a single camera tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LandmarkFrame {
    #[serde(default)]
    pub hands: Vec<HandLandmarks>,
    #[serde(default)]
    pub body: Option<BodyLandmarks>,
}

impl LandmarkFrame {
    /// True when the frame carries no observations at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hands.is_empty() && self.body.is_none()
    }

    /// Find the hand tagged with the given side, if tracked
    #[must_use]
    pub fn hand(&self, side: HandSide) -> Option<&HandLandmarks> {
        self.hands.iter().find(|h| h.side == side)
    }

    /// Hands ordered left-to-right by palm-center x position
    #[must_use]
    pub fn sorted_hands(&self) -> Vec<&HandLandmarks> {
        let mut hands: Vec<&HandLandmarks> = self.hands.iter().collect();
        hands.sort_by(|a, b| {
            a.palm_center()
                .x
                .partial_cmp(&b.palm_center().x)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hands
    }

    /// Check keypoint counts against the expected skeleton sizes
    pub fn validate(&self) -> Result<()> {
        if self.hands.len() > 2 {
            return Err(Error::FrameDecode(format!(
                "Frame carries {} hands, at most 2 expected",
                self.hands.len()
            )));
        }
        for hand in &self.hands {
            if hand.points.len() != HAND_KEYPOINTS {
                return Err(Error::FrameDecode(format!(
                    "Hand skeleton has {} keypoints, expected {HAND_KEYPOINTS}",
                    hand.points.len()
                )));
            }
        }
        if let Some(body) = &self.body {
            if body.points.len() != BODY_KEYPOINTS {
                return Err(Error::FrameDecode(format!(
                    "Body skeleton has {} keypoints, expected {BODY_KEYPOINTS}",
                    body.points.len()
                )));
            }
        }
        Ok(())
    }
}

/// Single-slot latest-wins frame buffer between the landmark source and the
/// dispatcher loop.
///
/// The producer overwrites the slot on every capture; un-consumed frames are
/// discarded so the control core always reacts to the freshest observation.
/// `take` removes the frame, which is how a dispatcher tick with no new frame
/// gets skipped entirely.
#[derive(Debug, Default)]
pub struct FrameSlot {
    inner: Mutex<Option<LandmarkFrame>>,
}

impl FrameSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a new frame, discarding any un-consumed one
    pub fn publish(&self, frame: LandmarkFrame) {
        let mut slot = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(frame);
    }

    /// Take the current frame, leaving the slot empty. Never blocks on the
    /// producer.
    pub fn take(&self) -> Option<LandmarkFrame> {
        let mut slot = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        slot.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_at(side: HandSide, x: f64) -> HandLandmarks {
        HandLandmarks {
            side,
            points: vec![Keypoint::new(x, 0.5); HAND_KEYPOINTS],
        }
    }

    #[test]
    fn test_sorted_hands_orders_by_palm_x() {
        let frame = LandmarkFrame {
            hands: vec![hand_at(HandSide::Right, 0.8), hand_at(HandSide::Left, 0.2)],
            body: None,
        };
        let sorted = frame.sorted_hands();
        assert_eq!(sorted[0].side, HandSide::Left);
        assert_eq!(sorted[1].side, HandSide::Right);
    }

    #[test]
    fn test_validate_rejects_short_hand() {
        let frame = LandmarkFrame {
            hands: vec![HandLandmarks {
                side: HandSide::Left,
                points: vec![Keypoint::new(0.5, 0.5); 7],
            }],
            body: None,
        };
        assert!(frame.validate().is_err());
    }

    #[test]
    fn test_frame_slot_latest_wins() {
        let slot = FrameSlot::new();
        slot.publish(LandmarkFrame {
            hands: vec![hand_at(HandSide::Left, 0.1)],
            body: None,
        });
        slot.publish(LandmarkFrame {
            hands: vec![hand_at(HandSide::Right, 0.9)],
            body: None,
        });

        let frame = slot.take().unwrap();
        assert_eq!(frame.hands[0].side, HandSide::Right);

        // Slot is drained after take
        assert!(slot.take().is_none());
    }

    #[test]
    fn test_keypoint_distance() {
        let a = Keypoint::new(0.0, 0.0);
        let b = Keypoint::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    }
}
