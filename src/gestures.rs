//! Gesture classification from hand and body keypoints.
//!
//! Pure functions: a hand's keypoints map to a finger-up vector and a
//! discrete [`Gesture`], body keypoints map to a [`PostureReading`]. Callers
//! are responsible for only invoking these with tracked landmark sets.

use crate::constants::{
    FINGER_PAIRS, INDEX_TIP, LEFT_BODY_WRIST, LEFT_SHOULDER, NOSE, RIGHT_BODY_WRIST,
    RIGHT_SHOULDER, THUMB_IP, THUMB_TIP,
};
use crate::landmarks::{BodyLandmarks, HandLandmarks, HandSide, Keypoint};

/// Per-finger extension state. A finger counts as up when its tip keypoint
/// sits above (smaller y than) its PIP joint; the thumb compares x instead,
/// mirrored by hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerUp {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerUp {
    /// Number of extended fingers excluding the thumb
    #[must_use]
    pub fn count(&self) -> usize {
        usize::from(self.index) + usize::from(self.middle) + usize::from(self.ring) + usize::from(self.pinky)
    }

    /// Number of extended fingers including the thumb
    #[must_use]
    pub fn count_with_thumb(&self) -> usize {
        self.count() + usize::from(self.thumb)
    }
}

/// Discrete hand pose derived from the finger-up vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// No non-thumb finger extended
    Fist,
    /// At least four of five fingers extended
    OpenHand,
    /// Index and middle extended, ring and pinky curled
    Peace,
    /// Thumb tip touching index tip
    Pinch,
    /// Anything else
    Neutral,
}

/// Continuous scalars derived from body keypoints
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostureReading {
    /// Horizontal nose offset from the shoulder midpoint, normalized units.
    /// Positive means the head leans toward the camera's right.
    pub nose_offset: f64,
    /// Left wrist raised above the left shoulder
    pub left_wrist_raised: bool,
    /// Right wrist raised above the right shoulder
    pub right_wrist_raised: bool,
}

/// Compute the finger-up vector for a hand.
///
/// Camera-space y grows downward, so a tip with smaller y than its PIP joint
/// is extended. The thumb folds sideways: its tip/IP x-comparison is mirrored
/// by the detected hand side.
#[must_use]
pub fn finger_up(hand: &HandLandmarks) -> FingerUp {
    let thumb = match hand.side {
        HandSide::Left => hand.point(THUMB_TIP).x > hand.point(THUMB_IP).x,
        HandSide::Right => hand.point(THUMB_TIP).x < hand.point(THUMB_IP).x,
    };

    let mut fingers = [false; 4];
    for (slot, (tip, pip)) in fingers.iter_mut().zip(FINGER_PAIRS) {
        *slot = hand.point(tip).y < hand.point(pip).y;
    }

    FingerUp {
        thumb,
        index: fingers[0],
        middle: fingers[1],
        ring: fingers[2],
        pinky: fingers[3],
    }
}

/// Classify a hand into its finger-up vector and discrete gesture.
///
/// `pinch_distance` is the normalized thumb-to-index tip distance below which
/// the pose counts as a pinch; pinch takes precedence over the count-based
/// poses.
#[must_use]
pub fn classify_hand(hand: &HandLandmarks, pinch_distance: f64) -> (FingerUp, Gesture) {
    let fingers = finger_up(hand);

    let tip_gap = hand.point(THUMB_TIP).distance(&hand.point(INDEX_TIP));
    let gesture = if tip_gap < pinch_distance {
        Gesture::Pinch
    } else if fingers.count() == 0 {
        Gesture::Fist
    } else if fingers.index && fingers.middle && !fingers.ring && !fingers.pinky {
        Gesture::Peace
    } else if fingers.count_with_thumb() >= 4 {
        Gesture::OpenHand
    } else {
        Gesture::Neutral
    };

    (fingers, gesture)
}

/// Derive posture scalars from a body landmark set
#[must_use]
pub fn classify_pose(body: &BodyLandmarks) -> PostureReading {
    let nose = body.point(NOSE);
    let left_shoulder = body.point(LEFT_SHOULDER);
    let right_shoulder = body.point(RIGHT_SHOULDER);
    let shoulder_center_x = (left_shoulder.x + right_shoulder.x) / 2.0;

    PostureReading {
        nose_offset: nose.x - shoulder_center_x,
        left_wrist_raised: body.point(LEFT_BODY_WRIST).y < left_shoulder.y,
        right_wrist_raised: body.point(RIGHT_BODY_WRIST).y < right_shoulder.y,
    }
}

/// Relative angle between two reference keypoints, in degrees.
///
/// `atan2(dy, dx)` from `a` to `b`; range (-180, 180]. With `a` the left hand
/// and `b` the right, a positive angle means the right hand sits lower
/// (steering right in camera space).
#[must_use]
pub fn relative_angle_degrees(a: Keypoint, b: Keypoint) -> f64 {
    (b.y - a.y).atan2(b.x - a.x).to_degrees()
}
