//! Constants used throughout the application

/// Number of keypoints in a hand skeleton
pub const HAND_KEYPOINTS: usize = 21;

/// Number of keypoints in a body skeleton
pub const BODY_KEYPOINTS: usize = 33;

// Hand landmark indices (MediaPipe hand topology)
pub const WRIST: usize = 0;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
/// Middle-finger MCP joint, used as the palm-center reference point
pub const PALM_CENTER: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

// Body landmark indices (MediaPipe pose topology)
pub const NOSE: usize = 0;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_BODY_WRIST: usize = 15;
pub const RIGHT_BODY_WRIST: usize = 16;

/// Fingertip/PIP index pairs for the four non-thumb fingers
pub const FINGER_PAIRS: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// Default dispatcher tick rate in Hz
pub const DEFAULT_TICK_RATE: u32 = 40;

/// Default normalized thumb-to-index distance below which a pinch is detected
pub const DEFAULT_PINCH_DISTANCE: f64 = 0.05;

/// Default continuous hold duration for the quit gesture, in seconds
pub const DEFAULT_QUIT_HOLD_SECS: f64 = 3.0;

/// Maximum number of session log entries kept in memory
pub const SESSION_LOG_CAPACITY: usize = 100;

/// Default deadzone for the shooter movement joystick (normalized units)
pub const DEFAULT_MOVE_DEADZONE: f64 = 0.10;

/// Default steering engagement threshold for racing by hands, degrees
pub const DEFAULT_STEER_THRESHOLD_DEG: f64 = 8.0;

/// Default steering hysteresis margin for racing by hands, degrees
pub const DEFAULT_STEER_MARGIN_DEG: f64 = 2.0;

/// Default throttle lock tolerance (throttle units, 0-100 scale)
pub const DEFAULT_LOCK_TOLERANCE: f64 = 2.0;

/// Normalized x position right of which a hand controls the flight throttle
pub const DEFAULT_THROTTLE_BOUNDARY: f64 = 0.80;
