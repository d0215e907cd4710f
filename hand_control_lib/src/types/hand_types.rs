use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::GestureError;

/// Number of landmarks produced per hand by the pose estimator.
pub const LANDMARK_COUNT: usize = 21;

/// Landmark indices (MediaPipe hand landmark convention)
#[allow(dead_code)]
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_DIP: usize = 7;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP: usize = 13;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_DIP: usize = 15;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// A single hand landmark
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64, // Normalized to image width [0.0, 1.0]
    pub y: f64, // Normalized to image height [0.0, 1.0]
    pub z: f64, // Depth relative to the wrist
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_point(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }

    pub fn distance_to(&self, other: &Landmark) -> f64 {
        nalgebra::distance(&self.to_point(), &other.to_point())
    }
}

/// Handedness classification reported by the pose estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Handedness {
    pub label: String, // "Left" or "Right"
    pub score: f64,    // Confidence [0.0, 1.0]
}

impl Handedness {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandType {
    Left,
    Right,
    Unknown,
}

/// Horizontal pointing direction of the index finger.
///
/// The camera image is mirrored, so `Left`/`Right` name the direction as
/// seen on screen rather than the anatomical one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexOrientation {
    Left,
    Right,
    Straight,
}

/// Immutable snapshot of one detected hand for a single frame.
///
/// The hand size (wrist to middle finger MCP) is computed once when the
/// snapshot is built and is used to normalize finger distances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHandObservation", into = "RawHandObservation")]
pub struct HandObservation {
    handedness: Option<Handedness>,
    landmarks: [Landmark; LANDMARK_COUNT],
    hand_size: f64,
}

impl HandObservation {
    pub fn new(handedness: Option<Handedness>, landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        let hand_size =
            landmarks[landmarks::WRIST].distance_to(&landmarks[landmarks::MIDDLE_FINGER_MCP]);
        Self {
            handedness,
            landmarks,
            hand_size,
        }
    }

    /// Build an observation from a landmark list of unknown length.
    ///
    /// Fails with `PreconditionViolation` unless exactly 21 landmarks are given.
    pub fn from_landmarks(
        handedness: Option<Handedness>,
        landmarks: Vec<Landmark>,
    ) -> Result<Self, GestureError> {
        let found = landmarks.len();
        let landmarks: [Landmark; LANDMARK_COUNT] =
            landmarks
                .try_into()
                .map_err(|_| GestureError::PreconditionViolation {
                    expected: LANDMARK_COUNT,
                    found,
                })?;
        Ok(Self::new(handedness, landmarks))
    }

    pub fn handedness(&self) -> Option<&Handedness> {
        self.handedness.as_ref()
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    pub fn landmark(&self, index: usize) -> &Landmark {
        &self.landmarks[index]
    }

    pub fn hand_size(&self) -> f64 {
        self.hand_size
    }
}

/// Wire representation of a hand observation as sent by the vision node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHandObservation {
    #[serde(default)]
    pub handedness: Option<Handedness>,
    pub landmarks: Vec<Landmark>,
}

impl TryFrom<RawHandObservation> for HandObservation {
    type Error = GestureError;

    fn try_from(raw: RawHandObservation) -> Result<Self, Self::Error> {
        HandObservation::from_landmarks(raw.handedness, raw.landmarks)
    }
}

impl From<HandObservation> for RawHandObservation {
    fn from(observation: HandObservation) -> Self {
        Self {
            handedness: observation.handedness,
            landmarks: observation.landmarks.to_vec(),
        }
    }
}
