//! Synthetic hand observations for testing without a camera.
//!
//! Hands are laid out upright in the middle of the frame with a hand
//! size of 0.2, well inside the visibility margin.

use crate::landmarks::*;
use crate::{HandObservation, Handedness, Landmark, LANDMARK_COUNT};

const WRIST_POS: (f64, f64) = (0.5, 0.8);

/// (first joint, tip, base position, extended tip, curled tip)
const FINGERS: [(usize, usize, (f64, f64), (f64, f64), (f64, f64)); 5] = [
    (THUMB_CMC, THUMB_TIP, (0.4, 0.75), (0.3, 0.6), (0.45, 0.68)),
    (INDEX_FINGER_MCP, INDEX_FINGER_TIP, (0.45, 0.6), (0.45, 0.35), (0.45, 0.62)),
    (MIDDLE_FINGER_MCP, MIDDLE_FINGER_TIP, (0.5, 0.6), (0.5, 0.35), (0.5, 0.62)),
    (RING_FINGER_MCP, RING_FINGER_TIP, (0.55, 0.6), (0.55, 0.35), (0.55, 0.62)),
    (PINKY_MCP, PINKY_TIP, (0.6, 0.62), (0.6, 0.4), (0.6, 0.64)),
];

/// Pose parameters for a synthetic hand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticPose {
    pub open: bool,
    /// Horizontal offset of the index tip from its base
    pub index_dx: f64,
}

impl SyntheticPose {
    pub fn open() -> Self {
        Self { open: true, index_dx: 0.0 }
    }

    pub fn fist() -> Self {
        Self { open: false, index_dx: 0.0 }
    }

    pub fn pointing(index_dx: f64) -> Self {
        Self { open: true, index_dx }
    }
}

/// Landmarks for the given pose, joints interpolated between base and tip.
pub fn synthetic_landmarks(pose: SyntheticPose) -> [Landmark; LANDMARK_COUNT] {
    let mut points = [Landmark::new(WRIST_POS.0, WRIST_POS.1, 0.0); LANDMARK_COUNT];

    for (first, tip, base, extended, curled) in FINGERS {
        let (mut tip_x, tip_y) = if pose.open { extended } else { curled };
        if tip == INDEX_FINGER_TIP {
            tip_x += pose.index_dx;
        }

        // first joint, two intermediate joints, tip
        for step in 0..=3 {
            let t = step as f64 / 3.0;
            points[first + step] = Landmark::new(
                base.0 + (tip_x - base.0) * t,
                base.1 + (tip_y - base.1) * t,
                0.0,
            );
        }
    }

    points
}

pub fn synthetic_hand(label: &str, score: f64, pose: SyntheticPose) -> HandObservation {
    HandObservation::new(
        Some(Handedness::new(label, score)),
        synthetic_landmarks(pose),
    )
}

pub fn open_hand(label: &str) -> HandObservation {
    synthetic_hand(label, 0.95, SyntheticPose::open())
}

pub fn fist(label: &str) -> HandObservation {
    synthetic_hand(label, 0.95, SyntheticPose::fist())
}

pub fn pointing_hand(label: &str, index_dx: f64) -> HandObservation {
    synthetic_hand(label, 0.95, SyntheticPose::pointing(index_dx))
}

/// A hand whose handedness the estimator could not decide.
pub fn unlabeled_hand() -> HandObservation {
    HandObservation::new(None, synthetic_landmarks(SyntheticPose::open()))
}
