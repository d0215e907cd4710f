// Geometric predicates over a single hand observation

use crate::landmarks::*;
use crate::{HandObservation, HandType, IndexOrientation, ThresholdConfig};

/// Below this hand size the landmarks are treated as degenerate.
const MIN_HAND_SIZE: f64 = 1e-6;

/// (tip, base) landmark pairs used to measure finger extension
const FINGER_PAIRS: [(usize, usize); 5] = [
    (THUMB_TIP, THUMB_CMC),
    (INDEX_FINGER_TIP, INDEX_FINGER_MCP),
    (MIDDLE_FINGER_TIP, MIDDLE_FINGER_MCP),
    (RING_FINGER_TIP, RING_FINGER_MCP),
    (PINKY_TIP, PINKY_MCP),
];

impl HandObservation {
    /// True when every landmark lies inside the image, `margin` away from
    /// each border. Clipped hands cannot be typed reliably.
    pub fn is_fully_visible(&self, margin: f64) -> bool {
        let range = margin..=(1.0 - margin);
        self.landmarks()
            .iter()
            .all(|l| range.contains(&l.x) && range.contains(&l.y))
    }

    pub fn hand_type(&self, thresholds: &ThresholdConfig) -> HandType {
        let Some(handedness) = self.handedness() else {
            return HandType::Unknown;
        };

        if !self.is_fully_visible(thresholds.visibility_margin) {
            return HandType::Unknown;
        }

        // NaN scores fail the comparison and count as low confidence
        if !(handedness.score >= thresholds.handedness_confidence_floor) {
            return HandType::Unknown;
        }

        match handedness.label.as_str() {
            "Left" => HandType::Left,
            "Right" => HandType::Right,
            _ => HandType::Unknown,
        }
    }

    /// Ratio of each finger's tip-to-base distance over the hand size.
    ///
    /// Returns `None` for a degenerate hand.
    pub fn finger_extension_ratios(&self) -> Option<[f64; 5]> {
        let size = self.hand_size();
        if size < MIN_HAND_SIZE {
            return None;
        }

        Some(FINGER_PAIRS.map(|(tip, base)| {
            self.landmark(tip).distance_to(self.landmark(base)) / size
        }))
    }

    /// Open iff all five fingers are extended beyond `threshold_ratio`
    /// hand sizes. Invariant under uniform scaling of the landmarks.
    pub fn is_open(&self, threshold_ratio: f64) -> bool {
        match self.finger_extension_ratios() {
            Some(ratios) => ratios.iter().all(|&r| r > threshold_ratio),
            None => false,
        }
    }

    pub fn index_orientation(&self, threshold: f64) -> IndexOrientation {
        let diff = self.landmark(INDEX_FINGER_TIP).x - self.landmark(INDEX_FINGER_MCP).x;
        if diff > threshold {
            IndexOrientation::Left
        } else if diff < -threshold {
            IndexOrientation::Right
        } else {
            IndexOrientation::Straight
        }
    }
}
