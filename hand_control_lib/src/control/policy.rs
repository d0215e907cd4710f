use crate::{Action, HandObservation, IndexOrientation, Slot, ThresholdConfig};

/// Stateless mapping from hand predicates to car actions.
///
/// The left hand drives the throttle (open = accelerate, closed = stop),
/// the right hand steers with the index finger. A slot without a tracked
/// hand falls back to a fixed default that never keeps the car
/// accelerating or turning.
#[derive(Debug, Clone)]
pub struct GesturePolicy {
    thresholds: ThresholdConfig,
}

impl GesturePolicy {
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self { thresholds }
    }

    /// Slot the hand controls, or `None` when its type is unknown.
    pub fn slot_of(&self, hand: &HandObservation) -> Option<Slot> {
        Slot::from_hand_type(hand.hand_type(&self.thresholds))
    }

    /// Fail-safe action for a slot with no tracked hand.
    pub fn default_action(slot: Slot) -> Action {
        match slot {
            Slot::Left => Action::Stop,
            Slot::Right => Action::DirectionStraight,
        }
    }

    /// Instantaneous action for a hand in the given slot.
    pub fn action_for(&self, slot: Slot, hand: &HandObservation) -> Action {
        match slot {
            Slot::Left => {
                if hand.is_open(self.thresholds.open_ratio) {
                    Action::Accelerate
                } else {
                    Action::Stop
                }
            }
            Slot::Right => match hand.index_orientation(self.thresholds.orientation_threshold) {
                IndexOrientation::Left => Action::DirectionLeft,
                IndexOrientation::Right => Action::DirectionRight,
                IndexOrientation::Straight => Action::DirectionStraight,
            },
        }
    }

    /// Classify the hand and map it to its slot's action.
    pub fn raw_action(&self, hand: &HandObservation) -> Option<(Slot, Action)> {
        let slot = self.slot_of(hand)?;
        Some((slot, self.action_for(slot, hand)))
    }
}

impl Default for GesturePolicy {
    fn default() -> Self {
        Self::new(ThresholdConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::*;
    use crate::{Handedness, Landmark, LANDMARK_COUNT};

    fn base_points() -> [Landmark; LANDMARK_COUNT] {
        let mut p = [Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
        p[WRIST] = Landmark::new(0.5, 0.9, 0.0);
        p[MIDDLE_FINGER_MCP] = Landmark::new(0.5, 0.7, 0.0);
        p
    }

    fn open_hand(label: &str) -> HandObservation {
        let mut p = base_points();
        p[THUMB_TIP] = Landmark::new(0.3, 0.5, 0.0);
        p[THUMB_CMC] = Landmark::new(0.35, 0.7, 0.0);
        p[INDEX_FINGER_TIP] = Landmark::new(0.4, 0.2, 0.0);
        p[INDEX_FINGER_MCP] = Landmark::new(0.4, 0.7, 0.0);
        p[MIDDLE_FINGER_TIP] = Landmark::new(0.5, 0.2, 0.0);
        p[RING_FINGER_TIP] = Landmark::new(0.6, 0.2, 0.0);
        p[RING_FINGER_MCP] = Landmark::new(0.6, 0.7, 0.0);
        p[PINKY_TIP] = Landmark::new(0.7, 0.2, 0.0);
        p[PINKY_MCP] = Landmark::new(0.7, 0.7, 0.0);
        HandObservation::new(Some(Handedness::new(label, 0.95)), p)
    }

    fn right_pointing(diff: f64) -> HandObservation {
        let mut p = base_points();
        p[INDEX_FINGER_MCP] = Landmark::new(0.4, 0.5, 0.0);
        p[INDEX_FINGER_TIP] = Landmark::new(0.4 + diff, 0.5, 0.0);
        HandObservation::new(Some(Handedness::new("Right", 0.95)), p)
    }

    #[test]
    fn test_left_hand_throttle() {
        let policy = GesturePolicy::default();
        assert_eq!(
            policy.raw_action(&open_hand("Left")),
            Some((Slot::Left, Action::Accelerate))
        );

        let fist = HandObservation::new(Some(Handedness::new("Left", 0.95)), base_points());
        assert_eq!(policy.raw_action(&fist), Some((Slot::Left, Action::Stop)));
    }

    #[test]
    fn test_right_hand_steering() {
        let policy = GesturePolicy::default();
        assert_eq!(
            policy.raw_action(&right_pointing(0.1)),
            Some((Slot::Right, Action::DirectionLeft))
        );
        assert_eq!(
            policy.raw_action(&right_pointing(-0.1)),
            Some((Slot::Right, Action::DirectionRight))
        );
        assert_eq!(
            policy.raw_action(&right_pointing(0.0)),
            Some((Slot::Right, Action::DirectionStraight))
        );
    }

    #[test]
    fn test_open_right_hand_only_steers() {
        let policy = GesturePolicy::default();
        let (slot, action) = policy.raw_action(&open_hand("Right")).unwrap();
        assert_eq!(slot, Slot::Right);
        assert_eq!(action, Action::DirectionStraight);
    }

    #[test]
    fn test_unknown_hand_has_no_action() {
        let policy = GesturePolicy::default();
        let hand = HandObservation::new(None, base_points());
        assert_eq!(policy.raw_action(&hand), None);
    }

    #[test]
    fn test_fail_safe_defaults() {
        assert_eq!(GesturePolicy::default_action(Slot::Left), Action::Stop);
        assert_eq!(
            GesturePolicy::default_action(Slot::Right),
            Action::DirectionStraight
        );
    }
}
