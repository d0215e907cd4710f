use tracing::{debug, warn};

use crate::{
    Action, ActionSink, ActionSmoother, DispatchedAction, GesturePolicy, HandObservation, PerSlot,
    SessionConfig, Slot,
};

/// Per-session state machine turning hand observations into car commands.
///
/// Each slot is evaluated independently every frame. A slot's action is
/// handed to the sink only when it differs from the last one dispatched
/// for that slot. While the sink is disconnected the change is dropped
/// without being recorded, so it is retried on a later connected frame.
pub struct ActionDispatcher<S: ActionSink> {
    policy: GesturePolicy,
    smoother: ActionSmoother,
    last_dispatched: PerSlot<Option<Action>>,
    sink: S,
}

impl<S: ActionSink> ActionDispatcher<S> {
    pub fn new(policy: GesturePolicy, buffer_size: usize, sink: S) -> Self {
        Self {
            policy,
            smoother: ActionSmoother::new(buffer_size),
            last_dispatched: PerSlot::default(),
            sink,
        }
    }

    pub fn from_config(config: &SessionConfig, sink: S) -> Self {
        Self::new(
            GesturePolicy::new(config.thresholds),
            config.handler.buffer_size,
            sink,
        )
    }

    /// Process one frame of detected hands and return what was handed to
    /// the sink.
    pub fn decide(&mut self, observations: &[HandObservation]) -> Vec<DispatchedAction> {
        let mut tracked: PerSlot<Option<&HandObservation>> = PerSlot::default();
        for hand in observations {
            if let Some(slot) = self.policy.slot_of(hand) {
                // Later detections of the same hand type replace earlier ones
                *tracked.get_mut(slot) = Some(hand);
            }
        }

        let mut dispatched = Vec::new();
        for slot in Slot::ALL {
            let action = match tracked.get(slot) {
                Some(hand) => {
                    let raw = self.policy.action_for(slot, hand);
                    self.smoother.smooth(slot, raw)
                }
                None => GesturePolicy::default_action(slot),
            };

            if let Some(sent) = self.dispatch(slot, action) {
                dispatched.push(sent);
            }
        }
        dispatched
    }

    fn dispatch(&mut self, slot: Slot, action: Action) -> Option<DispatchedAction> {
        if *self.last_dispatched.get(slot) == Some(action) {
            return None;
        }

        if !self.sink.is_connected() {
            debug!(slot = slot.as_str(), "Not connected, holding back {}", action);
            return None;
        }

        match self.sink.send_action(action) {
            Ok(outcome) => {
                *self.last_dispatched.get_mut(slot) = Some(action);
                Some(DispatchedAction::new(slot, action, outcome))
            }
            Err(e) => {
                warn!(slot = slot.as_str(), "Failed to dispatch {}: {}", action, e);
                None
            }
        }
    }

    /// Smoothed action for a single hand. Updates the hand's slot buffer.
    ///
    /// Returns `None` for a hand of unknown type.
    pub fn get_action(&mut self, hand: &HandObservation) -> Option<Action> {
        let (slot, raw) = self.policy.raw_action(hand)?;
        Some(self.smoother.smooth(slot, raw))
    }

    /// Last action dispatched for a slot. Does not touch any buffer.
    pub fn last_dispatched(&self, slot: Slot) -> Option<Action> {
        *self.last_dispatched.get(slot)
    }

    pub fn last_dispatched_all(&self) -> PerSlot<Option<Action>> {
        self.last_dispatched.clone()
    }

    /// Action to display next to a hand: the last one dispatched for
    /// its slot. Does not touch any buffer.
    pub fn display_action(&self, hand: &HandObservation) -> Option<Action> {
        self.policy
            .slot_of(hand)
            .and_then(|slot| self.last_dispatched(slot))
    }

    pub fn smoother(&self) -> &ActionSmoother {
        &self.smoother
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::*;
    use crate::{GestureError, GestureResult, SendOutcome};

    #[derive(Default)]
    struct RecordingSink {
        disconnected: bool,
        // Connected, but every write fails
        failing: bool,
        sent: Vec<Action>,
    }

    impl ActionSink for RecordingSink {
        fn is_connected(&mut self) -> bool {
            !self.disconnected
        }

        fn send_action(&mut self, action: Action) -> GestureResult<SendOutcome> {
            if self.disconnected {
                return Err(GestureError::NotConnected);
            }
            if self.failing {
                return Err(GestureError::Io(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "controller reset",
                )));
            }
            self.sent.push(action);
            Ok(SendOutcome::Sent)
        }
    }

    fn dispatcher(buffer_size: usize) -> ActionDispatcher<RecordingSink> {
        ActionDispatcher::new(GesturePolicy::default(), buffer_size, RecordingSink::default())
    }

    #[test]
    fn test_left_hand_accelerate() {
        let mut d = dispatcher(30);
        d.decide(&[open_hand("Left")]);
        assert_eq!(d.sink().sent, vec![Action::Accelerate, Action::DirectionStraight]);
    }

    #[test]
    fn test_left_hand_stop() {
        let mut d = dispatcher(30);
        d.decide(&[fist("Left")]);
        assert_eq!(d.sink().sent, vec![Action::Stop, Action::DirectionStraight]);
    }

    #[test]
    fn test_right_hand_direction() {
        let mut d = dispatcher(30);
        d.decide(&[pointing_hand("Right", -0.15)]);
        assert_eq!(d.sink().sent, vec![Action::Stop, Action::DirectionRight]);

        let mut d = dispatcher(30);
        d.decide(&[pointing_hand("Right", 0.15)]);
        assert_eq!(d.sink().sent, vec![Action::Stop, Action::DirectionLeft]);
    }

    #[test]
    fn test_no_hands_sends_fail_safe_defaults() {
        let mut d = dispatcher(30);
        let sent = d.decide(&[]);
        assert_eq!(sent.len(), 2);
        assert_eq!(d.sink().sent, vec![Action::Stop, Action::DirectionStraight]);

        for _ in 0..5 {
            assert!(d.decide(&[]).is_empty());
        }
        assert_eq!(d.sink().sent.len(), 2);
    }

    #[test]
    fn test_action_sent_only_once_when_unchanged() {
        let mut d = dispatcher(30);
        let frame = [open_hand("Left"), pointing_hand("Right", 0.15)];
        d.decide(&frame);
        assert_eq!(d.sink().sent.len(), 2);

        d.decide(&frame);
        d.decide(&frame);
        assert_eq!(d.sink().sent.len(), 2);
    }

    #[test]
    fn test_unknown_hand_uses_default_and_skips_buffer() {
        let mut d = dispatcher(30);
        d.decide(&[unlabeled_hand()]);
        assert_eq!(d.sink().sent, vec![Action::Stop, Action::DirectionStraight]);
        assert!(d.smoother().buffer(Slot::Left).is_empty());
        assert!(d.smoother().buffer(Slot::Right).is_empty());
    }

    #[test]
    fn test_absent_slot_leaves_buffer_untouched() {
        let mut d = dispatcher(30);
        d.decide(&[open_hand("Left")]);
        d.decide(&[]);
        assert_eq!(d.smoother().buffer(Slot::Left).len(), 1);
        assert!(d.smoother().buffer(Slot::Right).is_empty());
        // Losing the hand falls back to Stop immediately
        assert_eq!(d.last_dispatched(Slot::Left), Some(Action::Stop));
    }

    #[test]
    fn test_majority_smooths_left_slot() {
        let mut d = dispatcher(3);
        let frames = [fist("Left"), fist("Left"), open_hand("Left"), open_hand("Left"), open_hand("Left")];

        let mut left_sends = Vec::new();
        for hand in frames {
            for sent in d.decide(&[hand]) {
                if sent.slot == Slot::Left {
                    left_sends.push(sent.action);
                }
            }
        }
        assert_eq!(left_sends, vec![Action::Stop, Action::Accelerate]);
    }

    #[test]
    fn test_disconnected_keeps_transition_pending() {
        let mut d = dispatcher(30);
        d.sink_mut().disconnected = true;

        assert!(d.decide(&[]).is_empty());
        assert!(d.decide(&[]).is_empty());
        assert_eq!(d.last_dispatched(Slot::Left), None);

        d.sink_mut().disconnected = false;
        let sent = d.decide(&[]);
        assert_eq!(sent.len(), 2);
        assert_eq!(d.last_dispatched(Slot::Left), Some(Action::Stop));
        assert_eq!(d.last_dispatched(Slot::Right), Some(Action::DirectionStraight));
    }

    #[test]
    fn test_failed_send_is_retried() {
        let mut d = dispatcher(30);
        d.sink_mut().failing = true;

        assert!(d.decide(&[]).is_empty());
        assert_eq!(d.last_dispatched(Slot::Left), None);
        assert_eq!(d.last_dispatched(Slot::Right), None);
        assert!(d.sink().sent.is_empty());

        d.sink_mut().failing = false;
        let sent: Vec<Action> = d.decide(&[]).into_iter().map(|s| s.action).collect();
        assert_eq!(sent, vec![Action::Stop, Action::DirectionStraight]);
        assert_eq!(d.last_dispatched(Slot::Left), Some(Action::Stop));
    }

    #[test]
    fn test_get_action_and_display_action() {
        let mut d = dispatcher(30);
        let hand = open_hand("Left");

        assert_eq!(d.display_action(&hand), None);
        assert_eq!(d.get_action(&hand), Some(Action::Accelerate));
        assert_eq!(d.smoother().buffer(Slot::Left).len(), 1);

        d.decide(&[hand.clone()]);
        let before = d.smoother().buffer(Slot::Left).len();
        assert_eq!(d.display_action(&hand), Some(Action::Accelerate));
        assert_eq!(d.smoother().buffer(Slot::Left).len(), before);

        assert_eq!(d.get_action(&unlabeled_hand()), None);
    }

    #[test]
    fn test_slots_are_independent() {
        let mut d = dispatcher(1);
        d.decide(&[open_hand("Left"), pointing_hand("Right", 0.15)]);
        d.decide(&[open_hand("Left"), pointing_hand("Right", -0.15)]);
        assert_eq!(
            d.sink().sent,
            vec![Action::Accelerate, Action::DirectionLeft, Action::DirectionRight]
        );
    }
}
