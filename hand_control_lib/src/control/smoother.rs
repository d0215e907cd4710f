//! Trailing-window majority vote over recent actions.
//!
//! Each control slot keeps its own fixed-capacity FIFO of raw actions.
//! The smoothed action is the most frequent one in the window, which
//! filters out single-frame classification flicker.

use std::collections::VecDeque;

use crate::{Action, PerSlot, Slot};

/// Default window, in frames
pub const DEFAULT_BUFFER_SIZE: usize = 30;

/// Fixed-capacity FIFO of actions for one slot
#[derive(Debug, Clone)]
pub struct ActionBuffer {
    entries: VecDeque<Action>,
    capacity: usize,
}

impl ActionBuffer {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push an action, evicting the oldest entry when full.
    pub fn push(&mut self, action: Action) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(action);
    }

    /// Most frequent action in the window.
    ///
    /// Ties go to the action that occurs earliest in the window. Returns
    /// `None` only for an empty buffer.
    pub fn majority(&self) -> Option<Action> {
        // (action, count) in order of first occurrence
        let mut counts: Vec<(Action, usize)> = Vec::with_capacity(Action::ALL.len());
        for action in &self.entries {
            match counts.iter_mut().find(|(a, _)| a == action) {
                Some((_, count)) => *count += 1,
                None => counts.push((*action, 1)),
            }
        }

        let mut best: Option<(Action, usize)> = None;
        for (action, count) in counts {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((action, count));
            }
        }
        best.map(|(action, _)| action)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.entries.iter()
    }
}

/// Per-slot action buffers
#[derive(Debug, Clone)]
pub struct ActionSmoother {
    buffers: PerSlot<ActionBuffer>,
}

impl ActionSmoother {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffers: PerSlot::new(ActionBuffer::new(buffer_size), ActionBuffer::new(buffer_size)),
        }
    }

    pub fn append(&mut self, slot: Slot, action: Action) {
        self.buffers.get_mut(slot).push(action);
    }

    pub fn majority(&self, slot: Slot) -> Option<Action> {
        self.buffers.get(slot).majority()
    }

    /// Record a raw action and return the smoothed one.
    ///
    /// Falls back to the raw action when the window has no decision.
    pub fn smooth(&mut self, slot: Slot, raw: Action) -> Action {
        self.append(slot, raw);
        self.majority(slot).unwrap_or(raw)
    }

    pub fn buffer(&self, slot: Slot) -> &ActionBuffer {
        self.buffers.get(slot)
    }
}

impl Default for ActionSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_has_no_majority() {
        let buffer = ActionBuffer::new(5);
        assert!(buffer.is_empty());
        assert_eq!(buffer.majority(), None);
    }

    #[test]
    fn test_identical_runs() {
        for action in Action::ALL {
            for n in 1..=12 {
                let mut buffer = ActionBuffer::new(5);
                for _ in 0..n {
                    buffer.push(action);
                }
                assert_eq!(buffer.majority(), Some(action));
            }
        }
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut buffer = ActionBuffer::new(3);
        let sequence = [
            Action::Accelerate,
            Action::Stop,
            Action::DirectionLeft,
            Action::DirectionRight,
            Action::DirectionStraight,
        ];
        for action in sequence {
            buffer.push(action);
            assert!(buffer.len() <= buffer.capacity());
        }

        let remaining: Vec<Action> = buffer.iter().copied().collect();
        assert_eq!(remaining, sequence[2..].to_vec());
    }

    #[test]
    fn test_tie_goes_to_earliest_entry() {
        let mut buffer = ActionBuffer::new(4);
        buffer.push(Action::Stop);
        buffer.push(Action::Accelerate);
        buffer.push(Action::Accelerate);
        buffer.push(Action::Stop);
        assert_eq!(buffer.majority(), Some(Action::Stop));

        // Evicting the first Stop makes Accelerate the earliest entry
        buffer.push(Action::Stop);
        assert_eq!(
            buffer.iter().copied().collect::<Vec<_>>(),
            vec![Action::Accelerate, Action::Accelerate, Action::Stop, Action::Stop]
        );
        assert_eq!(buffer.majority(), Some(Action::Accelerate));

        buffer.push(Action::Stop);
        assert_eq!(buffer.majority(), Some(Action::Stop));
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let mut buffer = ActionBuffer::new(0);
        buffer.push(Action::Stop);
        buffer.push(Action::Accelerate);
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.majority(), Some(Action::Accelerate));
    }

    #[test]
    fn test_slots_are_independent() {
        let mut smoother = ActionSmoother::new(3);
        assert_eq!(smoother.smooth(Slot::Left, Action::Accelerate), Action::Accelerate);
        assert_eq!(smoother.majority(Slot::Right), None);

        smoother.append(Slot::Right, Action::DirectionLeft);
        assert_eq!(smoother.buffer(Slot::Left).len(), 1);
        assert_eq!(smoother.buffer(Slot::Right).len(), 1);
    }

    #[test]
    fn test_majority_lags_raw_input() {
        let mut smoother = ActionSmoother::new(3);
        let smoothed: Vec<Action> = [
            Action::Stop,
            Action::Stop,
            Action::Accelerate,
            Action::Accelerate,
            Action::Accelerate,
        ]
        .into_iter()
        .map(|raw| smoother.smooth(Slot::Left, raw))
        .collect();

        assert_eq!(
            smoothed,
            vec![
                Action::Stop,
                Action::Stop,
                Action::Stop,
                Action::Accelerate,
                Action::Accelerate,
            ]
        );
    }
}
