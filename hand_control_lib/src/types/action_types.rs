use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{GestureError, HandType};

/// Car control command sent to the embedded controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Accelerate,
    Stop,
    DirectionLeft,
    DirectionRight,
    DirectionStraight,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Accelerate,
        Action::Stop,
        Action::DirectionLeft,
        Action::DirectionRight,
        Action::DirectionStraight,
    ];

    /// Three character code understood by the controller firmware.
    pub fn wire_code(&self) -> &'static str {
        match self {
            Action::Accelerate => "001",
            Action::Stop => "000",
            Action::DirectionLeft => "101",
            Action::DirectionRight => "110",
            Action::DirectionStraight => "111",
        }
    }

    pub fn from_wire_code(code: &str) -> Result<Self, GestureError> {
        Action::ALL
            .into_iter()
            .find(|action| action.wire_code() == code)
            .ok_or_else(|| GestureError::InvalidWireCode(code.to_string()))
    }

    /// Human readable name for logs and status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Accelerate => "Accelerate",
            Action::Stop => "Stop",
            Action::DirectionLeft => "Direction-Left",
            Action::DirectionRight => "Direction-Right",
            Action::DirectionStraight => "Direction-Straight",
        }
    }

    /// Encoded frame written to the controller socket.
    pub fn to_frame(&self) -> String {
        format!("{}\n", self.wire_code())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Independently tracked control channel. The left hand drives the
/// throttle, the right hand the steering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Left,
    Right,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::Left, Slot::Right];

    /// `None` for `HandType::Unknown`, which never owns a slot.
    pub fn from_hand_type(hand_type: HandType) -> Option<Self> {
        match hand_type {
            HandType::Left => Some(Slot::Left),
            HandType::Right => Some(Slot::Right),
            HandType::Unknown => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Left => "left",
            Slot::Right => "right",
        }
    }
}

/// One value per control slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerSlot<T> {
    pub left: T,
    pub right: T,
}

impl<T> PerSlot<T> {
    pub fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    pub fn get(&self, slot: Slot) -> &T {
        match slot {
            Slot::Left => &self.left,
            Slot::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, slot: Slot) -> &mut T {
        match slot {
            Slot::Left => &mut self.left,
            Slot::Right => &mut self.right,
        }
    }
}

/// Result of handing an action to a connected controller link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SendOutcome {
    /// Written to the wire
    Sent,
    /// Dropped because the previous send is too recent
    CoolingDown,
}

/// An action handed to the controller link for one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchedAction {
    pub slot: Slot,
    pub action: Action,
    pub wire_code: String,
    pub outcome: SendOutcome,
    pub command_id: String,
    pub timestamp: i64,
}

impl DispatchedAction {
    pub fn new(slot: Slot, action: Action, outcome: SendOutcome) -> Self {
        Self {
            slot,
            action,
            wire_code: action.wire_code().to_string(),
            outcome,
            command_id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Per-frame status published for display collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchStatus {
    pub frame_id: u64,
    pub connected: bool,
    pub last_dispatched: PerSlot<Option<Action>>,
    pub sent: Vec<DispatchedAction>,
    pub timestamp: i64,
}
