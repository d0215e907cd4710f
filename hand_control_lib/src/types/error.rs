use thiserror::Error;

/// Errors surfaced by the gesture control library.
#[derive(Debug, Error)]
pub enum GestureError {
    /// A hand observation did not carry the landmark data the
    /// classifier requires. This is a contract breach by the vision
    /// collaborator and should not be retried.
    #[error("hand observation requires {expected} landmarks, got {found}")]
    PreconditionViolation { expected: usize, found: usize },

    /// A send was attempted while the controller link is down.
    #[error("controller is not connected")]
    NotConnected,

    #[error("controller I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown wire code '{0}'")]
    InvalidWireCode(String),
}

pub type GestureResult<T> = std::result::Result<T, GestureError>;
