pub mod action_types;
pub mod config;
pub mod error;
pub mod hand_types;

pub use action_types::*;
pub use config::*;
pub use error::*;
pub use hand_types::*;
