pub mod logging;
pub mod synthetic;

pub use logging::*;
