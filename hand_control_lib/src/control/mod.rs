pub mod classifier;
pub mod connection;
pub mod dispatcher;
pub mod policy;
pub mod smoother;

pub use connection::*;
pub use dispatcher::*;
pub use policy::*;
pub use smoother::*;
