pub mod error;
pub mod supervisor;

pub use error::{Result, SupervisorError};
pub use supervisor::Supervisor;
