pub mod domain;
pub mod error;
pub mod validator;

pub use domain::{Increment, Stability, Version};
pub use error::{Result, VersionError};
pub use validator::{ContinuityCheck, ContinuityValidator};
