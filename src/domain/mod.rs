//! Domain logic - pure versioning rules independent of any release tooling

pub mod stability;
pub mod version;

pub use stability::Stability;
pub use version::{Increment, Version};
