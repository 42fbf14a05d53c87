//! Registry module - Static description of Groups, Versions and Kinds.
//!
//! A [`Registry`] is built and validated once and then shared read-only by
//! every converter that uses it.

mod group;
mod registry;
mod validation;
mod version;


pub use group::{Group, Version};
pub use registry::*;
pub use validation::validate_groups;
pub use version::parse_generic;
