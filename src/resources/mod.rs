//! Transient resources: opaque handles and the registry that tracks them.

pub mod registry;

pub use registry::{ResourceHandle, ResourceRegistry};
