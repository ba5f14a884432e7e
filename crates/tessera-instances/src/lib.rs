//! Per-type dense render-instance tables kept in step with a chunk grid.
#![forbid(unsafe_code)]

pub mod manager;
pub mod table;

pub use manager::{InstanceManager, InstanceSkip};
pub use table::{InstanceTable, InstanceTransform};
