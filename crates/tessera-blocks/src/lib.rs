//! Block type identities and the registry loaded from `blocks.toml`.
#![forbid(unsafe_code)]

pub mod config;
pub mod registry;
pub mod types;

pub use registry::{BlockRegistry, BlockType};
pub use types::{BlockId, EMPTY};
