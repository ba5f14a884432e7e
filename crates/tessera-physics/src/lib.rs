//! Fixed-step cylinder-versus-voxel collision.
#![forbid(unsafe_code)]

pub mod agent;
pub mod contact;
pub mod engine;

pub use agent::Agent;
pub use contact::{Axis, Contact, Cylinder, narrow_phase};
pub use engine::{CollisionEngine, PhysicsParams, candidate_box, is_submerged};
