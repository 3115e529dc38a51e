//! Core types, data model, and errors for the Showroom tile visualizer.
//!
//! This crate provides the foundational types used across all other showroom crates:
//! - Identifiers and enumerations (room types, patterns, finishes, lighting presets)
//! - The tile catalog entry
//! - Surface descriptors produced by the room generator
//! - Mappings and the persisted design aggregate
//! - Error types

pub mod design;
pub mod errors;
pub mod surface;
pub mod tile;
pub mod types;

pub use design::*;
pub use errors::*;
pub use surface::*;
pub use tile::*;
pub use types::*;
