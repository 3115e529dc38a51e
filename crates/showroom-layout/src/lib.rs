//! Room layout for the Showroom tile visualizer.
//!
//! Every room type has a fixed physical configuration. From it this crate
//! derives the addressable surfaces (floor, walls, countertop, backsplash)
//! with their physical dimensions and placement. The output is pure data:
//! geometry building is left to the renderer.
//!
//! # Example
//!
//! ```
//! use showroom_core::RoomType;
//! use showroom_layout::generate;
//!
//! let surfaces = generate(RoomType::Bathroom);
//! assert_eq!(surfaces.len(), 6);
//! ```

mod generate;
mod rooms;

pub use generate::{generate, surface_ids, SurfaceList, ids};
pub use rooms::{CameraPose, RoomBounds, RoomConfig};
