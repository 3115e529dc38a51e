//! Session state for the Showroom tile visualizer.
//!
//! - [`catalog`]: the tiles surfaces can be mapped to.
//! - [`registry`]: room, surfaces, mappings, selection, and hover, with
//!   change notifications.
//! - [`interaction`]: pointer events to registry operations.
//! - [`binder`]: the material each surface is drawn with.

pub mod binder;
pub mod catalog;
pub mod interaction;
pub mod registry;

pub use binder::{BoundMaterial, SurfaceMaterials};
pub use catalog::{Catalog, TileCatalog, TileFilter};
pub use interaction::{InteractionController, InteractionOutcome, PointerEvent};
pub use registry::{ClickOutcome, Highlight, RegistryOptions, StateChange, SubscriptionId, SurfaceRegistry};
