//! Collaborators of the Showroom engine: saved designs, tile image
//! uploads, and procedural swatches for the stock catalog.
//!
//! Each concern is a small trait with an in-memory implementation, so a
//! host can swap in a database or object store without touching the engine.

mod error;
pub mod store;
pub mod swatch;
pub mod upload;

pub use error::{Result, StoreError, UploadError};
pub use store::{now_millis, DesignPatch, DesignStore, MemoryDesignStore};
pub use swatch::{generate_swatch, is_known_swatch, stock_tiles, Swatch, SWATCH_CACHE_CONTROL, SWATCH_CONTENT_TYPE};
pub use upload::{upload_image, ImagePayload, ImageStorage, MemoryImageStorage, StoredImage, UploadPolicy};
