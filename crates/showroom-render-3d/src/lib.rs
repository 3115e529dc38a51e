//! Tile texture mapping and material caching for the Showroom visualizer.
//!
//! - [`uv`]: converts tile and surface dimensions plus a layout pattern into
//!   a texture transform.
//! - [`texture`]: de-duplicated asynchronous texture loads.
//! - [`cache`]: shares textures and tiled materials by structured key.
//! - [`material`]: untextured default materials and lighting rigs.
//!
//! Nothing here talks to a GPU. Resources are plain descriptions with stable
//! ids; the renderer uploads them and frees them when the cache reports a
//! release.

pub mod cache;
pub mod material;
pub mod texture;
pub mod uv;

pub use cache::{
    CacheOptions, CacheStats, MaterialCache, MaterialId, MaterialKey, MaterialLookup, MaterialParams,
    ReleasedResource, TiledMaterial,
};
pub use material::{lighting_rig, srgb_to_linear, Light, LightingRig, Material};
pub use texture::{
    ColorSpace, FilterMode, LoadCompletion, SamplerSettings, Texture, TextureHandle, TextureId, TextureImage,
    TextureSource, TextureState, WrapMode,
};
pub use uv::{compute_uv_transform, UvTransform};
