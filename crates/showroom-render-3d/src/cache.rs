//! Texture and material cache.
//!
//! Textures are keyed by image reference and loaded at most once. Materials
//! are keyed by a structured [`MaterialKey`] and built at most once; equal
//! keys always return the same `Rc`. Entries are never mutated: a parameter
//! change produces a new key. The cache owns every resource it hands out and
//! is the only place they are disposed.

use std::cell::Cell;
use std::rc::Rc;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;

use showroom_core::{MappingError, Pattern, SurfaceDescriptor, TextureLoadError, Tile};

use crate::texture::{SamplerSettings, Texture, TextureHandle, TextureId, TextureSource, TextureState};
use crate::uv::{compute_uv_transform, UvTransform};

/// Identifier of a built material, unique within one cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u64);

/// Options for tiled materials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheOptions {
    pub anisotropy: u8,
    pub metalness: f32,
    pub double_sided: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            anisotropy: 16,
            metalness: 0.1,
            double_sided: true,
        }
    }
}

impl CacheOptions {
    pub fn with_anisotropy(mut self, anisotropy: u8) -> Self {
        self.anisotropy = anisotropy;
        self
    }

    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness.clamp(0.0, 1.0);
        self
    }
}

/// Everything a tiled material is derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialParams {
    pub image_ref: String,
    pub tile_width_mm: u32,
    pub tile_height_mm: u32,
    pub surface_width_m: f32,
    pub surface_height_m: f32,
    pub pattern: Pattern,
    pub roughness: f32,
}

impl MaterialParams {
    /// Parameters for laying `tile` on `surface` with `pattern`.
    pub fn for_tile(tile: &Tile, surface: &SurfaceDescriptor, pattern: Pattern) -> Self {
        Self {
            image_ref: tile.image_url.clone(),
            tile_width_mm: tile.width,
            tile_height_mm: tile.height,
            surface_width_m: surface.width,
            surface_height_m: surface.height,
            pattern,
            roughness: tile.roughness(),
        }
    }

    pub fn key(&self) -> MaterialKey {
        MaterialKey {
            image_ref: self.image_ref.clone(),
            tile_width_mm: self.tile_width_mm,
            tile_height_mm: self.tile_height_mm,
            surface_width_m: OrderedFloat(self.surface_width_m),
            surface_height_m: OrderedFloat(self.surface_height_m),
            pattern: self.pattern,
            roughness: OrderedFloat(self.roughness),
        }
    }
}

/// Structured material cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MaterialKey {
    pub image_ref: String,
    pub tile_width_mm: u32,
    pub tile_height_mm: u32,
    pub surface_width_m: OrderedFloat<f32>,
    pub surface_height_m: OrderedFloat<f32>,
    pub pattern: Pattern,
    pub roughness: OrderedFloat<f32>,
}

/// A fully configured tiled material.
#[derive(Debug)]
pub struct TiledMaterial {
    pub id: MaterialId,
    pub key: MaterialKey,
    pub texture: Rc<Texture>,
    pub uv: UvTransform,
    pub roughness: f32,
    pub metalness: f32,
    pub double_sided: bool,
    disposed: Cell<bool>,
}

impl TiledMaterial {
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

/// Result of a material lookup.
#[derive(Debug, Clone)]
pub enum MaterialLookup {
    Ready(Rc<TiledMaterial>),
    /// The texture is still loading; keep showing the previous material.
    Loading,
    /// The texture failed to load; fall back to the default material.
    Failed(TextureLoadError),
}

impl MaterialLookup {
    pub fn ready(&self) -> Option<&Rc<TiledMaterial>> {
        match self {
            MaterialLookup::Ready(mat) => Some(mat),
            _ => None,
        }
    }
}

/// A resource the cache has just disposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleasedResource {
    Texture(TextureId),
    Material(MaterialId),
}

/// Counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub loads_started: u64,
    pub materials_built: u64,
    pub material_hits: u64,
    pub disposed: u64,
}

/// The texture and material cache.
pub struct MaterialCache {
    source: Box<dyn TextureSource>,
    options: CacheOptions,
    textures: IndexMap<String, TextureHandle>,
    materials: IndexMap<MaterialKey, Rc<TiledMaterial>>,
    release_hook: Option<Box<dyn FnMut(ReleasedResource)>>,
    next_id: u64,
    stats: CacheStats,
}

impl MaterialCache {
    pub fn new(source: impl TextureSource + 'static) -> Self {
        Self::with_options(source, CacheOptions::default())
    }

    pub fn with_options(source: impl TextureSource + 'static, options: CacheOptions) -> Self {
        Self {
            source: Box::new(source),
            options,
            textures: IndexMap::new(),
            materials: IndexMap::new(),
            release_hook: None,
            next_id: 0,
            stats: CacheStats::default(),
        }
    }

    /// Register a callback told about every disposed resource, so the
    /// renderer can free the matching GPU memory.
    pub fn on_release(&mut self, hook: impl FnMut(ReleasedResource) + 'static) {
        self.release_hook = Some(Box::new(hook));
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Get or start the load for an image. Also used to preload tiles.
    pub fn resolve_texture(&mut self, image_ref: &str) -> TextureHandle {
        if let Some(handle) = self.textures.get(image_ref) {
            return handle.clone();
        }

        let id = TextureId(self.next_id());
        let sampler = SamplerSettings::tiled(self.options.anisotropy);
        let (handle, completion) = TextureHandle::pending(id, image_ref, sampler);
        self.textures.insert(image_ref.to_string(), handle.clone());
        self.stats.loads_started += 1;
        log::debug!("texture load started: {}", image_ref);

        self.source.start(image_ref, completion);
        handle
    }

    /// Get or build the material for `params`.
    ///
    /// Invalid dimensions are a usage error and returned as `Err`. Load
    /// failures are reported through [`MaterialLookup::Failed`].
    pub fn resolve_material(&mut self, params: &MaterialParams) -> Result<MaterialLookup, MappingError> {
        let key = params.key();
        if let Some(material) = self.materials.get(&key) {
            self.stats.material_hits += 1;
            return Ok(MaterialLookup::Ready(Rc::clone(material)));
        }

        let uv = compute_uv_transform(
            params.tile_width_mm as f32,
            params.tile_height_mm as f32,
            params.surface_width_m,
            params.surface_height_m,
            params.pattern,
        )?;

        let texture = match self.resolve_texture(&params.image_ref).state() {
            TextureState::Pending => return Ok(MaterialLookup::Loading),
            TextureState::Failed(err) => return Ok(MaterialLookup::Failed(err)),
            TextureState::Ready(texture) => texture,
        };

        let material = Rc::new(TiledMaterial {
            id: MaterialId(self.next_id()),
            key: key.clone(),
            texture,
            uv,
            roughness: params.roughness,
            metalness: self.options.metalness,
            double_sided: self.options.double_sided,
            disposed: Cell::new(false),
        });
        self.materials.insert(key, Rc::clone(&material));
        self.stats.materials_built += 1;
        log::debug!("material {:?} built for {}", material.id, params.image_ref);

        Ok(MaterialLookup::Ready(material))
    }

    /// Look up a built material without building or loading anything.
    pub fn get_material(&self, key: &MaterialKey) -> Option<Rc<TiledMaterial>> {
        self.materials.get(key).cloned()
    }

    /// Dispose and drop the texture for `image_ref` and every material built
    /// from it. Returns the number of entries removed.
    ///
    /// Must not be called while a render still uses those materials.
    pub fn invalidate(&mut self, image_ref: &str) -> usize {
        let mut removed = 0;

        let mut stale = Vec::new();
        self.materials.retain(|key, material| {
            if key.image_ref == image_ref {
                stale.push(Rc::clone(material));
                false
            } else {
                true
            }
        });
        for material in stale {
            self.release_material(&material);
            removed += 1;
        }

        if let Some(handle) = self.textures.shift_remove(image_ref) {
            self.release_texture(&handle);
            removed += 1;
        }

        log::debug!("invalidated {} cache entries for {}", removed, image_ref);
        removed
    }

    /// Dispose and drop every cached entry. Returns the number removed.
    pub fn clear_all(&mut self) -> usize {
        let materials: Vec<_> = self.materials.drain(..).map(|(_, m)| m).collect();
        let textures: Vec<_> = self.textures.drain(..).map(|(_, t)| t).collect();
        let removed = materials.len() + textures.len();

        for material in &materials {
            self.release_material(material);
        }
        for handle in &textures {
            self.release_texture(handle);
        }

        log::debug!("cleared {} cache entries", removed);
        removed
    }

    fn release_material(&mut self, material: &TiledMaterial) {
        material.disposed.set(true);
        self.stats.disposed += 1;
        if let Some(hook) = self.release_hook.as_mut() {
            hook(ReleasedResource::Material(material.id));
        }
    }

    fn release_texture(&mut self, handle: &TextureHandle) {
        // Anyone awaiting a dropped pending load gets an error, not silence.
        if handle.cancel("texture invalidated before it loaded") {
            log::debug!("cancelled pending load for {}", handle.image_ref());
            return;
        }
        if let TextureState::Ready(texture) = handle.state() {
            texture.dispose();
            self.stats.disposed += 1;
            if let Some(hook) = self.release_hook.as_mut() {
                hook(ReleasedResource::Texture(texture.id));
            }
        }
    }
}

impl std::fmt::Debug for MaterialCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaterialCache")
            .field("options", &self.options)
            .field("textures", &self.textures.len())
            .field("materials", &self.materials.len())
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{LoadCompletion, TextureImage};
    use std::cell::RefCell;

    /// Resolves every load immediately, failing refs containing "broken".
    fn instant_source(calls: Rc<Cell<u32>>) -> impl TextureSource {
        move |image_ref: &str, completion: LoadCompletion| {
            calls.set(calls.get() + 1);
            if image_ref.contains("broken") {
                completion.resolve(Err("decode failed".into()));
            } else {
                completion.resolve(Ok(TextureImage::new(512, 512)));
            }
        }
    }

    fn params(image_ref: &str, pattern: Pattern) -> MaterialParams {
        MaterialParams {
            image_ref: image_ref.to_string(),
            tile_width_mm: 600,
            tile_height_mm: 600,
            surface_width_m: 3.0,
            surface_height_m: 3.5,
            pattern,
            roughness: 0.3,
        }
    }

    #[test]
    fn test_material_identity() {
        let calls = Rc::new(Cell::new(0));
        let mut cache = MaterialCache::new(instant_source(Rc::clone(&calls)));

        let a = cache.resolve_material(&params("/t1.png", Pattern::Straight)).unwrap();
        let b = cache.resolve_material(&params("/t1.png", Pattern::Straight)).unwrap();
        let a = a.ready().unwrap();
        let b = b.ready().unwrap();
        assert!(Rc::ptr_eq(a, b));
        assert_eq!(cache.stats().materials_built, 1);
        assert_eq!(cache.stats().material_hits, 1);
    }

    #[test]
    fn test_differing_params_yield_distinct_materials() {
        let calls = Rc::new(Cell::new(0));
        let mut cache = MaterialCache::new(instant_source(Rc::clone(&calls)));
        let base = cache.resolve_material(&params("/t1.png", Pattern::Straight)).unwrap();
        let base = base.ready().unwrap().clone();

        let mut variants = vec![params("/t1.png", Pattern::Herringbone), params("/t2.png", Pattern::Straight)];
        let mut p = params("/t1.png", Pattern::Straight);
        p.tile_width_mm = 300;
        variants.push(p);
        let mut p = params("/t1.png", Pattern::Straight);
        p.surface_height_m = 2.5;
        variants.push(p);
        let mut p = params("/t1.png", Pattern::Straight);
        p.roughness = 0.8;
        variants.push(p);

        for variant in &variants {
            let other = cache.resolve_material(variant).unwrap();
            assert!(!Rc::ptr_eq(&base, other.ready().unwrap()));
        }
        assert_eq!(cache.material_count(), 1 + variants.len());
    }

    #[test]
    fn test_one_load_per_image() {
        let calls = Rc::new(Cell::new(0));
        let mut cache = MaterialCache::new(instant_source(Rc::clone(&calls)));

        for pattern in Pattern::ALL {
            cache.resolve_material(&params("/shared.png", pattern)).unwrap();
        }
        let first = cache.resolve_texture("/shared.png");
        let second = cache.resolve_texture("/shared.png");

        assert!(first.ptr_eq(&second));
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.stats().loads_started, 1);
    }

    #[test]
    fn test_pending_load_is_shared() {
        let pending: Rc<RefCell<Vec<LoadCompletion>>> = Rc::new(RefCell::new(Vec::new()));
        let queue = Rc::clone(&pending);
        let mut cache = MaterialCache::new(move |_: &str, completion: LoadCompletion| {
            queue.borrow_mut().push(completion);
        });

        let p = params("/slow.png", Pattern::Diagonal);
        assert!(matches!(cache.resolve_material(&p).unwrap(), MaterialLookup::Loading));
        assert!(matches!(cache.resolve_material(&p).unwrap(), MaterialLookup::Loading));
        assert_eq!(pending.borrow().len(), 1);

        let handle = cache.resolve_texture("/slow.png");
        pending.borrow_mut().pop().unwrap().resolve(Ok(TextureImage::new(256, 256)));

        let texture = pollster::block_on(handle).unwrap();
        let material = cache.resolve_material(&p).unwrap();
        let material = material.ready().unwrap();
        assert!(Rc::ptr_eq(&material.texture, &texture));
        assert!((material.uv.rotation - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn test_failed_load_reported_not_retried() {
        let calls = Rc::new(Cell::new(0));
        let mut cache = MaterialCache::new(instant_source(Rc::clone(&calls)));

        for _ in 0..3 {
            match cache.resolve_material(&params("/broken.png", Pattern::Straight)).unwrap() {
                MaterialLookup::Failed(err) => assert_eq!(err.image_ref, "/broken.png"),
                other => panic!("Expected failure, got {:?}", other),
            }
        }
        assert_eq!(calls.get(), 1);

        cache.invalidate("/broken.png");
        cache.resolve_texture("/broken.png");
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_invalid_dimensions_error() {
        let calls = Rc::new(Cell::new(0));
        let mut cache = MaterialCache::new(instant_source(Rc::clone(&calls)));
        let mut p = params("/t1.png", Pattern::Straight);
        p.surface_width_m = 0.0;
        assert!(matches!(cache.resolve_material(&p), Err(MappingError::InvalidDimension { .. })));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_invalidate_disposes_derived_entries() {
        let calls = Rc::new(Cell::new(0));
        let released = Rc::new(RefCell::new(Vec::new()));
        let mut cache = MaterialCache::new(instant_source(Rc::clone(&calls)));
        let sink = Rc::clone(&released);
        cache.on_release(move |r| sink.borrow_mut().push(r));

        let a = cache.resolve_material(&params("/a.png", Pattern::Straight)).unwrap();
        let a2 = cache.resolve_material(&params("/a.png", Pattern::Brick)).unwrap();
        let b = cache.resolve_material(&params("/b.png", Pattern::Straight)).unwrap();

        assert_eq!(cache.invalidate("/a.png"), 3);
        assert!(a.ready().unwrap().is_disposed());
        assert!(a2.ready().unwrap().is_disposed());
        assert!(a.ready().unwrap().texture.is_disposed());
        assert!(!b.ready().unwrap().is_disposed());
        assert_eq!(released.borrow().len(), 3);
        assert_eq!(cache.material_count(), 1);
        assert_eq!(cache.texture_count(), 1);

        assert_eq!(cache.clear_all(), 2);
        assert!(b.ready().unwrap().texture.is_disposed());
        assert_eq!(cache.material_count(), 0);
        assert_eq!(cache.texture_count(), 0);
    }

    #[test]
    fn test_invalidate_rejects_pending_waiters() {
        let pending: Rc<RefCell<Vec<LoadCompletion>>> = Rc::new(RefCell::new(Vec::new()));
        let queue = Rc::clone(&pending);
        let mut cache = MaterialCache::new(move |_: &str, completion: LoadCompletion| {
            queue.borrow_mut().push(completion);
        });

        let stale = cache.resolve_texture("/slow.png");
        assert_eq!(cache.invalidate("/slow.png"), 1);
        assert!(pollster::block_on(stale.clone()).is_err());

        // The reload is a fresh slot. The old completion arriving late
        // changes nothing.
        let fresh = cache.resolve_texture("/slow.png");
        assert!(!fresh.ptr_eq(&stale));
        let mut completions = pending.borrow_mut().drain(..).collect::<Vec<_>>();
        assert_eq!(completions.len(), 2);
        let newest = completions.pop().unwrap();
        completions.pop().unwrap().resolve(Ok(TextureImage::new(32, 32)));
        assert!(matches!(stale.state(), TextureState::Failed(_)));
        assert!(fresh.is_pending());

        newest.resolve(Ok(TextureImage::new(32, 32)));
        assert!(pollster::block_on(fresh).is_ok());
        assert_eq!(cache.stats().disposed, 0);
    }

    #[test]
    fn test_rebuild_after_invalidate_is_new_instance() {
        let calls = Rc::new(Cell::new(0));
        let mut cache = MaterialCache::new(instant_source(Rc::clone(&calls)));
        let p = params("/a.png", Pattern::Straight);

        let first = cache.resolve_material(&p).unwrap().ready().unwrap().clone();
        cache.clear_all();
        let second = cache.resolve_material(&p).unwrap().ready().unwrap().clone();
        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(calls.get(), 2);
    }
}
