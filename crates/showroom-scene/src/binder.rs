//! Per-surface material binding.
//!
//! Each frame the renderer asks which material a surface should be drawn
//! with. Tiled materials come from the shared [`MaterialCache`]; while a new
//! texture is still loading the surface keeps whatever it showed before.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use showroom_core::{SceneError, SurfaceDescriptor, SurfaceId};
use showroom_render_3d::{Material, MaterialCache, MaterialLookup, MaterialParams, TiledMaterial};

use crate::catalog::Catalog;
use crate::registry::SurfaceRegistry;

/// The material a surface is drawn with this frame.
#[derive(Debug, Clone)]
pub enum BoundMaterial {
    /// Untiled look of the surface kind.
    Default(Material),
    Tiled(Rc<TiledMaterial>),
}

impl BoundMaterial {
    pub fn is_tiled(&self) -> bool {
        matches!(self, BoundMaterial::Tiled(_))
    }

    pub fn tiled(&self) -> Option<&Rc<TiledMaterial>> {
        match self {
            BoundMaterial::Tiled(mat) => Some(mat),
            BoundMaterial::Default(_) => None,
        }
    }
}

/// Remembers the last tiled material bound to each surface.
#[derive(Debug, Default)]
pub struct SurfaceMaterials {
    last_bound: FxHashMap<SurfaceId, Rc<TiledMaterial>>,
}

impl SurfaceMaterials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the material for one surface of the current room.
    pub fn material_for<C: Catalog>(
        &mut self,
        registry: &SurfaceRegistry<C>,
        cache: &mut MaterialCache,
        surface_id: &str,
    ) -> Result<BoundMaterial, SceneError> {
        let surface = registry
            .surface(surface_id)
            .ok_or_else(|| SceneError::UnknownSurface { id: surface_id.to_string() })?;
        let fallback = BoundMaterial::Default(Material::default_for(surface.kind));

        if registry.show_before() {
            return Ok(fallback);
        }

        let Some(mapping) = registry.mapping(surface_id) else {
            self.last_bound.remove(surface_id);
            return Ok(fallback);
        };
        let Some(tile) = registry.catalog().get_tile(mapping.tile_id.as_str()) else {
            self.last_bound.remove(surface_id);
            return Ok(fallback);
        };

        let params = MaterialParams::for_tile(tile, surface, mapping.pattern);
        let lookup = match cache.resolve_material(&params) {
            Ok(lookup) => lookup,
            Err(err) => {
                log::warn!("cannot map tile {} onto {}: {}", tile.id, surface_id, err);
                return Ok(fallback);
            }
        };

        Ok(match lookup {
            MaterialLookup::Ready(material) => {
                self.last_bound.insert(surface.id.clone(), Rc::clone(&material));
                BoundMaterial::Tiled(material)
            }
            MaterialLookup::Loading => match self.last_bound.get(surface_id) {
                Some(previous) if !previous.is_disposed() => BoundMaterial::Tiled(Rc::clone(previous)),
                _ => fallback,
            },
            MaterialLookup::Failed(_) => {
                self.last_bound.remove(surface_id);
                fallback
            }
        })
    }

    /// Bind every surface of the current room, in generation order.
    pub fn bind_all<C: Catalog>(
        &mut self,
        registry: &SurfaceRegistry<C>,
        cache: &mut MaterialCache,
    ) -> Vec<(SurfaceDescriptor, BoundMaterial)> {
        let mut bound = Vec::with_capacity(registry.surfaces().len());
        for surface in registry.surfaces() {
            if let Ok(material) = self.material_for(registry, cache, surface.id.as_str()) {
                bound.push((surface.clone(), material));
            }
        }
        bound
    }

    /// Forget every remembered material, e.g. after the cache was cleared.
    pub fn clear(&mut self) {
        self.last_bound.clear();
    }
}
