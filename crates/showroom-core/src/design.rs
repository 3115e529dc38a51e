//! Mappings and the persisted design aggregate.

use std::collections::BTreeMap;

use crate::types::{LightingPreset, Pattern, RoomType, SurfaceId, TileId};

/// The assignment of a tile to one surface.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Mapping {
    pub tile_id: TileId,
    pub pattern: Pattern,
    /// Rotation in degrees.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rotation: f32,
    /// Scale multiplier.
    #[cfg_attr(feature = "serde", serde(default = "default_scale"))]
    pub scale: f32,
}

#[cfg(feature = "serde")]
fn default_scale() -> f32 {
    1.0
}

impl Mapping {
    /// A mapping with zero rotation and unit scale.
    pub fn new(tile_id: impl Into<TileId>, pattern: Pattern) -> Self {
        Self {
            tile_id: tile_id.into(),
            pattern,
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

/// Surface id to mapping table, ordered by surface id so that its serialized
/// form is stable.
pub type MeshMappings = BTreeMap<SurfaceId, Mapping>;

/// Fields of a design supplied by the caller when saving.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DesignDraft {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub customer_name: Option<String>,
    pub room_type: RoomType,
    pub mesh_mappings: MeshMappings,
    #[cfg_attr(feature = "serde", serde(default))]
    pub lighting_preset: LightingPreset,
    #[cfg_attr(feature = "serde", serde(default))]
    pub screenshot_url: Option<String>,
}

impl DesignDraft {
    pub fn new(name: impl Into<String>, room_type: RoomType) -> Self {
        Self {
            name: name.into(),
            customer_name: None,
            room_type,
            mesh_mappings: MeshMappings::new(),
            lighting_preset: LightingPreset::default(),
            screenshot_url: None,
        }
    }

    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        self.customer_name = Some(customer.into());
        self
    }

    pub fn with_mapping(mut self, surface: impl Into<SurfaceId>, mapping: Mapping) -> Self {
        self.mesh_mappings.insert(surface.into(), mapping);
        self
    }

    pub fn with_lighting(mut self, preset: LightingPreset) -> Self {
        self.lighting_preset = preset;
        self
    }

    pub fn with_screenshot(mut self, url: impl Into<String>) -> Self {
        self.screenshot_url = Some(url.into());
        self
    }
}

/// A saved snapshot of a room: type, every mapping, and lighting.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Design {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub customer_name: Option<String>,
    pub room_type: RoomType,
    pub mesh_mappings: MeshMappings,
    #[cfg_attr(feature = "serde", serde(default))]
    pub lighting_preset: LightingPreset,
    #[cfg_attr(feature = "serde", serde(default))]
    pub screenshot_url: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
    /// Milliseconds since the Unix epoch.
    pub updated_at: u64,
}

impl Design {
    /// Materialize a draft with an id and creation time.
    pub fn from_draft(id: impl Into<String>, draft: DesignDraft, now_ms: u64) -> Self {
        Self {
            id: id.into(),
            name: draft.name,
            customer_name: draft.customer_name,
            room_type: draft.room_type,
            mesh_mappings: draft.mesh_mappings,
            lighting_preset: draft.lighting_preset,
            screenshot_url: draft.screenshot_url,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }
}
