//! TypeScript-friendly type definitions for WASM bindings.

use serde::{Deserialize, Serialize};

use showroom_core::{Color, LightingPreset, Pattern, RoomType, SurfaceDescriptor, SurfaceKind, TileCategory};
use showroom_layout::CameraPose;
use showroom_render_3d::{
    CacheOptions, Light, LightingRig, Material, ReleasedResource, SamplerSettings, TiledMaterial,
};
use showroom_scene::{BoundMaterial, Highlight, InteractionOutcome, RegistryOptions, StateChange, TileFilter};

/// Engine options from JavaScript. Missing fields keep their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineOptionsJs {
    #[serde(default)]
    pub room: Option<RoomType>,
    #[serde(default)]
    pub pattern: Option<Pattern>,
    #[serde(default)]
    pub lighting: Option<LightingPreset>,
    #[serde(default)]
    pub anisotropy: Option<u8>,
    #[serde(default)]
    pub metalness: Option<f32>,
    #[serde(default)]
    pub max_upload_bytes: Option<usize>,
    /// Seed the catalog with the procedural stock tiles.
    #[serde(default)]
    pub stock_tiles: Option<bool>,
}

impl EngineOptionsJs {
    pub fn registry_options(&self) -> RegistryOptions {
        let mut opts = RegistryOptions::default();
        if let Some(room) = self.room {
            opts = opts.with_room(room);
        }
        if let Some(pattern) = self.pattern {
            opts = opts.with_pattern(pattern);
        }
        if let Some(lighting) = self.lighting {
            opts = opts.with_lighting(lighting);
        }
        opts
    }

    pub fn cache_options(&self) -> CacheOptions {
        let mut opts = CacheOptions::default();
        if let Some(anisotropy) = self.anisotropy {
            opts = opts.with_anisotropy(anisotropy);
        }
        if let Some(metalness) = self.metalness {
            opts = opts.with_metalness(metalness);
        }
        opts
    }
}

/// Catalog filter from JavaScript. A category of `"all"` matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileFilterJs {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub collection: Option<String>,
}

impl TileFilterJs {
    pub fn into_core(self) -> TileFilter {
        let category = match self.category.as_deref() {
            Some("floor") => Some(TileCategory::Floor),
            Some("wall") => Some(TileCategory::Wall),
            _ => None,
        };
        TileFilter {
            category,
            collection: self.collection,
        }
    }
}

/// A surface for the renderer to build.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceJs {
    pub id: String,
    pub kind: SurfaceKind,
    pub width: f32,
    pub height: f32,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    /// `"none"`, `"hovered"`, or `"selected"`.
    pub highlight: &'static str,
}

impl SurfaceJs {
    pub fn new(surface: &SurfaceDescriptor, highlight: Highlight) -> Self {
        Self {
            id: surface.id.to_string(),
            kind: surface.kind,
            width: surface.width,
            height: surface.height,
            position: surface.position.to_array(),
            rotation: surface.rotation.to_array(),
            highlight: highlight_name(highlight),
        }
    }
}

pub fn highlight_name(highlight: Highlight) -> &'static str {
    match highlight {
        Highlight::None => "none",
        Highlight::Hovered => "hovered",
        Highlight::Selected => "selected",
    }
}

/// Sampler settings for JavaScript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplerJs {
    pub repeat_wrap: bool,
    pub srgb: bool,
    pub anisotropy: u8,
    pub generate_mipmaps: bool,
}

impl From<&SamplerSettings> for SamplerJs {
    fn from(s: &SamplerSettings) -> Self {
        use showroom_render_3d::{ColorSpace, WrapMode};
        Self {
            repeat_wrap: s.wrap_s == WrapMode::Repeat && s.wrap_t == WrapMode::Repeat,
            srgb: s.color_space == ColorSpace::Srgb,
            anisotropy: s.anisotropy,
            generate_mipmaps: s.generate_mipmaps,
        }
    }
}

/// The material one surface should be drawn with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MaterialBindingJs {
    #[serde(rename_all = "camelCase")]
    Default {
        surface_id: String,
        color: String,
        roughness: f32,
        metalness: f32,
    },
    #[serde(rename_all = "camelCase")]
    Tiled {
        surface_id: String,
        material_id: u64,
        texture_id: u64,
        image_ref: String,
        repeat: [f32; 2],
        offset: [f32; 2],
        rotation: f32,
        center: [f32; 2],
        /// Column-major 3x3 UV matrix.
        uv_matrix: [f32; 9],
        roughness: f32,
        metalness: f32,
        double_sided: bool,
        sampler: SamplerJs,
    },
}

impl MaterialBindingJs {
    pub fn new(surface_id: &str, bound: &BoundMaterial) -> Self {
        match bound {
            BoundMaterial::Default(material) => Self::untiled(surface_id, material),
            BoundMaterial::Tiled(material) => Self::tiled(surface_id, material),
        }
    }

    fn untiled(surface_id: &str, material: &Material) -> Self {
        MaterialBindingJs::Default {
            surface_id: surface_id.to_string(),
            color: material.color.to_hex(),
            roughness: material.roughness,
            metalness: material.metallic,
        }
    }

    fn tiled(surface_id: &str, material: &TiledMaterial) -> Self {
        MaterialBindingJs::Tiled {
            surface_id: surface_id.to_string(),
            material_id: material.id.0,
            texture_id: material.texture.id.0,
            image_ref: material.texture.image_ref.clone(),
            repeat: material.uv.repeat.to_array(),
            offset: material.uv.offset.to_array(),
            rotation: material.uv.rotation,
            center: material.uv.center.to_array(),
            uv_matrix: material.uv.to_matrix().to_cols_array(),
            roughness: material.roughness,
            metalness: material.metalness,
            double_sided: material.double_sided,
            sampler: SamplerJs::from(&material.texture.sampler),
        }
    }
}

/// A light for JavaScript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LightJs {
    #[serde(rename_all = "camelCase")]
    Ambient { color: String, intensity: f32 },
    #[serde(rename_all = "camelCase")]
    Directional {
        color: String,
        intensity: f32,
        position: [f32; 3],
        cast_shadow: bool,
    },
    #[serde(rename_all = "camelCase")]
    Hemisphere {
        sky_color: String,
        ground_color: String,
        intensity: f32,
    },
}

impl From<&Light> for LightJs {
    fn from(light: &Light) -> Self {
        let hex = |c: &Color| c.to_hex();
        match light {
            Light::Ambient { color, intensity } => LightJs::Ambient {
                color: hex(color),
                intensity: *intensity,
            },
            Light::Directional {
                position,
                color,
                intensity,
            } => LightJs::Directional {
                color: hex(color),
                intensity: *intensity,
                position: position.to_array(),
                cast_shadow: true,
            },
            Light::Hemisphere { sky, ground, intensity } => LightJs::Hemisphere {
                sky_color: hex(sky),
                ground_color: hex(ground),
                intensity: *intensity,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightingRigJs {
    pub preset: LightingPreset,
    pub environment: String,
    pub lights: Vec<LightJs>,
}

impl LightingRigJs {
    pub fn new(preset: LightingPreset, rig: &LightingRig) -> Self {
        Self {
            preset,
            environment: rig.environment.to_string(),
            lights: rig.lights.iter().map(LightJs::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraPoseJs {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl From<&CameraPose> for CameraPoseJs {
    fn from(pose: &CameraPose) -> Self {
        Self {
            position: pose.position.to_array(),
            target: pose.target.to_array(),
            fov: pose.fov,
            min_distance: pose.min_distance,
            max_distance: pose.max_distance,
        }
    }
}

/// A resource the renderer should free.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleasedJs {
    /// `"texture"` or `"material"`.
    pub kind: &'static str,
    pub id: u64,
}

impl From<ReleasedResource> for ReleasedJs {
    fn from(resource: ReleasedResource) -> Self {
        match resource {
            ReleasedResource::Texture(id) => ReleasedJs { kind: "texture", id: id.0 },
            ReleasedResource::Material(id) => ReleasedJs { kind: "material", id: id.0 },
        }
    }
}

/// A state change notification for JavaScript.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateChangeJs {
    pub kind: &'static str,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl From<&StateChange> for StateChangeJs {
    fn from(change: &StateChange) -> Self {
        let (kind, surface_id, value) = match change {
            StateChange::RoomChanged(room) => ("roomChanged", None, Some(room.as_str().to_string())),
            StateChange::SelectionChanged(id) => ("selectionChanged", id.as_ref().map(|s| s.to_string()), None),
            StateChange::HoverChanged(id) => ("hoverChanged", id.as_ref().map(|s| s.to_string()), None),
            StateChange::MappingChanged { surface, mapping } => (
                "mappingChanged",
                Some(surface.to_string()),
                mapping.as_ref().map(|m| m.tile_id.to_string()),
            ),
            StateChange::MappingsReplaced => ("mappingsReplaced", None, None),
            StateChange::ActiveTileChanged(tile) => ("activeTileChanged", None, tile.as_ref().map(|t| t.to_string())),
            StateChange::PatternChanged(p) => ("patternChanged", None, Some(p.as_str().to_string())),
            StateChange::LightingChanged(l) => ("lightingChanged", None, Some(l.as_str().to_string())),
            StateChange::BeforeViewChanged(on) => ("beforeViewChanged", None, Some(on.to_string())),
            StateChange::Reset => ("reset", None, None),
        };
        Self { kind, surface_id, value }
    }
}

/// Result of a pointer event for JavaScript.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionJs {
    /// `"hovered"`, `"unhovered"`, `"selected"`, `"applied"`, or `"ignored"`.
    pub outcome: &'static str,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_id: Option<String>,
}

impl From<InteractionOutcome> for InteractionJs {
    fn from(outcome: InteractionOutcome) -> Self {
        let (outcome, surface_id) = match outcome {
            InteractionOutcome::Hovered(id) => ("hovered", Some(id.to_string())),
            InteractionOutcome::Unhovered => ("unhovered", None),
            InteractionOutcome::Selected(id) => ("selected", Some(id.to_string())),
            InteractionOutcome::Applied(id) => ("applied", Some(id.to_string())),
            InteractionOutcome::Ignored => ("ignored", None),
        };
        Self { outcome, surface_id }
    }
}
