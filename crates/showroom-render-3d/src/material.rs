//! Untextured surface materials and lighting rigs.

use glam::Vec3;
use smallvec::{smallvec, SmallVec};

use showroom_core::{Color, LightingPreset, SurfaceKind};

/// A plain material describing surface appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Base color of the material, sRGB encoded.
    pub color: Color,
    /// Metallic factor (0.0 = dielectric, 1.0 = metal).
    pub metallic: f32,
    /// Roughness factor (0.0 = smooth/glossy, 1.0 = rough/matte).
    pub roughness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::rgb(0.8, 0.8, 0.8),
            metallic: 0.0,
            roughness: 0.5,
        }
    }
}

impl Material {
    /// Create a new material with the given color.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    /// Set the roughness.
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    /// Set the metallic factor.
    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic.clamp(0.0, 1.0);
        self
    }

    /// Base color converted to linear space for shading.
    pub fn linear_color(&self) -> [f32; 3] {
        [
            srgb_to_linear(self.color.r),
            srgb_to_linear(self.color.g),
            srgb_to_linear(self.color.b),
        ]
    }

    /// The "before" look of a surface with no tile applied.
    pub fn default_for(kind: SurfaceKind) -> Self {
        match kind {
            SurfaceKind::Floor => Material::new(Color::from_rgb8(0x80, 0x80, 0x80))
                .with_roughness(0.8)
                .with_metallic(0.1),
            SurfaceKind::Wall | SurfaceKind::Backsplash => {
                Material::new(Color::from_rgb8(0xf5, 0xf5, 0xf5)).with_roughness(0.9)
            }
            SurfaceKind::Countertop => Material::new(Color::from_rgb8(0x3a, 0x3a, 0x3a))
                .with_roughness(0.3)
                .with_metallic(0.2),
        }
    }
}

/// A light source.
#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    /// Shadow-casting directional light aimed at the origin from `position`.
    Directional {
        position: Vec3,
        color: Color,
        intensity: f32,
    },
    /// Sky/ground gradient light.
    Hemisphere {
        sky: Color,
        ground: Color,
        intensity: f32,
    },
    /// Ambient light.
    Ambient {
        color: Color,
        intensity: f32,
    },
}

impl Light {
    pub fn directional(position: Vec3, color: Color, intensity: f32) -> Self {
        Light::Directional { position, color, intensity }
    }

    pub fn ambient(color: Color, intensity: f32) -> Self {
        Light::Ambient { color, intensity }
    }

    pub fn hemisphere(sky: Color, ground: Color, intensity: f32) -> Self {
        Light::Hemisphere { sky, ground, intensity }
    }

    /// Direction the light travels, for directional lights.
    pub fn direction(&self) -> Option<Vec3> {
        match self {
            Light::Directional { position, .. } => Some((-*position).normalize_or_zero()),
            _ => None,
        }
    }
}

/// The fixed light set of a lighting preset.
#[derive(Debug, Clone, PartialEq)]
pub struct LightingRig {
    pub lights: SmallVec<[Light; 3]>,
    /// Name of the environment map the renderer should use for reflections.
    pub environment: &'static str,
}

/// Build the light set for a preset.
pub fn lighting_rig(preset: LightingPreset) -> LightingRig {
    let (ambient, directional, color, position, environment) = match preset {
        LightingPreset::Daylight => (0.6, 1.2, Color::WHITE, Vec3::new(5.0, 10.0, 5.0), "apartment"),
        LightingPreset::Warm => (
            0.4,
            1.0,
            Color::from_rgb8(0xff, 0xcc, 0x88),
            Vec3::new(3.0, 8.0, 2.0),
            "sunset",
        ),
        LightingPreset::Cool => (
            0.5,
            0.9,
            Color::from_rgb8(0xcc, 0xdd, 0xff),
            Vec3::new(4.0, 12.0, 6.0),
            "dawn",
        ),
    };

    LightingRig {
        lights: smallvec![
            Light::ambient(Color::WHITE, ambient),
            Light::directional(position, color, directional),
            Light::hemisphere(Color::WHITE, Color::from_rgb8(0x44, 0x44, 0x44), 0.3),
        ],
        environment,
    }
}

/// Convert sRGB color to linear.
pub fn srgb_to_linear(value: f32) -> f32 {
    if value <= 0.04045 {
        value / 12.92
    } else {
        ((value + 0.055) / 1.055).powf(2.4)
    }
}
