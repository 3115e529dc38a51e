//! Addressable surfaces of a room.

use glam::Vec3;

use crate::types::SurfaceId;

/// What kind of room part a surface is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SurfaceKind {
    Floor,
    Wall,
    Backsplash,
    Countertop,
}

/// A paintable region of the current room.
///
/// Width and height are the physical extents in meters of the plane the
/// texture is stretched over. Position and rotation are only consumed by the
/// renderer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SurfaceDescriptor {
    pub id: SurfaceId,
    pub kind: SurfaceKind,
    pub width: f32,
    pub height: f32,
    pub position: Vec3,
    /// Euler XYZ rotation in radians.
    pub rotation: Vec3,
}

impl SurfaceDescriptor {
    pub fn new(id: impl Into<SurfaceId>, kind: SurfaceKind, width: f32, height: f32) -> Self {
        Self {
            id: id.into(),
            kind,
            width,
            height,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn rotated(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Surface area in square meters.
    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}
