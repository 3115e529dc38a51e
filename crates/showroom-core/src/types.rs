//! Core value types for the showroom.

use std::borrow::Borrow;
use std::fmt;

/// Identifier of an addressable surface (e.g. `floor`, `wall-back`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SurfaceId(pub String);

/// Identifier of a catalog tile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TileId(pub String);

macro_rules! string_id {
    ($ty:ident) => {
        impl $ty {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $ty {
            fn from(s: &str) -> Self {
                $ty(s.to_string())
            }
        }

        impl From<String> for $ty {
            fn from(s: String) -> Self {
                $ty(s)
            }
        }

        impl Borrow<str> for $ty {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(SurfaceId);
string_id!(TileId);

/// Room types the showroom can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RoomType {
    #[default]
    Kitchen,
    Bathroom,
    LivingRoom,
}

impl RoomType {
    /// All room types, in menu order.
    pub const fn all() -> [RoomType; 3] {
        [RoomType::Kitchen, RoomType::Bathroom, RoomType::LivingRoom]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Kitchen => "kitchen",
            RoomType::Bathroom => "bathroom",
            RoomType::LivingRoom => "living_room",
        }
    }

    /// Parse the wire name (`kitchen`, `bathroom`, `living_room`).
    pub fn from_name(name: &str) -> Option<Self> {
        RoomType::all().into_iter().find(|r| r.as_str() == name)
    }
}

/// Tile layout pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Pattern {
    #[default]
    Straight,
    Brick,
    Herringbone,
    Diagonal,
}

impl Pattern {
    pub const ALL: [Pattern; 4] = [
        Pattern::Straight,
        Pattern::Brick,
        Pattern::Herringbone,
        Pattern::Diagonal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Pattern::Straight => "straight",
            Pattern::Brick => "brick",
            Pattern::Herringbone => "herringbone",
            Pattern::Diagonal => "diagonal",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Pattern::ALL.into_iter().find(|p| p.as_str() == name)
    }

    /// Fraction of a tile width that alternate rows are meant to be shifted by.
    ///
    /// This is layout metadata only: a single global UV transform cannot
    /// express a per-row offset, so brick currently maps exactly like
    /// straight.
    pub fn row_stagger(&self) -> f32 {
        match self {
            Pattern::Brick => 0.5,
            _ => 0.0,
        }
    }
}

/// Tile surface finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Finish {
    Glossy,
    Matte,
    Textured,
}

impl Finish {
    /// Material roughness for this finish.
    pub fn roughness(&self) -> f32 {
        match self {
            Finish::Glossy => 0.3,
            Finish::Matte => 0.8,
            Finish::Textured => 0.6,
        }
    }
}

/// Catalog category of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TileCategory {
    Floor,
    Wall,
}

/// Fixed lighting parameter bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LightingPreset {
    #[default]
    Daylight,
    Warm,
    Cool,
}

impl LightingPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            LightingPreset::Daylight => "daylight",
            LightingPreset::Warm => "warm",
            LightingPreset::Cool => "cool",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [LightingPreset::Daylight, LightingPreset::Warm, LightingPreset::Cool]
            .into_iter()
            .find(|l| l.as_str() == name)
    }
}

/// A color value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create from 8-bit RGB values.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Create from hex string (e.g., "#FF5733" or "FF5733").
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        Some(Self::from_rgb8(r, g, b))
    }

    /// Convert to 8-bit RGB, rounding to nearest.
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (q(self.r), q(self.g), q(self.b))
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_roundtrip() {
        let c = Color::from_hex("#ffcc88").unwrap();
        assert_eq!(c.to_hex(), "#ffcc88");
        assert!(Color::from_hex("#fff").is_none());
        assert!(Color::from_hex("zzzzzz").is_none());
    }

    #[test]
    fn test_room_type_names() {
        for room in RoomType::all() {
            assert_eq!(RoomType::from_name(room.as_str()), Some(room));
        }
        assert_eq!(RoomType::from_name("garage"), None);
    }

    #[test]
    fn test_pattern_row_stagger() {
        assert_eq!(Pattern::Brick.row_stagger(), 0.5);
        assert_eq!(Pattern::Straight.row_stagger(), 0.0);
        assert_eq!(Pattern::from_name("herringbone"), Some(Pattern::Herringbone));
    }

    #[test]
    fn test_finish_roughness() {
        assert_eq!(Finish::Glossy.roughness(), 0.3);
        assert_eq!(Finish::Matte.roughness(), 0.8);
        assert_eq!(Finish::Textured.roughness(), 0.6);
    }

    #[test]
    fn test_surface_id_borrow() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(SurfaceId::from("floor"), 1);
        assert_eq!(map.get("floor"), Some(&1));
    }
}
