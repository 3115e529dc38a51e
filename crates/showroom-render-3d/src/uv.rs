//! Tile dimension and layout pattern to texture transform mapping.
//!
//! A tile image is stretched once over the UV square, so the number of times
//! it repeats across a surface is the surface extent divided by the physical
//! tile extent. Fractional repeats are kept as-is: a partial tile at the edge
//! is expected.

use std::f32::consts::{FRAC_PI_4, SQRT_2};

use glam::{Mat3, Vec2, Vec3};

use showroom_core::{MappingError, Pattern};

/// Millimeters per meter.
const MM_PER_M: f32 = 1000.0;

/// Texture transform parameters for one surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvTransform {
    /// Tile repeats along U and V.
    pub repeat: Vec2,
    pub offset: Vec2,
    /// Rotation in radians about `center`.
    pub rotation: f32,
    /// Normalized rotation pivot.
    pub center: Vec2,
}

impl Default for UvTransform {
    fn default() -> Self {
        Self {
            repeat: Vec2::ONE,
            offset: Vec2::ZERO,
            rotation: 0.0,
            center: Vec2::splat(0.5),
        }
    }
}

impl UvTransform {
    /// The 3x3 UV matrix: scale and rotate about `center`, then translate by
    /// `offset`. Same composition as three.js `Matrix3::setUvTransform`.
    pub fn to_matrix(&self) -> Mat3 {
        let (s, c) = self.rotation.sin_cos();
        let Vec2 { x: sx, y: sy } = self.repeat;
        let Vec2 { x: cx, y: cy } = self.center;

        Mat3::from_cols(
            Vec3::new(sx * c, -sy * s, 0.0),
            Vec3::new(sx * s, sy * c, 0.0),
            Vec3::new(
                -sx * (c * cx + s * cy) + cx + self.offset.x,
                -sy * (-s * cx + c * cy) + cy + self.offset.y,
                1.0,
            ),
        )
    }

    /// Map a surface UV coordinate into texture space.
    pub fn apply(&self, uv: Vec2) -> Vec2 {
        self.to_matrix().transform_point2(uv)
    }
}

fn check(what: &'static str, value: f32) -> Result<f32, MappingError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MappingError::InvalidDimension {
            what,
            value: value as f64,
        })
    }
}

/// Compute the texture transform for a tile laid on a surface.
///
/// Tile dimensions are in millimeters, surface dimensions in meters.
///
/// `Brick` maps exactly like `Straight`: staggering alternate rows needs a
/// per-row offset that one global transform cannot express. See
/// [`Pattern::row_stagger`].
pub fn compute_uv_transform(
    tile_width_mm: f32,
    tile_height_mm: f32,
    surface_width_m: f32,
    surface_height_m: f32,
    pattern: Pattern,
) -> Result<UvTransform, MappingError> {
    let tile_w = check("tile width", tile_width_mm)? / MM_PER_M;
    let tile_h = check("tile height", tile_height_mm)? / MM_PER_M;
    let surface_w = check("surface width", surface_width_m)?;
    let surface_h = check("surface height", surface_height_m)?;

    let repeat = Vec2::new(surface_w / tile_w, surface_h / tile_h);

    let transform = match pattern {
        Pattern::Straight | Pattern::Brick => UvTransform {
            repeat,
            ..UvTransform::default()
        },
        // A 45 degree layout covers a diagonal footprint, so more tiles span
        // each axis.
        Pattern::Herringbone | Pattern::Diagonal => UvTransform {
            repeat: repeat * SQRT_2,
            rotation: FRAC_PI_4,
            ..UvTransform::default()
        },
    };

    Ok(transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_straight_bathroom_floor() {
        let t = compute_uv_transform(600.0, 600.0, 3.0, 3.5, Pattern::Straight).unwrap();
        assert!((t.repeat.x - 5.0).abs() < 1e-4);
        assert!((t.repeat.y - 5.8333).abs() < 1e-3);
        assert_eq!(t.rotation, 0.0);
        assert_eq!(t.offset, Vec2::ZERO);
    }

    #[test]
    fn test_brick_matches_straight() {
        let straight = compute_uv_transform(300.0, 150.0, 4.0, 2.8, Pattern::Straight).unwrap();
        let brick = compute_uv_transform(300.0, 150.0, 4.0, 2.8, Pattern::Brick).unwrap();
        assert_eq!(straight, brick);
    }

    #[test]
    fn test_herringbone_rotation_and_center() {
        let t = compute_uv_transform(600.0, 300.0, 4.0, 5.0, Pattern::Herringbone).unwrap();
        assert!((t.rotation - FRAC_PI_4).abs() < 1e-6);
        assert_eq!(t.center, Vec2::splat(0.5));
    }

    #[test]
    fn test_fractional_repeat_not_rounded() {
        let t = compute_uv_transform(450.0, 450.0, 4.0, 4.0, Pattern::Straight).unwrap();
        assert!((t.repeat.x - 8.888_889).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_dimensions() {
        let err = compute_uv_transform(0.0, 600.0, 3.0, 3.0, Pattern::Straight).unwrap_err();
        assert!(matches!(err, MappingError::InvalidDimension { what: "tile width", .. }));

        assert!(compute_uv_transform(600.0, -1.0, 3.0, 3.0, Pattern::Straight).is_err());
        assert!(compute_uv_transform(600.0, 600.0, f32::NAN, 3.0, Pattern::Straight).is_err());
        assert!(compute_uv_transform(600.0, 600.0, 3.0, f32::INFINITY, Pattern::Diagonal).is_err());
    }

    #[test]
    fn test_matrix_without_rotation_scales_uv() {
        let t = UvTransform {
            repeat: Vec2::new(5.0, 4.0),
            center: Vec2::ZERO,
            ..UvTransform::default()
        };
        let uv = t.apply(Vec2::new(1.0, 1.0));
        assert!((uv - Vec2::new(5.0, 4.0)).length() < 1e-5);
    }

    #[test]
    fn test_matrix_keeps_center_fixed() {
        let t = compute_uv_transform(600.0, 600.0, 3.0, 3.0, Pattern::Diagonal).unwrap();
        let uv = t.apply(Vec2::splat(0.5));
        assert!((uv - Vec2::splat(0.5)).length() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_straight_repeat_is_surface_over_tile(
            tw in 1u32..2000,
            th in 1u32..2000,
            sw in 0.1f32..20.0,
            sh in 0.1f32..20.0,
        ) {
            let t = compute_uv_transform(tw as f32, th as f32, sw, sh, Pattern::Straight).unwrap();
            let ex = sw / (tw as f32 / 1000.0);
            let ey = sh / (th as f32 / 1000.0);
            prop_assert!((t.repeat.x - ex).abs() <= ex * 1e-5);
            prop_assert!((t.repeat.y - ey).abs() <= ey * 1e-5);
        }

        #[test]
        fn prop_rotated_patterns_scale_by_sqrt2(
            tw in 1u32..2000,
            th in 1u32..2000,
            sw in 0.1f32..20.0,
            sh in 0.1f32..20.0,
            diagonal in any::<bool>(),
        ) {
            let pattern = if diagonal { Pattern::Diagonal } else { Pattern::Herringbone };
            let straight = compute_uv_transform(tw as f32, th as f32, sw, sh, Pattern::Straight).unwrap();
            let rotated = compute_uv_transform(tw as f32, th as f32, sw, sh, pattern).unwrap();
            let ratio = rotated.repeat / straight.repeat;
            prop_assert!((ratio.x - SQRT_2).abs() < 1e-3);
            prop_assert!((ratio.y - SQRT_2).abs() < 1e-3);
            prop_assert!((rotated.rotation - FRAC_PI_4).abs() < 1e-6);
        }
    }
}
