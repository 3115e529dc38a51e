//! Surface generation from room configurations.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use smallvec::SmallVec;

use showroom_core::{RoomType, SurfaceDescriptor, SurfaceKind};

use crate::rooms::RoomConfig;

/// Stable surface identifiers. Saved mappings are keyed by these strings.
pub mod ids {
    pub const FLOOR: &str = "floor";
    pub const WALL_BACK: &str = "wall-back";
    pub const WALL_LEFT: &str = "wall-left";
    pub const WALL_RIGHT: &str = "wall-right";
    pub const WALL_FRONT: &str = "wall-front";
    pub const BACKSPLASH: &str = "backsplash";
    pub const COUNTERTOP: &str = "countertop";
}

/// Surfaces of one room. At most six per room, so they stay inline.
pub type SurfaceList = SmallVec<[SurfaceDescriptor; 6]>;

/// Backsplash sits this far in front of the back wall to avoid z-fighting.
const BACKSPLASH_INSET: f32 = 0.01;

/// Generate the addressable surfaces for a room type.
///
/// Deterministic: the same room type always yields the same ids and
/// dimensions.
pub fn generate(room: RoomType) -> SurfaceList {
    let cfg = RoomConfig::for_room(room);
    let half_w = cfg.half_width();
    let half_d = cfg.half_depth();
    let half_h = cfg.height / 2.0;

    let mut surfaces = SurfaceList::new();

    surfaces.push(
        SurfaceDescriptor::new(ids::FLOOR, SurfaceKind::Floor, cfg.width, cfg.depth)
            .rotated(Vec3::new(-FRAC_PI_2, 0.0, 0.0)),
    );
    surfaces.push(
        SurfaceDescriptor::new(ids::WALL_BACK, SurfaceKind::Wall, cfg.width, cfg.height)
            .at(Vec3::new(0.0, half_h, -half_d)),
    );
    surfaces.push(
        SurfaceDescriptor::new(ids::WALL_LEFT, SurfaceKind::Wall, cfg.depth, cfg.height)
            .at(Vec3::new(-half_w, half_h, 0.0))
            .rotated(Vec3::new(0.0, FRAC_PI_2, 0.0)),
    );
    surfaces.push(
        SurfaceDescriptor::new(ids::WALL_RIGHT, SurfaceKind::Wall, cfg.depth, cfg.height)
            .at(Vec3::new(half_w, half_h, 0.0))
            .rotated(Vec3::new(0.0, -FRAC_PI_2, 0.0)),
    );

    if cfg.has_countertop {
        surfaces.push(
            SurfaceDescriptor::new(ids::COUNTERTOP, SurfaceKind::Countertop, cfg.width, cfg.counter_depth)
                .at(Vec3::new(0.0, cfg.counter_height, -half_d + cfg.counter_depth / 2.0))
                .rotated(Vec3::new(-FRAC_PI_2, 0.0, 0.0)),
        );
    }

    if cfg.has_backsplash {
        surfaces.push(
            SurfaceDescriptor::new(ids::BACKSPLASH, SurfaceKind::Backsplash, cfg.width, cfg.backsplash_height)
                .at(Vec3::new(
                    0.0,
                    cfg.counter_height + cfg.backsplash_height / 2.0,
                    -half_d + BACKSPLASH_INSET,
                )),
        );
    }

    surfaces
}

/// The fixed surface id set of a room type, without building descriptors.
pub fn surface_ids(room: RoomType) -> SmallVec<[&'static str; 6]> {
    let cfg = RoomConfig::for_room(room);
    let mut out: SmallVec<[&'static str; 6]> =
        SmallVec::from_slice(&[ids::FLOOR, ids::WALL_BACK, ids::WALL_LEFT, ids::WALL_RIGHT]);
    if cfg.has_countertop {
        out.push(ids::COUNTERTOP);
    }
    if cfg.has_backsplash {
        out.push(ids::BACKSPLASH);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(surfaces: &'a SurfaceList, id: &str) -> &'a SurfaceDescriptor {
        surfaces.iter().find(|s| s.id.as_str() == id).unwrap()
    }

    #[test]
    fn test_bathroom_surfaces() {
        let surfaces = generate(RoomType::Bathroom);
        let mut got: Vec<&str> = surfaces.iter().map(|s| s.id.as_str()).collect();
        got.sort();
        assert_eq!(
            got,
            vec!["backsplash", "countertop", "floor", "wall-back", "wall-left", "wall-right"]
        );

        let floor = find(&surfaces, "floor");
        assert_eq!((floor.width, floor.height), (3.0, 3.5));
        assert_eq!(floor.kind, SurfaceKind::Floor);
    }

    #[test]
    fn test_living_room_has_only_floor_and_walls() {
        let surfaces = generate(RoomType::LivingRoom);
        assert_eq!(surfaces.len(), 4);
        assert!(surfaces.iter().all(|s| matches!(s.kind, SurfaceKind::Floor | SurfaceKind::Wall)));
    }

    #[test]
    fn test_kitchen_dimensions() {
        let surfaces = generate(RoomType::Kitchen);
        let back = find(&surfaces, "wall-back");
        assert_eq!((back.width, back.height), (4.0, 2.8));
        let left = find(&surfaces, "wall-left");
        assert_eq!((left.width, left.height), (5.0, 2.8));
        let counter = find(&surfaces, "countertop");
        assert_eq!((counter.width, counter.height), (4.0, 0.6));
        let splash = find(&surfaces, "backsplash");
        assert_eq!((splash.width, splash.height), (4.0, 0.6));
        assert!((splash.position.y - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_generation_is_deterministic() {
        for room in RoomType::all() {
            assert_eq!(generate(room), generate(room));
            let generated = generate(room);
            let ids: Vec<&str> = generated.iter().map(|s| s.id.as_str()).collect();
            assert_eq!(ids.as_slice(), surface_ids(room).as_slice());
        }
    }

    #[test]
    fn test_front_wall_not_addressable() {
        for room in RoomType::all() {
            assert!(!surface_ids(room).contains(&ids::WALL_FRONT));
        }
    }
}
