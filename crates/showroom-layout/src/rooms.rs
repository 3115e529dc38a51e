//! Static room configurations.

use glam::Vec3;
use showroom_core::RoomType;

/// Physical configuration of a room type, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomConfig {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    pub has_backsplash: bool,
    pub has_countertop: bool,
    pub counter_height: f32,
    pub counter_depth: f32,
    pub backsplash_height: f32,
}

const KITCHEN: RoomConfig = RoomConfig {
    width: 4.0,
    depth: 5.0,
    height: 2.8,
    has_backsplash: true,
    has_countertop: true,
    counter_height: 0.9,
    counter_depth: 0.6,
    backsplash_height: 0.6,
};

const BATHROOM: RoomConfig = RoomConfig {
    width: 3.0,
    depth: 3.5,
    height: 2.5,
    has_backsplash: true,
    has_countertop: true,
    counter_height: 0.85,
    counter_depth: 0.5,
    backsplash_height: 0.5,
};

const LIVING_ROOM: RoomConfig = RoomConfig {
    width: 6.0,
    depth: 7.0,
    height: 3.0,
    has_backsplash: false,
    has_countertop: false,
    counter_height: 0.0,
    counter_depth: 0.0,
    backsplash_height: 0.0,
};

/// Axis-aligned interior box of a room. The front wall sits at `max_z`; it
/// bounds the room but is not addressable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
    pub floor: f32,
    pub ceiling: f32,
}

/// Default orbit camera for a room type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl CameraPose {
    const fn orbit(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            target: Vec3::new(0.0, 1.0, 0.0),
            fov: 50.0,
            min_distance: 3.0,
            max_distance: 15.0,
        }
    }

    /// Camera pose for a room type.
    pub const fn for_room(room: RoomType) -> Self {
        match room {
            RoomType::Kitchen => Self::orbit(6.0, 4.0, 6.0),
            RoomType::Bathroom => Self::orbit(4.0, 3.0, 4.0),
            RoomType::LivingRoom => Self::orbit(8.0, 5.0, 8.0),
        }
    }
}

impl RoomConfig {
    /// Look up the configuration for a room type.
    pub const fn for_room(room: RoomType) -> &'static RoomConfig {
        match room {
            RoomType::Kitchen => &KITCHEN,
            RoomType::Bathroom => &BATHROOM,
            RoomType::LivingRoom => &LIVING_ROOM,
        }
    }

    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    pub fn half_depth(&self) -> f32 {
        self.depth / 2.0
    }

    pub fn bounds(&self) -> RoomBounds {
        RoomBounds {
            min_x: -self.half_width(),
            max_x: self.half_width(),
            min_z: -self.half_depth(),
            max_z: self.half_depth(),
            floor: 0.0,
            ceiling: self.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_living_room_has_no_counter() {
        let cfg = RoomConfig::for_room(RoomType::LivingRoom);
        assert!(!cfg.has_countertop);
        assert!(!cfg.has_backsplash);
    }

    #[test]
    fn test_camera_outside_room() {
        for room in RoomType::all() {
            let pose = CameraPose::for_room(room);
            let b = RoomConfig::for_room(room).bounds();
            assert!(pose.position.x > b.max_x);
            assert!(pose.position.z > b.max_z);
        }
    }

    #[test]
    fn test_bounds() {
        let b = RoomConfig::for_room(RoomType::Kitchen).bounds();
        assert_eq!(b.min_x, -2.0);
        assert_eq!(b.max_z, 2.5);
        assert_eq!(b.ceiling, 2.8);
    }
}
