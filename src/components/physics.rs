use glam::Vec3;
use hecs::Entity;

/// World gravity, read-only to every system.
#[derive(Debug, Clone, Copy)]
pub struct Gravity(pub Vec3);

impl Gravity {
    pub fn magnitude(&self) -> f32 {
        self.0.length()
    }
}

impl Default for Gravity {
    fn default() -> Self {
        Self(Vec3::new(0.0, -9.81, 0.0))
    }
}

/// Linear velocity in world space for loose debris.
pub struct Velocity(pub Vec3);

/// Marker: entity is integrated under gravity by the debris step.
pub struct GravityAffected;

/// Static axis-aligned box the player cannot pass through.
pub struct Solid {
    pub half_extents: Vec3,
}

/// Axis-aligned trigger box. Tracks who is inside so only entries fire.
pub struct TriggerVolume {
    pub half_extents: Vec3,
    pub occupants: Vec<Entity>,
}

impl TriggerVolume {
    pub fn new(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            occupants: Vec::new(),
        }
    }
}

/// Player collision box plus the results of its last move.
pub struct KinematicBody {
    pub half_extents: Vec3,
    /// Displacement of the last non-zero-length tick divided by its dt.
    pub velocity: Vec3,
    pub grounded: bool,
}

impl KinematicBody {
    pub fn new(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            velocity: Vec3::ZERO,
            grounded: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Strict overlap; touching faces do not count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.cmplt(other.max).all() && self.max.cmpgt(other.min).all()
    }
}
