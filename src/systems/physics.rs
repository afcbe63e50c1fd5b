use glam::Vec3;
use hecs::World;

use crate::components::{Aabb, Gravity, GravityAffected, KinematicBody, LocalTransform, Solid, Velocity};

/// Kinematic sweep-and-resolve primitive driven by the movement behavior.
pub trait Mover {
    /// Move by `displacement` over `dt` seconds and report whether the move
    /// ended resting on something below.
    fn move_by(&mut self, displacement: Vec3, dt: f32) -> bool;

    /// Velocity actually achieved by the last move.
    fn velocity(&self) -> Vec3;
}

/// Gap left between the body and a surface it was pushed out of.
const SKIN: f32 = 1e-4;

/// Moves a [`KinematicBody`] through a snapshot of static boxes, one axis at a
/// time (X, then Z, then Y) so walls never eat vertical motion.
pub struct BodyMover<'a> {
    pub position: &'a mut Vec3,
    pub body: &'a mut KinematicBody,
    pub solids: &'a [Aabb],
}

impl BodyMover<'_> {
    /// Returns true if motion along `axis` was blocked. Solids the body
    /// already overlaps are ignored so a bad spawn cannot pin it in place.
    fn sweep_axis(&mut self, axis: usize, delta: f32) -> bool {
        if delta == 0.0 {
            return false;
        }
        let half = self.body.half_extents;
        let start = Aabb::from_center(*self.position, half);
        let mut next = *self.position;
        next[axis] += delta;
        let end = Aabb::from_center(next, half);
        let swept = Aabb {
            min: start.min.min(end.min),
            max: start.max.max(end.max),
        };

        let mut blocked = false;
        for solid in self.solids {
            if !swept.overlaps(solid) || start.overlaps(solid) {
                continue;
            }
            if delta > 0.0 {
                let limit = (solid.min[axis] - half[axis] - SKIN).max(self.position[axis]);
                if limit < next[axis] {
                    next[axis] = limit;
                    blocked = true;
                }
            } else {
                let limit = (solid.max[axis] + half[axis] + SKIN).min(self.position[axis]);
                if limit > next[axis] {
                    next[axis] = limit;
                    blocked = true;
                }
            }
        }
        *self.position = next;
        blocked
    }
}

impl Mover for BodyMover<'_> {
    fn move_by(&mut self, displacement: Vec3, dt: f32) -> bool {
        // A paused tick or an empty move keeps the previous contact state.
        if dt == 0.0 || displacement == Vec3::ZERO {
            return self.body.grounded;
        }
        let before = *self.position;
        self.sweep_axis(0, displacement.x);
        self.sweep_axis(2, displacement.z);
        let blocked_y = self.sweep_axis(1, displacement.y);
        let grounded = blocked_y && displacement.y < 0.0;

        self.body.velocity = (*self.position - before) / dt;
        self.body.grounded = grounded;
        grounded
    }

    fn velocity(&self) -> Vec3 {
        self.body.velocity
    }
}

/// World-space boxes of every solid entity.
pub fn collect_solids(world: &World) -> Vec<Aabb> {
    world
        .query::<(&LocalTransform, &Solid)>()
        .iter()
        .map(|(_, (transform, solid))| Aabb::from_center(transform.position, solid.half_extents))
        .collect()
}

/// Semi-implicit Euler for loose debris (released lever pieces).
pub fn debris_step(world: &mut World, gravity: Gravity, dt: f32) {
    for (_entity, (local, vel)) in world
        .query_mut::<(&mut LocalTransform, &mut Velocity)>()
        .with::<&GravityAffected>()
    {
        vel.0 += gravity.0 * dt;
        local.position += vel.0 * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Aabb {
        Aabb::from_center(Vec3::new(0.0, -0.5, 0.0), Vec3::new(10.0, 0.5, 10.0))
    }

    #[test]
    fn falling_onto_floor_grounds_and_snaps() {
        let solids = [floor()];
        let mut position = Vec3::new(0.0, 0.55, 0.0);
        let mut body = KinematicBody::new(Vec3::splat(0.5));
        let mut mover = BodyMover { position: &mut position, body: &mut body, solids: &solids };

        assert!(mover.move_by(Vec3::new(0.0, -0.2, 0.0), 0.1));
        assert!(mover.velocity().y > -2.0);
        assert!((position.y - 0.5).abs() < 1e-3);
        assert!(body.grounded);
    }

    #[test]
    fn wall_blocks_lateral_motion_only() {
        let wall = Aabb::from_center(Vec3::new(2.0, 1.0, 0.0), Vec3::new(0.5, 2.0, 2.0));
        let solids = [wall];
        let mut position = Vec3::new(0.0, 1.0, 0.0);
        let mut body = KinematicBody::new(Vec3::splat(0.5));
        let mut mover = BodyMover { position: &mut position, body: &mut body, solids: &solids };

        let grounded = mover.move_by(Vec3::new(3.0, 0.5, 0.0), 1.0);
        assert!(!grounded);
        assert!(position.x < 1.0 + 1e-3);
        assert!((position.y - 1.5).abs() < 1e-6);
    }

    #[test]
    fn zero_dt_move_keeps_previous_velocity() {
        let solids: [Aabb; 0] = [];
        let mut position = Vec3::ZERO;
        let mut body = KinematicBody::new(Vec3::splat(0.5));
        let mut mover = BodyMover { position: &mut position, body: &mut body, solids: &solids };

        mover.move_by(Vec3::new(0.0, 0.5, 0.0), 0.5);
        assert_eq!(mover.velocity(), Vec3::new(0.0, 1.0, 0.0));
        mover.move_by(Vec3::ZERO, 0.0);
        assert_eq!(mover.velocity(), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn zero_dt_move_keeps_ground_contact() {
        let solids = [floor()];
        let mut position = Vec3::new(0.0, 0.55, 0.0);
        let mut body = KinematicBody::new(Vec3::splat(0.5));
        let mut mover = BodyMover { position: &mut position, body: &mut body, solids: &solids };

        assert!(mover.move_by(Vec3::new(0.0, -0.2, 0.0), 0.1));
        assert!(mover.move_by(Vec3::ZERO, 0.0));
        assert!(mover.move_by(Vec3::new(0.0, -0.3, 0.0), 0.0));
        assert!(body.grounded);
        assert!((position.y - 0.5).abs() < 1e-3);
    }

    #[test]
    fn debris_falls_under_gravity() {
        let mut world = World::new();
        let piece = world.spawn((
            LocalTransform::new(Vec3::new(0.0, 5.0, 0.0)),
            Velocity(Vec3::ZERO),
            GravityAffected,
        ));
        let anchored = world.spawn((LocalTransform::new(Vec3::ZERO), Velocity(Vec3::ZERO)));
        debris_step(&mut world, Gravity::default(), 0.5);
        assert!(world.get::<&LocalTransform>(piece).unwrap().position.y < 5.0);
        assert_eq!(world.get::<&LocalTransform>(anchored).unwrap().position, Vec3::ZERO);
    }
}
