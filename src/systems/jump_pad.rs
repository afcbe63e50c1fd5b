use glam::Vec3;
use hecs::{Entity, World};
use tracing::debug;

use crate::components::{JumpPad, LocalTransform, Player, PlayerMotion, PlayerTuning};
use crate::math::project_on_axis;

/// The three contributions a pad makes to the player's momentum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpulseParts {
    /// Vertical part of the impulse, kept as-is.
    pub vertical: Vec3,
    /// Horizontal impulse along the player's own heading.
    pub lateral: Vec3,
    /// Incoming vertical momentum with the descent scaling undone.
    pub reflected: Vec3,
}

impl ImpulseParts {
    pub fn momentum(&self, elastic: bool) -> Vec3 {
        let reflected = if elastic { self.reflected } else { Vec3::ZERO };
        self.vertical + self.lateral - reflected
    }
}

/// Split a world-space pad impulse against the player's current motion.
///
/// The lateral part uses an absolute projection: the impulse's reach along
/// the player's horizontal heading, always pointing the way the player was
/// already going, whatever way the pad faces.
pub fn resolve_impulse(impulse: Vec3, velocity: Vec3, momentum: Vec3, descent_factor: f32) -> ImpulseParts {
    let vertical = project_on_axis(impulse, Vec3::Y);

    let heading = (velocity - project_on_axis(velocity, Vec3::Y)).normalize_or_zero();
    let absolute_dot = impulse.dot(heading).abs();
    let lateral = heading * absolute_dot;

    // Falls accelerate by `descent_factor`, so the speed at impact is
    // sqrt(descent_factor) too high for a symmetric bounce.
    let scale = if descent_factor > 0.0 { descent_factor.sqrt() } else { 1.0 };
    let reflected = project_on_axis(momentum, Vec3::Y) / scale;

    ImpulseParts {
        vertical,
        lateral,
        reflected,
    }
}

/// Launch a player that entered an active pad. Inactive pads and
/// non-player entrants are ignored.
pub fn on_pad_entered(world: &mut World, pad: Entity, player: Entity) {
    let (impulse, elastic) = match world.query_one_mut::<(&JumpPad, &LocalTransform)>(pad) {
        Ok((pad, transform)) if pad.active => (transform.transform_direction(pad.impulse), pad.elastic),
        _ => return,
    };

    if world.get::<&Player>(player).is_err() {
        return;
    }
    let Ok((motion, tuning)) = world.query_one_mut::<(&mut PlayerMotion, &PlayerTuning)>(player) else {
        return;
    };

    let parts = resolve_impulse(impulse, motion.velocity, motion.momentum, tuning.descent_factor);
    motion.momentum = parts.momentum(elastic);
    // Airborne for at least one tick so the grounded reset cannot wipe it.
    motion.grounded = false;
    debug!(?pad, momentum = ?motion.momentum, "jump pad launched player");
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    const TOL: f32 = 1e-5;

    #[test]
    fn vertical_pad_reflects_incoming_fall() {
        let parts = resolve_impulse(
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, -3.0, 0.0),
            1.0,
        );
        assert_eq!(parts.vertical, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(parts.lateral, Vec3::ZERO);
        assert_eq!(parts.reflected, Vec3::new(0.0, -3.0, 0.0));
        assert_eq!(parts.momentum(true), Vec3::new(0.0, 8.0, 0.0));
        assert_eq!(parts.momentum(false), Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn lateral_impulse_follows_player_heading() {
        // Pad pushes toward -X, player runs toward +X: the push still goes +X.
        let parts = resolve_impulse(Vec3::new(-4.0, 1.0, 0.0), Vec3::new(3.0, -2.0, 0.0), Vec3::ZERO, 1.0);
        assert!((parts.lateral - Vec3::new(4.0, 0.0, 0.0)).length() < TOL);
        assert!((parts.vertical - Vec3::Y).length() < TOL);
    }

    #[test]
    fn standing_still_gets_no_lateral_push() {
        let parts = resolve_impulse(Vec3::new(3.0, 6.0, 3.0), Vec3::new(0.0, -9.0, 0.0), Vec3::ZERO, 1.0);
        assert_eq!(parts.lateral, Vec3::ZERO);
        assert!(parts.momentum(true).is_finite());
    }

    #[test]
    fn descent_factor_softens_reflection() {
        let parts = resolve_impulse(Vec3::ZERO, Vec3::ZERO, Vec3::new(1.0, -8.0, 0.0), 4.0);
        assert!((parts.reflected - Vec3::new(0.0, -4.0, 0.0)).length() < TOL);
    }

    fn spawn_pad(world: &mut World, active: bool, rotation: Quat) -> Entity {
        world.spawn((
            LocalTransform::with_rotation(Vec3::ZERO, rotation),
            JumpPad {
                impulse: Vec3::new(0.0, 5.0, 0.0),
                elastic: true,
                active,
            },
        ))
    }

    fn spawn_player(world: &mut World) -> Entity {
        let mut motion = PlayerMotion::new();
        motion.grounded = true;
        motion.velocity = Vec3::new(2.0, -3.0, 0.0);
        motion.momentum = Vec3::new(0.0, -3.0, 0.0);
        world.spawn((Player, motion, PlayerTuning::default()))
    }

    #[test]
    fn active_pad_launches_and_ungrounds() {
        let mut world = World::new();
        let pad = spawn_pad(&mut world, true, Quat::IDENTITY);
        let player = spawn_player(&mut world);
        on_pad_entered(&mut world, pad, player);
        let motion = world.get::<&PlayerMotion>(player).unwrap();
        assert_eq!(motion.momentum, Vec3::new(0.0, 8.0, 0.0));
        assert!(!motion.grounded);
    }

    #[test]
    fn inactive_pad_and_non_player_are_ignored() {
        let mut world = World::new();
        let pad = spawn_pad(&mut world, false, Quat::IDENTITY);
        let player = spawn_player(&mut world);
        on_pad_entered(&mut world, pad, player);
        assert_eq!(world.get::<&PlayerMotion>(player).unwrap().momentum, Vec3::new(0.0, -3.0, 0.0));

        let live_pad = spawn_pad(&mut world, true, Quat::IDENTITY);
        let crate_box = world.spawn((PlayerMotion::new(), PlayerTuning::default()));
        on_pad_entered(&mut world, live_pad, crate_box);
        assert_eq!(world.get::<&PlayerMotion>(crate_box).unwrap().momentum, Vec3::ZERO);
    }

    #[test]
    fn pad_rotation_turns_the_impulse() {
        let mut world = World::new();
        // Tipped 90 degrees about Z: the up impulse now points toward -X.
        let pad = spawn_pad(&mut world, true, Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
        let player = spawn_player(&mut world);
        on_pad_entered(&mut world, pad, player);
        let momentum = world.get::<&PlayerMotion>(player).unwrap().momentum;
        // Lateral follows the +X heading; the fall is still reflected.
        assert!((momentum - Vec3::new(5.0, 3.0, 0.0)).length() < 1e-4);
    }
}
