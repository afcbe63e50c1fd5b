use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{CameraArm, CameraTarget, LocalTransform, PlayerMotion, PlayerTuning};
use crate::engine::time::SimClock;
use crate::math::{recursive_lerp, SMOOTHING_EPSILON};

/// Resting arm offset for a given length: straight behind the anchor.
pub fn arm_rest_offset(length: f32) -> Vec3 {
    Vec3::new(0.0, 0.0, -length)
}

/// Re-anchor the arm on the current camera target and ease it toward its
/// rest length. Targets that no longer exist fall back to the player.
pub fn camera_step(world: &mut World, entity: Entity, clock: &SimClock) {
    let target = match world.get::<&PlayerMotion>(entity) {
        Ok(motion) => motion.camera_target,
        Err(_) => return,
    };
    let focus = match target {
        CameraTarget::Entity(focus) => world.get::<&LocalTransform>(focus).ok().map(|t| t.position),
        CameraTarget::Player => None,
    };

    let Ok((arm, transform, tuning)) =
        world.query_one_mut::<(&mut CameraArm, &LocalTransform, &PlayerTuning)>(entity)
    else {
        return;
    };

    arm.anchor = focus.unwrap_or(transform.position);
    arm.offset = recursive_lerp(
        arm.offset,
        arm_rest_offset(tuning.camera_arm_length),
        SMOOTHING_EPSILON,
        clock.dt * tuning.camera_transition,
    );
}
