use std::f32::consts::TAU;

use hecs::{Entity, World};

use crate::components::{HoverAnimation, PlayerMotion, PlayerTuning};
use crate::engine::time::SimClock;

/// Idle hover bob and velocity-driven roll.
///
/// The hover clock only runs on the ground: bobbing downward while also
/// falling reads as the player dropping faster than they are.
pub fn animation_step(world: &mut World, entity: Entity, clock: &SimClock) {
    let Ok((anim, motion, tuning)) =
        world.query_one_mut::<(&mut HoverAnimation, &PlayerMotion, &PlayerTuning)>(entity)
    else {
        return;
    };

    if motion.grounded {
        anim.local_time += clock.dt;
    }

    anim.hover_offset = if tuning.hover_period > 0.0 {
        (anim.local_time * TAU / tuning.hover_period).sin() * tuning.hover_length * 0.5
    } else {
        0.0
    };

    let roll_speed = motion.velocity.dot(-motion.right()) * tuning.spin_speed;
    anim.spin_angle = (anim.spin_angle + roll_speed * clock.dt) % 360.0;
}
