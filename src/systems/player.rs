use glam::{Vec2, Vec3};
use hecs::{Entity, World};
use tracing::debug;

use crate::camera::camera_step;
use crate::components::{
    Aabb, Behavior, Gravity, KinematicBody, LocalTransform, MovementController, Player,
    PlayerBehaviors, PlayerMotion, PlayerTuning,
};
use crate::engine::input::{InputEvent, InputState};
use crate::engine::time::SimClock;
use crate::math::{recursive_lerp, SMOOTHING_EPSILON};
use crate::systems::animation::animation_step;
use crate::systems::physics::{BodyMover, Mover};

// ---------------------------------------------------------------------------
// Movement controller
// ---------------------------------------------------------------------------

impl MovementController {
    /// Fold this tick's input into the motion context and the jump latch.
    /// Suppression is evaluated now and not remembered.
    pub fn handle_input(&mut self, motion: &mut PlayerMotion, input: &InputState) {
        let suppressed = motion.input_suppressed();
        motion.intent = if suppressed { Vec2::ZERO } else { input.axis };

        for event in &input.events {
            match event {
                InputEvent::JumpPressed => {
                    self.jump.requested = !self.jump.locked && !suppressed;
                }
                InputEvent::JumpReleased => {
                    self.jump.requested = false;
                    self.jump.locked = false;
                }
                _ => {}
            }
        }
    }

    /// Advance one simulation tick and move the body through `mover`.
    pub fn tick<M: Mover>(
        &mut self,
        tuning: &PlayerTuning,
        motion: &mut PlayerMotion,
        gravity: Gravity,
        clock: &SimClock,
        mover: &mut M,
    ) {
        let dt = clock.dt;

        let lateral = motion.right() * motion.intent.x * tuning.movement_speed;
        let forward = motion.facing * motion.intent.y * tuning.movement_speed;
        // Forward input only steers in twin-stick mode.
        let target = lateral + if motion.platformer { Vec3::ZERO } else { forward };

        let control = if motion.grounded {
            tuning.ground_control
        } else {
            tuning.air_control
        };
        self.horizontal = recursive_lerp(self.horizontal, target, SMOOTHING_EPSILON, dt * control);

        if motion.grounded {
            self.jump.coyote.set(tuning.coyote_time, clock);
            self.refresh_jump_speed(tuning, gravity);
            motion.momentum = Vec3::ZERO;
        }

        // Last tick asked to rise and the body did not: stuck on a ceiling or
        // desynced at the apex. Drop it so gravity takes over. Momentum added
        // between ticks (jump pads) has not been tried yet and is kept.
        let asked_to_rise = motion.velocity.y > 0.0;
        if motion.momentum.y > 0.0 && asked_to_rise && mover.velocity().y == 0.0 && !motion.grounded {
            motion.momentum.y = 0.0;
        }

        if self.jump.requested && !self.jump.locked {
            self.jump.buffer.set(tuning.buffer_time, clock);
            self.jump.requested = false;
            self.jump.locked = true;
        }

        // Single admission point: inside the coyote window and the buffer window.
        if !self.jump.coyote.has_elapsed(clock)
            && !self.jump.buffer.has_elapsed(clock)
            && motion.platformer
        {
            motion.momentum += Vec3::Y * self.jump_speed;
            self.jump.coyote.end();
            self.jump.buffer.end();
            debug!(speed = self.jump_speed, "player jumped");
        }

        let descent = if motion.momentum.y < 0.0 {
            tuning.descent_factor
        } else {
            1.0
        };
        motion.momentum += gravity.0 * tuning.gravity_factor * descent * dt;
        motion.velocity = self.horizontal + motion.momentum;

        let was_grounded = motion.grounded;
        motion.grounded = mover.move_by(motion.velocity * dt, dt);
        if motion.grounded && !was_grounded {
            debug!(velocity = ?motion.velocity, "player landed");
        }
    }

    /// Takeoff speed for the tuned height, recomputed only when the height
    /// changes.
    fn refresh_jump_speed(&mut self, tuning: &PlayerTuning, gravity: Gravity) {
        if self.height_tracker != tuning.jump_height {
            self.jump_speed =
                (2.0 * tuning.jump_height * gravity.magnitude() * tuning.gravity_factor).sqrt();
            self.height_tracker = tuning.jump_height;
        }
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

fn movement_step(
    world: &mut World,
    entity: Entity,
    input: &InputState,
    gravity: Gravity,
    clock: &SimClock,
    solids: &[Aabb],
) {
    let Ok((controller, motion, tuning, transform, body)) = world.query_one_mut::<(
        &mut MovementController,
        &mut PlayerMotion,
        &PlayerTuning,
        &mut LocalTransform,
        Option<&mut KinematicBody>,
    )>(entity) else {
        return;
    };

    controller.handle_input(motion, input);

    // Disabled at spawn when the body was missing.
    let Some(body) = body.filter(|_| controller.enabled) else {
        return;
    };
    let mut mover = BodyMover {
        position: &mut transform.position,
        body,
        solids,
    };
    controller.tick(tuning, motion, gravity, clock, &mut mover);
}

/// Run every player's behaviors in priority order: movement, then camera,
/// then animation, so the later two see this tick's motion.
pub fn player_behavior_system(
    world: &mut World,
    input: &InputState,
    gravity: Gravity,
    clock: &SimClock,
    solids: &[Aabb],
) {
    let players: Vec<(Entity, PlayerBehaviors)> = world
        .query::<&PlayerBehaviors>()
        .with::<&Player>()
        .iter()
        .map(|(entity, behaviors)| (entity, behaviors.clone()))
        .collect();

    for (entity, behaviors) in players {
        for behavior in behaviors.iter() {
            match behavior {
                Behavior::Movement => movement_step(world, entity, input, gravity, clock, solids),
                Behavior::Camera => camera_step(world, entity, clock),
                Behavior::Animation => animation_step(world, entity, clock),
            }
        }
    }
}
