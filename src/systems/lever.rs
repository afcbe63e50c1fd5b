use glam::{Quat, Vec3};
use hecs::{Entity, World};
use tracing::{debug, info, warn};

use crate::components::{
    Gravity, GravityAffected, JumpPad, LeverPhase, LeverPlatform, LeverSettings, LocalTransform,
    Player, PlayerMotion, PlayerTuning, Solid, Velocity,
};
use crate::engine::time::{SimClock, Timer};

/// Height a body would have fallen from to be moving at `vertical_speed`
/// under the player's effective downward acceleration.
pub fn fall_height(vertical_speed: f32, gravity: f32, gravity_factor: f32, descent_factor: f32) -> f32 {
    let accel = gravity * gravity_factor * descent_factor;
    if accel <= 0.0 {
        return 0.0;
    }
    let fall_time = vertical_speed / accel;
    0.5 * accel * fall_time * fall_time
}

// ---------------------------------------------------------------------------
// Transition rules
// ---------------------------------------------------------------------------

impl LeverPhase {
    /// Timed transitions. `Idle` only leaves through a trigger or `force_break`.
    fn next(&self, settings: &LeverSettings, clock: &SimClock) -> Option<LeverPhase> {
        match self {
            LeverPhase::PendingBreak { timer } if timer.has_elapsed(clock) => Some(LeverPhase::Rotating {
                timer: Timer::started(settings.duration, clock),
            }),
            LeverPhase::Rotating { timer } if timer.has_elapsed(clock) => Some(LeverPhase::Destroyed),
            _ => None,
        }
    }

    /// Normalized rotation progress; 1 once destroyed.
    fn rotation_progress(&self, clock: &SimClock) -> Option<f32> {
        match self {
            LeverPhase::Rotating { timer } => Some(timer.relative_progress(clock)),
            LeverPhase::Destroyed => Some(1.0),
            _ => None,
        }
    }
}

/// Start the break countdown. Does nothing once the lever has left `Idle`
/// or when it is disabled. Returns whether the countdown started.
pub fn force_break(lever: &mut LeverPlatform, clock: &SimClock) -> bool {
    if !lever.enabled || *lever.phase() != LeverPhase::Idle {
        return false;
    }
    lever.fsm.go(LeverPhase::PendingBreak {
        timer: Timer::started(lever.settings.pause, clock),
    })
}

/// A player landed in the lever's trigger: break it if they fell far enough.
pub fn on_lever_entered(world: &mut World, lever: Entity, player: Entity, gravity: Gravity, clock: &SimClock) {
    if world.get::<&Player>(player).is_err() {
        return;
    }
    let height = match world.query_one_mut::<(&PlayerMotion, &PlayerTuning)>(player) {
        Ok((motion, tuning)) => fall_height(
            motion.velocity.y,
            gravity.magnitude(),
            tuning.gravity_factor,
            tuning.descent_factor,
        ),
        Err(_) => return,
    };

    let Ok(platform) = world.query_one_mut::<&mut LeverPlatform>(lever) else {
        return;
    };
    if height < platform.settings.inertia {
        debug!(?lever, height, "landing too soft to break lever");
        return;
    }
    if force_break(platform, clock) {
        info!(?lever, height, "lever platform breaking");
    }
}

enum LeverEffect {
    Release(Entity),
    Destroy { breakable: Option<Entity>, jump_pad: Option<Entity> },
}

/// Advance every lever's timeline and apply phase entry effects.
pub fn lever_system(world: &mut World, clock: &SimClock) {
    let mut effects = Vec::new();

    for (entity, (transform, lever)) in world.query_mut::<(&mut LocalTransform, &mut LeverPlatform)>() {
        if !lever.enabled {
            continue;
        }
        lever.fsm.tick();
        if let Some(next) = lever.fsm.state.next(&lever.settings, clock) {
            lever.fsm.go(next);
        }

        if let Some(t) = lever.fsm.state.rotation_progress(clock) {
            let axis = lever.settings.axis.try_normalize().unwrap_or(Vec3::Z);
            let angle = (lever.settings.curve.evaluate(t) * lever.settings.angle).to_radians();
            transform.rotation = lever.rest_rotation * Quat::from_axis_angle(axis, angle);
        }

        if lever.fsm.just_entered() {
            match lever.fsm.state {
                LeverPhase::Rotating { .. } => {
                    info!(?entity, "lever rotating");
                    if let Some(breakable) = lever.breakable {
                        effects.push(LeverEffect::Release(breakable));
                    }
                }
                LeverPhase::Destroyed => {
                    info!(?entity, "lever destroyed");
                    effects.push(LeverEffect::Destroy {
                        breakable: lever.breakable.take(),
                        jump_pad: lever.jump_pad,
                    });
                }
                _ => {}
            }
        }
    }

    for effect in effects {
        match effect {
            LeverEffect::Release(breakable) => {
                let _ = world.remove_one::<Solid>(breakable);
                if world.insert(breakable, (GravityAffected, Velocity(Vec3::ZERO))).is_err() {
                    warn!(?breakable, "breakable piece vanished before release");
                }
            }
            LeverEffect::Destroy { breakable, jump_pad } => {
                if let Some(breakable) = breakable {
                    let _ = world.despawn(breakable);
                }
                if let Some(pad) = jump_pad {
                    match world.get::<&mut JumpPad>(pad) {
                        Ok(mut pad) => pad.active = !pad.active,
                        Err(_) => warn!(?pad, "linked jump pad is gone"),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{KinematicBody, TriggerVolume};

    #[test]
    fn fall_height_matches_free_fall() {
        let h = fall_height(10.0, 9.81, 1.0, 1.0);
        assert!((h - 5.0968).abs() < 1e-3);
        assert!(h >= 4.0);
        assert_eq!(fall_height(10.0, 0.0, 1.0, 1.0), 0.0);
        // Direction does not matter.
        assert_eq!(fall_height(-10.0, 9.81, 1.0, 1.0), h);
    }

    struct Level {
        world: World,
        lever: Entity,
        breakable: Entity,
        pad: Entity,
        player: Entity,
    }

    fn level() -> Level {
        let mut world = World::new();
        let breakable = world.spawn((LocalTransform::new(Vec3::ZERO), Solid { half_extents: Vec3::ONE }));
        let pad = world.spawn((
            LocalTransform::new(Vec3::new(5.0, 0.0, 0.0)),
            JumpPad {
                impulse: Vec3::Y,
                elastic: false,
                active: false,
            },
        ));
        let mut platform = LeverPlatform::new(LeverSettings::default(), Quat::IDENTITY);
        platform.breakable = Some(breakable);
        platform.jump_pad = Some(pad);
        let lever = world.spawn((LocalTransform::new(Vec3::ZERO), TriggerVolume::new(Vec3::ONE), platform));

        let mut motion = PlayerMotion::new();
        motion.velocity = Vec3::new(0.0, -10.0, 0.0);
        let player = world.spawn((
            Player,
            motion,
            PlayerTuning::default(),
            KinematicBody::new(Vec3::splat(0.5)),
        ));
        Level {
            world,
            lever,
            breakable,
            pad,
            player,
        }
    }

    fn phase(world: &World, lever: Entity) -> LeverPhase {
        world.get::<&LeverPlatform>(lever).unwrap().phase().clone()
    }

    #[test]
    fn hard_landing_runs_the_whole_timeline() {
        let Level {
            mut world,
            lever,
            breakable,
            pad,
            player,
        } = level();
        let mut clock = SimClock::new();
        on_lever_entered(&mut world, lever, player, Gravity::default(), &clock);
        assert!(matches!(phase(&world, lever), LeverPhase::PendingBreak { .. }));

        let mut ticks = 0;
        while !matches!(phase(&world, lever), LeverPhase::Rotating { .. }) {
            clock.advance(0.05);
            lever_system(&mut world, &clock);
            ticks += 1;
            assert!(ticks < 20, "lever never started rotating");
        }
        assert!(world.get::<&Solid>(breakable).is_err());
        assert!(world.get::<&GravityAffected>(breakable).is_ok());

        while phase(&world, lever) != LeverPhase::Destroyed {
            clock.advance(0.05);
            lever_system(&mut world, &clock);
            ticks += 1;
            assert!(ticks < 40, "lever never finished rotating");
        }
        assert!(!world.contains(breakable));
        assert!(world.get::<&JumpPad>(pad).unwrap().active);

        let rotation = world.get::<&LocalTransform>(lever).unwrap().rotation;
        assert!(rotation.dot(Quat::from_rotation_z(90f32.to_radians())).abs() > 1.0 - 1e-5);
    }

    #[test]
    fn soft_landing_leaves_lever_idle() {
        let Level {
            mut world,
            lever,
            player,
            ..
        } = level();
        world.get::<&mut PlayerMotion>(player).unwrap().velocity.y = -3.0;
        on_lever_entered(&mut world, lever, player, Gravity::default(), &SimClock::new());
        assert_eq!(phase(&world, lever), LeverPhase::Idle);
    }

    #[test]
    fn force_break_is_idempotent() {
        let mut lever = LeverPlatform::new(LeverSettings::default(), Quat::IDENTITY);
        let mut clock = SimClock::new();
        assert!(force_break(&mut lever, &clock));
        let pending = lever.phase().clone();

        clock.advance(0.1);
        assert!(!force_break(&mut lever, &clock));
        assert_eq!(*lever.phase(), pending);

        lever.fsm.go(LeverPhase::Rotating {
            timer: Timer::started(0.2, &clock),
        });
        assert!(!force_break(&mut lever, &clock));
        assert!(matches!(lever.phase(), LeverPhase::Rotating { .. }));
    }

    #[test]
    fn disabled_lever_ignores_everything() {
        let Level {
            mut world,
            lever,
            player,
            ..
        } = level();
        world.get::<&mut LeverPlatform>(lever).unwrap().enabled = false;
        let mut clock = SimClock::new();
        on_lever_entered(&mut world, lever, player, Gravity::default(), &clock);
        clock.advance(1.0);
        lever_system(&mut world, &clock);
        assert_eq!(phase(&world, lever), LeverPhase::Idle);
    }

    #[test]
    fn paused_clock_freezes_the_countdown() {
        let Level {
            mut world,
            lever,
            player,
            ..
        } = level();
        let mut clock = SimClock::new();
        on_lever_entered(&mut world, lever, player, Gravity::default(), &clock);
        clock.scale = 0.0;
        for _ in 0..100 {
            clock.advance(0.1);
            lever_system(&mut world, &clock);
        }
        assert!(matches!(phase(&world, lever), LeverPhase::PendingBreak { .. }));
    }
}
