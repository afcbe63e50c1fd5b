use glam::{EulerRot, Quat};
use hecs::{Entity, World};
use tracing::{debug, info, warn};

use super::lever;
use crate::components::{
    CameraFocus, CameraTarget, CutsceneToggle, LeverPlatform, LocalTransform, ObjectMover, Player,
    PlayerMotion, Sequencer,
};
use crate::engine::time::{SimClock, Timer};

/// Arm an untriggered sequencer for `player`. Returns whether it started.
pub fn force_sequence(sequencer: &mut Sequencer, player: Entity, clock: &SimClock) -> bool {
    if sequencer.phase.is_some() {
        return false;
    }
    sequencer.player = Some(player);
    sequencer.phase = Some(0);
    if let Some(first) = sequencer.phases.first() {
        sequencer.timer = Timer::started(first.pre_delay, clock);
    }
    true
}

pub fn on_sequencer_entered(world: &mut World, volume: Entity, player: Entity, clock: &SimClock) {
    if world.get::<&Player>(player).is_err() {
        return;
    }
    let Ok(sequencer) = world.query_one_mut::<&mut Sequencer>(volume) else {
        return;
    };
    if force_sequence(sequencer, player, clock) {
        info!(?volume, phases = sequencer.phases.len(), "sequence started");
    }
}

/// Step to the phase after `index`, starting its delay. Returns the new index.
fn next_phase(sequencer: &mut Sequencer, index: usize, clock: &SimClock) -> usize {
    let next = index + 1;
    sequencer.phase = Some(next);
    match sequencer.phases.get(next) {
        Some(phase) => sequencer.timer = Timer::started(phase.pre_delay, clock),
        None => sequencer.player = None,
    }
    next
}

/// Fire every phase whose delay has run out and re-arm finished repeatable
/// sequencers.
pub fn sequence_system(world: &mut World, clock: &SimClock) {
    let mut fired: Vec<(Entity, Entity)> = Vec::new();

    for (entity, sequencer) in world.query_mut::<&mut Sequencer>() {
        let Some(mut index) = sequencer.phase else {
            continue;
        };

        if sequencer.is_finished() {
            if !sequencer.one_shot {
                sequencer.phase = None;
                sequencer.player = None;
                debug!(?entity, "sequence re-armed");
            }
            continue;
        }

        let Some(player) = sequencer.player else {
            continue;
        };
        while index < sequencer.phases.len() && sequencer.timer.has_elapsed(clock) {
            let phase = &sequencer.phases[index];
            info!(?entity, phase = %phase.name, "sequence phase");
            fired.extend(phase.listeners.iter().map(|&listener| (listener, player)));
            index = next_phase(sequencer, index, clock);
        }
    }

    for (listener, player) in fired {
        dispatch_sequence(world, listener, player, clock);
    }
}

/// Notify one listener. An entity may carry several listener kinds; each
/// reacts.
pub fn dispatch_sequence(world: &mut World, listener: Entity, player: Entity, clock: &SimClock) {
    if !world.contains(listener) {
        warn!(?listener, "sequence listener no longer exists");
        return;
    }

    if let Ok(platform) = world.query_one_mut::<&mut LeverPlatform>(listener) {
        lever::force_break(platform, clock);
    }

    if let Ok(mover) = world.query_one_mut::<&mut ObjectMover>(listener) {
        mover.forward = !mover.forward;
    }

    let focus = match world.query_one_mut::<&mut CameraFocus>(listener) {
        Ok(focus) => {
            focus.active = focus.replacement.is_some() && !focus.active;
            Some(match (focus.active, focus.replacement) {
                (true, Some(replacement)) => CameraTarget::Entity(replacement),
                _ => CameraTarget::Player,
            })
        }
        Err(_) => None,
    };
    let cutscene = world.get::<&CutsceneToggle>(listener).is_ok();

    if focus.is_none() && !cutscene {
        return;
    }
    let Ok(motion) = world.query_one_mut::<&mut PlayerMotion>(player) else {
        warn!(?player, "sequence invoked without a player to act on");
        return;
    };
    if let Some(target) = focus {
        motion.camera_target = target;
    }
    if cutscene {
        motion.cutscene = !motion.cutscene;
        info!(cutscene = motion.cutscene, "cutscene toggled");
    }
}

/// Ease every object mover's target toward whichever end it is heading to.
pub fn object_mover_system(world: &mut World, dt: f32) {
    let mut poses = Vec::new();

    for (_, mover) in world.query_mut::<&mut ObjectMover>() {
        let Some(target) = mover.target else {
            continue;
        };
        let step = if mover.duration > 0.0 { dt / mover.duration } else { 1.0 };
        let direction = if mover.forward { 1.0 } else { -1.0 };
        let progress = (mover.progress + step * direction).clamp(0.0, 1.0);
        if progress == mover.progress {
            continue;
        }
        mover.progress = progress;

        let eased = mover.curve.evaluate(progress);
        let position = mover.start_position + mover.translation * eased;
        let euler = (mover.start_rotation + mover.rotation * eased) * std::f32::consts::PI / 180.0;
        let rotation = Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z);
        poses.push((target, position, rotation));
    }

    for (target, position, rotation) in poses {
        if let Ok(transform) = world.query_one_mut::<&mut LocalTransform>(target) {
            transform.position = position;
            transform.rotation = rotation;
        }
    }
}
