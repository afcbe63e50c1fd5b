use hecs::{Entity, World};
use tracing::{debug, info, warn};

use super::{jump_pad, lever, sequence};
use crate::components::{
    Aabb, Gravity, JumpPad, KinematicBody, LeverPlatform, LocalTransform, Player, PlayerTuning,
    SceneId, Sequencer, TriggerVolume, UpgradeModule,
};
use crate::engine::time::SimClock;

/// A player's box started overlapping a trigger volume this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEvent {
    pub volume: Entity,
    pub player: Entity,
}

/// Compare every player box against every trigger volume and report entries.
/// Players that leave a volume are forgotten so re-entering fires again.
pub fn trigger_system(world: &mut World) -> Vec<TriggerEvent> {
    let players: Vec<(Entity, Aabb)> = world
        .query::<(&LocalTransform, &KinematicBody)>()
        .with::<&Player>()
        .iter()
        .map(|(e, (transform, body))| (e, Aabb::from_center(transform.position, body.half_extents)))
        .collect();

    let mut events = Vec::new();
    for (volume, (transform, trigger)) in world.query_mut::<(&LocalTransform, &mut TriggerVolume)>() {
        let bounds = Aabb::from_center(transform.position, trigger.half_extents);
        for &(player, player_box) in &players {
            let inside = bounds.overlaps(&player_box);
            let was_inside = trigger.occupants.contains(&player);
            if inside && !was_inside {
                trigger.occupants.push(player);
                events.push(TriggerEvent { volume, player });
            } else if !inside && was_inside {
                trigger.occupants.retain(|&p| p != player);
            }
        }
    }
    events
}

/// Route each entry to whatever level object owns the volume. A volume can
/// carry more than one of them.
pub fn dispatch_trigger_events(
    world: &mut World,
    events: &[TriggerEvent],
    gravity: Gravity,
    clock: &SimClock,
) {
    for event in events {
        if let Ok(id) = world.get::<&SceneId>(event.volume) {
            debug!(volume = %id.0, "trigger entered");
        }
        if world.get::<&JumpPad>(event.volume).is_ok() {
            jump_pad::on_pad_entered(world, event.volume, event.player);
        }
        if world.get::<&LeverPlatform>(event.volume).is_ok() {
            lever::on_lever_entered(world, event.volume, event.player, gravity, clock);
        }
        if world.get::<&Sequencer>(event.volume).is_ok() {
            sequence::on_sequencer_entered(world, event.volume, event.player, clock);
        }
        if world.get::<&UpgradeModule>(event.volume).is_ok() {
            on_upgrade_entered(world, event.volume, event.player);
        }
    }
}

/// Swap the player's tuning for the module's, then remove the module.
fn on_upgrade_entered(world: &mut World, module: Entity, player: Entity) {
    let tuning = match world.get::<&UpgradeModule>(module) {
        Ok(upgrade) => upgrade.tuning.clone(),
        Err(_) => return,
    };
    match world.get::<&mut PlayerTuning>(player) {
        Ok(mut current) => *current = tuning,
        Err(_) => {
            warn!(?player, "upgrade touched by an entity without tuning; ignored");
            return;
        }
    }
    if world.despawn(module).is_ok() {
        info!(?module, "upgrade module collected");
    }
}
