use std::collections::HashMap;

use glam::{EulerRot, Quat, Vec3};
use hecs::{Entity, World};
use tracing::{info, warn};

use super::data::SceneDef;
use super::loader::SceneError;
use crate::camera::arm_rest_offset;
use crate::components::{
    CameraArm, CameraFocus, CutsceneToggle, Gravity, HoverAnimation, JumpPad, KinematicBody,
    LeverPlatform, LocalTransform, MovementController, ObjectMover, Player, PlayerBehaviors,
    PlayerMotion, SceneId, SequencePhase, Sequencer, Solid, TriggerVolume, UpgradeModule,
};
use crate::engine::input::InputScript;

/// Everything the app needs after a scene has been spawned.
pub struct SpawnedScene {
    pub player: Entity,
    pub gravity: Gravity,
    pub script: InputScript,
    pub ids: HashMap<String, Entity>,
}

fn euler_degrees(rotation: Vec3) -> Quat {
    let r = rotation * std::f32::consts::PI / 180.0;
    Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z)
}

/// String id to entity table, filled in spawn order.
struct Ids {
    map: HashMap<String, Entity>,
}

impl Ids {
    fn insert(&mut self, id: &str, entity: Entity) -> Result<(), SceneError> {
        if self.map.insert(id.to_string(), entity).is_some() {
            return Err(SceneError::DuplicateId(id.to_string()));
        }
        Ok(())
    }

    fn resolve(&self, owner: &str, id: &str) -> Result<Entity, SceneError> {
        self.map.get(id).copied().ok_or_else(|| SceneError::UnknownReference {
            owner: owner.to_string(),
            id: id.to_string(),
        })
    }
}

/// Spawn every object in `scene` into `world`. Ids are resolved against
/// objects spawned earlier in the fixed order below, so a sequencer can name
/// any other object while a lever can only name solids and jump pads.
pub fn spawn_scene(world: &mut World, scene: &SceneDef) -> Result<SpawnedScene, SceneError> {
    let mut ids = Ids { map: HashMap::new() };

    for solid in &scene.solids {
        let entity = world.spawn((
            LocalTransform::new(solid.position),
            Solid {
                half_extents: solid.half_extents,
            },
        ));
        if let Some(id) = &solid.id {
            let _ = world.insert_one(entity, SceneId(id.clone()));
            ids.insert(id, entity)?;
        }
    }

    for marker in &scene.markers {
        let entity = world.spawn((
            LocalTransform::with_rotation(marker.position, euler_degrees(marker.rotation)),
            SceneId(marker.id.clone()),
        ));
        ids.insert(&marker.id, entity)?;
    }

    for pad in &scene.jump_pads {
        let entity = world.spawn((
            LocalTransform::with_rotation(pad.position, euler_degrees(pad.rotation)),
            TriggerVolume::new(pad.half_extents),
            JumpPad {
                impulse: pad.impulse,
                elastic: pad.elastic,
                active: pad.active,
            },
            SceneId(pad.id.clone()),
        ));
        ids.insert(&pad.id, entity)?;
    }

    for lever in &scene.levers {
        let rest_rotation = euler_degrees(lever.rotation);
        let mut platform = LeverPlatform::new(lever.settings.clone(), rest_rotation);
        match &lever.breakable {
            Some(id) => platform.breakable = Some(ids.resolve(&lever.id, id)?),
            None => {
                warn!(lever = %lever.id, "lever has no breakable piece; disabled");
                platform.enabled = false;
            }
        }
        if let Some(id) = &lever.jump_pad {
            platform.jump_pad = Some(ids.resolve(&lever.id, id)?);
        }
        let entity = world.spawn((
            LocalTransform::with_rotation(lever.position, rest_rotation),
            TriggerVolume::new(lever.half_extents),
            platform,
            SceneId(lever.id.clone()),
        ));
        ids.insert(&lever.id, entity)?;
    }

    for mover in &scene.object_movers {
        let target = ids.resolve(&mover.id, &mover.target)?;
        let (start_position, start_rotation) = match world.get::<&LocalTransform>(target) {
            Ok(t) => {
                let (x, y, z) = t.rotation.to_euler(EulerRot::XYZ);
                (t.position, Vec3::new(x, y, z) * 180.0 / std::f32::consts::PI)
            }
            Err(_) => (Vec3::ZERO, Vec3::ZERO),
        };
        let entity = world.spawn((
            ObjectMover {
                target: Some(target),
                translation: mover.translation,
                rotation: mover.rotation,
                curve: mover.curve.clone(),
                duration: mover.duration,
                start_position,
                start_rotation,
                progress: 0.0,
                forward: false,
            },
            SceneId(mover.id.clone()),
        ));
        ids.insert(&mover.id, entity)?;
    }

    for focus in &scene.camera_focuses {
        let replacement = ids.resolve(&focus.id, &focus.replacement)?;
        let entity = world.spawn((
            CameraFocus {
                replacement: Some(replacement),
                active: false,
            },
            SceneId(focus.id.clone()),
        ));
        ids.insert(&focus.id, entity)?;
    }

    for id in &scene.cutscene_toggles {
        let entity = world.spawn((CutsceneToggle, SceneId(id.clone())));
        ids.insert(id, entity)?;
    }

    for upgrade in &scene.upgrades {
        let entity = world.spawn((
            LocalTransform::new(upgrade.position),
            TriggerVolume::new(upgrade.half_extents),
            UpgradeModule {
                tuning: upgrade.tuning.clone(),
            },
            SceneId(upgrade.id.clone()),
        ));
        ids.insert(&upgrade.id, entity)?;
    }

    // Sequencers last: their listeners may be any object above.
    for def in &scene.sequencers {
        let phases = def
            .phases
            .iter()
            .map(|phase| -> Result<SequencePhase, SceneError> {
                let listeners = phase
                    .listeners
                    .iter()
                    .map(|id| ids.resolve(&def.id, id))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(SequencePhase {
                    name: phase.name.clone(),
                    pre_delay: phase.pre_delay,
                    listeners,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let entity = world.spawn((
            LocalTransform::new(def.position),
            TriggerVolume::new(def.half_extents),
            Sequencer::new(phases, def.one_shot),
            SceneId(def.id.clone()),
        ));
        ids.insert(&def.id, entity)?;
    }

    let player = spawn_player(world, scene);
    info!(objects = ids.map.len(), "scene spawned");

    Ok(SpawnedScene {
        player,
        gravity: Gravity(scene.gravity),
        script: InputScript::new(scene.input.clone()),
        ids: ids.map,
    })
}

fn spawn_player(world: &mut World, scene: &SceneDef) -> Entity {
    let def = &scene.player;
    let mut motion = PlayerMotion::new();
    motion.platformer = def.platformer;

    let mut arm = CameraArm::new();
    arm.anchor = def.position;
    arm.offset = arm_rest_offset(def.tuning.camera_arm_length);

    let mut controller = MovementController::new();
    let entity = world.spawn((
        Player,
        SceneId("player".to_string()),
        LocalTransform::new(def.position),
        motion,
        def.tuning.clone(),
        HoverAnimation::default(),
        arm,
        PlayerBehaviors::standard(),
    ));

    match def.half_extents {
        Some(half_extents) => {
            let _ = world.insert_one(entity, KinematicBody::new(half_extents));
        }
        None => {
            warn!("player has no collision body; movement disabled");
            controller.enabled = false;
        }
    }
    let _ = world.insert_one(entity, controller);
    entity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::loader::parse_scene;

    const LEVEL: &str = r#"(
        player: (position: (0.0, 1.0, 0.0), half_extents: (0.5, 0.5, 0.5)),
        solids: [
            (position: (0.0, -0.5, 0.0), half_extents: (10.0, 0.5, 10.0)),
            (id: "plank", position: (4.0, 2.0, 0.0), half_extents: (1.0, 0.1, 1.0)),
        ],
        markers: [(id: "door", position: (0.0, 0.0, 5.0))],
        jump_pads: [(id: "pad", position: (8.0, 0.0, 0.0), impulse: (0.0, 6.0, 0.0), active: false)],
        levers: [(id: "lever", position: (4.0, 2.5, 0.0), breakable: "plank", jump_pad: "pad")],
        object_movers: [(id: "door-mover", target: "door", translation: (0.0, 3.0, 0.0), duration: 1.0)],
        sequencers: [(
            id: "intro",
            position: (0.0, 1.0, 3.0),
            phases: [(name: "open", listeners: ["door-mover", "lever"])],
        )],
    )"#;

    #[test]
    fn references_resolve_to_spawned_entities() {
        let scene = parse_scene(LEVEL).unwrap();
        let mut world = World::new();
        let spawned = spawn_scene(&mut world, &scene).unwrap();

        let lever = world.get::<&LeverPlatform>(spawned.ids["lever"]).unwrap();
        assert!(lever.enabled);
        assert_eq!(lever.breakable, Some(spawned.ids["plank"]));
        assert_eq!(lever.jump_pad, Some(spawned.ids["pad"]));
        drop(lever);

        let sequencer = world.get::<&Sequencer>(spawned.ids["intro"]).unwrap();
        assert_eq!(
            sequencer.phases[0].listeners,
            vec![spawned.ids["door-mover"], spawned.ids["lever"]]
        );
        drop(sequencer);

        let mover = world.get::<&ObjectMover>(spawned.ids["door-mover"]).unwrap();
        assert_eq!(mover.start_position, Vec3::new(0.0, 0.0, 5.0));
        drop(mover);

        assert!(world.get::<&KinematicBody>(spawned.player).is_ok());
        assert!(world.get::<&MovementController>(spawned.player).unwrap().enabled);
    }

    #[test]
    fn unknown_listener_is_an_error() {
        let source = r#"(
            player: (position: (0.0, 0.0, 0.0)),
            sequencers: [(id: "s", position: (0.0, 0.0, 0.0), phases: [(name: "a", listeners: ["ghost"])])],
        )"#;
        let scene = parse_scene(source).unwrap();
        match spawn_scene(&mut World::new(), &scene) {
            Err(SceneError::UnknownReference { owner, id }) => {
                assert_eq!(owner, "s");
                assert_eq!(id, "ghost");
            }
            _ => panic!("expected an unknown reference"),
        }
    }

    #[test]
    fn missing_pieces_disable_instead_of_failing() {
        let source = r#"(
            player: (position: (0.0, 0.0, 0.0)),
            levers: [(id: "lonely", position: (0.0, 0.0, 0.0))],
        )"#;
        let scene = parse_scene(source).unwrap();
        let mut world = World::new();
        let spawned = spawn_scene(&mut world, &scene).unwrap();
        assert!(!world.get::<&LeverPlatform>(spawned.ids["lonely"]).unwrap().enabled);
        assert!(!world.get::<&MovementController>(spawned.player).unwrap().enabled);
    }

    #[test]
    fn demo_level_spawns() {
        let scene = parse_scene(include_str!("../../levels/demo.ron")).unwrap();
        let mut world = World::new();
        let spawned = spawn_scene(&mut world, &scene).unwrap();
        assert!(world.get::<&LeverPlatform>(spawned.ids["lever"]).unwrap().enabled);
        assert_eq!(world.get::<&Sequencer>(spawned.ids["gate"]).unwrap().phases.len(), 3);
        assert!(!spawned.script.is_finished());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let source = r#"(
            player: (position: (0.0, 0.0, 0.0)),
            markers: [(id: "a", position: (0.0, 0.0, 0.0)), (id: "a", position: (1.0, 0.0, 0.0))],
        )"#;
        let scene = parse_scene(source).unwrap();
        assert!(matches!(
            spawn_scene(&mut World::new(), &scene),
            Err(SceneError::DuplicateId(id)) if id == "a"
        ));
    }
}
