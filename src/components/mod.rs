mod behavior;
mod character;
mod level;
mod physics;

pub use behavior::{Behavior, PlayerBehaviors};
pub use character::{
    CameraArm, CameraTarget, HoverAnimation, MovementController, PlayerMotion,
    PlayerTuning,
};
pub use level::{
    CameraFocus, CutsceneToggle, JumpPad, LeverPhase, LeverPlatform, LeverSettings, ObjectMover,
    SequencePhase, Sequencer, UpgradeModule,
};
pub use physics::{Aabb, Gravity, GravityAffected, KinematicBody, Solid, TriggerVolume, Velocity};

use glam::{Quat, Vec3};

/// World-space placement of a level object or the player.
#[derive(Debug, Clone, Copy)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl LocalTransform {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn with_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Rotate a local-space direction into world space.
    pub fn transform_direction(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }
}

/// Scene-file identifier, kept for log output.
#[derive(Debug, Clone)]
pub struct SceneId(pub String);

/// Marker: this entity is the player.
pub struct Player;
