//! Serialized scene layout. Entities refer to each other by string id.

use glam::Vec3;
use serde::Deserialize;

use crate::components::{LeverSettings, PlayerTuning};
use crate::engine::input::ScriptedInput;
use crate::math::EaseCurve;

fn default_gravity() -> Vec3 {
    Vec3::new(0.0, -9.81, 0.0)
}

fn default_true() -> bool {
    true
}

fn unit_box() -> Vec3 {
    Vec3::splat(0.5)
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneDef {
    #[serde(default = "default_gravity")]
    pub gravity: Vec3,
    pub player: PlayerDef,
    #[serde(default)]
    pub solids: Vec<SolidDef>,
    /// Bare transforms, used as camera focus points and mover targets.
    #[serde(default)]
    pub markers: Vec<MarkerDef>,
    #[serde(default)]
    pub jump_pads: Vec<JumpPadDef>,
    #[serde(default)]
    pub levers: Vec<LeverDef>,
    #[serde(default)]
    pub object_movers: Vec<ObjectMoverDef>,
    #[serde(default)]
    pub camera_focuses: Vec<CameraFocusDef>,
    #[serde(default)]
    pub cutscene_toggles: Vec<String>,
    #[serde(default)]
    pub upgrades: Vec<UpgradeDef>,
    #[serde(default)]
    pub sequencers: Vec<SequencerDef>,
    /// Scripted input track replayed by the app.
    #[serde(default)]
    pub input: Vec<ScriptedInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerDef {
    pub position: Vec3,
    /// Collision box. Without one the player cannot move.
    #[serde(default)]
    pub half_extents: Option<Vec3>,
    #[serde(default)]
    pub tuning: PlayerTuning,
    #[serde(default = "default_true")]
    pub platformer: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolidDef {
    #[serde(default)]
    pub id: Option<String>,
    pub position: Vec3,
    pub half_extents: Vec3,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkerDef {
    pub id: String,
    pub position: Vec3,
    /// Euler angles in degrees, XYZ order.
    #[serde(default)]
    pub rotation: Vec3,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JumpPadDef {
    pub id: String,
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default = "unit_box")]
    pub half_extents: Vec3,
    pub impulse: Vec3,
    #[serde(default)]
    pub elastic: bool,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeverDef {
    pub id: String,
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default = "unit_box")]
    pub half_extents: Vec3,
    #[serde(default)]
    pub settings: LeverSettings,
    /// Id of the solid that falls away. A lever without one stays disabled.
    #[serde(default)]
    pub breakable: Option<String>,
    #[serde(default)]
    pub jump_pad: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectMoverDef {
    pub id: String,
    pub target: String,
    #[serde(default)]
    pub translation: Vec3,
    /// Euler offset in degrees.
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default)]
    pub curve: EaseCurve,
    pub duration: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraFocusDef {
    pub id: String,
    pub replacement: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpgradeDef {
    pub id: String,
    pub position: Vec3,
    #[serde(default = "unit_box")]
    pub half_extents: Vec3,
    pub tuning: PlayerTuning,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SequencerDef {
    pub id: String,
    pub position: Vec3,
    #[serde(default = "unit_box")]
    pub half_extents: Vec3,
    #[serde(default)]
    pub one_shot: bool,
    pub phases: Vec<PhaseDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhaseDef {
    pub name: String,
    #[serde(default)]
    pub pre_delay: f32,
    #[serde(default)]
    pub listeners: Vec<String>,
}
