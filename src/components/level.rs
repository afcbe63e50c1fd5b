use glam::{Quat, Vec3};
use hecs::Entity;
use serde::Deserialize;

use super::character::PlayerTuning;
use crate::engine::time::Timer;
use crate::fsm::StateMachine;
use crate::math::EaseCurve;

/// Launches players that enter its trigger volume.
#[derive(Debug, Clone)]
pub struct JumpPad {
    /// Pad-local impulse; rotated by the pad's transform on contact.
    pub impulse: Vec3,
    /// Reflect incoming vertical momentum instead of discarding it.
    pub elastic: bool,
    pub active: bool,
}

// ---------------------------------------------------------------------------
// Lever platform
// ---------------------------------------------------------------------------

/// Phases of a lever platform. Each timed phase carries its own timer so the
/// pending-break delay can never be mistaken for the rotation.
///
/// Transition rules live in `impl LeverPhase` in `src/systems/lever.rs`.
#[derive(Debug, Clone, PartialEq)]
pub enum LeverPhase {
    Idle,
    /// Triggered; waiting out the pause before rotating.
    PendingBreak { timer: Timer },
    /// Rotating along the curve; the breakable piece is falling.
    Rotating { timer: Timer },
    /// Rotation finished and the breakable piece is gone.
    Destroyed,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LeverSettings {
    /// Minimum fall height, in meters, that breaks the platform.
    pub inertia: f32,
    pub curve: EaseCurve,
    /// Full rotation in degrees.
    pub angle: f32,
    /// Local axis the lever turns around.
    pub axis: Vec3,
    /// Delay between the trigger and the rotation.
    pub pause: f32,
    /// Rotation length in seconds.
    pub duration: f32,
}

impl Default for LeverSettings {
    fn default() -> Self {
        Self {
            inertia: 4.0,
            curve: EaseCurve::default(),
            angle: 90.0,
            axis: Vec3::Z,
            pause: 0.2,
            duration: 0.2,
        }
    }
}

pub struct LeverPlatform {
    pub fsm: StateMachine<LeverPhase>,
    pub settings: LeverSettings,
    /// Piece that falls away and is despawned at the end of the rotation.
    pub breakable: Option<Entity>,
    /// Pad whose `active` flag flips when the platform is destroyed.
    pub jump_pad: Option<Entity>,
    pub rest_rotation: Quat,
    /// Cleared at spawn when the breakable piece is missing.
    pub enabled: bool,
}

impl LeverPlatform {
    pub fn new(settings: LeverSettings, rest_rotation: Quat) -> Self {
        Self {
            fsm: StateMachine::new(LeverPhase::Idle),
            settings,
            breakable: None,
            jump_pad: None,
            rest_rotation,
            enabled: true,
        }
    }

    pub fn phase(&self) -> &LeverPhase {
        &self.fsm.state
    }
}

// ---------------------------------------------------------------------------
// Sequencing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SequencePhase {
    pub name: String,
    /// Wait before this phase notifies its listeners.
    pub pre_delay: f32,
    pub listeners: Vec<Entity>,
}

/// Fires a list of timed phases once a player enters or it is forced.
#[derive(Debug, Clone)]
pub struct Sequencer {
    pub phases: Vec<SequencePhase>,
    /// Stay finished after the last phase instead of re-arming.
    pub one_shot: bool,
    /// `None` until triggered; `Some(phases.len())` once every phase has fired.
    pub phase: Option<usize>,
    pub player: Option<Entity>,
    pub timer: Timer,
}

impl Sequencer {
    pub fn new(phases: Vec<SequencePhase>, one_shot: bool) -> Self {
        Self {
            phases,
            one_shot,
            phase: None,
            player: None,
            timer: Timer::default(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Some(self.phases.len())
    }
}

/// Sequence listener: eases a target transform between its start pose and an
/// offset pose, reversing each time it is notified.
#[derive(Debug, Clone)]
pub struct ObjectMover {
    pub target: Option<Entity>,
    pub translation: Vec3,
    /// Euler offset in degrees (XYZ order).
    pub rotation: Vec3,
    pub curve: EaseCurve,
    pub duration: f32,
    pub start_position: Vec3,
    pub start_rotation: Vec3,
    /// Linear progress in `[0, 1]` before the curve is applied.
    pub progress: f32,
    pub forward: bool,
}

/// Sequence listener: points the invoking player's camera at `replacement`,
/// and back at the player on the next notification.
#[derive(Debug, Clone)]
pub struct CameraFocus {
    pub replacement: Option<Entity>,
    pub active: bool,
}

/// Sequence listener: toggles the invoking player's cutscene flag.
pub struct CutsceneToggle;

/// Pickup that replaces the player's tuning and disappears.
#[derive(Debug, Clone)]
pub struct UpgradeModule {
    pub tuning: PlayerTuning,
}
