use glam::{Vec2, Vec3};
use hecs::Entity;
use serde::Deserialize;

use crate::engine::time::Timer;

// ---------------------------------------------------------------------------
// Tuning
// ---------------------------------------------------------------------------

/// Static per-player tuning. Loaded from the scene file and swapped wholesale
/// by upgrade pickups.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Lateral speed in meters per second.
    pub movement_speed: f32,
    /// How quickly grounded velocity converges on input.
    pub ground_control: f32,
    /// Jump apex height in meters.
    pub jump_height: f32,
    /// Multiplier on world gravity.
    pub gravity_factor: f32,
    /// Extra gravity multiplier while momentum points down. At least 1.
    pub descent_factor: f32,
    /// How quickly airborne velocity converges on input.
    pub air_control: f32,
    pub coyote_time: f32,
    pub buffer_time: f32,

    pub camera_arm_length: f32,
    pub camera_transition: f32,

    /// Idle hover period in seconds.
    pub hover_period: f32,
    /// Idle hover peak-to-peak distance.
    pub hover_length: f32,
    /// Degrees per second of decorative spin per unit of lateral speed.
    pub spin_speed: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            movement_speed: 1.0,
            ground_control: 1.0,
            jump_height: 1.0,
            gravity_factor: 1.0,
            descent_factor: 1.0,
            air_control: 1.0,
            coyote_time: 0.2,
            buffer_time: 0.2,
            camera_arm_length: 4.0,
            camera_transition: 1.0,
            hover_period: 2.0,
            hover_length: 0.1,
            spin_speed: 240.0,
        }
    }
}

impl PlayerTuning {
    /// First field outside its allowed range, if any.
    pub fn first_invalid_field(&self) -> Option<(&'static str, f32)> {
        let non_negative = [
            ("movement_speed", self.movement_speed),
            ("ground_control", self.ground_control),
            ("jump_height", self.jump_height),
            ("gravity_factor", self.gravity_factor),
            ("air_control", self.air_control),
            ("coyote_time", self.coyote_time),
            ("buffer_time", self.buffer_time),
            ("camera_transition", self.camera_transition),
            ("hover_period", self.hover_period),
            ("hover_length", self.hover_length),
            ("spin_speed", self.spin_speed),
        ];
        if let Some(bad) = non_negative.into_iter().find(|(_, v)| !(*v >= 0.0)) {
            return Some(bad);
        }
        if !(self.descent_factor >= 1.0) {
            return Some(("descent_factor", self.descent_factor));
        }
        if !(self.camera_arm_length >= 1.0) {
            return Some(("camera_arm_length", self.camera_arm_length));
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Shared motion context
// ---------------------------------------------------------------------------

/// What the camera arm follows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraTarget {
    Player,
    Entity(Entity),
}

/// Motion state shared by every player behavior within a tick.
#[derive(Debug, Clone)]
pub struct PlayerMotion {
    /// Velocity applied to the body on the last tick.
    pub velocity: Vec3,
    /// Vertical and impulse-driven velocity carried across ticks.
    pub momentum: Vec3,
    pub grounded: bool,
    /// Raw movement input, zeroed while input is suppressed.
    pub intent: Vec2,
    pub paused: bool,
    pub cutscene: bool,
    /// Platformer controls (lateral only, jumping) versus twin-stick.
    pub platformer: bool,
    /// Body forward direction, kept horizontal.
    pub facing: Vec3,
    pub camera_target: CameraTarget,
}

impl PlayerMotion {
    pub fn new() -> Self {
        Self {
            velocity: Vec3::ZERO,
            momentum: Vec3::ZERO,
            grounded: false,
            intent: Vec2::ZERO,
            paused: false,
            cutscene: false,
            platformer: true,
            facing: Vec3::NEG_Z,
            camera_target: CameraTarget::Player,
        }
    }

    pub fn input_suppressed(&self) -> bool {
        self.paused || self.cutscene
    }

    pub fn right(&self) -> Vec3 {
        self.facing.cross(Vec3::Y).normalize_or_zero()
    }
}

impl Default for PlayerMotion {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Movement controller
// ---------------------------------------------------------------------------

/// Coyote and buffer windows plus the one-jump-per-press latch.
#[derive(Debug, Clone, Default)]
pub struct JumpGate {
    /// Open while grounded and for `coyote_time` after leaving the ground.
    pub coyote: Timer,
    /// Open for `buffer_time` after a jump press.
    pub buffer: Timer,
    /// A press arrived and has not been latched into the buffer yet.
    pub requested: bool,
    /// Set when a press is latched; cleared on release.
    pub locked: bool,
}

/// Private state of the movement behavior.
#[derive(Debug, Clone)]
pub struct MovementController {
    /// Smoothed lateral velocity.
    pub horizontal: Vec3,
    pub jump: JumpGate,
    /// Jump height the cached speed was computed for.
    pub height_tracker: f32,
    pub jump_speed: f32,
    /// False when the player has no body to move.
    pub enabled: bool,
}

impl MovementController {
    pub fn new() -> Self {
        Self {
            horizontal: Vec3::ZERO,
            jump: JumpGate::default(),
            height_tracker: 0.0,
            jump_speed: 0.0,
            enabled: true,
        }
    }
}

impl Default for MovementController {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Presentation-side state
// ---------------------------------------------------------------------------

/// Third-person camera arm. `offset` is local to the anchor.
#[derive(Debug, Clone, Copy)]
pub struct CameraArm {
    pub anchor: Vec3,
    pub offset: Vec3,
}

impl CameraArm {
    pub fn new() -> Self {
        Self {
            anchor: Vec3::ZERO,
            offset: Vec3::ZERO,
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.anchor + self.offset
    }
}

impl Default for CameraArm {
    fn default() -> Self {
        Self::new()
    }
}

/// Idle hover bob and decorative roll of the player mesh.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoverAnimation {
    /// Advances only while grounded.
    pub local_time: f32,
    /// Accumulated roll in degrees.
    pub spin_angle: f32,
    pub hover_offset: f32,
}
