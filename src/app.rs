use glam::Vec3;
use hecs::{Entity, World};
use tracing::{debug, info};

use crate::components::{CameraArm, Gravity, LocalTransform, Player, PlayerMotion};
use crate::engine::input::{InputEvent, InputScript, InputState};
use crate::engine::time::SimClock;
use crate::scene::SpawnedScene;
use crate::systems::{
    collect_solids, debris_step, dispatch_trigger_events, lever_system, object_mover_system,
    player_behavior_system, sequence_system, trigger_system,
};

/// Snapshot logged at the end of a run.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub ticks: u64,
    pub sim_time: f32,
    pub player_position: Vec3,
    pub camera_eye: Vec3,
    pub grounded: bool,
}

/// Fixed-step driver: owns the world and everything threaded through a tick.
pub struct GameApp {
    world: World,
    player: Entity,
    gravity: Gravity,
    clock: SimClock,
    input: InputState,
    script: InputScript,
    /// Events queued outside the script, delivered on the next tick.
    pending: Vec<InputEvent>,
    paused: bool,
    tick: u64,
}

impl GameApp {
    pub fn new(world: World, scene: SpawnedScene) -> Self {
        Self {
            world,
            player: scene.player,
            gravity: scene.gravity,
            clock: SimClock::new(),
            input: InputState::new(),
            script: scene.script,
            pending: Vec::new(),
            paused: false,
            tick: 0,
        }
    }

    /// Run `ticks` fixed steps of `dt` seconds each.
    pub fn run(&mut self, ticks: u64, dt: f32) -> RunSummary {
        for _ in 0..ticks {
            self.step(dt);
        }
        self.summary()
    }

    /// One simulation tick. Order matters: triggers see this tick's
    /// movement, and levers see breaks forced by this tick's sequences.
    pub fn step(&mut self, dt: f32) {
        let mut events = self.script.poll(self.tick);
        events.append(&mut self.pending);
        self.input.update(events);

        if self.input.pause_pressed() {
            self.toggle_pause();
        }
        self.clock.advance(dt);

        let solids = collect_solids(&self.world);
        player_behavior_system(&mut self.world, &self.input, self.gravity, &self.clock, &solids);
        debris_step(&mut self.world, self.gravity, self.clock.dt);

        let entered = trigger_system(&mut self.world);
        dispatch_trigger_events(&mut self.world, &entered, self.gravity, &self.clock);

        sequence_system(&mut self.world, &self.clock);
        lever_system(&mut self.world, &self.clock);
        object_mover_system(&mut self.world, self.clock.dt);

        self.tick += 1;
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.clock.scale = if self.paused { 0.0 } else { 1.0 };
        for (_, motion) in self.world.query_mut::<&mut PlayerMotion>().with::<&Player>() {
            motion.paused = self.paused;
        }
        info!(paused = self.paused, tick = self.tick, "pause toggled");
    }

    pub fn summary(&self) -> RunSummary {
        let player_position = self
            .world
            .get::<&LocalTransform>(self.player)
            .map(|t| t.position)
            .unwrap_or(Vec3::ZERO);
        let camera_eye = self
            .world
            .get::<&CameraArm>(self.player)
            .map(|arm| arm.eye())
            .unwrap_or(player_position);
        let grounded = self
            .world
            .get::<&PlayerMotion>(self.player)
            .map(|m| m.grounded)
            .unwrap_or(false);
        debug!(script_done = self.script.is_finished(), "summary taken");
        RunSummary {
            ticks: self.tick,
            sim_time: self.clock.time,
            player_position,
            camera_eye,
            grounded,
        }
    }
}
