use glam::Vec2;
use serde::Deserialize;

/// Discrete input notifications delivered to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub enum InputEvent {
    /// New raw movement axis. Persists until the next `Move`.
    Move(Vec2),
    JumpPressed,
    JumpReleased,
    PausePressed,
}

/// Per-tick input state. `events` holds only this tick's edges.
pub struct InputState {
    pub axis: Vec2,
    pub events: Vec<InputEvent>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            axis: Vec2::ZERO,
            events: Vec::new(),
        }
    }

    /// Replace last tick's edges with `events` and fold any `Move` into the
    /// held axis.
    pub fn update(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        self.events.clear();
        for event in events {
            if let InputEvent::Move(axis) = event {
                self.axis = axis.clamp_length_max(1.0);
            }
            self.events.push(event);
        }
    }

    pub fn pause_pressed(&self) -> bool {
        self.events.contains(&InputEvent::PausePressed)
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// One scripted input entry, fired on the first tick at or after `tick`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScriptedInput {
    pub tick: u64,
    pub event: InputEvent,
}

/// Replays a fixed input track, standing in for a live device.
pub struct InputScript {
    entries: Vec<ScriptedInput>,
    cursor: usize,
}

impl InputScript {
    pub fn new(mut entries: Vec<ScriptedInput>) -> Self {
        entries.sort_by_key(|e| e.tick);
        Self { entries, cursor: 0 }
    }

    /// Drain every event due on `tick`.
    pub fn poll(&mut self, tick: u64) -> Vec<InputEvent> {
        let mut due = Vec::new();
        while let Some(entry) = self.entries.get(self.cursor) {
            if entry.tick > tick {
                break;
            }
            due.push(entry.event);
            self.cursor += 1;
        }
        due
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.entries.len()
    }
}
