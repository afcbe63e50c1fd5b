mod animation;
mod collision;
mod jump_pad;
mod lever;
mod physics;
mod player;
mod sequence;

pub use collision::{dispatch_trigger_events, trigger_system};
pub use lever::lever_system;
pub use physics::{collect_solids, debris_step};
pub use player::player_behavior_system;
pub use sequence::{object_mover_system, sequence_system};
