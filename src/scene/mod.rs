pub mod data;
pub mod loader;
pub mod spawn;

pub use loader::load_scene;
pub use spawn::{spawn_scene, SpawnedScene};
