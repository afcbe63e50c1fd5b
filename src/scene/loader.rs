use std::fs;
use std::path::Path;

use ron::Options;
use tracing::debug;

use super::data::SceneDef;
use crate::components::PlayerTuning;

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scene: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("{owner}: tuning field `{field}` out of range ({value})")]
    InvalidTuning {
        owner: String,
        field: &'static str,
        value: f32,
    },

    #[error("{owner}: unknown reference `{id}`")]
    UnknownReference { owner: String, id: String },

    #[error("duplicate id `{0}`")]
    DuplicateId(String),
}

fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

/// Read, parse and validate a scene file.
pub fn load_scene(path: &Path) -> Result<SceneDef, SceneError> {
    let contents = fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let scene = parse_scene(&contents)?;
    debug!(path = %path.display(), "scene loaded");
    Ok(scene)
}

pub fn parse_scene(source: &str) -> Result<SceneDef, SceneError> {
    let scene: SceneDef = ron_options().from_str(source)?;
    validate(&scene)?;
    Ok(scene)
}

fn check_tuning(owner: &str, tuning: &PlayerTuning) -> Result<(), SceneError> {
    match tuning.first_invalid_field() {
        Some((field, value)) => Err(SceneError::InvalidTuning {
            owner: owner.to_string(),
            field,
            value,
        }),
        None => Ok(()),
    }
}

fn validate(scene: &SceneDef) -> Result<(), SceneError> {
    check_tuning("player", &scene.player.tuning)?;
    for upgrade in &scene.upgrades {
        check_tuning(&upgrade.id, &upgrade.tuning)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"(
        player: (position: (0.0, 1.0, 0.0), half_extents: (0.5, 0.5, 0.5)),
    )"#;

    #[test]
    fn minimal_scene_uses_defaults() {
        let scene = parse_scene(MINIMAL).unwrap();
        assert_eq!(scene.gravity.y, -9.81);
        assert!(scene.player.platformer);
        assert_eq!(scene.player.tuning, PlayerTuning::default());
        assert!(scene.solids.is_empty());
    }

    #[test]
    fn negative_tuning_is_rejected() {
        let source = r#"(
            player: (position: (0.0, 0.0, 0.0), tuning: (jump_height: -1.0)),
        )"#;
        match parse_scene(source) {
            Err(SceneError::InvalidTuning { field, .. }) => assert_eq!(field, "jump_height"),
            other => panic!("expected invalid tuning, got {other:?}"),
        }
    }

    #[test]
    fn descent_factor_below_one_is_rejected() {
        let source = r#"(
            player: (position: (0.0, 0.0, 0.0)),
            upgrades: [(id: "boots", position: (0.0, 0.0, 0.0), tuning: (descent_factor: 0.5))],
        )"#;
        assert!(matches!(
            parse_scene(source),
            Err(SceneError::InvalidTuning { field: "descent_factor", .. })
        ));
    }

    #[test]
    fn syntax_errors_surface_as_parse_errors() {
        assert!(matches!(parse_scene("(player: "), Err(SceneError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_scene(Path::new("levels/does-not-exist.ron")).unwrap_err();
        assert!(matches!(err, SceneError::Io { .. }));
    }
}
