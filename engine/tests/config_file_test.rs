//! Loading simulation configuration from disk

use std::io::Write;
use tempfile::NamedTempFile;
use tumble_engine::prelude::*;

#[test]
fn test_config_from_file_drives_world() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "gravity": [0.0, -9.81, 0.0],
            "max_bodies": 4,
            "rng_seed": 8,
            "spawn": {{ "batch_size": 3, "min_size": 1.0, "max_size": 2.0 }}
        }}"#
    )
    .unwrap();

    let config = SimulationConfig::from_file(file.path()).unwrap();
    assert_eq!(config.gravity, Vec3::new(0.0, -9.81, 0.0));
    assert_eq!(config.spawn.batch_size, 3);
    assert_eq!(config.fixed_timestep, 1.0 / 60.0);

    let mut scene = EcsScene::new();
    let mut world = SimulationWorld::new(config).unwrap();
    world.initialize(&mut scene).unwrap();
    assert_eq!(world.physics().gravity(), Vec3::new(0.0, -9.81, 0.0));

    let first = world.apply(SpawnCommand::boxes(), &mut scene).unwrap();
    assert_eq!(first, SpawnReport { spawned: 3, skipped: 0 });
    let second = world.apply(SpawnCommand::boxes(), &mut scene).unwrap();
    assert_eq!(second, SpawnReport { spawned: 1, skipped: 2 });
    assert_eq!(world.body_count(), 4);
}

#[test]
fn test_missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SimulationConfig::from_file(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, SimulationError::Io(_)));
}

#[test]
fn test_invalid_config_is_rejected_by_world() {
    let config = SimulationConfig {
        fixed_timestep: 0.0,
        ..Default::default()
    };
    assert!(matches!(
        SimulationWorld::new(config),
        Err(SimulationError::Config(_))
    ));
}
