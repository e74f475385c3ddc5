//! Frame loop driving a full session

use std::thread;
use tumble_engine::prelude::*;

#[test]
fn test_simulated_session_with_queued_spawns() {
    let mut scene = EcsScene::new();
    let mut world = SimulationWorld::new(SimulationConfig::default().with_seed(12)).unwrap();
    world.initialize(&mut scene).unwrap();

    let queue = SpawnCommandQueue::new();
    let producer = {
        let queue = queue.clone();
        thread::spawn(move || {
            queue.push(SpawnCommand::boxes());
            queue.push(SpawnCommand::spheres());
        })
    };
    producer.join().unwrap();

    let mut frame_loop = FrameLoop::new();
    let frames = frame_loop
        .run(
            &mut SimulatedFrames::at_fps(60.0, 600),
            &mut world,
            &mut scene,
            &queue,
        )
        .unwrap();

    assert_eq!(frames, 600);
    assert_eq!(world.body_count(), 20);
    // The first frame records the timestamp only
    for pair in world.pairs() {
        assert_eq!(scene.pose_revision(pair.visual), Some(599));
        let position = world.body_pose(pair.body).unwrap().position;
        assert!(position.is_finite() && position.y < 200.0, "unexpected position {position}");
    }
}

#[test]
fn test_tick_before_initialize_fails() {
    let mut scene = EcsScene::new();
    let mut world = SimulationWorld::new(SimulationConfig::default()).unwrap();
    let queue = SpawnCommandQueue::new();
    let mut frame_loop = FrameLoop::new();

    // Recording the first timestamp needs no world access
    assert_eq!(
        frame_loop.tick(0.0, &mut world, &mut scene, &queue).unwrap(),
        TickOutcome::Started
    );
    assert!(matches!(
        frame_loop.tick(16.0, &mut world, &mut scene, &queue),
        Err(SimulationError::NotInitialized { operation: "step" })
    ));
}

#[test]
fn test_long_frame_gap_is_capped() {
    let mut scene = EcsScene::new();
    let mut world = SimulationWorld::new(SimulationConfig::default().with_seed(2)).unwrap();
    world.initialize(&mut scene).unwrap();
    world.spawn(BodyKind::Sphere, 1, &mut scene).unwrap();
    let id = world.pairs()[0].body;

    let queue = SpawnCommandQueue::new();
    let mut frame_loop = FrameLoop::new();
    frame_loop.tick(0.0, &mut world, &mut scene, &queue).unwrap();
    // Five seconds pass in a single frame, only ten sub-steps run
    frame_loop.tick(5000.0, &mut world, &mut scene, &queue).unwrap();

    let velocity = world.linear_velocity(id).unwrap();
    let expected = -100.0 * 10.0 / 60.0;
    assert!((velocity.y - expected).abs() < 0.5, "velocity {velocity}");
}
