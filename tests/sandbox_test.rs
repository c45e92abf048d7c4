use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use tumble::config::SandboxSettings;
use tumble::world::{BoxSpec, Collision, CollisionListener, Sandbox, SpawnArea};

#[derive(Default)]
struct Recorder {
    hits: RefCell<Vec<Collision>>,
}

impl CollisionListener for Recorder {
    fn on_collide(&self, collision: &Collision) {
        self.hits.borrow_mut().push(*collision);
    }
}

fn sandbox() -> (Sandbox, Rc<Recorder>) {
    let recorder = Rc::new(Recorder::default());
    let listener: Rc<dyn CollisionListener> = recorder.clone();
    (Sandbox::new(&SandboxSettings::default(), 16.0 / 9.0, listener), recorder)
}

#[test]
fn test_dropped_box_is_heard_and_settles() {
    let (mut sandbox, recorder) = sandbox();
    let pair = sandbox.spawn_box(BoxSpec::new(Vec3::splat(0.5), Vec3::new(0.0, 3.0, 0.0)));

    for _ in 0..600 {
        sandbox.tick(1.0 / 60.0);
    }

    let hits = recorder.hits.borrow();
    let first = hits.first().expect("no collision reported");
    assert_eq!(first.body, pair.body);
    assert!(first.impact_velocity_along_normal() > 1.5);

    let resting = sandbox.mesh_position(&pair).unwrap();
    assert!((resting.y - 0.25).abs() < 0.05, "resting height {}", resting.y);
}

#[test]
fn test_spawn_then_reset_round() {
    let (mut sandbox, _) = sandbox();
    let mut rng = StdRng::seed_from_u64(42);
    let area = SpawnArea::panel(&SandboxSettings::default().spawn);

    for expected in 1..=10 {
        sandbox.spawn_random_box(&mut rng, &area);
        assert_eq!(sandbox.box_count(), expected);
        assert_eq!(sandbox.physics.dynamic_body_count(), expected);
        assert_eq!(sandbox.scene.box_count(), expected);
    }

    for _ in 0..30 {
        sandbox.tick(1.0 / 60.0);
    }
    assert_eq!(sandbox.reset(), 0);

    assert!(sandbox.pairs().is_empty());
    assert_eq!(sandbox.physics.dynamic_body_count(), 0);
    assert_eq!(sandbox.scene.box_count(), 0);

    // The world keeps working after a reset.
    sandbox.spawn_random_box(&mut rng, &area);
    sandbox.tick(1.0 / 60.0);
    assert_eq!(sandbox.box_count(), 1);
}

#[test]
fn test_long_frame_is_capped() {
    let (mut sandbox, _) = sandbox();
    sandbox.spawn_box(BoxSpec::new(Vec3::splat(0.5), Vec3::new(0.0, 3.0, 0.0)));

    assert_eq!(sandbox.tick(1.0), 3);
    assert_eq!(sandbox.tick(0.0), 1);
}
