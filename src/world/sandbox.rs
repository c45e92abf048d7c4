use std::rc::Rc;

use glam::Vec3;
use rand::Rng;
use rapier3d::prelude::RigidBodyHandle;
use tracing::{debug, info};

use crate::config::SandboxSettings;
use crate::rendering::scene::{MeshId, Scene};
use crate::world::events::CollisionListener;
use crate::world::physics::PhysicsWorld;
use crate::world::spawn::{BoxSpec, SpawnArea};

/// A box's visual and its physics body. Both live and die together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxPair {
    pub mesh: MeshId,
    pub body: RigidBodyHandle,
}

/// Application context: both worlds plus the ordered list of boxes linking them.
pub struct Sandbox {
    pub physics: PhysicsWorld,
    pub scene: Scene,
    pairs: Vec<BoxPair>,
    impact_listener: Rc<dyn CollisionListener>,
    box_mass: f32,
}

impl Sandbox {
    pub fn new(settings: &SandboxSettings, aspect: f32, impact_listener: Rc<dyn CollisionListener>) -> Self {
        Self {
            physics: PhysicsWorld::new(&settings.physics),
            scene: Scene::new(&settings.camera, aspect),
            pairs: Vec::new(),
            impact_listener,
            box_mass: settings.physics.box_mass,
        }
    }

    /// Add a box to both worlds and register the impact listener on its body.
    pub fn spawn_box(&mut self, spec: BoxSpec) -> BoxPair {
        let mesh = self.scene.add_box(spec.size, spec.position);
        let body = self.physics.add_box(spec.position, spec.half_extents(), self.box_mass);
        self.physics.add_event_listener(body, self.impact_listener.clone());

        let pair = BoxPair { mesh, body };
        self.pairs.push(pair);
        debug!(
            "Spawned box {:?} size ({:.2}, {:.2}, {:.2}) at ({:.2}, {:.2}, {:.2})",
            mesh, spec.size.x, spec.size.y, spec.size.z, spec.position.x, spec.position.y, spec.position.z
        );
        pair
    }

    pub fn spawn_random_box<R: Rng + ?Sized>(&mut self, rng: &mut R, area: &SpawnArea) -> BoxPair {
        self.spawn_box(BoxSpec::random(rng, area))
    }

    /// Remove every box. Each body's listener is detached before the body is removed.
    /// Returns how many listeners were still attached at removal time, which is zero
    /// unless the registry and the physics world disagree.
    pub fn reset(&mut self) -> usize {
        let count = self.pairs.len();
        let mut leftover = 0;
        for pair in self.pairs.drain(..) {
            self.physics.remove_event_listener(pair.body, &self.impact_listener);
            leftover += self.physics.remove_body(pair.body).unwrap_or(0);
            self.scene.remove(pair.mesh);
        }
        info!("Reset scene, removed {} box(es)", count);
        leftover
    }

    /// Advance physics by `delta` seconds and copy every body's pose onto its mesh.
    pub fn tick(&mut self, delta: f32) -> u32 {
        let steps = self.physics.step(delta);
        for pair in &self.pairs {
            if let Some((position, rotation)) = self.physics.body_pose(pair.body) {
                self.scene.set_pose(pair.mesh, position, rotation);
            }
        }
        steps
    }

    pub fn pairs(&self) -> &[BoxPair] {
        &self.pairs
    }

    pub fn box_count(&self) -> usize {
        self.pairs.len()
    }

    /// Current mesh position of a box, after the last sync.
    pub fn mesh_position(&self, pair: &BoxPair) -> Option<Vec3> {
        self.scene.graph.get(pair.mesh).map(|object| object.transform.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::world::events::Collision;

    #[derive(Default)]
    struct CountingListener {
        hits: Cell<usize>,
    }

    impl CollisionListener for CountingListener {
        fn on_collide(&self, _collision: &Collision) {
            self.hits.set(self.hits.get() + 1);
        }
    }

    fn sandbox() -> Sandbox {
        Sandbox::new(&SandboxSettings::default(), 1.0, Rc::new(CountingListener::default()))
    }

    #[test]
    fn spawn_adds_to_every_registry() {
        let mut sandbox = sandbox();
        let mut rng = StdRng::seed_from_u64(1);
        let area = SpawnArea::panel(&SandboxSettings::default().spawn);

        let pair = sandbox.spawn_random_box(&mut rng, &area);
        assert_eq!(sandbox.box_count(), 1);
        assert_eq!(sandbox.physics.dynamic_body_count(), 1);
        assert_eq!(sandbox.scene.box_count(), 1);
        assert_eq!(sandbox.physics.listener_count(pair.body), 1);
        assert_eq!(sandbox.pairs(), &[pair]);
    }

    #[test]
    fn reset_empties_everything() {
        let mut sandbox = sandbox();
        let mut rng = StdRng::seed_from_u64(2);
        let area = SpawnArea::panel(&SandboxSettings::default().spawn);
        let pairs: Vec<_> = (0..5).map(|_| sandbox.spawn_random_box(&mut rng, &area)).collect();

        assert_eq!(sandbox.reset(), 0, "listeners still attached at body removal");
        assert_eq!(sandbox.box_count(), 0);
        assert_eq!(sandbox.physics.dynamic_body_count(), 0);
        assert_eq!(sandbox.scene.box_count(), 0);
        for pair in pairs {
            assert_eq!(sandbox.physics.listener_count(pair.body), 0);
            assert!(!sandbox.physics.contains(pair.body));
        }

        assert_eq!(sandbox.reset(), 0);
        assert_eq!(sandbox.box_count(), 0);
    }

    #[test]
    fn tick_copies_body_pose_to_mesh() {
        let mut sandbox = sandbox();
        let pair = sandbox.spawn_box(BoxSpec::new(Vec3::splat(0.5), Vec3::new(0.0, 3.0, 0.0)));

        for _ in 0..10 {
            sandbox.tick(1.0 / 60.0);
        }

        let (body_position, _) = sandbox.physics.body_pose(pair.body).unwrap();
        let mesh_position = sandbox.mesh_position(&pair).unwrap();
        assert_eq!(body_position, mesh_position);
        assert!(mesh_position.y < 3.0);
    }

    #[test]
    fn collider_depth_uses_full_depth() {
        let mut sandbox = sandbox();
        let pair = sandbox.spawn_box(BoxSpec::new(Vec3::new(0.8, 0.4, 0.6), Vec3::new(0.0, 3.0, 0.0)));
        let half = sandbox.physics.box_half_extents(pair.body).unwrap();
        assert_eq!(half, Vec3::new(0.4, 0.2, 0.6));
    }
}
