use std::collections::HashMap;
use std::rc::Rc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use glam::{Quat, Vec3};
use rapier3d::prelude::*;
use tracing::{debug, warn};

use crate::config::PhysicsSettings;
use crate::utils::math::{to_quat, to_vec3, to_vector};
use crate::world::events::{CollisionListener, Impact};
use crate::world::materials::{ContactMaterial, ContactMaterialTable, SurfaceMaterial};
use crate::world::time::FixedTimestep;

/// Rapier world plus the per-body collision listeners layered on top of it.
///
/// Bodies are created through [`PhysicsWorld::add_box`] and destroyed through
/// [`PhysicsWorld::remove_body`]. Listeners must be removed before their body;
/// removing a body that still has listeners drops them and logs a warning.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    contact_materials: ContactMaterialTable,
    timestep: FixedTimestep,
    allow_sleep: bool,
    floor: RigidBodyHandle,
    listeners: HashMap<RigidBodyHandle, Vec<Rc<dyn CollisionListener>>>,
    collector: ImpactCollector,
    impacts: Receiver<Impact>,
}

impl PhysicsWorld {
    /// World with gravity, the wood/plastic contact material, and a static floor plane at y = 0.
    pub fn new(settings: &PhysicsSettings) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = settings.fixed_time_step;

        let mut contact_materials = ContactMaterialTable::new(ContactMaterial::default());
        contact_materials.add(
            SurfaceMaterial::Wood,
            SurfaceMaterial::Plastic,
            ContactMaterial { friction: 0.1, restitution: 0.7 },
        );

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        let floor = bodies.insert(RigidBodyBuilder::fixed().build());
        let floor_collider = ColliderBuilder::halfspace(Vector::y_axis())
            .user_data(SurfaceMaterial::Wood.user_data())
            .active_hooks(ActiveHooks::MODIFY_SOLVER_CONTACTS)
            .build();
        colliders.insert_with_parent(floor_collider, floor, &mut bodies);

        let (sender, impacts) = unbounded();

        debug!(
            "Physics world created: gravity {:?}, step {:.4}s, max {} sub-steps",
            settings.gravity, settings.fixed_time_step, settings.max_sub_steps
        );

        Self {
            gravity: vector![settings.gravity[0], settings.gravity[1], settings.gravity[2]],
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders,
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            contact_materials,
            timestep: FixedTimestep::new(settings.fixed_time_step, settings.max_sub_steps),
            allow_sleep: settings.allow_sleep,
            floor,
            listeners: HashMap::new(),
            collector: ImpactCollector { sender },
            impacts,
        }
    }

    /// Dynamic cuboid body with the plastic surface material.
    pub fn add_box(&mut self, position: Vec3, half_extents: Vec3, mass: f32) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(to_vector(position))
            .can_sleep(self.allow_sleep)
            .build();
        let handle = self.bodies.insert(body);

        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .mass(mass)
            .user_data(SurfaceMaterial::Plastic.user_data())
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .active_hooks(ActiveHooks::MODIFY_SOLVER_CONTACTS)
            .build();
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);

        handle
    }

    /// Remove a body and its colliders. Returns the number of listeners that were still
    /// attached and got dropped with it, or `None` if the handle is stale.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> Option<usize> {
        let dropped = self.listeners.remove(&handle).map_or(0, |listeners| listeners.len());
        if dropped > 0 {
            warn!("Removing body {:?} with {} listener(s) still attached", handle, dropped);
        }

        self.bodies
            .remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .map(|_| dropped)
    }

    pub fn add_event_listener(&mut self, handle: RigidBodyHandle, listener: Rc<dyn CollisionListener>) {
        self.listeners.entry(handle).or_default().push(listener);
    }

    /// Detach one registration of `listener` from `handle`. Returns false if it was not attached.
    pub fn remove_event_listener(&mut self, handle: RigidBodyHandle, listener: &Rc<dyn CollisionListener>) -> bool {
        let Some(attached) = self.listeners.get_mut(&handle) else {
            return false;
        };
        let Some(index) = attached.iter().position(|l| Rc::ptr_eq(l, listener)) else {
            return false;
        };
        attached.remove(index);
        if attached.is_empty() {
            self.listeners.remove(&handle);
        }
        true
    }

    pub fn listener_count(&self, handle: RigidBodyHandle) -> usize {
        self.listeners.get(&handle).map_or(0, Vec::len)
    }

    /// Advance by `delta` seconds of wall time in fixed sub-steps. Returns the number of sub-steps run.
    pub fn step(&mut self, delta: f32) -> u32 {
        let steps = self.timestep.advance(delta);
        for _ in 0..steps {
            self.step_once();
        }
        steps
    }

    fn step_once(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &self.contact_materials,
            &self.collector,
        );
        self.dispatch_impacts();
    }

    fn dispatch_impacts(&mut self) {
        while let Ok(impact) = self.impacts.try_recv() {
            for collision in impact.collisions() {
                if let Some(listeners) = self.listeners.get(&collision.body) {
                    for listener in listeners {
                        listener.on_collide(&collision);
                    }
                }
            }
        }
    }

    /// Translation and rotation of a body.
    pub fn body_pose(&self, handle: RigidBodyHandle) -> Option<(Vec3, Quat)> {
        self.bodies
            .get(handle)
            .map(|body| (to_vec3(body.translation()), to_quat(body.rotation())))
    }

    /// Half-extents of the first cuboid collider attached to a body.
    pub fn box_half_extents(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        let body = self.bodies.get(handle)?;
        body.colliders()
            .iter()
            .filter_map(|c| self.colliders.get(*c))
            .find_map(|c| c.shape().as_cuboid().map(|cuboid| to_vec3(&cuboid.half_extents)))
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Bodies other than the floor.
    pub fn dynamic_body_count(&self) -> usize {
        self.bodies.iter().filter(|(handle, _)| *handle != self.floor).count()
    }

    pub fn contains(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    pub fn floor(&self) -> RigidBodyHandle {
        self.floor
    }

    pub fn gravity(&self) -> Vec3 {
        to_vec3(&self.gravity)
    }

    pub fn contact_materials(&self) -> &ContactMaterialTable {
        &self.contact_materials
    }
}

/// Records contact starts with the approach speed measured before the solver runs.
struct ImpactCollector {
    sender: Sender<Impact>,
}

impl EventHandler for ImpactCollector {
    fn handle_collision_event(
        &self,
        bodies: &RigidBodySet,
        colliders: &ColliderSet,
        event: CollisionEvent,
        contact_pair: Option<&ContactPair>,
    ) {
        if !event.started() {
            return;
        }
        let Some(pair) = contact_pair else {
            return;
        };
        let Some(velocity) = impact_velocity(bodies, colliders, pair) else {
            return;
        };

        let parent = |handle: ColliderHandle| colliders.get(handle).and_then(|c| c.parent());
        let impact = Impact {
            collider1: event.collider1(),
            collider2: event.collider2(),
            body1: parent(event.collider1()),
            body2: parent(event.collider2()),
            velocity,
        };

        // The receiver lives as long as the world; a failed send only happens during teardown.
        let _ = self.sender.send(impact);
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// Relative velocity at the deepest contact point, projected on the normal pointing
/// from the first collider to the second. Positive when approaching.
fn impact_velocity(bodies: &RigidBodySet, colliders: &ColliderSet, pair: &ContactPair) -> Option<Real> {
    let manifold = pair.manifolds.iter().find(|m| !m.points.is_empty())?;
    let contact = manifold
        .points
        .iter()
        .min_by(|a, b| a.dist.total_cmp(&b.dist))?;

    let collider1 = colliders.get(pair.collider1)?;
    let collider2 = colliders.get(pair.collider2)?;
    let point = collider1.position() * contact.local_p1;
    let normal = collider1.position().rotation * manifold.local_n1;

    let velocity_of = |collider: &Collider| {
        collider
            .parent()
            .and_then(|handle| bodies.get(handle))
            .map(|body| body.velocity_at_point(&point))
            .unwrap_or_else(Vector::zeros)
    };

    Some(normal.dot(&(velocity_of(collider1) - velocity_of(collider2))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use approx::assert_relative_eq;
    use crate::world::events::Collision;

    #[derive(Default)]
    struct Recorder {
        collisions: RefCell<Vec<Collision>>,
    }

    impl CollisionListener for Recorder {
        fn on_collide(&self, collision: &Collision) {
            self.collisions.borrow_mut().push(*collision);
        }
    }

    fn world() -> PhysicsWorld {
        PhysicsWorld::new(&PhysicsSettings::default())
    }

    #[test]
    fn new_world_has_only_the_floor() {
        let world = world();
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.dynamic_body_count(), 0);
        assert_relative_eq!(world.gravity().y, -9.82);
    }

    #[test]
    fn dropped_box_settles_on_the_floor() {
        let mut world = world();
        let half = Vec3::new(0.25, 0.25, 0.25);
        let body = world.add_box(Vec3::new(0.0, 3.0, 0.0), half, 1.0);

        for _ in 0..600 {
            world.step(1.0 / 60.0);
        }

        let (position, _) = world.body_pose(body).unwrap();
        assert!(position.y > 0.2 && position.y < 0.3, "resting height {}", position.y);
    }

    #[test]
    fn first_floor_contact_reports_fall_speed() {
        let mut world = world();
        let body = world.add_box(Vec3::new(0.0, 3.0, 0.0), Vec3::splat(0.25), 1.0);
        let recorder = Rc::new(Recorder::default());
        let listener: Rc<dyn CollisionListener> = recorder.clone();
        world.add_event_listener(body, listener);

        for _ in 0..120 {
            world.step(1.0 / 60.0);
        }

        let collisions = recorder.collisions.borrow();
        let first = collisions.first().expect("box never hit the floor");
        assert_eq!(first.body, body);
        assert_eq!(first.other, Some(world.floor()));
        // Free fall from 2.75m above the contact height is roughly 7.3 m/s.
        let speed = first.impact_velocity_along_normal().abs();
        assert!(speed > 6.0 && speed < 8.5, "impact speed {}", speed);
    }

    #[test]
    fn removed_listener_is_not_notified() {
        let mut world = world();
        let body = world.add_box(Vec3::new(0.0, 1.0, 0.0), Vec3::splat(0.25), 1.0);
        let recorder = Rc::new(Recorder::default());
        let listener: Rc<dyn CollisionListener> = recorder.clone();
        world.add_event_listener(body, listener.clone());
        assert_eq!(world.listener_count(body), 1);

        assert!(world.remove_event_listener(body, &listener));
        assert!(!world.remove_event_listener(body, &listener));
        assert_eq!(world.listener_count(body), 0);

        for _ in 0..120 {
            world.step(1.0 / 60.0);
        }
        assert!(recorder.collisions.borrow().is_empty());
    }

    #[test]
    fn remove_body_drops_colliders_and_listeners() {
        let mut world = world();
        let body = world.add_box(Vec3::new(0.0, 1.0, 0.0), Vec3::splat(0.25), 1.0);
        let listener: Rc<dyn CollisionListener> = Rc::new(Recorder::default());
        world.add_event_listener(body, listener);

        assert_eq!(world.remove_body(body), Some(1));
        assert!(!world.contains(body));
        assert_eq!(world.listener_count(body), 0);
        assert_eq!(world.dynamic_body_count(), 0);
        assert_eq!(world.remove_body(body), None);
    }

    #[test]
    fn detached_body_removes_cleanly() {
        let mut world = world();
        let body = world.add_box(Vec3::new(0.0, 1.0, 0.0), Vec3::splat(0.25), 1.0);
        let listener: Rc<dyn CollisionListener> = Rc::new(Recorder::default());
        world.add_event_listener(body, listener.clone());

        assert!(world.remove_event_listener(body, &listener));
        assert_eq!(world.remove_body(body), Some(0));
    }

    #[test]
    fn collider_keeps_requested_half_extents() {
        let mut world = world();
        let body = world.add_box(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.1, 0.2, 0.6), 1.0);
        let half = world.box_half_extents(body).unwrap();
        assert_relative_eq!(half.z, 0.6);
        assert_relative_eq!(half.x, 0.1);
    }
}
