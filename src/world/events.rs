//! Events sent from the physics world to per-body listeners.

use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

/// Raw contact start recorded during a physics step, before listeners are notified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub collider1: ColliderHandle,
    pub collider2: ColliderHandle,
    pub body1: Option<RigidBodyHandle>,
    pub body2: Option<RigidBodyHandle>,
    /// Approach speed along the contact normal, measured before the contact is solved.
    pub velocity: f32,
}

/// A collision as seen by one of the bodies involved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// The body whose listener is being notified.
    pub body: RigidBodyHandle,
    /// The other body, if the other collider is attached to one.
    pub other: Option<RigidBodyHandle>,
    impact_velocity: f32,
}

impl Collision {
    pub fn new(body: RigidBodyHandle, other: Option<RigidBodyHandle>, impact_velocity: f32) -> Self {
        Self {
            body,
            other,
            impact_velocity,
        }
    }

    /// Relative velocity of the two bodies at the contact point, projected on the contact normal.
    /// Positive when the bodies are approaching each other.
    pub fn impact_velocity_along_normal(&self) -> f32 {
        self.impact_velocity
    }
}

impl Impact {
    /// The collision as reported to each body that has one.
    pub fn collisions(&self) -> impl Iterator<Item = Collision> + '_ {
        [(self.body1, self.body2), (self.body2, self.body1)]
            .into_iter()
            .filter_map(move |(body, other)| body.map(|body| Collision::new(body, other, self.velocity)))
    }
}

/// Observer registered on a physics body; notified once each time a contact with it begins.
pub trait CollisionListener {
    fn on_collide(&self, collision: &Collision);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impact_reports_to_both_bodies() {
        let a = RigidBodyHandle::from_raw_parts(1, 0);
        let b = RigidBodyHandle::from_raw_parts(2, 0);
        let impact = Impact {
            collider1: ColliderHandle::from_raw_parts(1, 0),
            collider2: ColliderHandle::from_raw_parts(2, 0),
            body1: Some(a),
            body2: Some(b),
            velocity: 2.5,
        };

        let collisions: Vec<_> = impact.collisions().collect();
        assert_eq!(collisions.len(), 2);
        assert_eq!(collisions[0].body, a);
        assert_eq!(collisions[0].other, Some(b));
        assert_eq!(collisions[1].body, b);
        assert_eq!(collisions[1].impact_velocity_along_normal(), 2.5);
    }

    #[test]
    fn parentless_collider_is_skipped() {
        let a = RigidBodyHandle::from_raw_parts(1, 0);
        let impact = Impact {
            collider1: ColliderHandle::from_raw_parts(1, 0),
            collider2: ColliderHandle::from_raw_parts(2, 0),
            body1: Some(a),
            body2: None,
            velocity: 0.5,
        };

        let collisions: Vec<_> = impact.collisions().collect();
        assert_eq!(collisions, vec![Collision::new(a, None, 0.5)]);
    }
}
