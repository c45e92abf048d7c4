use rapier3d::prelude::{ContactModificationContext, PhysicsHooks};

/// Named surface materials. Stored in each collider's `user_data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceMaterial {
    Wood,
    Plastic,
}

impl SurfaceMaterial {
    pub fn user_data(&self) -> u128 {
        match self {
            SurfaceMaterial::Wood => 1,
            SurfaceMaterial::Plastic => 2,
        }
    }

    pub fn from_user_data(data: u128) -> Option<Self> {
        match data {
            1 => Some(SurfaceMaterial::Wood),
            2 => Some(SurfaceMaterial::Plastic),
            _ => None,
        }
    }
}

/// Friction and restitution used for contacts between two materials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactMaterial {
    pub friction: f32,
    pub restitution: f32,
}

impl Default for ContactMaterial {
    fn default() -> Self {
        Self {
            friction: 0.3,
            restitution: 0.0,
        }
    }
}

/// Pairwise contact materials with a fallback for unlisted pairs.
#[derive(Debug, Clone, Default)]
pub struct ContactMaterialTable {
    default: ContactMaterial,
    pairs: Vec<(SurfaceMaterial, SurfaceMaterial, ContactMaterial)>,
}

impl ContactMaterialTable {
    pub fn new(default: ContactMaterial) -> Self {
        Self {
            default,
            pairs: Vec::new(),
        }
    }

    /// Registers (or replaces) the material for a pair. Order of `a` and `b` does not matter.
    pub fn add(&mut self, a: SurfaceMaterial, b: SurfaceMaterial, material: ContactMaterial) {
        self.pairs.retain(|(x, y, _)| !same_pair((*x, *y), (a, b)));
        self.pairs.push((a, b, material));
    }

    pub fn lookup(&self, a: Option<SurfaceMaterial>, b: Option<SurfaceMaterial>) -> ContactMaterial {
        let (Some(a), Some(b)) = (a, b) else {
            return self.default;
        };
        self.pairs
            .iter()
            .find(|(x, y, _)| same_pair((*x, *y), (a, b)))
            .map(|(_, _, material)| *material)
            .unwrap_or(self.default)
    }
}

fn same_pair(p: (SurfaceMaterial, SurfaceMaterial), q: (SurfaceMaterial, SurfaceMaterial)) -> bool {
    p == q || p == (q.1, q.0)
}

impl PhysicsHooks for ContactMaterialTable {
    fn modify_solver_contacts(&self, context: &mut ContactModificationContext) {
        let a = SurfaceMaterial::from_user_data(context.colliders[context.collider1].user_data);
        let b = SurfaceMaterial::from_user_data(context.colliders[context.collider2].user_data);
        let material = self.lookup(a, b);

        for contact in context.solver_contacts.iter_mut() {
            contact.friction = material.friction;
            contact.restitution = material.restitution;
        }
    }
}
