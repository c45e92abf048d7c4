use std::collections::HashMap;
use crate::rendering::scene::{MeshId, Object};

pub struct SceneGraph {
    nodes: HashMap<MeshId, Object>,
    next_id: u32,
}

impl SceneGraph {
    pub fn new() -> Self {
        SceneGraph {
            nodes: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn add_object(&mut self, object: Object) -> MeshId {
        let id = MeshId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, object);
        id
    }

    pub fn remove_object(&mut self, id: MeshId) -> Option<Object> {
        self.nodes.remove(&id)
    }

    pub fn get(&self, id: MeshId) -> Option<&Object> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: MeshId) -> Option<&mut Object> {
        self.nodes.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Objects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (MeshId, &Object)> {
        let mut ids: Vec<_> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids.into_iter().filter_map(move |id| self.nodes.get(&id).map(|object| (id, object)))
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
