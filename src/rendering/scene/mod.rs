pub mod graph;

use glam::{Mat4, Quat, Vec3};

use crate::config::CameraSettings;
use crate::rendering::camera::PerspectiveCamera;
use crate::rendering::light::{AmbientLight, DirectionalLight};
use crate::rendering::materials::StandardMaterial;

pub use graph::SceneGraph;

/// Handle to an object in the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u32);

/// Built-in geometry. Both are unit sized and scaled through the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Geometry {
    /// 1×1×1 cube centred on the origin.
    UnitBox,
    /// 1×1 square in the XY plane facing +Z.
    Plane,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

pub struct Object {
    pub transform: Transform,
    pub geometry: Geometry,
    pub material: StandardMaterial,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Object {
    pub fn new(geometry: Geometry, material: StandardMaterial) -> Self {
        Self {
            transform: Transform::default(),
            geometry,
            material,
            cast_shadow: false,
            receive_shadow: false,
        }
    }
}

/// Everything drawn in the 3D view.
pub struct Scene {
    pub camera: PerspectiveCamera,
    pub ambient: AmbientLight,
    pub sun: DirectionalLight,
    pub graph: SceneGraph,
    floor: MeshId,
}

impl Scene {
    /// Camera, ambient and shadow-casting directional light, and a 10×10 floor.
    pub fn new(camera: &CameraSettings, aspect: f32) -> Self {
        let mut sun = DirectionalLight::new(Vec3::ONE, 0.2, Vec3::new(5.0, 5.0, 5.0));
        sun.cast_shadow = true;

        let mut floor = Object::new(Geometry::Plane, StandardMaterial::floor());
        floor.transform.scale = Vec3::new(10.0, 10.0, 1.0);
        floor.transform.rotation = Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2);
        floor.receive_shadow = true;

        let mut graph = SceneGraph::new();
        let floor = graph.add_object(floor);

        Self {
            camera: PerspectiveCamera::new(camera, aspect),
            ambient: AmbientLight::new(Vec3::ONE, 0.7),
            sun,
            graph,
            floor,
        }
    }

    /// Add a shadow-casting box of the given size.
    pub fn add_box(&mut self, size: Vec3, position: Vec3) -> MeshId {
        let mut object = Object::new(Geometry::UnitBox, StandardMaterial::box_surface());
        object.transform.scale = size;
        object.transform.position = position;
        object.cast_shadow = true;
        self.graph.add_object(object)
    }

    pub fn remove(&mut self, id: MeshId) -> Option<Object> {
        self.graph.remove_object(id)
    }

    pub fn set_pose(&mut self, id: MeshId, position: Vec3, rotation: Quat) {
        if let Some(object) = self.graph.get_mut(id) {
            object.transform.position = position;
            object.transform.rotation = rotation;
        }
    }

    pub fn floor(&self) -> MeshId {
        self.floor
    }

    pub fn box_count(&self) -> usize {
        self.graph
            .iter()
            .filter(|(_, object)| object.geometry == Geometry::UnitBox)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scene() -> Scene {
        Scene::new(&CameraSettings::default(), 1.0)
    }

    #[test]
    fn floor_faces_up() {
        let scene = scene();
        let floor = scene.graph.get(scene.floor()).unwrap();
        let normal = floor.transform.matrix().transform_vector3(Vec3::Z).normalize();
        assert_relative_eq!(normal.y, 1.0, epsilon = 1e-6);
        assert!(floor.receive_shadow && !floor.cast_shadow);
        assert_eq!(scene.box_count(), 0);
    }

    #[test]
    fn boxes_are_counted_and_removed() {
        let mut scene = scene();
        let a = scene.add_box(Vec3::splat(0.5), Vec3::new(0.0, 3.0, 0.0));
        let b = scene.add_box(Vec3::splat(0.2), Vec3::new(1.0, 3.0, 0.0));
        assert_ne!(a, b);
        assert_eq!(scene.box_count(), 2);

        assert!(scene.remove(a).is_some());
        assert!(scene.remove(a).is_none());
        assert_eq!(scene.box_count(), 1);
        assert_eq!(scene.graph.len(), 2);
    }

    #[test]
    fn set_pose_moves_the_box() {
        let mut scene = scene();
        let id = scene.add_box(Vec3::ONE, Vec3::ZERO);
        let rotation = Quat::from_rotation_y(0.3);
        scene.set_pose(id, Vec3::new(1.0, 2.0, 3.0), rotation);
        let object = scene.graph.get(id).unwrap();
        assert_eq!(object.transform.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(object.transform.rotation, rotation);
        assert_eq!(object.transform.scale, Vec3::ONE);
    }
}
