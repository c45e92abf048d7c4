//! Per-frame data handed from the scene to the GPU.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::rendering::light::LightUniform;
use crate::rendering::scene::{Geometry, Object, Scene};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct SceneUniform {
    pub view_proj: [[f32; 4]; 4],
    pub light_view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    pub light: LightUniform,
    /// x: shadow map texel size, y: depth bias, z: 1 when the shader must encode sRGB,
    /// w: 1 when shadows are enabled.
    pub params: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// Metalness, roughness, environment intensity, receives shadow.
    pub material: [f32; 4],
}

impl InstanceRaw {
    const ATTRIBS: [wgpu::VertexAttribute; 10] = wgpu::vertex_attr_array![
        3 => Float32x4, 4 => Float32x4, 5 => Float32x4, 6 => Float32x4,
        7 => Float32x4, 8 => Float32x4, 9 => Float32x4, 10 => Float32x4,
        11 => Float32x4, 12 => Float32x4,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }

    pub fn from_object(object: &Object) -> Self {
        let model = object.transform.matrix();
        // Zero-size boxes have no inverse.
        let normal = if model.determinant().abs() > f32::EPSILON {
            model.inverse().transpose()
        } else {
            model
        };
        let material = &object.material;
        Self {
            model: model.to_cols_array_2d(),
            normal: normal.to_cols_array_2d(),
            color: material.color.extend(1.0).into(),
            material: [
                material.metalness,
                material.roughness,
                material.env_map_intensity,
                if object.receive_shadow { 1.0 } else { 0.0 },
            ],
        }
    }
}

/// Consecutive instances sharing geometry and shadow casting.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub geometry: Geometry,
    pub cast_shadow: bool,
    pub instances: Range<u32>,
}

/// Snapshot of the scene for one frame.
#[derive(Debug, Clone)]
pub struct FramePacket {
    pub uniform: SceneUniform,
    pub instances: Vec<InstanceRaw>,
    pub batches: Vec<Batch>,
}

impl FramePacket {
    pub fn from_scene(scene: &Scene) -> Self {
        let sun = &scene.sun;
        let light_view_proj = if sun.cast_shadow { sun.view_projection() } else { Mat4::ZERO };

        let uniform = SceneUniform {
            view_proj: scene.camera.view_projection().to_cols_array_2d(),
            light_view_proj: light_view_proj.to_cols_array_2d(),
            camera_position: scene.camera.position.extend(1.0).into(),
            light: sun.to_uniform(&scene.ambient),
            params: [
                1.0 / sun.shadow.map_size as f32,
                sun.shadow.bias,
                0.0,
                if sun.cast_shadow { 1.0 } else { 0.0 },
            ],
        };

        let mut objects: Vec<_> = scene.graph.iter().map(|(_, object)| object).collect();
        objects.sort_by_key(|object| (object.geometry, object.cast_shadow));

        let mut instances = Vec::with_capacity(objects.len());
        let mut batches: Vec<Batch> = Vec::new();
        for object in objects {
            let index = instances.len() as u32;
            instances.push(InstanceRaw::from_object(object));
            match batches.last_mut() {
                Some(batch) if batch.geometry == object.geometry && batch.cast_shadow == object.cast_shadow => {
                    batch.instances.end = index + 1;
                }
                _ => batches.push(Batch {
                    geometry: object.geometry,
                    cast_shadow: object.cast_shadow,
                    instances: index..index + 1,
                }),
            }
        }

        Self { uniform, instances, batches }
    }

    pub fn shadow_batches(&self) -> impl Iterator<Item = &Batch> {
        self.batches.iter().filter(|batch| batch.cast_shadow)
    }
}
