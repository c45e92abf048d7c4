use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct LightUniform {
    /// Unit vector from the surface towards the light.
    pub direction: [f32; 3],
    // Due to uniforms requiring 16 byte alignment, we need to add some padding.
    pub _padding: u32,
    /// Colour premultiplied by intensity.
    pub color: [f32; 3],
    pub _padding2: u32,
    pub ambient: [f32; 3],
    pub _padding3: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

impl AmbientLight {
    pub fn new(color: Vec3, intensity: f32) -> Self {
        Self { color, intensity }
    }

    pub fn radiance(&self) -> Vec3 {
        self.color * self.intensity
    }
}

/// Orthographic frustum the shadow map is rendered through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowCamera {
    pub map_size: u32,
    /// Half-width and half-height of the frustum.
    pub extent: f32,
    pub near: f32,
    pub far: f32,
    pub bias: f32,
}

impl Default for ShadowCamera {
    fn default() -> Self {
        Self {
            map_size: 1024,
            extent: 7.0,
            near: 0.5,
            far: 15.0,
            bias: 0.002,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub cast_shadow: bool,
    pub shadow: ShadowCamera,
}

impl DirectionalLight {
    pub fn new(color: Vec3, intensity: f32, position: Vec3) -> Self {
        Self {
            color,
            intensity,
            position,
            target: Vec3::ZERO,
            cast_shadow: false,
            shadow: ShadowCamera::default(),
        }
    }

    /// From the lit surface towards the light.
    pub fn direction(&self) -> Vec3 {
        (self.position - self.target).normalize_or(Vec3::Y)
    }

    pub fn radiance(&self) -> Vec3 {
        self.color * self.intensity
    }

    /// World to light clip space, used both to render and to sample the shadow map.
    pub fn view_projection(&self) -> Mat4 {
        let up = if self.direction().abs_diff_eq(Vec3::Y, 1e-4) { Vec3::Z } else { Vec3::Y };
        let view = Mat4::look_at_rh(self.position, self.target, up);
        let e = self.shadow.extent;
        let projection = Mat4::orthographic_rh(-e, e, -e, e, self.shadow.near, self.shadow.far);
        projection * view
    }

    pub fn to_uniform(&self, ambient: &AmbientLight) -> LightUniform {
        LightUniform {
            direction: self.direction().into(),
            _padding: 0,
            color: self.radiance().into(),
            _padding2: 0,
            ambient: ambient.radiance().into(),
            _padding3: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sun() -> DirectionalLight {
        DirectionalLight::new(Vec3::ONE, 0.2, Vec3::new(5.0, 5.0, 5.0))
    }

    #[test]
    fn target_projects_to_shadow_map_centre() {
        let clip = sun().view_projection() * Vec3::ZERO.extend(1.0);
        assert_relative_eq!(clip.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y, 0.0, epsilon = 1e-5);
        assert!(clip.z > 0.0 && clip.z < 1.0);
    }

    #[test]
    fn spawn_volume_fits_in_shadow_frustum() {
        let view_proj = sun().view_projection();
        for (x, z) in [(-2.0, -2.0), (-2.0, 2.0), (2.0, -2.0), (2.0, 2.0)] {
            for y in [0.0, 3.0] {
                let clip = view_proj * Vec3::new(x, y, z).extend(1.0);
                assert!(clip.x.abs() <= 1.0 && clip.y.abs() <= 1.0, "({}, {}, {}) outside", x, y, z);
                assert!((0.0..=1.0).contains(&clip.z), "({}, {}, {}) depth {}", x, y, z, clip.z);
            }
        }
    }

    #[test]
    fn uniform_carries_premultiplied_colour() {
        let uniform = sun().to_uniform(&AmbientLight::new(Vec3::ONE, 0.7));
        assert_relative_eq!(uniform.color[0], 0.2);
        assert_relative_eq!(uniform.ambient[2], 0.7);
        let d = Vec3::from(uniform.direction);
        assert_relative_eq!(d.length(), 1.0, epsilon = 1e-6);
    }
}
