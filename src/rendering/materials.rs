use glam::Vec3;

use crate::utils::math::hex_color;

/// Metalness/roughness surface description shared by every object drawn with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardMaterial {
    /// Linear RGB.
    pub color: Vec3,
    pub metalness: f32,
    pub roughness: f32,
    /// Scale applied to environment-map reflections.
    pub env_map_intensity: f32,
}

impl StandardMaterial {
    pub fn new(color: Vec3) -> Self {
        Self {
            color,
            metalness: 0.0,
            roughness: 1.0,
            env_map_intensity: 1.0,
        }
    }

    pub fn metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness;
        self
    }

    pub fn roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn env_map_intensity(mut self, intensity: f32) -> Self {
        self.env_map_intensity = intensity;
        self
    }

    pub fn floor() -> Self {
        Self::new(hex_color(0x777777))
            .metalness(0.3)
            .roughness(0.4)
            .env_map_intensity(0.5)
    }

    pub fn box_surface() -> Self {
        Self::new(Vec3::ONE)
            .metalness(0.3)
            .roughness(0.4)
            .env_map_intensity(1.0)
    }
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self::new(Vec3::ONE)
    }
}
