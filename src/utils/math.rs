//! Conversions between the physics engine's nalgebra types and the glam types
//! used by the scene graph and renderer.

use glam::{Quat, Vec3};
use rapier3d::math::{Real, Rotation, Vector};

/// Physics vector to scene vector.
pub fn to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Physics rotation to scene quaternion.
pub fn to_quat(q: &Rotation<Real>) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

/// Scene vector to physics vector.
pub fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

/// `0xRRGGBB` sRGB colour to linear RGB.
pub fn hex_color(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

/// sRGB transfer function, inverted.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rotation_round_trips_through_glam() {
        let q = Rotation::from_euler_angles(0.3, -1.2, 0.7);
        let g = to_quat(&q);
        let expected = Quat::from_euler(glam::EulerRot::ZYX, 0.7, -1.2, 0.3);
        assert!(g.dot(expected).abs() > 0.9999);
    }

    #[test]
    fn vectors_keep_component_order() {
        let v = to_vector(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(to_vec3(&v), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn floor_grey_is_linearized() {
        let c = hex_color(0x777777);
        assert_relative_eq!(c.x, 0.184_475, epsilon = 1e-4);
        assert_eq!(c.x, c.y);
        assert_eq!(hex_color(0xff0000), Vec3::new(1.0, 0.0, 0.0));
    }
}
