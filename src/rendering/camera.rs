use std::f32::consts::{PI, TAU};

use glam::{Mat4, Vec3};

use crate::config::CameraSettings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(settings: &CameraSettings, aspect: f32) -> Self {
        Self {
            position: Vec3::from(settings.position),
            target: Vec3::from(settings.target),
            up: Vec3::Y,
            fov_y_degrees: settings.fov_y_degrees,
            aspect,
            near: settings.near,
            far: settings.far,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

/// Radius, polar angle from +Y, and azimuth around +Y measured from +Z.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    phi: f32,
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self { radius, phi: 0.0, theta: 0.0 };
        }
        Self {
            radius,
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            theta: offset.x.atan2(offset.z),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Mouse-driven orbit around a target point with exponential damping.
///
/// Input accumulates a pending rotation; every [`OrbitControls::update`]
/// applies `damping_factor` of what is pending and keeps the rest, so motion
/// eases out over subsequent frames.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    spherical: Spherical,
    pending_theta: f32,
    pending_phi: f32,
    pending_scale: f32,
}

const POLE_EPSILON: f32 = 1e-6;

impl OrbitControls {
    pub fn new(camera: &PerspectiveCamera, settings: &CameraSettings) -> Self {
        Self {
            target: camera.target,
            damping_factor: settings.damping_factor,
            rotate_speed: settings.rotate_speed,
            min_distance: settings.min_distance,
            max_distance: settings.max_distance,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            spherical: Spherical::from_offset(camera.position - camera.target),
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_scale: 1.0,
        }
    }

    /// Drag by `delta` pixels inside a viewport `viewport_height` pixels tall.
    /// A drag the full height of the viewport turns one full revolution.
    pub fn rotate(&mut self, delta_x: f32, delta_y: f32, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.pending_theta -= TAU * delta_x / viewport_height * self.rotate_speed;
        self.pending_phi -= TAU * delta_y / viewport_height * self.rotate_speed;
    }

    /// Scroll by `delta` points. Positive moves towards the target.
    pub fn dolly(&mut self, delta: f32) {
        self.pending_scale *= 0.95_f32.powf(delta / 50.0);
    }

    /// Apply pending input to `camera`. Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let before = camera.position;

        self.spherical.theta += self.pending_theta * self.damping_factor;
        self.spherical.phi += self.pending_phi * self.damping_factor;
        self.spherical.phi = self
            .spherical
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(POLE_EPSILON, PI - POLE_EPSILON);
        self.spherical.radius =
            (self.spherical.radius * self.pending_scale).clamp(self.min_distance, self.max_distance);

        camera.target = self.target;
        camera.position = self.target + self.spherical.to_offset();

        self.pending_theta *= 1.0 - self.damping_factor;
        self.pending_phi *= 1.0 - self.damping_factor;
        self.pending_scale = 1.0;

        before.distance_squared(camera.position) > 1e-12
    }

    pub fn distance(&self) -> f32 {
        self.spherical.radius
    }

    pub fn polar_angle(&self) -> f32 {
        self.spherical.phi
    }

    pub fn azimuth(&self) -> f32 {
        self.spherical.theta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rig() -> (PerspectiveCamera, OrbitControls) {
        let settings = CameraSettings::default();
        let camera = PerspectiveCamera::new(&settings, 16.0 / 9.0);
        let controls = OrbitControls::new(&camera, &settings);
        (camera, controls)
    }

    #[test]
    fn update_without_input_keeps_position() {
        let (mut camera, mut controls) = rig();
        let start = camera.position;
        assert!(!controls.update(&mut camera));
        assert_relative_eq!(camera.position.distance(start), 0.0, epsilon = 1e-5);
        assert_relative_eq!(controls.distance(), 27.0_f32.sqrt(), epsilon = 1e-5);
    }

    #[test]
    fn damping_converges_to_full_rotation() {
        let (mut camera, mut controls) = rig();
        let start = controls.azimuth();
        controls.rotate(100.0, 0.0, 1000.0);
        let expected = -TAU * 0.1;

        controls.update(&mut camera);
        assert_relative_eq!(controls.azimuth() - start, expected * 0.05, epsilon = 1e-5);

        for _ in 0..500 {
            controls.update(&mut camera);
        }
        assert_relative_eq!(controls.azimuth() - start, expected, epsilon = 1e-4);
        assert!(!controls.update(&mut camera));
    }

    #[test]
    fn polar_angle_stays_off_the_poles() {
        let (mut camera, mut controls) = rig();
        controls.rotate(0.0, 100_000.0, 100.0);
        for _ in 0..200 {
            controls.update(&mut camera);
            assert!(controls.polar_angle() > 0.0 && controls.polar_angle() < PI);
        }
        assert!(camera.position.y.is_finite());
    }

    #[test]
    fn dolly_respects_distance_range() {
        let (mut camera, mut controls) = rig();
        for _ in 0..100 {
            controls.dolly(500.0);
            controls.update(&mut camera);
        }
        assert_relative_eq!(controls.distance(), 0.5, epsilon = 1e-5);

        for _ in 0..200 {
            controls.dolly(-500.0);
            controls.update(&mut camera);
        }
        assert_relative_eq!(controls.distance(), 50.0, epsilon = 1e-3);
        assert_relative_eq!(camera.position.distance(camera.target), 50.0, epsilon = 1e-3);
    }

    #[test]
    fn projection_tracks_aspect() {
        let (mut camera, _) = rig();
        camera.set_aspect(2.0);
        let wide = camera.projection();
        camera.set_aspect(0.0);
        assert_eq!(camera.aspect, 2.0);
        assert_relative_eq!(wide.x_axis.x * 2.0, wide.y_axis.y, epsilon = 1e-5);
    }
}
