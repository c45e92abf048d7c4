use glam::Vec3;
use rand::Rng;

use crate::config::SpawnSettings;

/// Where spawned boxes appear: a square of side `spread` centred on the origin, at `height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnArea {
    pub spread: f32,
    pub height: f32,
}

impl SpawnArea {
    pub fn new(spread: f32, height: f32) -> Self {
        Self { spread, height }
    }

    /// Area used by the panel's spawn button.
    pub fn panel(settings: &SpawnSettings) -> Self {
        Self::new(settings.spread, settings.height)
    }

    /// Area for the single box dropped at startup.
    pub fn initial(settings: &SpawnSettings) -> Self {
        Self::new(settings.initial_spread, settings.height)
    }
}

/// Size and starting position of one box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSpec {
    /// Width, height, depth.
    pub size: Vec3,
    pub position: Vec3,
}

impl BoxSpec {
    pub fn new(size: Vec3, position: Vec3) -> Self {
        Self { size, position }
    }

    /// Each dimension uniform in [0, 1); x and z uniform across the area; y at the area height.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, area: &SpawnArea) -> Self {
        let size = Vec3::new(rng.random(), rng.random(), rng.random());
        let position = Vec3::new(
            (rng.random::<f32>() - 0.5) * area.spread,
            area.height,
            (rng.random::<f32>() - 0.5) * area.spread,
        );
        Self { size, position }
    }

    /// Collider half-extents.
    ///
    /// Depth is divided by one, not two, so the collider is twice as deep as
    /// the visible box. Known mismatch; tests pin it.
    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(self.size.x / 2.0, self.size.y / 2.0, self.size.z / 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_boxes_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let area = SpawnArea::panel(&SpawnSettings::default());
        for _ in 0..1000 {
            let spec = BoxSpec::random(&mut rng, &area);
            for d in spec.size.to_array() {
                assert!((0.0..1.0).contains(&d), "dimension {} out of range", d);
            }
            assert!((-2.0..2.0).contains(&spec.position.x));
            assert!((-2.0..2.0).contains(&spec.position.z));
            assert_eq!(spec.position.y, 3.0);
        }
    }

    #[test]
    fn initial_box_lands_near_the_centre() {
        let mut rng = StdRng::seed_from_u64(11);
        let area = SpawnArea::initial(&SpawnSettings::default());
        for _ in 0..1000 {
            let spec = BoxSpec::random(&mut rng, &area);
            assert!((-0.5..0.5).contains(&spec.position.x));
            assert!((-0.5..0.5).contains(&spec.position.z));
            assert_eq!(spec.position.y, 3.0);
        }
    }

    #[test]
    fn depth_half_extent_is_full_depth() {
        let spec = BoxSpec::new(Vec3::new(0.8, 0.4, 0.6), Vec3::ZERO);
        assert_eq!(spec.half_extents(), Vec3::new(0.4, 0.2, 0.6));
    }
}
