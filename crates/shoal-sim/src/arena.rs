//! Arena: the playable volume and its soft containment rule.

use glam::DVec3;
use rand::Rng;

use shoal_core::config::ArenaConfig;

/// Axis-aligned box `center ± half_extents`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    center: DVec3,
    half_extents: DVec3,
    spring_rate: f64,
}

impl Arena {
    /// Negative extents are clamped to zero.
    pub fn new(center: DVec3, half_extents: DVec3, spring_rate: f64) -> Self {
        Self {
            center,
            half_extents: half_extents.max(DVec3::ZERO),
            spring_rate: spring_rate.max(0.0),
        }
    }

    pub fn from_config(config: &ArenaConfig) -> Self {
        Self::new(config.center, config.half_extents, config.spring_rate)
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }

    pub fn half_extents(&self) -> DVec3 {
        self.half_extents
    }

    pub fn min(&self) -> DVec3 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> DVec3 {
        self.center + self.half_extents
    }

    /// Inclusive on the faces.
    pub fn contains(&self, position: DVec3) -> bool {
        position.cmpge(self.min()).all() && position.cmple(self.max()).all()
    }

    /// Where `position` should be after `dt` seconds of spring-back.
    ///
    /// Inside the arena the position is returned unchanged. Outside on any
    /// axis it moves toward the center by `spring_rate * dt` of the remaining
    /// distance (capped at the full distance), so agents drift back instead
    /// of teleporting onto the wall.
    pub fn containment_correction(&self, position: DVec3, dt: f64) -> DVec3 {
        if self.contains(position) {
            return position;
        }
        let fraction = (self.spring_rate * dt).clamp(0.0, 1.0);
        position + (self.center - position) * fraction
    }

    /// Uniform random point inside the volume.
    pub fn random_point<R: Rng>(&self, rng: &mut R) -> DVec3 {
        let (min, max) = (self.min(), self.max());
        DVec3::new(
            rng.gen_range(min.x..=max.x),
            rng.gen_range(min.y..=max.y),
            rng.gen_range(min.z..=max.z),
        )
    }
}
