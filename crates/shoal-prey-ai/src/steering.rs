//! Heading generators for wandering and fleeing prey.

use glam::DVec3;
use rand::Rng;

use shoal_core::constants::{FLEE_JITTER, WANDER_RETURN_BIAS, WANDER_VERTICAL_DAMPING};
use shoal_core::types::try_direction;

/// Uniform point inside the unit ball (rejection sampled from the cube).
pub fn random_in_unit_sphere<R: Rng>(rng: &mut R) -> DVec3 {
    loop {
        let p = DVec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if p.length_squared() <= 1.0 {
            return p;
        }
    }
}

/// Uniformly distributed unit vector.
pub fn random_unit_vector<R: Rng>(rng: &mut R) -> DVec3 {
    loop {
        if let Some(dir) = try_direction(random_in_unit_sphere(rng)) {
            return dir;
        }
    }
}

/// New wander heading: random, flattened vertically, and pulled back toward
/// `wander_center` once the prey has strayed past `wander_radius`.
pub fn wander_heading<R: Rng>(
    position: DVec3,
    wander_center: DVec3,
    wander_radius: f64,
    rng: &mut R,
) -> DVec3 {
    let mut heading = random_in_unit_sphere(rng);
    heading.y *= WANDER_VERTICAL_DAMPING;

    let to_center = wander_center - position;
    if to_center.length() > wander_radius {
        heading += to_center.normalize() * WANDER_RETURN_BIAS;
    }

    match try_direction(heading) {
        Some(dir) => dir,
        None => random_unit_vector(rng),
    }
}

/// Heading straight away from `predator`, jittered so escapes are not
/// perfectly predictable.
pub fn flee_heading<R: Rng>(position: DVec3, predator: DVec3, rng: &mut R) -> DVec3 {
    let away = match try_direction(position - predator) {
        Some(dir) => dir,
        // On top of the predator: any direction is away.
        None => random_unit_vector(rng),
    };
    let jittered = away + random_in_unit_sphere(rng) * FLEE_JITTER;
    try_direction(jittered).unwrap_or(away)
}
