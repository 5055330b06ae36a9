//! Decorative particle field: the starfield and the two portal particle
//! populations.
//!
//! Purely visual; nothing in here affects gameplay. Populations are
//! constant-size - particles never expire or respawn individually, their
//! position/depth/size just cycle.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

use super::state::{PortalParticle, Star};
use crate::consts::*;

/// Build a fresh starfield for the given surface size
pub fn stars(rng: &mut Pcg32, surface_w: f32, surface_h: f32, count: usize) -> Vec<Star> {
    (0..count)
        .map(|_| Star {
            pos: Vec2::new(
                rng.random_range(0.0..surface_w),
                rng.random_range(0.0..surface_h),
            ),
            radius: rng.random_range(0.5..2.0),
            base_brightness: rng.random_range(0.3..1.0),
            pulse_speed: rng.random_range(0.001..0.01),
            pulse_phase: rng.random_range(0.0..TAU),
        })
        .collect()
}

/// Build one portal's particle population, all starting at the portal center
/// with randomized phase, speed and depth.
pub fn portal_particles(rng: &mut Pcg32, center: Vec2) -> Vec<PortalParticle> {
    let mut particles = Vec::with_capacity(INNER_PARTICLES + GLOW_PARTICLES);

    for _ in 0..INNER_PARTICLES {
        particles.push(PortalParticle {
            pos: center,
            z: rng.random_range(0.0..1.0),
            size: rng.random_range(1.0..INNER_SIZE_MAX),
            speed: rng.random_range(0.002..0.01),
            angle: rng.random_range(0.0..TAU),
            age: 0.0,
            pulse: 0.0,
        });
    }
    for _ in 0..GLOW_PARTICLES {
        particles.push(PortalParticle {
            pos: center,
            z: rng.random_range(0.0..1.0),
            size: rng.random_range(4.5..8.0),
            speed: rng.random_range(0.005..0.02),
            angle: rng.random_range(0.0..TAU),
            age: 0.0,
            pulse: 0.0,
        });
    }

    particles
}

/// Advance one portal's particles by one tick.
///
/// Inner particles spiral inward as their depth cycles; glow particles
/// breathe with the shared pulse phase. The orbit is flattened with the
/// same width/height ratio as the portal footprint.
pub fn advance_particles(particles: &mut [PortalParticle], center: Vec2, pulse_phase: f32) {
    for p in particles {
        let orbit = if p.is_glow() {
            let s = (pulse_phase + 0.1 * p.age).sin();
            p.angle += p.speed;
            p.age += 0.2;
            p.pulse = s;
            PORTAL_RADIUS * (1.3 + 0.3 * s)
        } else {
            p.z = (p.z + p.speed) % 1.0;
            p.angle += 3.0 * p.speed;
            p.age += 0.5;
            PORTAL_RADIUS * 0.8 * (1.0 - 0.7 * p.z)
        };

        p.pos = center
            + Vec2::new(
                p.angle.cos() * orbit * PORTAL_WIDTH_RATIO,
                p.angle.sin() * orbit * PORTAL_HEIGHT_RATIO,
            );
    }
}

/// Advance the starfield twinkle by one tick
pub fn advance_stars(stars: &mut [Star]) {
    for star in stars {
        star.pulse_phase = (star.pulse_phase + star.pulse_speed) % TAU;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_starfield_ranges() {
        let stars = stars(&mut rng(), 1000.0, 800.0, 200);
        assert_eq!(stars.len(), 200);
        for star in &stars {
            assert!(star.pos.x >= 0.0 && star.pos.x < 1000.0);
            assert!(star.pos.y >= 0.0 && star.pos.y < 800.0);
            assert!(star.radius >= 0.5 && star.radius < 2.0);
            assert!(star.base_brightness >= 0.3 && star.base_brightness < 1.0);
            // Twinkle stays within [0.4, 1.0] of the base
            assert!(star.brightness() <= star.base_brightness * 1.0 + 1e-6);
            assert!(star.brightness() >= star.base_brightness * 0.4 - 1e-6);
        }
    }

    #[test]
    fn test_population_split() {
        let particles = portal_particles(&mut rng(), Vec2::new(50.0, 400.0));
        assert_eq!(particles.len(), INNER_PARTICLES + GLOW_PARTICLES);
        assert_eq!(
            particles.iter().filter(|p| !p.is_glow()).count(),
            INNER_PARTICLES
        );
        assert_eq!(
            particles.iter().filter(|p| p.is_glow()).count(),
            GLOW_PARTICLES
        );
    }

    #[test]
    fn test_inner_depth_wraps_and_population_is_stable() {
        let center = Vec2::new(50.0, 400.0);
        let mut particles = portal_particles(&mut rng(), center);
        let count = particles.len();

        for tick in 0..2000 {
            let pulse = (tick as f32 * PULSE_STEP) % PULSE_WRAP;
            advance_particles(&mut particles, center, pulse);
        }

        assert_eq!(particles.len(), count);
        for p in &particles {
            assert!(p.z >= 0.0 && p.z < 1.0);
        }
    }

    #[test]
    fn test_inner_orbit_shrinks_with_depth() {
        let center = Vec2::ZERO;
        let mut near = PortalParticle {
            pos: center,
            z: 0.0,
            size: 2.0,
            speed: 0.0,
            angle: 0.0,
            age: 0.0,
            pulse: 0.0,
        };
        let mut far = PortalParticle { z: 0.9, ..near.clone() };

        advance_particles(std::slice::from_mut(&mut near), center, 0.0);
        advance_particles(std::slice::from_mut(&mut far), center, 0.0);

        assert!(far.pos.length() < near.pos.length());
    }

    #[test]
    fn test_glow_radius_follows_shared_pulse() {
        let center = Vec2::ZERO;
        let glow = PortalParticle {
            pos: center,
            z: 0.0,
            size: 6.0,
            speed: 0.0,
            angle: 0.0,
            age: 0.0,
            pulse: 0.0,
        };

        // sin = +1 at PI/2, -1 at 3PI/2
        let mut wide = glow.clone();
        advance_particles(std::slice::from_mut(&mut wide), center, std::f32::consts::FRAC_PI_2);
        let mut narrow = glow.clone();
        advance_particles(
            std::slice::from_mut(&mut narrow),
            center,
            3.0 * std::f32::consts::FRAC_PI_2,
        );

        assert!((wide.pos.length() - PORTAL_RADIUS * 1.6 * PORTAL_WIDTH_RATIO).abs() < 1e-3);
        assert!((narrow.pos.length() - PORTAL_RADIUS * 1.0 * PORTAL_WIDTH_RATIO).abs() < 1e-3);
        assert!((wide.pulse - 1.0).abs() < 1e-6);
    }
}
