//! The particle field: stars flying toward the viewer.
//!
//! A [`ParticleField`] owns every star of one drawable surface together with a
//! private random number generator. Stars live in top-left-origin surface
//! pixels plus a depth coordinate; each [`advance`](ParticleField::advance)
//! moves them closer, and any star that reaches the near plane is respawned in
//! place so the field never grows, shrinks, or allocates while running.
//!
//! ```ignore
//! let config = FieldConfig::new(1920, 1080);
//! let mut field = ParticleField::new(&config);
//!
//! // Once per frame:
//! field.advance(time.delta(), &config);
//! ```

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;
use std::ops::RangeInclusive;

use crate::config::FieldConfig;

/// Range a star's base brightness is drawn from.
pub const BRIGHTNESS_RANGE: RangeInclusive<f32> = 0.6..=1.0;

/// One star.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    /// Position in surface pixels, origin at the top-left corner.
    pub position: Vec2,
    /// Distance from the viewer. Always greater than zero.
    pub depth: f32,
    /// Baseline brightness in [`BRIGHTNESS_RANGE`].
    pub brightness: f32,
    /// Twinkle phase offset in `[0, 2π)`.
    pub phase: f32,
}

/// The stars of one surface.
#[derive(Debug)]
pub struct ParticleField {
    stars: Vec<Star>,
    rng: SmallRng,
    // Sanitised copy of the config the stars were spawned against.
    config: FieldConfig,
}

impl ParticleField {
    /// Create a field seeded from OS entropy.
    pub fn new(config: &FieldConfig) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// Create a field with an explicit generator.
    ///
    /// Mostly useful for tests that want reproducible fields.
    pub fn with_rng(config: &FieldConfig, rng: SmallRng) -> Self {
        let mut field = Self {
            stars: Vec::new(),
            rng,
            config: config.sanitized(),
        };
        field.populate();
        field
    }

    /// Respawn every star against a (possibly new) configuration.
    ///
    /// The existing allocation is reused.
    pub fn reset(&mut self, config: &FieldConfig) {
        self.config = config.sanitized();
        self.populate();
    }

    fn populate(&mut self) {
        let count = self.config.star_count;
        self.stars.clear();
        self.stars.reserve(count);
        for _ in 0..count {
            let star = spawn(&mut self.rng, &self.config);
            self.stars.push(star);
        }
    }

    /// Move every star toward the viewer by `dt` seconds.
    ///
    /// `dt` must be non-negative; the host clock clamps it. Stars that end up
    /// at or below the near plane are respawned in place. Returns how many
    /// were respawned.
    pub fn advance(&mut self, dt: f32, config: &FieldConfig) -> usize {
        let step = config.depth_velocity() * dt;
        let step = if step.is_finite() { step.max(0.0) } else { 0.0 };
        // Respawns use the extent the field was initialised for; a new surface
        // size goes through `reset`.
        let near = self.config.near_plane;
        let mut respawned = 0;

        for star in &mut self.stars {
            star.depth -= step;
            if star.depth <= near {
                *star = spawn(&mut self.rng, &self.config);
                respawned += 1;
            }
        }

        if respawned > 0 {
            tracing::trace!(respawned, "stars crossed the near plane");
        }
        respawned
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// The sanitised configuration the field was last initialised with.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn stars_mut(&mut self) -> &mut [Star] {
        &mut self.stars
    }
}

/// Draw a fresh star from the spawn distribution.
fn spawn(rng: &mut SmallRng, config: &FieldConfig) -> Star {
    let (depth_low, depth_high) = config.spawn_depth_range();

    Star {
        position: Vec2::new(
            rng.gen_range(0.0..config.width as f32),
            rng.gen_range(0.0..config.height as f32),
        ),
        depth: rng.gen_range(depth_low..=depth_high),
        brightness: rng.gen_range(BRIGHTNESS_RANGE),
        phase: rng.gen_range(0.0..TAU),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(config: &FieldConfig) -> ParticleField {
        ParticleField::with_rng(config, SmallRng::seed_from_u64(7))
    }

    fn assert_in_spawn_ranges(star: &Star, config: &FieldConfig) {
        let (low, high) = config.spawn_depth_range();
        assert!(star.position.x >= 0.0 && star.position.x < config.width as f32);
        assert!(star.position.y >= 0.0 && star.position.y < config.height as f32);
        assert!(star.depth >= low && star.depth <= high);
        assert!(BRIGHTNESS_RANGE.contains(&star.brightness));
        assert!(star.phase >= 0.0 && star.phase < TAU);
    }

    #[test]
    fn test_new_field_has_star_count_stars() {
        let config = FieldConfig::new(640, 480).with_star_count(250);
        let field = seeded(&config);

        assert_eq!(field.len(), 250);
        for star in field.stars() {
            assert_in_spawn_ranges(star, &config);
            assert!(star.depth >= config.near_plane && star.depth <= config.far_plane);
        }
    }

    #[test]
    fn test_zero_star_count_is_clamped() {
        let config = FieldConfig::new(0, 0).with_star_count(0);
        let field = seeded(&config);
        assert_eq!(field.len(), 1);
        assert!(field.stars()[0].depth > 0.0);
    }

    #[test]
    fn test_advance_moves_stars_closer() {
        let config = FieldConfig::new(100, 100).with_star_count(20).with_speed(1.0);
        let mut field = seeded(&config);
        for star in field.stars_mut() {
            star.depth = 0.9;
        }

        let respawned = field.advance(0.1, &config);

        assert_eq!(respawned, 0);
        for star in field.stars() {
            assert!((star.depth - 0.85).abs() < 1e-6);
        }
    }

    #[test]
    fn test_zero_dt_changes_nothing() {
        let config = FieldConfig::new(100, 100).with_star_count(50);
        let mut field = seeded(&config);
        let before = field.stars().to_vec();

        field.advance(0.0, &config);

        assert_eq!(field.stars(), before.as_slice());
    }

    #[test]
    fn test_star_crossing_near_plane_respawns() {
        let config = FieldConfig::new(320, 200).with_star_count(1).with_speed(1.0);
        let mut field = seeded(&config);
        field.stars_mut()[0].depth = config.near_plane + 0.01;

        let respawned = field.advance(0.1, &config);

        assert_eq!(respawned, 1);
        assert_eq!(field.len(), 1);
        assert_in_spawn_ranges(&field.stars()[0], &config);
    }

    #[test]
    fn test_star_from_far_plane_flies_in_and_respawns() {
        let config = FieldConfig::new(1920, 1080)
            .with_star_count(1)
            .with_depth_planes(2.0, 33.0)
            .with_speed(1.0);
        let mut field = seeded(&config);
        field.stars_mut()[0].depth = 33.0;

        // 31 depth units at 0.008 per step.
        let mut steps = 0;
        loop {
            steps += 1;
            assert!(steps < 5000, "star never reached the near plane");
            let respawned = field.advance(0.016, &config);
            let depth = field.stars()[0].depth;
            assert!(depth > 0.0);
            if respawned == 1 {
                assert!((2.0..=33.0).contains(&depth), "respawned at {depth}");
                break;
            }
            assert!(depth > config.near_plane);
        }
        assert!(steps >= 3800, "respawned after only {steps} steps");
    }

    #[test]
    fn test_reset_reuses_field_with_new_extent() {
        let small = FieldConfig::new(100, 100).with_star_count(30);
        let mut field = seeded(&small);

        let large = FieldConfig::new(3840, 2160).with_star_count(90);
        field.reset(&large);

        assert_eq!(field.len(), 90);
        assert_eq!(field.config().width, 3840);
        for star in field.stars() {
            assert_in_spawn_ranges(star, &large);
        }
    }

    #[test]
    fn test_depth_stays_positive_with_huge_steps() {
        let config = FieldConfig::new(800, 600).with_star_count(100).with_speed(3.0);
        let mut field = seeded(&config);

        for _ in 0..200 {
            field.advance(10.0, &config);
            assert!(field.stars().iter().all(|s| s.depth > 0.0));
        }
        assert_eq!(field.len(), 100);
    }
}
