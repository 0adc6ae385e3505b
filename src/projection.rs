//! Perspective projection and twinkle shading.
//!
//! Everything here is a pure function of a [`Star`], a [`FieldConfig`] and
//! the elapsed time, so it can be called for any number of stars in any
//! order (or from several threads) without coordination.
//!
//! # Projection
//!
//! Stars are stored in top-left-origin surface pixels. Projection divides the
//! offset from the surface centre by depth:
//!
//! ```text
//! screen = center + (position - center) / depth
//! ```
//!
//! so stars stream outward from the centre as they approach the viewer.
//!
//! # Shading
//!
//! ```text
//! radius    = clamp(size_base / depth * (0.6 + 0.8 * brightness) * size_multiplier,
//!                   min_radius, max_radius) * scale_factor
//! intensity = brightness + twinkle * (0.5 + 0.5 * sin(phase + time * twinkle_frequency))
//! color     = clamp(base_color * intensity, 0, 1)
//! ```

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::config::{FieldConfig, DEPTH_EPSILON};
use crate::field::{ParticleField, Star};

/// A projected star, ready to draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarSprite {
    /// Centre in surface pixels (top-left origin).
    pub center: Vec2,
    /// Radius in physical pixels.
    pub radius: f32,
    /// Linear RGB, each channel in `0.0..=1.0`.
    pub color: Vec3,
}

/// GPU instance layout of a [`StarSprite`].
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct StarInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub color: [f32; 3],
}

impl From<StarSprite> for StarInstance {
    fn from(sprite: StarSprite) -> Self {
        Self {
            center: sprite.center.to_array(),
            radius: sprite.radius,
            color: sprite.color.to_array(),
        }
    }
}

/// Project one star onto the surface.
#[inline]
pub fn project(star: &Star, config: &FieldConfig, total_time: f64, center: Vec2) -> StarSprite {
    StarSprite {
        center: screen_position(star, center),
        radius: radius(star, config),
        color: color(star, config, total_time),
    }
}

/// Perspective-divided screen position.
#[inline]
pub fn screen_position(star: &Star, center: Vec2) -> Vec2 {
    center + (star.position - center) / star.depth.max(DEPTH_EPSILON)
}

/// Inverse-depth radius, clamped then scaled for the display.
#[inline]
pub fn radius(star: &Star, config: &FieldConfig) -> f32 {
    let depth = star.depth.max(DEPTH_EPSILON);
    let size = (config.size_base / depth) * (0.6 + 0.8 * star.brightness) * config.size_multiplier;
    size.max(config.min_radius).min(config.max_radius) * config.scale_factor
}

/// Twinkle intensity multiplier.
///
/// Exactly `star.brightness` when the twinkle amplitude is zero.
#[inline]
pub fn intensity(star: &Star, config: &FieldConfig, total_time: f64) -> f32 {
    // Reduce in f64 first; an f32 time loses the per-frame change after a few days.
    let cycle = (total_time * f64::from(config.twinkle_frequency)).rem_euclid(std::f64::consts::TAU);
    let wave = (star.phase + cycle as f32).sin() * 0.5 + 0.5;
    star.brightness + wave * config.twinkle
}

/// Base colour scaled by intensity, clamped to the displayable range.
#[inline]
pub fn color(star: &Star, config: &FieldConfig, total_time: f64) -> Vec3 {
    (config.color.to_vec3() * intensity(star, config, total_time)).clamp(Vec3::ZERO, Vec3::ONE)
}

/// Project every star of `field` into `out`, replacing its contents.
///
/// `out` keeps its allocation between frames.
pub fn project_field(field: &ParticleField, config: &FieldConfig, total_time: f64, out: &mut Vec<StarInstance>) {
    let center = config.center();
    out.clear();
    out.extend(
        field
            .stars()
            .iter()
            .map(|star| StarInstance::from(project(star, config, total_time, center))),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rgb;

    fn star(depth: f32) -> Star {
        Star {
            position: Vec2::new(100.0, 50.0),
            depth,
            brightness: 0.8,
            phase: 1.0,
        }
    }

    #[test]
    fn test_projection_diverges_from_center() {
        let center = Vec2::new(200.0, 100.0);
        let far = screen_position(&star(1.0), center);
        let near = screen_position(&star(0.5), center);

        assert_eq!(far, Vec2::new(100.0, 50.0));
        assert_eq!(near, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn test_star_at_center_stays_at_center() {
        let center = Vec2::new(100.0, 50.0);
        for depth in [0.05, 0.3, 1.0, 10.0] {
            assert_eq!(screen_position(&star(depth), center), center);
        }
    }

    #[test]
    fn test_radius_non_increasing_with_depth() {
        let config = FieldConfig::new(800, 600);
        let mut previous = f32::INFINITY;
        for i in 1..=400 {
            let depth = i as f32 * 0.01;
            let r = radius(&star(depth), &config);
            assert!(r <= previous, "radius grew at depth {depth}");
            assert!(r >= config.min_radius && r <= config.max_radius);
            previous = r;
        }
    }

    #[test]
    fn test_radius_respects_scale_factor() {
        let config = FieldConfig::new(800, 600);
        let scaled = config.clone().with_scale_factor(2.0);
        let s = star(0.4);
        assert!((radius(&s, &scaled) - 2.0 * radius(&s, &config)).abs() < 1e-5);
    }

    #[test]
    fn test_zero_twinkle_is_exact_brightness() {
        let config = FieldConfig::new(800, 600)
            .with_color(Rgb::new(255, 255, 240))
            .with_twinkle(0.0);
        let s = star(0.5);
        for t in [0.0, 0.37, 12.5, 1000.0] {
            assert_eq!(intensity(&s, &config, t), s.brightness);
        }
    }

    #[test]
    fn test_twinkle_oscillates_within_amplitude() {
        let config = FieldConfig::new(800, 600).with_twinkle(0.3);
        let s = star(0.5);
        let samples: Vec<f32> = (0..200).map(|i| intensity(&s, &config, i as f64 * 0.01)).collect();

        assert!(samples.iter().all(|&v| v >= s.brightness && v <= s.brightness + 0.3 + 1e-6));
        let spread = samples.iter().cloned().fold(f32::MIN, f32::max)
            - samples.iter().cloned().fold(f32::MAX, f32::min);
        assert!(spread > 0.1);
    }

    #[test]
    fn test_twinkle_still_moves_after_days() {
        let config = FieldConfig::new(800, 600).with_twinkle(0.3);
        let s = star(0.5);
        let start = 10.0 * 86_400.0;

        let samples: Vec<f32> = (0..60)
            .map(|i| intensity(&s, &config, start + i as f64 / 60.0))
            .collect();
        let spread = samples.iter().cloned().fold(f32::MIN, f32::max)
            - samples.iter().cloned().fold(f32::MAX, f32::min);
        assert!(spread > 0.1, "twinkle froze, spread {spread}");
    }

    #[test]
    fn test_color_channels_are_clamped() {
        let config = FieldConfig::new(10, 10)
            .with_color(Rgb::new(255, 128, 0))
            .with_twinkle(1.0);
        let mut s = star(0.5);
        s.brightness = 1.0;
        s.phase = std::f32::consts::FRAC_PI_2;

        let c = color(&s, &config, 0.0);
        assert_eq!(c.x, 1.0);
        assert!(c.y <= 1.0);
        assert_eq!(c.z, 0.0);
    }

    #[test]
    fn test_project_field_reuses_buffer() {
        let config = FieldConfig::new(320, 240).with_star_count(64);
        let field = ParticleField::new(&config);
        let mut out = Vec::with_capacity(64);

        project_field(&field, &config, 0.0, &mut out);
        let ptr = out.as_ptr();
        project_field(&field, &config, 1.0, &mut out);

        assert_eq!(out.len(), 64);
        assert_eq!(out.as_ptr(), ptr);
    }

    #[test]
    fn test_instance_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<StarInstance>(), 24);
    }
}
