//! Field configuration.
//!
//! [`FieldConfig`] is the resolved set of parameters driving one
//! [`ParticleField`](crate::ParticleField). It is built by the host (usually
//! from [`Settings`](crate::settings::Settings)) and passed explicitly into
//! every simulation and projection call. Changing any value means
//! re-initialising the field.
//!
//! ```ignore
//! let config = FieldConfig::new(1920, 1080)
//!     .with_star_count(800)
//!     .with_speed(0.6)
//!     .with_twinkle(0.3)
//!     .with_color(Rgb::new(255, 255, 240));
//! ```

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest depth the simulation will ever divide by.
pub const DEPTH_EPSILON: f32 = 1e-3;

/// An 8-bit RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels normalised to `0.0..=1.0`.
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r as f32, self.g as f32, self.b as f32) / 255.0
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// Resolved configuration for one particle field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    /// Number of stars in the field.
    pub star_count: usize,
    /// Speed multiplier applied to `depth_rate` (1.0 = 100%).
    pub speed: f32,
    /// Twinkle amplitude added on top of each star's base brightness.
    pub twinkle: f32,
    /// Base star colour.
    pub color: Rgb,
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Stars at or below this depth are respawned.
    pub near_plane: f32,
    /// Farthest spawn depth.
    pub far_plane: f32,
    /// Lower bound of the spawn depth range, kept inside `[near_plane, far_plane]`.
    pub spawn_min_depth: f32,
    /// Depth units travelled per second at speed 1.0.
    pub depth_rate: f32,
    /// Angular frequency of the twinkle oscillation.
    pub twinkle_frequency: f32,
    /// Numerator of the inverse-depth radius.
    pub size_base: f32,
    /// Global radius multiplier.
    pub size_multiplier: f32,
    /// Smallest radius in pixels (before display scaling).
    pub min_radius: f32,
    /// Largest radius in pixels (before display scaling).
    pub max_radius: f32,
    /// Display scale factor (1.0 = 96 DPI).
    pub scale_factor: f32,
}

impl FieldConfig {
    pub const DEFAULT_STAR_COUNT: usize = 600;
    pub const DEFAULT_COLOR: Rgb = Rgb::new(255, 255, 240);

    /// Create a configuration for a `width` x `height` surface with default
    /// simulation parameters.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            star_count: Self::DEFAULT_STAR_COUNT,
            speed: 0.6,
            twinkle: 0.3,
            color: Self::DEFAULT_COLOR,
            width,
            height,
            near_plane: 0.05,
            far_plane: 1.0,
            spawn_min_depth: 0.2,
            depth_rate: 0.5,
            twinkle_frequency: 5.0,
            size_base: 1.0,
            size_multiplier: 1.0,
            min_radius: 0.5,
            max_radius: 8.0,
            scale_factor: 1.0,
        }
    }

    pub fn with_star_count(mut self, count: usize) -> Self {
        self.star_count = count;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_twinkle(mut self, twinkle: f32) -> Self {
        self.twinkle = twinkle;
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn with_surface(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the near (respawn) and far (spawn) depth planes.
    pub fn with_depth_planes(mut self, near: f32, far: f32) -> Self {
        self.near_plane = near;
        self.far_plane = far;
        self
    }

    pub fn with_spawn_min_depth(mut self, depth: f32) -> Self {
        self.spawn_min_depth = depth;
        self
    }

    pub fn with_radius_range(mut self, min: f32, max: f32) -> Self {
        self.min_radius = min;
        self.max_radius = max;
        self
    }

    pub fn with_scale_factor(mut self, scale: f32) -> Self {
        self.scale_factor = scale;
        self
    }

    /// Surface extent in pixels.
    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Surface centre in the top-left-origin pixel space stars live in.
    pub fn center(&self) -> Vec2 {
        self.extent() * 0.5
    }

    /// Depth range new stars are drawn from.
    pub fn spawn_depth_range(&self) -> (f32, f32) {
        let low = self.spawn_min_depth.max(self.near_plane).min(self.far_plane);
        (low, self.far_plane)
    }

    /// Depth lost per second.
    pub fn depth_velocity(&self) -> f32 {
        self.depth_rate * self.speed
    }

    /// Check preconditions without modifying anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.star_count == 0 {
            return Err(ConfigError::ZeroStarCount);
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptySurface {
                width: self.width,
                height: self.height,
            });
        }
        let planes_ok = self.near_plane.is_finite()
            && self.far_plane.is_finite()
            && self.near_plane >= DEPTH_EPSILON
            && self.far_plane > self.near_plane;
        if !planes_ok {
            return Err(ConfigError::InvalidDepthRange {
                near: self.near_plane,
                far: self.far_plane,
            });
        }
        Ok(())
    }

    /// Return a copy with every degenerate value clamped to a safe minimum.
    ///
    /// The result always passes [`validate`](Self::validate).
    pub fn sanitized(&self) -> Self {
        let defaults = Self::new(self.width, self.height);
        let mut out = self.clone();

        out.star_count = out.star_count.max(1);
        out.width = out.width.max(1);
        out.height = out.height.max(1);

        if !out.near_plane.is_finite() {
            out.near_plane = defaults.near_plane;
        }
        out.near_plane = out.near_plane.max(DEPTH_EPSILON);
        if !out.far_plane.is_finite() {
            out.far_plane = defaults.far_plane.max(out.near_plane + DEPTH_EPSILON);
        }
        out.far_plane = out.far_plane.max(out.near_plane + DEPTH_EPSILON);
        if !out.spawn_min_depth.is_finite() {
            out.spawn_min_depth = out.near_plane;
        }

        out.speed = non_negative(out.speed);
        out.twinkle = non_negative(out.twinkle);
        out.depth_rate = non_negative(out.depth_rate);
        out.size_multiplier = non_negative(out.size_multiplier);
        if !out.twinkle_frequency.is_finite() {
            out.twinkle_frequency = defaults.twinkle_frequency;
        }
        if !out.size_base.is_finite() || out.size_base <= 0.0 {
            out.size_base = defaults.size_base;
        }
        if !out.scale_factor.is_finite() || out.scale_factor <= 0.0 {
            out.scale_factor = 1.0;
        }
        if !out.min_radius.is_finite() || out.min_radius < 0.0 {
            out.min_radius = defaults.min_radius;
        }
        if !out.max_radius.is_finite() || out.max_radius < out.min_radius {
            out.max_radius = out.min_radius.max(defaults.max_radius);
        }
        out
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = FieldConfig::new(1920, 1080);
        assert!(config.validate().is_ok());
        assert_eq!(config.star_count, 600);
        assert_eq!(config.color, Rgb::new(255, 255, 240));
        assert_eq!(config.center(), Vec2::new(960.0, 540.0));
    }

    #[test]
    fn test_validate_rejects_degenerate_values() {
        let zero = FieldConfig::new(10, 10).with_star_count(0);
        assert!(matches!(zero.validate(), Err(ConfigError::ZeroStarCount)));

        let empty = FieldConfig::new(0, 10);
        assert!(matches!(empty.validate(), Err(ConfigError::EmptySurface { .. })));

        let inverted = FieldConfig::new(10, 10).with_depth_planes(2.0, 1.0);
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::InvalidDepthRange { .. })
        ));
    }

    #[test]
    fn test_sanitized_always_validates() {
        let broken = FieldConfig::new(0, 0)
            .with_star_count(0)
            .with_depth_planes(-1.0, -5.0)
            .with_speed(f32::NAN)
            .with_twinkle(-0.5)
            .with_scale_factor(0.0)
            .with_radius_range(4.0, 1.0);

        let fixed = broken.sanitized();
        assert!(fixed.validate().is_ok());
        assert_eq!(fixed.star_count, 1);
        assert_eq!((fixed.width, fixed.height), (1, 1));
        assert!(fixed.far_plane > fixed.near_plane);
        assert_eq!(fixed.speed, 0.0);
        assert_eq!(fixed.twinkle, 0.0);
        assert_eq!(fixed.scale_factor, 1.0);
        assert!(fixed.max_radius >= fixed.min_radius);
    }

    #[test]
    fn test_spawn_depth_range_stays_within_planes() {
        let config = FieldConfig::new(100, 100).with_depth_planes(2.0, 33.0);
        assert_eq!(config.spawn_depth_range(), (2.0, 33.0));

        let config = FieldConfig::new(100, 100).with_spawn_min_depth(0.5);
        assert_eq!(config.spawn_depth_range(), (0.5, 1.0));

        let config = FieldConfig::new(100, 100).with_spawn_min_depth(7.0);
        assert_eq!(config.spawn_depth_range(), (1.0, 1.0));
    }

    #[test]
    fn test_rgb_to_vec3() {
        let white = Rgb::new(255, 255, 255).to_vec3();
        assert_eq!(white, Vec3::ONE);
        assert_eq!(Rgb::from([1, 2, 3]), Rgb::new(1, 2, 3));
    }
}
