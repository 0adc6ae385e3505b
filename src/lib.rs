//! # Starfield
//!
//! A star field screensaver: points of light stream outward from the centre
//! of the screen as if the viewer were flying through space.
//!
//! The crate separates the pieces so they can be used on their own:
//!
//! - [`ParticleField`] holds one surface's stars and advances them through
//!   depth, respawning a star at a random depth in the spawn range once it
//!   passes the near plane.
//! - [`projection`] turns a star into a screen-space [`StarSprite`]: position,
//!   radius and twinkling colour.
//! - [`SurfaceLifecycle`] ties a field to the drawable surface that owns it,
//!   re-initialising the field exactly when the surface geometry changes.
//! - [`app`] hosts all of this in winit windows and draws with wgpu.
//!
//! ## Quick Start
//!
//! ```
//! use starfield::{projection, FieldConfig, ParticleField};
//!
//! let config = FieldConfig::new(1920, 1080).with_speed(0.6);
//! let mut field = ParticleField::new(&config);
//!
//! let mut sprites = Vec::new();
//! let mut time = 0.0;
//! for _ in 0..60 {
//!     field.advance(0.016, &config);
//!     time += 0.016;
//!     projection::project_field(&field, &config, time, &mut sprites);
//! }
//! assert_eq!(sprites.len(), config.star_count);
//! ```
//!
//! ## Running
//!
//! The `starfield` binary accepts the usual screensaver switches:
//!
//! | Argument       | Mode                                        |
//! |----------------|---------------------------------------------|
//! | `/s`           | full screen on every monitor                |
//! | `/p <handle>`  | preview embedded in the host's window       |
//! | `/c`           | settings editor                             |
//!
//! Logging goes through `tracing`; set `RUST_LOG=starfield=debug` to see it.

pub mod app;
pub mod args;
pub mod config;
pub mod error;
pub mod field;
pub mod gpu;
pub mod input;
pub mod lifecycle;
pub mod projection;
pub mod settings;
#[cfg(feature = "egui")]
pub mod settings_ui;
pub mod time;

pub use args::Mode;
pub use config::{FieldConfig, Rgb};
pub use error::{AppError, ConfigError, GpuError, LifecycleError, SettingsError};
pub use field::{ParticleField, Star};
pub use lifecycle::{SurfaceLifecycle, SurfaceState};
pub use projection::{project, StarInstance, StarSprite};
pub use settings::Settings;
pub use time::Time;
