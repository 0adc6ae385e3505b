//! Persisted user settings.
//!
//! Settings are stored as JSON in the per-user configuration directory
//! (`<config dir>/starfield/settings.json`). Values are clamped to their
//! allowed ranges on load and before save, so a hand-edited file can never
//! produce an unusable field.

use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::config::{FieldConfig, Rgb};
use crate::error::SettingsError;

/// Allowed star counts.
pub const STAR_COUNT_RANGE: RangeInclusive<u32> = 10..=5000;
/// Allowed speed, in percent.
pub const SPEED_PERCENT_RANGE: RangeInclusive<u32> = 10..=300;
/// Allowed twinkle amount, in percent.
pub const TWINKLE_PERCENT_RANGE: RangeInclusive<u32> = 0..=100;

/// Named colours offered by the settings editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorPreset {
    WarmWhite,
    CoolWhite,
    Blue,
    Yellow,
}

impl ColorPreset {
    pub const ALL: [ColorPreset; 4] = [
        ColorPreset::WarmWhite,
        ColorPreset::CoolWhite,
        ColorPreset::Blue,
        ColorPreset::Yellow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorPreset::WarmWhite => "Warm White",
            ColorPreset::CoolWhite => "Cool White",
            ColorPreset::Blue => "Blue",
            ColorPreset::Yellow => "Yellow",
        }
    }

    pub fn rgb(self) -> Rgb {
        match self {
            ColorPreset::WarmWhite => Rgb::new(255, 255, 240),
            ColorPreset::CoolWhite => Rgb::new(200, 200, 255),
            ColorPreset::Blue => Rgb::new(160, 180, 255),
            ColorPreset::Yellow => Rgb::new(255, 240, 180),
        }
    }

    /// The preset with exactly this colour, if any.
    pub fn from_rgb(color: Rgb) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.rgb() == color)
    }
}

/// User-facing screensaver settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub star_count: u32,
    pub speed_percent: u32,
    pub twinkle_percent: u32,
    pub color: Rgb,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            star_count: FieldConfig::DEFAULT_STAR_COUNT as u32,
            speed_percent: 60,
            twinkle_percent: 30,
            color: FieldConfig::DEFAULT_COLOR,
        }
    }
}

impl Settings {
    /// Clamp every value into its allowed range.
    pub fn clamped(mut self) -> Self {
        self.star_count = clamp_to(self.star_count, &STAR_COUNT_RANGE);
        self.speed_percent = clamp_to(self.speed_percent, &SPEED_PERCENT_RANGE);
        self.twinkle_percent = clamp_to(self.twinkle_percent, &TWINKLE_PERCENT_RANGE);
        self
    }

    /// Resolve a field configuration for a surface of the given size.
    pub fn field_config(&self, width: u32, height: u32, scale_factor: f32) -> FieldConfig {
        let s = self.clone().clamped();
        FieldConfig::new(width.max(1), height.max(1))
            .with_star_count(s.star_count as usize)
            .with_speed(s.speed_percent as f32 / 100.0)
            .with_twinkle(s.twinkle_percent as f32 / 100.0)
            .with_color(s.color)
            .with_scale_factor(scale_factor)
    }

    /// Default settings file location.
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        dirs::config_dir()
            .map(|dir| dir.join("starfield").join("settings.json"))
            .ok_or(SettingsError::NoConfigDir)
    }

    /// Load settings from a JSON file. Missing fields take default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&json)?;
        Ok(settings.clamped())
    }

    /// Load settings, falling back to defaults if the file is missing or bad.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                tracing::debug!(path = %path.display(), ?settings, "loaded settings");
                settings
            }
            Err(SettingsError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not load settings, using defaults");
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let io_error = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let json = serde_json::to_string_pretty(&self.clone().clamped())?;
        fs::write(path, json).map_err(io_error)?;
        tracing::info!(path = %path.display(), "saved settings");
        Ok(())
    }
}

fn clamp_to(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}
