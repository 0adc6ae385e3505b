//! Error types for the starfield.
//!
//! The simulation core never fails at run time; these cover configuration
//! preconditions, surface lifecycle misuse, persisted settings, GPU
//! initialisation and the window host.

use std::fmt;
use std::path::PathBuf;

use crate::lifecycle::SurfaceState;

/// A [`FieldConfig`](crate::FieldConfig) precondition that does not hold.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `star_count` is zero.
    ZeroStarCount,
    /// The surface has no area.
    EmptySurface { width: u32, height: u32 },
    /// The near plane is not positive or the far plane is not beyond it.
    InvalidDepthRange { near: f32, far: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroStarCount => write!(f, "Star count must be at least 1"),
            ConfigError::EmptySurface { width, height } => {
                write!(f, "Surface must be at least 1x1 pixels, got {}x{}", width, height)
            }
            ConfigError::InvalidDepthRange { near, far } => write!(
                f,
                "Depth planes must satisfy 0 < near < far, got near={} far={}",
                near, far
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A surface lifecycle transition that the state machine does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    InvalidTransition { from: SurfaceState, to: SurfaceState },
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleError::InvalidTransition { from, to } => {
                write!(f, "Invalid surface transition from {:?} to {:?}", from, to)
            }
        }
    }
}

impl std::error::Error for LifecycleError {}

/// Errors reading or writing persisted settings.
#[derive(Debug)]
pub enum SettingsError {
    /// The platform has no per-user configuration directory.
    NoConfigDir,
    /// Failed to read or write the settings file.
    Io { path: PathBuf, source: std::io::Error },
    /// The settings file is not valid JSON for [`Settings`](crate::settings::Settings).
    Json(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::NoConfigDir => write!(f, "No user configuration directory available"),
            SettingsError::Io { path, source } => {
                write!(f, "Failed to access settings file {}: {}", path.display(), source)
            }
            SettingsError::Json(e) => write!(f, "Invalid settings file: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io { source, .. } => Some(source),
            SettingsError::Json(e) => Some(e),
            SettingsError::NoConfigDir => None,
        }
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Json(e)
    }
}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// The surface reports no usable format or alpha mode on the chosen adapter.
    IncompatibleSurface,
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            GpuError::IncompatibleSurface => write!(f, "Surface cannot be presented by the selected GPU adapter"),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter | GpuError::IncompatibleSurface => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when running the screensaver.
#[derive(Debug)]
pub enum AppError {
    /// Failed to create or run the event loop.
    EventLoop(winit::error::EventLoopError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// Not a single window could be opened.
    NoDisplays,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::EventLoop(e) => write!(f, "Event loop error: {}", e),
            AppError::Gpu(e) => write!(f, "GPU error: {}", e),
            AppError::NoDisplays => write!(f, "No window could be created on any monitor"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::EventLoop(e) => Some(e),
            AppError::Gpu(e) => Some(e),
            AppError::NoDisplays => None,
        }
    }
}

impl From<winit::error::EventLoopError> for AppError {
    fn from(e: winit::error::EventLoopError) -> Self {
        AppError::EventLoop(e)
    }
}

impl From<GpuError> for AppError {
    fn from(e: GpuError) -> Self {
        AppError::Gpu(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_error_messages() {
        let e = ConfigError::EmptySurface { width: 0, height: 5 };
        assert_eq!(e.to_string(), "Surface must be at least 1x1 pixels, got 0x5");
    }

    #[test]
    fn test_settings_io_error_has_source() {
        let e = SettingsError::Io {
            path: PathBuf::from("settings.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("settings.json"));
    }

    #[test]
    fn test_incompatible_surface_has_no_source() {
        let e = GpuError::IncompatibleSurface;
        assert!(e.source().is_none());
        assert!(e.to_string().contains("adapter"));
    }

    #[test]
    fn test_app_error_wraps_gpu_error() {
        let e: AppError = GpuError::NoAdapter.into();
        assert!(matches!(e, AppError::Gpu(GpuError::NoAdapter)));
        assert!(e.source().is_some());
    }
}
