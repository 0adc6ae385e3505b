//! Window host.
//!
//! Owns the winit event loop, one window per drawable surface, the shared GPU
//! context and the frame clock. Every frame it advances each surface's field,
//! projects it, and draws it; fields never share state.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowAttributes, WindowId, WindowLevel},
};

use crate::args::Mode;
use crate::config::FieldConfig;
use crate::error::{AppError, GpuError};
use crate::gpu::{GpuContext, SurfaceTarget};
use crate::input::{ExitFilter, InputVerdict};
use crate::lifecycle::SurfaceLifecycle;
use crate::projection::{self, StarInstance};
use crate::settings::Settings;
use crate::time::{FrameLimiter, Time};

#[cfg(feature = "egui")]
use crate::gpu::egui_integration::EguiIntegration;
#[cfg(feature = "egui")]
use crate::settings_ui::{EditorAction, EditorResponse, SettingsEditor};

/// Preview size used when the parent's client area is unknown.
const PREVIEW_SIZE: PhysicalSize<u32> = PhysicalSize::new(152, 112);
const SETTINGS_WINDOW_SIZE: LogicalSize<f64> = LogicalSize::new(640.0, 480.0);
const FULLSCREEN_FRAME_INTERVAL: Duration = Duration::from_millis(1);
const PREVIEW_FRAME_INTERVAL: Duration = Duration::from_millis(15);

/// Run the screensaver in `mode` until it decides to stop.
///
/// `settings_path` is where the settings editor saves; `None` disables saving.
pub fn run(mode: Mode, settings: Settings, settings_path: Option<PathBuf>) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(mode, settings, settings_path);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// One window and the star field drawn into it.
struct Display {
    window: Arc<Window>,
    target: SurfaceTarget,
    surface: SurfaceLifecycle,
    config: FieldConfig,
}

impl Display {
    fn field_config(settings: &Settings, window: &Window, size: PhysicalSize<u32>) -> FieldConfig {
        settings.field_config(size.width, size.height, window.scale_factor() as f32)
    }

    /// Apply new surface geometry: reconfigure the swapchain, then fully
    /// re-initialise the field against the new extent.
    fn resize(&mut self, gpu: &GpuContext, settings: &Settings, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.target.resize(gpu, size.width, size.height);
        self.config = Self::field_config(settings, &self.window, size);
        if let Err(e) = self.surface.resize(&self.config) {
            tracing::warn!(error = %e, "resize ignored");
        }
        tracing::debug!(width = size.width, height = size.height, "surface resized");
    }

    /// Settings changed: respawn every star with the new configuration.
    fn reconfigure(&mut self, settings: &Settings) {
        self.config = Self::field_config(settings, &self.window, self.window.inner_size());
        if let Err(e) = self.surface.reconfigure(&self.config) {
            tracing::warn!(error = %e, "reconfigure ignored");
        }
    }
}

#[cfg(feature = "egui")]
struct EditorState {
    egui: EguiIntegration,
    editor: SettingsEditor,
}

struct App {
    mode: Mode,
    settings: Settings,
    settings_path: Option<PathBuf>,
    gpu: Option<GpuContext>,
    displays: Vec<Display>,
    time: Time,
    limiter: FrameLimiter,
    exit_filter: ExitFilter,
    // Scratch buffer reused by every display every frame.
    sprites: Vec<StarInstance>,
    #[cfg(feature = "egui")]
    editor: Option<EditorState>,
    error: Option<AppError>,
}

impl App {
    fn new(mode: Mode, settings: Settings, settings_path: Option<PathBuf>) -> Self {
        let interval = match mode {
            Mode::Fullscreen => FULLSCREEN_FRAME_INTERVAL,
            Mode::Preview { .. } | Mode::Settings { .. } => PREVIEW_FRAME_INTERVAL,
        };
        Self {
            mode,
            settings: settings.clamped(),
            settings_path,
            gpu: None,
            displays: Vec::new(),
            time: Time::new(),
            limiter: FrameLimiter::new(interval),
            exit_filter: ExitFilter::new(Instant::now()),
            sprites: Vec::new(),
            #[cfg(feature = "egui")]
            editor: None,
            error: None,
        }
    }

    /// Settings the fields are currently built from: the editor's draft while
    /// it is open, the loaded settings otherwise.
    fn active_settings(&self) -> &Settings {
        #[cfg(feature = "egui")]
        if let Some(state) = &self.editor {
            return state.editor.draft();
        }
        &self.settings
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        tracing::error!(error = %error, "stopping");
        self.error = Some(error);
        event_loop.exit();
    }

    fn create_windows(&self, event_loop: &ActiveEventLoop) -> Vec<Arc<Window>> {
        let attributes: Vec<WindowAttributes> = match self.mode {
            Mode::Fullscreen => {
                let monitors: Vec<_> = event_loop.available_monitors().collect();
                if monitors.is_empty() {
                    vec![fullscreen_attributes(None)]
                } else {
                    monitors.into_iter().map(|m| fullscreen_attributes(Some(m))).collect()
                }
            }
            Mode::Preview { parent } => vec![preview_attributes(parent)],
            Mode::Settings { .. } => vec![Window::default_attributes()
                .with_title("Starfield Settings")
                .with_inner_size(SETTINGS_WINDOW_SIZE)],
        };

        let mut windows = Vec::with_capacity(attributes.len());
        for attrs in attributes {
            match event_loop.create_window(attrs) {
                Ok(window) => {
                    if self.mode == Mode::Fullscreen {
                        window.set_cursor_visible(false);
                    }
                    tracing::info!(id = ?window.id(), size = ?window.inner_size(), "created window");
                    windows.push(Arc::new(window));
                }
                Err(e) => tracing::warn!(error = %e, "skipping window that failed to open"),
            }
        }
        windows
    }

    fn attach_display(
        &mut self,
        gpu: &GpuContext,
        window: Arc<Window>,
        surface: wgpu::Surface<'static>,
    ) -> Result<(), GpuError> {
        let mut size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            if let Some(monitor) = window.current_monitor() {
                size = monitor.size();
            }
        }
        let target = SurfaceTarget::new(gpu, surface, size.width, size.height)?;
        let config = Display::field_config(&self.settings, &window, size);
        let mut lifecycle = SurfaceLifecycle::new();
        if let Err(e) = lifecycle.acquire(&config) {
            tracing::warn!(error = %e, "surface already initialised");
        }
        self.displays.push(Display {
            window,
            target,
            surface: lifecycle,
            config,
        });
        Ok(())
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let windows = self.create_windows(event_loop);
        let mut windows = windows.into_iter();
        let first = windows.next().ok_or(AppError::NoDisplays)?;

        let (gpu, first_surface) = pollster::block_on(GpuContext::new(first.clone()))?;
        // The adapter was picked for this window, so it must work.
        self.attach_display(&gpu, first, first_surface)?;

        for window in windows {
            let attached = gpu
                .create_surface(window.clone())
                .and_then(|surface| self.attach_display(&gpu, window, surface));
            if let Err(e) = attached {
                tracing::warn!(error = %e, "skipping window without a usable surface");
            }
        }

        #[cfg(feature = "egui")]
        if let Mode::Settings { owner } = self.mode {
            // The editor is always a top-level window; the owner is only recorded.
            tracing::info!(?owner, "opening settings editor");
            if let Some(display) = self.displays.first() {
                self.editor = Some(EditorState {
                    egui: EguiIntegration::new(&gpu.device, display.target.format(), &display.window),
                    editor: SettingsEditor::new(self.settings.clone()),
                });
            }
        }

        self.gpu = Some(gpu);
        self.time.reset();
        self.exit_filter = ExitFilter::new(Instant::now());
        tracing::info!(mode = ?self.mode, displays = self.displays.len(), "starfield running");
        Ok(())
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let (total_time, dt) = self.time.update();

        #[cfg(feature = "egui")]
        let mut editor_output = None;
        #[cfg(feature = "egui")]
        if let Some(state) = self.editor.as_mut() {
            if let Some(display) = self.displays.first_mut() {
                let mut response = EditorResponse::default();
                let output = state.egui.run(&display.window, |ctx| {
                    response = state.editor.show(ctx);
                });
                if response.changed {
                    display.reconfigure(state.editor.draft());
                }
                match response.action {
                    Some(EditorAction::Save(settings)) => {
                        if let Some(path) = &self.settings_path {
                            if let Err(e) = settings.save(path) {
                                tracing::error!(error = %e, "could not save settings");
                            }
                        }
                        self.settings = settings;
                        event_loop.exit();
                        return;
                    }
                    Some(EditorAction::Cancel) => {
                        tracing::info!("settings editor cancelled");
                        event_loop.exit();
                        return;
                    }
                    None => {}
                }
                editor_output = Some(output);
            }
        }

        let Some(gpu) = self.gpu.as_ref() else {
            return;
        };

        for (index, display) in self.displays.iter_mut().enumerate() {
            let Some(field) = display.surface.field_mut() else {
                continue;
            };
            field.advance(dt, &display.config);
            projection::project_field(field, &display.config, total_time, &mut self.sprites);

            let mut frame = match display.target.begin_frame(gpu) {
                Ok(frame) => frame,
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    // Drawing resources are rebuilt; the field is kept as is.
                    tracing::warn!(index, "surface lost, reconfiguring");
                    display.target.reconfigure(gpu);
                    continue;
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    tracing::error!("GPU out of memory");
                    event_loop.exit();
                    return;
                }
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping frame");
                    continue;
                }
            };

            display.target.draw_stars(gpu, &mut frame, &self.sprites);

            #[cfg(feature = "egui")]
            if index == 0 {
                if let (Some(state), Some(output)) = (self.editor.as_mut(), editor_output.as_ref()) {
                    let (width, height) = display.target.size();
                    state.egui.paint(gpu, &mut frame, output, [width, height]);
                }
            }

            display.window.pre_present_notify();
            frame.present(gpu);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        let Some(index) = self.displays.iter().position(|d| d.window.id() == id) else {
            return;
        };

        #[cfg(feature = "egui")]
        if let Some(state) = self.editor.as_mut() {
            if index == 0 && state.egui.on_window_event(&self.displays[0].window, &event) {
                return;
            }
        }

        match &event {
            WindowEvent::CloseRequested => {
                tracing::info!("window closed");
                event_loop.exit();
                return;
            }
            WindowEvent::Destroyed => {
                let mut display = self.displays.remove(index);
                display.surface.destroy();
                tracing::info!(remaining = self.displays.len(), "window destroyed");
                if self.displays.is_empty() {
                    event_loop.exit();
                }
                return;
            }
            WindowEvent::Resized(size) => {
                let settings = self.active_settings().clone();
                if let Some(gpu) = self.gpu.as_ref() {
                    self.displays[index].resize(gpu, &settings, *size);
                }
            }
            _ => {}
        }

        if self.mode != Mode::Fullscreen {
            return;
        }
        match self.exit_filter.handle_event(&event, Instant::now()) {
            Some(InputVerdict::Exit) => {
                tracing::info!("input considered deliberate, exiting");
                event_loop.exit();
            }
            Some(InputVerdict::Ignored(reason)) => {
                tracing::debug!(?reason, "ignored input");
            }
            None => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.displays.is_empty() {
            return;
        }
        if self.limiter.ready(Instant::now()) {
            self.frame(event_loop);
        }
        let deadline = self.limiter.next_deadline(Instant::now());
        event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        for display in &mut self.displays {
            display.surface.destroy();
        }
        self.displays.clear();
        tracing::info!(frames = self.time.frame(), fps = self.time.fps(), "starfield stopped");
    }
}

fn fullscreen_attributes(monitor: Option<winit::monitor::MonitorHandle>) -> WindowAttributes {
    Window::default_attributes()
        .with_title("Starfield")
        .with_decorations(false)
        .with_window_level(WindowLevel::AlwaysOnTop)
        .with_fullscreen(Some(Fullscreen::Borderless(monitor)))
}

/// Preview size for a parent client area of the given extent, falling back
/// to [`PREVIEW_SIZE`] when the area is unknown or empty.
fn preview_size(client: Option<(i32, i32)>) -> PhysicalSize<u32> {
    match client {
        Some((width, height)) if width > 0 && height > 0 => {
            PhysicalSize::new(width as u32, height as u32)
        }
        _ => PREVIEW_SIZE,
    }
}

#[cfg(windows)]
fn parent_client_size(parent: isize) -> Option<(i32, i32)> {
    use windows_sys::Win32::Foundation::RECT;
    use windows_sys::Win32::UI::WindowsAndMessaging::GetClientRect;

    let mut rect = RECT {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };
    // SAFETY: `rect` is a valid out pointer; a stale handle only makes the call fail.
    let ok = unsafe { GetClientRect(parent, &mut rect) };
    (ok != 0).then(|| (rect.right - rect.left, rect.bottom - rect.top))
}

#[cfg(windows)]
fn preview_attributes(parent: u64) -> WindowAttributes {
    use std::num::NonZeroIsize;
    use winit::raw_window_handle::{RawWindowHandle, Win32WindowHandle};

    let size = preview_size(parent_client_size(parent as isize));
    tracing::debug!(parent, width = size.width, height = size.height, "sizing preview to parent");
    let attrs = Window::default_attributes()
        .with_decorations(false)
        .with_inner_size(size);
    match NonZeroIsize::new(parent as isize) {
        Some(hwnd) => {
            let handle = RawWindowHandle::Win32(Win32WindowHandle::new(hwnd));
            // SAFETY: the handle comes from the screensaver host, which keeps
            // the parent window alive for as long as the preview runs.
            unsafe { attrs.with_parent_window(Some(handle)) }
        }
        None => attrs,
    }
}

#[cfg(not(windows))]
fn preview_attributes(parent: u64) -> WindowAttributes {
    tracing::debug!(parent, "window embedding unsupported on this platform, opening a standalone preview");
    Window::default_attributes()
        .with_title("Starfield Preview")
        .with_inner_size(preview_size(None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_fills_parent_client_area() {
        assert_eq!(preview_size(Some((200, 150))), PhysicalSize::new(200, 150));
    }

    #[test]
    fn test_preview_falls_back_for_empty_parent() {
        assert_eq!(preview_size(None), PREVIEW_SIZE);
        assert_eq!(preview_size(Some((0, 112))), PREVIEW_SIZE);
        assert_eq!(preview_size(Some((152, -4))), PREVIEW_SIZE);
    }
}
