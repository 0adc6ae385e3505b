//! Deciding when user input should end the screensaver.
//!
//! A screensaver must not quit on the stray events that arrive while it is
//! starting (the click or key that launched it, a synthetic cursor move as
//! windows appear) or on mouse jitter. [`ExitFilter`] applies three rules:
//!
//! 1. nothing counts during a debounce window after start (2.5 s);
//! 2. nothing counts while none of our windows has focus;
//! 3. cursor motion counts only once it leaves a small box (12 px) around the
//!    first position seen after the debounce window.
//!
//! Key and mouse-button presses end the screensaver as soon as rules 1 and 2
//! pass.

use glam::Vec2;
use std::time::{Duration, Instant};
use winit::event::{ElementState, WindowEvent};

/// Why an input event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Still inside the start-up debounce window.
    Debounce,
    /// None of our windows is focused.
    NotFocused,
    /// First cursor position after debounce; recorded as the anchor.
    AnchorSet,
    /// Cursor moved less than the jitter threshold.
    Jitter,
}

/// Outcome of feeding an input event to the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputVerdict {
    Ignored(IgnoreReason),
    /// Deliberate input: stop the screensaver.
    Exit,
}

/// Turns raw input into a stop decision.
#[derive(Debug, Clone)]
pub struct ExitFilter {
    started: Instant,
    debounce: Duration,
    jitter_threshold: f32,
    anchor: Option<Vec2>,
    focused: bool,
}

impl ExitFilter {
    pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(2500);
    pub const DEFAULT_JITTER_THRESHOLD: f32 = 12.0;

    /// Create a filter whose debounce window starts at `started`.
    pub fn new(started: Instant) -> Self {
        Self {
            started,
            debounce: Self::DEFAULT_DEBOUNCE,
            jitter_threshold: Self::DEFAULT_JITTER_THRESHOLD,
            anchor: None,
            focused: true,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_jitter_threshold(mut self, pixels: f32) -> Self {
        self.jitter_threshold = pixels;
        self
    }

    /// Record whether one of our windows currently has focus.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Forget the cursor anchor, e.g. after a window was resized.
    pub fn reset_anchor(&mut self) {
        self.anchor = None;
    }

    /// A key or mouse button was pressed.
    pub fn on_press(&mut self, now: Instant) -> InputVerdict {
        match self.gate(now) {
            Some(reason) => InputVerdict::Ignored(reason),
            None => InputVerdict::Exit,
        }
    }

    /// The cursor moved to `position` (physical pixels, screen or window space,
    /// as long as it is consistent).
    pub fn on_cursor_moved(&mut self, position: Vec2, now: Instant) -> InputVerdict {
        if let Some(reason) = self.gate(now) {
            return InputVerdict::Ignored(reason);
        }
        let Some(anchor) = self.anchor else {
            self.anchor = Some(position);
            return InputVerdict::Ignored(IgnoreReason::AnchorSet);
        };
        let moved = (position - anchor).abs();
        if moved.x < self.jitter_threshold && moved.y < self.jitter_threshold {
            return InputVerdict::Ignored(IgnoreReason::Jitter);
        }
        InputVerdict::Exit
    }

    /// Feed a winit window event. Returns `None` for events that are not input.
    pub fn handle_event(&mut self, event: &WindowEvent, now: Instant) -> Option<InputVerdict> {
        match event {
            WindowEvent::Focused(focused) => {
                self.set_focused(*focused);
                None
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                Some(self.on_press(now))
            }
            WindowEvent::MouseInput { state: ElementState::Pressed, .. } => Some(self.on_press(now)),
            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                Some(self.on_cursor_moved(position, now))
            }
            WindowEvent::Resized(_) => {
                self.reset_anchor();
                None
            }
            _ => None,
        }
    }

    fn gate(&self, now: Instant) -> Option<IgnoreReason> {
        if now.saturating_duration_since(self.started) < self.debounce {
            Some(IgnoreReason::Debounce)
        } else if !self.focused {
            Some(IgnoreReason::NotFocused)
        } else {
            None
        }
    }
}
