//! Surface lifecycle.
//!
//! Each drawable surface moves through
//! `Uninitialized → Ready → (Resizing → Ready)* → Destroyed`. The
//! [`SurfaceLifecycle`] owns the surface's [`ParticleField`] and makes sure
//! the field only exists while the surface is usable. A geometry or settings
//! change always re-initialises the field from scratch.

use crate::config::FieldConfig;
use crate::error::LifecycleError;
use crate::field::ParticleField;

/// Lifecycle state of one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceState {
    #[default]
    Uninitialized,
    Ready,
    Resizing,
    Destroyed,
}

/// State machine owning the particle field of one surface.
#[derive(Debug, Default)]
pub struct SurfaceLifecycle {
    state: SurfaceState,
    field: Option<ParticleField>,
}

impl SurfaceLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// The field, present only in the `Ready` state.
    pub fn field(&self) -> Option<&ParticleField> {
        match self.state {
            SurfaceState::Ready => self.field.as_ref(),
            _ => None,
        }
    }

    /// Mutable access to the field, present only in the `Ready` state.
    pub fn field_mut(&mut self) -> Option<&mut ParticleField> {
        match self.state {
            SurfaceState::Ready => self.field.as_mut(),
            _ => None,
        }
    }

    /// The surface has been acquired: `Uninitialized → Ready`.
    pub fn acquire(&mut self, config: &FieldConfig) -> Result<(), LifecycleError> {
        self.transition(SurfaceState::Uninitialized, SurfaceState::Ready)?;
        self.field = Some(ParticleField::new(config));
        Ok(())
    }

    /// The surface geometry is changing: `Ready → Resizing`.
    pub fn begin_resize(&mut self) -> Result<(), LifecycleError> {
        self.transition(SurfaceState::Ready, SurfaceState::Resizing)
    }

    /// The new geometry is known: `Resizing → Ready`, fully re-initialising
    /// the field against it.
    pub fn finish_resize(&mut self, config: &FieldConfig) -> Result<(), LifecycleError> {
        self.transition(SurfaceState::Resizing, SurfaceState::Ready)?;
        self.reinitialize(config);
        Ok(())
    }

    /// Resize in one step.
    pub fn resize(&mut self, config: &FieldConfig) -> Result<(), LifecycleError> {
        self.begin_resize()?;
        self.finish_resize(config)
    }

    /// Settings changed; respawn everything. Only valid while `Ready`.
    pub fn reconfigure(&mut self, config: &FieldConfig) -> Result<(), LifecycleError> {
        if self.state != SurfaceState::Ready {
            return Err(LifecycleError::InvalidTransition {
                from: self.state,
                to: SurfaceState::Ready,
            });
        }
        self.reinitialize(config);
        Ok(())
    }

    /// The surface is gone. Valid from any state; the field is dropped.
    pub fn destroy(&mut self) {
        self.state = SurfaceState::Destroyed;
        self.field = None;
    }

    fn reinitialize(&mut self, config: &FieldConfig) {
        match &mut self.field {
            Some(field) => field.reset(config),
            None => self.field = Some(ParticleField::new(config)),
        }
    }

    fn transition(&mut self, expected: SurfaceState, to: SurfaceState) -> Result<(), LifecycleError> {
        if self.state != expected {
            return Err(LifecycleError::InvalidTransition { from: self.state, to });
        }
        self.state = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_lifecycle() {
        let mut surface = SurfaceLifecycle::new();
        assert_eq!(surface.state(), SurfaceState::Uninitialized);
        assert!(surface.field().is_none());

        let config = FieldConfig::new(800, 600).with_star_count(40);
        surface.acquire(&config).unwrap();
        assert_eq!(surface.state(), SurfaceState::Ready);
        assert_eq!(surface.field().unwrap().len(), 40);

        surface.begin_resize().unwrap();
        assert_eq!(surface.state(), SurfaceState::Resizing);
        assert!(surface.field().is_none());

        let resized = config.clone().with_surface(1024, 768);
        surface.finish_resize(&resized).unwrap();
        assert_eq!(surface.field().unwrap().config().width, 1024);

        surface.destroy();
        assert_eq!(surface.state(), SurfaceState::Destroyed);
        assert!(surface.field().is_none());
    }

    #[test]
    fn test_resize_respawns_into_new_extent() {
        let mut surface = SurfaceLifecycle::new();
        surface.acquire(&FieldConfig::new(1920, 1080)).unwrap();

        let small = FieldConfig::new(160, 120);
        surface.resize(&small).unwrap();

        let field = surface.field().unwrap();
        assert!(field.stars().iter().all(|s| s.position.x < 160.0 && s.position.y < 120.0));
    }

    #[test]
    fn test_invalid_transitions_are_rejected() {
        let mut surface = SurfaceLifecycle::new();
        let config = FieldConfig::new(10, 10);

        assert!(surface.begin_resize().is_err());
        assert!(surface.reconfigure(&config).is_err());

        surface.acquire(&config).unwrap();
        assert_eq!(
            surface.acquire(&config),
            Err(LifecycleError::InvalidTransition {
                from: SurfaceState::Ready,
                to: SurfaceState::Ready,
            })
        );
        assert!(surface.finish_resize(&config).is_err());

        surface.destroy();
        assert!(surface.acquire(&config).is_err());
        assert!(surface.resize(&config).is_err());
    }

    #[test]
    fn test_reconfigure_changes_star_count() {
        let mut surface = SurfaceLifecycle::new();
        let config = FieldConfig::new(300, 200).with_star_count(10);
        surface.acquire(&config).unwrap();

        surface.reconfigure(&config.clone().with_star_count(25)).unwrap();

        assert_eq!(surface.state(), SurfaceState::Ready);
        assert_eq!(surface.field_mut().unwrap().len(), 25);
    }
}
