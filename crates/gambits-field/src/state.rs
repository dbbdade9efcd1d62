//! Background lifecycle: mounting, event routing, frame pacing, teardown.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use gambits_core::{BackgroundConfig, BackgroundStyle, FieldConfig, GridConfig, Viewport};
use glam::Vec2;
use rand::rngs::StdRng;

use crate::field::ParticleField;
use crate::grid::GridField;
use crate::schedule::FrameScheduler;
use crate::surface::Surface;

/// Input the host forwards to the background. Positions are virtual pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldEvent {
    Resize { width: f32, height: f32 },
    PointerMove(Vec2),
    PointerDown(Vec2),
    PointerLeave,
}

/// The kinds of event a mounted background listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Resize,
    PointerMove,
    PointerDown,
    PointerLeave,
}

impl FieldEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            FieldEvent::Resize { .. } => EventKind::Resize,
            FieldEvent::PointerMove(_) => EventKind::PointerMove,
            FieldEvent::PointerDown(_) => EventKind::PointerDown,
            FieldEvent::PointerLeave => EventKind::PointerLeave,
        }
    }
}

/// The animation being driven.
#[derive(Debug)]
enum Scene {
    Particles(ParticleField),
    Grid(GridField),
}

impl Scene {
    fn resize(&mut self, viewport: Viewport) {
        match self {
            Scene::Particles(field) => field.resize(viewport),
            Scene::Grid(grid) => grid.resize(viewport),
        }
    }

    fn pointer_moved(&mut self, position: Vec2) {
        match self {
            Scene::Particles(field) => field.pointer_moved(position),
            Scene::Grid(grid) => grid.pointer_moved(position),
        }
    }

    fn pointer_left(&mut self) {
        match self {
            Scene::Particles(field) => field.pointer_left(),
            Scene::Grid(grid) => grid.pointer_left(),
        }
    }

    fn step<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        match self {
            Scene::Particles(field) => field.step(surface),
            Scene::Grid(grid) => grid.step(surface),
        }
    }

    fn viewport(&self) -> Viewport {
        match self {
            Scene::Particles(field) => field.viewport(),
            Scene::Grid(grid) => grid.viewport(),
        }
    }
}

/// A mounted background instance.
///
/// The host owns it: [`BackgroundState::mount`] registers listeners and arms
/// the first frame, [`BackgroundState::unmount`] (or drop) releases both.
/// Without a drawable area the instance stays idle and never draws.
#[derive(Debug)]
pub struct BackgroundState {
    style: BackgroundStyle,
    scene: Option<Scene>,
    listeners: HashSet<EventKind>,
    scheduler: FrameScheduler,
}

impl BackgroundState {
    /// Mount a background over `viewport`.
    ///
    /// `viewport` is `None` when there is nothing to draw on; the result is
    /// then an idle instance, which is not an error.
    pub fn mount(
        background: &BackgroundConfig,
        field: FieldConfig,
        grid: GridConfig,
        viewport: Option<Viewport>,
        rng: StdRng,
        now: Instant,
    ) -> Self {
        let mut state = Self {
            style: background.style,
            scene: None,
            listeners: HashSet::new(),
            scheduler: FrameScheduler::new(background.target_fps),
        };

        let Some(viewport) = viewport else {
            tracing::debug!("No drawable area, {} background stays idle", state.style.name());
            return state;
        };

        let scene = match background.style {
            BackgroundStyle::Particles => {
                let ripples = field.ripples_enabled;
                let field = ParticleField::new(field, viewport, rng);
                tracing::info!(
                    "Mounted particle field: {} particles over {}x{}",
                    field.particles().len(),
                    viewport.width,
                    viewport.height
                );
                if ripples {
                    state.listeners.insert(EventKind::PointerDown);
                }
                Scene::Particles(field)
            }
            BackgroundStyle::GridWarp => {
                let grid = GridField::new(grid, field.palette, viewport);
                let (cols, rows) = grid.dimensions();
                tracing::info!("Mounted grid warp: {cols}x{rows} lattice");
                Scene::Grid(grid)
            }
            BackgroundStyle::None => return state,
        };

        state.listeners.extend([
            EventKind::Resize,
            EventKind::PointerMove,
            EventKind::PointerLeave,
        ]);
        state.scene = Some(scene);
        state.scheduler.request_immediate(now);
        state
    }

    /// Route an event to the scene.
    ///
    /// Returns whether any state changed. Events with no registered listener,
    /// including everything after [`unmount`](Self::unmount), are ignored.
    pub fn handle_event(&mut self, event: FieldEvent) -> bool {
        if !self.listeners.contains(&event.kind()) {
            return false;
        }
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };

        match event {
            FieldEvent::Resize { width, height } => {
                // A collapsed terminal keeps the last field until it grows back.
                let Some(viewport) = Viewport::new(width, height) else {
                    return false;
                };
                if viewport == scene.viewport() {
                    return false;
                }
                scene.resize(viewport);
                tracing::debug!("Background resized to {}x{}", width, height);
            }
            FieldEvent::PointerMove(position) => scene.pointer_moved(position),
            FieldEvent::PointerLeave => scene.pointer_left(),
            FieldEvent::PointerDown(position) => {
                let Scene::Particles(field) = scene else {
                    return false;
                };
                if !field.pointer_pressed(position) {
                    return false;
                }
                tracing::debug!("Ripple at ({:.0}, {:.0})", position.x, position.y);
            }
        }
        true
    }

    /// Run the pending frame if it is due, drawing onto `surface`, and arm
    /// the next one. Returns whether a frame ran.
    pub fn frame<S: Surface + ?Sized>(&mut self, now: Instant, surface: &mut S) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        if !self.scheduler.take_due(now) {
            return false;
        }
        scene.step(surface);
        self.scheduler.request(now);
        true
    }

    /// How long the host may wait before the next frame is due.
    pub fn timeout(&self, now: Instant) -> Option<Duration> {
        self.scheduler.timeout(now)
    }

    /// Cancel the pending frame, drop every listener and release the scene.
    pub fn unmount(&mut self) {
        if self.scene.is_none() && self.listeners.is_empty() && !self.scheduler.is_pending() {
            return;
        }
        self.scheduler.cancel();
        self.listeners.clear();
        self.scene = None;
        tracing::info!("Unmounted {} background", self.style.name());
    }

    /// Turn click ripples on or off for a particle field.
    pub fn set_ripples_enabled(&mut self, enabled: bool) {
        let Some(Scene::Particles(field)) = self.scene.as_mut() else {
            return;
        };
        field.set_ripples_enabled(enabled);
        if enabled {
            self.listeners.insert(EventKind::PointerDown);
        } else {
            self.listeners.remove(&EventKind::PointerDown);
        }
    }

    pub fn style(&self) -> BackgroundStyle {
        self.style
    }

    /// Whether a scene is mounted and animating.
    pub fn is_active(&self) -> bool {
        self.scene.is_some()
    }

    pub fn is_listening(&self, kind: EventKind) -> bool {
        self.listeners.contains(&kind)
    }

    pub fn has_pending_frame(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.scene.as_ref().map(Scene::viewport)
    }

    /// The particle field, when that is the mounted style.
    pub fn particle_field(&self) -> Option<&ParticleField> {
        match &self.scene {
            Some(Scene::Particles(field)) => Some(field),
            _ => None,
        }
    }

    /// The grid, when that is the mounted style.
    pub fn grid(&self) -> Option<&GridField> {
        match &self.scene {
            Some(Scene::Grid(grid)) => Some(grid),
            _ => None,
        }
    }
}

impl Drop for BackgroundState {
    fn drop(&mut self) {
        self.unmount();
    }
}
