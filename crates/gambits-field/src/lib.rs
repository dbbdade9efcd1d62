//! Interactive background for the gambits landing screen.
//!
//! The main piece is a particle field: points drift across the terminal,
//! nearby pairs are joined by fading lines, the pointer pushes particles
//! away and clicks send out ripples that shove them outward. A grid-warp
//! style is also available. Both run in virtual pixel space and draw through
//! a [`Surface`], which [`ShapeBuffer`] turns into braille on a ratatui
//! buffer.

mod color;
mod field;
mod grid;
mod particle;
mod pointer;
mod ripple;
mod schedule;
mod state;
mod surface;

pub use color::{blend, to_color};
pub use field::{ParticleField, connection_alpha};
pub use grid::{GridField, GridPoint};
pub use particle::Particle;
pub use pointer::{POINTER_SENTINEL, Pointer, repulsion};
pub use ripple::Ripple;
pub use schedule::FrameScheduler;
pub use state::{BackgroundState, EventKind, FieldEvent};
pub use surface::{Shape, ShapeBuffer, Surface};
