//! Particle surfaces: per-surface grid data and the system that drives them.

mod grid;
mod system;

pub use grid::{FrameContext, ParticleGrid};
pub use system::{ClickOutcome, FrameUniforms, SurfaceSystem};
