//! Ribbonflow library - pointer-reactive particle ribbons
//!
//! A frame-driven simulation that deforms grids of particles with layered
//! wave fields, perturbs them with click-spawned ripples and recolors them
//! through frost and flicker overlays. The host calls
//! [`surface::SurfaceSystem::update`] once per displayed frame and uploads
//! the resulting buffers.

pub mod clock;
pub mod compositor;
pub mod error;
pub mod hash;
pub mod overlay;
pub mod params;
pub mod pointer;
pub mod ripple;
pub mod snapshot;
pub mod surface;
pub mod waves;

pub use clock::{FrameClock, FrameTime};
pub use error::{ConfigError, SnapshotError};
pub use params::EngineConfig;
pub use pointer::PointerState;
pub use surface::{FrameUniforms, SurfaceSystem};
