//! Continuous pointer effects: repulsion and proximity recolor.

use glam::Vec3;

use crate::compositor::rgb_hex;

/// Pointer repulsion (pushes deformed particles away from the pointer)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepulsionParams {
    pub enabled: bool,

    /// Peak push at zero distance (world units × 10)
    pub strength: f32,

    /// Influence radius (world units)
    pub range: f32,

    /// Extra margin around the surface bounds inside which the pointer
    /// counts as hovering the particles (world units)
    pub boundary_margin: f32,
}

impl Default for RepulsionParams {
    fn default() -> Self {
        Self {
            enabled: false,
            strength: 20.0,
            range: 100.0,
            boundary_margin: 50.0,
        }
    }
}

/// Proximity recolor ("infection") toward a target color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfectionParams {
    pub enabled: bool,

    /// Target color (linear RGB, 0-1)
    pub color: Vec3,

    /// Blend factor at zero distance (0-1)
    pub intensity: f32,

    /// Influence radius measured from the undeformed position (world units)
    pub range: f32,
}

impl Default for InfectionParams {
    fn default() -> Self {
        Self {
            enabled: false,
            color: rgb_hex(0xff00ff),
            intensity: 0.8,
            range: 100.0,
        }
    }
}
