//! Surface topology, wave field and base appearance parameters.

use glam::Vec3;

use crate::compositor::rgb_hex;

/// Grid topology. Any change here means the particle grids must be rebuilt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridTopology {
    /// Number of sibling surfaces (ribbons), each with its own grid
    pub surface_count: usize,

    /// Base column count before density scaling
    pub grid_width: u32,

    /// Base row count before density scaling
    pub grid_height: u32,

    /// Density multiplier applied to both base counts (dimensionless, > 0)
    pub density: f32,

    /// Logical surface width in world units (x extent)
    pub surface_width: f32,

    /// Logical surface height in world units (y extent)
    pub surface_height: f32,
}

impl Default for GridTopology {
    fn default() -> Self {
        Self {
            surface_count: 1,
            grid_width: 200,
            grid_height: 60,
            density: 1.4,
            surface_width: 200.0,
            surface_height: 29.0,
        }
    }
}

impl GridTopology {
    /// Smallest grid side that still normalizes UVs without dividing by zero.
    pub const MIN_SIDE: usize = 2;

    /// Derive `(columns, rows)` from base counts and density.
    ///
    /// Degenerate inputs (zero, negative or NaN density) clamp to a 2×2 grid.
    pub fn dimensions(&self) -> (usize, usize) {
        let side = |base: u32| -> usize {
            let scaled = (base as f32 * self.density).floor();
            if scaled.is_finite() && scaled >= Self::MIN_SIDE as f32 {
                scaled as usize
            } else {
                Self::MIN_SIDE
            }
        };
        (side(self.grid_width), side(self.grid_height))
    }

    /// Particles per surface
    pub fn particles_per_surface(&self) -> usize {
        let (columns, rows) = self.dimensions();
        columns * rows
    }
}

/// Procedural wave field parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    /// Amplitude of the primary and radial waves (world units)
    pub amplitude: f32,

    /// Phase advance per unit of simulated time (radians)
    pub speed: f32,

    /// Spiral frequency along u (half-turns across the grid)
    pub spiral_freq: f32,

    /// Spiral amplitude (world units)
    pub spiral_amp: f32,

    /// Twist strength (world units)
    pub twist_strength: f32,

    /// Double-helix braid strength (world units)
    pub helix_strength: f32,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            amplitude: 1.5,
            speed: 0.09,
            spiral_freq: 11.5,
            spiral_amp: 1.2,
            twist_strength: 1.8,
            helix_strength: 0.7,
        }
    }
}

/// Flowing base color gradient
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorFlow {
    /// Gradient start color (linear RGB, 0-1)
    pub start: Vec3,

    /// Gradient end color (linear RGB, 0-1)
    pub end: Vec3,

    /// Gradient scroll speed (grid widths per unit of simulated time)
    pub flow_speed: f32,
}

impl Default for ColorFlow {
    fn default() -> Self {
        Self {
            start: rgb_hex(0x28f321),
            end: rgb_hex(0x2196f3),
            flow_speed: 0.05,
        }
    }
}

/// Particle size and breathing pulse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleParams {
    /// Base point size (shader units)
    pub size: f32,

    /// Pulse depth applied to size and alpha (dimensionless, 0-1)
    pub pulse: f32,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            size: 0.8,
            pulse: 0.25,
        }
    }
}
