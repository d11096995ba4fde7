//! High-level surface system: owns grids, ripples and overlays and runs the frame.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::grid::{FrameContext, ParticleGrid};
use crate::clock::FrameTime;
use crate::overlay::SurfaceOverlays;
use crate::params::{EngineConfig, GridTopology};
use crate::pointer::PointerState;
use crate::ripple::RippleSystem;

/// Scalars handed to the rendering boundary alongside the particle buffers
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub time: f32,
    /// 1.0 when reflections are on, 0.0 otherwise
    pub reflection_enabled: f32,
    pub reflection_intensity: f32,
    pub frost_opacity: f32,
    pub frost_frosted_amount: f32,
    pub frost_highlight: f32,
    pub frost_tint: [f32; 3],
    pub _padding: [f32; 3],
}

/// What a click triggered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickOutcome {
    pub ripples_spawned: usize,
    pub frosted: usize,
    pub flickering: usize,
}

/// Surfaces plus every piece of transient event state
pub struct SurfaceSystem {
    config: EngineConfig,
    /// Topology the current grids were built from
    built_topology: GridTopology,
    grids: Vec<ParticleGrid>,
    /// One entry per grid, same order
    overlays: Vec<SurfaceOverlays>,
    ripples: RippleSystem,
    rng: StdRng,
    /// Seed `rng` and the overlay stores were last seeded from
    rng_seed: u64,
    time: f32,
}

impl SurfaceSystem {
    /// Create a system and build its grids from `config`
    pub fn new(config: EngineConfig) -> Self {
        let mut system = Self {
            built_topology: config.topology,
            rng: StdRng::seed_from_u64(config.seed),
            rng_seed: config.seed,
            config,
            grids: Vec::new(),
            overlays: Vec::new(),
            ripples: RippleSystem::new(),
            time: 0.0,
        };
        system.rebuild();
        system
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Mutable access; topology and seed changes take effect at the next
    /// [`rebuild_if_topology_changed`](Self::rebuild_if_topology_changed) or
    /// [`update`](Self::update).
    pub fn config_mut(&mut self) -> &mut EngineConfig {
        &mut self.config
    }

    /// Replace the whole configuration. A new seed reseeds the engine RNG
    /// and every overlay store.
    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
        self.reseed_if_changed();
    }

    /// Reseed every engine-owned RNG when the configured seed differs from
    /// the one in use.
    fn reseed_if_changed(&mut self) {
        let seed = self.config.seed;
        if seed == self.rng_seed {
            return;
        }
        self.rng = StdRng::seed_from_u64(seed);
        for (index, overlays) in self.overlays.iter_mut().enumerate() {
            overlays.reseed(surface_seed(seed, index));
        }
        self.rng_seed = seed;
        tracing::debug!(seed, "engine reseeded");
    }

    /// Discard every grid and build fresh ones from the current topology.
    ///
    /// Overlay stores are kept per surface index: extra ones are dropped,
    /// missing ones created, and indices past the new particle count are
    /// removed.
    pub fn rebuild(&mut self) {
        self.reseed_if_changed();
        let topology = self.config.topology;
        let total = topology.surface_count;

        self.grids = (0..total)
            .map(|index| {
                ParticleGrid::new(
                    index,
                    total,
                    &topology,
                    &self.config.color,
                    &self.config.particles,
                )
            })
            .collect();

        let seed = self.config.seed;
        let mut next = self.overlays.len();
        self.overlays.resize_with(total, || {
            let overlays = SurfaceOverlays::new(surface_seed(seed, next));
            next += 1;
            overlays
        });
        for (overlays, grid) in self.overlays.iter_mut().zip(&self.grids) {
            overlays.truncate(grid.len());
        }

        self.built_topology = topology;

        let (columns, rows) = topology.dimensions();
        tracing::debug!(
            surfaces = total,
            columns,
            rows,
            particles = total * columns * rows,
            "rebuilt surfaces"
        );
    }

    /// Rebuild when the topology differs from the one the grids were built
    /// with. Returns whether a rebuild happened.
    pub fn rebuild_if_topology_changed(&mut self) -> bool {
        if self.config.topology == self.built_topology {
            return false;
        }
        self.rebuild();
        true
    }

    /// Run one frame.
    ///
    /// Ripples and overlays are advanced first, so every particle in the
    /// frame sees the same event state; then each grid recomputes its
    /// buffers.
    pub fn update(&mut self, frame: FrameTime, pointer: &PointerState) {
        let span = tracing::debug_span!("update", time = frame.time);
        let _enter = span.enter();

        self.reseed_if_changed();
        self.rebuild_if_topology_changed();

        self.ripples.tick(self.config.ripple.decay);
        for overlays in &mut self.overlays {
            overlays.tick(frame.now_ms, &self.config.frost, &self.config.flicker);
        }

        let hovering = pointer.hovers(&self.config.topology, &self.config.repulsion);
        let ctx = FrameContext {
            frame,
            config: &self.config,
            pointer,
            hovering,
            ripples: &self.ripples,
        };
        for (grid, overlays) in self.grids.iter_mut().zip(&self.overlays) {
            grid.update(&ctx, overlays, &mut self.rng);
        }

        self.time = frame.time;
    }

    /// Spawn a ripple pair at `point` if ripples are enabled.
    pub fn spawn_ripple_at(&mut self, point: Vec3, now_ms: f64) -> usize {
        self.ripples.spawn(point, &self.config.ripple, now_ms)
    }

    /// Frost every particle within the frost radius of `point`, on every surface.
    pub fn activate_frost_at(&mut self, point: Vec3) -> usize {
        let radius = self.config.frost.radius;
        let activated: usize = self
            .grids
            .iter()
            .zip(&mut self.overlays)
            .map(|(grid, overlays)| overlays.frost.activate_near(grid.positions(), point, radius))
            .sum();
        tracing::debug!(activated, radius, "frost activated");
        activated
    }

    /// Replace every surface's flicker region with the particles near `point`.
    pub fn activate_flicker_at(&mut self, point: Vec3) -> usize {
        let radius = self.config.flicker.radius;
        let activated: usize = self
            .grids
            .iter()
            .zip(&mut self.overlays)
            .map(|(grid, overlays)| {
                overlays
                    .flicker
                    .activate_near(grid.positions(), grid.uvs(), point, radius)
            })
            .sum();
        tracing::debug!(activated, radius, "flicker region set");
        activated
    }

    /// Pointer click: ripple, frost and flicker, each only if enabled.
    pub fn handle_click(&mut self, point: Vec3, now_ms: f64) -> ClickOutcome {
        let mut outcome = ClickOutcome {
            ripples_spawned: self.spawn_ripple_at(point, now_ms),
            ..Default::default()
        };
        if self.config.frost.enabled {
            outcome.frosted = self.activate_frost_at(point);
        }
        if self.config.flicker.enabled {
            outcome.flickering = self.activate_flicker_at(point);
        }
        outcome
    }

    /// Clear all ripple and overlay state. Grids and config are untouched.
    pub fn reset(&mut self) {
        self.ripples.clear();
        for overlays in &mut self.overlays {
            overlays.clear();
        }
        tracing::debug!("transient state reset");
    }

    /// Restore default settings (keeping the seed) and clear transient state.
    pub fn reset_to_default(&mut self) {
        self.config = EngineConfig {
            seed: self.config.seed,
            ..EngineConfig::default()
        };
        self.reset();
        self.rebuild_if_topology_changed();
    }

    pub fn grids(&self) -> &[ParticleGrid] {
        &self.grids
    }

    pub fn overlays(&self) -> &[SurfaceOverlays] {
        &self.overlays
    }

    pub fn ripples(&self) -> &RippleSystem {
        &self.ripples
    }

    /// Total particle count over all surfaces
    pub fn particle_count(&self) -> usize {
        self.grids.iter().map(ParticleGrid::len).sum()
    }

    pub fn uniforms(&self) -> FrameUniforms {
        let frost = &self.config.frost;
        let reflection = &self.config.reflection;
        FrameUniforms {
            time: self.time,
            reflection_enabled: if reflection.enabled { 1.0 } else { 0.0 },
            reflection_intensity: reflection.intensity,
            frost_opacity: frost.opacity,
            frost_frosted_amount: frost.frosted_amount,
            frost_highlight: frost.highlight_intensity,
            frost_tint: frost.tint.to_array(),
            _padding: [0.0; 3],
        }
    }
}

/// Distinct, stable seed for the overlays of surface `index`
fn surface_seed(seed: u64, index: usize) -> u64 {
    seed.wrapping_add((index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.topology.grid_width = 20;
        config.topology.grid_height = 6;
        config.topology.density = 1.0;
        config
    }

    #[test]
    fn test_new_builds_every_surface() {
        let mut config = small();
        config.topology.surface_count = 3;
        let system = SurfaceSystem::new(config);
        assert_eq!(system.grids().len(), 3);
        assert_eq!(system.overlays().len(), 3);
        assert_eq!(system.particle_count(), 3 * 20 * 6);
    }

    #[test]
    fn test_uniforms_follow_config() {
        let mut system = SurfaceSystem::new(small());
        system.update(FrameTime::new(0.25, 16.0), &PointerState::default());
        let uniforms = system.uniforms();
        assert_eq!(uniforms.time, 0.25);
        assert_eq!(uniforms.reflection_enabled, 1.0);
        assert_eq!(uniforms.reflection_intensity, 0.8);

        system.config_mut().reflection.enabled = false;
        assert_eq!(system.uniforms().reflection_enabled, 0.0);
        assert_eq!(bytemuck::bytes_of(&uniforms).len(), 12 * 4);
    }

    #[test]
    fn test_handle_click_respects_toggles() {
        let mut system = SurfaceSystem::new(small());
        let outcome = system.handle_click(Vec3::ZERO, 0.0);
        assert_eq!(outcome.ripples_spawned, 2);
        assert_eq!(outcome.frosted, 0);
        assert_eq!(outcome.flickering, 0);

        system.config_mut().ripple.enabled = false;
        system.config_mut().frost.enabled = true;
        system.config_mut().frost.radius = 1000.0;
        let outcome = system.handle_click(Vec3::ZERO, 0.0);
        assert_eq!(outcome.ripples_spawned, 0);
        assert_eq!(outcome.frosted, system.particle_count());
    }

    #[test]
    fn test_surface_seeds_differ() {
        assert_ne!(surface_seed(42, 0), surface_seed(42, 1));
        assert_eq!(surface_seed(42, 0), 42);
    }
}
