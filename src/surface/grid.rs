//! Particle grid for one surface: static UV/base tables plus per-frame output buffers.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::Rng;

use crate::clock::FrameTime;
use crate::compositor::{
    apply_ripple_tint, flow_color, infect, mix, pulse_alpha, pulse_size,
};
use crate::overlay::{boost_alpha, SurfaceOverlays};
use crate::params::{ColorFlow, EngineConfig, GridTopology, ParticleParams};
use crate::pointer::{repel, PointerState};
use crate::ripple::{flicker_particle, RippleSystem, INTENSITY_GATE};
use crate::waves;

/// Upper bound of the per-frame uniform size jitter
const SIZE_JITTER: f32 = 0.15;

/// Vertical spacing between sibling surfaces
const LANE_SPACING: f32 = 8.0;

/// Per-frame inputs shared by every grid
pub struct FrameContext<'a> {
    pub frame: FrameTime,
    pub config: &'a EngineConfig,
    pub pointer: &'a PointerState,
    /// Whether the pointer is inside the repulsion region (evaluated once per frame)
    pub hovering: bool,
    pub ripples: &'a RippleSystem,
}

/// One surface of particles laid out on a `columns × rows` grid
#[derive(Debug, Clone)]
pub struct ParticleGrid {
    pub index: usize,
    pub columns: usize,
    pub rows: usize,
    /// Phase added to the shared wave phase for this surface
    pub phase_offset: f32,
    pub y_offset: f32,
    pub z_offset: f32,

    // Static, fixed at construction
    uvs: Vec<[f32; 2]>,
    bases: Vec<[f32; 3]>,

    // Rewritten every frame
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
    sizes: Vec<f32>,
    alphas: Vec<f32>,
    activation: Vec<f32>,
}

impl ParticleGrid {
    /// Build surface `index` of `total` siblings.
    ///
    /// Row-major particle order: index = row × columns + column. Buffers start
    /// at the flat base position, with the plain start→end gradient and an
    /// edge-faded alpha.
    pub fn new(
        index: usize,
        total: usize,
        topology: &GridTopology,
        color: &ColorFlow,
        particles: &ParticleParams,
    ) -> Self {
        let (columns, rows) = topology.dimensions();
        let count = columns * rows;

        let y_offset = (index as f32 - total as f32 / 2.0) * LANE_SPACING;
        let side = if index % 2 == 0 { 1.0 } else { -1.0 };
        let z_offset = side * (3.0 + index as f32 * 2.0);

        let mut uvs = Vec::with_capacity(count);
        let mut bases = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);
        let mut alphas = Vec::with_capacity(count);

        for iy in 0..rows {
            for ix in 0..columns {
                let u = ix as f32 / (columns - 1) as f32;
                let v = iy as f32 / (rows - 1) as f32;

                uvs.push([u, v]);
                bases.push([
                    (u - 0.5) * topology.surface_width,
                    (v - 0.5) * topology.surface_height + y_offset,
                    z_offset,
                ]);
                colors.push(mix(color.start, color.end, u).to_array());

                let edge_fade = (u * std::f32::consts::PI).sin() * (v * std::f32::consts::PI).sin();
                alphas.push(edge_fade * 0.8 + 0.2);
            }
        }

        Self {
            index,
            columns,
            rows,
            phase_offset: index as f32 * 1.2,
            y_offset,
            z_offset,
            positions: bases.clone(),
            uvs,
            bases,
            colors,
            sizes: vec![particles.size; count],
            alphas,
            activation: vec![0.0; count],
        }
    }

    /// Recompute every particle for one frame.
    ///
    /// Per particle, in order: wave deformation, pointer repulsion, ripple
    /// displacement, color (flow, infection, gated ripple tint), size and
    /// alpha pulse with gated ripple flicker, then the frost and flicker
    /// overlays. Each stage reads the position produced by the previous
    /// one.
    pub fn update(&mut self, ctx: &FrameContext<'_>, overlays: &SurfaceOverlays, rng: &mut StdRng) {
        let FrameContext {
            frame,
            config,
            pointer,
            hovering,
            ripples,
        } = *ctx;
        let time = frame.time;
        let frost_on = config.frost.enabled;
        let flicker_on = config.flicker.enabled;

        for index in 0..self.uvs.len() {
            let [u, v] = self.uvs[index];
            let base = Vec3::from_array(self.bases[index]);

            // Position
            let deformed = base + waves::deform(u, v, time, self.phase_offset, &config.waves);
            let repelled = repel(deformed, pointer.world, hovering, &config.repulsion);
            let (position, intensity) = ripples.displace(repelled, index, time, frame.now_ms);

            // Color
            let mut color = flow_color(u, time, &config.color);
            color = infect(color, base.distance(pointer.world), &config.infection);
            if intensity > INTENSITY_GATE {
                color = apply_ripple_tint(color, ripples.tint(position));
            }

            // Size and alpha
            let jitter = rng.gen::<f32>() * SIZE_JITTER;
            let (size, mut alpha) = flicker_particle(
                pulse_size(u, v, time, jitter, &config.particles),
                pulse_alpha(u, v, time, &config.particles),
                index,
                time,
                intensity,
            );

            // Overlays; flicker is applied last and wins on overlap
            let level = if frost_on { overlays.frost.level_of(index) } else { 0.0 };
            if level > 0.0 {
                alpha = boost_alpha(alpha, level, config.frost.opacity);
            }
            if flicker_on && overlays.flicker.is_active(index) {
                let flicker = overlays.flicker.color_for(
                    index,
                    color,
                    config.flicker.color_mode,
                    config.flicker.intensity,
                    frame.now_ms,
                );
                color = flicker.color * flicker.brightness;
                alpha = (alpha * flicker.alpha_scale).clamp(0.0, 1.0);
            }

            self.positions[index] = position.to_array();
            self.colors[index] = color.to_array();
            self.sizes[index] = size;
            self.alphas[index] = alpha;
            self.activation[index] = level;
        }
    }

    pub fn len(&self) -> usize {
        self.uvs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uvs.is_empty()
    }

    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    pub fn bases(&self) -> &[[f32; 3]] {
        &self.bases
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn alphas(&self) -> &[f32] {
        &self.alphas
    }

    /// Frost level per particle, for GPU-side frost shading
    pub fn activation(&self) -> &[f32] {
        &self.activation
    }

    /// Positions as a flat `[x, y, z, x, y, z, ...]` slice for upload
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Colors as a flat `[r, g, b, ...]` slice for upload
    pub fn colors_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::params::FlickerParams;

    fn assert_close(actual: f32, expected: f32) {
        assert!((actual - expected).abs() < 1e-5, "{actual} != {expected}");
    }

    fn assert_close_vec(actual: [f32; 3], expected: Vec3) {
        for axis in 0..3 {
            assert_close(actual[axis], expected[axis]);
        }
    }

    fn overlay_config(flicker: bool) -> EngineConfig {
        let mut config = EngineConfig {
            topology: small_topology(),
            ..Default::default()
        };
        config.frost.enabled = true;
        config.frost.opacity = 0.6;
        config.frost.radius = 1_000.0;
        config.flicker = FlickerParams {
            enabled: flicker,
            density: 1.0,
            radius: 1_000.0,
            ..Default::default()
        };
        config
    }

    /// Run one frame with every particle frosted and, when enabled, flickering.
    fn run_overlays(config: &EngineConfig, now_ms: f64) -> (ParticleGrid, SurfaceOverlays) {
        let mut grid = build(0, 1);
        let mut overlays = SurfaceOverlays::new(5);
        overlays
            .frost
            .activate_near(grid.positions(), Vec3::ZERO, config.frost.radius);
        overlays
            .flicker
            .activate_near(grid.positions(), grid.uvs(), Vec3::ZERO, config.flicker.radius);
        overlays.tick(now_ms, &config.frost, &config.flicker);

        let ripples = RippleSystem::new();
        let pointer = PointerState::default();
        let ctx = FrameContext {
            frame: FrameTime::new(0.4, now_ms),
            config,
            pointer: &pointer,
            hovering: false,
            ripples: &ripples,
        };
        grid.update(&ctx, &overlays, &mut StdRng::seed_from_u64(0));
        (grid, overlays)
    }

    fn small_topology() -> GridTopology {
        GridTopology {
            grid_width: 10,
            grid_height: 5,
            density: 1.0,
            surface_width: 90.0,
            surface_height: 40.0,
            ..Default::default()
        }
    }

    fn build(index: usize, total: usize) -> ParticleGrid {
        ParticleGrid::new(
            index,
            total,
            &small_topology(),
            &ColorFlow::default(),
            &ParticleParams::default(),
        )
    }

    #[test]
    fn test_layout_and_lanes() {
        let grid = build(0, 1);
        assert_eq!((grid.columns, grid.rows), (10, 5));
        assert_eq!(grid.len(), 50);
        assert_eq!(grid.uvs()[0], [0.0, 0.0]);
        assert_eq!(grid.uvs()[49], [1.0, 1.0]);
        assert_eq!(grid.uvs()[10], [0.0, 0.25]);

        // total / 2 is a float division: lane offset -4 for a single surface
        assert_eq!(grid.y_offset, -4.0);
        assert_eq!(grid.z_offset, 3.0);
        assert_eq!(grid.bases()[0], [-45.0, -24.0, 3.0]);
        assert_eq!(grid.positions(), grid.bases());

        let second = build(1, 3);
        assert_eq!(second.y_offset, -4.0);
        assert_eq!(second.z_offset, -5.0);
        assert!((second.phase_offset - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_flat_views_match_buffers() {
        let grid = build(0, 1);
        assert_eq!(grid.positions_flat().len(), grid.len() * 3);
        assert_eq!(grid.colors_flat().len(), grid.len() * 3);
        assert_eq!(&grid.positions_flat()[3..6], &grid.positions()[1]);
    }

    #[test]
    fn test_update_keeps_alpha_and_activation_in_unit_range() {
        let mut config = EngineConfig {
            topology: small_topology(),
            ..Default::default()
        };
        config.frost.enabled = true;
        config.frost.opacity = 1.0;
        config.flicker = FlickerParams {
            enabled: true,
            density: 1.0,
            ..Default::default()
        };

        let mut grid = build(0, 1);
        let mut overlays = SurfaceOverlays::new(1);
        overlays.frost.activate_near(grid.positions(), Vec3::ZERO, 30.0);
        overlays
            .flicker
            .activate_near(grid.positions(), grid.uvs(), Vec3::ZERO, 30.0);
        overlays.tick(50.0, &config.frost, &config.flicker);

        let mut ripples = RippleSystem::new();
        ripples.spawn(Vec3::ZERO, &config.ripple, 0.0);
        for _ in 0..10 {
            ripples.tick(config.ripple.decay);
        }

        let pointer = PointerState::default();
        let mut rng = StdRng::seed_from_u64(3);
        for step in 0..20 {
            let ctx = FrameContext {
                frame: FrameTime::new(step as f32 * 0.01, 60.0 + step as f64 * 16.0),
                config: &config,
                pointer: &pointer,
                hovering: true,
                ripples: &ripples,
            };
            grid.update(&ctx, &overlays, &mut rng);

            for (&alpha, &level) in grid.alphas().iter().zip(grid.activation()) {
                assert!((0.0..=1.0).contains(&alpha), "alpha {alpha}");
                assert!((0.0..=1.0).contains(&level), "activation {level}");
            }
            assert!(grid.sizes().iter().all(|size| *size >= 0.0));
        }
        assert!(grid.activation().iter().any(|level| *level > 0.0));
    }

    #[test]
    fn test_frost_boosts_alpha() {
        let config = overlay_config(false);
        let (grid, overlays) = run_overlays(&config, 1_000.0);

        let index = 22;
        let [u, v] = grid.uvs()[index];
        let level = overlays.frost.level_of(index);
        assert_close(level, 1.0 - config.frost.fade_speed);

        let plain = pulse_alpha(u, v, 0.4, &config.particles);
        assert!(plain < 1.0);
        assert_close(grid.alphas()[index], boost_alpha(plain, level, config.frost.opacity));
        assert!(grid.alphas()[index] > plain);
        assert_eq!(grid.activation()[index], level);
        assert_close_vec(grid.colors()[index], flow_color(u, 0.4, &config.color));
    }

    #[test]
    fn test_flicker_wins_over_frost() {
        let config = overlay_config(true);
        let now_ms = 1_000.0;
        let (grid, overlays) = run_overlays(&config, now_ms);

        let index = 22;
        assert!(overlays.flicker.is_active(index));
        let [u, v] = grid.uvs()[index];
        let level = overlays.frost.level_of(index);
        assert!(level > 0.0);

        let flicker = overlays.flicker.color_for(
            index,
            flow_color(u, 0.4, &config.color),
            config.flicker.color_mode,
            config.flicker.intensity,
            now_ms,
        );
        let plain = pulse_alpha(u, v, 0.4, &config.particles);
        let frosted = boost_alpha(plain, level, config.frost.opacity);

        assert_close_vec(grid.colors()[index], flicker.color * flicker.brightness);
        assert_close(grid.alphas()[index], (frosted * flicker.alpha_scale).clamp(0.0, 1.0));
        // Activation is still exported under a flicker override
        assert_eq!(grid.activation()[index], level);
    }

    #[test]
    fn test_repulsion_acts_on_deformed_position() {
        let mut config = EngineConfig {
            topology: small_topology(),
            ..Default::default()
        };
        config.repulsion.enabled = true;
        config.repulsion.range = 5.0;

        let mut grid = build(0, 1);
        let index = 22;
        let [u, v] = grid.uvs()[index];
        let time = 0.7;
        let deformed = Vec3::from_array(grid.bases()[index])
            + waves::deform(u, v, time, grid.phase_offset, &config.waves);
        let pointer = PointerState {
            world: deformed + Vec3::new(1.0, 0.0, 0.0),
        };

        let ripples = RippleSystem::new();
        let ctx = FrameContext {
            frame: FrameTime::new(time, 700.0),
            config: &config,
            pointer: &pointer,
            hovering: true,
            ripples: &ripples,
        };
        grid.update(&ctx, &SurfaceOverlays::new(0), &mut StdRng::seed_from_u64(0));

        let expected = repel(deformed, pointer.world, true, &config.repulsion);
        assert!(expected.distance(deformed) > 0.1);
        assert_close_vec(grid.positions()[index], expected);
    }

    #[test]
    fn test_infection_measures_from_base() {
        let mut config = EngineConfig {
            topology: small_topology(),
            ..Default::default()
        };
        config.infection.enabled = true;
        config.infection.range = 0.25;

        let mut grid = build(0, 1);
        let time = 0.7;
        let phase_offset = grid.phase_offset;
        // Particle whose wave displacement carries it furthest from its base
        let (index, offset) = grid
            .uvs()
            .iter()
            .map(|&[u, v]| waves::deform(u, v, time, phase_offset, &config.waves).length())
            .enumerate()
            .fold((0, 0.0), |best, (i, len)| if len > best.1 { (i, len) } else { best });
        assert!(offset > config.infection.range);

        let base = Vec3::from_array(grid.bases()[index]);
        let pointer = PointerState { world: base };
        let ripples = RippleSystem::new();
        let ctx = FrameContext {
            frame: FrameTime::new(time, 700.0),
            config: &config,
            pointer: &pointer,
            hovering: false,
            ripples: &ripples,
        };
        grid.update(&ctx, &SurfaceOverlays::new(0), &mut StdRng::seed_from_u64(0));

        // The deformed particle sits outside the range, the base does not
        assert!(Vec3::from_array(grid.positions()[index]).distance(base) >= config.infection.range);
        let [u, _] = grid.uvs()[index];
        let plain = flow_color(u, time, &config.color);
        let infected = infect(plain, 0.0, &config.infection);
        assert!(infected.distance(plain) > 0.1);
        assert_close_vec(grid.colors()[index], infected);
    }

    #[test]
    fn test_still_config_leaves_particles_on_base() {
        let mut config = EngineConfig {
            topology: small_topology(),
            ..Default::default()
        };
        config.waves.amplitude = 0.0;
        config.waves.spiral_amp = 0.0;
        config.waves.twist_strength = 0.0;
        config.waves.helix_strength = 0.0;

        let mut grid = build(0, 1);
        let overlays = SurfaceOverlays::new(0);
        let ripples = RippleSystem::new();
        let pointer = PointerState::default();
        let ctx = FrameContext {
            frame: FrameTime::new(1.0, 1000.0),
            config: &config,
            pointer: &pointer,
            hovering: false,
            ripples: &ripples,
        };
        grid.update(&ctx, &overlays, &mut StdRng::seed_from_u64(0));

        for (position, base) in grid.positions().iter().zip(grid.bases()) {
            for axis in 0..3 {
                assert!((position[axis] - base[axis]).abs() < 1e-5);
            }
        }
        // Frost disabled: activation stays zero even for stale entries
        assert!(grid.activation().iter().all(|level| *level == 0.0));
    }
}
