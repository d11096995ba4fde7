//! Flicker ("digital snow") overlay.
//!
//! A click replaces the candidate region wholesale. On each refresh (rate
//! limited by the configured interval) a fresh subset of the region is
//! drawn as live; live particles get an override color from a time-seeded
//! hash.

use glam::Vec3;
use noise::{NoiseFn, Perlin};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::compositor::hsl_to_rgb;
use crate::hash::hash;
use crate::params::{FlickerColorMode, FlickerParams, FlickerPattern};

/// Spatial scale of the noise pattern over UV space
const NOISE_UV_SCALE: f64 = 8.0;

/// Drift of the noise pattern per wall-clock second
const NOISE_DRIFT_PER_S: f64 = 4.0;

/// A particle inside the last activated region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionMember {
    pub index: usize,
    pub uv: [f32; 2],
}

/// Override produced for a live particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlickerOverride {
    pub color: Vec3,
    /// Multiplier applied to `color`; may exceed 1 for additive glow
    pub brightness: f32,
    /// Multiplier applied to alpha, in `[0.7, 1.0)`
    pub alpha_scale: f32,
}

#[derive(Debug)]
pub struct FlickerStore {
    region: Vec<RegionMember>,
    /// Sorted subset of region indices live since the last refresh
    live: Vec<usize>,
    last_refresh_ms: f64,
    rng: StdRng,
    noise: Perlin,
}

impl FlickerStore {
    pub fn new(seed: u64) -> Self {
        Self {
            region: Vec::new(),
            live: Vec::new(),
            last_refresh_ms: 0.0,
            rng: StdRng::seed_from_u64(seed),
            noise: Perlin::new(seed as u32),
        }
    }

    /// Restart the sampling RNG and noise field from `seed`. Region and live
    /// set are kept.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.noise = Perlin::new(seed as u32);
    }

    /// Replace the region with every particle within `radius` of `point`.
    ///
    /// `positions` and `uvs` are the owning grid's current positions and
    /// static UV table. Live members are kept until the next refresh.
    pub fn activate_near(
        &mut self,
        positions: &[[f32; 3]],
        uvs: &[[f32; 2]],
        point: Vec3,
        radius: f32,
    ) -> usize {
        let radius_sq = radius * radius;
        self.region = positions
            .iter()
            .zip(uvs)
            .enumerate()
            .filter(|(_, (position, _))| {
                Vec3::from_array(**position).distance_squared(point) <= radius_sq
            })
            .map(|(index, (_, uv))| RegionMember { index, uv: *uv })
            .collect();
        self.region.len()
    }

    /// Redraw the live subset if the refresh interval has elapsed.
    ///
    /// The interval is `update_interval_ms / update_speed`. Returns whether a
    /// refresh happened.
    pub fn tick(&mut self, now_ms: f64, params: &FlickerParams) -> bool {
        let speed = f64::from(params.update_speed).max(f64::EPSILON);
        let interval = params.update_interval_ms / speed;
        if now_ms - self.last_refresh_ms < interval {
            return false;
        }
        self.last_refresh_ms = now_ms;

        let density = params.density.clamp(0.0, 1.0);
        self.live.clear();
        match params.pattern {
            FlickerPattern::Random => {
                for member in &self.region {
                    if self.rng.gen::<f32>() < density {
                        self.live.push(member.index);
                    }
                }
            }
            FlickerPattern::Noise => {
                let drift = now_ms / 1000.0 * NOISE_DRIFT_PER_S;
                for member in &self.region {
                    let sample = self.noise.get([
                        f64::from(member.uv[0]) * NOISE_UV_SCALE,
                        f64::from(member.uv[1]) * NOISE_UV_SCALE,
                        drift,
                    ]);
                    let value = (sample * 0.5 + 0.5) as f32;
                    if value < density {
                        self.live.push(member.index);
                    }
                }
            }
        }
        true
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.live.binary_search(&index).is_ok()
    }

    /// Live particle indices in ascending order
    pub fn live(&self) -> &[usize] {
        &self.live
    }

    pub fn region(&self) -> &[RegionMember] {
        &self.region
    }

    /// Drop members that do not fit a grid of `len` particles.
    pub fn truncate(&mut self, len: usize) {
        self.region.retain(|member| member.index < len);
        self.live.retain(|&index| index < len);
    }

    /// Forget region, live set and refresh clock.
    pub fn clear(&mut self) {
        self.region.clear();
        self.live.clear();
        self.last_refresh_ms = 0.0;
    }

    /// Override for a live particle. Depends on `now_ms` in the monochrome and
    /// flicker modes and in the brightness, so it is reproducible only for a
    /// fixed wall-clock input.
    pub fn color_for(
        &self,
        index: usize,
        base: Vec3,
        mode: FlickerColorMode,
        intensity: f32,
        now_ms: f64,
    ) -> FlickerOverride {
        let i = index as f64;
        let coin = hash(i + now_ms * 0.001);

        let color = match mode {
            FlickerColorMode::Monochrome => {
                if coin > 0.5 {
                    Vec3::ONE
                } else {
                    Vec3::ZERO
                }
            }
            FlickerColorMode::Color => {
                Vec3::new(hash(i * 2.0), hash(i * 3.0), hash(i * 5.0))
            }
            FlickerColorMode::Rainbow => hsl_to_rgb(hash(i * 7.0), 1.0, 0.7),
            FlickerColorMode::Flicker => {
                if coin > 0.5 {
                    Vec3::ONE
                } else {
                    base
                }
            }
        };

        FlickerOverride {
            color,
            brightness: 0.5 + hash(i * 11.0 + now_ms * 0.01) * intensity,
            alpha_scale: 0.7 + hash(i * 13.0) * 0.3,
        }
    }
}
