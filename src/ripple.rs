//! Expanding ripple pulses spawned by pointer clicks.
//!
//! Each click emits two concentric pulses. A pulse only affects particles
//! near its growing edge; its strength decays every frame and the pulse is
//! dropped once it falls under [`STRENGTH_FLOOR`].
//!
//! Aggregated intensity is gated at [`INTENSITY_GATE`]: at or below it,
//! no jitter, flicker or tint is applied at all. The jump at the gate is
//! part of the look and must not be smoothed.

use std::f32::consts::PI;

use glam::Vec3;

use crate::compositor::{smoothstep, RippleTint};
use crate::hash::index_seed;
use crate::params::RippleParams;

/// Pulses weaker than this are removed on the next tick
pub const STRENGTH_FLOOR: f32 = 0.1;

/// Aggregated intensity above which jitter, flicker and tint kick in
pub const INTENSITY_GATE: f32 = 0.15;

/// Pulses emitted per click
pub const LAYERS_PER_SPAWN: usize = 2;

/// Wall-clock milliseconds to pulse-time units
const PULSE_TIME_SCALE: f64 = 0.003;

/// Radial push per unit of ripple force
const DISPLACEMENT_SCALE: f32 = 0.015;

/// Jitter amplitude at full intensity
const SHATTER_STRENGTH: f32 = 0.5;

/// One expanding pulse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleEvent {
    pub origin: Vec3,
    /// Current ring radius (world units)
    pub radius: f32,
    /// Current strength; never increases
    pub strength: f32,
    /// Radius growth per tick
    pub speed: f32,
    /// 0 for the primary pulse, 1 for the echo
    pub layer: u32,
    pub frequency: f32,
    pub phase: f32,
    /// Wall-clock spawn time (milliseconds)
    pub birth_ms: f64,
    /// Hue rotation contributed at the edge (degrees)
    pub hue: f32,
}

impl RippleEvent {
    /// Half-width of the band around the ring that the pulse affects
    pub fn edge_width(&self) -> f32 {
        4.0 + self.layer as f32
    }

    /// Weight of this pulse in the aggregated intensity
    pub fn layer_weight(&self) -> f32 {
        1.0 - self.layer as f32 * 0.2
    }

    /// Temporal oscillation in `[0, 1]`
    pub fn pulse_factor(&self, now_ms: f64) -> f32 {
        let pulse_time = ((now_ms - self.birth_ms) * PULSE_TIME_SCALE) as f32;
        (pulse_time * self.frequency + self.phase).sin() * 0.5 + 0.5
    }

    /// Linear edge falloff in `(0, 1]` for a point inside the band, else `None`.
    /// Also returns the offset from origin and its length.
    fn edge(&self, point: Vec3) -> Option<(f32, Vec3, f32, f32)> {
        let offset = point - self.origin;
        let distance = offset.length();
        let ring_distance = (distance - self.radius).abs();
        let width = self.edge_width();
        if ring_distance < width {
            Some((1.0 - ring_distance / width, offset, distance, ring_distance))
        } else {
            None
        }
    }
}

/// Displacement and intensity gathered from every live pulse at one point
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PulseSample {
    pub displacement: Vec3,
    /// Sum of weighted falloffs, capped at 1.0
    pub intensity: f32,
}

impl PulseSample {
    /// Whether jitter, flicker and tint apply
    pub fn is_gated_on(&self) -> bool {
        self.intensity > INTENSITY_GATE
    }
}

/// Owns every live pulse
#[derive(Debug, Default)]
pub struct RippleSystem {
    pulses: Vec<RippleEvent>,
}

impl RippleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit the two-layer pulse at `origin` if ripples are enabled.
    ///
    /// Returns the number of pulses added.
    pub fn spawn(&mut self, origin: Vec3, params: &RippleParams, now_ms: f64) -> usize {
        if !params.enabled {
            return 0;
        }
        for i in 0..LAYERS_PER_SPAWN {
            let layer = i as f32;
            self.pulses.push(RippleEvent {
                origin,
                radius: 0.0,
                strength: params.strength * (1.0 - layer * 0.2),
                speed: params.speed * (1.0 + layer * 0.25),
                layer: i as u32,
                frequency: 2.5 + layer,
                phase: layer * PI / 2.0,
                birth_ms: now_ms,
                hue: layer * 60.0,
            });
        }
        tracing::debug!(
            x = origin.x,
            y = origin.y,
            z = origin.z,
            live = self.pulses.len(),
            "ripple spawned"
        );
        LAYERS_PER_SPAWN
    }

    /// Insert a pre-built pulse
    pub fn push(&mut self, event: RippleEvent) {
        self.pulses.push(event);
    }

    /// Grow every pulse, decay its strength and drop the spent ones.
    ///
    /// `decay_rate` is clamped to `[0, 1]` so strength can only fall.
    /// Returns how many pulses were removed.
    pub fn tick(&mut self, decay_rate: f32) -> usize {
        let keep = 1.0 - decay_rate.clamp(0.0, 1.0);
        let before = self.pulses.len();
        self.pulses.retain_mut(|pulse| {
            pulse.radius += pulse.speed;
            pulse.strength *= keep;
            pulse.strength >= STRENGTH_FLOOR
        });
        let removed = before - self.pulses.len();
        if removed > 0 {
            tracing::trace!(removed, live = self.pulses.len(), "ripples expired");
        }
        removed
    }

    /// Sum the radial push and intensity of every pulse whose band covers `point`.
    pub fn sample(&self, point: Vec3, now_ms: f64) -> PulseSample {
        let mut sample = PulseSample::default();

        for pulse in &self.pulses {
            let Some((falloff, offset, distance, ring_distance)) = pulse.edge(point) else {
                continue;
            };
            let pulse_factor = pulse.pulse_factor(now_ms);
            let wave_pattern = (ring_distance * 0.3 + pulse.phase).sin();
            let force =
                pulse.strength * smoothstep(falloff) * wave_pattern * (0.6 + pulse_factor * 0.4);

            if distance > f32::EPSILON {
                sample.displacement += (offset / distance) * force * DISPLACEMENT_SCALE;
            }
            sample.intensity += falloff * pulse_factor * pulse.layer_weight();
        }

        sample.intensity = sample.intensity.min(1.0);
        sample
    }

    /// Displace `point` by every pulse, adding index-seeded jitter when the
    /// aggregated intensity passes the gate. Returns the new position and
    /// the intensity.
    pub fn displace(&self, point: Vec3, index: usize, time: f32, now_ms: f64) -> (Vec3, f32) {
        let sample = self.sample(point, now_ms);
        let position = point + sample.displacement + shatter_offset(index, time, sample.intensity);
        (position, sample.intensity)
    }

    /// Hue rotation and saturation/lightness boost at `point` (normally the
    /// already displaced position).
    pub fn tint(&self, point: Vec3) -> RippleTint {
        let mut tint = RippleTint::default();
        for pulse in &self.pulses {
            if let Some((falloff, ..)) = pulse.edge(point) {
                tint.hue_shift += pulse.hue * falloff * 0.0008;
                tint.boost += falloff * pulse.layer_weight();
            }
        }
        tint
    }

    pub fn pulses(&self) -> &[RippleEvent] {
        &self.pulses
    }

    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    pub fn clear(&mut self) {
        self.pulses.clear();
    }
}

/// Index-seeded positional jitter; zero at or below the intensity gate.
pub fn shatter_offset(index: usize, time: f32, intensity: f32) -> Vec3 {
    if intensity <= INTENSITY_GATE {
        return Vec3::ZERO;
    }
    let seed = index_seed(index, 12_345.6789);
    Vec3::new(
        (seed + time * 3.0).sin(),
        (seed * 1.3 + time * 3.2).cos(),
        (seed * 1.7 + time * 2.8).sin(),
    ) * intensity
        * SHATTER_STRENGTH
}

/// Index-seeded size/alpha flicker; identity at or below the intensity gate.
///
/// Alpha only ever brightens and stays capped at 1.0.
pub fn flicker_particle(size: f32, alpha: f32, index: usize, time: f32, intensity: f32) -> (f32, f32) {
    if intensity <= INTENSITY_GATE {
        return (size, alpha);
    }
    let size_seed = index_seed(index, 9_876.543);
    let size_flicker = (size_seed + time * 4.5).sin() * 0.5 + 0.5;
    let size = size * (1.0 + (size_flicker - 0.5) * intensity * 0.2);

    let alpha_seed = index_seed(index, 6_543.21);
    let alpha_flicker = (alpha_seed + time * 5.0).sin() * 0.5 + 0.5;
    let alpha = (alpha * (1.0 + alpha_flicker * intensity * 0.15)).min(1.0);

    (size, alpha)
}
