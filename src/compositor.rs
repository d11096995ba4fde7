//! Color, size and alpha composition for a single particle.
//!
//! Color passes run in a fixed order: flow gradient, proximity recolor,
//! ripple tint. Overlay overrides are applied by the caller afterwards.

use std::f32::consts::PI;

use glam::Vec3;

use crate::params::{ColorFlow, InfectionParams, ParticleParams};

/// Convert a `0xRRGGBB` literal to an RGB vector in 0-1.
pub fn rgb_hex(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Cubic smoothstep on an already normalized `t`.
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Endpoint-exact linear blend (`t = 0` gives `a`, `t = 1` gives `b` bit for bit).
#[inline]
pub fn mix(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

/// Tent-shaped gradient position: 0 at both ends of the cycle, 1 in the middle.
pub fn flow_phase(u: f32, time: f32, flow_speed: f32) -> f32 {
    let offset = (time * flow_speed).rem_euclid(1.0);
    let position = (u + offset).rem_euclid(1.0);
    let tent = if position < 0.5 {
        position * 2.0
    } else {
        (1.0 - position) * 2.0
    };
    smoothstep(tent)
}

/// Base flow color: start → end → start along u, scrolling with time.
pub fn flow_color(u: f32, time: f32, flow: &ColorFlow) -> Vec3 {
    mix(flow.start, flow.end, flow_phase(u, time, flow.flow_speed))
}

/// Proximity recolor toward the infection color.
///
/// `distance` is measured from the undeformed particle position.
pub fn infect(color: Vec3, distance: f32, infection: &InfectionParams) -> Vec3 {
    if !infection.enabled || distance >= infection.range {
        return color;
    }
    let factor = (1.0 - distance / infection.range) * infection.intensity;
    mix(color, infection.color, factor)
}

/// Aggregated ripple recolor for one particle
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RippleTint {
    /// Hue rotation in turns
    pub hue_shift: f32,
    /// Saturation/lightness boost weight
    pub boost: f32,
}

/// Rotate hue and lift saturation/lightness in HSL space.
pub fn apply_ripple_tint(color: Vec3, tint: RippleTint) -> Vec3 {
    let (h, s, l) = rgb_to_hsl(color);
    let h = (h + tint.hue_shift).rem_euclid(1.0);
    let s = (s + tint.boost * 0.08).min(1.0);
    let l = (l + tint.boost * 0.04).min(1.0);
    hsl_to_rgb(h, s, l)
}

/// RGB (0-1) to `(hue, saturation, lightness)`, hue in turns.
pub fn rgb_to_hsl(color: Vec3) -> (f32, f32, f32) {
    let (r, g, b) = (color.x, color.y, color.z);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (min + max) / 2.0;

    if min == max {
        return (0.0, 0.0, lightness);
    }

    let delta = max - min;
    let saturation = if lightness <= 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };
    let hue = if max == r {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    (hue / 6.0, saturation, lightness)
}

/// `(hue, saturation, lightness)` to RGB; hue wraps, s and l clamp to 0-1.
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Vec3 {
    let h = hue.rem_euclid(1.0);
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    if s == 0.0 {
        return Vec3::splat(l);
    }

    let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let q = 2.0 * l - p;

    Vec3::new(
        hue_to_channel(q, p, h + 1.0 / 3.0),
        hue_to_channel(q, p, h),
        hue_to_channel(q, p, h - 1.0 / 3.0),
    )
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

/// Breathing point size. `jitter` is a fresh uniform sample in `[0, 0.15)`.
pub fn pulse_size(u: f32, v: f32, time: f32, jitter: f32, particles: &ParticleParams) -> f32 {
    let pulse1 = (time * 2.0 + u * PI * 6.0).sin() * particles.pulse;
    let pulse2 = (time * 1.5 + v * PI * 8.0).cos() * particles.pulse * 0.75;
    ((particles.size + jitter) * (1.0 + pulse1 + pulse2)).max(0.0)
}

/// Edge-faded breathing alpha, vanishing on the grid border. Always in 0-1.
pub fn pulse_alpha(u: f32, v: f32, time: f32, particles: &ParticleParams) -> f32 {
    let edge_fade_x = (u * PI).sin();
    let edge_fade_y = (v * PI).sin();
    let alpha_pulse1 = (time * 1.5 + u * PI * 4.0).sin() * particles.pulse * 0.75;
    let alpha_pulse2 = (time * 2.0 + v * PI * 6.0).cos() * particles.pulse * 0.5;
    (edge_fade_x * edge_fade_y * (0.75 + alpha_pulse1 + alpha_pulse2)).clamp(0.0, 1.0)
}
