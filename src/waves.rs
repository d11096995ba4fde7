//! Procedural wave fields over grid UV space.
//!
//! Pure functions of `(u, v, time, phase)`; every surface samples the same
//! fields with its own phase offset. The spiral's combined phase is shared by
//! the primary, radial and helix fields so they stay phase-locked.

use std::f32::consts::PI;

use glam::Vec3;

use crate::params::WaveParams;

/// Spiral output: lateral (y) and depth (z) offsets plus the shared phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spiral {
    pub lateral: f32,
    pub depth: f32,
    pub wave_offset: f32,
}

pub fn spiral(u: f32, v: f32, time: f32, phase_offset: f32, waves: &WaveParams) -> Spiral {
    let wave_offset = phase_offset + time * waves.speed;
    let angle = u * PI * waves.spiral_freq + wave_offset + v * PI * 2.0;
    Spiral {
        lateral: angle.sin() * waves.spiral_amp,
        depth: angle.cos() * waves.spiral_amp,
        wave_offset,
    }
}

/// Primary wave: two lateral sinusoids, over u at 3 half-turns and over v
/// at 4 (the latter advancing 1.5× faster).
pub fn primary(u: f32, v: f32, wave_offset: f32, amplitude: f32) -> (f32, f32) {
    let wave1 = (u * PI * 3.0 + wave_offset).sin() * amplitude * 0.8;
    let wave2 = (v * PI * 4.0 + wave_offset * 1.5).cos() * amplitude * 0.5;
    (wave1, wave2)
}

/// Radial wave around the grid center (lateral).
pub fn radial(u: f32, v: f32, wave_offset: f32, amplitude: f32) -> f32 {
    let dist = (u - 0.5).hypot(v - 0.5);
    (dist * PI * 6.0 + wave_offset * 2.0).sin() * amplitude * 0.3
}

/// Twist: `(x, y)` offsets driven directly by time, not by the shared phase.
pub fn twist(u: f32, v: f32, time: f32, strength: f32) -> (f32, f32) {
    let twist_x = (u * PI * 12.0 + time * 2.0).sin() * (v * PI * 6.0 + time).cos() * strength;
    let twist_y =
        (u * PI * 6.0 + time * 1.5).cos() * (v * PI * 12.0 + time * 2.0).sin() * strength;
    (twist_x, twist_y)
}

/// Double-helix braid along u: `(lateral, depth)`.
pub fn helix(u: f32, v: f32, wave_offset: f32, strength: f32) -> (f32, f32) {
    let phase = u * PI * 8.0 + wave_offset * 3.0 + v * PI;
    (phase.sin() * strength, phase.cos() * strength)
}

/// Sum of every field as a displacement from the flat base position.
///
/// Twist's x term moves x; all other lateral terms move y, depth terms move z.
pub fn deform(u: f32, v: f32, time: f32, phase_offset: f32, waves: &WaveParams) -> Vec3 {
    let s = spiral(u, v, time, phase_offset, waves);
    let (wave1, wave2) = primary(u, v, s.wave_offset, waves.amplitude);
    let radial_wave = radial(u, v, s.wave_offset, waves.amplitude);
    let (twist_x, twist_y) = twist(u, v, time, waves.twist_strength);
    let (helix_y, helix_z) = helix(u, v, s.wave_offset, waves.helix_strength);

    Vec3::new(
        twist_x,
        s.lateral + wave1 + wave2 + radial_wave + helix_y + twist_y,
        s.depth + helix_z,
    )
}
