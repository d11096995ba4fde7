//! Event-driven effects: ripples, overlays and reflection.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;

use crate::compositor::rgb_hex;
use crate::error::ConfigError;

/// Click-spawned ripple pulses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleParams {
    pub enabled: bool,

    /// Initial strength of the first pulse layer
    pub strength: f32,

    /// Radius growth per frame (world units)
    pub speed: f32,

    /// Fraction of strength lost per frame (0-1)
    pub decay: f32,
}

impl Default for RippleParams {
    fn default() -> Self {
        Self {
            enabled: true,
            strength: 25.0,
            speed: 0.8,
            decay: 0.02,
        }
    }
}

/// Frost overlay: click-activated, linearly fading per-particle level.
///
/// Only `radius` and `fade_speed` drive the simulation; the remaining fields
/// are forwarded to the renderer through [`crate::surface::FrameUniforms`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrostParams {
    pub enabled: bool,

    /// Base glass opacity; also scales the alpha boost of active particles
    pub opacity: f32,

    /// Frosting amount (renderer only)
    pub frosted_amount: f32,

    /// Specular highlight intensity (renderer only)
    pub highlight_intensity: f32,

    /// Glass tint (renderer only)
    pub tint: Vec3,

    /// Activation radius around the click point (world units)
    pub radius: f32,

    /// Level lost per frame
    pub fade_speed: f32,
}

impl Default for FrostParams {
    fn default() -> Self {
        Self {
            enabled: false,
            opacity: 0.10,
            frosted_amount: 0.60,
            highlight_intensity: 2.0,
            tint: rgb_hex(0xccffff),
            radius: 6.0,
            fade_speed: 0.01,
        }
    }
}

/// Override color produced for live flicker members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlickerColorMode {
    /// Black/white flicker
    #[default]
    Monochrome,
    /// Random RGB per particle
    Color,
    /// Random hue at fixed saturation and lightness
    Rainbow,
    /// White/base-color flicker
    Flicker,
}

impl FlickerColorMode {
    pub const ALL: [Self; 4] = [Self::Monochrome, Self::Color, Self::Rainbow, Self::Flicker];

    pub fn name(self) -> &'static str {
        match self {
            Self::Monochrome => "monochrome",
            Self::Color => "color",
            Self::Rainbow => "rainbow",
            Self::Flicker => "flicker",
        }
    }
}

impl fmt::Display for FlickerColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FlickerColorMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownMode(s.to_string()))
    }
}

/// How live flicker members are drawn from the activated region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlickerPattern {
    /// Each candidate included independently with probability = density
    #[default]
    Random,
    /// Candidates included where a drifting Perlin field falls under density
    Noise,
}

impl FlickerPattern {
    pub fn name(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Noise => "noise",
        }
    }
}

impl fmt::Display for FlickerPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FlickerPattern {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "noise" => Ok(Self::Noise),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

/// Flicker ("digital snow") overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlickerParams {
    pub enabled: bool,

    /// Probability that a region member is live on a given refresh (0-1)
    pub density: f32,

    /// Refresh rate multiplier (refresh every `update_interval_ms / update_speed`)
    pub update_speed: f32,

    /// Base refresh interval (milliseconds, ~one 60 Hz frame)
    pub update_interval_ms: f64,

    pub color_mode: FlickerColorMode,

    /// Brightness swing of live members (0-2)
    pub intensity: f32,

    pub pattern: FlickerPattern,

    /// Activation radius around the click point (world units)
    pub radius: f32,
}

impl Default for FlickerParams {
    fn default() -> Self {
        Self {
            enabled: false,
            density: 0.90,
            update_speed: 2.3,
            update_interval_ms: 16.0,
            color_mode: FlickerColorMode::Monochrome,
            intensity: 0.8,
            pattern: FlickerPattern::Random,
            radius: 8.0,
        }
    }
}

/// Reflection toggle forwarded to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectionParams {
    pub enabled: bool,
    pub intensity: f32,
}

impl Default for ReflectionParams {
    fn default() -> Self {
        Self {
            enabled: true,
            intensity: 0.8,
        }
    }
}
