//! `key=value` overrides onto an [`EngineConfig`].

use std::str::FromStr;

use glam::Vec3;

use super::EngineConfig;
use crate::compositor::rgb_hex;
use crate::error::ConfigError;

/// Outcome of a single override
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Key recognized and value stored
    Set,
    /// Key not recognized; config untouched
    Ignored,
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Accepts `#rrggbb`, `0xrrggbb` or `rrggbb`.
fn parse_color(key: &str, value: &str) -> Result<Vec3, ConfigError> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .unwrap_or(trimmed);
    if digits.len() != 6 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        });
    }
    u32::from_str_radix(digits, 16)
        .map(rgb_hex)
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

impl EngineConfig {
    /// Apply one override such as `ripple.speed=1.2`.
    ///
    /// Unknown keys are ignored (`Ok(Applied::Ignored)`); a recognized key
    /// with an unparsable value is an error and leaves the config untouched.
    pub fn apply_override(&mut self, key: &str, value: &str) -> Result<Applied, ConfigError> {
        let k = key.trim();
        match k {
            "topology.surface_count" => self.topology.surface_count = parse(k, value)?,
            "topology.grid_width" => self.topology.grid_width = parse(k, value)?,
            "topology.grid_height" => self.topology.grid_height = parse(k, value)?,
            "topology.density" => self.topology.density = parse(k, value)?,
            "topology.surface_width" => self.topology.surface_width = parse(k, value)?,
            "topology.surface_height" => self.topology.surface_height = parse(k, value)?,

            "waves.amplitude" => self.waves.amplitude = parse(k, value)?,
            "waves.speed" => self.waves.speed = parse(k, value)?,
            "waves.spiral_freq" => self.waves.spiral_freq = parse(k, value)?,
            "waves.spiral_amp" => self.waves.spiral_amp = parse(k, value)?,
            "waves.twist_strength" => self.waves.twist_strength = parse(k, value)?,
            "waves.helix_strength" => self.waves.helix_strength = parse(k, value)?,

            "color.start" => self.color.start = parse_color(k, value)?,
            "color.end" => self.color.end = parse_color(k, value)?,
            "color.flow_speed" => self.color.flow_speed = parse(k, value)?,

            "particles.size" => self.particles.size = parse(k, value)?,
            "particles.pulse" => self.particles.pulse = parse(k, value)?,

            "repulsion.enabled" => self.repulsion.enabled = parse(k, value)?,
            "repulsion.strength" => self.repulsion.strength = parse(k, value)?,
            "repulsion.range" => self.repulsion.range = parse(k, value)?,
            "repulsion.boundary_margin" => self.repulsion.boundary_margin = parse(k, value)?,

            "infection.enabled" => self.infection.enabled = parse(k, value)?,
            "infection.color" => self.infection.color = parse_color(k, value)?,
            "infection.intensity" => self.infection.intensity = parse(k, value)?,
            "infection.range" => self.infection.range = parse(k, value)?,

            "ripple.enabled" => self.ripple.enabled = parse(k, value)?,
            "ripple.strength" => self.ripple.strength = parse(k, value)?,
            "ripple.speed" => self.ripple.speed = parse(k, value)?,
            "ripple.decay" => self.ripple.decay = parse(k, value)?,

            "frost.enabled" => self.frost.enabled = parse(k, value)?,
            "frost.opacity" => self.frost.opacity = parse(k, value)?,
            "frost.frosted_amount" => self.frost.frosted_amount = parse(k, value)?,
            "frost.highlight_intensity" => self.frost.highlight_intensity = parse(k, value)?,
            "frost.tint" => self.frost.tint = parse_color(k, value)?,
            "frost.radius" => self.frost.radius = parse(k, value)?,
            "frost.fade_speed" => self.frost.fade_speed = parse(k, value)?,

            "flicker.enabled" => self.flicker.enabled = parse(k, value)?,
            "flicker.density" => self.flicker.density = parse(k, value)?,
            "flicker.update_speed" => self.flicker.update_speed = parse(k, value)?,
            "flicker.update_interval_ms" => self.flicker.update_interval_ms = parse(k, value)?,
            "flicker.color_mode" => self.flicker.color_mode = value.parse()?,
            "flicker.intensity" => self.flicker.intensity = parse(k, value)?,
            "flicker.pattern" => self.flicker.pattern = value.parse()?,
            "flicker.radius" => self.flicker.radius = parse(k, value)?,

            "reflection.enabled" => self.reflection.enabled = parse(k, value)?,
            "reflection.intensity" => self.reflection.intensity = parse(k, value)?,

            "time_speed" => self.time_speed = parse(k, value)?,
            "seed" => self.seed = parse(k, value)?,

            _ => return Ok(Applied::Ignored),
        }
        Ok(Applied::Set)
    }
}
