//! Parameter definitions with documented units and defaults.
//!
//! Every recognized setting lives in a fixed struct; there is no free-form
//! configuration. Text overrides for unknown keys are ignored so that newer
//! hosts can pass settings older builds do not know about.

mod effects;
mod overrides;
mod pointer;
mod surface;

use glam::Vec3;
use rand::Rng;

use crate::error::ConfigError;

// Re-export all types
pub use effects::{
    FlickerColorMode, FlickerParams, FlickerPattern, FrostParams, ReflectionParams, RippleParams,
};
pub use overrides::Applied;
pub use pointer::{InfectionParams, RepulsionParams};
pub use surface::{ColorFlow, GridTopology, ParticleParams, WaveParams};

/// Complete configuration snapshot consumed by every frame update
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub topology: GridTopology,
    pub waves: WaveParams,
    pub color: ColorFlow,
    pub particles: ParticleParams,
    pub repulsion: RepulsionParams,
    pub infection: InfectionParams,
    pub ripple: RippleParams,
    pub frost: FrostParams,
    pub flicker: FlickerParams,
    pub reflection: ReflectionParams,

    /// Simulated time advanced per displayed frame is `0.01 * time_speed`
    pub time_speed: f32,

    /// Seed for every engine-owned RNG (size jitter, flicker sampling, noise)
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            topology: GridTopology::default(),
            waves: WaveParams::default(),
            color: ColorFlow::default(),
            particles: ParticleParams::default(),
            repulsion: RepulsionParams::default(),
            infection: InfectionParams::default(),
            ripple: RippleParams::default(),
            frost: FrostParams::default(),
            flicker: FlickerParams::default(),
            reflection: ReflectionParams::default(),
            time_speed: 0.8,
            seed: 42,
        }
    }
}

impl EngineConfig {
    /// Flip the pointer/event effects together: all off if every one is on,
    /// otherwise all on.
    pub fn toggle_all_effects(&mut self) {
        let all_enabled = self.repulsion.enabled
            && self.ripple.enabled
            && self.infection.enabled
            && self.reflection.enabled;

        self.repulsion.enabled = !all_enabled;
        self.ripple.enabled = !all_enabled;
        self.infection.enabled = !all_enabled;
        self.reflection.enabled = !all_enabled;
    }

    /// Random look: topology, waves, palette, particles and reflection drawn
    /// from hand-tuned ranges; effect toggles and overlays keep their values.
    pub fn randomized<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let mut next = self.clone();

        next.topology.surface_count = rng.gen_range(2..=9);
        next.topology.density = rng.gen_range(0.5..2.0);
        next.topology.surface_width = rng.gen_range(50.0..170.0);
        next.topology.surface_height = rng.gen_range(10.0..40.0);

        next.color.flow_speed = rng.gen_range(0.0..0.4);
        next.color.start = random_color(rng);
        next.color.end = random_color(rng);

        next.waves.amplitude = rng.gen_range(1.0..7.0);
        next.waves.speed = rng.gen_range(0.1..0.9);
        next.waves.spiral_freq = rng.gen_range(1.0..11.0);
        next.waves.spiral_amp = rng.gen_range(0.5..4.5);
        next.waves.twist_strength = rng.gen_range(0.0..2.0);
        next.waves.helix_strength = rng.gen_range(0.0..1.5);

        next.particles.size = rng.gen_range(0.3..1.8);
        next.particles.pulse = rng.gen_range(0.0..0.8);

        next.time_speed = rng.gen_range(0.2..2.2);
        next.reflection.intensity = rng.gen_range(0.0..1.5);

        next
    }

    /// Reject values the simulation cannot use meaningfully.
    ///
    /// Degenerate-but-finite topology is accepted (the grid clamps itself);
    /// this catches NaN/infinite numbers and impossible ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite: [(&'static str, f32); 17] = [
            ("topology.density", self.topology.density),
            ("topology.surface_width", self.topology.surface_width),
            ("topology.surface_height", self.topology.surface_height),
            ("waves.amplitude", self.waves.amplitude),
            ("waves.speed", self.waves.speed),
            ("waves.spiral_freq", self.waves.spiral_freq),
            ("waves.spiral_amp", self.waves.spiral_amp),
            ("waves.twist_strength", self.waves.twist_strength),
            ("waves.helix_strength", self.waves.helix_strength),
            ("color.flow_speed", self.color.flow_speed),
            ("particles.size", self.particles.size),
            ("particles.pulse", self.particles.pulse),
            ("repulsion.strength", self.repulsion.strength),
            ("ripple.strength", self.ripple.strength),
            ("ripple.speed", self.ripple.speed),
            ("flicker.intensity", self.flicker.intensity),
            ("time_speed", self.time_speed),
        ];
        for (key, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::OutOfRange {
                    key,
                    reason: format!("{value} is not finite"),
                });
            }
        }

        let positive: [(&'static str, f32); 6] = [
            ("repulsion.range", self.repulsion.range),
            ("infection.range", self.infection.range),
            ("frost.radius", self.frost.radius),
            ("flicker.radius", self.flicker.radius),
            ("flicker.update_speed", self.flicker.update_speed),
            ("frost.fade_speed", self.frost.fade_speed),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::OutOfRange {
                    key,
                    reason: format!("{value} must be > 0"),
                });
            }
        }

        let unit: [(&'static str, f32); 4] = [
            ("ripple.decay", self.ripple.decay),
            ("infection.intensity", self.infection.intensity),
            ("flicker.density", self.flicker.density),
            ("frost.opacity", self.frost.opacity),
        ];
        for (key, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    key,
                    reason: format!("{value} must be within [0, 1]"),
                });
            }
        }

        if !(self.flicker.update_interval_ms.is_finite() && self.flicker.update_interval_ms >= 0.0)
        {
            return Err(ConfigError::OutOfRange {
                key: "flicker.update_interval_ms",
                reason: format!("{} must be >= 0", self.flicker.update_interval_ms),
            });
        }

        Ok(())
    }
}

fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    crate::compositor::rgb_hex(rng.gen_range(0..=0xff_ffff))
}
