//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use glam::Vec3;

use ribbonflow::params::{Applied, EngineConfig};
use ribbonflow::ConfigError;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "ribbonflow")]
#[command(about = "Headless particle ribbon simulation", long_about = None)]
pub struct Args {
    /// Number of frames to simulate
    #[arg(long, value_name = "N", default_value_t = 240)]
    pub frames: u32,

    /// Seed for every engine RNG (overrides the config default)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Click at world X,Y (repeatable)
    #[arg(long, value_name = "X,Y", value_parser = parse_point, allow_hyphen_values = true)]
    pub click: Vec<Vec3>,

    /// Frame at which the clicks are delivered
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub click_frame: u32,

    /// Config override KEY=VALUE, e.g. ripple.speed=1.2 (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub overrides: Vec<(String, String)>,

    /// Randomize the config before applying overrides
    #[arg(long)]
    pub randomize: bool,

    /// Flip repulsion, ripple, infection and reflection together
    #[arg(long)]
    pub toggle_effects: bool,

    /// Write an orthographic PNG of the final frame
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// Snapshot width in pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Snapshot height in pixels
    #[arg(long, default_value_t = 400)]
    pub height: u32,

    /// Simulated wall-clock milliseconds per frame
    #[arg(long, value_name = "MS", default_value_t = 16.0)]
    pub frame_ms: f64,
}

impl Args {
    /// Apply every `--set` override to `config`. Unknown keys are logged
    /// and skipped.
    pub fn apply_overrides(&self, config: &mut EngineConfig) -> Result<(), ConfigError> {
        for (key, value) in &self.overrides {
            match config.apply_override(key, value)? {
                Applied::Set => tracing::info!(key = %key, value = %value, "override applied"),
                Applied::Ignored => tracing::warn!(key = %key, "unknown config key ignored"),
            }
        }
        Ok(())
    }
}

fn parse_point(s: &str) -> Result<Vec3, String> {
    let mut parts = s.split(',').map(str::trim);
    let mut next = || -> Result<f32, String> {
        parts
            .next()
            .ok_or_else(|| format!("expected X,Y, got '{s}'"))?
            .parse::<f32>()
            .map_err(|e| format!("bad coordinate in '{s}': {e}"))
    };
    let x = next()?;
    let y = next()?;
    if parts.next().is_some() {
        return Err(format!("expected X,Y, got '{s}'"));
    }
    Ok(Vec3::new(x, y, 0.0))
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("3.5, -2").unwrap(), Vec3::new(3.5, -2.0, 0.0));
        assert!(parse_point("1").is_err());
        assert!(parse_point("1,2,3").is_err());
        assert!(parse_point("a,2").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "ribbonflow",
            "--frames",
            "10",
            "--click",
            "0,0",
            "--click",
            "5,1",
            "--set",
            "ripple.speed=1.5",
            "--set",
            "bogus.key=1",
        ]);
        assert_eq!(args.frames, 10);
        assert_eq!(args.click.len(), 2);

        let mut config = EngineConfig::default();
        args.apply_overrides(&mut config).unwrap();
        assert_eq!(config.ripple.speed, 1.5);
    }

    #[test]
    fn test_bad_override_value_is_an_error() {
        let args = Args::parse_from(["ribbonflow", "--set", "ripple.speed=fast"]);
        let mut config = EngineConfig::default();
        assert!(args.apply_overrides(&mut config).is_err());
    }
}
