//! Ribbonflow - headless driver for the particle ribbon simulation
//!
//! Runs a fixed number of frames, delivers scripted clicks, logs a summary
//! and optionally writes a debug PNG of the final buffers.

mod cli;

use std::time::Instant;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use cli::Args;
use ribbonflow::{snapshot, EngineConfig, FrameClock, PointerState, SurfaceSystem};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Build configuration
    let mut config = EngineConfig::default();
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.randomize {
        config = config.randomized(&mut StdRng::seed_from_u64(config.seed));
    }
    if args.toggle_effects {
        config.toggle_all_effects();
    }
    args.apply_overrides(&mut config)?;
    config.validate()?;

    let (columns, rows) = config.topology.dimensions();
    tracing::info!(
        surfaces = config.topology.surface_count,
        columns,
        rows,
        seed = config.seed,
        "starting simulation"
    );

    let mut system = SurfaceSystem::new(config);
    let mut clock = FrameClock::new();
    let pointer = args
        .click
        .last()
        .map_or_else(PointerState::default, |point| PointerState { world: *point });

    let start = Instant::now();
    for frame in 0..args.frames {
        let now_ms = f64::from(frame) * args.frame_ms;

        if frame == args.click_frame {
            for point in &args.click {
                let outcome = system.handle_click(*point, now_ms);
                tracing::info!(
                    x = point.x,
                    y = point.y,
                    ripples = outcome.ripples_spawned,
                    frosted = outcome.frosted,
                    flickering = outcome.flickering,
                    "click"
                );
            }
        }

        let frame_time = clock.tick(system.config().time_speed, now_ms);
        system.update(frame_time, &pointer);
    }
    let elapsed = start.elapsed();

    // Summary
    let particles = system.particle_count();
    let alpha_sum: f32 = system
        .grids()
        .iter()
        .flat_map(|grid| grid.alphas())
        .sum();
    let frosted: usize = system.overlays().iter().map(|o| o.frost.len()).sum();
    let flickering: usize = system.overlays().iter().map(|o| o.flicker.live().len()).sum();
    tracing::info!(
        frames = clock.frame_count(),
        time = clock.time(),
        particles,
        live_ripples = system.ripples().len(),
        frosted,
        flickering,
        mean_alpha = alpha_sum / particles.max(1) as f32,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "simulation finished"
    );

    if let Some(path) = &args.snapshot {
        snapshot::write_png(system.grids(), args.width, args.height, path)?;
        tracing::info!(path = %path.display(), "snapshot written");
    }

    Ok(())
}
