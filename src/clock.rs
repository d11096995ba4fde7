//! Frame clock for the simulation.
//!
//! Simulated time advances by a fixed step per displayed frame, scaled by
//! the configured time speed. Wall-clock milliseconds are injected by the
//! host, so the clock never reads `Instant` itself and a fixed sequence of
//! inputs reproduces a run.

/// Simulated time added per frame at `time_speed = 1.0`
pub const STEP_PER_FRAME: f32 = 0.01;

/// Time inputs for one `update` call
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    /// Simulated time driving waves, color flow and pulse sizing
    pub time: f32,
    /// Host wall clock in milliseconds (ripple pulse phase, flicker refresh)
    pub now_ms: f64,
}

impl FrameTime {
    pub fn new(time: f32, now_ms: f64) -> Self {
        Self { time, now_ms }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    time: f32,
    frame_count: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one frame and return the time inputs for it.
    pub fn tick(&mut self, time_speed: f32, now_ms: f64) -> FrameTime {
        self.time += STEP_PER_FRAME * time_speed;
        self.frame_count += 1;
        FrameTime::new(self.time, now_ms)
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
