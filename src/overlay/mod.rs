//! Activation overlays: frost (fading levels) and flicker (refreshed membership).
//!
//! Both are indexed by particle index within one surface; a surface owns one
//! of each through [`SurfaceOverlays`].

mod flicker;
mod frost;

pub use flicker::{FlickerOverride, FlickerStore, RegionMember};
pub use frost::{boost_alpha, FrostStore};

use crate::params::{FlickerParams, FrostParams};

/// Overlay state for a single surface
#[derive(Debug)]
pub struct SurfaceOverlays {
    pub frost: FrostStore,
    pub flicker: FlickerStore,
}

impl SurfaceOverlays {
    pub fn new(seed: u64) -> Self {
        Self {
            frost: FrostStore::new(),
            flicker: FlickerStore::new(seed),
        }
    }

    /// Advance both stores one frame. A disabled overlay is cleared instead.
    pub fn tick(&mut self, now_ms: f64, frost: &FrostParams, flicker: &FlickerParams) {
        if frost.enabled {
            self.frost.tick(frost.fade_speed);
        } else {
            self.frost.clear();
        }

        if flicker.enabled {
            self.flicker.tick(now_ms, flicker);
        } else {
            self.flicker.clear();
        }
    }

    /// Reseed the flicker sampling; frost holds no randomness.
    pub fn reseed(&mut self, seed: u64) {
        self.flicker.reseed(seed);
    }

    /// Drop indices that do not exist in a grid of `len` particles.
    pub fn truncate(&mut self, len: usize) {
        self.frost.truncate(len);
        self.flicker.truncate(len);
    }

    pub fn clear(&mut self) {
        self.frost.clear();
        self.flicker.clear();
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn test_disabled_overlays_clear_on_tick() {
        let positions = vec![[0.0, 0.0, 0.0]; 4];
        let uvs = vec![[0.5, 0.5]; 4];
        let mut overlays = SurfaceOverlays::new(7);
        overlays.frost.activate_near(&positions, Vec3::ZERO, 1.0);
        overlays.flicker.activate_near(&positions, &uvs, Vec3::ZERO, 1.0);

        let frost = FrostParams {
            enabled: true,
            ..Default::default()
        };
        let flicker = FlickerParams {
            enabled: true,
            density: 1.0,
            ..Default::default()
        };
        overlays.tick(100.0, &frost, &flicker);
        assert_eq!(overlays.frost.len(), 4);
        assert_eq!(overlays.flicker.live().len(), 4);

        overlays.tick(200.0, &FrostParams::default(), &FlickerParams::default());
        assert!(overlays.frost.is_empty());
        assert!(overlays.flicker.region().is_empty());
        assert!(overlays.flicker.live().is_empty());
    }
}
