//! Frost overlay: per-particle activation levels that fade linearly.

use std::collections::HashMap;

use glam::Vec3;

/// Fraction of one fade step below which a level counts as fully faded.
/// Absorbs f32 rounding left over after `1 / fade` subtractions.
const FADE_TOLERANCE: f32 = 0.05;

/// Sparse map from particle index to activation level in `(0, 1]`
#[derive(Debug, Default, Clone)]
pub struct FrostStore {
    levels: HashMap<usize, f32>,
}

impl FrostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set every particle within `radius` of `point` to full activation.
    ///
    /// `positions` are the current deformed positions of the owning grid.
    /// Returns the number of particles (re)activated.
    pub fn activate_near(&mut self, positions: &[[f32; 3]], point: Vec3, radius: f32) -> usize {
        let radius_sq = radius * radius;
        let mut activated = 0;
        for (index, position) in positions.iter().enumerate() {
            if Vec3::from_array(*position).distance_squared(point) <= radius_sq {
                self.levels.insert(index, 1.0);
                activated += 1;
            }
        }
        activated
    }

    /// Fade every entry by `fade_rate`, dropping the ones that reach zero.
    ///
    /// A level within 5% of one step of zero is dropped as well, so rounding
    /// never stretches a fade by an extra tick. For very small rates
    /// (below ~1e-4) the accumulated f32 error over thousands of ticks can
    /// exceed one step; the entry then ends a few ticks from `1 / fade_rate`.
    pub fn tick(&mut self, fade_rate: f32) {
        let fade = fade_rate.max(0.0);
        let tolerance = fade * FADE_TOLERANCE;
        self.levels.retain(|_, level| {
            *level -= fade;
            *level > tolerance
        });
    }

    /// Current level in `[0, 1]`; 0 for inactive or unknown indices.
    pub fn level_of(&self, index: usize) -> f32 {
        self.levels
            .get(&index)
            .map_or(0.0, |level| level.clamp(0.0, 1.0))
    }

    pub fn contains(&self, index: usize) -> bool {
        self.levels.contains_key(&index)
    }

    /// Drop entries that do not fit a grid of `len` particles.
    pub fn truncate(&mut self, len: usize) {
        self.levels.retain(|&index, _| index < len);
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn clear(&mut self) {
        self.levels.clear();
    }
}

/// Alpha after the frost boost; moves alpha toward 1 by `level × opacity`.
pub fn boost_alpha(alpha: f32, level: f32, opacity: f32) -> f32 {
    let boost = (level * opacity).clamp(0.0, 1.0);
    (alpha + (1.0 - alpha) * boost).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<[f32; 3]> {
        (0..n).map(|i| [i as f32, 0.0, 0.0]).collect()
    }

    #[test]
    fn test_activate_within_radius() {
        let mut frost = FrostStore::new();
        let activated = frost.activate_near(&line(20), Vec3::new(5.0, 0.0, 0.0), 2.0);
        assert_eq!(activated, 5);
        for index in 3..=7 {
            assert_eq!(frost.level_of(index), 1.0);
        }
        assert_eq!(frost.level_of(2), 0.0);
        assert_eq!(frost.level_of(8), 0.0);
    }

    #[test]
    fn test_fades_out_after_hundred_ticks() {
        let mut frost = FrostStore::new();
        frost.activate_near(&line(1), Vec3::ZERO, 0.5);

        let mut last = frost.level_of(0);
        for tick in 1..100 {
            frost.tick(0.01);
            let level = frost.level_of(0);
            assert!(level < last, "tick {tick}: {level} !< {last}");
            assert!(level > 0.0, "faded early at tick {tick}");
            last = level;
        }
        frost.tick(0.01);
        assert_eq!(frost.level_of(0), 0.0);
        assert!(!frost.contains(0));
        assert!(frost.is_empty());

        frost.tick(0.01);
        assert!(!frost.contains(0));
    }

    #[test]
    fn test_reactivation_resets_level() {
        let mut frost = FrostStore::new();
        let positions = line(3);
        frost.activate_near(&positions, Vec3::ZERO, 0.5);
        for _ in 0..30 {
            frost.tick(0.01);
        }
        assert!(frost.level_of(0) < 0.8);
        frost.activate_near(&positions, Vec3::ZERO, 0.5);
        assert_eq!(frost.level_of(0), 1.0);
        assert_eq!(frost.len(), 1);
    }

    #[test]
    fn test_truncate_drops_stale_indices() {
        let mut frost = FrostStore::new();
        frost.activate_near(&line(10), Vec3::new(9.0, 0.0, 0.0), 3.0);
        assert_eq!(frost.len(), 4);
        frost.truncate(8);
        assert_eq!(frost.len(), 2);
        assert!(frost.contains(6) && frost.contains(7));
    }

    #[test]
    fn test_fades_out_after_thousand_slow_ticks() {
        let mut frost = FrostStore::new();
        frost.activate_near(&line(1), Vec3::ZERO, 0.5);
        for tick in 1..1000 {
            frost.tick(0.001);
            assert!(frost.contains(0), "faded early at tick {tick}");
        }
        frost.tick(0.001);
        assert!(frost.is_empty());
    }

    #[test]
    fn test_tiny_fade_keeps_positive_levels() {
        let mut frost = FrostStore::new();
        frost.levels.insert(0, 2e-4);
        for _ in 0..3 {
            frost.tick(5e-5);
        }
        // 5e-5 left: still positive, still present
        assert!(frost.contains(0));
        assert!(frost.level_of(0) > 0.0);
        frost.tick(5e-5);
        assert!(frost.is_empty());
    }

    #[test]
    fn test_boost_alpha_bounds() {
        assert_eq!(boost_alpha(0.4, 0.0, 0.5), 0.4);
        assert_eq!(boost_alpha(0.0, 1.0, 1.0), 1.0);
        let boosted = boost_alpha(0.5, 1.0, 0.1);
        assert!(boosted > 0.5 && boosted <= 1.0);
    }
}
