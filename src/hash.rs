//! Deterministic sine hashes used for per-particle flicker and jitter.
//!
//! Not cryptographic and not well distributed; they only need to look noisy.
//! Several callers mix wall-clock time into the seed, so output repeats only
//! when the same time is supplied again. Tests inject fixed times.

/// Hash a seed into `[0, 1)`.
#[inline]
pub fn hash(seed: f64) -> f32 {
    let x = seed.sin() * 10_000.0;
    let fract = (x - x.floor()) as f32;
    // f64 → f32 rounding can land on 1.0 exactly
    if fract >= 1.0 {
        0.0
    } else {
        fract
    }
}

/// Per-particle phase seed in `[0, 1000)`, derived from the particle index.
#[inline]
pub fn index_seed(index: usize, multiplier: f64) -> f32 {
    ((index as f64 * multiplier) % 1000.0) as f32
}
