//! Error types for configuration parsing and debug snapshots.
//!
//! The simulation itself has no failure modes; these only surface at the
//! host boundary (CLI overrides, PNG output).

/// Errors from validating or overriding an [`crate::params::EngineConfig`].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    /// A recognized key was given a value that does not parse.
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
    /// A value parsed but is outside the range the simulation accepts.
    #[error("{key} out of range: {reason}")]
    OutOfRange { key: &'static str, reason: String },
    /// Unknown flicker color mode or pattern name.
    #[error("unknown mode {0:?}")]
    UnknownMode(String),
}

/// Errors from writing a debug snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Requested image has a zero dimension.
    #[error("empty snapshot size {0}x{1}")]
    EmptySize(u32, u32),
    /// Requested image exceeds the largest supported side length.
    #[error("snapshot size {0}x{1} exceeds {max} pixels per side", max = crate::snapshot::MAX_SIDE)]
    TooLarge(u32, u32),
}
