//! Error types for stacktile.
//!
//! Uses thiserror for structured errors with context. Errors are split into
//! two categories matching where they are detected:
//! - [`ConfigError`]: bad caller-supplied configuration (sizes, split counts)
//! - [`ValidationError`]: inputs that are structurally inconsistent with the
//!   volume being partitioned (rank mismatches, empty groups, coordinates
//!   outside the serializable range)
//!
//! All errors are raised synchronously at the call that detects them; the
//! core never retries. The one deliberately lenient behavior is temporal
//! gap-fill during assembly, which is documented on
//! [`assemble_timepoints`](crate::assemble::assemble_timepoints) rather than
//! surfaced as an error.

use thiserror::Error;

/// Top-level error type for stacktile.
///
/// This enum encompasses all error categories and enables automatic
/// conversion between specific error types.
#[derive(Error, Debug)]
pub enum StacktileError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors from caller-supplied configuration.
///
/// These are caught when a partition strategy is constructed, before any
/// volume data is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Malformed size string '{input}': expected digits with an optional k/m/g/t suffix")]
    MalformedSize { input: String },

    #[error("Block size must be positive; got '{input}'")]
    NonPositiveSize { input: String },

    #[error("All split counts must be positive; got {splits:?}")]
    NonPositiveSplit { splits: Vec<usize> },

    #[error("Split count {splits} exceeds dimension extent {extent} on axis {axis}")]
    SplitExceedsDimension {
        axis: usize,
        splits: usize,
        extent: usize,
    },

    #[error("Partition count override must be positive")]
    NonPositivePartitions,
}

/// Errors from inputs that are inconsistent with the volume being processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Split spec has rank {splits} but volume has rank {dims}")]
    RankMismatch { splits: usize, dims: usize },

    #[error("Slice lists cover {slices} dimensions but volume has rank {dims}")]
    SliceRankMismatch { slices: usize, dims: usize },

    #[error("Volume shape {got:?} does not match the first volume's shape {expected:?}")]
    VolumeShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("Cannot assemble an empty group of blocks")]
    EmptyGroup,

    #[error("Coordinate {coordinate} on axis {axis} exceeds the signed 16-bit record range")]
    CoordinateOutOfRange { axis: usize, coordinate: usize },
}

/// Result type alias for stacktile operations.
pub type StacktileResult<T> = Result<T, StacktileError>;

/// Result type alias for configuration handling.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for validation-checked operations.
pub type ValidationResult<T> = Result<T, ValidationError>;
