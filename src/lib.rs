//! # Stacktile - Block Partitioning for Multi-Timepoint Image Volumes
//!
//! Stacktile partitions a multi-dimensional, multi-timepoint image volume
//! into non-overlapping rectangular blocks for distributed processing, and
//! reconstructs per-pixel time series or full images from those blocks.
//!
//! ## Features
//!
//! - **Deterministic tiling**: Near-equal-size spatial blocks from a split
//!   count per dimension; extents along any dimension differ by at most one
//! - **Block-size estimation**: Pick the split counts automatically from a
//!   target block byte size via monotone binary search over the tiling space
//! - **Lossless positional metadata**: Every block carries a [`BlockKey`]
//!   that survives the external shuffle and recovers original coordinates
//! - **Series reconstruction**: Lazy, restartable iteration of per-pixel
//!   time series, plus a compact binary record serialization
//! - **Image reconstruction**: Per-timepoint regrouping and stitching of
//!   assembled blocks back into full image volumes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stacktile::prelude::*;
//! use ndarray::{ArrayD, IxDyn};
//!
//! // Four timepoints of a 12x12 volume.
//! let volumes: Vec<ArrayD<f32>> = (0..4)
//!     .map(|t| ArrayD::from_elem(IxDyn(&[12, 12]), t as f32))
//!     .collect();
//!
//! // Two splits per dimension: four 6x6 blocks per timepoint.
//! let strategy = PartitionStrategy::from_splits(vec![2, 2])?;
//!
//! // Or aim for ~256 KiB blocks instead:
//! // let strategy = PartitionStrategy::from_block_size("256k", &[12, 12], 4, 4)?;
//!
//! for (coordinate, series) in to_series(&volumes, &strategy)? {
//!     println!("{:?} -> {:?}", coordinate, series);
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`core`]: Positional types ([`SliceRange`], [`BlockKey`]) and the error
//!   taxonomy
//! - [`partition`]: Split-count estimation, dimension tiling, and block
//!   extraction
//! - [`assemble`]: Merging same-position blocks across timepoints
//! - [`series`]: Per-pixel series iteration, full-image reconstruction, and
//!   binary record serialization
//! - [`pipeline`]: A synchronous in-memory driver wiring the stages together
//!
//! Every operation is a pure function from inputs to outputs with no shared
//! mutable state: the stages are designed to be handed to an external
//! distributed map/group/sort collaborator as per-record callables and may be
//! invoked concurrently without locking. Distribution itself, network
//! shuffling, and storage I/O are out of scope.
//!
//! [`BlockKey`]: core::types::BlockKey
//! [`SliceRange`]: core::types::SliceRange

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assemble;
pub mod core;
pub mod partition;
pub mod pipeline;
pub mod series;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use stacktile::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{BlockKey, SliceRange};

    // Errors
    pub use crate::core::error::{
        ConfigError, ConfigResult, StacktileError, StacktileResult, ValidationError,
        ValidationResult,
    };

    // Partitioning
    pub use crate::partition::estimator::{
        parse_memory_string, splits_for_block_size, BlockSize, TilingSequence,
    };
    pub use crate::partition::extract::extract_blocks;
    pub use crate::partition::slices::generate_slices;
    pub use crate::partition::strategy::PartitionStrategy;

    // Assembly
    pub use crate::assemble::assemble_timepoints;

    // Series and image reconstruction
    pub use crate::series::binary::{binary_label, to_binary_records};
    pub use crate::series::images::{planar_blocks, stitch_image};
    pub use crate::series::reconstruct::series_iter;

    // Local driver
    pub use crate::pipeline::{
        assemble_groups, group_by_spatial_key, partition_volumes, to_binary_series, to_images,
        to_series,
    };
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
