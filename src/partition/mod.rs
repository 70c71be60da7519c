//! Partitioning of timepoint volumes into rectangular spatial blocks.
//!
//! The flow is: choose split counts (explicitly or via the block-size
//! estimator), tile each dimension into near-equal slices, then cut every
//! timepoint's volume along the cartesian product of those slices.

pub mod estimator;
pub mod extract;
pub mod slices;
pub mod strategy;

pub use estimator::{parse_memory_string, splits_for_block_size, BlockSize, TilingSequence};
pub use extract::extract_blocks;
pub use slices::generate_slices;
pub use strategy::PartitionStrategy;
