//! Partitioning configuration.
//!
//! A [`PartitionStrategy`] fixes how a volume will be tiled: either from an
//! explicit per-dimension split count or from a target block byte size (which
//! runs the estimator). It also carries the partition-count hint handed to
//! the external distributed collaborator; by default that is the product of
//! the split counts, made explicit here rather than computed as a hidden
//! fallback.

use crate::core::error::{ConfigError, ConfigResult, StacktileError};
use crate::core::types::SliceRange;
use crate::partition::estimator::{splits_for_block_size, BlockSize};
use crate::partition::slices::generate_slices;
use log::debug;

/// Configuration for partitioning a multi-timepoint volume into blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionStrategy {
    splits_per_dim: Vec<usize>,
    num_partitions: Option<usize>,
}

impl PartitionStrategy {
    /// Build a strategy from an explicit per-dimension split count.
    ///
    /// Split counts must be positive; the upper bound against the volume's
    /// dimensions is checked when the strategy is bound to a shape with
    /// [`slices_for`](Self::slices_for).
    pub fn from_splits(splits_per_dim: Vec<usize>) -> ConfigResult<Self> {
        if splits_per_dim.is_empty() || splits_per_dim.iter().any(|&s| s == 0) {
            return Err(ConfigError::NonPositiveSplit {
                splits: splits_per_dim,
            });
        }
        Ok(Self {
            splits_per_dim,
            num_partitions: None,
        })
    }

    /// Build a strategy whose blocks average close to `target` bytes.
    ///
    /// `target` accepts a byte count or a size string such as `"256k"`.
    pub fn from_block_size(
        target: impl Into<BlockSize>,
        dims: &[usize],
        num_timepoints: usize,
        element_size: usize,
    ) -> ConfigResult<Self> {
        let splits_per_dim = splits_for_block_size(target, dims, num_timepoints, element_size)?;
        debug!("estimated splits {:?} for dims {:?}", splits_per_dim, dims);
        Ok(Self {
            splits_per_dim,
            num_partitions: None,
        })
    }

    /// Override the partition count passed to the distributed collaborator.
    pub fn with_num_partitions(mut self, num_partitions: usize) -> ConfigResult<Self> {
        if num_partitions == 0 {
            return Err(ConfigError::NonPositivePartitions);
        }
        self.num_partitions = Some(num_partitions);
        Ok(self)
    }

    /// The per-dimension split counts.
    pub fn splits_per_dim(&self) -> &[usize] {
        &self.splits_per_dim
    }

    /// Partition count for the distributed collaborator.
    ///
    /// Defaults to the product of the split counts, which is the number of
    /// spatial blocks per timepoint.
    pub fn num_partitions(&self) -> usize {
        self.num_partitions
            .unwrap_or_else(|| self.splits_per_dim.iter().product())
    }

    /// Bind the strategy to a concrete volume shape, producing the ordered
    /// per-dimension slice lists used by the extractor.
    ///
    /// Fails if the strategy's rank does not match the volume's, or if any
    /// split count exceeds its dimension.
    pub fn slices_for(&self, dims: &[usize]) -> Result<Vec<Vec<SliceRange>>, StacktileError> {
        generate_slices(&self.splits_per_dim, dims)
    }
}
