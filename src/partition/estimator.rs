//! Split-count estimation from a target block byte size.
//!
//! The attainable tilings of a volume form a single monotone sequence: start
//! from one block per volume, then repeatedly increase the split count of the
//! rightmost (fastest-varying) dimension by one until that dimension is fully
//! split, then move one dimension to the left, and so on. For spatial
//! dimensions `(5, 10, 3)` the sequence runs `(1,1,1)`, `(1,1,2)`, `(1,1,3)`,
//! `(1,2,3)`, ... `(1,10,3)`, `(2,10,3)`, ... `(5,10,3)`.
//!
//! [`TilingSequence`] exposes that sequence indexed finest-to-coarsest, so the
//! average block cell count is monotonically non-decreasing in the index and a
//! standard leftmost binary search finds the smallest tiling whose blocks
//! reach a requested byte size.

use crate::core::error::{ConfigError, ConfigResult};
use log::debug;

/// A requested average block size, either already in bytes or as a
/// human-readable size string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockSize {
    /// Size in bytes.
    Bytes(u64),
    /// Size string such as `"256k"` or `"150M"`; parsed with
    /// [`parse_memory_string`].
    Text(String),
}

impl BlockSize {
    /// Resolve to a positive byte count.
    pub fn resolve(&self) -> ConfigResult<u64> {
        match self {
            BlockSize::Bytes(0) => Err(ConfigError::NonPositiveSize {
                input: "0".to_string(),
            }),
            BlockSize::Bytes(n) => Ok(*n),
            BlockSize::Text(s) => parse_memory_string(s),
        }
    }
}

impl From<u64> for BlockSize {
    fn from(bytes: u64) -> Self {
        BlockSize::Bytes(bytes)
    }
}

impl From<&str> for BlockSize {
    fn from(s: &str) -> Self {
        BlockSize::Text(s.to_string())
    }
}

/// Parse a memory size string like `"4096"`, `"256k"` or `"1G"` into bytes.
///
/// Suffixes `k`, `m`, `g`, `t` (case-insensitive) are kibi/mebi/gibi/tebi
/// multipliers. Rejects empty, malformed, and zero-valued input.
pub fn parse_memory_string(input: &str) -> ConfigResult<u64> {
    let trimmed = input.trim();
    let malformed = || ConfigError::MalformedSize {
        input: input.to_string(),
    };

    let (digits, multiplier) = match trimmed.chars().last() {
        None => return Err(malformed()),
        Some(c) if c.is_ascii_digit() => (trimmed, 1u64),
        Some(c) => {
            let head = &trimmed[..trimmed.len() - c.len_utf8()];
            let mult = match c.to_ascii_lowercase() {
                'k' => 1u64 << 10,
                'm' => 1u64 << 20,
                'g' => 1u64 << 30,
                't' => 1u64 << 40,
                _ => return Err(malformed()),
            };
            (head, mult)
        }
    };

    let value: u64 = digits.parse().map_err(|_| malformed())?;
    let bytes = value.checked_mul(multiplier).ok_or_else(malformed)?;
    if bytes == 0 {
        return Err(ConfigError::NonPositiveSize {
            input: input.to_string(),
        });
    }
    Ok(bytes)
}

/// The monotone sequence of attainable tilings for a set of spatial
/// dimensions, indexed from finest (index 0, every dimension fully split) to
/// coarsest (last index, one block per volume).
#[derive(Debug, Clone)]
pub struct TilingSequence {
    dims: Vec<usize>,
}

impl TilingSequence {
    /// Create the sequence for the given spatial dimensions.
    pub fn new(dims: &[usize]) -> Self {
        debug_assert!(dims.iter().all(|&d| d > 0));
        Self {
            dims: dims.to_vec(),
        }
    }

    /// Number of distinct tilings: one split increment per unit of every
    /// dimension beyond the first, plus the trivial tiling.
    pub fn num_tilings(&self) -> usize {
        self.dims.iter().map(|&d| d - 1).sum::<usize>() + 1
    }

    /// The split counts at `index`, finest tiling first.
    ///
    /// The underlying coarse-to-fine generation spends a split-increment
    /// budget on the rightmost dimension before moving left; indexing here is
    /// reversed so the sequence of average block sizes is non-decreasing.
    pub fn splits_at(&self, index: usize) -> Vec<usize> {
        let last = self.num_tilings() - 1;
        let budget = last - index.min(last);
        self.splits_for_budget(budget)
    }

    /// Average block cell count (real-valued) for the tiling at `index`.
    pub fn avg_block_cells(&self, index: usize) -> f64 {
        let splits = self.splits_at(index);
        self.dims
            .iter()
            .zip(&splits)
            .map(|(&d, &s)| d as f64 / s as f64)
            .product()
    }

    fn splits_for_budget(&self, mut budget: usize) -> Vec<usize> {
        let mut splits = vec![1; self.dims.len()];
        for i in (0..self.dims.len()).rev() {
            let delta = (self.dims[i] - 1).min(budget);
            splits[i] += delta;
            budget -= delta;
            if budget == 0 {
                break;
            }
        }
        splits
    }
}

/// Choose split counts so the average block comes close to a target byte
/// size.
///
/// `num_timepoints * element_size` is the byte size of one pixel's full time
/// series; a block of `c` average cells occupies `c` times that. The smallest
/// tiling whose blocks reach the target is selected; a target larger than the
/// whole volume clamps to the trivial tiling `(1, 1, ..., 1)`.
pub fn splits_for_block_size(
    target: impl Into<BlockSize>,
    dims: &[usize],
    num_timepoints: usize,
    element_size: usize,
) -> ConfigResult<Vec<usize>> {
    debug_assert!(num_timepoints > 0 && element_size > 0);
    let target_bytes = target.into().resolve()?;
    let base_series_bytes = (num_timepoints * element_size) as f64;
    let threshold = target_bytes as f64 / base_series_bytes;

    let seq = TilingSequence::new(dims);
    let total = seq.num_tilings();
    let mut lo = 0usize;
    let mut hi = total;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if seq.avg_block_cells(mid) < threshold {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    // A target beyond the whole volume clamps to the coarsest tiling.
    let index = lo.min(total - 1);

    let splits = seq.splits_at(index);
    debug!(
        "block size target {} bytes over dims {:?}: tiling index {}/{} -> splits {:?}",
        target_bytes,
        dims,
        index,
        total,
        splits
    );
    Ok(splits)
}
