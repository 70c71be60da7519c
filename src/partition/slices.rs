//! Near-equal tiling of each dimension into contiguous index ranges.

use crate::core::error::{ConfigError, StacktileError, ValidationError};
use crate::core::types::SliceRange;

/// Check that every split count is positive and no larger than its dimension.
pub(crate) fn normalize_splits(splits: &[usize], dims: &[usize]) -> Result<(), ConfigError> {
    if splits.iter().any(|&s| s == 0) {
        return Err(ConfigError::NonPositiveSplit {
            splits: splits.to_vec(),
        });
    }
    for (axis, (&s, &d)) in splits.iter().zip(dims).enumerate() {
        if s > d {
            return Err(ConfigError::SplitExceedsDimension {
                axis,
                splits: s,
                extent: d,
            });
        }
    }
    Ok(())
}

/// Tile every dimension into its requested number of contiguous ranges.
///
/// For dimension `i`, `splits[i]` ranges are laid out starting at 0; the
/// first `dims[i] % splits[i]` ranges are one unit longer than the rest, so
/// the longest and shortest range differ by at most 1 and the ranges union to
/// exactly `[0, dims[i])`. With `splits[i] == dims[i]` every range has unit
/// length.
///
/// Returns one ordered range list per dimension. Fails with a rank mismatch
/// if `splits` and `dims` disagree in length, and with a configuration error
/// on zero or dimension-exceeding split counts.
pub fn generate_slices(
    splits: &[usize],
    dims: &[usize],
) -> Result<Vec<Vec<SliceRange>>, StacktileError> {
    if splits.len() != dims.len() {
        return Err(ValidationError::RankMismatch {
            splits: splits.len(),
            dims: dims.len(),
        }
        .into());
    }
    normalize_splits(splits, dims)?;

    let mut slices = Vec::with_capacity(dims.len());
    for (&nsplits, &extent) in splits.iter().zip(dims) {
        let base = extent / nsplits;
        let mut remainder = extent % nsplits;
        let mut start = 0;
        let mut dim_slices = Vec::with_capacity(nsplits);
        for _ in 0..nsplits {
            let mut stop = start + base;
            if remainder > 0 {
                stop += 1;
                remainder -= 1;
            }
            dim_slices.push(SliceRange::new(start, stop.min(extent)));
            start = stop;
        }
        slices.push(dim_slices);
    }
    Ok(slices)
}
