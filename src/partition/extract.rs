//! Extraction of spatial blocks from a single timepoint's volume.

use crate::core::error::{ValidationError, ValidationResult};
use crate::core::types::{BlockKey, SliceRange};
use itertools::Itertools;
use ndarray::{ArrayD, Axis};

/// Cut one timepoint's volume into blocks along the given per-dimension
/// slice lists.
///
/// One block is produced per combination in the cartesian product of the
/// slice lists. Each block is the sliced sub-volume with a new length-1
/// leading temporal axis, keyed by a [`BlockKey`] whose `origshape` is
/// `[total_timepoints] ++ volume.shape()` and whose slices are the unit
/// temporal range at `timepoint` followed by the spatial slices used.
///
/// The input volume is only read; every block owns its data, so downstream
/// stages never alias the source. Emission order follows the cartesian
/// product and carries no meaning beyond local ordering within one call.
pub fn extract_blocks<T: Clone>(
    volume: &ArrayD<T>,
    timepoint: usize,
    total_timepoints: usize,
    per_dim_slices: &[Vec<SliceRange>],
) -> ValidationResult<Vec<(BlockKey, ArrayD<T>)>> {
    if per_dim_slices.len() != volume.ndim() {
        return Err(ValidationError::SliceRankMismatch {
            slices: per_dim_slices.len(),
            dims: volume.ndim(),
        });
    }

    let mut origshape = Vec::with_capacity(volume.ndim() + 1);
    origshape.push(total_timepoints);
    origshape.extend_from_slice(volume.shape());

    let blocks = per_dim_slices
        .iter()
        .map(|dim_slices| dim_slices.iter().copied())
        .multi_cartesian_product()
        .map(|block_slices| {
            let view = volume.slice_each_axis(|ad| block_slices[ad.axis.index()].into());
            let block = view.to_owned().insert_axis(Axis(0));

            let mut origslices = Vec::with_capacity(block_slices.len() + 1);
            origslices.push(SliceRange::single(timepoint));
            origslices.extend(block_slices);

            (BlockKey::new(origshape.clone(), origslices), block)
        })
        .collect();
    Ok(blocks)
}
