//! Full-image reconstruction from assembled blocks.
//!
//! The inverse of series extraction: an assembled spatio-temporal block is
//! split back into one spatial block per timepoint, those are regrouped by
//! timepoint across all spatial positions, and each timepoint's group is
//! stitched into a full image volume.

use crate::core::error::{ValidationError, ValidationResult};
use crate::core::types::{BlockKey, SliceRange};
use ndarray::{ArrayD, Axis, IxDyn};

/// Split an assembled block into per-timepoint spatial blocks.
///
/// For each timepoint covered by the key's temporal slice, the block's row
/// at that timepoint is squeezed to a purely spatial array and re-keyed with
/// a unit temporal slice at that timepoint. The timepoint is returned
/// alongside as the grouping key for the external collaborator's
/// `groupByKey`/`sortByKey` stage (or the local driver's regrouping).
pub fn planar_blocks<T: Clone>(
    key: &BlockKey,
    block: &ArrayD<T>,
) -> Vec<(usize, (BlockKey, ArrayD<T>))> {
    key.origslices()[0]
        .indices()
        .enumerate()
        .map(|(row, timepoint)| {
            let plane = block.index_axis(Axis(0), row).to_owned();

            let mut origslices = Vec::with_capacity(key.origslices().len());
            origslices.push(SliceRange::single(timepoint));
            origslices.extend_from_slice(key.spatial_slices());
            let plane_key = BlockKey::new(key.origshape().to_vec(), origslices);

            (timepoint, (plane_key, plane))
        })
        .collect()
}

/// Stitch one timepoint's spatial blocks back into a full image volume.
///
/// The output shape is the spatial part of the keys' `origshape`; every
/// block is written at its own spatial slices. Positions not covered by any
/// block stay at the element type's default value, mirroring the assembler's
/// lenient gap policy.
///
/// Fails with [`ValidationError::EmptyGroup`] on an empty iterator.
pub fn stitch_image<T: Clone + Default>(
    group: impl IntoIterator<Item = (BlockKey, ArrayD<T>)>,
) -> ValidationResult<ArrayD<T>> {
    let mut image: Option<ArrayD<T>> = None;
    for (key, block) in group {
        let img = image.get_or_insert_with(|| {
            ArrayD::from_elem(IxDyn(&key.origshape()[1..]), T::default())
        });
        let spatial = key.spatial_slices().to_vec();
        img.slice_each_axis_mut(|ad| spatial[ad.axis.index()].into())
            .assign(&block);
    }
    image.ok_or(ValidationError::EmptyGroup)
}
