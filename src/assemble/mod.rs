//! Reassembly of same-position blocks across timepoints.

use crate::core::error::{ValidationError, ValidationResult};
use crate::core::types::{BlockKey, SliceRange};
use ndarray::{ArrayD, IxDyn, Slice};

/// Merge all timepoint-blocks sharing one spatial position into a single
/// block spanning the volume's full temporal range.
///
/// The accumulator has one row per timepoint in the *entire* volume, not just
/// the timepoints present in the group; each incoming block is written at the
/// row range of its own temporal slice. Timepoints absent from the group are
/// left at the element type's default value (zero for numeric types). This
/// gap-fill is deliberate lenient policy: an orchestrator that requires
/// completeness must check group sizes itself before calling in.
///
/// The returned key keeps the first key's `origshape` and spatial slices and
/// replaces the temporal slice with the full range. Spatial slices are
/// identical across the group by construction, so only the first key is
/// consulted.
///
/// Fails with [`ValidationError::EmptyGroup`] on an empty iterator.
pub fn assemble_timepoints<T: Clone + Default>(
    group: impl IntoIterator<Item = (BlockKey, ArrayD<T>)>,
) -> ValidationResult<(BlockKey, ArrayD<T>)> {
    let mut accumulator: Option<ArrayD<T>> = None;
    let mut first_key: Option<BlockKey> = None;

    for (key, block) in group {
        let acc = accumulator.get_or_insert_with(|| {
            let mut shape = Vec::with_capacity(block.ndim());
            shape.push(key.num_timepoints());
            shape.extend_from_slice(&block.shape()[1..]);
            ArrayD::from_elem(IxDyn(&shape), T::default())
        });

        let temporal = key.origslices()[0];
        acc.slice_each_axis_mut(|ad| {
            if ad.axis.index() == 0 {
                temporal.into()
            } else {
                Slice::from(..)
            }
        })
        .assign(&block);

        first_key.get_or_insert(key);
    }

    match (first_key, accumulator) {
        (Some(key), Some(acc)) => {
            let mut origslices = Vec::with_capacity(key.origslices().len());
            origslices.push(SliceRange::full(key.num_timepoints()));
            origslices.extend_from_slice(key.spatial_slices());
            Ok((BlockKey::new(key.origshape().to_vec(), origslices), acc))
        }
        _ => Err(ValidationError::EmptyGroup),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{extract_blocks, generate_slices};
    use ndarray::{ArrayD, IxDyn};

    fn volume_filled(dims: &[usize], value: f64) -> ArrayD<f64> {
        ArrayD::from_elem(IxDyn(dims), value)
    }

    /// Extract the block at one spatial position from several timepoints.
    fn group_for_position(
        dims: &[usize],
        splits: &[usize],
        timepoints: &[usize],
        total: usize,
        position: usize,
    ) -> Vec<(BlockKey, ArrayD<f64>)> {
        let slices = generate_slices(splits, dims).unwrap();
        timepoints
            .iter()
            .map(|&tp| {
                let volume = volume_filled(dims, (tp + 1) as f64);
                let mut blocks = extract_blocks(&volume, tp, total, &slices).unwrap();
                blocks.swap_remove(position)
            })
            .collect()
    }

    #[test]
    fn test_complete_group_reassembles_all_timepoints() {
        let group = group_for_position(&[6, 6], &[2, 2], &[0, 1, 2], 3, 0);
        let (key, merged) = assemble_timepoints(group).unwrap();

        assert_eq!(merged.shape(), &[3, 3, 3]);
        assert_eq!(key.origslices()[0], SliceRange::full(3));
        assert_eq!(key.spatial_key(), vec![0, 0]);
        for tp in 0..3 {
            for value in merged.index_axis(ndarray::Axis(0), tp) {
                assert_eq!(*value, (tp + 1) as f64);
            }
        }
    }

    #[test]
    fn test_out_of_order_group_lands_in_temporal_order() {
        let group = group_for_position(&[4, 4], &[2, 2], &[2, 0, 1], 3, 3);
        let (_, merged) = assemble_timepoints(group).unwrap();
        for tp in 0..3 {
            for value in merged.index_axis(ndarray::Axis(0), tp) {
                assert_eq!(*value, (tp + 1) as f64);
            }
        }
    }

    #[test]
    fn test_incomplete_group_zero_fills_missing_timepoints() {
        // Timepoint 1 of 3 never arrives.
        let group = group_for_position(&[4, 4], &[1, 1], &[0, 2], 3, 0);
        let (key, merged) = assemble_timepoints(group).unwrap();

        assert_eq!(merged.shape(), &[3, 4, 4]);
        assert_eq!(key.num_timepoints(), 3);
        for value in merged.index_axis(ndarray::Axis(0), 0) {
            assert_eq!(*value, 1.0);
        }
        for value in merged.index_axis(ndarray::Axis(0), 1) {
            assert_eq!(*value, 0.0);
        }
        for value in merged.index_axis(ndarray::Axis(0), 2) {
            assert_eq!(*value, 3.0);
        }
    }

    #[test]
    fn test_empty_group_rejected() {
        let group: Vec<(BlockKey, ArrayD<f64>)> = Vec::new();
        assert_eq!(
            assemble_timepoints(group).unwrap_err(),
            ValidationError::EmptyGroup
        );
    }
}
