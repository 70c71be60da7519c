//! Per-pixel time series from an assembled spatio-temporal block.

use crate::core::types::BlockKey;
use itertools::Itertools;
use ndarray::{Array1, ArrayD, Slice};

/// Iterate every `(coordinate, series)` pair covered by a block.
///
/// Coordinates are absolute volume coordinates (block-local indices offset by
/// each spatial slice's start), yielded in reverse-dimension-major order: the
/// first spatial dimension varies fastest, the last slowest. The series is
/// the block's full temporal axis at that coordinate, squeezed to 1-D.
///
/// The iterator is pure and finite; calling this function again on the same
/// inputs restarts it and yields an identical sequence, which is relied on
/// when a consumer drains the series once and then serializes them a second
/// time.
pub fn series_iter<'a, T: Clone>(
    key: &'a BlockKey,
    block: &'a ArrayD<T>,
) -> impl Iterator<Item = (Vec<usize>, Array1<T>)> + 'a {
    let spatial = key.spatial_slices().to_vec();
    let ranges: Vec<_> = spatial.iter().rev().map(|sl| sl.indices()).collect();
    ranges
        .into_iter()
        .multi_cartesian_product()
        .map(move |mut coordinate| {
            // The product ran over reversed dimensions; restore native order.
            coordinate.reverse();

            let view = block.slice_each_axis(|ad| {
                let axis = ad.axis.index();
                if axis == 0 {
                    Slice::from(..)
                } else {
                    let local = coordinate[axis - 1] - spatial[axis - 1].start;
                    Slice::from(local..local + 1)
                }
            });
            let series: Array1<T> = view.iter().cloned().collect();
            (coordinate, series)
        })
}
