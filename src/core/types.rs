//! Core positional types threaded through the partition/assemble/reconstruct
//! pipeline.
//!
//! A volume is partitioned into rectangular blocks; each block carries a
//! [`BlockKey`] recording where it sits inside the full spatio-temporal
//! volume. The key is the only state that survives the external shuffle and
//! group stages, so it must be enough on its own to recover every original
//! coordinate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open index range `[start, stop)` with unit step along one dimension.
///
/// Ranges produced by the slice generator for a dimension are contiguous,
/// ordered, non-overlapping, and union to exactly `[0, extent)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SliceRange {
    /// Inclusive start index.
    pub start: usize,
    /// Exclusive stop index.
    pub stop: usize,
}

impl SliceRange {
    /// Create a new range. `start <= stop` holds by construction everywhere
    /// ranges are produced; inverted bounds indicate a caller bug.
    pub fn new(start: usize, stop: usize) -> Self {
        debug_assert!(stop >= start, "inverted slice bounds: [{}, {})", start, stop);
        Self { start, stop }
    }

    /// The full range `[0, extent)` over a dimension.
    pub fn full(extent: usize) -> Self {
        Self {
            start: 0,
            stop: extent,
        }
    }

    /// The unit range `[index, index + 1)`.
    pub fn single(index: usize) -> Self {
        Self {
            start: index,
            stop: index + 1,
        }
    }

    /// Number of indices covered.
    pub fn len(&self) -> usize {
        self.stop - self.start
    }

    /// Whether the range covers no indices.
    pub fn is_empty(&self) -> bool {
        self.stop == self.start
    }

    /// Whether `index` falls inside the range.
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.stop
    }

    /// Iterate the covered indices in order.
    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start..self.stop
    }
}

impl fmt::Display for SliceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.stop)
    }
}

impl From<SliceRange> for ndarray::Slice {
    fn from(range: SliceRange) -> Self {
        ndarray::Slice::from(range.start..range.stop)
    }
}

/// Positional metadata for one extracted block.
///
/// `origshape` is the full `(time, *spatial)` shape of the volume the block
/// was cut from; `origslices` holds one leading temporal range plus one range
/// per spatial dimension, locating the block inside that shape. Keys are
/// created once by the extractor, re-created once by the temporal assembler
/// (with a full-range temporal slice), and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockKey {
    origshape: Vec<usize>,
    origslices: Vec<SliceRange>,
}

impl BlockKey {
    /// Build a key from the original volume shape and the block's slices.
    ///
    /// Both sequences start with the temporal axis. The two must have equal
    /// length; this is guaranteed by construction in the extractor and
    /// assembler, and debug-asserted here.
    pub fn new(origshape: Vec<usize>, origslices: Vec<SliceRange>) -> Self {
        debug_assert_eq!(origshape.len(), origslices.len());
        Self {
            origshape,
            origslices,
        }
    }

    /// Full `(time, *spatial)` shape of the originating volume.
    pub fn origshape(&self) -> &[usize] {
        &self.origshape
    }

    /// Temporal slice followed by one slice per spatial dimension.
    pub fn origslices(&self) -> &[SliceRange] {
        &self.origslices
    }

    /// The timepoint index this block was extracted at.
    ///
    /// After temporal assembly the leading slice covers the full temporal
    /// range and this returns 0.
    pub fn temporal_key(&self) -> usize {
        self.origslices[0].start
    }

    /// Starting spatial indices of the block, in the array's native storage
    /// order.
    ///
    /// This is the grouping key used to collect same-position blocks across
    /// timepoints. Note that native storage order is typically the reverse of
    /// a conventional `x, y, z` coordinate order; callers that need the
    /// latter must reverse it themselves.
    pub fn spatial_key(&self) -> Vec<usize> {
        self.origslices[1..].iter().map(|sl| sl.start).collect()
    }

    /// The spatial slices, without the leading temporal slice.
    pub fn spatial_slices(&self) -> &[SliceRange] {
        &self.origslices[1..]
    }

    /// Total timepoints in the originating volume.
    pub fn num_timepoints(&self) -> usize {
        self.origshape[0]
    }

    /// Shape of the block this key describes, `(time, *spatial)`.
    pub fn block_shape(&self) -> Vec<usize> {
        self.origslices.iter().map(|sl| sl.len()).collect()
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockKey(origshape={:?}, origslices=[", self.origshape)?;
        for (i, sl) in self.origslices.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", sl)?;
        }
        write!(f, "])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_range_basics() {
        let sl = SliceRange::new(3, 8);
        assert_eq!(sl.len(), 5);
        assert!(!sl.is_empty());
        assert!(sl.contains(3));
        assert!(sl.contains(7));
        assert!(!sl.contains(8));
        assert_eq!(sl.indices().collect::<Vec<_>>(), vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_slice_range_single_and_full() {
        assert_eq!(SliceRange::single(4), SliceRange::new(4, 5));
        assert_eq!(SliceRange::full(10), SliceRange::new(0, 10));
        assert!(SliceRange::new(2, 2).is_empty());
    }

    #[test]
    #[should_panic(expected = "inverted slice bounds")]
    fn test_inverted_bounds_panic_in_debug() {
        let _ = SliceRange::new(5, 2);
    }

    #[test]
    fn test_block_key_views() {
        let key = BlockKey::new(
            vec![10, 12, 12],
            vec![
                SliceRange::single(3),
                SliceRange::new(0, 6),
                SliceRange::new(6, 12),
            ],
        );
        assert_eq!(key.temporal_key(), 3);
        assert_eq!(key.spatial_key(), vec![0, 6]);
        assert_eq!(key.num_timepoints(), 10);
        assert_eq!(key.block_shape(), vec![1, 6, 6]);
    }

    #[test]
    fn test_block_key_serde_round_trip() {
        let key = BlockKey::new(
            vec![4, 8],
            vec![SliceRange::single(1), SliceRange::new(4, 8)],
        );
        let json = serde_json::to_string(&key).unwrap();
        let back: BlockKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, back);
    }
}
