//! Compact binary serialization of reconstructed series.
//!
//! One record per pixel: the spatial coordinate as signed 16-bit integers
//! followed by the raw series bytes in the element type's native layout. No
//! padding, separators, header, or footer; records concatenate directly so a
//! reader only needs the spatial rank, the timepoint count, and the element
//! size to walk the stream.

use crate::core::error::{ValidationError, ValidationResult};
use crate::core::types::BlockKey;
use crate::series::reconstruct::series_iter;
use itertools::Itertools;
use ndarray::ArrayD;

/// Block label for a key's spatial position.
///
/// Components are formatted `key{dim:02}_{coord:05}` using native dimension
/// indices, then joined with `-` in reverse dimension order so the rightmost
/// spatial dimension prints first. A 3-D spatial key `(0, 5, 10)` yields
/// `key02_00010-key01_00005-key00_00000`. Downstream file naming appends the
/// `.bin` extension; sorting the labels lexicographically orders files by the
/// conventional x,y,z coordinate interpretation.
pub fn binary_label(key: &BlockKey) -> String {
    key.spatial_key()
        .iter()
        .enumerate()
        .map(|(dim, &coord)| format!("key{:02}_{:05}", dim, coord))
        .rev()
        .join("-")
}

/// Serialize every series in a block to one labeled binary payload.
///
/// The payload is the concatenation, in [`series_iter`] order, of
/// `rank × i16` native-endian coordinates followed by the series's raw
/// element bytes. Fails if any coordinate exceeds the signed 16-bit range.
pub fn to_binary_records<T: bytemuck::Pod>(
    key: &BlockKey,
    block: &ArrayD<T>,
) -> ValidationResult<(String, Vec<u8>)> {
    let label = binary_label(key);

    let rank = key.spatial_slices().len();
    let record_len = rank * std::mem::size_of::<i16>()
        + key.num_timepoints() * std::mem::size_of::<T>();
    let num_series: usize = key.spatial_slices().iter().map(|sl| sl.len()).product();
    let mut payload = Vec::with_capacity(num_series * record_len);

    for (coordinate, series) in series_iter(key, block) {
        for (axis, &coord) in coordinate.iter().enumerate() {
            let packed =
                i16::try_from(coord).map_err(|_| ValidationError::CoordinateOutOfRange {
                    axis,
                    coordinate: coord,
                })?;
            payload.extend_from_slice(&packed.to_ne_bytes());
        }
        for value in series.iter() {
            payload.extend_from_slice(bytemuck::bytes_of(value));
        }
    }
    Ok((label, payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SliceRange;
    use ndarray::{ArrayD, IxDyn};
    use std::io::{Read, Write};

    fn key_for(origshape: Vec<usize>, spatial: Vec<SliceRange>) -> BlockKey {
        let mut origslices = vec![SliceRange::full(origshape[0])];
        origslices.extend(spatial);
        BlockKey::new(origshape, origslices)
    }

    #[test]
    fn test_label_reverses_dimension_order() {
        let key = key_for(
            vec![4, 16, 16, 16],
            vec![
                SliceRange::new(0, 4),
                SliceRange::new(5, 10),
                SliceRange::new(10, 16),
            ],
        );
        assert_eq!(binary_label(&key), "key02_00010-key01_00005-key00_00000");
    }

    #[test]
    fn test_label_single_dimension() {
        let key = key_for(vec![2, 8], vec![SliceRange::new(3, 8)]);
        assert_eq!(binary_label(&key), "key00_00003");
    }

    #[test]
    fn test_payload_layout() {
        // Two timepoints, one 2x1 spatial block at offset (2, 0).
        let key = key_for(
            vec![2, 4, 1],
            vec![SliceRange::new(2, 4), SliceRange::new(0, 1)],
        );
        let block = ArrayD::from_shape_vec(
            IxDyn(&[2, 2, 1]),
            vec![10i32, 11, 20, 21],
        )
        .unwrap();

        let (_, payload) = to_binary_records(&key, &block).unwrap();
        // Per record: 2 coords * 2 bytes + 2 timepoints * 4 bytes.
        assert_eq!(payload.len(), 2 * (4 + 8));

        let mut expected = Vec::new();
        // Coordinate (2, 0), series [10, 20].
        expected.extend_from_slice(&2i16.to_ne_bytes());
        expected.extend_from_slice(&0i16.to_ne_bytes());
        expected.extend_from_slice(&10i32.to_ne_bytes());
        expected.extend_from_slice(&20i32.to_ne_bytes());
        // Coordinate (3, 0), series [11, 21].
        expected.extend_from_slice(&3i16.to_ne_bytes());
        expected.extend_from_slice(&0i16.to_ne_bytes());
        expected.extend_from_slice(&11i32.to_ne_bytes());
        expected.extend_from_slice(&21i32.to_ne_bytes());
        assert_eq!(payload, expected);
    }

    #[test]
    fn test_serialization_is_idempotent() {
        let key = key_for(
            vec![3, 4, 4],
            vec![SliceRange::new(0, 2), SliceRange::new(2, 4)],
        );
        let mut block = ArrayD::<f32>::zeros(IxDyn(&[3, 2, 2]));
        for (i, v) in block.iter_mut().enumerate() {
            *v = i as f32 * 0.5;
        }
        let first = to_binary_records(&key, &block).unwrap();
        let second = to_binary_records(&key, &block).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_coordinate_beyond_i16_rejected() {
        let key = key_for(vec![1, 40_001], vec![SliceRange::new(40_000, 40_001)]);
        let block = ArrayD::<f32>::zeros(IxDyn(&[1, 1]));
        let err = to_binary_records(&key, &block).unwrap_err();
        assert_eq!(
            err,
            ValidationError::CoordinateOutOfRange {
                axis: 0,
                coordinate: 40_000
            }
        );
    }

    #[test]
    fn test_records_survive_a_file_round_trip() {
        let key = key_for(
            vec![2, 3],
            vec![SliceRange::new(0, 3)],
        );
        let block =
            ArrayD::from_shape_vec(IxDyn(&[2, 3]), vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let (label, payload) = to_binary_records(&key, &block).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(format!("{}.bin", label));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&payload).unwrap();
        drop(file);

        let mut bytes = Vec::new();
        std::fs::File::open(&path)
            .unwrap()
            .read_to_end(&mut bytes)
            .unwrap();
        assert_eq!(bytes, payload);
        // 3 records of one i16 coordinate plus two f64 samples.
        assert_eq!(bytes.len(), 3 * (2 + 16));

        // First record is coordinate 0 with series (1.0, 4.0).
        assert_eq!(bytes[0..2], 0i16.to_ne_bytes());
        assert_eq!(bytes[2..10], 1.0f64.to_ne_bytes());
        assert_eq!(bytes[10..18], 4.0f64.to_ne_bytes());
    }
}
