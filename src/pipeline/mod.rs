//! Local in-memory reference driver.
//!
//! In production the stages in [`partition`](crate::partition),
//! [`assemble`](crate::assemble) and [`series`](crate::series) are handed to
//! an external distributed collaborator: [`extract_blocks`] as the per-record
//! callable of a `flatMap` stage, [`assemble_timepoints`] as the per-group
//! callable after a `groupByKey` on [`BlockKey::spatial_key`], and the series
//! functions as a terminal `flatMap`/`map`. This module wires the same
//! composition synchronously over in-memory collections: rayon stands in for
//! the distributed map and a `HashMap` for the shuffle. It doubles as the
//! executable documentation of the intended dataflow and as the end-to-end
//! exercise of every stage.

use crate::assemble::assemble_timepoints;
use crate::core::error::{StacktileError, StacktileResult, ValidationError};
use crate::core::types::BlockKey;
use crate::partition::{extract_blocks, PartitionStrategy};
use crate::series::{planar_blocks, series_iter, stitch_image, to_binary_records};
use log::{debug, info};
use ndarray::{Array1, ArrayD};
use rayon::prelude::*;
use std::collections::HashMap;

/// Partition every timepoint volume into keyed blocks.
///
/// `volumes[i]` is the full spatial array at timepoint `i`; a volume whose
/// shape differs from the first's is rejected before any extraction starts.
/// Extraction runs in parallel across timepoints, which is safe because each
/// call is pure and reads only its own volume.
pub fn partition_volumes<T>(
    volumes: &[ArrayD<T>],
    strategy: &PartitionStrategy,
) -> StacktileResult<Vec<(BlockKey, ArrayD<T>)>>
where
    T: Clone + Send + Sync,
{
    let Some(first) = volumes.first() else {
        return Ok(Vec::new());
    };
    for volume in volumes {
        if volume.shape() != first.shape() {
            return Err(ValidationError::VolumeShapeMismatch {
                expected: first.shape().to_vec(),
                got: volume.shape().to_vec(),
            }
            .into());
        }
    }
    let slices = strategy.slices_for(first.shape())?;
    let total = volumes.len();

    let per_timepoint = volumes
        .par_iter()
        .enumerate()
        .map(|(timepoint, volume)| {
            extract_blocks(volume, timepoint, total, &slices).map_err(StacktileError::from)
        })
        .collect::<StacktileResult<Vec<_>>>()?;

    let blocks: Vec<_> = per_timepoint.into_iter().flatten().collect();
    info!(
        "partitioned {} timepoints into {} blocks ({} per timepoint)",
        total,
        blocks.len(),
        strategy.num_partitions()
    );
    Ok(blocks)
}

/// Group keyed blocks by spatial position, the local stand-in for the
/// collaborator's `groupByKey`.
pub fn group_by_spatial_key<T>(
    blocks: Vec<(BlockKey, ArrayD<T>)>,
) -> HashMap<Vec<usize>, Vec<(BlockKey, ArrayD<T>)>> {
    let mut groups: HashMap<Vec<usize>, Vec<(BlockKey, ArrayD<T>)>> = HashMap::new();
    for (key, block) in blocks {
        groups.entry(key.spatial_key()).or_default().push((key, block));
    }
    groups
}

/// Assemble every spatial group into a full-temporal-range block.
///
/// Results are sorted by spatial key so the local driver is deterministic;
/// the distributed collaborator's `sortByKey` plays this role in production.
pub fn assemble_groups<T>(
    groups: HashMap<Vec<usize>, Vec<(BlockKey, ArrayD<T>)>>,
) -> StacktileResult<Vec<(BlockKey, ArrayD<T>)>>
where
    T: Clone + Default,
{
    let mut assembled = groups
        .into_values()
        .map(|group| assemble_timepoints(group).map_err(StacktileError::from))
        .collect::<StacktileResult<Vec<_>>>()?;
    assembled.sort_by_key(|(key, _)| key.spatial_key());
    debug!("assembled {} spatial blocks", assembled.len());
    Ok(assembled)
}

/// Run the full partition, group, assemble, reconstruct flow, returning every
/// `(coordinate, series)` pair in the volume.
pub fn to_series<T>(
    volumes: &[ArrayD<T>],
    strategy: &PartitionStrategy,
) -> StacktileResult<Vec<(Vec<usize>, Array1<T>)>>
where
    T: Clone + Default + Send + Sync,
{
    let blocks = partition_volumes(volumes, strategy)?;
    let assembled = assemble_groups(group_by_spatial_key(blocks))?;
    let mut series = Vec::new();
    for (key, block) in &assembled {
        series.extend(series_iter(key, block));
    }
    Ok(series)
}

/// Run the full flow in the image direction: partition, assemble, then
/// regroup per timepoint and stitch each timepoint's blocks back into a full
/// volume.
///
/// Returns one `(timepoint, volume)` pair per timepoint, sorted by
/// timepoint; the sort plays the distributed collaborator's `sortByKey`
/// role.
pub fn to_images<T>(
    volumes: &[ArrayD<T>],
    strategy: &PartitionStrategy,
) -> StacktileResult<Vec<(usize, ArrayD<T>)>>
where
    T: Clone + Default + Send + Sync,
{
    let blocks = partition_volumes(volumes, strategy)?;
    let assembled = assemble_groups(group_by_spatial_key(blocks))?;

    let mut per_timepoint: HashMap<usize, Vec<(BlockKey, ArrayD<T>)>> = HashMap::new();
    for (key, block) in &assembled {
        for (timepoint, keyed_plane) in planar_blocks(key, block) {
            per_timepoint.entry(timepoint).or_default().push(keyed_plane);
        }
    }

    let mut images = per_timepoint
        .into_iter()
        .map(|(timepoint, group)| {
            stitch_image(group)
                .map(|image| (timepoint, image))
                .map_err(StacktileError::from)
        })
        .collect::<StacktileResult<Vec<_>>>()?;
    images.sort_by_key(|(timepoint, _)| *timepoint);
    debug!("reconstructed {} timepoint images", images.len());
    Ok(images)
}

/// Run the full flow, ending in one labeled binary payload per spatial
/// block. The caller appends the `.bin` extension when writing files.
pub fn to_binary_series<T>(
    volumes: &[ArrayD<T>],
    strategy: &PartitionStrategy,
) -> StacktileResult<Vec<(String, Vec<u8>)>>
where
    T: bytemuck::Pod + Default + Send + Sync,
{
    let blocks = partition_volumes(volumes, strategy)?;
    let assembled = assemble_groups(group_by_spatial_key(blocks))?;
    assembled
        .iter()
        .map(|(key, block)| to_binary_records(key, block).map_err(StacktileError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    fn ramp_volumes(dims: &[usize], total: usize) -> Vec<ArrayD<f32>> {
        (0..total)
            .map(|tp| {
                let mut volume = ArrayD::zeros(IxDyn(dims));
                for (i, v) in volume.iter_mut().enumerate() {
                    *v = (tp * 10_000 + i) as f32;
                }
                volume
            })
            .collect()
    }

    #[test]
    fn test_partition_counts() {
        let volumes = ramp_volumes(&[12, 12], 3);
        let strategy = PartitionStrategy::from_splits(vec![2, 2]).unwrap();
        let blocks = partition_volumes(&volumes, &strategy).unwrap();
        assert_eq!(blocks.len(), 12);
        assert!(blocks.iter().all(|(_, b)| b.shape() == [1, 6, 6]));
    }

    #[test]
    fn test_empty_input_produces_no_blocks() {
        let volumes: Vec<ArrayD<f32>> = Vec::new();
        let strategy = PartitionStrategy::from_splits(vec![2, 2]).unwrap();
        assert!(partition_volumes(&volumes, &strategy).unwrap().is_empty());
    }

    #[test]
    fn test_to_series_reproduces_every_pixel() {
        let dims = [6, 9];
        let total = 4;
        let volumes = ramp_volumes(&dims, total);
        let strategy = PartitionStrategy::from_splits(vec![2, 3]).unwrap();

        let series = to_series(&volumes, &strategy).unwrap();
        assert_eq!(series.len(), 6 * 9);

        for (coordinate, values) in &series {
            assert_eq!(values.len(), total);
            for (tp, volume) in volumes.iter().enumerate() {
                assert_eq!(values[tp], volume[[coordinate[0], coordinate[1]]]);
            }
        }
    }

    #[test]
    fn test_mismatched_volume_shapes_rejected() {
        let volumes = vec![
            ArrayD::<f32>::zeros(IxDyn(&[8, 8])),
            ArrayD::<f32>::zeros(IxDyn(&[8, 6])),
        ];
        let strategy = PartitionStrategy::from_splits(vec![2, 2]).unwrap();
        let err = partition_volumes(&volumes, &strategy).unwrap_err();
        assert!(matches!(
            err,
            StacktileError::Validation(ValidationError::VolumeShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_to_images_round_trips_every_volume() {
        let dims = [6, 9];
        let total = 4;
        let volumes = ramp_volumes(&dims, total);
        let strategy = PartitionStrategy::from_splits(vec![2, 3]).unwrap();

        let images = to_images(&volumes, &strategy).unwrap();
        assert_eq!(images.len(), total);
        for (tp, (timepoint, image)) in images.iter().enumerate() {
            assert_eq!(*timepoint, tp);
            assert_eq!(image, &volumes[tp]);
        }
    }

    #[test]
    fn test_to_series_deterministic_across_runs() {
        let volumes = ramp_volumes(&[5, 5], 2);
        let strategy = PartitionStrategy::from_splits(vec![2, 2]).unwrap();
        let a = to_series(&volumes, &strategy).unwrap();
        let b = to_series(&volumes, &strategy).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_to_binary_series_labels_unique_and_sorted() {
        let volumes = ramp_volumes(&[8, 8], 2);
        let strategy = PartitionStrategy::from_splits(vec![2, 2]).unwrap();
        let records = to_binary_series(&volumes, &strategy).unwrap();
        assert_eq!(records.len(), 4);

        let labels: Vec<&str> = records.iter().map(|(l, _)| l.as_str()).collect();
        let mut deduped = labels.clone();
        deduped.dedup();
        assert_eq!(labels, deduped);

        // Each payload: 16 series of (2 coords * 2 bytes + 2 samples * 4 bytes).
        for (_, payload) in &records {
            assert_eq!(payload.len(), 16 * (4 + 8));
        }
    }

    #[test]
    fn test_block_size_strategy_end_to_end() {
        let volumes = ramp_volumes(&[5, 10, 3], 4);
        let strategy = PartitionStrategy::from_block_size(
            (5 * 10 * 4 * std::mem::size_of::<f32>()) as u64,
            &[5, 10, 3],
            4,
            std::mem::size_of::<f32>(),
        )
        .unwrap();
        assert_eq!(strategy.splits_per_dim(), &[1, 1, 3]);

        let series = to_series(&volumes, &strategy).unwrap();
        assert_eq!(series.len(), 5 * 10 * 3);
    }
}
