//! Stacktile CLI - Block Partitioning Demo
//!
//! This is a demonstration CLI for the stacktile library. It builds a
//! synthetic ramp volume, runs the full partition/assemble/reconstruct
//! pipeline locally, and writes one binary series file per spatial block.

use anyhow::{bail, Context, Result};
use ndarray::{ArrayD, IxDyn};
use stacktile::prelude::*;
use std::fs;
use std::path::Path;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        return;
    }

    let result = match args[1].as_str() {
        "estimate" => estimate(&args[2..]),
        "partition" => partition(&args[2..]),
        "help" | "--help" | "-h" => {
            print_usage(&args[0]);
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage(&args[0]);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn print_usage(program: &str) {
    println!("Stacktile v{} - block partitioning demo", stacktile::VERSION);
    println!();
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  estimate <dims> <timepoints> <elem-bytes> <size>");
    println!("                    Print the split counts for a target block size");
    println!("                    e.g. estimate 512,512,30 100 8 256k");
    println!("  partition <out-dir> [options]");
    println!("                    Partition a synthetic volume and write one .bin");
    println!("                    series file per spatial block plus manifest.json");
    println!("  help              Show this help message");
    println!();
    println!("Partition options:");
    println!("  --dims <a,b,..>       Spatial dimensions (default: 12,12)");
    println!("  --timepoints <n>      Number of timepoints (default: 4)");
    println!("  --splits <a,b,..>     Explicit splits per dimension");
    println!("  --block-size <size>   Target block size, e.g. 4k (default: 2,2 splits)");
}

fn parse_usize_list(s: &str) -> Result<Vec<usize>> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .with_context(|| format!("invalid number '{}'", part))
        })
        .collect()
}

fn estimate(args: &[String]) -> Result<()> {
    if args.len() < 4 {
        bail!("usage: estimate <dims> <timepoints> <elem-bytes> <size>");
    }
    let dims = parse_usize_list(&args[0])?;
    let timepoints: usize = args[1].parse().context("invalid timepoint count")?;
    let elem_bytes: usize = args[2].parse().context("invalid element size")?;
    let splits = splits_for_block_size(args[3].as_str(), &dims, timepoints, elem_bytes)?;

    let cells: f64 = dims
        .iter()
        .zip(&splits)
        .map(|(&d, &s)| d as f64 / s as f64)
        .product();
    println!("splits per dimension: {:?}", splits);
    println!(
        "average block: {:.1} cells, {:.1} bytes",
        cells,
        cells * (timepoints * elem_bytes) as f64
    );
    Ok(())
}

fn partition(args: &[String]) -> Result<()> {
    if args.is_empty() {
        bail!("usage: partition <out-dir> [options]");
    }
    let out_dir = Path::new(&args[0]);

    let mut dims = vec![12, 12];
    let mut timepoints = 4usize;
    let mut splits: Option<Vec<usize>> = None;
    let mut block_size: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--dims" if i + 1 < args.len() => {
                dims = parse_usize_list(&args[i + 1])?;
                i += 2;
            }
            "--timepoints" if i + 1 < args.len() => {
                timepoints = args[i + 1].parse().context("invalid timepoint count")?;
                i += 2;
            }
            "--splits" if i + 1 < args.len() => {
                splits = Some(parse_usize_list(&args[i + 1])?);
                i += 2;
            }
            "--block-size" if i + 1 < args.len() => {
                block_size = Some(args[i + 1].clone());
                i += 2;
            }
            other => bail!("unknown option: {}", other),
        }
    }

    let strategy = match (splits, block_size) {
        (Some(_), Some(_)) => bail!("--splits and --block-size are mutually exclusive"),
        (Some(s), None) => PartitionStrategy::from_splits(s)?,
        (None, Some(size)) => PartitionStrategy::from_block_size(
            size.as_str(),
            &dims,
            timepoints,
            std::mem::size_of::<f32>(),
        )?,
        (None, None) => PartitionStrategy::from_splits(vec![2; dims.len()])?,
    };

    println!(
        "Partitioning {} timepoints of {:?} with splits {:?}",
        timepoints,
        dims,
        strategy.splits_per_dim()
    );

    // Synthetic ramp data: each cell encodes timepoint and linear index.
    let volumes: Vec<ArrayD<f32>> = (0..timepoints)
        .map(|tp| {
            let mut volume = ArrayD::zeros(IxDyn(&dims));
            for (i, v) in volume.iter_mut().enumerate() {
                *v = (tp * 1_000_000 + i) as f32;
            }
            volume
        })
        .collect();

    let records = to_binary_series(&volumes, &strategy)?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let mut manifest = serde_json::Map::new();
    for (label, payload) in &records {
        let path = out_dir.join(format!("{}.bin", label));
        fs::write(&path, payload).with_context(|| format!("writing {}", path.display()))?;
        manifest.insert(
            label.clone(),
            serde_json::json!({ "bytes": payload.len() }),
        );
    }
    let manifest_path = out_dir.join("manifest.json");
    fs::write(
        &manifest_path,
        serde_json::to_string_pretty(&manifest)?,
    )?;

    println!(
        "Wrote {} block files and {}",
        records.len(),
        manifest_path.display()
    );
    Ok(())
}
