//! Reconstruction of per-pixel time series or full images, and the binary
//! serialization of series.

pub mod binary;
pub mod images;
pub mod reconstruct;

pub use binary::{binary_label, to_binary_records};
pub use images::{planar_blocks, stitch_image};
pub use reconstruct::series_iter;
