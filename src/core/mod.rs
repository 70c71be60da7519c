//! Core types and error handling shared by every pipeline stage.

pub mod error;
pub mod types;

pub use error::{
    ConfigError, ConfigResult, StacktileError, StacktileResult, ValidationError, ValidationResult,
};
pub use types::{BlockKey, SliceRange};
