//! Option normalization module
//!
//! This module owns the caller-facing option contract: the closed output
//! format enumeration and the typed conversion options, including the
//! permissive loose-bag normalizer.

pub mod format;
mod normalize;
mod types;

pub use format::{OutputFormat, SUPPORTED_FORMAT_NAMES};
pub use types::ConversionOptions;
