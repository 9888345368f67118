//! Common utilities module
//!
//! This module contains shared utilities used across the conversion pipeline.

pub mod error;

pub use error::{ConvertError, Result};
