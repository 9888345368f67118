//! Source loading module
//!
//! This module resolves conversion inputs (in-memory buffers or file paths)
//! into a form the render engine can consume, including temporary staging
//! for engines that require named input files.

mod input;
mod loader;

pub use input::{ConversionInput, OwnedInput};
pub use loader::{ResolvedSource, StagedFile, load};
