//! Conversion orchestration module
//!
//! The synchronous pipeline tying the loader, render engine, metadata
//! extractor and format dispatcher together.

mod convert;
mod tests;

pub use convert::{OutputImage, RawConverter};
