//! Rendering module
//!
//! The render engine seam (trait, parameter mapping, rendered image handle)
//! and the default rawloader-backed engine.

mod engine;
mod image;
mod params;
mod rawloader_engine;

pub use engine::{RenderEngine, RenderOutput, RenderSource};
pub use image::RenderedImage;
pub use params::RenderParams;
pub use rawloader_engine::RawLoaderEngine;
