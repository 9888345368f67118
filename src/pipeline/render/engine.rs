use std::path::Path;

use crate::pipeline::common::error::Result;
use crate::pipeline::metadata::SourceMetadata;
use crate::pipeline::render::image::RenderedImage;
use crate::pipeline::render::params::RenderParams;

/// What the engine is given to render from.
///
/// Engines that can consume in-memory bytes get [`RenderSource::Bytes`];
/// engines that declare [`requires_file_staging`](RenderEngine::requires_file_staging)
/// are handed the path of a staged temp file instead.
#[derive(Debug, Clone, Copy)]
pub enum RenderSource<'a> {
    Bytes(&'a [u8]),
    File(&'a Path),
}

/// A rendered frame plus the source metadata the engine read alongside it.
/// `metadata` is only populated when the params asked for it.
#[derive(Debug)]
pub struct RenderOutput {
    pub image: RenderedImage,
    pub metadata: Option<SourceMetadata>,
}

/// The delegated RAW rendering capability.
///
/// Implementations map their own failure modes onto the pipeline's error
/// taxonomy: a source the engine cannot even construct a decoder for is
/// `RenderFilterCreation`, bytes that are simply not decodable RAW data are
/// `EmptyExtent`, and an internal processing failure that yields no frame is
/// `NoOutputImage`.
pub trait RenderEngine {
    /// True when the engine only accepts input staged as a named file.
    fn requires_file_staging(&self) -> bool {
        false
    }

    /// True when the engine can detect the input format from bytes alone.
    /// When false, buffer inputs must carry an explicit `inputFormat` hint.
    fn infers_format_from_bytes(&self) -> bool {
        true
    }

    /// Renders the source once. Called exactly once per conversion.
    fn render(&self, source: RenderSource<'_>, params: &RenderParams) -> Result<RenderOutput>;
}
