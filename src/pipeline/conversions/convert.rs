use tracing::{info, instrument};

use crate::pipeline::common::error::{ConvertError, Result};
use crate::pipeline::encode::{ContainerEncoder, ImageCrateEncoder, encode_output};
use crate::pipeline::metadata::{self, ImageMetadata};
use crate::pipeline::options::{ConversionOptions, OutputFormat};
use crate::pipeline::render::{
    RawLoaderEngine, RenderEngine, RenderOutput, RenderParams, RenderSource,
};
use crate::pipeline::source::{ConversionInput, StagedFile, load};

/// The result of one conversion: encoded bytes (or raw RGB) plus the public
/// metadata when extraction was requested. Immutable once returned.
#[derive(Debug, Clone)]
pub struct OutputImage {
    pub buffer: Vec<u8>,
    pub metadata: Option<ImageMetadata>,
}

/// Synchronous conversion pipeline over a render engine and a container
/// encoder.
///
/// `convert` runs entirely on the calling thread and blocks it for the full
/// render + encode duration. That is a deliberate trade-off: callers that
/// need responsiveness use
/// [`AsyncRawConverter`](crate::pipeline::executor::AsyncRawConverter)
/// instead.
pub struct RawConverter<R: RenderEngine, E: ContainerEncoder> {
    engine: R,
    encoder: E,
}

impl RawConverter<RawLoaderEngine, ImageCrateEncoder> {
    pub fn new() -> Self {
        Self {
            engine: RawLoaderEngine,
            encoder: ImageCrateEncoder,
        }
    }
}

impl Default for RawConverter<RawLoaderEngine, ImageCrateEncoder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RenderEngine, E: ContainerEncoder> RawConverter<R, E> {
    pub fn with_custom(engine: R, encoder: E) -> Self {
        Self { engine, encoder }
    }

    /// Cheap validation that runs before any engine work, on both the sync
    /// and async paths.
    pub(crate) fn validate(
        &self,
        input: &ConversionInput<'_>,
        options: &ConversionOptions,
    ) -> Result<()> {
        input.validate()?;
        if matches!(input, ConversionInput::Buffer(_))
            && !self.engine.infers_format_from_bytes()
            && options.input_format.is_none()
        {
            return Err(ConvertError::MissingInputFormatHint);
        }
        Ok(())
    }

    /// Runs the full pipeline: validate, load, render, extract, encode.
    #[instrument(skip(self, input, options))]
    pub fn convert(
        &self,
        input: ConversionInput<'_>,
        format: OutputFormat,
        options: &ConversionOptions,
    ) -> Result<OutputImage> {
        info!("Starting RAW conversion");
        self.validate(&input, options)?;

        let source = {
            let _span = tracing::info_span!("load_source").entered();
            load(&input, options)?
        };

        let params = RenderParams::from_options(options);

        let RenderOutput {
            image,
            metadata: source_meta,
        } = {
            let _span = tracing::info_span!("render", input_size = source.bytes.len()).entered();
            if self.engine.requires_file_staging() {
                let staged = StagedFile::create(&source)?;
                // staged is dropped at the end of this block, removing the
                // temp file whether the render succeeded or not
                self.engine.render(RenderSource::File(staged.path()), &params)?
            } else {
                self.engine.render(RenderSource::Bytes(&source.bytes), &params)?
            }
        };

        if image.is_empty_extent() {
            return Err(ConvertError::EmptyExtent);
        }

        let extracted = if options.extract_metadata() {
            let _span = tracing::info_span!("extract_metadata").entered();
            Some(metadata::extract(source_meta.as_ref(), &image))
        } else {
            None
        };

        let buffer = {
            let _span = tracing::info_span!("encode").entered();
            encode_output(&self.encoder, &image, format, options, source_meta.as_ref())?
        };

        info!(
            width = image.width(),
            height = image.height(),
            output_bytes = buffer.len(),
            "Conversion complete"
        );
        Ok(OutputImage {
            buffer,
            metadata: extracted,
        })
        // image is dropped here, before control returns to the caller
    }

    /// The string-and-bag entry point: parses the output format
    /// case-insensitively and normalizes the loose option bag, then runs
    /// [`convert`](Self::convert).
    pub fn convert_raw(
        &self,
        input: ConversionInput<'_>,
        output_format: &str,
        options: Option<&serde_json::Value>,
    ) -> Result<OutputImage> {
        let format = OutputFormat::parse(output_format)?;
        let options = ConversionOptions::from_json(options)?;
        self.convert(input, format, &options)
    }
}
