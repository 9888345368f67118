//! Format dispatch.

use tracing::debug;

use crate::pipeline::common::error::Result;
use crate::pipeline::encode::encoder::{ContainerEncoder, EncoderParams};
use crate::pipeline::encode::rgb;
use crate::pipeline::metadata::SourceMetadata;
use crate::pipeline::options::{ConversionOptions, OutputFormat};
use crate::pipeline::render::RenderedImage;

/// Turns a rendered image into final output bytes for the requested format.
///
/// RGB short-circuits to raw pixel extraction; every container format goes
/// through the encoder with per-format parameters. Source metadata reaches
/// the encoder only when EXIF preservation is on and the source actually
/// carried metadata.
pub fn encode_output<E: ContainerEncoder + ?Sized>(
    encoder: &E,
    image: &RenderedImage,
    format: OutputFormat,
    options: &ConversionOptions,
    metadata: Option<&SourceMetadata>,
) -> Result<Vec<u8>> {
    let Some(params) = EncoderParams::for_format(format, options) else {
        debug!("rgb output requested, bypassing container encoder");
        return rgb::extract_rgb(image);
    };

    let metadata = if options.preserve_exif() {
        metadata.filter(|m| !m.is_empty())
    } else {
        None
    };

    encoder.encode(image, &params, metadata)
}
