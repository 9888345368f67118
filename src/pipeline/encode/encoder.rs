//! Container encoder seam.

use crate::pipeline::common::error::Result;
use crate::pipeline::metadata::SourceMetadata;
use crate::pipeline::options::{ConversionOptions, OutputFormat};
use crate::pipeline::render::RenderedImage;

/// Quality used for lossy containers when the caller does not set one.
pub const DEFAULT_QUALITY: f64 = 0.9;

/// Encoder parameters, one variant per container.
///
/// The shape of each variant is the format's option contract: quality only
/// exists for the lossy containers, thumbnail embedding only for JPEG and
/// HEIF. An option a format does not support cannot be smuggled in here,
/// which is what makes "silently ignored upstream" safe.
#[derive(Debug, Clone, PartialEq)]
pub enum EncoderParams {
    Jpeg {
        quality: f64,
        embed_thumbnail: bool,
        optimize_color: bool,
    },
    Png {
        optimize_color: bool,
    },
    Tiff {
        optimize_color: bool,
    },
    Jpeg2000 {
        quality: f64,
        optimize_color: bool,
    },
    Heif {
        quality: f64,
        embed_thumbnail: bool,
        optimize_color: bool,
    },
}

impl EncoderParams {
    /// Derives encoder parameters from the flat options.
    ///
    /// Total over every container format; returns `None` only for
    /// [`OutputFormat::Rgb`], which bypasses the encoder entirely. Quality
    /// defaults to 0.9 and is clamped to `[0, 1]`.
    pub fn for_format(format: OutputFormat, options: &ConversionOptions) -> Option<Self> {
        let quality = options
            .quality
            .unwrap_or(DEFAULT_QUALITY)
            .clamp(0.0, 1.0);
        let embed_thumbnail = options.embed_thumbnail.unwrap_or(false);
        let optimize_color = options.optimize_color_for_sharing.unwrap_or(false);

        match format {
            OutputFormat::Jpeg => Some(Self::Jpeg {
                quality,
                embed_thumbnail,
                optimize_color,
            }),
            OutputFormat::Png => Some(Self::Png { optimize_color }),
            OutputFormat::Tiff => Some(Self::Tiff { optimize_color }),
            OutputFormat::Jpeg2000 => Some(Self::Jpeg2000 {
                quality,
                optimize_color,
            }),
            OutputFormat::Heif => Some(Self::Heif {
                quality,
                embed_thumbnail,
                optimize_color,
            }),
            OutputFormat::Rgb => None,
        }
    }
}

/// The delegated container encoding capability.
///
/// `metadata` is the source metadata to merge into the container; it is
/// `None` when EXIF preservation is off or the source carried none. A
/// backend must merge it with the format parameters rather than letting
/// either side silently replace the other.
pub trait ContainerEncoder {
    fn encode(
        &self,
        image: &RenderedImage,
        params: &EncoderParams,
        metadata: Option<&SourceMetadata>,
    ) -> Result<Vec<u8>>;
}
