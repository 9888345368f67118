//! Default container encoder backed by the image crate.
//!
//! Provides JPEG, PNG and TIFF containers. JPEG-2000 and HEIF are accepted
//! by the option contract but have no encoder in this backend; asking for
//! them fails with the destination-creation error. EXIF preservation is
//! supported for JPEG output via the write-back splice.

use std::io::Cursor;

use image::ImageEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::tiff::TiffEncoder;
use tracing::{debug, warn};

use crate::pipeline::common::error::{ConvertError, Result};
use crate::pipeline::encode::encoder::{ContainerEncoder, EncoderParams};
use crate::pipeline::encode::exif_writer;
use crate::pipeline::encode::rgb::extract_rgb;
use crate::pipeline::metadata::SourceMetadata;
use crate::pipeline::render::RenderedImage;

pub struct ImageCrateEncoder;

impl ContainerEncoder for ImageCrateEncoder {
    fn encode(
        &self,
        image: &RenderedImage,
        params: &EncoderParams,
        metadata: Option<&SourceMetadata>,
    ) -> Result<Vec<u8>> {
        let width = image.width();
        let height = image.height();
        debug!(width, height, ?params, "encoding container");

        match params {
            EncoderParams::Jpeg {
                quality,
                embed_thumbnail,
                ..
            } => {
                if *embed_thumbnail {
                    debug!("thumbnail embedding is not supported by this backend, skipping");
                }
                // JPEG carries no alpha; encode from stripped RGB
                let rgb = extract_rgb(image)?;
                let mut cursor = Cursor::new(Vec::new());
                JpegEncoder::new_with_quality(&mut cursor, quality_percent(*quality))
                    .write_image(&rgb, width, height, image::ExtendedColorType::Rgb8)
                    .map_err(|e| {
                        warn!(error = %e, "JPEG encode failed");
                        ConvertError::DestinationFinalize
                    })?;
                let encoded = cursor.into_inner();
                match metadata {
                    Some(meta) => exif_writer::embed_jpeg_exif(encoded, meta),
                    None => Ok(encoded),
                }
            }
            EncoderParams::Png { .. } => {
                let rgba = tight_rgba(image);
                let mut cursor = Cursor::new(Vec::new());
                PngEncoder::new(&mut cursor)
                    .write_image(&rgba, width, height, image::ExtendedColorType::Rgba8)
                    .map_err(|e| {
                        warn!(error = %e, "PNG encode failed");
                        ConvertError::DestinationFinalize
                    })?;
                Ok(cursor.into_inner())
            }
            EncoderParams::Tiff { .. } => {
                let rgb = extract_rgb(image)?;
                let mut cursor = Cursor::new(Vec::new());
                TiffEncoder::new(&mut cursor)
                    .write_image(&rgb, width, height, image::ExtendedColorType::Rgb8)
                    .map_err(|e| {
                        warn!(error = %e, "TIFF encode failed");
                        ConvertError::DestinationFinalize
                    })?;
                Ok(cursor.into_inner())
            }
            EncoderParams::Jpeg2000 { .. } | EncoderParams::Heif { .. } => {
                warn!(?params, "no encoder for requested container in this backend");
                Err(ConvertError::DestinationCreation)
            }
        }
    }
}

fn tight_rgba(image: &RenderedImage) -> Vec<u8> {
    match image.rgba_data() {
        Some(direct) => direct.to_vec(),
        None => image.render_to_bitmap(),
    }
}

/// Maps the unit-interval quality onto the encoder's percent scale.
fn quality_percent(quality: f64) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}
