//! Raw RGB extraction.
//!
//! The RGB output format bypasses the container encoder: it is the rendered
//! pixels themselves, interleaved RGB with the alpha channel stripped. Two
//! paths exist: a direct read of the image's backing store when it is
//! already tight 4-bytes-per-pixel rows, and a bitmap re-render when it is
//! not. Both must produce byte-identical output for the same image; the
//! fallback changes how the bytes are obtained, never their values.

use tracing::debug;

use crate::pipeline::common::error::{ConvertError, Result};
use crate::pipeline::render::RenderedImage;

/// Extracts exactly `width * height * 3` interleaved RGB bytes.
pub fn extract_rgb(image: &RenderedImage) -> Result<Vec<u8>> {
    let rendered;
    let rgba: &[u8] = match image.rgba_data() {
        Some(direct) => direct,
        None => {
            debug!("backing store not directly accessible, re-rendering to bitmap");
            rendered = image.render_to_bitmap();
            &rendered
        }
    };
    strip_alpha(image, rgba)
}

fn strip_alpha(image: &RenderedImage, rgba: &[u8]) -> Result<Vec<u8>> {
    let expected = image.width() as usize * image.height() as usize * 4;
    if rgba.len() != expected {
        return Err(ConvertError::RgbExtraction);
    }
    let mut rgb = Vec::with_capacity(image.width() as usize * image.height() as usize * 3);
    for px in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
    }
    Ok(rgb)
}
