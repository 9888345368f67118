//! Rendered image handle.

/// A rendered image produced by a [`RenderEngine`](super::RenderEngine).
///
/// The backing store is interleaved 8-bit RGBA with an explicit row stride.
/// Direct access to the pixel bytes is only possible when the rows are
/// tightly packed (`row_stride == width * 4`); engines that render into
/// padded scanlines still produce a valid handle, consumers just have to go
/// through [`render_to_bitmap`](Self::render_to_bitmap).
///
/// The handle owns its pixels and is dropped before a conversion returns,
/// which is what bounds peak memory to one rendered frame per in-flight
/// conversion.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    width: u32,
    height: u32,
    row_stride: usize,
    pixels: Vec<u8>,
}

impl RenderedImage {
    /// Builds a handle over tightly packed RGBA data.
    ///
    /// Returns `None` when the buffer does not hold `width * height` RGBA
    /// pixels.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let stride = width as usize * 4;
        Self::with_row_stride(width, height, stride, pixels)
    }

    /// Builds a handle over RGBA data with padded rows.
    pub fn with_row_stride(
        width: u32,
        height: u32,
        row_stride: usize,
        pixels: Vec<u8>,
    ) -> Option<Self> {
        if row_stride < width as usize * 4 || pixels.len() != row_stride * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            row_stride,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True for degenerate output; the orchestrator turns this into the
    /// "empty extent" error.
    pub fn is_empty_extent(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Direct access to the backing store, available only when the layout is
    /// already tight 4-bytes-per-pixel rows.
    pub fn rgba_data(&self) -> Option<&[u8]> {
        if self.row_stride == self.width as usize * 4 {
            Some(&self.pixels)
        } else {
            None
        }
    }

    /// Renders the image into a fresh, tightly packed RGBA bitmap.
    ///
    /// For a tightly packed image this must produce bytes identical to
    /// [`rgba_data`](Self::rgba_data); the fallback only changes how the
    /// pixels are obtained, never their values.
    pub fn render_to_bitmap(&self) -> Vec<u8> {
        let row_bytes = self.width as usize * 4;
        let mut out = Vec::with_capacity(row_bytes * self.height as usize);
        for row in self.pixels.chunks_exact(self.row_stride) {
            out.extend_from_slice(&row[..row_bytes]);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tight_layout_offers_direct_access() {
        let image = RenderedImage::from_rgba8(2, 2, vec![9u8; 16]).unwrap();
        assert!(image.rgba_data().is_some());
        assert_eq!(image.render_to_bitmap(), vec![9u8; 16]);
    }

    #[test]
    fn padded_layout_denies_direct_access_but_renders_tight() {
        // 2x2 image, 2 bytes of padding per row
        let mut pixels = Vec::new();
        for row in 0..2u8 {
            for px in 0..2u8 {
                pixels.extend_from_slice(&[row * 10 + px, 1, 2, 3]);
            }
            pixels.extend_from_slice(&[0xEE, 0xEE]);
        }
        let image = RenderedImage::with_row_stride(2, 2, 10, pixels).unwrap();
        assert!(image.rgba_data().is_none());
        let tight = image.render_to_bitmap();
        assert_eq!(tight.len(), 16);
        assert_eq!(&tight[0..4], &[0, 1, 2, 3]);
        assert_eq!(&tight[8..12], &[10, 1, 2, 3]);
    }

    #[test]
    fn mismatched_buffer_is_rejected() {
        assert!(RenderedImage::from_rgba8(4, 4, vec![0u8; 10]).is_none());
        assert!(RenderedImage::with_row_stride(4, 4, 8, vec![0u8; 32]).is_none());
    }
}
