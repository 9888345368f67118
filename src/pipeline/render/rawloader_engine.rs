//! Default render engine backed by the rawloader library.
//!
//! Supports any RAW format rawloader can decode (ARW, NEF, CR2, DNG, RAF and
//! friends). Rendering runs a linear demosaic over the Bayer mosaic, then a
//! fixed color pipeline: black/white level normalization, camera white
//! balance, camera-to-sRGB matrix, exposure, and the sRGB transfer curve.
//!
//! This backend consumes in-memory bytes directly and detects the format
//! from the bytes themselves, so it needs neither file staging nor an
//! `inputFormat` hint. Both trait hooks still matter for engines that do.

use std::io::Cursor;

use bayer::{BayerDepth, CFA, Demosaic, RasterDepth, RasterMut};
use rawloader::RawImageData as RawloaderImageData;
use tracing::{debug, warn};

use crate::pipeline::common::error::{ConvertError, Result};
use crate::pipeline::metadata::SourceMetadata;
use crate::pipeline::render::engine::{RenderEngine, RenderOutput, RenderSource};
use crate::pipeline::render::image::RenderedImage;
use crate::pipeline::render::params::RenderParams;

mod exif_read;

/// Standard XYZ to sRGB matrix, D65 illuminant.
const XYZ_TO_SRGB: [[f32; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

/// Linear gain applied before the transfer curve so a neutral render lands
/// at a sensible brightness. Caller exposure is applied on top, in stops.
const BASE_GAIN: f32 = 3.5;

pub struct RawLoaderEngine;

impl RenderEngine for RawLoaderEngine {
    fn render(&self, source: RenderSource<'_>, params: &RenderParams) -> Result<RenderOutput> {
        let owned;
        let bytes: &[u8] = match source {
            RenderSource::Bytes(bytes) => bytes,
            RenderSource::File(path) => {
                owned = std::fs::read(path).map_err(|e| {
                    debug!(path = %path.display(), error = %e, "staged source unreadable");
                    ConvertError::RenderFilterCreation
                })?;
                &owned
            }
        };

        debug!("Decoding RAW image, {} bytes", bytes.len());

        // A decode rejection means the bytes are not decodable as RAW data,
        // which the error taxonomy signals as an empty extent.
        let decoded = rawloader::decode(&mut Cursor::new(bytes)).map_err(|e| {
            debug!(error = %e, "rawloader rejected input");
            ConvertError::EmptyExtent
        })?;

        let width = decoded.width;
        let height = decoded.height;
        if width == 0 || height == 0 {
            return Err(ConvertError::EmptyExtent);
        }
        debug!("Decoded image: {}x{}", width, height);

        // Integer data is used as-is, float data (normalized 0.0-1.0) is
        // scaled to the u16 range.
        let mosaic: Vec<u16> = match &decoded.data {
            RawloaderImageData::Integer(values) => values.iter().map(|&v| v as u16).collect(),
            RawloaderImageData::Float(values) => values
                .iter()
                .map(|&v| (v * u16::MAX as f32) as u16)
                .collect(),
        };
        if mosaic.len() < width * height {
            return Err(ConvertError::NoOutputImage);
        }

        let rgb = if params.allow_draft_mode == Some(true) {
            draft_render(&mosaic, width, height)
        } else {
            demosaic(&mosaic, width, height)?
        };
        let (rgb_width, rgb_height, rgb) = rgb;

        let pixels = develop(&decoded, params, rgb_width, rgb_height, &rgb);

        let (out_width, out_height, pixels) = match params.scale_factor {
            Some(s) if s > 0.0 && s != 1.0 => resize_nearest(rgb_width, rgb_height, &pixels, s),
            _ => (rgb_width, rgb_height, pixels),
        };

        let image = RenderedImage::from_rgba8(out_width as u32, out_height as u32, pixels)
            .ok_or(ConvertError::NoOutputImage)?;

        let metadata = if params.want_metadata {
            Some(read_metadata(bytes, &decoded))
        } else {
            None
        };

        Ok(RenderOutput { image, metadata })
    }
}

/// Full-resolution linear demosaic via the bayer crate.
fn demosaic(mosaic: &[u16], width: usize, height: usize) -> Result<(usize, usize, Vec<u16>)> {
    let bayer_bytes: Vec<u8> = mosaic.iter().flat_map(|&v| v.to_le_bytes()).collect();
    let mut output_buf = vec![0u8; width * height * 3 * 2];
    let mut raster = RasterMut::new(width, height, RasterDepth::Depth16, &mut output_buf);

    bayer::run_demosaic(
        &mut Cursor::new(&bayer_bytes[..]),
        BayerDepth::Depth16LE,
        CFA::RGGB,
        Demosaic::Linear,
        &mut raster,
    )
    .map_err(|e| {
        warn!("demosaic failed: {:?}", e);
        ConvertError::NoOutputImage
    })?;

    let rgb: Vec<u16> = output_buf
        .chunks_exact(2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .collect();
    Ok((width, height, rgb))
}

/// Draft mode: a half-resolution render that reads each RGGB quad directly
/// instead of interpolating. Roughly 4x faster, lower fidelity.
fn draft_render(mosaic: &[u16], width: usize, height: usize) -> (usize, usize, Vec<u16>) {
    let out_w = width / 2;
    let out_h = height / 2;
    let mut rgb = Vec::with_capacity(out_w * out_h * 3);
    for qy in 0..out_h {
        let top = qy * 2 * width;
        let bottom = top + width;
        for qx in 0..out_w {
            let x = qx * 2;
            let r = mosaic[top + x];
            let g = ((mosaic[top + x + 1] as u32 + mosaic[bottom + x] as u32) / 2) as u16;
            let b = mosaic[bottom + x + 1];
            rgb.extend_from_slice(&[r, g, b]);
        }
    }
    (out_w, out_h, rgb)
}

/// Black level, white balance, color matrix, exposure and transfer curve;
/// emits tightly packed RGBA8.
fn develop(
    decoded: &rawloader::RawImage,
    params: &RenderParams,
    width: usize,
    height: usize,
    rgb: &[u16],
) -> Vec<u8> {
    // Combined matrix: camera native -> XYZ -> sRGB. cam_to_xyz is 3x4 with
    // an offset column.
    let cam_to_xyz = decoded.cam_to_xyz();
    let mut cam_to_srgb = [[0.0f32; 4]; 3];
    for r in 0..3 {
        for c in 0..4 {
            let mut sum = 0.0;
            for k in 0..3 {
                sum += XYZ_TO_SRGB[r][k] * cam_to_xyz[k][c];
            }
            cam_to_srgb[r][c] = sum;
        }
    }

    let gain = BASE_GAIN
        * 2.0f32.powf(
            (params.exposure.unwrap_or(0.0) + params.baseline_exposure.unwrap_or(0.0)) as f32,
        );
    for row in cam_to_srgb.iter_mut() {
        for v in row.iter_mut() {
            *v *= gain;
        }
    }

    let black_level = decoded.blacklevels[0] as f32;
    let white_level = decoded.whitelevels[0] as f32;
    let range = (white_level - black_level).max(1.0);

    let wb_r = decoded.wb_coeffs[0] / decoded.wb_coeffs[1];
    let wb_g = 1.0;
    let wb_b = decoded.wb_coeffs[2] / decoded.wb_coeffs[1];

    let mut pixels = Vec::with_capacity(width * height * 4);
    for px in rgb.chunks_exact(3) {
        let r_lin = ((px[0] as f32 - black_level).max(0.0) / range) * wb_r;
        let g_lin = ((px[1] as f32 - black_level).max(0.0) / range) * wb_g;
        let b_lin = ((px[2] as f32 - black_level).max(0.0) / range) * wb_b;

        let r = cam_to_srgb[0][0] * r_lin
            + cam_to_srgb[0][1] * g_lin
            + cam_to_srgb[0][2] * b_lin
            + cam_to_srgb[0][3];
        let g = cam_to_srgb[1][0] * r_lin
            + cam_to_srgb[1][1] * g_lin
            + cam_to_srgb[1][2] * b_lin
            + cam_to_srgb[1][3];
        let b = cam_to_srgb[2][0] * r_lin
            + cam_to_srgb[2][1] * g_lin
            + cam_to_srgb[2][2] * b_lin
            + cam_to_srgb[2][3];

        pixels.push(encode_srgb(r));
        pixels.push(encode_srgb(g));
        pixels.push(encode_srgb(b));
        pixels.push(0xFF);
    }
    pixels
}

/// Linear -> sRGB transfer curve, clamped to 8 bits.
fn encode_srgb(linear: f32) -> u8 {
    let v = linear.clamp(0.0, 1.0);
    let encoded = if v <= 0.0031308 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0 + 0.5) as u8
}

/// Nearest-neighbor scale of a tightly packed RGBA buffer.
fn resize_nearest(width: usize, height: usize, pixels: &[u8], scale: f64) -> (usize, usize, Vec<u8>) {
    let out_w = ((width as f64 * scale).round() as usize).max(1);
    let out_h = ((height as f64 * scale).round() as usize).max(1);
    let mut out = Vec::with_capacity(out_w * out_h * 4);
    for y in 0..out_h {
        let src_y = (y * height / out_h).min(height - 1);
        for x in 0..out_w {
            let src_x = (x * width / out_w).min(width - 1);
            let off = (src_y * width + src_x) * 4;
            out.extend_from_slice(&pixels[off..off + 4]);
        }
    }
    (out_w, out_h, out)
}

/// Source metadata: EXIF/TIFF/GPS dictionaries parsed out of the original
/// bytes, topped up with rawloader's camera identification when the EXIF
/// block lacks it.
fn read_metadata(bytes: &[u8], decoded: &rawloader::RawImage) -> SourceMetadata {
    let mut meta = exif_read::read(bytes).unwrap_or_else(|e| {
        debug!(error = %e, "no parseable EXIF in source, using decoder fields only");
        SourceMetadata::default()
    });

    use crate::pipeline::metadata::{MetadataValue, keys};
    if !decoded.clean_make.is_empty() {
        meta.tiff
            .entry(keys::MAKE.to_string())
            .or_insert_with(|| MetadataValue::Text(decoded.clean_make.clone()));
    }
    if !decoded.clean_model.is_empty() {
        meta.tiff
            .entry(keys::MODEL.to_string())
            .or_insert_with(|| MetadataValue::Text(decoded.clean_model.clone()));
    }
    meta
}
