//! EXIF write-back for encoded JPEG output.
//!
//! Serializes the preserved source dictionaries into an EXIF block with
//! little_exif and splices it into the encoded JPEG as the APP1 segment via
//! img-parts. The splice merges: the compressed image data and every other
//! segment stay untouched, only the EXIF segment is (re)placed.

use img_parts::ImageEXIF;
use img_parts::jpeg::Jpeg;
use little_exif::endian::Endian;
use little_exif::exif_tag::{ExifTag, ExifTagGroup};
use little_exif::exif_tag_format::ExifTagFormat;
use little_exif::filetype::FileExtension;
use little_exif::metadata::Metadata;
use tracing::{debug, warn};

use crate::pipeline::common::error::{ConvertError, Result};
use crate::pipeline::metadata::{MetadataValue, SourceMetadata, keys};

// Tag IDs for the preserved fields.
const TAG_MAKE: u16 = 0x010F;
const TAG_MODEL: u16 = 0x0110;
const TAG_ORIENTATION: u16 = 0x0112;
const TAG_SOFTWARE: u16 = 0x0131;
const TAG_EXPOSURE_TIME: u16 = 0x829A;
const TAG_F_NUMBER: u16 = 0x829D;
const TAG_ISO: u16 = 0x8827;
const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;
const TAG_FOCAL_LENGTH: u16 = 0x920A;
const TAG_LENS_MAKE: u16 = 0xA433;
const TAG_LENS_MODEL: u16 = 0xA434;

// little_exif's as_u8_vec(JPEG) returns [APP1 marker 2B][length 2B]
// [Exif\0\0 6B][TIFF data]; img-parts set_exif() wants just the TIFF data.
const JPEG_EXIF_OVERHEAD: usize = 10;

/// Splices the source metadata into an encoded JPEG. Returns the input
/// unchanged when there is nothing to write.
pub fn embed_jpeg_exif(encoded: Vec<u8>, metadata: &SourceMetadata) -> Result<Vec<u8>> {
    let mut exif = Metadata::new();
    let mut tags_written = 0usize;

    tags_written += put_string(&mut exif, TAG_MAKE, metadata.tiff.get(keys::MAKE));
    tags_written += put_string(&mut exif, TAG_MODEL, metadata.tiff.get(keys::MODEL));
    tags_written += put_string(&mut exif, TAG_SOFTWARE, metadata.tiff.get(keys::SOFTWARE));
    tags_written += put_short(&mut exif, TAG_ORIENTATION, metadata.tiff.get(keys::ORIENTATION));

    tags_written += put_rational(
        &mut exif,
        TAG_EXPOSURE_TIME,
        metadata.exif.get(keys::EXPOSURE_TIME),
    );
    tags_written += put_rational(&mut exif, TAG_F_NUMBER, metadata.exif.get(keys::F_NUMBER));
    tags_written += put_short(&mut exif, TAG_ISO, metadata.exif.get(keys::ISO_SPEED_RATINGS));
    tags_written += put_string(
        &mut exif,
        TAG_DATE_TIME_ORIGINAL,
        metadata.exif.get(keys::DATE_TIME_ORIGINAL),
    );
    tags_written += put_rational(
        &mut exif,
        TAG_FOCAL_LENGTH,
        metadata.exif.get(keys::FOCAL_LENGTH),
    );
    tags_written += put_string(&mut exif, TAG_LENS_MAKE, metadata.exif.get(keys::LENS_MAKE));
    tags_written += put_string(&mut exif, TAG_LENS_MODEL, metadata.exif.get(keys::LENS_MODEL));

    if tags_written == 0 {
        debug!("no serializable metadata entries, skipping EXIF embed");
        return Ok(encoded);
    }

    let exif_bytes = exif.as_u8_vec(FileExtension::JPEG);
    if exif_bytes.len() <= JPEG_EXIF_OVERHEAD {
        warn!("serialized EXIF block is degenerate, skipping embed");
        return Ok(encoded);
    }
    let tiff_data = exif_bytes[JPEG_EXIF_OVERHEAD..].to_vec();

    let mut jpeg = Jpeg::from_bytes(encoded.into()).map_err(|e| {
        warn!(error = %e, "encoded JPEG not re-parseable for EXIF splice");
        ConvertError::DestinationFinalize
    })?;
    jpeg.set_exif(Some(tiff_data.into()));

    let mut out = Vec::new();
    jpeg.encoder().write_to(&mut out).map_err(|e| {
        warn!(error = %e, "EXIF splice write failed");
        ConvertError::DestinationFinalize
    })?;
    debug!(tags = tags_written, "embedded EXIF block into JPEG output");
    Ok(out)
}

fn put_string(exif: &mut Metadata, tag: u16, value: Option<&MetadataValue>) -> usize {
    let Some(text) = value.and_then(|v| v.as_text()) else {
        return 0;
    };
    let mut raw = text.as_bytes().to_vec();
    raw.push(0);
    match ExifTag::from_u16_with_data(
        tag,
        &ExifTagFormat::STRING,
        &raw,
        &Endian::Little,
        &ExifTagGroup::IFD0,
    ) {
        Ok(t) => {
            exif.set_tag(t);
            1
        }
        Err(_) => 0,
    }
}

fn put_short(exif: &mut Metadata, tag: u16, value: Option<&MetadataValue>) -> usize {
    let Some(v) = value.and_then(|v| v.as_i64()) else {
        return 0;
    };
    if !(0..=u16::MAX as i64).contains(&v) {
        return 0;
    }
    let raw = (v as u16).to_le_bytes().to_vec();
    match ExifTag::from_u16_with_data(
        tag,
        &ExifTagFormat::INT16U,
        &raw,
        &Endian::Little,
        &ExifTagGroup::IFD0,
    ) {
        Ok(t) => {
            exif.set_tag(t);
            1
        }
        Err(_) => 0,
    }
}

fn put_rational(exif: &mut Metadata, tag: u16, value: Option<&MetadataValue>) -> usize {
    let Some(v) = value.and_then(|v| v.as_f64()) else {
        return 0;
    };
    if !(v.is_finite() && v >= 0.0) {
        return 0;
    }
    let (num, den) = to_rational(v);
    let mut raw = Vec::with_capacity(8);
    raw.extend_from_slice(&num.to_le_bytes());
    raw.extend_from_slice(&den.to_le_bytes());
    match ExifTag::from_u16_with_data(
        tag,
        &ExifTagFormat::RATIONAL64U,
        &raw,
        &Endian::Little,
        &ExifTagGroup::IFD0,
    ) {
        Ok(t) => {
            exif.set_tag(t);
            1
        }
        Err(_) => 0,
    }
}

/// Approximates a non-negative float as an unsigned rational.
fn to_rational(v: f64) -> (u32, u32) {
    const DEN: u64 = 1_000_000;
    let num = (v * DEN as f64).round() as u64;
    let g = gcd(num.max(1), DEN);
    (((num / g).min(u32::MAX as u64)) as u32, (DEN / g) as u32)
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}
