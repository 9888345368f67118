//! Public metadata extraction.

use crate::pipeline::metadata::keys;
use crate::pipeline::metadata::types::{ImageMetadata, SourceMetadata};
use crate::pipeline::render::RenderedImage;

/// Builds the public metadata shape from engine-native metadata.
///
/// Pure and opportunistic: width/height always come from the rendered image,
/// every other field is copied only when the source carries it. Nothing is
/// synthesized or defaulted to zero.
pub fn extract(source: Option<&SourceMetadata>, image: &RenderedImage) -> ImageMetadata {
    let mut meta = ImageMetadata {
        width: image.width(),
        height: image.height(),
        ..Default::default()
    };

    let Some(source) = source else {
        return meta;
    };

    let exif = &source.exif;
    meta.focal_length_35mm = exif.get(keys::FOCAL_LENGTH_35MM).and_then(|v| v.as_f64());
    meta.shutter_speed = exif.get(keys::EXPOSURE_TIME).and_then(|v| v.as_f64());
    meta.f_number = exif.get(keys::F_NUMBER).and_then(|v| v.as_f64());
    meta.iso = exif.get(keys::ISO_SPEED_RATINGS).and_then(|v| v.as_i64());
    meta.date_time_original = exif
        .get(keys::DATE_TIME_ORIGINAL)
        .and_then(|v| v.as_text())
        .map(str::to_string);
    meta.lens_make = exif
        .get(keys::LENS_MAKE)
        .and_then(|v| v.as_text())
        .map(str::to_string);
    meta.lens_model = exif
        .get(keys::LENS_MODEL)
        .and_then(|v| v.as_text())
        .map(str::to_string);
    meta.focal_length = exif.get(keys::FOCAL_LENGTH).and_then(|v| v.as_f64());
    meta.white_balance = exif.get(keys::WHITE_BALANCE).and_then(|v| v.as_i64());
    meta.exposure_mode = exif.get(keys::EXPOSURE_MODE).and_then(|v| v.as_i64());
    meta.exposure_bias = exif.get(keys::EXPOSURE_BIAS).and_then(|v| v.as_f64());

    let tiff = &source.tiff;
    meta.camera_make = tiff
        .get(keys::MAKE)
        .and_then(|v| v.as_text())
        .map(str::to_string);
    meta.camera_model = tiff
        .get(keys::MODEL)
        .and_then(|v| v.as_text())
        .map(str::to_string);
    meta.software = tiff
        .get(keys::SOFTWARE)
        .and_then(|v| v.as_text())
        .map(str::to_string);
    meta.orientation = tiff.get(keys::ORIENTATION).and_then(|v| v.as_i64());

    let gps = &source.gps;
    meta.latitude = signed_coordinate(gps, keys::LATITUDE, keys::LATITUDE_REF, "S");
    meta.longitude = signed_coordinate(gps, keys::LONGITUDE, keys::LONGITUDE_REF, "W");
    meta.altitude = gps.get(keys::ALTITUDE).and_then(|v| v.as_f64());

    meta
}

/// EXIF stores coordinates as magnitudes with a hemisphere reference; the
/// southern and western hemispheres negate the magnitude.
fn signed_coordinate(
    gps: &std::collections::BTreeMap<String, super::MetadataValue>,
    value_key: &str,
    ref_key: &str,
    negative_ref: &str,
) -> Option<f64> {
    let magnitude = gps.get(value_key)?.as_f64()?;
    let negate = gps
        .get(ref_key)
        .and_then(|v| v.as_text())
        .is_some_and(|r| r.eq_ignore_ascii_case(negative_ref));
    Some(if negate { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::metadata::MetadataValue;

    fn image_4x2() -> RenderedImage {
        RenderedImage::from_rgba8(4, 2, vec![0u8; 32]).unwrap()
    }

    #[test]
    fn dimensions_always_present_even_without_source_metadata() {
        let meta = extract(None, &image_4x2());
        assert_eq!(meta.width, 4);
        assert_eq!(meta.height, 2);
        assert_eq!(meta.camera_make, None);
        assert_eq!(meta.shutter_speed, None);
    }

    #[test]
    fn fields_are_copied_opportunistically() {
        let mut source = SourceMetadata::default();
        source
            .exif
            .insert(keys::EXPOSURE_TIME.into(), MetadataValue::Real(0.004));
        source
            .exif
            .insert(keys::F_NUMBER.into(), MetadataValue::Real(2.8));
        source
            .exif
            .insert(keys::ISO_SPEED_RATINGS.into(), MetadataValue::Int(400));
        source
            .tiff
            .insert(keys::MAKE.into(), MetadataValue::Text("SONY".into()));
        source
            .tiff
            .insert(keys::MODEL.into(), MetadataValue::Text("ILCE-7M3".into()));

        let meta = extract(Some(&source), &image_4x2());
        assert_eq!(meta.shutter_speed, Some(0.004));
        assert_eq!(meta.f_number, Some(2.8));
        assert_eq!(meta.iso, Some(400));
        assert_eq!(meta.camera_make.as_deref(), Some("SONY"));
        assert_eq!(meta.camera_model.as_deref(), Some("ILCE-7M3"));
        // untouched fields stay absent
        assert_eq!(meta.lens_model, None);
        assert_eq!(meta.latitude, None);
    }

    #[test]
    fn zero_valued_fields_are_distinct_from_absent() {
        let mut source = SourceMetadata::default();
        source
            .exif
            .insert(keys::EXPOSURE_BIAS.into(), MetadataValue::Real(0.0));
        let meta = extract(Some(&source), &image_4x2());
        assert_eq!(meta.exposure_bias, Some(0.0));
        assert_eq!(meta.shutter_speed, None);
    }

    #[test]
    fn southern_and_western_hemispheres_negate() {
        let mut source = SourceMetadata::default();
        source
            .gps
            .insert(keys::LATITUDE.into(), MetadataValue::Real(33.8688));
        source
            .gps
            .insert(keys::LATITUDE_REF.into(), MetadataValue::Text("S".into()));
        source
            .gps
            .insert(keys::LONGITUDE.into(), MetadataValue::Real(151.2093));
        source
            .gps
            .insert(keys::LONGITUDE_REF.into(), MetadataValue::Text("E".into()));

        let meta = extract(Some(&source), &image_4x2());
        assert_eq!(meta.latitude, Some(-33.8688));
        assert_eq!(meta.longitude, Some(151.2093));
    }

    #[test]
    fn northern_and_eastern_hemispheres_stay_positive() {
        let mut source = SourceMetadata::default();
        source
            .gps
            .insert(keys::LATITUDE.into(), MetadataValue::Real(59.3293));
        source
            .gps
            .insert(keys::LATITUDE_REF.into(), MetadataValue::Text("N".into()));
        source
            .gps
            .insert(keys::LONGITUDE.into(), MetadataValue::Real(122.4194));
        source
            .gps
            .insert(keys::LONGITUDE_REF.into(), MetadataValue::Text("W".into()));

        let meta = extract(Some(&source), &image_4x2());
        assert_eq!(meta.latitude, Some(59.3293));
        assert_eq!(meta.longitude, Some(-122.4194));
    }
}
