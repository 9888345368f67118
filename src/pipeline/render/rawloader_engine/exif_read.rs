//! EXIF/GPS reading for the default engine, via nom-exif.
//!
//! Tags are looked up by their numeric codes rather than named enum
//! variants, so the set read here is independent of the parser's tag-name
//! coverage. Values arrive through their display form, which for rationals
//! is `num/den`; `parse_numeric` handles both that and plain numbers.

use std::io::Cursor;

use nom_exif::{ExifIter, MediaParser, MediaSource};

use crate::pipeline::metadata::{MetadataValue, SourceMetadata, keys};

// IFD0 tags
const TAG_MAKE: u16 = 0x010F;
const TAG_MODEL: u16 = 0x0110;
const TAG_ORIENTATION: u16 = 0x0112;
const TAG_SOFTWARE: u16 = 0x0131;

// Exif sub-IFD tags
const TAG_EXPOSURE_TIME: u16 = 0x829A;
const TAG_F_NUMBER: u16 = 0x829D;
const TAG_ISO: u16 = 0x8827;
const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;
const TAG_EXPOSURE_BIAS: u16 = 0x9204;
const TAG_FOCAL_LENGTH: u16 = 0x920A;
const TAG_EXPOSURE_MODE: u16 = 0xA402;
const TAG_WHITE_BALANCE: u16 = 0xA403;
const TAG_FOCAL_LENGTH_35MM: u16 = 0xA405;
const TAG_LENS_MAKE: u16 = 0xA433;
const TAG_LENS_MODEL: u16 = 0xA434;

/// Parses the EXIF block out of the source bytes. Returns an error only when
/// there is no parseable EXIF at all; individual missing tags are simply
/// absent from the result.
pub fn read(bytes: &[u8]) -> anyhow::Result<SourceMetadata> {
    let mut parser = MediaParser::new();
    let ms = MediaSource::seekable(Cursor::new(bytes.to_vec()))?;
    let iter: ExifIter = parser.parse(ms)?;

    // GPS must be taken before the iterator is consumed into Exif.
    let gps_info = iter.parse_gps_info().ok().flatten();
    let exif: nom_exif::Exif = iter.into();

    let mut meta = SourceMetadata::default();

    put_text(&mut meta.tiff, keys::MAKE, &exif, TAG_MAKE);
    put_text(&mut meta.tiff, keys::MODEL, &exif, TAG_MODEL);
    put_text(&mut meta.tiff, keys::SOFTWARE, &exif, TAG_SOFTWARE);
    put_int(&mut meta.tiff, keys::ORIENTATION, &exif, TAG_ORIENTATION);

    put_real(&mut meta.exif, keys::EXPOSURE_TIME, &exif, TAG_EXPOSURE_TIME);
    put_real(&mut meta.exif, keys::F_NUMBER, &exif, TAG_F_NUMBER);
    put_int(&mut meta.exif, keys::ISO_SPEED_RATINGS, &exif, TAG_ISO);
    put_text(
        &mut meta.exif,
        keys::DATE_TIME_ORIGINAL,
        &exif,
        TAG_DATE_TIME_ORIGINAL,
    );
    put_real(&mut meta.exif, keys::EXPOSURE_BIAS, &exif, TAG_EXPOSURE_BIAS);
    put_real(&mut meta.exif, keys::FOCAL_LENGTH, &exif, TAG_FOCAL_LENGTH);
    put_int(&mut meta.exif, keys::EXPOSURE_MODE, &exif, TAG_EXPOSURE_MODE);
    put_int(&mut meta.exif, keys::WHITE_BALANCE, &exif, TAG_WHITE_BALANCE);
    put_real(
        &mut meta.exif,
        keys::FOCAL_LENGTH_35MM,
        &exif,
        TAG_FOCAL_LENGTH_35MM,
    );
    put_text(&mut meta.exif, keys::LENS_MAKE, &exif, TAG_LENS_MAKE);
    put_text(&mut meta.exif, keys::LENS_MODEL, &exif, TAG_LENS_MODEL);

    if let Some(gps) = gps_info {
        meta.gps.insert(
            keys::LATITUDE.to_string(),
            MetadataValue::Real(latlng_magnitude(&gps.latitude)),
        );
        meta.gps.insert(
            keys::LATITUDE_REF.to_string(),
            MetadataValue::Text(gps.latitude_ref.to_string()),
        );
        meta.gps.insert(
            keys::LONGITUDE.to_string(),
            MetadataValue::Real(latlng_magnitude(&gps.longitude)),
        );
        meta.gps.insert(
            keys::LONGITUDE_REF.to_string(),
            MetadataValue::Text(gps.longitude_ref.to_string()),
        );
        let altitude = gps.altitude.0 as f64 / (gps.altitude.1 as f64).max(1.0);
        // altitude_ref 1 means below sea level
        let altitude = if gps.altitude_ref == 1 { -altitude } else { altitude };
        meta.gps
            .insert(keys::ALTITUDE.to_string(), MetadataValue::Real(altitude));
    }

    Ok(meta)
}

fn lookup_string(exif: &nom_exif::Exif, tag: u16) -> Option<String> {
    let value = exif.get_by_ifd_tag_code(0, tag)?;
    let s = value.to_string();
    let s = s.trim().trim_matches('"').to_string();
    if s.is_empty() { None } else { Some(s) }
}

fn put_text(
    dict: &mut std::collections::BTreeMap<String, MetadataValue>,
    key: &str,
    exif: &nom_exif::Exif,
    tag: u16,
) {
    if let Some(s) = lookup_string(exif, tag) {
        dict.insert(key.to_string(), MetadataValue::Text(s));
    }
}

fn put_real(
    dict: &mut std::collections::BTreeMap<String, MetadataValue>,
    key: &str,
    exif: &nom_exif::Exif,
    tag: u16,
) {
    if let Some(v) = lookup_string(exif, tag).as_deref().and_then(parse_numeric) {
        dict.insert(key.to_string(), MetadataValue::Real(v));
    }
}

fn put_int(
    dict: &mut std::collections::BTreeMap<String, MetadataValue>,
    key: &str,
    exif: &nom_exif::Exif,
    tag: u16,
) {
    if let Some(v) = lookup_string(exif, tag).as_deref().and_then(parse_numeric) {
        dict.insert(key.to_string(), MetadataValue::Int(v.round() as i64));
    }
}

/// Accepts both plain numbers and `num/den` rational renderings.
fn parse_numeric(s: &str) -> Option<f64> {
    let s = s.trim();
    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.trim().parse().ok()?;
        let den: f64 = den.trim().parse().ok()?;
        if den == 0.0 {
            return None;
        }
        return Some(num / den);
    }
    s.parse().ok()
}

/// Degrees/minutes/seconds rationals to decimal degrees, unsigned. The
/// hemisphere reference carries the sign separately.
fn latlng_magnitude(latlng: &nom_exif::LatLng) -> f64 {
    let degrees = latlng.0.0 as f64 / (latlng.0.1 as f64).max(1.0);
    let minutes = latlng.1.0 as f64 / (latlng.1.1 as f64).max(1.0);
    let seconds = latlng.2.0 as f64 / (latlng.2.1 as f64).max(1.0);
    degrees + minutes / 60.0 + seconds / 3600.0
}
