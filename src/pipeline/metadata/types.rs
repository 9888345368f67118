//! Metadata data model.

use std::collections::BTreeMap;

/// A single metadata entry as read from the source image.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Text(String),
    Real(f64),
    Int(i64),
}

impl MetadataValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            Self::Text(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Real(v) => Some(*v as i64),
            Self::Text(_) => None,
        }
    }
}

/// Engine-native metadata, grouped the way image containers group it:
/// the EXIF block, the top-level TIFF/IFD0 block, and the GPS block.
///
/// Carried alongside a rendered image for two purposes: EXIF preservation
/// (fed back to the container encoder) and public metadata extraction. Keys
/// are the constants in [`super::keys`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceMetadata {
    pub exif: BTreeMap<String, MetadataValue>,
    pub tiff: BTreeMap<String, MetadataValue>,
    pub gps: BTreeMap<String, MetadataValue>,
}

impl SourceMetadata {
    pub fn is_empty(&self) -> bool {
        self.exif.is_empty() && self.tiff.is_empty() && self.gps.is_empty()
    }
}

/// Public metadata shape handed to callers.
///
/// `width`/`height` always describe the rendered image. Every other field is
/// optional: absence means the source did not carry the field, never an
/// error, and a genuine zero (say a 0.0 exposure bias) is distinct from
/// absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub focal_length_35mm: Option<f64>,
    pub shutter_speed: Option<f64>,
    pub f_number: Option<f64>,
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
    pub iso: Option<i64>,
    pub date_time_original: Option<String>,
    pub lens_make: Option<String>,
    pub lens_model: Option<String>,
    pub focal_length: Option<f64>,
    pub white_balance: Option<i64>,
    pub exposure_mode: Option<i64>,
    pub exposure_bias: Option<f64>,
    pub software: Option<String>,
    pub orientation: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
}
