//! Output format enumeration and parsing.

use crate::pipeline::common::error::{ConvertError, Result};

/// Every format spelling accepted by [`OutputFormat::parse`], in the order
/// they are listed in the "unsupported format" error message.
pub const SUPPORTED_FORMAT_NAMES: [&str; 10] = [
    "jpeg", "jpg", "png", "tiff", "tif", "jpeg2000", "jp2", "heif", "heic", "rgb",
];

/// Closed set of output formats.
///
/// The alias spellings (`jpg`, `tif`, `heic`, `jp2`) collapse into their
/// canonical variant at parse time; aliases have identical encoding behavior
/// by contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Tiff,
    Jpeg2000,
    Heif,
    /// Raw interleaved RGB bytes, no container. Bypasses the encoder.
    Rgb,
}

impl OutputFormat {
    /// Parses a caller-supplied format string, case-insensitively and with
    /// surrounding whitespace trimmed.
    pub fn parse(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(ConvertError::EmptyOutputFormat);
        }
        match normalized.as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "tiff" | "tif" => Ok(Self::Tiff),
            "jpeg2000" | "jp2" => Ok(Self::Jpeg2000),
            "heif" | "heic" => Ok(Self::Heif),
            "rgb" => Ok(Self::Rgb),
            _ => Err(ConvertError::UnsupportedOutputFormat(normalized)),
        }
    }

    /// Lossy formats take a quality setting; the rest ignore it.
    pub fn is_lossy(self) -> bool {
        matches!(self, Self::Jpeg | Self::Jpeg2000 | Self::Heif)
    }

    /// Thumbnail embedding is only honored for JPEG and HEIF containers.
    pub fn supports_thumbnail(self) -> bool {
        matches!(self, Self::Jpeg | Self::Heif)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_names() {
        assert_eq!(OutputFormat::parse("jpeg").unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::parse("png").unwrap(), OutputFormat::Png);
        assert_eq!(OutputFormat::parse("tiff").unwrap(), OutputFormat::Tiff);
        assert_eq!(OutputFormat::parse("jpeg2000").unwrap(), OutputFormat::Jpeg2000);
        assert_eq!(OutputFormat::parse("heif").unwrap(), OutputFormat::Heif);
        assert_eq!(OutputFormat::parse("rgb").unwrap(), OutputFormat::Rgb);
    }

    #[test]
    fn aliases_collapse_to_canonical_variants() {
        assert_eq!(OutputFormat::parse("jpg").unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::parse("tif").unwrap(), OutputFormat::Tiff);
        assert_eq!(OutputFormat::parse("jp2").unwrap(), OutputFormat::Jpeg2000);
        assert_eq!(OutputFormat::parse("heic").unwrap(), OutputFormat::Heif);
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(OutputFormat::parse("  JPEG ").unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::parse("HeIc").unwrap(), OutputFormat::Heif);
    }

    #[test]
    fn empty_format_is_a_distinct_error() {
        assert!(matches!(
            OutputFormat::parse("   "),
            Err(ConvertError::EmptyOutputFormat)
        ));
    }

    #[test]
    fn unsupported_format_names_the_offender_and_the_supported_list() {
        let err = OutputFormat::parse("bmp").unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Unsupported output format: bmp"));
        assert!(msg.contains("jpeg2000"));
        assert!(msg.contains("rgb"));
    }

    #[test]
    fn lossy_and_thumbnail_families() {
        assert!(OutputFormat::Jpeg.is_lossy());
        assert!(OutputFormat::Heif.is_lossy());
        assert!(OutputFormat::Jpeg2000.is_lossy());
        assert!(!OutputFormat::Png.is_lossy());
        assert!(!OutputFormat::Tiff.is_lossy());
        assert!(OutputFormat::Jpeg.supports_thumbnail());
        assert!(OutputFormat::Heif.supports_thumbnail());
        assert!(!OutputFormat::Jpeg2000.supports_thumbnail());
    }
}
