//! Dictionary keys for [`SourceMetadata`](super::SourceMetadata).
//!
//! Spellings follow the EXIF/TIFF tag names so entries round-trip cleanly
//! through third-party readers.

// EXIF block
pub const EXPOSURE_TIME: &str = "ExposureTime";
pub const F_NUMBER: &str = "FNumber";
pub const ISO_SPEED_RATINGS: &str = "ISOSpeedRatings";
pub const FOCAL_LENGTH: &str = "FocalLength";
pub const FOCAL_LENGTH_35MM: &str = "FocalLenIn35mmFilm";
pub const DATE_TIME_ORIGINAL: &str = "DateTimeOriginal";
pub const LENS_MAKE: &str = "LensMake";
pub const LENS_MODEL: &str = "LensModel";
pub const WHITE_BALANCE: &str = "WhiteBalance";
pub const EXPOSURE_MODE: &str = "ExposureMode";
pub const EXPOSURE_BIAS: &str = "ExposureBiasValue";

// TIFF / IFD0 block
pub const MAKE: &str = "Make";
pub const MODEL: &str = "Model";
pub const SOFTWARE: &str = "Software";
pub const ORIENTATION: &str = "Orientation";

// GPS block. Latitude/longitude are stored as unsigned magnitudes with a
// separate hemisphere reference, exactly as EXIF carries them; sign
// correction happens at extraction time.
pub const LATITUDE: &str = "Latitude";
pub const LATITUDE_REF: &str = "LatitudeRef";
pub const LONGITUDE: &str = "Longitude";
pub const LONGITUDE_REF: &str = "LongitudeRef";
pub const ALTITUDE: &str = "Altitude";
