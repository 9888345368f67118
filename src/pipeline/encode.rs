//! Encoding module
//!
//! Format dispatch, the container encoder seam, raw RGB extraction, and the
//! default image-crate-backed encoder with JPEG EXIF write-back.

mod dispatch;
mod encoder;
mod exif_writer;
mod image_encoder;
mod rgb;

pub use dispatch::encode_output;
pub use encoder::{ContainerEncoder, DEFAULT_QUALITY, EncoderParams};
pub use image_encoder::ImageCrateEncoder;
pub use rgb::extract_rgb;
