//! Metadata module
//!
//! Engine-native source metadata, the public metadata shape, and the pure
//! extraction step between them.

mod extract;
pub mod keys;
mod types;

pub use extract::extract;
pub use types::{ImageMetadata, MetadataValue, SourceMetadata};
