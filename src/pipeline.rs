//! RAW conversion pipeline module
//!
//! This module provides a structured approach to camera RAW conversions,
//! with separate modules for input handling, rendering, metadata extraction,
//! encoding and orchestration.

pub mod common;
pub mod conversions;
pub mod encode;
pub mod executor;
pub mod metadata;
pub mod options;
pub mod render;
pub mod source;

pub use common::{
    ConvertError,
    Result,
};

pub use options::{
    ConversionOptions,
    OutputFormat,
};

pub use source::{
    ConversionInput,
};

pub use render::{
    RawLoaderEngine,
    RenderEngine,
    RenderedImage,
};

pub use metadata::{
    ImageMetadata,
    SourceMetadata,
};

pub use encode::{
    ContainerEncoder,
    EncoderParams,
    ImageCrateEncoder,
};

pub use conversions::{
    OutputImage,
    RawConverter,
};

pub use executor::{
    AsyncRawConverter,
    ConversionHandle,
};
