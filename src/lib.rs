pub mod logger;
pub mod pipeline;

pub use pipeline::{
    AsyncRawConverter, ContainerEncoder, ConversionHandle, ConversionInput, ConversionOptions,
    ConvertError, ImageMetadata, OutputFormat, OutputImage, RawConverter, RenderEngine, Result,
};
