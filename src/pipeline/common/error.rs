use thiserror::Error;

use crate::pipeline::options::format::SUPPORTED_FORMAT_NAMES;

fn supported_formats_list() -> String {
    SUPPORTED_FORMAT_NAMES.join(", ")
}

/// Error surface of the conversion pipeline.
///
/// The display strings are a stable contract: callers match on them, so the
/// wording of each variant must not change between releases. In particular
/// `EmptyExtent` is the canonical "these bytes are not decodable as RAW"
/// signal and must stay distinct from the I/O variants.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Input buffer is empty")]
    EmptyInputBuffer,

    #[error("File path cannot be empty")]
    EmptyInputPath,

    #[error("Output format must be a non-empty string")]
    EmptyOutputFormat,

    #[error("Unsupported output format: {0}. Supported formats: {list}", list = supported_formats_list())]
    UnsupportedOutputFormat(String),

    #[error("inputFormat is required when input is a Buffer")]
    MissingInputFormatHint,

    #[error("Options must be an object")]
    OptionsNotAnObject,

    #[error("Failed to read file from path: {0}")]
    FileRead(String),

    #[error("Failed to create render filter from image data")]
    RenderFilterCreation,

    #[error("Failed to get output image from render engine")]
    NoOutputImage,

    #[error("Output image has empty extent")]
    EmptyExtent,

    #[error("Failed to create image destination")]
    DestinationCreation,

    #[error("Failed to finalize image destination")]
    DestinationFinalize,

    #[error("Failed to extract RGB data from image")]
    RgbExtraction,

    /// Staging I/O failures (temp file creation/write). Path reads have
    /// their own variant above.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The background worker vanished without delivering a result. Only the
    /// asynchronous entry point can produce this.
    #[error("Conversion worker disconnected before delivering a result")]
    WorkerDisconnected,
}

pub type Result<T> = std::result::Result<T, ConvertError>;
