//! Source resolution and temporary staging.
//!
//! Resolves a [`ConversionInput`] into bytes the render engine can consume.
//! Some engines only accept input as a named file with a recognizable
//! extension; [`StagedFile`] covers that case with a uniquely named temp file
//! that is removed when it goes out of scope, on success and failure paths
//! alike.

use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::pipeline::common::error::{ConvertError, Result};
use crate::pipeline::options::ConversionOptions;
use crate::pipeline::source::input::ConversionInput;

/// Input bytes resolved into memory, plus the extension hint used if the
/// engine needs file staging.
#[derive(Debug)]
pub struct ResolvedSource<'a> {
    pub bytes: Cow<'a, [u8]>,
    /// Lowercased extension without the dot. Priority: explicit
    /// `inputFormat` hint, then the original path's extension, else none.
    pub extension: Option<String>,
}

/// Reads the input into memory. Path inputs that cannot be read are a hard
/// failure; buffer inputs are borrowed as-is.
pub fn load<'a>(
    input: &ConversionInput<'a>,
    options: &ConversionOptions,
) -> Result<ResolvedSource<'a>> {
    let hint = options
        .input_format
        .as_deref()
        .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase());

    match input {
        ConversionInput::Buffer(bytes) => Ok(ResolvedSource {
            bytes: Cow::Borrowed(bytes),
            extension: hint,
        }),
        ConversionInput::Path(path) => {
            let bytes = std::fs::read(path)
                .map_err(|e| ConvertError::FileRead(format!("{}: {}", path.display(), e)))?;
            debug!(path = %path.display(), size = bytes.len(), "read source file");
            let extension = hint.or_else(|| path_extension(path));
            Ok(ResolvedSource {
                bytes: Cow::Owned(bytes),
                extension,
            })
        }
    }
}

fn path_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// A per-request staging file. Dropping the value deletes the file.
pub struct StagedFile {
    file: NamedTempFile,
}

impl StagedFile {
    /// Writes the resolved bytes into a uniquely named temp file carrying
    /// the source's extension, so engines that sniff by file name still
    /// recognize the format.
    pub fn create(source: &ResolvedSource<'_>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("rawbridge-");
        let suffix;
        if let Some(ext) = &source.extension {
            suffix = format!(".{ext}");
            builder.suffix(&suffix);
        }
        let mut file = builder.tempfile()?;
        file.write_all(&source.bytes)?;
        file.flush()?;
        debug!(path = %file.path().display(), size = source.bytes.len(), "staged input file");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
