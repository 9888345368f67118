//! Conversion input types and validation.

use std::path::{Path, PathBuf};

use crate::pipeline::common::error::{ConvertError, Result};

/// The source of one conversion: bytes already in memory, or a file path.
///
/// Borrowed on purpose: the synchronous pipeline never copies a caller's
/// buffer. The asynchronous entry point converts to [`OwnedInput`] before
/// crossing the worker boundary, because the borrow cannot outlive the
/// caller's frame.
#[derive(Debug, Clone, Copy)]
pub enum ConversionInput<'a> {
    Buffer(&'a [u8]),
    Path(&'a Path),
}

impl<'a> ConversionInput<'a> {
    /// Rejects degenerate inputs before any engine work begins.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Buffer(bytes) if bytes.is_empty() => Err(ConvertError::EmptyInputBuffer),
            Self::Path(path) if path.as_os_str().is_empty() => Err(ConvertError::EmptyInputPath),
            Self::Path(path) => {
                let trimmed = path.to_string_lossy();
                if trimmed.trim().is_empty() {
                    Err(ConvertError::EmptyInputPath)
                } else {
                    Ok(())
                }
            }
            Self::Buffer(_) => Ok(()),
        }
    }

    /// Copies the input into an owned value. The explicit copy is what lets
    /// the async layer outlive the caller's borrow.
    pub fn to_owned_input(&self) -> OwnedInput {
        match self {
            Self::Buffer(bytes) => OwnedInput::Buffer(bytes.to_vec()),
            Self::Path(path) => OwnedInput::Path(path.to_path_buf()),
        }
    }
}

impl<'a> From<&'a [u8]> for ConversionInput<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Buffer(bytes)
    }
}

impl<'a> From<&'a Path> for ConversionInput<'a> {
    fn from(path: &'a Path) -> Self {
        Self::Path(path)
    }
}

/// Owned counterpart of [`ConversionInput`], used for the worker hand-off.
#[derive(Debug, Clone)]
pub enum OwnedInput {
    Buffer(Vec<u8>),
    Path(PathBuf),
}

impl OwnedInput {
    pub fn as_input(&self) -> ConversionInput<'_> {
        match self {
            Self::Buffer(bytes) => ConversionInput::Buffer(bytes),
            Self::Path(path) => ConversionInput::Path(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_is_rejected() {
        let input = ConversionInput::Buffer(&[]);
        assert!(matches!(input.validate(), Err(ConvertError::EmptyInputBuffer)));
    }

    #[test]
    fn empty_and_whitespace_paths_are_rejected() {
        let input = ConversionInput::Path(Path::new(""));
        assert!(matches!(input.validate(), Err(ConvertError::EmptyInputPath)));
        let input = ConversionInput::Path(Path::new("   "));
        assert!(matches!(input.validate(), Err(ConvertError::EmptyInputPath)));
    }

    #[test]
    fn non_empty_inputs_pass_validation() {
        assert!(ConversionInput::Buffer(b"raw bytes").validate().is_ok());
        assert!(ConversionInput::Path(Path::new("photo.arw")).validate().is_ok());
    }

    #[test]
    fn owned_copy_round_trips() {
        let bytes = vec![1u8, 2, 3];
        let owned = ConversionInput::Buffer(&bytes).to_owned_input();
        drop(bytes);
        match owned.as_input() {
            ConversionInput::Buffer(b) => assert_eq!(b, &[1, 2, 3]),
            _ => panic!("expected a buffer"),
        }
    }
}
