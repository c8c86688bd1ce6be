// SPDX-License-Identifier: GPL-3.0-only

//! Error types for frame conversion

use crate::frame::{RawPixelFormat, SourceKind};
use std::fmt;

/// Result type alias using ConvertError
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors raised while converting one frame
///
/// All of these are contained at the conversion boundary: the caller sees
/// "no image produced" and continues with the next frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// Source kind / pixel format combination not handled
    UnsupportedFormat {
        kind: SourceKind,
        format: RawPixelFormat,
    },
    /// Frame has zero width, zero height, or an empty buffer
    EmptyFrame,
    /// Row stride smaller than one row of pixels
    StrideTooSmall { stride: u32, row_bytes: usize },
    /// Input buffer shorter than the frame geometry implies
    BufferTooSmall { expected: usize, actual: usize },
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::UnsupportedFormat { kind, format } => {
                write!(f, "Unsupported format: {} frame in {}", kind, format)
            }
            ConvertError::EmptyFrame => write!(f, "Empty frame"),
            ConvertError::StrideTooSmall { stride, row_bytes } => {
                write!(
                    f,
                    "Stride too small: {} bytes for {}-byte rows",
                    stride, row_bytes
                )
            }
            ConvertError::BufferTooSmall { expected, actual } => {
                write!(
                    f,
                    "Buffer too small: expected at least {} bytes, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for ConvertError {}
