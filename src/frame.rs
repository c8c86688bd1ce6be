// SPDX-License-Identifier: GPL-3.0-only

//! Shared frame types
//!
//! A [`FrameView`] is a borrowed, read-only view of one decoded frame from
//! the capture collaborator; a [`DisplayImage`] is the freshly allocated
//! premultiplied-alpha BGRA buffer handed to the display collaborator.
//! The converter never retains either past a single conversion call.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of sensor a frame came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// Visible-light color camera
    Color,
    /// Depth (ranging) sensor
    Depth,
    /// Infrared intensity sensor
    Infrared,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Color => write!(f, "color"),
            SourceKind::Depth => write!(f, "depth"),
            SourceKind::Infrared => write!(f, "infrared"),
        }
    }
}

/// Native pixel format of a raw frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawPixelFormat {
    /// 8-bit per channel BGRA (4 bytes per pixel)
    Bgra8,
    /// 8-bit single-channel grayscale
    Gray8,
    /// 16-bit single-channel grayscale, little-endian
    Gray16,
}

impl RawPixelFormat {
    /// Bytes per pixel for this format
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            RawPixelFormat::Bgra8 => 4,
            RawPixelFormat::Gray8 => 1,
            RawPixelFormat::Gray16 => 2,
        }
    }
}

impl fmt::Display for RawPixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawPixelFormat::Bgra8 => write!(f, "Bgra8"),
            RawPixelFormat::Gray8 => write!(f, "Gray8"),
            RawPixelFormat::Gray16 => write!(f, "Gray16"),
        }
    }
}

/// Borrowed view of one decoded frame
///
/// `stride` is the row length in bytes and may exceed
/// `width * bytes_per_pixel` due to alignment padding. Padding bytes are
/// never read by the converter.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub kind: SourceKind,
    pub format: RawPixelFormat,
    pub width: u32,
    pub height: u32,
    /// Row stride in bytes, including any padding
    pub stride: u32,
    pub data: &'a [u8],
}

impl FrameView<'_> {
    /// Bytes of actual pixel data per row (excluding padding)
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// Minimum buffer length the frame geometry implies
    ///
    /// The final row does not need trailing padding, so this is
    /// `stride * (height - 1) + row_bytes`.
    pub fn min_buffer_len(&self) -> usize {
        if self.height == 0 {
            return 0;
        }
        self.stride as usize * (self.height as usize - 1) + self.row_bytes()
    }
}

/// Owned premultiplied-alpha BGRA image ready for display
///
/// Always freshly allocated by a conversion; rows are tightly packed
/// (stride = width * 4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl DisplayImage {
    /// Allocate a zeroed image of the given pixel dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width as usize * height as usize * 4],
        }
    }

    /// Pixel width
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes (rows are tightly packed)
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }

    /// Full BGRA pixel buffer
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// One row of BGRA bytes
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// One mutable row of BGRA bytes
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &mut self.data[start..start + stride]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_buffer_len_excludes_final_padding() {
        let frame = FrameView {
            kind: SourceKind::Color,
            format: RawPixelFormat::Bgra8,
            width: 4,
            height: 4,
            stride: 20,
            data: &[],
        };
        // 3 padded rows plus one unpadded row
        assert_eq!(frame.min_buffer_len(), 20 * 3 + 16);
    }

    #[test]
    fn test_display_image_rows() {
        let mut image = DisplayImage::new(2, 2);
        image.row_mut(1).copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(image.row(0), &[0; 8]);
        assert_eq!(image.row(1), &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(image.stride(), 8);
    }

    #[test]
    fn test_bytes_per_pixel() {
        assert_eq!(RawPixelFormat::Bgra8.bytes_per_pixel(), 4);
        assert_eq!(RawPixelFormat::Gray8.bytes_per_pixel(), 1);
        assert_eq!(RawPixelFormat::Gray16.bytes_per_pixel(), 2);
    }
}
