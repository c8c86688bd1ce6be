// SPDX-License-Identifier: GPL-3.0-only

//! Frame conversion
//!
//! This module turns one decoded sensor frame into a displayable
//! premultiplied-alpha BGRA image. It consists of:
//!
//! - format negotiation ([`accepted_subtype`]) used when configuring the
//!   capture device before streaming starts,
//! - a pure dispatch step ([`plan_conversion`]) that decides how a frame will
//!   be converted before any buffer access,
//! - a generic row driver that walks input and output buffers with their own
//!   strides and applies a scanline transform per row,
//! - the raw-copy and downsample-and-rotate special cases for color frames.
//!
//! All failures are contained here: unsupported or malformed frames are
//! logged and yield no image, and the next frame proceeds undisturbed.

pub mod lut;
pub mod ramp;
pub mod scanline;

use crate::constants::{DEPTH_SCALE, DepthRangePreset, ReliableDepthRange, lowres};
use crate::errors::{ConvertError, ConvertResult};
use crate::frame::{DisplayImage, FrameView, RawPixelFormat, SourceKind};
use ramp::ColorBgra;
use scanline::{depth_row, infrared8_row, infrared16_row};
use tracing::warn;

/// Wire subtype requested for color sources
pub const SUBTYPE_BGRA8: &str = "Bgra8";
/// 16-bit single-channel depth wire subtype
pub const SUBTYPE_D16: &str = "D16";
/// 8-bit single-channel luminance wire subtype
pub const SUBTYPE_L8: &str = "L8";
/// 16-bit single-channel luminance wire subtype
pub const SUBTYPE_L16: &str = "L16";

/// Select the wire subtype to request from the capture device
///
/// Color sources accept any offered subtype and request conversion to Bgra8.
/// Depth accepts only D16; infrared accepts L8, L16 or D16. Subtype
/// comparison ignores case since wire subtype strings differ in case between
/// devices. Returns `None` for combinations this library cannot render.
pub fn accepted_subtype(kind: SourceKind, subtype: &str) -> Option<String> {
    match kind {
        SourceKind::Color => Some(SUBTYPE_BGRA8.to_string()),
        SourceKind::Depth => subtype
            .eq_ignore_ascii_case(SUBTYPE_D16)
            .then(|| subtype.to_string()),
        SourceKind::Infrared => (subtype.eq_ignore_ascii_case(SUBTYPE_L8)
            || subtype.eq_ignore_ascii_case(SUBTYPE_L16)
            || subtype.eq_ignore_ascii_case(SUBTYPE_D16))
        .then(|| subtype.to_string()),
    }
}

/// Infrared sample width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfraredBitDepth {
    Bits8,
    Bits16,
}

/// How one frame will be converted, decided before any buffer access
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConversionPlan {
    /// Row-wise depth pseudo-color mapping
    DepthPseudoColor {
        depth_scale: f32,
        range: ReliableDepthRange,
    },
    /// Row-wise infrared pseudo-color mapping
    InfraredPseudoColor(InfraredBitDepth),
    /// Raw byte-for-byte copy of a Bgra8 frame
    ColorCopy,
    /// 2x2 box downsample plus 90 degree rotation of the packed low-res source
    ColorDownsample,
}

/// Decide how a frame of the given shape will be converted
///
/// Pure function so the decision table is testable independently of buffer
/// I/O. Unsupported combinations return [`ConvertError::UnsupportedFormat`].
pub fn plan_conversion(
    kind: SourceKind,
    format: RawPixelFormat,
    width: u32,
    height: u32,
    preset: DepthRangePreset,
) -> ConvertResult<ConversionPlan> {
    match (kind, format) {
        (SourceKind::Color, RawPixelFormat::Bgra8) => {
            if width == lowres::PACKED_WIDTH && height == lowres::PACKED_HEIGHT {
                Ok(ConversionPlan::ColorDownsample)
            } else {
                Ok(ConversionPlan::ColorCopy)
            }
        }
        (SourceKind::Depth, RawPixelFormat::Gray16) => Ok(ConversionPlan::DepthPseudoColor {
            depth_scale: DEPTH_SCALE,
            range: preset.range(),
        }),
        (SourceKind::Infrared, RawPixelFormat::Gray8) => {
            Ok(ConversionPlan::InfraredPseudoColor(InfraredBitDepth::Bits8))
        }
        (SourceKind::Infrared, RawPixelFormat::Gray16) => {
            Ok(ConversionPlan::InfraredPseudoColor(InfraredBitDepth::Bits16))
        }
        (kind, format) => Err(ConvertError::UnsupportedFormat { kind, format }),
    }
}

/// Convert one decoded frame to a displayable image
///
/// Returns `None` when no image could be produced: unsupported formats and
/// malformed buffers are logged and contained here rather than propagated.
/// The input buffer is only borrowed for the duration of the call; the output
/// is always a fresh allocation.
pub fn convert_frame(frame: &FrameView<'_>, preset: DepthRangePreset) -> Option<DisplayImage> {
    match try_convert(frame, preset) {
        Ok(image) => Some(image),
        // Empty frames are routine during stream start/stop; no log.
        Err(ConvertError::EmptyFrame) => None,
        Err(err) => {
            warn!(
                kind = %frame.kind,
                format = %frame.format,
                width = frame.width,
                height = frame.height,
                error = %err,
                "frame conversion produced no image"
            );
            None
        }
    }
}

fn try_convert(frame: &FrameView<'_>, preset: DepthRangePreset) -> ConvertResult<DisplayImage> {
    if frame.width == 0 || frame.height == 0 || frame.data.is_empty() {
        return Err(ConvertError::EmptyFrame);
    }
    let plan = plan_conversion(frame.kind, frame.format, frame.width, frame.height, preset)?;
    validate_buffer(frame)?;
    let image = match plan {
        ConversionPlan::DepthPseudoColor { depth_scale, range } => {
            transform_rows(frame, |input, output| {
                depth_row(input, output, depth_scale, range)
            })
        }
        ConversionPlan::InfraredPseudoColor(InfraredBitDepth::Bits8) => {
            transform_rows(frame, infrared8_row)
        }
        ConversionPlan::InfraredPseudoColor(InfraredBitDepth::Bits16) => {
            transform_rows(frame, infrared16_row)
        }
        ConversionPlan::ColorCopy => copy_bgra(frame),
        ConversionPlan::ColorDownsample => downsample_rotate(frame),
    };
    Ok(image)
}

/// Validate that stride and buffer length cover the frame geometry
///
/// Short buffers from a misbehaving decoder become a contained error instead
/// of a panic deeper in the row driver.
fn validate_buffer(frame: &FrameView<'_>) -> ConvertResult<()> {
    let row_bytes = frame.row_bytes();
    if (frame.stride as usize) < row_bytes {
        return Err(ConvertError::StrideTooSmall {
            stride: frame.stride,
            row_bytes,
        });
    }
    let expected = frame.min_buffer_len();
    if frame.data.len() < expected {
        return Err(ConvertError::BufferTooSmall {
            expected,
            actual: frame.data.len(),
        });
    }
    Ok(())
}

/// Generic row driver
///
/// Walks rows of the input buffer at the input stride and rows of the fresh
/// output image at its own stride, applying `transform` per row. Only
/// `row_bytes` of each input row are read; padding is never touched.
fn transform_rows(
    frame: &FrameView<'_>,
    transform: impl Fn(&[u8], &mut [ColorBgra]),
) -> DisplayImage {
    let mut image = DisplayImage::new(frame.width, frame.height);
    let stride = frame.stride as usize;
    let row_bytes = frame.row_bytes();
    for y in 0..frame.height {
        let start = y as usize * stride;
        let input_row = &frame.data[start..start + row_bytes];
        let output_row: &mut [ColorBgra] = bytemuck::cast_slice_mut(image.row_mut(y));
        transform(input_row, output_row);
    }
    image
}

/// Byte-for-byte copy of a Bgra8 frame into a fresh premultiplied buffer
fn copy_bgra(frame: &FrameView<'_>) -> DisplayImage {
    let mut image = DisplayImage::new(frame.width, frame.height);
    let stride = frame.stride as usize;
    let row_bytes = frame.row_bytes();
    for y in 0..frame.height {
        let start = y as usize * stride;
        image
            .row_mut(y)
            .copy_from_slice(&frame.data[start..start + row_bytes]);
    }
    image
}

/// Downsample and rotate the packed low-resolution grayscale source
///
/// The 160x480 Bgra8 frame carries 640x480 8-bit luminance taps, 2x2 taps
/// per logical pixel. Each 2x2 block is box-averaged and written gray-as-BGRA
/// into a 240x320 image rotated 90 degrees: input column pairs become output
/// rows, input row pairs become output columns in reverse order.
fn downsample_rotate(frame: &FrameView<'_>) -> DisplayImage {
    let mut image = DisplayImage::new(lowres::OUTPUT_WIDTH, lowres::OUTPUT_HEIGHT);
    let pitch = frame.stride as usize;
    for x in (0..lowres::TAP_WIDTH).step_by(2) {
        let output_row: &mut [ColorBgra] = bytemuck::cast_slice_mut(image.row_mut(x as u32 / 2));
        for y in (0..lowres::TAP_HEIGHT).step_by(2) {
            let top = &frame.data[y * pitch..];
            let bottom = &frame.data[(y + 1) * pitch..];
            let sum = top[x] as u32 + top[x + 1] as u32 + bottom[x] as u32 + bottom[x + 1] as u32;
            let luma = (sum >> 2) as u8;
            output_row[(lowres::TAP_HEIGHT / 2 - 1) - y / 2] = ColorBgra::gray(luma);
        }
    }
    image
}
