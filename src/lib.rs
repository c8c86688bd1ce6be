// SPDX-License-Identifier: GPL-3.0-only

//! sensorview - depth and infrared sensor stream visualization
//!
//! This library converts raw frames from depth, infrared and color camera
//! sources into premultiplied-alpha BGRA images suitable for on-screen
//! display at interactive frame rates.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`convert`]: Format negotiation, dispatch and the pixel pipeline
//!   (color ramp, lookup tables, scanline transforms, row driver)
//! - [`renderer`]: Bounded scheduling of conversions and publication to a
//!   display sink
//! - [`frame`]: Borrowed input frames and owned output images
//! - [`config`]: Renderer configuration handling
//! - [`constants`]: Depth range presets, sentinel values, throttle bounds
//!
//! # Example
//!
//! ```
//! use sensorview::{DepthRangePreset, FrameView, RawPixelFormat, SourceKind, convert_frame};
//!
//! let depth: Vec<u8> = [800u16, 1200, 0, 4001]
//!     .iter()
//!     .flat_map(|v| v.to_le_bytes())
//!     .collect();
//! let frame = FrameView {
//!     kind: SourceKind::Depth,
//!     format: RawPixelFormat::Gray16,
//!     width: 2,
//!     height: 2,
//!     stride: 4,
//!     data: &depth,
//! };
//! let image = convert_frame(&frame, DepthRangePreset::LongThrow).unwrap();
//! assert_eq!((image.width(), image.height()), (2, 2));
//! ```

pub mod config;
pub mod constants;
pub mod convert;
pub mod errors;
pub mod frame;
pub mod renderer;

// Re-export commonly used types
pub use config::RendererConfig;
pub use constants::{DepthRangePreset, ReliableDepthRange};
pub use convert::{ConversionPlan, accepted_subtype, convert_frame, plan_conversion};
pub use errors::{ConvertError, ConvertResult};
pub use frame::{DisplayImage, FrameView, RawPixelFormat, SourceKind};
pub use renderer::{DisplaySink, FrameRenderer, FrameStats};
