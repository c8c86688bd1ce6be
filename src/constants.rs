// SPDX-License-Identifier: GPL-3.0-only

//! Library-wide constants
//!
//! Depth range presets, sentinel values, and renderer throttle bounds live
//! here. These values are used across the conversion pipeline.

use crate::convert::ramp::ColorBgra;
use serde::{Deserialize, Serialize};

/// Raw depth units are millimeters; displayed depth is meters.
pub const DEPTH_SCALE: f32 = 1.0 / 1000.0;

/// Raw depth readings above this value are treated as invalid.
///
/// This gate is independent of the per-profile reliable range below; both are
/// applied, matching sensor firmware behaviour.
pub const DEPTH_MAX_VALID_RAW: u16 = 4000;

/// Color written for pixels the sensor could not measure.
///
/// Semi-transparent red (premultiplied), distinct from every ramp color so
/// invalid regions stand out.
pub const INVALID_PIXEL_COLOR: ColorBgra = ColorBgra {
    b: 0x00,
    g: 0x00,
    r: 0x7F,
    a: 0x7F,
};

/// Sensor profile names reported by known time-of-flight depth sensors
pub mod sensor_names {
    /// Long-throw ToF sensor (room-scale ranging)
    pub const LONG_THROW: &str = "Long Throw ToF Depth";

    /// Short-throw ToF sensor (near-field ranging)
    pub const SHORT_THROW: &str = "Short Throw ToF Depth";
}

/// Reliable depth range in meters for a sensor profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReliableDepthRange {
    /// Closest distance the sensor measures reliably
    pub min_m: f32,
    /// Farthest distance the sensor measures reliably
    pub max_m: f32,
}

/// Reliable-depth-range presets selected by sensor profile name
///
/// Depth readings are normalized against the preset's range before the
/// pseudo-color lookup, so the ramp spans the distances the sensor can
/// actually resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DepthRangePreset {
    /// Long-throw time-of-flight sensors: 0.5 m – 4.0 m
    LongThrow,
    /// Short-throw sensors: 0.2 m – 1.0 m
    #[default]
    ShortThrow,
}

impl DepthRangePreset {
    /// Get all preset variants for iteration
    pub const ALL: [DepthRangePreset; 2] = [DepthRangePreset::LongThrow, DepthRangePreset::ShortThrow];

    /// Get display name for the preset
    pub fn display_name(&self) -> &'static str {
        match self {
            DepthRangePreset::LongThrow => "Long throw",
            DepthRangePreset::ShortThrow => "Short throw",
        }
    }

    /// Reliable depth range for this preset
    pub fn range(&self) -> ReliableDepthRange {
        match self {
            DepthRangePreset::LongThrow => ReliableDepthRange {
                min_m: 0.5,
                max_m: 4.0,
            },
            DepthRangePreset::ShortThrow => ReliableDepthRange {
                min_m: 0.2,
                max_m: 1.0,
            },
        }
    }

    /// Match a sensor profile name (case-sensitive) against the known profiles
    ///
    /// Returns `None` for unrecognized names; the caller decides how to fall
    /// back (see [`crate::config::RendererConfig::depth_range_preset`]).
    pub fn from_sensor_name(name: &str) -> Option<Self> {
        match name {
            sensor_names::LONG_THROW => Some(DepthRangePreset::LongThrow),
            sensor_names::SHORT_THROW => Some(DepthRangePreset::ShortThrow),
            _ => None,
        }
    }
}

/// Renderer throttle bounds
pub mod throttle {
    /// Maximum frames awaiting conversion; excess frames are dropped
    pub const MAX_FRAMES_SCHEDULED: u32 = 4;

    /// Maximum converted images awaiting publication; excess images are dropped
    pub const MAX_PUBLISH_IN_FLIGHT: usize = 2;
}

/// Packed low-resolution grayscale source geometry
///
/// One fixed sensor delivers 640x480 8-bit luminance taps packed 2x2 per
/// logical pixel into a 160x480 Bgra8 frame. The converter box-averages each
/// 2x2 block and rotates the result 90 degrees.
pub mod lowres {
    /// Pixel width of the packed Bgra8 frame
    pub const PACKED_WIDTH: u32 = 160;
    /// Pixel height of the packed Bgra8 frame
    pub const PACKED_HEIGHT: u32 = 480;

    /// Luminance taps per packed row (PACKED_WIDTH * 4 bytes)
    pub const TAP_WIDTH: usize = 640;
    /// Tap rows (same as packed rows)
    pub const TAP_HEIGHT: usize = 480;

    /// Output width after downsample and rotation (TAP_HEIGHT / 2)
    pub const OUTPUT_WIDTH: u32 = 240;
    /// Output height after downsample and rotation (TAP_WIDTH / 2)
    pub const OUTPUT_HEIGHT: u32 = 320;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_ranges() {
        for preset in DepthRangePreset::ALL {
            let range = preset.range();
            assert!(range.min_m < range.max_m);
            assert!(range.min_m > 0.0);
        }
    }

    #[test]
    fn test_sensor_name_matching_is_case_sensitive() {
        assert_eq!(
            DepthRangePreset::from_sensor_name(sensor_names::LONG_THROW),
            Some(DepthRangePreset::LongThrow)
        );
        assert_eq!(
            DepthRangePreset::from_sensor_name(sensor_names::SHORT_THROW),
            Some(DepthRangePreset::ShortThrow)
        );
        assert_eq!(DepthRangePreset::from_sensor_name("long throw tof depth"), None);
        assert_eq!(DepthRangePreset::from_sensor_name(""), None);
    }

    #[test]
    fn test_invalid_color_not_on_ramp() {
        use crate::convert::ramp::COLOR_RAMP;
        assert!(COLOR_RAMP.iter().all(|&c| c != INVALID_PIXEL_COLOR));
    }

    #[test]
    fn test_lowres_geometry_consistent() {
        assert_eq!(lowres::TAP_WIDTH, lowres::PACKED_WIDTH as usize * 4);
        assert_eq!(lowres::OUTPUT_WIDTH as usize, lowres::TAP_HEIGHT / 2);
        assert_eq!(lowres::OUTPUT_HEIGHT as usize, lowres::TAP_WIDTH / 2);
    }
}
