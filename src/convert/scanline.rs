// SPDX-License-Identifier: GPL-3.0-only

//! Scanline transforms
//!
//! Each transform maps one row of raw sensor pixels to one row of BGRA
//! output. Callers hand in exactly one row's worth of input bytes and output
//! pixels; the transforms never index past either slice.

use super::lut::{depth_table, infrared_table};
use super::ramp::ColorBgra;
use crate::constants::{DEPTH_MAX_VALID_RAW, INVALID_PIXEL_COLOR, ReliableDepthRange};

/// Map one row of 16-bit depth samples to pseudo-color
///
/// Raw zero and readings above [`DEPTH_MAX_VALID_RAW`] become the invalid
/// sentinel color. Valid readings are scaled to meters and normalized against
/// the reliable range; the normalized value is intentionally not clamped here
/// since the lookup table clamps.
pub fn depth_row(input: &[u8], output: &mut [ColorBgra], depth_scale: f32, range: ReliableDepthRange) {
    let range_reciprocal = 1.0 / (range.max_m - range.min_m);
    let table = depth_table();
    for (chunk, out) in input.chunks_exact(2).zip(output.iter_mut()) {
        let raw = u16::from_le_bytes([chunk[0], chunk[1]]);
        if raw == 0 || raw > DEPTH_MAX_VALID_RAW {
            *out = INVALID_PIXEL_COLOR;
        } else {
            let depth_m = raw as f32 * depth_scale;
            let alpha = (depth_m - range.min_m) * range_reciprocal;
            *out = table.get(alpha);
        }
    }
}

/// Map one row of 16-bit infrared samples to pseudo-color
pub fn infrared16_row(input: &[u8], output: &mut [ColorBgra]) {
    let range_reciprocal = 1.0 / u16::MAX as f32;
    let table = infrared_table();
    for (chunk, out) in input.chunks_exact(2).zip(output.iter_mut()) {
        let raw = u16::from_le_bytes([chunk[0], chunk[1]]);
        if raw == 0 {
            *out = INVALID_PIXEL_COLOR;
        } else {
            *out = table.get(raw as f32 * range_reciprocal);
        }
    }
}

/// Map one row of 8-bit infrared samples to pseudo-color
pub fn infrared8_row(input: &[u8], output: &mut [ColorBgra]) {
    let range_reciprocal = 1.0 / u8::MAX as f32;
    let table = infrared_table();
    for (&raw, out) in input.iter().zip(output.iter_mut()) {
        if raw == 0 {
            *out = INVALID_PIXEL_COLOR;
        } else {
            *out = table.get(raw as f32 * range_reciprocal);
        }
    }
}
