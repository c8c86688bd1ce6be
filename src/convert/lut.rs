// SPDX-License-Identifier: GPL-3.0-only

//! Precomputed lookup tables for per-pixel color mapping
//!
//! Evaluating the ramp interpolation (plus the infrared gamma curve) for
//! every pixel is too slow at frame rate, so the generators are sampled
//! 1024 times over [0, 1] once per process and lookups interpolate between
//! neighbouring samples. Table resolution bounds the interpolation error.

use super::ramp::{self, ColorBgra};
use std::sync::OnceLock;

/// Number of precomputed samples in each table
pub const LOOKUP_TABLE_SIZE: usize = 1024;

/// Linear interpolation between two adjacent table entries
pub trait TableLerp: Copy {
    /// Blend toward `next` with fractional weight in [0, 1]
    fn table_lerp(self, next: Self, frac: f32) -> Self;
}

impl TableLerp for ColorBgra {
    fn table_lerp(self, next: Self, frac: f32) -> Self {
        self.blend(next, (frac * 255.0).round() as u32)
    }
}

/// Fixed-size cache of a generator function over [0, 1]
///
/// Immutable after construction; safe for concurrent reads.
pub struct LookupTable<V, const N: usize> {
    table: [V; N],
}

impl<V: Copy, const N: usize> LookupTable<V, N> {
    /// Build the table by evaluating `generator(index, N)` for each entry
    pub fn new(generator: impl Fn(usize, usize) -> V) -> Self {
        const { assert!(N >= 2, "lookup table is too small") };
        Self {
            table: std::array::from_fn(|index| generator(index, N)),
        }
    }
}

impl<V: TableLerp, const N: usize> LookupTable<V, N> {
    /// Interpolated lookup; inputs outside [0, 1] clamp to the table ends
    pub fn get(&self, value: f32) -> V {
        let scaled = value * (N - 1) as f32;
        let index = (scaled.floor() as i64).clamp(0, N as i64 - 2) as usize;
        let frac = (scaled - index as f32).clamp(0.0, 1.0);
        self.table[index].table_lerp(self.table[index + 1], frac)
    }
}

fn depth_generator(index: usize, size: usize) -> ColorBgra {
    ramp::interpolate(index as f32 / size as f32)
}

fn infrared_generator(index: usize, size: usize) -> ColorBgra {
    let value = index as f32 / size as f32;
    // Infrared intensity distributions skew low; the gamma curve spreads
    // color differentiation across the low end.
    ramp::interpolate((1.0 - value).powi(12))
}

/// Depth pseudo-color table, built once on first use
pub fn depth_table() -> &'static LookupTable<ColorBgra, LOOKUP_TABLE_SIZE> {
    static TABLE: OnceLock<LookupTable<ColorBgra, LOOKUP_TABLE_SIZE>> = OnceLock::new();
    TABLE.get_or_init(|| LookupTable::new(depth_generator))
}

/// Infrared pseudo-color table, built once on first use
pub fn infrared_table() -> &'static LookupTable<ColorBgra, LOOKUP_TABLE_SIZE> {
    static TABLE: OnceLock<LookupTable<ColorBgra, LOOKUP_TABLE_SIZE>> = OnceLock::new();
    TABLE.get_or_init(|| LookupTable::new(infrared_generator))
}
