// SPDX-License-Identifier: GPL-3.0-only

//! Color ramp and interpolation for pseudo-color rendering

use bytemuck::{Pod, Zeroable};

/// A color stored in B,G,R,A byte order for direct buffer writes
///
/// `Pod` so output rows can be reinterpreted from `&mut [u8]` without copies.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct ColorBgra {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

impl ColorBgra {
    /// Construct from channel values (alpha, red, green, blue)
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { b, g, r, a }
    }

    /// Opaque gray pixel
    pub const fn gray(luma: u8) -> Self {
        Self {
            b: luma,
            g: luma,
            r: luma,
            a: 0xFF,
        }
    }

    /// Blend toward `next` with an integer weight in 0..=255
    ///
    /// Weight 0 returns `self`, weight 255 returns `next`. Computed per
    /// channel in integer arithmetic; matches continuous linear interpolation
    /// within one unit per channel.
    pub fn blend(self, next: Self, weight: u32) -> Self {
        let inverse = 255 - weight;
        let mix = |prev: u8, next: u8| ((prev as u32 * inverse + next as u32 * weight) / 255) as u8;
        Self {
            b: mix(self.b, next.b),
            g: mix(self.g, next.g),
            r: mix(self.r, next.r),
            a: mix(self.a, next.a),
        }
    }
}

/// Reference colors spanning the intensity range, warm to cool
///
/// Dark red through yellow and cyan to dark blue; all entries opaque.
pub const COLOR_RAMP: &[ColorBgra] = &[
    ColorBgra::new(0xFF, 0x7F, 0x00, 0x00),
    ColorBgra::new(0xFF, 0xFF, 0x00, 0x00),
    ColorBgra::new(0xFF, 0xFF, 0x7F, 0x00),
    ColorBgra::new(0xFF, 0xFF, 0xFF, 0x00),
    ColorBgra::new(0xFF, 0x7F, 0xFF, 0x7F),
    ColorBgra::new(0xFF, 0x00, 0xFF, 0xFF),
    ColorBgra::new(0xFF, 0x00, 0x7F, 0xFF),
    ColorBgra::new(0xFF, 0x00, 0x00, 0xFF),
    ColorBgra::new(0xFF, 0x00, 0x00, 0x7F),
];

/// Map a normalized value to a ramp color by piecewise-linear blending
///
/// Values outside [0, 1] clamp to the ramp endpoints.
pub fn interpolate(value: f32) -> ColorBgra {
    let steps = COLOR_RAMP.len() - 1;
    let scaled = value * steps as f32;
    let index = (scaled.floor() as i64).clamp(0, steps as i64 - 1) as usize;
    let frac = (scaled - index as f32).clamp(0.0, 1.0);
    let weight = (frac * 255.0).round() as u32;
    COLOR_RAMP[index].blend(COLOR_RAMP[index + 1], weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(interpolate(0.0), COLOR_RAMP[0]);
        assert_eq!(interpolate(1.0), COLOR_RAMP[COLOR_RAMP.len() - 1]);
    }

    #[test]
    fn test_out_of_range_clamps() {
        assert_eq!(interpolate(-0.5), COLOR_RAMP[0]);
        assert_eq!(interpolate(2.0), COLOR_RAMP[COLOR_RAMP.len() - 1]);
    }

    #[test]
    fn test_blend_is_bounded_by_neighbours() {
        // Channel values of an interpolated color must lie between the two
        // bounding palette colors' channels (monotonic blend, no overshoot).
        let steps = (COLOR_RAMP.len() - 1) as f32;
        for i in 0..=1000 {
            let v = i as f32 / 1000.0;
            let color = interpolate(v);
            let index = ((v * steps).floor() as usize).min(COLOR_RAMP.len() - 2);
            let prev = COLOR_RAMP[index];
            let next = COLOR_RAMP[index + 1];
            for (c, (lo, hi)) in [
                (color.b, (prev.b.min(next.b), prev.b.max(next.b))),
                (color.g, (prev.g.min(next.g), prev.g.max(next.g))),
                (color.r, (prev.r.min(next.r), prev.r.max(next.r))),
                (color.a, (prev.a.min(next.a), prev.a.max(next.a))),
            ] {
                assert!(c >= lo && c <= hi, "channel {} outside [{}, {}] at v={}", c, lo, hi, v);
            }
        }
    }

    #[test]
    fn test_matches_continuous_lerp_within_one_unit() {
        let steps = (COLOR_RAMP.len() - 1) as f32;
        for i in 0..=255 {
            let v = i as f32 / 255.0;
            let color = interpolate(v);
            let scaled = v * steps;
            let index = (scaled.floor() as usize).min(COLOR_RAMP.len() - 2);
            let frac = scaled - index as f32;
            let prev = COLOR_RAMP[index];
            let next = COLOR_RAMP[index + 1];
            let expect = |p: u8, n: u8| p as f32 * (1.0 - frac) + n as f32 * frac;
            assert!((color.r as f32 - expect(prev.r, next.r)).abs() <= 1.0);
            assert!((color.g as f32 - expect(prev.g, next.g)).abs() <= 1.0);
            assert!((color.b as f32 - expect(prev.b, next.b)).abs() <= 1.0);
        }
    }

    #[test]
    fn test_bgra_byte_order() {
        let color = ColorBgra::new(0x11, 0x22, 0x33, 0x44);
        let bytes: [u8; 4] = bytemuck::cast(color);
        assert_eq!(bytes, [0x44, 0x33, 0x22, 0x11]); // B, G, R, A
    }
}
