//! Per-channel gradient tables.
//!
//! A table maps an 8-bit channel value to a correction color. Entry `i` is
//! the start→end gradient at `t = i / 255`, pulled back toward the gray
//! `(t, t, t)` as the index approaches white:
//!
//! ```text
//! base     = interpolate(start, end, t, gradient_type)
//! entry[i] = lerp(base, gray(t), white_protection × whiteness(i))
//! whiteness(i) = smoothstep(200/255, 1, t)
//! ```
//!
//! Tables are built on configuration change only and never mutated.

use std::fmt;

use crate::color::{Color, quantize_u8, smoothstep};
use crate::color_management::color_space::{
    Hsl, Lab, hsl_to_rgb, lab_to_rgb, rgb_to_hsl, rgb_to_lab, wrap_hue,
};
use crate::transform::params::{ChannelLut, GradientType};

/// Entries per table, one per 8-bit code.
pub const TABLE_SIZE: usize = 256;

/// Normalized channel value where white protection starts to engage.
pub const WHITE_PROTECTION_ONSET: f32 = 200.0 / 255.0;

/// Saturation below which an HSL endpoint has no meaningful hue.
const ACHROMATIC_SATURATION: f32 = 1e-4;

/// How close index `i` is to full brightness, `[0, 1]`, monotonic in `i`.
pub fn whiteness(index: usize) -> f32 {
    smoothstep(WHITE_PROTECTION_ONSET, 1.0, index as f32 / 255.0)
}

/// Interpolate between two colors in the space named by `gradient`.
///
/// `t = 0` returns `start` and `t = 1` returns `end` exactly.
pub fn interpolate(start: Color, end: Color, t: f32, gradient: GradientType) -> Color {
    if t <= 0.0 {
        return start;
    }
    if t >= 1.0 {
        return end;
    }
    match gradient {
        GradientType::LinearRgb => start.lerp(end, t),
        GradientType::PerceptualLab => {
            let a = rgb_to_lab(start);
            let b = rgb_to_lab(end);
            lab_to_rgb(Lab::new(
                a.l + (b.l - a.l) * t,
                a.a + (b.a - a.a) * t,
                a.b + (b.b - a.b) * t,
            ))
        }
        GradientType::Hsl => hsl_to_rgb(lerp_hsl(rgb_to_hsl(start), rgb_to_hsl(end), t)).saturate(),
    }
}

/// Hue-aware HSL lerp along the shortest arc. An achromatic endpoint borrows
/// the other endpoint's hue so grays don't swing through red.
fn lerp_hsl(a: Hsl, b: Hsl, t: f32) -> Hsl {
    let a_gray = a.saturation < ACHROMATIC_SATURATION;
    let b_gray = b.saturation < ACHROMATIC_SATURATION;
    let (ha, hb) = match (a_gray, b_gray) {
        (true, false) => (b.hue, b.hue),
        (false, true) => (a.hue, a.hue),
        _ => (a.hue, b.hue),
    };

    let mut delta = hb - ha;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta < -180.0 {
        delta += 360.0;
    }

    Hsl {
        hue: wrap_hue(ha + delta * t),
        saturation: a.saturation + (b.saturation - a.saturation) * t,
        lightness: a.lightness + (b.lightness - a.lightness) * t,
    }
}

/// 256-entry color table for one channel.
#[derive(Clone, PartialEq)]
pub struct GradientTable {
    entries: [Color; TABLE_SIZE],
}

impl GradientTable {
    /// Build the table for `lut` in the interpolation space `gradient`.
    ///
    /// Only the colors and white protection of `lut` matter; `enabled` and
    /// `strength` are applied at sampling time.
    pub fn build(lut: &ChannelLut, gradient: GradientType) -> Self {
        let mut entries = [Color::BLACK; TABLE_SIZE];
        for (i, entry) in entries.iter_mut().enumerate() {
            let t = i as f32 / 255.0;
            let base = interpolate(lut.start_color, lut.end_color, t, gradient);
            let protection = lut.white_protection * whiteness(i);
            *entry = base.lerp(Color::splat(t), protection);
        }
        Self { entries }
    }

    /// Entry for an 8-bit code.
    pub fn get(&self, index: u8) -> Color {
        self.entries[index as usize]
    }

    /// Entry for a normalized channel value, `round(value × 255)`.
    pub fn sample(&self, value: f32) -> Color {
        self.get(quantize_u8(value))
    }
}

impl fmt::Debug for GradientTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradientTable")
            .field("first", &self.entries[0])
            .field("last", &self.entries[TABLE_SIZE - 1])
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn lut(start: Color, end: Color, white_protection: f32) -> ChannelLut {
        ChannelLut {
            enabled: true,
            strength: 1.0,
            start_color: start,
            end_color: end,
            white_protection,
        }
    }

    #[test]
    fn test_boundary_entries_match_mapped_endpoints() {
        let cfg = lut(Color::new(0.2, 0.1, 0.0), Color::new(0.0, 1.0, 1.0), 0.4);
        for &g in GradientType::all() {
            let table = GradientTable::build(&cfg, g);
            assert_eq!(table.get(0), cfg.start_color, "{g}");
            let expected_end = cfg.end_color.lerp(Color::WHITE, 0.4);
            assert!(table.get(255).distance(expected_end) < EPSILON, "{g}");
        }
    }

    #[test]
    fn test_equal_endpoints_give_constant_table_below_onset() {
        let c = Color::new(0.3, 0.6, 0.9);
        let table = GradientTable::build(&lut(c, c, 0.01), GradientType::PerceptualLab);
        for i in 0..200 {
            assert!(table.get(i).distance(c) < 1e-3, "entry {i}: {}", table.get(i));
        }
    }

    #[test]
    fn test_full_protection_makes_top_entry_white() {
        let table = GradientTable::build(
            &lut(Color::BLACK, Color::new(0.0, 1.0, 1.0), 1.0),
            GradientType::LinearRgb,
        );
        assert!(table.get(255).distance(Color::WHITE) < EPSILON);
    }

    #[test]
    fn test_whiteness_is_monotonic_and_zero_below_onset() {
        assert_eq!(whiteness(0), 0.0);
        assert_eq!(whiteness(200), 0.0);
        assert_eq!(whiteness(255), 1.0);
        for i in 1..TABLE_SIZE {
            assert!(whiteness(i) >= whiteness(i - 1));
        }
    }

    #[test]
    fn test_linear_gradient_midpoint() {
        let table = GradientTable::build(
            &lut(Color::BLACK, Color::new(0.0, 1.0, 1.0), 0.01),
            GradientType::LinearRgb,
        );
        let mid = table.get(128);
        let t = 128.0 / 255.0;
        assert!(mid.r.abs() < EPSILON);
        assert!((mid.g - t).abs() < EPSILON, "{mid}");
        assert!((mid.b - t).abs() < EPSILON, "{mid}");
    }

    #[test]
    fn test_hsl_takes_shortest_hue_path() {
        // Red (0°) to magenta (300°) passes through 330°, not through green.
        let mid = interpolate(
            Color::new(1.0, 0.0, 0.0),
            Color::new(1.0, 0.0, 1.0),
            0.5,
            GradientType::Hsl,
        );
        assert!(mid.g < EPSILON, "{mid}");
        assert!(mid.r > mid.b, "{mid}");
    }

    #[test]
    fn test_hsl_from_gray_keeps_target_hue() {
        let mid = interpolate(Color::BLACK, Color::new(0.0, 1.0, 1.0), 0.5, GradientType::Hsl);
        assert!(mid.r < mid.g, "{mid}");
        assert!((mid.g - mid.b).abs() < EPSILON, "{mid}");
    }

    #[test]
    fn test_sample_rounds_to_nearest_code() {
        let table = GradientTable::build(
            &lut(Color::BLACK, Color::WHITE, 0.01),
            GradientType::LinearRgb,
        );
        assert_eq!(table.sample(139.0 / 255.0), table.get(139));
        assert_eq!(table.sample(-0.2), table.get(0));
        assert_eq!(table.sample(1.7), table.get(255));
    }
}
