//! Color space definitions and 3x3 matrix transforms.
//!
//! - linear RGB ↔ LMS via the Hunt-Pointer-Estevez cone fundamentals
//! - sRGB ↔ CIE L\*a\*b\* (D65) via XYZ
//! - RGB ↔ HSL
//!
//! Everything here is a pure function on value types.

use glam::{Mat3, Vec3};
use palette::{IntoColor, Srgb};
use serde::{Deserialize, Serialize};

use crate::color::Color;

/// A 3x3 color matrix for linear color space conversions, stored row-major.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorMatrix(pub [[f32; 3]; 3]);

impl ColorMatrix {
    pub const IDENTITY: ColorMatrix =
        ColorMatrix([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    /// Returns the identity matrix (no-op transform).
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Apply this matrix to an RGB triplet: `out = M · rgb`.
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let m = &self.0;
        [
            m[0][0] * rgb[0] + m[0][1] * rgb[1] + m[0][2] * rgb[2],
            m[1][0] * rgb[0] + m[1][1] * rgb[1] + m[1][2] * rgb[2],
            m[2][0] * rgb[0] + m[2][1] * rgb[1] + m[2][2] * rgb[2],
        ]
    }

    /// Apply this matrix to a [`Color`]. No clamping.
    pub fn apply_color(&self, color: Color) -> Color {
        Color::from_array(self.apply(color.to_array()))
    }

    /// Element-wise interpolation toward `other`. Usable in const context.
    pub const fn lerp(&self, other: &ColorMatrix, t: f32) -> ColorMatrix {
        let mut out = [[0.0_f32; 3]; 3];
        let mut i = 0;
        while i < 3 {
            let mut j = 0;
            while j < 3 {
                out[i][j] = self.0[i][j] + (other.0[i][j] - self.0[i][j]) * t;
                j += 1;
            }
            i += 1;
        }
        ColorMatrix(out)
    }

    /// Matrix product `self · other`.
    pub fn mul(&self, other: &ColorMatrix) -> ColorMatrix {
        Self::from_mat3(self.to_mat3() * other.to_mat3())
    }

    /// Matrix inverse. Singular matrices yield non-finite entries.
    pub fn inverse(&self) -> ColorMatrix {
        Self::from_mat3(self.to_mat3().inverse())
    }

    fn to_mat3(self) -> Mat3 {
        // glam is column-major; our rows become its columns, hence the transpose.
        Mat3::from_cols_array_2d(&self.0).transpose()
    }

    fn from_mat3(m: Mat3) -> Self {
        Self(m.transpose().to_cols_array_2d())
    }
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// ---------------------------------------------------------------------------
// LMS (Hunt-Pointer-Estevez)
// ---------------------------------------------------------------------------

/// Cone response triplet (long, medium, short).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lms {
    pub l: f32,
    pub m: f32,
    pub s: f32,
}

impl Lms {
    pub const fn new(l: f32, m: f32, s: f32) -> Self {
        Self { l, m, s }
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.l, self.m, self.s)
    }

    pub fn from_vec3(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Hunt-Pointer-Estevez XYZ → LMS, normalized to D65.
pub const XYZ_TO_LMS: ColorMatrix = ColorMatrix([
    [0.400_24, 0.707_6, -0.080_81],
    [-0.226_3, 1.165_32, 0.045_7],
    [0.0, 0.0, 0.918_22],
]);

/// Linear sRGB → LMS, i.e. `XYZ_TO_LMS · SRGB_TO_XYZ`.
pub const RGB_TO_LMS: ColorMatrix = ColorMatrix([
    [0.314_006_52, 0.639_526_05, 0.046_495_26],
    [0.155_376_66, 0.757_908_76, 0.086_702_86],
    [0.017_752_774, 0.109_444_48, 0.872_588_23],
]);

/// LMS → linear sRGB, the inverse of [`RGB_TO_LMS`].
pub const LMS_TO_RGB: ColorMatrix = ColorMatrix([
    [5.471_838_5, -4.641_653_6, 0.169_644_84],
    [-1.125_174_7, 2.293_090_8, -0.167_893_9],
    [0.029_800_83, -0.193_176_91, 1.163_622_6],
]);

pub fn rgb_to_lms(color: Color) -> Lms {
    Lms::from_vec3(RGB_TO_LMS.apply_color(color).to_vec3())
}

pub fn lms_to_rgb(lms: Lms) -> Color {
    LMS_TO_RGB.apply_color(Color::from_vec3(lms.to_vec3()))
}

/// Project a CIE XYZ tristimulus value into LMS.
pub fn xyz_to_lms(xyz: [f32; 3]) -> Lms {
    let [l, m, s] = XYZ_TO_LMS.apply(xyz);
    Lms::new(l, m, s)
}

// ---------------------------------------------------------------------------
// CIE L*a*b*
// ---------------------------------------------------------------------------

/// CIE L\*a\*b\* relative to the D65 white point.
pub type Lab = palette::Lab;

/// Convert an sRGB-encoded color to L\*a\*b\*.
pub fn rgb_to_lab(color: Color) -> Lab {
    Srgb::new(color.r, color.g, color.b).into_color()
}

/// Convert L\*a\*b\* back to sRGB. Out-of-gamut results are clamped to `[0, 1]`.
pub fn lab_to_rgb(lab: Lab) -> Color {
    let rgb: Srgb = lab.into_color();
    Color::new(rgb.red, rgb.green, rgb.blue).saturate()
}

// ---------------------------------------------------------------------------
// HSL
// ---------------------------------------------------------------------------

/// Hue in degrees `[0, 360)`, saturation and lightness in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsl {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

/// Convert RGB to HSL.
pub fn rgb_to_hsl(color: Color) -> Hsl {
    let Color { r, g, b } = color;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) * 0.5;

    if (max - min).abs() < 1e-10 {
        return Hsl {
            hue: 0.0,
            saturation: 0.0,
            lightness,
        };
    }

    let delta = max - min;
    let saturation = if lightness > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let hue = if (max - r).abs() < 1e-10 {
        ((g - b) / delta) % 6.0
    } else if (max - g).abs() < 1e-10 {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    Hsl {
        hue: wrap_hue(hue * 60.0),
        saturation,
        lightness,
    }
}

/// Convert HSL to RGB. Hue wraps modulo 360°.
pub fn hsl_to_rgb(hsl: Hsl) -> Color {
    let Hsl {
        saturation: sat,
        lightness: lum,
        ..
    } = hsl;
    if sat.abs() < 1e-10 {
        return Color::splat(lum);
    }

    let q = if lum < 0.5 {
        lum * (1.0 + sat)
    } else {
        lum + sat - lum * sat
    };
    let p = 2.0 * lum - q;
    let h = wrap_hue(hsl.hue) / 360.0;

    Color::new(
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

/// Wrap an angle in degrees into `[0, 360)`.
pub fn wrap_hue(degrees: f32) -> f32 {
    let h = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if h >= 360.0 { 0.0 } else { h }
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn assert_close(a: Color, b: Color, eps: f32) {
        assert!(
            a.distance(b) < eps,
            "expected {b}, got {a} (distance {})",
            a.distance(b)
        );
    }

    #[test]
    fn test_lms_matrices_are_inverse() {
        let product = LMS_TO_RGB.mul(&RGB_TO_LMS);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(
                    (product.0[i][j] - expected).abs() < 1e-5,
                    "[{i}][{j}] = {}",
                    product.0[i][j]
                );
            }
        }
    }

    #[test]
    fn test_lms_white_is_near_unit() {
        let lms = rgb_to_lms(Color::WHITE);
        assert!((lms.l - 1.0).abs() < 1e-3);
        assert!((lms.m - 1.0).abs() < 1e-3);
        assert!((lms.s - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_matrix_inverse_matches_constant() {
        let inv = RGB_TO_LMS.inverse();
        for i in 0..3 {
            for j in 0..3 {
                assert!((inv.0[i][j] - LMS_TO_RGB.0[i][j]).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_matrix_lerp_endpoints() {
        let m = ColorMatrix([[0.5, 0.5, 0.0], [0.5, 0.5, 0.0], [0.0, 0.0, 1.0]]);
        assert_eq!(ColorMatrix::IDENTITY.lerp(&m, 0.0), ColorMatrix::IDENTITY);
        assert_eq!(ColorMatrix::IDENTITY.lerp(&m, 1.0), m);
    }

    #[test]
    fn test_lab_roundtrip_preserves_values() {
        for color in [
            Color::new(0.8, 0.4, 0.2),
            Color::new(0.0, 1.0, 1.0),
            Color::splat(0.5),
            Color::BLACK,
            Color::WHITE,
        ] {
            assert_close(lab_to_rgb(rgb_to_lab(color)), color, 1e-3);
        }
    }

    #[test]
    fn test_lab_white_has_full_lightness() {
        let lab = rgb_to_lab(Color::WHITE);
        assert!((lab.l - 100.0).abs() < 0.01, "L* = {}", lab.l);
        assert!(lab.a.abs() < 0.01 && lab.b.abs() < 0.01);
    }

    #[test]
    fn test_lab_to_rgb_clamps_out_of_gamut() {
        let rgb = lab_to_rgb(Lab::new(50.0, 120.0, -120.0));
        for v in rgb.to_array() {
            assert!((0.0..=1.0).contains(&v), "component {v} out of range");
        }
    }

    #[test]
    fn test_hsl_roundtrip_preserves_values() {
        let original = Color::new(0.8, 0.4, 0.2);
        assert_close(hsl_to_rgb(rgb_to_hsl(original)), original, EPSILON);
    }

    #[test]
    fn test_hsl_gray_has_zero_saturation() {
        let hsl = rgb_to_hsl(Color::splat(0.5));
        assert!(hsl.saturation.abs() < 1e-6);
    }

    #[test]
    fn test_hsl_hue_wraps() {
        let red = hsl_to_rgb(Hsl {
            hue: 360.0,
            saturation: 1.0,
            lightness: 0.5,
        });
        assert_close(red, Color::new(1.0, 0.0, 0.0), EPSILON);
        let magenta = hsl_to_rgb(Hsl {
            hue: -60.0,
            saturation: 1.0,
            lightness: 0.5,
        });
        assert_close(magenta, Color::new(1.0, 0.0, 1.0), EPSILON);
    }
}
