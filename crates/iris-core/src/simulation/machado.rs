//! Matrix-based CVD simulation.
//!
//! Each dichromat type has a fixed 3x3 RGB matrix; the anomalous variants
//! are `lerp(I, M, ANOMALY_SEVERITY)`. All six matrices are computed at
//! compile time. Rows of every matrix sum to one, so black and white are
//! fixed points.

use crate::color::Color;
use crate::color_management::ColorMatrix;

use super::{ANOMALY_SEVERITY, CvdFilter};

pub const PROTANOPIA: ColorMatrix = ColorMatrix([
    [0.567, 0.433, 0.0],
    [0.558, 0.442, 0.0],
    [0.0, 0.242, 0.758],
]);

pub const DEUTERANOPIA: ColorMatrix = ColorMatrix([
    [0.625, 0.375, 0.0],
    [0.7, 0.3, 0.0],
    [0.0, 0.3, 0.7],
]);

pub const TRITANOPIA: ColorMatrix = ColorMatrix([
    [0.95, 0.05, 0.0],
    [0.0, 0.433, 0.567],
    [0.0, 0.475, 0.525],
]);

pub const PROTANOMALY: ColorMatrix = ColorMatrix::IDENTITY.lerp(&PROTANOPIA, ANOMALY_SEVERITY);
pub const DEUTERANOMALY: ColorMatrix =
    ColorMatrix::IDENTITY.lerp(&DEUTERANOPIA, ANOMALY_SEVERITY);
pub const TRITANOMALY: ColorMatrix = ColorMatrix::IDENTITY.lerp(&TRITANOPIA, ANOMALY_SEVERITY);

/// The simulation matrix for `filter`, or `None` for types without one.
pub const fn matrix(filter: CvdFilter) -> Option<&'static ColorMatrix> {
    match filter {
        CvdFilter::Protanopia => Some(&PROTANOPIA),
        CvdFilter::Protanomaly => Some(&PROTANOMALY),
        CvdFilter::Deuteranopia => Some(&DEUTERANOPIA),
        CvdFilter::Deuteranomaly => Some(&DEUTERANOMALY),
        CvdFilter::Tritanopia => Some(&TRITANOPIA),
        CvdFilter::Tritanomaly => Some(&TRITANOMALY),
        CvdFilter::None | CvdFilter::Achromatopsia | CvdFilter::Achromatomaly => None,
    }
}

/// `M[filter] · input`, clamped. Types without a matrix pass through.
pub fn simulate(input: Color, filter: CvdFilter) -> Color {
    match matrix(filter) {
        Some(m) => m.apply_color(input).saturate(),
        None => input,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_deuteranopia_pure_red() {
        let out = simulate(Color::new(1.0, 0.0, 0.0), CvdFilter::Deuteranopia);
        assert!((out.r - 0.625).abs() < EPSILON);
        assert!((out.g - 0.700).abs() < EPSILON);
        assert!(out.b.abs() < EPSILON);
    }

    #[test]
    fn test_rows_sum_to_one() {
        for m in [
            PROTANOPIA,
            DEUTERANOPIA,
            TRITANOPIA,
            PROTANOMALY,
            DEUTERANOMALY,
            TRITANOMALY,
        ] {
            for row in m.0 {
                let sum: f32 = row.iter().sum();
                assert!((sum - 1.0).abs() < 1e-5, "row {row:?} sums to {sum}");
            }
        }
    }

    #[test]
    fn test_anomaly_is_between_identity_and_dichromat() {
        let input = Color::new(1.0, 0.0, 0.0);
        let full = simulate(input, CvdFilter::Protanopia);
        let partial = simulate(input, CvdFilter::Protanomaly);
        let expected = input.lerp(full, ANOMALY_SEVERITY);
        assert!(partial.distance(expected) < 1e-5, "{partial} vs {expected}");
    }

    #[test]
    fn test_achromatic_types_have_no_matrix() {
        assert!(matrix(CvdFilter::None).is_none());
        assert!(matrix(CvdFilter::Achromatopsia).is_none());
        assert!(matrix(CvdFilter::Achromatomaly).is_none());
    }
}
