//! CVD simulation: how a color appears to an observer with a given deficiency.
//!
//! Two algorithms are available for the cone-loss types:
//! - [`SimulationAlgorithm::Machado`]: one 3x3 RGB matrix per type ([`machado`])
//! - [`SimulationAlgorithm::Strict`]: LMS confusion-line projection ([`strict`])
//!
//! Achromatic types ignore the algorithm and reduce the color to luminance.
//! `CvdFilter::None` is always the identity.

pub mod guided;
pub mod machado;
pub mod strict;
pub mod verify;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::color_management::transfer::{decode_color, encode_color};

/// Blend factor toward the full dichromat result for every "-anomaly" /
/// "-maly" variant.
pub const ANOMALY_SEVERITY: f32 = 0.6;

/// Cone class whose response is missing or shifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cone {
    Long,
    Medium,
    Short,
}

/// A color vision deficiency to simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CvdFilter {
    #[default]
    None,
    Protanopia,
    Protanomaly,
    Deuteranopia,
    Deuteranomaly,
    Tritanopia,
    Tritanomaly,
    Achromatopsia,
    Achromatomaly,
}

impl CvdFilter {
    pub const fn all() -> &'static [CvdFilter] {
        const ALL: [CvdFilter; 9] = [
            CvdFilter::None,
            CvdFilter::Protanopia,
            CvdFilter::Protanomaly,
            CvdFilter::Deuteranopia,
            CvdFilter::Deuteranomaly,
            CvdFilter::Tritanopia,
            CvdFilter::Tritanomaly,
            CvdFilter::Achromatopsia,
            CvdFilter::Achromatomaly,
        ];
        &ALL
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Protanopia => "Protanopia",
            Self::Protanomaly => "Protanomaly",
            Self::Deuteranopia => "Deuteranopia",
            Self::Deuteranomaly => "Deuteranomaly",
            Self::Tritanopia => "Tritanopia",
            Self::Tritanomaly => "Tritanomaly",
            Self::Achromatopsia => "Achromatopsia",
            Self::Achromatomaly => "Achromatomaly",
        }
    }

    /// The cone affected by this deficiency; `None` for the identity and
    /// achromatic types.
    pub const fn deficient_cone(self) -> Option<Cone> {
        match self {
            Self::Protanopia | Self::Protanomaly => Some(Cone::Long),
            Self::Deuteranopia | Self::Deuteranomaly => Some(Cone::Medium),
            Self::Tritanopia | Self::Tritanomaly => Some(Cone::Short),
            Self::None | Self::Achromatopsia | Self::Achromatomaly => None,
        }
    }

    /// Whether this is a partial ("-anomaly"/"-maly") variant.
    pub const fn is_anomalous(self) -> bool {
        matches!(
            self,
            Self::Protanomaly | Self::Deuteranomaly | Self::Tritanomaly | Self::Achromatomaly
        )
    }
}

impl fmt::Display for CvdFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CvdFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|f| f.label().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown CVD filter: {s}"))
    }
}

/// Simulation method for the cone-loss filter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SimulationAlgorithm {
    /// RGB-space 3x3 matrix (Machado, Oliveira, Fernandes 2009).
    #[default]
    Machado,
    /// LMS confusion-line projection (Brettel, Viénot, Mollon 1997).
    Strict,
}

impl SimulationAlgorithm {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Machado => "Machado",
            Self::Strict => "Strict",
        }
    }
}

impl fmt::Display for SimulationAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SimulationAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "machado" => Ok(Self::Machado),
            "strict" | "lms" | "brettel" => Ok(Self::Strict),
            _ => Err(format!("unknown simulation algorithm: {s}")),
        }
    }
}

/// Simulate how `input` is perceived under `filter`.
///
/// The math is applied to the values as given; callers decide whether they
/// are linear light (see [`SimulationSpace`]). Output is clamped to `[0, 1]`
/// for every type except `None`, which returns `input` bit-for-bit.
pub fn simulate(input: Color, filter: CvdFilter, algorithm: SimulationAlgorithm) -> Color {
    match filter {
        CvdFilter::None => input,
        CvdFilter::Achromatopsia => Color::splat(input.luminance()).saturate(),
        CvdFilter::Achromatomaly => input
            .lerp(Color::splat(input.luminance()), ANOMALY_SEVERITY)
            .saturate(),
        _ => match algorithm {
            SimulationAlgorithm::Machado => machado::simulate(input, filter),
            SimulationAlgorithm::Strict => strict::simulate(input, filter),
        },
    }
}

/// Value space the pipeline hands to the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimulationSpace {
    /// Decode sRGB to linear light before simulating, re-encode after.
    #[default]
    Linear,
    /// Simulate directly on display-encoded values.
    Display,
}

impl SimulationSpace {
    /// Convert a display-encoded color into this space.
    pub fn to_working(self, color: Color) -> Color {
        match self {
            Self::Linear => decode_color(color),
            Self::Display => color,
        }
    }

    /// Convert a color in this space back to display encoding.
    pub fn to_display(self, color: Color) -> Color {
        match self {
            Self::Linear => encode_color(color),
            Self::Display => color,
        }
    }

    /// [`simulate`] a display-encoded color inside this space.
    pub fn simulate(self, color: Color, filter: CvdFilter, algorithm: SimulationAlgorithm) -> Color {
        if filter == CvdFilter::None {
            return color;
        }
        self.to_display(simulate(self.to_working(color), filter, algorithm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_none_is_identity_for_both_algorithms() {
        let c = Color::new(0.123, 0.456, 0.789);
        assert_eq!(simulate(c, CvdFilter::None, SimulationAlgorithm::Machado), c);
        assert_eq!(simulate(c, CvdFilter::None, SimulationAlgorithm::Strict), c);
    }

    #[test]
    fn test_achromatopsia_outputs_luminance_gray() {
        let c = Color::new(0.8, 0.4, 0.2);
        let l = c.luminance();
        for algorithm in [SimulationAlgorithm::Machado, SimulationAlgorithm::Strict] {
            let out = simulate(c, CvdFilter::Achromatopsia, algorithm);
            assert!((out.r - l).abs() < EPSILON);
            assert!((out.g - l).abs() < EPSILON);
            assert!((out.b - l).abs() < EPSILON);
        }
    }

    #[test]
    fn test_achromatomaly_is_partial_desaturation() {
        let c = Color::new(1.0, 0.0, 0.0);
        let out = simulate(c, CvdFilter::Achromatomaly, SimulationAlgorithm::Machado);
        let expected = c.lerp(Color::splat(c.luminance()), ANOMALY_SEVERITY);
        assert!(out.distance(expected) < EPSILON);
        assert!(out.r > out.g, "partial variant keeps some chroma");
    }

    #[test]
    fn test_simulation_is_deterministic() {
        let c = Color::new(0.3, 0.6, 0.1);
        for &filter in CvdFilter::all() {
            for algorithm in [SimulationAlgorithm::Machado, SimulationAlgorithm::Strict] {
                let a = simulate(c, filter, algorithm);
                let b = simulate(c, filter, algorithm);
                assert_eq!(a.to_array().map(f32::to_bits), b.to_array().map(f32::to_bits));
            }
        }
    }

    #[test]
    fn test_outputs_stay_in_unit_range() {
        let c = Color::new(1.0, 0.0, 1.0);
        for &filter in CvdFilter::all() {
            for algorithm in [SimulationAlgorithm::Machado, SimulationAlgorithm::Strict] {
                let out = simulate(c, filter, algorithm);
                for v in out.to_array() {
                    assert!((0.0..=1.0).contains(&v), "{filter} {algorithm}: {out}");
                }
            }
        }
    }

    #[test]
    fn test_filter_from_str_is_case_insensitive() {
        assert_eq!("deuteranopia".parse::<CvdFilter>(), Ok(CvdFilter::Deuteranopia));
        assert_eq!("Tritanomaly".parse::<CvdFilter>(), Ok(CvdFilter::Tritanomaly));
        assert!("redblind".parse::<CvdFilter>().is_err());
    }

    #[test]
    fn test_linear_space_none_is_exact_identity() {
        let c = Color::new(0.2, 0.5, 0.9);
        let out = SimulationSpace::Linear.simulate(c, CvdFilter::None, SimulationAlgorithm::Strict);
        assert_eq!(out, c);
    }

    #[test]
    fn test_linear_space_preserves_black_and_white_under_machado() {
        for c in [Color::BLACK, Color::WHITE] {
            let out = SimulationSpace::Linear.simulate(
                c,
                CvdFilter::Deuteranopia,
                SimulationAlgorithm::Machado,
            );
            assert!(out.distance(c) < 1e-4, "{c} -> {out}");
        }
    }
}
