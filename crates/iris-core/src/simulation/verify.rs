//! Post-correction verification: show a corrected pixel as the target
//! observer would see it.

use crate::color::Color;
use crate::transform::params::PostSimConfig;

use super::{SimulationSpace, simulate};

/// `lerp(corrected, simulate(corrected), intensity)`, or `corrected` when
/// disabled. Values are taken as given.
pub fn verify(corrected: Color, config: &PostSimConfig) -> Color {
    if !config.enabled {
        return corrected;
    }
    let simulated = simulate(corrected, config.filter, config.algorithm);
    corrected.lerp(simulated, config.intensity)
}

/// [`verify`] for a display-encoded pixel, simulating inside `space`.
pub fn verify_in(corrected: Color, config: &PostSimConfig, space: SimulationSpace) -> Color {
    if !config.enabled {
        return corrected;
    }
    let simulated = space.simulate(corrected, config.filter, config.algorithm);
    corrected.lerp(simulated, config.intensity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{CvdFilter, SimulationAlgorithm};

    const EPSILON: f32 = 1e-6;

    fn enabled(intensity: f32) -> PostSimConfig {
        PostSimConfig {
            enabled: true,
            algorithm: SimulationAlgorithm::Machado,
            filter: CvdFilter::Deuteranopia,
            intensity,
        }
    }

    #[test]
    fn test_disabled_is_passthrough() {
        let c = Color::new(0.4, 0.7, 0.1);
        assert_eq!(verify(c, &PostSimConfig::default()), c);
        assert_eq!(verify_in(c, &PostSimConfig::default(), SimulationSpace::Linear), c);
    }

    #[test]
    fn test_full_intensity_equals_simulation() {
        let c = Color::new(1.0, 0.0, 0.0);
        let out = verify(c, &enabled(1.0));
        let expected = simulate(c, CvdFilter::Deuteranopia, SimulationAlgorithm::Machado);
        assert!(out.distance(expected) < EPSILON);
    }

    #[test]
    fn test_half_intensity_is_midpoint() {
        let c = Color::new(1.0, 0.0, 0.0);
        let out = verify(c, &enabled(0.5));
        assert!((out.r - 0.8125).abs() < EPSILON, "{out}");
        assert!((out.g - 0.35).abs() < EPSILON, "{out}");
    }
}
