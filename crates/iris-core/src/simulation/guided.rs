//! Simulation-guided correction weight.
//!
//! A pixel is corrected in proportion to how much the deficiency changes it:
//!
//! ```text
//! error  = |original − simulate(original)|     (0 ..= √3)
//! weight = saturate(error × sensitivity)
//! ```
//!
//! Pixels the observer already perceives correctly get near-zero weight.

use crate::color::Color;
use crate::transform::params::SimGuidedConfig;

use super::{CvdFilter, SimulationAlgorithm, SimulationSpace, simulate};

/// Correction weight in `[0, 1]` for `original` under `filter`.
pub fn detect_weight(
    original: Color,
    filter: CvdFilter,
    algorithm: SimulationAlgorithm,
    sensitivity: f32,
) -> f32 {
    let simulated = simulate(original, filter, algorithm);
    (original.distance(simulated) * sensitivity).clamp(0.0, 1.0)
}

/// [`detect_weight`] for a display-encoded pixel, measured in `space`.
///
/// Returns 1.0 when guidance is disabled so the caller can multiply
/// unconditionally.
pub fn guided_weight(original: Color, config: &SimGuidedConfig, space: SimulationSpace) -> f32 {
    if !config.enabled {
        return 1.0;
    }
    detect_weight(
        space.to_working(original),
        config.filter,
        config.algorithm,
        config.sensitivity,
    )
}
