//! Per-pixel evaluation of a compiled pipeline.
//!
//! For one pixel:
//! 1. Resolve zone coverage (one zone, or two at a soft edge)
//! 2. Evaluate each covering zone's mode
//! 3. Blend the zone results by coverage weight
//!
//! A re-simulation zone reads its source zone's correction result for the
//! same pixel. The source is evaluated on demand and memoized for the pixel,
//! so no frame-sized scratch buffer is needed.

use crate::color::Color;
use crate::simulation::guided::guided_weight;
use crate::simulation::verify::verify_in;
use crate::simulation::SimulationSpace;
use crate::transform::params::{MAX_ZONES, ZoneId};
use crate::transform::snapshot::{CompiledCorrection, CompiledZone, PipelineSnapshot};
use crate::zones::ZoneCoverage;

/// Corrected colors already computed for the current pixel, by zone.
type CorrectionMemo = [Option<Color>; MAX_ZONES];

/// Output color of one pixel covered by `coverage`.
pub fn evaluate_pixel(snapshot: &PipelineSnapshot, coverage: &ZoneCoverage, original: Color) -> Color {
    let mut memo: CorrectionMemo = [None; MAX_ZONES];
    let mut entries = coverage.iter();
    let Some((first, _)) = entries.next() else {
        return original;
    };
    let mut out = evaluate_zone(snapshot, first, original, &mut memo);
    // Coverage has at most two entries whose weights sum to one:
    // w0·a + w1·b == a + (b − a)·w1.
    for (zone, weight) in entries {
        let result = evaluate_zone(snapshot, zone, original, &mut memo);
        out = out.lerp(result, weight);
    }
    out
}

fn evaluate_zone(
    snapshot: &PipelineSnapshot,
    zone: ZoneId,
    original: Color,
    memo: &mut CorrectionMemo,
) -> Color {
    let space = snapshot.simulation_space();
    match snapshot.zone(zone) {
        CompiledZone::Original => original,
        CompiledZone::Simulation(sim) => {
            let simulated = space.simulate(original, sim.filter, sim.algorithm);
            original.lerp(simulated, sim.intensity)
        }
        CompiledZone::Correction(correction) => {
            let corrected = corrected_color(snapshot, zone, correction, original, memo);
            verify_in(corrected, &correction.post_sim, space)
        }
        CompiledZone::ReSimulation(resim) => {
            let CompiledZone::Correction(source) = snapshot.zone(resim.source_zone) else {
                // Compilation only keeps re-simulation zones with a
                // correction source.
                return original;
            };
            let corrected = corrected_color(snapshot, resim.source_zone, source, original, memo);
            let simulated = space.simulate(corrected, resim.filter, resim.algorithm);
            corrected.lerp(simulated, resim.intensity)
        }
    }
}

/// Correction result before post-simulation, memoized per zone.
fn corrected_color(
    snapshot: &PipelineSnapshot,
    zone: ZoneId,
    correction: &CompiledCorrection,
    original: Color,
    memo: &mut CorrectionMemo,
) -> Color {
    if let Some(color) = memo[zone] {
        return color;
    }
    let color = apply_correction(correction, original, snapshot.simulation_space());
    memo[zone] = Some(color);
    color
}

/// Guided LUT correction followed by the zone intensity blend.
pub fn apply_correction(
    correction: &CompiledCorrection,
    original: Color,
    space: SimulationSpace,
) -> Color {
    let scale = guided_weight(original, &correction.sim_guided, space);
    let corrected = correction.corrector.correct(original, scale);
    original.lerp(corrected, correction.intensity)
}
