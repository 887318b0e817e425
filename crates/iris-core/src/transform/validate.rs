//! Range enforcement for externally supplied configuration.
//!
//! Nothing here fails: out-of-range values are clamped, NaN becomes the
//! lower bound, and every substitution is recorded as a [`ConfigWarning`].

use crate::color::Channel;
use crate::error::{ConfigWarning, SourceProblem};
use crate::transform::params::{
    ApplicationMode, ChannelLut, CorrectionConfig, MAX_ZONES, PipelineConfig, PostSimConfig,
    ReSimulationConfig, SimGuidedConfig, SimulationConfig, SplitGeometry, ZoneId, ZoneMode,
};

pub const UNIT_RANGE: (f32, f32) = (0.0, 1.0);
pub const WHITE_PROTECTION_RANGE: (f32, f32) = (0.01, 1.0);
pub const SENSITIVITY_RANGE: (f32, f32) = (0.5, 5.0);
/// Circle radius and rectangle extents, in pixels.
pub const EXTENT_RANGE: (f32, f32) = (1.0, f32::MAX);

/// Collects warnings while clamping fields in place.
#[derive(Debug, Default)]
pub struct Validator {
    warnings: Vec<ConfigWarning>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp `value` into `range`; NaN maps to the minimum.
    pub fn clamp(&mut self, field: impl FnOnce() -> String, value: &mut f32, range: (f32, f32)) {
        let (min, max) = range;
        let clamped = if value.is_nan() {
            min
        } else {
            value.clamp(min, max)
        };
        if clamped.to_bits() != value.to_bits() {
            self.warnings.push(ConfigWarning::ValueClamped {
                field: field(),
                value: *value,
                min,
                max,
                clamped,
            });
            *value = clamped;
        }
    }

    pub fn push(&mut self, warning: ConfigWarning) {
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    pub fn finish(self) -> Vec<ConfigWarning> {
        self.warnings
    }

    pub fn geometry(&mut self, geometry: &mut SplitGeometry) {
        match geometry {
            SplitGeometry::Fullscreen | SplitGeometry::Quadrants => {}
            SplitGeometry::SplitVertical { position } | SplitGeometry::SplitHorizontal { position } => {
                self.clamp(|| "geometry.position".into(), position, UNIT_RANGE);
            }
            SplitGeometry::Circle {
                radius,
                edge_softness,
            } => {
                self.clamp(|| "geometry.radius".into(), radius, EXTENT_RANGE);
                self.clamp(|| "geometry.edge_softness".into(), edge_softness, UNIT_RANGE);
            }
            SplitGeometry::Rectangle {
                width,
                height,
                edge_softness,
            } => {
                self.clamp(|| "geometry.width".into(), width, EXTENT_RANGE);
                self.clamp(|| "geometry.height".into(), height, EXTENT_RANGE);
                self.clamp(|| "geometry.edge_softness".into(), edge_softness, UNIT_RANGE);
            }
        }
    }

    pub fn zone(&mut self, zone: ZoneId, mode: &mut ZoneMode) {
        match mode {
            ZoneMode::Original => {}
            ZoneMode::Simulation(sim) => self.simulation(zone, sim),
            ZoneMode::Correction(correction) => self.correction(&format!("zones[{zone}]"), correction),
            ZoneMode::ReSimulation(resim) => self.resimulation(zone, resim),
        }
    }

    fn simulation(&mut self, zone: ZoneId, sim: &mut SimulationConfig) {
        self.clamp(
            || format!("zones[{zone}].intensity"),
            &mut sim.intensity,
            UNIT_RANGE,
        );
    }

    fn resimulation(&mut self, zone: ZoneId, resim: &mut ReSimulationConfig) {
        self.clamp(
            || format!("zones[{zone}].intensity"),
            &mut resim.intensity,
            UNIT_RANGE,
        );
    }

    /// Clamp a correction config; `prefix` names it in warnings.
    pub fn correction(&mut self, prefix: &str, correction: &mut CorrectionConfig) {
        for channel in Channel::ALL {
            self.channel(prefix, channel, correction.channel_mut(channel));
        }
        if let ApplicationMode::Threshold { threshold } = &mut correction.application_mode {
            self.clamp(|| format!("{prefix}.threshold"), threshold, UNIT_RANGE);
        }
        self.clamp(
            || format!("{prefix}.intensity"),
            &mut correction.intensity,
            UNIT_RANGE,
        );
        self.sim_guided(prefix, &mut correction.sim_guided);
        self.post_sim(prefix, &mut correction.post_sim);
    }

    fn channel(&mut self, prefix: &str, channel: Channel, lut: &mut ChannelLut) {
        self.clamp(
            || format!("{prefix}.{channel}.strength"),
            &mut lut.strength,
            UNIT_RANGE,
        );
        self.clamp(
            || format!("{prefix}.{channel}.white_protection"),
            &mut lut.white_protection,
            WHITE_PROTECTION_RANGE,
        );
        for (name, color) in [("start_color", &mut lut.start_color), ("end_color", &mut lut.end_color)] {
            self.clamp(|| format!("{prefix}.{channel}.{name}.r"), &mut color.r, UNIT_RANGE);
            self.clamp(|| format!("{prefix}.{channel}.{name}.g"), &mut color.g, UNIT_RANGE);
            self.clamp(|| format!("{prefix}.{channel}.{name}.b"), &mut color.b, UNIT_RANGE);
        }
    }

    fn sim_guided(&mut self, prefix: &str, guided: &mut SimGuidedConfig) {
        self.clamp(
            || format!("{prefix}.sim_guided.sensitivity"),
            &mut guided.sensitivity,
            SENSITIVITY_RANGE,
        );
    }

    fn post_sim(&mut self, prefix: &str, post: &mut PostSimConfig) {
        self.clamp(
            || format!("{prefix}.post_sim.intensity"),
            &mut post.intensity,
            UNIT_RANGE,
        );
    }
}

/// Clamp every numeric field of `config`. Zones beyond the geometry's
/// zone count are left untouched.
pub fn sanitize(config: &PipelineConfig) -> (PipelineConfig, Vec<ConfigWarning>) {
    let mut config = config.clone();
    let mut validator = Validator::new();
    validator.geometry(&mut config.geometry);
    let active = config.geometry.zone_count();
    for (zone, mode) in config.zones.iter_mut().enumerate().take(active) {
        validator.zone(zone, mode);
    }
    (config, validator.finish())
}

/// Check that `zone`'s re-simulation source is an active correction zone.
pub fn check_resimulation_source(
    config: &PipelineConfig,
    zone: ZoneId,
    source: ZoneId,
) -> Result<(), SourceProblem> {
    if source >= MAX_ZONES {
        return Err(SourceProblem::OutOfRange);
    }
    if source == zone {
        return Err(SourceProblem::SelfReference);
    }
    if source >= config.geometry.zone_count() {
        return Err(SourceProblem::InactiveUnderGeometry);
    }
    match config.zones[source] {
        ZoneMode::Correction(_) => Ok(()),
        _ => Err(SourceProblem::NotCorrection),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_config_has_no_warnings() {
        let mut config = PipelineConfig::fullscreen(ZoneMode::Correction(CorrectionConfig::default()));
        config.geometry = SplitGeometry::Circle {
            radius: 120.0,
            edge_softness: 0.2,
        };
        let (clean, warnings) = sanitize(&config);
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(clean, config);
    }

    #[test]
    fn test_out_of_range_fields_are_clamped_and_reported() {
        let mut correction = CorrectionConfig::default();
        correction.channels[0].strength = 1.5;
        correction.channels[1].white_protection = 0.0;
        correction.sim_guided.sensitivity = 9.0;
        let config = PipelineConfig::fullscreen(ZoneMode::Correction(correction));

        let (clean, warnings) = sanitize(&config);
        assert_eq!(warnings.len(), 3, "{warnings:?}");
        let ZoneMode::Correction(c) = &clean.zones[0] else {
            panic!("zone 0 changed mode");
        };
        assert_eq!(c.channels[0].strength, 1.0);
        assert_eq!(c.channels[1].white_protection, 0.01);
        assert_eq!(c.sim_guided.sensitivity, 5.0);
        assert!(matches!(
            &warnings[0],
            ConfigWarning::ValueClamped { field, clamped, .. }
                if field == "zones[0].Red.strength" && *clamped == 1.0
        ));
    }

    #[test]
    fn test_nan_becomes_lower_bound() {
        let mut validator = Validator::new();
        let mut v = f32::NAN;
        validator.clamp(|| "x".into(), &mut v, SENSITIVITY_RANGE);
        assert_eq!(v, 0.5);
        assert_eq!(validator.warnings().len(), 1);
    }

    #[test]
    fn test_degenerate_circle_radius_is_raised() {
        let mut config = PipelineConfig::default();
        config.geometry = SplitGeometry::Circle {
            radius: 0.0,
            edge_softness: 2.0,
        };
        let (clean, warnings) = sanitize(&config);
        assert_eq!(warnings.len(), 2);
        assert_eq!(
            clean.geometry,
            SplitGeometry::Circle {
                radius: 1.0,
                edge_softness: 1.0
            }
        );
    }

    #[test]
    fn test_inactive_zones_are_not_validated() {
        let mut config = PipelineConfig::default();
        config.zones[2] = ZoneMode::Simulation(SimulationConfig {
            intensity: 7.0,
            ..SimulationConfig::default()
        });
        let (_, warnings) = sanitize(&config);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_resimulation_source_checks() {
        let mut config = PipelineConfig::default();
        config.geometry = SplitGeometry::SplitVertical { position: 0.5 };
        config.zones[0] = ZoneMode::Correction(CorrectionConfig::default());
        assert_eq!(check_resimulation_source(&config, 1, 0), Ok(()));
        assert_eq!(
            check_resimulation_source(&config, 1, 1),
            Err(SourceProblem::SelfReference)
        );
        assert_eq!(
            check_resimulation_source(&config, 1, 9),
            Err(SourceProblem::OutOfRange)
        );
        assert_eq!(
            check_resimulation_source(&config, 1, 3),
            Err(SourceProblem::InactiveUnderGeometry)
        );
        config.zones[0] = ZoneMode::Original;
        assert_eq!(
            check_resimulation_source(&config, 1, 0),
            Err(SourceProblem::NotCorrection)
        );
    }
}
