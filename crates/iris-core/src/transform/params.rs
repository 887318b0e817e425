//! Pipeline configuration: split geometry plus one [`ZoneMode`] per zone.
//!
//! `PipelineConfig` is the single source of truth handed to the engine by
//! the settings layer. It is plain data; numeric ranges are enforced when a
//! [`PipelineSnapshot`](super::snapshot::PipelineSnapshot) is compiled from it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::{Channel, Color};
use crate::simulation::{CvdFilter, SimulationAlgorithm, SimulationSpace};

/// Index of a zone, `0..MAX_ZONES`.
pub type ZoneId = usize;

/// Upper bound on simultaneously active zones (the quadrant split).
pub const MAX_ZONES: usize = 4;

/// Threshold used when a preset names one for a mode that has none.
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// One channel's correction gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelLut {
    pub enabled: bool,
    /// Blend strength, `[0, 1]`.
    pub strength: f32,
    /// Gradient color at channel value 0.
    pub start_color: Color,
    /// Gradient color at channel value 1.
    pub end_color: Color,
    /// How strongly near-white entries are pulled back to gray, `[0.01, 1]`.
    pub white_protection: f32,
}

impl Default for ChannelLut {
    fn default() -> Self {
        Self {
            enabled: false,
            strength: 1.0,
            start_color: Color::BLACK,
            end_color: Color::WHITE,
            white_protection: 0.5,
        }
    }
}

/// Which pixels a channel's LUT affects.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ApplicationMode {
    /// Every pixel, weighted by the channel's own value.
    #[default]
    Full,
    /// Only pixels where the channel is the largest component.
    Dominant,
    /// Only pixels where the channel is at least `threshold`.
    Threshold { threshold: f32 },
}

impl ApplicationMode {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Full => "Full",
            Self::Dominant => "Dominant",
            Self::Threshold { .. } => "Threshold",
        }
    }
}

/// How a sampled LUT color composites with the original channel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlendMode {
    #[default]
    ChannelWeighted,
    Direct,
    Proportional,
    Additive,
    Screen,
}

impl BlendMode {
    pub const fn all() -> &'static [BlendMode] {
        const ALL: [BlendMode; 5] = [
            BlendMode::ChannelWeighted,
            BlendMode::Direct,
            BlendMode::Proportional,
            BlendMode::Additive,
            BlendMode::Screen,
        ];
        &ALL
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ChannelWeighted => "ChannelWeighted",
            Self::Direct => "Direct",
            Self::Proportional => "Proportional",
            Self::Additive => "Additive",
            Self::Screen => "Screen",
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BlendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| *c != '-' && *c != '_').collect();
        Self::all()
            .iter()
            .copied()
            .find(|m| m.label().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown blend mode: {s}"))
    }
}

/// Interpolation space for building a gradient table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GradientType {
    #[default]
    LinearRgb,
    PerceptualLab,
    Hsl,
}

impl GradientType {
    pub const fn all() -> &'static [GradientType] {
        const ALL: [GradientType; 3] = [
            GradientType::LinearRgb,
            GradientType::PerceptualLab,
            GradientType::Hsl,
        ];
        &ALL
    }

    /// Name used in the persisted preset form.
    pub const fn label(self) -> &'static str {
        match self {
            Self::LinearRgb => "LinearRGB",
            Self::PerceptualLab => "PerceptualLAB",
            Self::Hsl => "HSL",
        }
    }
}

impl fmt::Display for GradientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GradientType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linearrgb" | "linear" | "rgb" => Ok(Self::LinearRgb),
            "perceptuallab" | "lab" => Ok(Self::PerceptualLab),
            "hsl" => Ok(Self::Hsl),
            _ => Err(format!("unknown gradient type: {s}")),
        }
    }
}

/// Gate correction strength by the simulated CVD error of each pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimGuidedConfig {
    pub enabled: bool,
    pub algorithm: SimulationAlgorithm,
    pub filter: CvdFilter,
    /// Error-to-weight gain, `[0.5, 5]`.
    pub sensitivity: f32,
}

impl Default for SimGuidedConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            algorithm: SimulationAlgorithm::Machado,
            filter: CvdFilter::Deuteranopia,
            sensitivity: 2.0,
        }
    }
}

/// Re-simulate the corrected result for verification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostSimConfig {
    pub enabled: bool,
    pub algorithm: SimulationAlgorithm,
    pub filter: CvdFilter,
    /// Blend toward the simulated color, `[0, 1]`.
    pub intensity: f32,
}

impl Default for PostSimConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            algorithm: SimulationAlgorithm::Machado,
            filter: CvdFilter::Deuteranopia,
            intensity: 1.0,
        }
    }
}

/// Parameters of a `Simulation` zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub algorithm: SimulationAlgorithm,
    pub filter: CvdFilter,
    pub intensity: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            algorithm: SimulationAlgorithm::Machado,
            filter: CvdFilter::None,
            intensity: 1.0,
        }
    }
}

/// Parameters of a `Correction` zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionConfig {
    /// Channel LUTs in `R, G, B` order.
    pub channels: [ChannelLut; 3],
    pub application_mode: ApplicationMode,
    pub gradient_type: GradientType,
    pub blend_mode: BlendMode,
    /// Overall blend from the original to the corrected color, `[0, 1]`.
    pub intensity: f32,
    pub sim_guided: SimGuidedConfig,
    pub post_sim: PostSimConfig,
    /// Free text carried over from a preset.
    pub description: String,
    /// Preset threshold kept while `application_mode` is not `Threshold`.
    pub recommended_threshold: f32,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            channels: [ChannelLut::default(); 3],
            application_mode: ApplicationMode::Full,
            gradient_type: GradientType::LinearRgb,
            blend_mode: BlendMode::ChannelWeighted,
            intensity: 1.0,
            sim_guided: SimGuidedConfig::default(),
            post_sim: PostSimConfig::default(),
            description: String::new(),
            recommended_threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl CorrectionConfig {
    pub fn channel(&self, channel: Channel) -> &ChannelLut {
        &self.channels[channel.index()]
    }

    pub fn channel_mut(&mut self, channel: Channel) -> &mut ChannelLut {
        &mut self.channels[channel.index()]
    }

    pub fn any_enabled(&self) -> bool {
        self.channels.iter().any(|lut| lut.enabled)
    }
}

/// Parameters of a `ReSimulation` zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReSimulationConfig {
    /// Zone whose correction output is re-simulated.
    pub source_zone: ZoneId,
    pub algorithm: SimulationAlgorithm,
    pub filter: CvdFilter,
    pub intensity: f32,
}

impl Default for ReSimulationConfig {
    fn default() -> Self {
        Self {
            source_zone: 0,
            algorithm: SimulationAlgorithm::Machado,
            filter: CvdFilter::Deuteranopia,
            intensity: 1.0,
        }
    }
}

/// What a zone does to the pixels it covers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum ZoneMode {
    #[default]
    Original,
    Simulation(SimulationConfig),
    Correction(CorrectionConfig),
    ReSimulation(ReSimulationConfig),
}

impl ZoneMode {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Original => "Original",
            Self::Simulation(_) => "Simulation",
            Self::Correction(_) => "Correction",
            Self::ReSimulation(_) => "ReSimulation",
        }
    }
}

/// How the screen is partitioned into zones.
///
/// Positions and softness are normalized; circle radius and rectangle
/// extents are in pixels and centered on the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum SplitGeometry {
    #[default]
    Fullscreen,
    /// Zone 0 left of `position * width`, zone 1 right of it.
    SplitVertical { position: f32 },
    /// Zone 0 above `position * height`, zone 1 below it.
    SplitHorizontal { position: f32 },
    /// 0 = top-left, 1 = top-right, 2 = bottom-left, 3 = bottom-right.
    Quadrants,
    /// Zone 0 inside the circle, zone 1 outside.
    Circle { radius: f32, edge_softness: f32 },
    /// Zone 0 inside the rectangle, zone 1 outside.
    Rectangle {
        width: f32,
        height: f32,
        edge_softness: f32,
    },
}

impl SplitGeometry {
    /// Number of zones this geometry activates.
    pub const fn zone_count(&self) -> usize {
        match self {
            Self::Fullscreen => 1,
            Self::SplitVertical { .. }
            | Self::SplitHorizontal { .. }
            | Self::Circle { .. }
            | Self::Rectangle { .. } => 2,
            Self::Quadrants => 4,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Fullscreen => "Fullscreen",
            Self::SplitVertical { .. } => "SplitVertical",
            Self::SplitHorizontal { .. } => "SplitHorizontal",
            Self::Quadrants => "Quadrants",
            Self::Circle { .. } => "Circle",
            Self::Rectangle { .. } => "Rectangle",
        }
    }

    /// Whether resolution depends on the cursor position.
    pub const fn follows_cursor(&self) -> bool {
        matches!(self, Self::Circle { .. } | Self::Rectangle { .. })
    }
}

/// Root configuration document.
///
/// Produces an identity pipeline by default: one fullscreen zone in
/// `Original` mode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub geometry: SplitGeometry,
    pub zones: [ZoneMode; MAX_ZONES],
    pub simulation_space: SimulationSpace,
}

impl PipelineConfig {
    /// A single fullscreen zone running `mode`.
    pub fn fullscreen(mode: ZoneMode) -> Self {
        let mut config = Self::default();
        config.zones[0] = mode;
        config
    }

    /// Zones active under the current geometry, with their ids.
    pub fn active_zones(&self) -> impl Iterator<Item = (ZoneId, &ZoneMode)> {
        self.zones
            .iter()
            .enumerate()
            .take(self.geometry.zone_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_identity() {
        let config = PipelineConfig::default();
        assert_eq!(config.geometry, SplitGeometry::Fullscreen);
        assert!(config.zones.iter().all(|z| *z == ZoneMode::Original));
        assert_eq!(config.simulation_space, SimulationSpace::Linear);
    }

    #[test]
    fn test_zone_counts() {
        assert_eq!(SplitGeometry::Fullscreen.zone_count(), 1);
        assert_eq!(SplitGeometry::SplitVertical { position: 0.5 }.zone_count(), 2);
        assert_eq!(SplitGeometry::Quadrants.zone_count(), 4);
        let circle = SplitGeometry::Circle {
            radius: 100.0,
            edge_softness: 0.1,
        };
        assert_eq!(circle.zone_count(), 2);
        assert!(circle.follows_cursor());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "geometry": { "SplitVertical": { "position": 0.25 } },
            "zones": [
                "Original",
                { "Correction": { "blend_mode": "Direct",
                                  "channels": [{ "enabled": true }, {}, {}] } },
                "Original",
                "Original"
            ]
        }"#;
        let config: PipelineConfig = serde_json::from_str(json).expect("valid config");
        assert_eq!(config.geometry, SplitGeometry::SplitVertical { position: 0.25 });
        let ZoneMode::Correction(correction) = &config.zones[1] else {
            panic!("zone 1 should be Correction, got {:?}", config.zones[1]);
        };
        assert_eq!(correction.blend_mode, BlendMode::Direct);
        assert!(correction.channels[0].enabled);
        assert_eq!(correction.channels[0].strength, 1.0);
        assert!(!correction.channels[1].enabled);
        assert_eq!(correction.intensity, 1.0);
    }

    #[test]
    fn test_blend_mode_from_str_accepts_cli_spellings() {
        assert_eq!("direct".parse::<BlendMode>(), Ok(BlendMode::Direct));
        assert_eq!("channel-weighted".parse::<BlendMode>(), Ok(BlendMode::ChannelWeighted));
        assert!("multiply".parse::<BlendMode>().is_err());
    }

    #[test]
    fn test_gradient_type_from_str_accepts_preset_labels() {
        for &g in GradientType::all() {
            assert_eq!(g.label().parse::<GradientType>(), Ok(g));
        }
    }

    #[test]
    fn test_active_zones_follow_geometry() {
        let mut config = PipelineConfig::default();
        assert_eq!(config.active_zones().count(), 1);
        config.geometry = SplitGeometry::Quadrants;
        assert_eq!(config.active_zones().count(), 4);
    }
}
