//! Immutable, render-ready form of a [`PipelineConfig`].
//!
//! Compilation clamps every field, resolves gradient tables through the
//! shared cache and replaces invalid re-simulation zones with `Original`.
//! A snapshot is never modified afterwards; the engine swaps whole
//! snapshots between frames.

use crate::color::Channel;
use crate::correction::{ChannelStage, GradientCache, LutCorrector};
use crate::error::ConfigWarning;
use crate::simulation::SimulationSpace;
use crate::transform::params::{
    CorrectionConfig, MAX_ZONES, PipelineConfig, PostSimConfig, ReSimulationConfig,
    SimGuidedConfig, SimulationConfig, SplitGeometry, ZoneId, ZoneMode,
};
use crate::transform::validate::{check_resimulation_source, sanitize};
use crate::zones::{Point, ScreenSize, ZoneResolver};

/// A correction zone with its tables resolved.
#[derive(Debug, Clone)]
pub struct CompiledCorrection {
    pub corrector: LutCorrector,
    pub intensity: f32,
    pub sim_guided: SimGuidedConfig,
    pub post_sim: PostSimConfig,
}

impl CompiledCorrection {
    pub fn compile(config: &CorrectionConfig, cache: &GradientCache) -> Self {
        let channels = Channel::ALL.map(|channel| {
            let lut = config.channel(channel);
            lut.enabled.then(|| ChannelStage {
                strength: lut.strength,
                table: cache.get_or_build(lut, config.gradient_type),
            })
        });
        Self {
            corrector: LutCorrector::new(channels, config.application_mode, config.blend_mode),
            intensity: config.intensity,
            sim_guided: config.sim_guided,
            post_sim: config.post_sim,
        }
    }
}

/// Per-zone behavior after compilation.
#[derive(Debug, Clone, Default)]
pub enum CompiledZone {
    #[default]
    Original,
    Simulation(SimulationConfig),
    Correction(CompiledCorrection),
    /// Source is guaranteed to be an active `Correction` zone.
    ReSimulation(ReSimulationConfig),
}

#[derive(Debug, Clone)]
pub struct PipelineSnapshot {
    version: u64,
    geometry: SplitGeometry,
    simulation_space: SimulationSpace,
    zones: [CompiledZone; MAX_ZONES],
}

impl Default for PipelineSnapshot {
    fn default() -> Self {
        Self::identity()
    }
}

impl PipelineSnapshot {
    /// Fullscreen `Original`: output equals input.
    pub fn identity() -> Self {
        Self {
            version: 0,
            geometry: SplitGeometry::Fullscreen,
            simulation_space: SimulationSpace::default(),
            zones: Default::default(),
        }
    }

    /// Compile `config`. Problems are returned as warnings (and logged);
    /// compilation itself always succeeds.
    pub fn compile(config: &PipelineConfig, cache: &GradientCache) -> (Self, Vec<ConfigWarning>) {
        let (config, mut warnings) = sanitize(config);
        let active = config.geometry.zone_count();

        let zones: [CompiledZone; MAX_ZONES] = std::array::from_fn(|zone| {
            if zone >= active {
                return CompiledZone::Original;
            }
            match &config.zones[zone] {
                ZoneMode::Original => CompiledZone::Original,
                ZoneMode::Simulation(sim) => CompiledZone::Simulation(*sim),
                ZoneMode::Correction(correction) => {
                    CompiledZone::Correction(CompiledCorrection::compile(correction, cache))
                }
                ZoneMode::ReSimulation(resim) => {
                    match check_resimulation_source(&config, zone, resim.source_zone) {
                        Ok(()) => CompiledZone::ReSimulation(*resim),
                        Err(problem) => {
                            warnings.push(ConfigWarning::InvalidResimulationSource {
                                zone,
                                source_zone: resim.source_zone,
                                problem,
                            });
                            CompiledZone::Original
                        }
                    }
                }
            }
        });

        for warning in &warnings {
            tracing::warn!("{warning}");
        }

        let snapshot = Self {
            version: 0,
            geometry: config.geometry,
            simulation_space: config.simulation_space,
            zones,
        };
        (snapshot, warnings)
    }

    pub(crate) fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Engine version this snapshot was published under; 0 if standalone.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn geometry(&self) -> SplitGeometry {
        self.geometry
    }

    pub fn simulation_space(&self) -> SimulationSpace {
        self.simulation_space
    }

    pub fn zone(&self, zone: ZoneId) -> &CompiledZone {
        &self.zones[zone]
    }

    /// Whether every pixel is returned unchanged.
    pub fn is_identity(&self) -> bool {
        self.zones[..self.geometry.zone_count()]
            .iter()
            .all(|z| matches!(z, CompiledZone::Original))
    }

    pub fn resolver(&self, screen: ScreenSize, cursor: Point) -> ZoneResolver {
        ZoneResolver::new(self.geometry, screen, cursor)
    }
}
