//! Iris Core: domain layer for color-vision-deficiency simulation and
//! correction.
//!
//! This crate contains the color science, CVD simulation models, LUT-based
//! correction and the zone-aware pixel pipeline. No capture, GPU or UI
//! dependencies: it consumes a frame plus a configuration and produces a
//! frame.

pub mod color;
pub mod color_management;
pub mod correction;
pub mod engine;
pub mod error;
pub mod image;
pub mod preset;
pub mod simulation;
pub mod transform;
pub mod zones;

// Re-exports for convenience.
pub use color::{Channel, Color};
pub use correction::{GradientCache, GradientTable, LutCorrector};
pub use engine::Engine;
pub use error::{ConfigWarning, FrameError, PresetError, SourceProblem};
pub use image::Frame;
pub use preset::{BuiltinPreset, Preset};
pub use simulation::{CvdFilter, SimulationAlgorithm, SimulationSpace, simulate};
pub use transform::evaluate::evaluate_pixel;
pub use transform::params::{
    ApplicationMode, BlendMode, ChannelLut, CorrectionConfig, GradientType, PipelineConfig,
    PostSimConfig, ReSimulationConfig, SimGuidedConfig, SimulationConfig, SplitGeometry, ZoneId,
    ZoneMode,
};
pub use transform::snapshot::PipelineSnapshot;
pub use zones::{PixelRequest, Point, ScreenSize, ZoneCoverage, ZoneResolver};
