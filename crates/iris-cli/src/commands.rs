//! Subcommand implementations.

use std::path::{Path, PathBuf};

use iris_core::preset::{BuiltinPreset, builtin};
use iris_core::{
    BlendMode, CorrectionConfig, CvdFilter, Engine, Frame, GradientType, PipelineConfig, Point,
    Preset, SimulationAlgorithm, SimulationConfig, SimulationSpace, ZoneMode,
};

use crate::error::CliError;
use crate::image_loader::{load_frame, save_frame};

/// Parse a cursor position given as `X,Y` in pixels.
pub fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("invalid coordinate '{v}'"))
    };
    Ok(Point::new(parse(x)?, parse(y)?))
}

/// Parse `linear` or `display`.
pub fn parse_space(s: &str) -> Result<SimulationSpace, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "linear" => Ok(SimulationSpace::Linear),
        "display" | "srgb" => Ok(SimulationSpace::Display),
        _ => Err(format!("unknown simulation space: {s}")),
    }
}

pub fn configure_threads(threads: Option<usize>) -> Result<(), CliError> {
    if let Some(n) = threads {
        rayon::ThreadPoolBuilder::new().num_threads(n).build_global()?;
        tracing::debug!("using {n} worker threads");
    }
    Ok(())
}

fn read_text(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write_text(path: &Path, text: &str) -> Result<(), CliError> {
    std::fs::write(path, text).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Convert a preset, logging every substituted or clamped field.
fn preset_correction(preset: &Preset) -> CorrectionConfig {
    let (correction, warnings) = preset.to_correction();
    for warning in &warnings {
        tracing::warn!("{}: {warning}", preset.name);
    }
    correction
}

fn load_preset(path: &Path) -> Result<Preset, CliError> {
    Ok(Preset::from_json(&read_text(path)?)?)
}

/// Render `frame` through `config`; the cursor defaults to the frame center.
///
/// Compilation logs its own warnings.
fn render_config(frame: &Frame, config: &PipelineConfig, cursor: Option<Point>) -> Frame {
    let (engine, _) = Engine::with_config(config);
    let cursor = cursor.unwrap_or_else(|| {
        Point::new(frame.width as f32 * 0.5, frame.height as f32 * 0.5)
    });
    let start = std::time::Instant::now();
    let out = engine.render(frame, cursor);
    tracing::info!(
        "rendered {}x{} in {:.1} ms",
        out.width,
        out.height,
        start.elapsed().as_secs_f64() * 1000.0
    );
    out
}

/// Load `input`, render it through `config`, write `output`.
fn run_pipeline(
    input: &Path,
    output: &Path,
    config: &PipelineConfig,
    cursor: Option<Point>,
) -> Result<(), CliError> {
    let frame = load_frame(input)?;
    save_frame(&render_config(&frame, config, cursor), output)?;
    Ok(())
}

pub fn cmd_render(
    input: &Path,
    output: &Path,
    config_path: &Path,
    cursor: Option<Point>,
) -> Result<(), CliError> {
    let config: PipelineConfig =
        serde_json::from_str(&read_text(config_path)?).map_err(|source| CliError::Config {
            path: config_path.to_path_buf(),
            source,
        })?;
    tracing::debug!("pipeline geometry: {}", config.geometry.label());
    run_pipeline(input, output, &config, cursor)
}

pub fn cmd_simulate(
    input: &Path,
    output: &Path,
    filter: CvdFilter,
    algorithm: SimulationAlgorithm,
    intensity: f32,
    space: SimulationSpace,
) -> Result<(), CliError> {
    let mut config = PipelineConfig::fullscreen(ZoneMode::Simulation(SimulationConfig {
        algorithm,
        filter,
        intensity,
    }));
    config.simulation_space = space;
    tracing::info!("simulating {filter} ({algorithm})");
    run_pipeline(input, output, &config, None)
}

pub fn cmd_correct(
    input: &Path,
    output: &Path,
    preset_path: &Path,
    blend: Option<BlendMode>,
    gradient: Option<GradientType>,
) -> Result<(), CliError> {
    let preset = load_preset(preset_path)?;
    let mut correction = preset_correction(&preset);
    if let Some(blend) = blend {
        correction.blend_mode = blend;
    }
    if let Some(gradient) = gradient {
        correction.gradient_type = gradient;
    }
    tracing::info!(
        "correcting with '{}' ({}, {})",
        preset.name,
        correction.blend_mode,
        correction.gradient_type
    );
    run_pipeline(
        input,
        output,
        &PipelineConfig::fullscreen(ZoneMode::Correction(correction)),
        None,
    )
}

pub fn cmd_preset_show(path: &Path) -> Result<(), CliError> {
    let preset = load_preset(path)?;
    let correction = preset_correction(&preset);
    println!("{}", preset.name);
    if !preset.description.is_empty() {
        println!("{}", preset.description);
    }
    println!("{}", serde_json::to_string_pretty(&correction)?);
    Ok(())
}

pub fn cmd_preset_builtin(kind: BuiltinPreset, output: Option<PathBuf>) -> Result<(), CliError> {
    let json = builtin(kind).to_json()?;
    match output {
        Some(path) => {
            write_text(&path, &json)?;
            tracing::info!("wrote {kind} preset to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
