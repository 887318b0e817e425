//! `iris`: run captured frames through the CVD simulation and correction
//! pipeline offline.

mod commands;
mod error;
mod image_loader;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use iris_core::preset::BuiltinPreset;
use iris_core::{BlendMode, CvdFilter, GradientType, Point, SimulationAlgorithm, SimulationSpace};

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "iris")]
#[command(version, about = "Color-vision-deficiency simulation and correction", long_about = None)]
struct Cli {
    /// Log pipeline details (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of render threads
    #[arg(short = 'j', long, value_name = "N", global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a frame through a full pipeline configuration
    Render {
        /// Input image
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output image
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Pipeline configuration (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Cursor position in pixels; defaults to the frame center
        #[arg(long, value_name = "X,Y", value_parser = commands::parse_point)]
        cursor: Option<Point>,
    },

    /// Simulate a color vision deficiency over the whole frame
    Simulate {
        /// Input image
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output image
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Deficiency type, e.g. deuteranopia or tritanomaly
        #[arg(short, long, value_name = "NAME")]
        filter: CvdFilter,

        /// Simulation model: machado or strict
        #[arg(long, value_name = "NAME", default_value = "machado")]
        algorithm: SimulationAlgorithm,

        /// Blend between original (0) and simulated (1)
        #[arg(long, value_name = "FLOAT", default_value = "1.0")]
        intensity: f32,

        /// Value space for simulation: linear or display
        #[arg(long, value_name = "SPACE", default_value = "linear", value_parser = commands::parse_space)]
        space: SimulationSpace,
    },

    /// Correct a frame with a preset
    Correct {
        /// Input image
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output image
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Correction preset (JSON)
        #[arg(short, long, value_name = "FILE")]
        preset: PathBuf,

        /// Override the blend mode
        #[arg(long, value_name = "MODE")]
        blend: Option<BlendMode>,

        /// Override the gradient interpolation
        #[arg(long, value_name = "TYPE")]
        gradient: Option<GradientType>,
    },

    /// Inspect or export correction presets
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },
}

#[derive(Subcommand)]
enum PresetAction {
    /// Parse a preset and print the correction it compiles to
    Show {
        /// Preset file
        file: PathBuf,
    },

    /// Export a built-in preset as JSON
    Builtin {
        /// protan, deutan or tritan
        kind: BuiltinPreset,

        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    commands::configure_threads(cli.threads)?;
    match cli.command {
        Commands::Render {
            input,
            output,
            config,
            cursor,
        } => commands::cmd_render(&input, &output, &config, cursor),
        Commands::Simulate {
            input,
            output,
            filter,
            algorithm,
            intensity,
            space,
        } => commands::cmd_simulate(&input, &output, filter, algorithm, intensity, space),
        Commands::Correct {
            input,
            output,
            preset,
            blend,
            gradient,
        } => commands::cmd_correct(&input, &output, &preset, blend, gradient),
        Commands::Preset { action } => match action {
            PresetAction::Show { file } => commands::cmd_preset_show(&file),
            PresetAction::Builtin { kind, output } => commands::cmd_preset_builtin(kind, output),
        },
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_simulate_arguments_parse() {
        let cli = Cli::try_parse_from([
            "iris",
            "simulate",
            "in.png",
            "-o",
            "out.png",
            "--filter",
            "protanomaly",
            "--algorithm",
            "strict",
            "-v",
        ])
        .expect("valid arguments");
        assert!(cli.verbose);
        match cli.command {
            Commands::Simulate {
                filter,
                algorithm,
                intensity,
                space,
                ..
            } => {
                assert_eq!(filter, CvdFilter::Protanomaly);
                assert_eq!(algorithm, SimulationAlgorithm::Strict);
                assert_eq!(intensity, 1.0);
                assert_eq!(space, SimulationSpace::Linear);
            }
            _ => panic!("expected simulate"),
        }
    }

    #[test]
    fn test_render_cursor_parses() {
        let cli = Cli::try_parse_from([
            "iris", "render", "in.png", "-o", "out.png", "-c", "cfg.json", "--cursor", "10,20",
            "-j", "2",
        ])
        .expect("valid arguments");
        assert_eq!(cli.threads, Some(2));
        match cli.command {
            Commands::Render { cursor, .. } => assert_eq!(cursor, Some(Point::new(10.0, 20.0))),
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_correct_overrides_parse() {
        let cli = Cli::try_parse_from([
            "iris",
            "correct",
            "in.png",
            "-o",
            "out.png",
            "-p",
            "deutan.json",
            "--blend",
            "channel-weighted",
            "--gradient",
            "lab",
        ])
        .expect("valid arguments");
        match cli.command {
            Commands::Correct {
                blend, gradient, ..
            } => {
                assert_eq!(blend, Some(BlendMode::ChannelWeighted));
                assert_eq!(gradient, Some(GradientType::PerceptualLab));
            }
            _ => panic!("expected correct"),
        }
    }

    #[test]
    fn test_unknown_filter_is_rejected() {
        let result = Cli::try_parse_from([
            "iris", "simulate", "in.png", "-o", "out.png", "--filter", "redblind",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_builtin_preset_kind_parses() {
        let cli = Cli::try_parse_from(["iris", "preset", "builtin", "tritan"]).expect("valid");
        match cli.command {
            Commands::Preset {
                action: PresetAction::Builtin { kind, output },
            } => {
                assert_eq!(kind, BuiltinPreset::Tritan);
                assert!(output.is_none());
            }
            _ => panic!("expected preset builtin"),
        }
    }
}
