//! Command-line interface for the track import pipeline.

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::{Axis, ImportConfig};
use crate::core::loaders::{self, extract_channels, load_track_rows};
use crate::processors::importer::{run_import, FileSink, ImportVariant};
use crate::visualization;

#[derive(Parser)]
#[command(name = "ghtrack-pipeline")]
#[command(about = "Grasshopper point-track CSV import pipeline", version)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Post-rotation axis, as a CLI argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum AxisArg {
    X,
    Y,
    Z,
}

impl From<AxisArg> for Axis {
    fn from(axis: AxisArg) -> Self {
        match axis {
            AxisArg::X => Axis::X,
            AxisArg::Y => Axis::Y,
            AxisArg::Z => Axis::Z,
        }
    }
}

/// Shared per-import parameter overrides.
#[derive(Debug, clap::Args)]
struct ImportArgs {
    /// Input track recording CSV
    input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Name of the emitted object
    #[arg(long)]
    name: Option<String>,

    /// Scale factor applied to all coordinates
    #[arg(long)]
    scale: Option<f64>,

    /// Smoothing batch size (<= 1 disables smoothing)
    #[arg(long)]
    smooth: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import as keyframed animation on a proxy object
    Animate {
        #[command(flatten)]
        import: ImportArgs,

        /// Time/speed scale for frame numbers
        #[arg(long)]
        time_rate: Option<f64>,

        /// Axis for the post-rotation offset
        #[arg(long, value_enum)]
        post_rotate_axis: Option<AxisArg>,

        /// Post-rotation angle in degrees
        #[arg(long)]
        post_rotate_angle: Option<f64>,

        /// Disable the post-rotation offset
        #[arg(long)]
        no_post_rotate: bool,
    },

    /// Import as a static attributed point cloud
    Cloud {
        #[command(flatten)]
        import: ImportArgs,
    },

    /// Print a summary of a track recording without importing it
    Inspect {
        /// Input track recording CSV
        input: PathBuf,
    },

    /// Render the track's XY trajectory to a PNG
    Visualize {
        /// Input track recording CSV
        input: PathBuf,

        /// Output PNG file path (defaults to the input name with .png extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum number of samples to draw (subsamples if exceeded)
        #[arg(long, default_value_t = 100_000)]
        max_points: usize,
    },
}

/// Create a spinner for indeterminate operations
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Fit a value into the summary box column, counting chars rather than
/// bytes so non-ASCII paths don't split a codepoint.
fn fit_summary_value(value: &str) -> String {
    if value.chars().count() > 39 {
        let truncated: String = value.chars().take(36).collect();
        format!("{}...", truncated)
    } else {
        value.to_string()
    }
}

/// Print a summary box
fn print_summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║ {:<62} ║", title);
    println!("╠══════════════════════════════════════════════════════════════╣");
    for (key, value) in items {
        println!("║ {:<20}: {:<39} ║", key, fit_summary_value(value));
    }
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

/// Apply the shared CLI overrides onto the loaded config.
fn apply_import_args(config: &mut ImportConfig, args: &ImportArgs) {
    if let Some(name) = &args.name {
        config.output_name = name.clone();
    }
    if let Some(scale) = args.scale {
        config.scale = scale;
    }
    if let Some(smooth) = args.smooth {
        config.smoothing.batch_size = smooth;
    }
}

pub fn run() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity (must come first)
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .format_timestamp_secs()
        .init();

    // Load config
    let config = match &cli.config {
        Some(path) => match ImportConfig::from_yaml(path) {
            Ok(cfg) => {
                info!("Loaded config from: {}", path.display());
                cfg
            }
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}, using defaults",
                    path.display(),
                    e
                );
                ImportConfig::default()
            }
        },
        None => ImportConfig::default(),
    };

    // Dispatch to subcommands
    match cli.command {
        Commands::Animate {
            import,
            time_rate,
            post_rotate_axis,
            post_rotate_angle,
            no_post_rotate,
        } => {
            let mut config = config;
            apply_import_args(&mut config, &import);
            if let Some(rate) = time_rate {
                config.animation.time_rate = rate;
            }
            if let Some(axis) = post_rotate_axis {
                config.post_rotate.axis = axis.into();
            }
            if let Some(angle) = post_rotate_angle {
                config.post_rotate.angle_deg = angle;
            }
            if no_post_rotate {
                config.post_rotate.enabled = false;
            }
            cmd_import(&import, ImportVariant::Animation, &config);
        }
        Commands::Cloud { import } => {
            let mut config = config;
            apply_import_args(&mut config, &import);
            cmd_import(&import, ImportVariant::PointCloud, &config);
        }
        Commands::Inspect { input } => {
            cmd_inspect(&input);
        }
        Commands::Visualize {
            input,
            output,
            max_points,
        } => {
            cmd_visualize(&input, output, max_points, &config);
        }
    }
}

fn cmd_import(args: &ImportArgs, variant: ImportVariant, config: &ImportConfig) {
    let start = Instant::now();

    println!("Importing track recording...");
    println!("Input: {}", args.input.display());
    println!("Output directory: {}", args.output_dir.display());
    println!("Variant: {}", variant);

    let spinner = create_spinner("Running import pipeline...");

    let mut sink = FileSink::new(&args.output_dir);

    match run_import(&args.input, variant, config, &mut sink) {
        Ok(summary) => {
            spinner.finish_and_clear();

            print_summary(
                "Import Complete",
                &[
                    ("Input file", args.input.display().to_string()),
                    ("Variant", summary.variant.to_string()),
                    ("Object name", summary.name.clone()),
                    ("Rows read", summary.rows_read.to_string()),
                    ("Samples emitted", summary.samples_emitted.to_string()),
                    (
                        "Smoothing batch",
                        if summary.smoothing_batch > 1 {
                            summary.smoothing_batch.to_string()
                        } else {
                            "disabled".to_string()
                        },
                    ),
                    ("Output directory", args.output_dir.display().to_string()),
                    ("Duration", format!("{:.2?}", start.elapsed())),
                ],
            );
        }
        Err(e) => {
            spinner.finish_and_clear();
            error!("Import failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_inspect(input: &PathBuf) {
    let start = Instant::now();

    let spinner = create_spinner("Reading track recording...");

    let rows = match load_track_rows(input) {
        Ok(rows) => rows,
        Err(e) => {
            spinner.finish_and_clear();
            error!("Failed to read recording: {}", e);
            std::process::exit(1);
        }
    };

    // Unscaled channels for raw coordinate bounds
    let channels = match extract_channels(&rows, 1.0) {
        Ok(channels) => channels,
        Err(e) => {
            spinner.finish_and_clear();
            error!("Failed to parse recording: {}", e);
            std::process::exit(1);
        }
    };

    spinner.finish_and_clear();

    let timestamps: Vec<f64> = rows
        .iter()
        .filter_map(|row| row.get(0).and_then(|s| s.trim().parse().ok()))
        .collect();
    let time_span = match (timestamps.first(), timestamps.last()) {
        (Some(first), Some(last)) => format!("{:.3} .. {:.3}", first, last),
        _ => "unknown".to_string(),
    };

    let states: BTreeSet<String> = rows
        .iter()
        .filter_map(|row| row.get(loaders::MIN_COLUMNS).map(|s| s.to_string()))
        .collect();

    let (mut min, mut max) = (channels.origin[0], channels.origin[0]);
    for p in &channels.origin {
        min = min.inf(p);
        max = max.sup(p);
    }

    print_summary(
        "Recording Summary",
        &[
            ("Input file", input.display().to_string()),
            ("Rows", rows.len().to_string()),
            ("Timestamp span", time_span),
            (
                "States",
                states.iter().cloned().collect::<Vec<_>>().join(", "),
            ),
            ("Min origin", format!("{:.3} {:.3} {:.3}", min.x, min.y, min.z)),
            ("Max origin", format!("{:.3} {:.3} {:.3}", max.x, max.y, max.z)),
            ("Duration", format!("{:.2?}", start.elapsed())),
        ],
    );
}

fn cmd_visualize(
    input: &PathBuf,
    output: Option<PathBuf>,
    max_points: usize,
    config: &ImportConfig,
) {
    let start = Instant::now();

    // Default output: same name as input with .png extension
    let output_path = output.unwrap_or_else(|| {
        let mut path = input.clone();
        path.set_extension("png");
        path
    });

    println!("Visualizing track...");
    println!("Input: {}", input.display());
    println!("Output: {}", output_path.display());

    let spinner = create_spinner("Loading track recording...");

    let positions = load_track_rows(input)
        .map_err(anyhow::Error::from)
        .and_then(|rows| Ok(extract_channels(&rows, config.scale)?));

    let channels = match positions {
        Ok(channels) => channels,
        Err(e) => {
            spinner.finish_and_clear();
            error!("Failed to load recording: {:#}", e);
            std::process::exit(1);
        }
    };

    spinner.set_message("Generating plot...");

    match visualization::plot_track_path(&output_path, &channels.origin, max_points) {
        Ok(()) => {
            spinner.finish_and_clear();

            print_summary(
                "Visualization Complete",
                &[
                    ("Input file", input.display().to_string()),
                    ("Output PNG", output_path.display().to_string()),
                    ("Samples", channels.len().to_string()),
                    ("Max points plotted", max_points.to_string()),
                    ("Duration", format!("{:.2?}", start.elapsed())),
                ],
            );
        }
        Err(e) => {
            spinner.finish_and_clear();
            error!("Visualization failed: {}", e);
            std::process::exit(1);
        }
    }
}
