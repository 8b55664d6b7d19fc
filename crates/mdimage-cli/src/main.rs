//! mdimage - Inspect mdimage pixel types and images
//!
//! Lists the pixel registry, builds images from command-line parameters and
//! evaluates them at continuous indices or physical points.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mdimage_core::{Interpolator, PixelId};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "mdimage")]
#[command(author, version, about = "Inspect mdimage pixel types and images")]
#[command(long_about = "
Command-line front end for the mdimage image value.

Examples:
  mdimage types                               # All supported pixel types
  mdimage types --dimension 5                 # Pixel types available in 5-D
  mdimage create --size 4,3 --pixel int16     # Build an image and describe it
  mdimage create --size 8,8,4 --pixel vector-float32 --spacing 0.5,0.5,2 --meta modality=CT
  mdimage probe --size 4,3 --pixel float32 --index 1.5,0.5
  mdimage probe --size 4,3 --spacing 2,2 --point 3,1 --interp nearest
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported pixel types and dimensions
    #[command(visible_alias = "t")]
    Types(TypesArgs),

    /// Create an image and print its description
    #[command(visible_alias = "c")]
    Create(CreateArgs),

    /// Fill an image with a ramp and evaluate it at a continuous position
    #[command(visible_alias = "p")]
    Probe(ProbeArgs),
}

#[derive(Args)]
struct TypesArgs {
    /// Only show pixel types available at this dimension
    #[arg(short, long)]
    dimension: Option<u32>,
}

/// Image construction parameters shared by `create` and `probe`.
#[derive(Args)]
struct ImageArgs {
    /// Size along each axis, e.g. 4,3 or 64,64,16
    #[arg(short, long, value_delimiter = ',', required = true)]
    size: Vec<u32>,

    /// Pixel type: int16, float32, vector-uint8, complex-float64, label-uint16, ...
    #[arg(short, long, default_value = "float32")]
    pixel: PixelId,

    /// Components per pixel (0 = default for the pixel type)
    #[arg(short, long, default_value = "0")]
    components: u32,

    /// Origin, one value per axis
    #[arg(long, value_delimiter = ',')]
    origin: Option<Vec<f64>>,

    /// Spacing, one value per axis
    #[arg(long, value_delimiter = ',')]
    spacing: Option<Vec<f64>>,

    /// Direction cosines, row-major, dimension squared values
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    direction: Option<Vec<f64>>,
}

#[derive(Args)]
struct CreateArgs {
    #[command(flatten)]
    image: ImageArgs,

    /// Metadata entry key=value (repeatable)
    #[arg(short, long = "meta")]
    meta: Vec<String>,

    /// Convert the created image to another pixel type before printing
    #[arg(long)]
    cast: Option<PixelId>,
}

#[derive(Args)]
struct ProbeArgs {
    #[command(flatten)]
    image: ImageArgs,

    /// Continuous index to evaluate, one value per axis
    #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true, conflicts_with = "point")]
    index: Option<Vec<f64>>,

    /// Physical point to evaluate, one value per axis
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    point: Option<Vec<f64>>,

    /// Interpolator: nearest, linear
    #[arg(long, default_value = "linear")]
    interp: Interpolator,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Types(args) => commands::types::run(args, cli.verbose),
        Commands::Create(args) => commands::create::run(args, cli.verbose),
        Commands::Probe(args) => commands::probe::run(args, cli.verbose),
    }
}
