/*!
chromaline Command Line Interface

Builds mosaic timelines from a resolved image pool, and exposes the color
helpers (gradients, distances) used to build them.

## Usage

```bash
chromaline run timeline.json --format text
chromaline interpolate --pool pool.json --anchor 0=./images/a.jpg --anchor 10=./images/b.jpg
chromaline gradient black white 5 --space lch
chromaline distance '#ff0000' '#00ff00'
chromaline scan ./images --output images.json
chromaline pool images.json --colors colors.json --output pool.json
```

Logging goes to stderr and is controlled with `RUST_LOG`
(default `chromaline=info`).
*/

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chromaline::config::{resolve_anchors, AnchorSpec, TimelineConfig};
use chromaline::layout::{GridLayout, DEFAULT_CELL_SIZE};
use chromaline::pool::{
    load_manifest, load_pool, manifest_to_json, pool_to_json, resolve_pool, scan_directory,
    DEFAULT_IMAGE_PREFIX,
};
use chromaline::writer::{JsonWriter, OutputFormat, TextWriter, Writer};
use chromaline::{
    distance, Assignment, Color, ExhaustionPolicy, GradientSpace, Interpolator, VERSION,
};

#[derive(Parser)]
#[command(name = "chromaline")]
#[command(about = "Fill a timeline of images along a perceptual color gradient")]
#[command(version = VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interpolate the timeline described by a timeline file
    Run {
        /// Path to the timeline JSON file
        timeline: PathBuf,

        /// Output format (json, text)
        #[arg(long, default_value = "json")]
        format: OutputFormat,

        /// Output file path (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Interpolate a timeline given on the command line
    Interpolate {
        /// Resolved pool file: JSON array of {"path", "color"} objects
        #[arg(long)]
        pool: PathBuf,

        /// Pinned image as POSITION=PATH (repeat for each anchor)
        #[arg(long = "anchor", required = true)]
        anchors: Vec<AnchorSpec>,

        /// Image that must not be used as a fill (repeatable)
        #[arg(long = "exclude")]
        exclude: Vec<String>,

        /// Gradient color space (lab, lch, oklab)
        #[arg(long, default_value = "lch")]
        space: GradientSpace,

        /// Fail instead of leaving positions empty when the pool runs out
        #[arg(long)]
        abort_on_exhausted: bool,

        /// Grid width used for placement in JSON output
        #[arg(long, default_value = "3")]
        columns: usize,

        /// Output format (json, text)
        #[arg(long, default_value = "json")]
        format: OutputFormat,

        /// Output file path (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print the gradient between two colors, one hex color per line
    Gradient {
        /// Start color (any CSS color)
        start: String,

        /// End color (any CSS color)
        end: String,

        /// Number of colors, including both ends
        count: usize,

        /// Gradient color space (lab, lch, oklab)
        #[arg(long, default_value = "lch")]
        space: GradientSpace,
    },

    /// Print the perceptual distance (ΔE 1976) between two colors
    Distance {
        /// First color (any CSS color)
        a: String,

        /// Second color (any CSS color)
        b: String,
    },

    /// Write the manifest of image files (.jpeg, .jpg, .png) in a directory
    Scan {
        /// Directory holding the images
        dir: PathBuf,

        /// Output file path (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Build a pool file from an image manifest and a map of sampled colors
    Pool {
        /// Manifest: JSON array of image file names
        manifest: PathBuf,

        /// JSON object mapping image path to its average hex color
        #[arg(long)]
        colors: PathBuf,

        /// Prefix joined onto each manifest file name
        #[arg(long, default_value = DEFAULT_IMAGE_PREFIX)]
        prefix: String,

        /// Output file path (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chromaline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            timeline,
            format,
            output,
        } => {
            info!("Running timeline file: {}", timeline.display());
            let config = TimelineConfig::from_file(&timeline)
                .with_context(|| format!("Failed to read timeline {}", timeline.display()))?;

            let pool = config.load_pool()?;
            let anchors = config.anchors(&pool)?;
            let assignment = config.interpolator().interpolate(&anchors, &pool)?;

            let rendered = render(&assignment, format, config.layout()?)?;
            emit(output.as_deref(), &rendered)?;
        }

        Commands::Interpolate {
            pool,
            anchors,
            exclude,
            space,
            abort_on_exhausted,
            columns,
            format,
            output,
        } => {
            let pool = load_pool(&pool)
                .with_context(|| format!("Failed to load pool {}", pool.display()))?;
            let anchors = resolve_anchors(&anchors, &pool)?;

            let policy = if abort_on_exhausted {
                ExhaustionPolicy::Abort
            } else {
                ExhaustionPolicy::Partial
            };
            let assignment = Interpolator::new()
                .with_space(space)
                .with_policy(policy)
                .with_exclusions(exclude)
                .interpolate(&anchors, &pool)?;

            let layout = GridLayout::new(columns, DEFAULT_CELL_SIZE)?;
            let rendered = render(&assignment, format, layout)?;
            emit(output.as_deref(), &rendered)?;
        }

        Commands::Gradient {
            start,
            end,
            count,
            space,
        } => {
            let start = Color::parse_css(&start)?;
            let end = Color::parse_css(&end)?;
            for color in space.steps(start, end, count)? {
                println!("{}", color);
            }
        }

        Commands::Distance { a, b } => {
            let a = Color::parse_css(&a)?;
            let b = Color::parse_css(&b)?;
            println!("{:.4}", distance(a, b));
        }

        Commands::Scan { dir, output } => {
            let names = scan_directory(&dir)
                .with_context(|| format!("Failed to scan {}", dir.display()))?;
            emit(output.as_deref(), &manifest_to_json(&names)?)?;
        }

        Commands::Pool {
            manifest,
            colors,
            prefix,
            output,
        } => {
            let paths = load_manifest(&manifest, &prefix)
                .with_context(|| format!("Failed to read manifest {}", manifest.display()))?;
            let content = std::fs::read_to_string(&colors)
                .with_context(|| format!("Failed to read colors {}", colors.display()))?;
            let colors: HashMap<String, Color> = serde_json::from_str(&content)?;

            let pool = resolve_pool(&paths, &colors);
            emit(output.as_deref(), &pool_to_json(&pool)?)?;
        }
    }

    Ok(())
}

fn render(
    assignment: &Assignment,
    format: OutputFormat,
    layout: GridLayout,
) -> anyhow::Result<String> {
    let unfilled = assignment.unfilled_positions();
    if !unfilled.is_empty() {
        warn!(
            "Pool ran out: {} position(s) left empty ({:?})",
            unfilled.len(),
            unfilled
        );
    }

    let rendered = match format {
        OutputFormat::Json => JsonWriter::new().with_layout(layout).write(assignment)?,
        OutputFormat::Text => TextWriter::new().write(assignment)?,
    };
    Ok(rendered)
}

fn emit(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output file {}", path.display()))?;
            info!("Output written to: {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
