use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use interpmap::Pipeline;
use interpmap::config::{ColourEntry, FileConfig, MapConfig, Pair};
use interpmap::geometry::Bounds;
use interpmap::input::{read_objects, read_samples, write_table};
use interpmap::interpolate::Method;

/// Interpolate scattered (x, y, z) samples onto a grid and attribute map
/// objects with the value under their representative point
///
/// Examples:
///   # Colour polygons by an IDW surface, JSON table to stdout
///   interpmap -s samples.json -g districts.json
///
///   # Smoothed surface, grey background for objects outside the data hull
///   interpmap -s samples.json -g stations.json -m smooth -b grey80 -o out.json
///
///   # Samples already on a lattice, restricted to a viewport
///   interpmap -s lattice.json -g roads.json -m none --viewport 0,10,40,50
#[derive(Parser, Debug)]
#[command(name = "interpmap")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches interpmap.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sample table JSON: {"columns": [...], "rows": [[...], ...]}
    #[arg(short = 's', long)]
    samples: PathBuf,

    /// Object collection JSON: {"kind": "polygon|polyline|point", "objects": [...]}
    #[arg(short = 'g', long)]
    objects: PathBuf,

    /// Interpolation method: idw, smooth, or anything else for raw binning
    #[arg(short = 'm', long)]
    method: Option<String>,

    /// Grid resolution per axis for idw and smooth
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..=2048))]
    grid_size: Option<u32>,

    /// IDW distance exponent
    #[arg(long)]
    power: Option<f64>,

    /// Comma-separated colour scale
    #[arg(long, value_delimiter = ',')]
    colours: Option<Vec<String>>,

    /// Background colour; enables convex hull filtering
    #[arg(short = 'b', long)]
    background: Option<String>,

    /// Line or marker size: one value, or foreground,background
    #[arg(long, value_delimiter = ',', num_args = 1..=2)]
    size: Option<Vec<f64>>,

    /// Marker shape or line type: one value, or foreground,background
    #[arg(long, value_delimiter = ',', num_args = 1..=2, allow_hyphen_values = true)]
    shape: Option<Vec<f64>>,

    /// Visible extent min_x,max_x,min_y,max_y (defaults to the objects' extent)
    #[arg(long, allow_hyphen_values = true)]
    viewport: Option<Bounds>,

    /// Output JSON path (defaults to stdout)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = match args.config {
        Some(ref config_path) => {
            if !config_path.exists() {
                bail!("Config file not found: {:?}", config_path);
            }
            Some(FileConfig::from_path(config_path)?)
        }
        None => FileConfig::load(),
    };

    let verbose = args.verbose || file_config.as_ref().map(|c| c.verbose).unwrap_or(false);
    init_logging(verbose);

    let config = merge_config(&args, file_config.as_ref().map(MapConfig::from_file))?;
    let to_stdout = args.output.is_none();

    if !to_stdout {
        println!("interpmap - Scattered Field Attribution");
        println!("=======================================");
        println!();
    }

    if verbose {
        eprintln!("Configuration:");
        eprintln!("  Method: {}", config.method);
        eprintln!("  Grid size: {}", config.grid_size);
        eprintln!("  IDW power: {}", config.idw_power);
        eprintln!("  Colour scale entries: {}", config.colour_scale.len());
        eprintln!(
            "  Hull filtering: {}",
            match &config.background_colour {
                Some(bg) => format!("enabled (background {})", bg),
                None => "disabled".to_string(),
            }
        );
        eprintln!();
    }

    let pipeline = Pipeline::new(config).context("Invalid configuration")?;

    let spinner = create_spinner("Reading samples and objects...");
    let start = Instant::now();
    let samples = read_samples(&args.samples)?;
    let objects = read_objects(&args.objects)?;
    if objects.is_empty() {
        bail!("No objects found in {}", args.objects.display());
    }
    spinner.finish_with_message(format!(
        "Read {} sample rows and {} {:?} objects [{:.1}s]",
        samples.rows.len(),
        objects.len(),
        objects.kind(),
        start.elapsed().as_secs_f32()
    ));

    let viewport = match args.viewport {
        Some(bounds) => bounds,
        None => Bounds::from_points(&objects.all_vertices())
            .context("Failed to compute viewport from object vertices")?,
    };

    let spinner = create_spinner("Interpolating and attributing objects...");
    let start = Instant::now();
    let table = pipeline
        .run(&samples, &objects, &viewport)
        .context("Failed to attribute objects")?;
    spinner.finish_with_message(format!(
        "Attributed {} of {} objects into {} records [{:.1}s]",
        table.object_count(),
        objects.len(),
        table.records.len(),
        start.elapsed().as_secs_f32()
    ));

    for warning in &table.warnings {
        eprintln!("Warning: {}", warning);
    }

    write_table(args.output.as_deref(), &table)?;

    if let Some(ref output) = args.output {
        println!();
        println!(
            "Done! Total time: {:.1}s",
            total_start.elapsed().as_secs_f32()
        );
        println!("Output: {}", output.display());
    }

    Ok(())
}

/// CLI flags override file values, which override defaults
fn merge_config(args: &Args, file: Option<MapConfig>) -> Result<MapConfig> {
    let mut config = file.unwrap_or_default();

    if let Some(ref method) = args.method {
        let method: Method = method.parse()?;
        config.method = method;
    }
    if let Some(grid_size) = args.grid_size {
        config.grid_size = grid_size as usize;
    }
    if let Some(power) = args.power {
        config.idw_power = power;
    }
    if let Some(ref colours) = args.colours {
        config.colour_scale = colours.iter().cloned().map(ColourEntry::Text).collect();
    }
    if let Some(ref background) = args.background {
        config.background_colour = Some(background.clone());
    }
    if let Some(ref size) = args.size {
        config.size = to_pair(size)?;
    }
    if let Some(ref shape) = args.shape {
        config.shape = to_pair(shape)?;
    }

    Ok(config)
}

fn to_pair(values: &[f64]) -> Result<Pair> {
    match values {
        &[v] => Ok(Pair::Single(v)),
        &[fg, bg] => Ok(Pair::Both(fg, bg)),
        _ => bail!("expected one value or a foreground,background pair"),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "interpmap=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
