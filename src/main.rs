// Import the clap Parser derive macro for CLI argument parsing
use clap::Parser;

// Import our library types
use triangle_weave::scheduler::Tick;
use triangle_weave::{DrawingContext, Options, Pacing, RasterSurface, Session, SurfaceRegistry};

// Import indicatif for progress bars
use indicatif::{ProgressBar, ProgressStyle};

use std::fs;
use std::path::PathBuf;

/// Selector the CLI registers its raster surface under
const CANVAS_SELECTOR: &str = "#canvas";

/// Triangle Weave - draw jittered triangle grids filled with spiralling lines
///
/// The surface is split into a jittered grid, every cell into two triangles,
/// and every triangle is filled with a chain of lines that winds inward.
/// All triangles are drawn at the same time, one line per tick each.
///
/// Any option given on the command line overrides the same key from
/// `--config`, which in turn overrides the built-in defaults.
#[derive(Parser)]
#[command(name = "triangle-weave")]
#[command(about = "Generate triangulated line art", long_about = None)]
#[command(version)]
struct Args {
    /// JSON options file (camelCase keys, unknown keys ignored)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Surface to draw on
    ///
    /// The CLI provides a single surface named "#canvas"; anything else
    /// fails with a missing-surface error.
    #[arg(long)]
    selector: Option<String>,

    /// Surface width in pixels (default 1000)
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Surface height in pixels (default 600)
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Interior points sit 1/ratio along each generating side (default 10)
    #[arg(short = 'r', long)]
    side_ratio: Option<u32>,

    /// Points per triangle, corners included (default 90)
    ///
    /// Higher = denser spirals
    #[arg(short = 'd', long)]
    fill_density: Option<usize>,

    /// Milliseconds between two lines of one triangle (default 20)
    #[arg(short = 's', long)]
    fill_speed: Option<u64>,

    /// Jitter radius for grid corners; 0 derives it from the grid step
    #[arg(long)]
    corner_range: Option<u32>,

    /// Stroke every triangle in its own random colour
    ///
    /// `--use-color` alone means true; `--use-color=false` turns off a
    /// `true` from the config file.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    use_color: Option<bool>,

    /// Target spacing between divider points in pixels (default 100)
    #[arg(short = 'w', long)]
    divider_point_weight: Option<u32>,

    /// Randomly permute the corners of each triangle
    ///
    /// Takes an optional value like `--use-color`.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    shuffle_corners: Option<bool>,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the finished drawing
    #[arg(short, long, default_value = "triangle-weave.png")]
    output: PathBuf,

    /// Directory for intermediate animation frames
    ///
    /// Nothing is written when omitted.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Save a frame every N drawn lines (with --frames-dir)
    #[arg(long, default_value_t = 50)]
    save_interval: usize,

    /// Wait for real time between ticks instead of drawing as fast as possible
    #[arg(long)]
    realtime: bool,

    /// Number of threads used to compute subdivision points
    ///
    /// By default, uses all available CPU cores.
    #[arg(short = 't', long)]
    threads: Option<usize>,
}

impl Args {
    /// Command line overrides as an options object
    fn options(&self) -> Options {
        Options {
            selector: Some(
                self.selector
                    .clone()
                    .unwrap_or_else(|| CANVAS_SELECTOR.to_string()),
            ),
            width: self.width,
            height: self.height,
            side_ratio: self.side_ratio,
            fill_density: self.fill_density,
            fill_speed: self.fill_speed,
            corner_range: self.corner_range,
            use_color: self.use_color,
            divider_point_weight: self.divider_point_weight,
            shuffle_corners: self.shuffle_corners,
            seed: self.seed,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(num_threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
    }

    // Defaults < config file < command line
    let file_options = match &args.config {
        Some(path) => {
            log::info!("reading options from {}", path.display());
            Options::from_json_file(path)?
        }
        None => Options::default(),
    };
    let options = file_options.merge(args.options());

    // Validation happens here, before any surface exists
    let mut session = Session::new(&options)?;
    let config = session.config().clone();
    let layout = *session.layout();

    println!("Weaving {}x{} px", config.width, config.height);
    println!("  Grid: {} x {} cells", layout.div_count_x, layout.div_count_y);
    println!("  Corner range: {} px", layout.jitter_radius);
    println!("  Points per triangle: {}", config.fill_density);
    println!("  Side ratio: 1:{}", config.side_ratio - 1);

    if let Some(dir) = &args.frames_dir {
        fs::create_dir_all(dir)?;
    }

    let mut registry = SurfaceRegistry::new();
    registry.insert(CANVAS_SELECTOR, RasterSurface::new(config.width, config.height));

    let total_lines = (layout.cell_count() * 2 * config.fill_density) as u64;
    let pb = ProgressBar::new(total_lines);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} lines | {msg}")?
            .progress_chars("=>-"),
    );

    let pacing = if args.realtime {
        Pacing::RealTime
    } else {
        Pacing::Virtual
    };

    let mut drawn = 0usize;
    let mut frame = 0usize;
    let mut frame_error = None;
    let observer = |tick: &Tick, ctx: &dyn DrawingContext| {
        drawn += 1;
        pb.inc(1);
        pb.set_message(format!("t = {} ms", tick.now_ms));

        let Some(dir) = &args.frames_dir else {
            return;
        };
        if frame_error.is_some() || drawn % args.save_interval.max(1) != 0 {
            return;
        }
        if let Some(image) = ctx.snapshot() {
            let path = dir.join(format!("frame_{:05}.png", frame));
            frame += 1;
            if let Err(e) = image.save(&path) {
                frame_error = Some(e);
            }
        }
    };

    let generation = session.run(&mut registry, pacing, observer)?;
    pb.finish_with_message("done");

    if let Some(e) = frame_error {
        return Err(e.into());
    }

    let surface = registry
        .get(CANVAS_SELECTOR)
        .ok_or("canvas surface disappeared")?;
    surface.save_png(&args.output)?;

    let report = &generation.report;
    println!("\nResults:");
    println!("  Triangles: {}", generation.stats.triangles);
    println!("  Lines drawn: {}", report.segments_drawn);
    println!("  Animation length: {} ms", report.elapsed_ms);
    if !report.failures.is_empty() {
        println!("  Triangles stopped early: {}", report.failures.len());
    }
    if args.frames_dir.is_some() {
        println!("  Frames saved: {}", frame);
    }
    println!("\nWrote {}", args.output.display());

    Ok(())
}
