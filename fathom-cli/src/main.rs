//! Command-line renderer: parse a view, render a frame, write a PNG.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicU32, Ordering};

use clap::{Parser, ValueEnum};
use fathom_compute::{
    FractalRenderer, GradientPalette, ImageBuffer, Mandelbrot, ProgressObserver,
};
use fathom_core::{FixedComplex, FixedDecimal};
use log::info;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PalettePreset {
    Fire,
    Ocean,
}

#[derive(Parser, Debug)]
#[command(name = "fathom", about = "Deep-zoom Mandelbrot renderer")]
struct Cli {
    /// Output image width in pixels.
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Output image height in pixels.
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Iteration cap.
    #[arg(short, long, default_value_t = 1000)]
    iterations: u32,

    /// Zoom factor, as a decimal or scientific-notation literal.
    /// Values far beyond f64 range are fine.
    #[arg(short, long, default_value = "1")]
    zoom: String,

    /// Real part of the view center.
    #[arg(long, default_value = "-0.5")]
    center_x: String,

    /// Imaginary part of the view center.
    #[arg(long, default_value = "0")]
    center_y: String,

    /// Built-in palette.
    #[arg(long, value_enum, default_value_t = PalettePreset::Fire)]
    palette: PalettePreset,

    /// JSON palette description, overriding the preset.
    #[arg(long)]
    palette_file: Option<PathBuf>,

    /// Iteration span of one gradient cycle.
    #[arg(long, default_value_t = 40)]
    frequency: u32,

    /// Output PNG path.
    #[arg(short, long, default_value = "fathom.png")]
    output: PathBuf,
}

/// Logs render progress from worker threads, at most once per percent step.
struct StderrProgress {
    last_percent: AtomicU32,
}

impl StderrProgress {
    fn new() -> Self {
        Self {
            last_percent: AtomicU32::new(0),
        }
    }
}

impl ProgressObserver for StderrProgress {
    fn rows_completed(&self, completed: u32, total: u32) {
        let percent = completed * 100 / total.max(1);
        let step = percent / 5 * 5;
        if step > self.last_percent.fetch_max(step, Ordering::Relaxed) {
            info!("rendered {percent}% ({completed}/{total} rows)");
        }
    }
}

fn load_palette(cli: &Cli) -> Result<GradientPalette, Box<dyn std::error::Error>> {
    let mut palette = match &cli.palette_file {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => match cli.palette {
            PalettePreset::Fire => GradientPalette::fire(cli.frequency, cli.iterations),
            PalettePreset::Ocean => GradientPalette::ocean(cli.frequency, cli.iterations),
        },
    };
    // Keep the interior cutoff in sync with the render's iteration cap.
    palette.max_iterations = cli.iterations;
    Ok(palette)
}

fn write_png(image: &ImageBuffer, path: &PathBuf) -> Result<(), image::ImageError> {
    let mut out = image::RgbImage::new(image.width(), image.height());
    for (x, y, px) in out.enumerate_pixels_mut() {
        let c = image.pixel(x, y);
        *px = image::Rgb([c.r, c.g, c.b]);
    }
    out.save(path)
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let zoom: FixedDecimal = cli.zoom.parse()?;
    let center = FixedComplex::parse(&cli.center_x, &cli.center_y)?;
    let palette = load_palette(cli)?;

    let renderer = FractalRenderer::new(
        Mandelbrot,
        cli.width,
        cli.height,
        cli.iterations,
        center,
        zoom,
    );
    info!(
        "zoom {} at ({}, {}), mode {:?}",
        cli.zoom,
        cli.center_x,
        cli.center_y,
        renderer.render_mode()
    );

    let progress = StderrProgress::new();
    let image = renderer.render(&palette, Some(&progress))?;
    write_png(&image, &cli.output)?;
    info!("wrote {}", cli.output.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
