use anyhow::Context;
use clap::Parser;
use image::ImageReader;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use veggiesort::display::{FilePresenter, Presenter};
use veggiesort::{Config, Pipeline, Report};

#[derive(Parser)]
#[command(name = "veggiesort")]
#[command(about = "Outline and classify vegetables in a photograph")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Where to write the full-resolution annotated image
    #[arg(short, long, value_name = "FILE", default_value = "annotated.png")]
    output: PathBuf,

    /// Where to write the copy resized for viewing
    #[arg(long, value_name = "FILE", default_value = "preview.png")]
    preview: PathBuf,

    /// TOML file overriding the default thresholds
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Gray level cut for foreground segmentation
    #[arg(long)]
    threshold: Option<u8>,

    /// Structuring element size for noise removal, in pixels
    #[arg(long)]
    kernel_size: Option<u32>,

    /// Outline thickness, in pixels
    #[arg(long)]
    thickness: Option<u32>,

    /// Width the preview is resized to
    #[arg(long)]
    width: Option<u32>,

    /// Milliseconds to wait after writing the preview (0 waits for Enter)
    #[arg(long, value_name = "MS")]
    wait: Option<u64>,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Write a JSON report of the detections
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(threshold) = self.threshold {
            config.segmentation.threshold = threshold;
        }
        if let Some(kernel_size) = self.kernel_size {
            config.segmentation.kernel_size = kernel_size;
        }
        if let Some(thickness) = self.thickness {
            config.annotation.thickness = thickness;
        }
        if let Some(width) = self.width {
            config.display.width = width;
        }
        if let Some(wait) = self.wait {
            config.display.wait_ms = wait;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);

    let config = args.load_config()?;

    tracing::info!("Loading image: {:?}", args.image_path);
    let img = ImageReader::open(&args.image_path)
        .with_context(|| format!("Failed to open {}", args.image_path.display()))?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;

    if img.width() == 0 || img.height() == 0 {
        anyhow::bail!("Image {} is empty", args.image_path.display());
    }

    let mut pipeline = Pipeline::new(config);
    if let Some(debug_dir) = args.debug_out.clone() {
        pipeline = pipeline.with_debug(debug_dir)?;
    }

    let output = pipeline.run(&img)?;
    let detections = &output.detections;

    println!("\n=== Vegetable Classification Results ===");
    println!("Total items classified: {}", detections.len());

    if detections.is_empty() {
        println!("No vegetables detected.");
    } else {
        for (category, count) in detections.counts() {
            println!("  {}: {}", category, count);
        }
        if args.verbose {
            println!("\nItems:");
            for (index, _, category) in detections.iter_labelled() {
                if let Some(m) = detections.measurement(index) {
                    println!(
                        "  #{} {} - area: {:.0}, ratio: {:.3}",
                        index, category, m.area, m.ratio
                    );
                }
            }
        }
    }

    if let Some(report_path) = &args.report {
        let json = Report::from_detections(detections).to_json()?;
        std::fs::write(report_path, json)
            .with_context(|| format!("Failed to write report {}", report_path.display()))?;
    }

    output.save_annotated(&args.output)?;
    FilePresenter::new(args.preview.clone()).present(&output.annotated, &pipeline.config().display)?;

    Ok(())
}
