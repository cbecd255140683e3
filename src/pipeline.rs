use std::path::{Path, PathBuf};
use std::time::Instant;

use image::{DynamicImage, GrayImage, RgbImage};
use tracing::{debug, info};

use crate::config::Config;
use crate::detection::{annotate_detections, classify, preprocessing};
use crate::error::{Error, Result};
use crate::models::Detections;

/// Everything one pipeline run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Cleaned binary foreground mask
    pub mask: GrayImage,
    /// Traced contours and the categories assigned to them
    pub detections: Detections,
    /// Copy of the input with coloured outlines drawn on it
    pub annotated: RgbImage,
}

impl PipelineOutput {
    /// Write the annotated image at the input's full resolution
    pub fn save_annotated(&self, path: &Path) -> Result<()> {
        self.annotated.save(path)?;
        info!("Saved annotated image to {}", path.display());
        Ok(())
    }
}

/// Segment → classify → annotate, with optional dumping of intermediates.
///
/// Runs share no state, so one pipeline can process any number of images,
/// from any number of threads.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
    debug_dir: Option<PathBuf>,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            debug_dir: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(Error::DebugDirNotEmpty(output_dir));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.debug_dir = Some(output_dir);
        Ok(self)
    }

    /// Run the pipeline on a decoded image of any colour type
    pub fn run(&self, input: &DynamicImage) -> Result<PipelineOutput> {
        self.run_rgb(&input.to_rgb8())
    }

    pub fn run_rgb(&self, input: &RgbImage) -> Result<PipelineOutput> {
        info!("Processing {}x{} image", input.width(), input.height());
        self.save_debug("00_input", |p| input.save(p))?;

        let started = Instant::now();
        let seg = preprocessing::segment_stages(input, &self.config.segmentation);
        debug!("segmentation took {:?}", started.elapsed());

        self.save_debug("01_gray", |p| seg.gray.save(p))?;
        self.save_debug("02_threshold", |p| seg.thresholded.save(p))?;
        self.save_debug("03_opened", |p| seg.opened.save(p))?;
        self.save_debug("04_mask", |p| seg.mask.save(p))?;

        let started = Instant::now();
        let detections = classify(&seg.mask, input, &self.config.classification);
        debug!("classification took {:?}", started.elapsed());
        info!(
            "Classified {} of {} contours",
            detections.len(),
            detections.contours().len()
        );

        let mut annotated = input.clone();
        annotate_detections(&mut annotated, &detections, &self.config.annotation)?;
        self.save_debug("05_annotated", |p| annotated.save(p))?;

        Ok(PipelineOutput {
            mask: seg.mask,
            detections,
            annotated,
        })
    }

    fn save_debug<F>(&self, name: &str, save: F) -> Result<()>
    where
        F: FnOnce(&Path) -> image::ImageResult<()>,
    {
        if let Some(dir) = &self.debug_dir {
            let filename = format!("{}.png", name);
            save(&dir.join(&filename))?;
            debug!("saved debug image {}", filename);
        }
        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
