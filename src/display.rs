use std::io::{BufRead, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

use image::RgbImage;
use image::imageops::{self, FilterType};

use crate::config::DisplayConfig;
use crate::error::Result;

/// Proportional resize to `width`, keeping the aspect ratio
pub fn fit_to_width(img: &RgbImage, width: u32) -> RgbImage {
    let (w, h) = img.dimensions();
    if w == 0 || width == 0 {
        return img.clone();
    }
    let height = ((width as u64 * h as u64) / w as u64).max(1) as u32;
    imageops::resize(img, width, height, FilterType::Triangle)
}

/// Something that can show a finished image to the user
pub trait Presenter {
    fn present(&self, img: &RgbImage, config: &DisplayConfig) -> Result<()>;
}

/// Writes the resized image to a file, then waits as configured
pub struct FilePresenter {
    pub path: PathBuf,
}

impl FilePresenter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Presenter for FilePresenter {
    fn present(&self, img: &RgbImage, config: &DisplayConfig) -> Result<()> {
        let resized = fit_to_width(img, config.width);
        resized.save(&self.path)?;
        tracing::info!(
            "Saved {}x{} image to {}",
            resized.width(),
            resized.height(),
            self.path.display()
        );

        wait(config.wait_ms)
    }
}

/// 0 waits for Enter on an interactive terminal, anything else sleeps
fn wait(wait_ms: u64) -> Result<()> {
    if wait_ms > 0 {
        std::thread::sleep(Duration::from_millis(wait_ms));
        return Ok(());
    }

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprintln!("Press Enter to continue...");
        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;
    }
    Ok(())
}
