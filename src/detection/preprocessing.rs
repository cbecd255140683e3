use image::{GrayImage, Luma, RgbImage};
use imageproc::contrast::{ThresholdType, threshold};
use imageproc::distance_transform::Norm;
use imageproc::map::map_colors;
use imageproc::morphology::{close, open};

use crate::config::SegmentationConfig;

/// Intermediate images produced while segmenting, kept for debug output
pub struct Segmentation {
    pub gray: GrayImage,
    pub thresholded: GrayImage,
    pub opened: GrayImage,
    pub mask: GrayImage,
}

// BT.601 luma weights in 14-bit fixed point; they sum to 1 << 14
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Convert image to grayscale with BT.601 weights (0.299 R + 0.587 G + 0.114 B),
/// rounded to nearest
pub fn to_grayscale(img: &RgbImage) -> GrayImage {
    map_colors(img, |p| {
        let [r, g, b] = p.0;
        let y = LUMA_R * r as u32 + LUMA_G * g as u32 + LUMA_B * b as u32;
        Luma([((y + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8])
    })
}

/// Global binary threshold: samples above `cut` become 255, the rest 0.
/// Any nonzero value marks foreground downstream, so the high value is
/// imageproc's 255 rather than a custom level such as 250.
pub fn binarize(gray: &GrayImage, cut: u8) -> GrayImage {
    threshold(gray, cut, ThresholdType::Binary)
}

/// Radius of the Euclidean disc standing in for a `kernel_size` wide ellipse.
/// The disc is `2 * radius + 1` samples across, so an even size N becomes an
/// N + 1 disc; sizes 0 and 1 give radius 0.
pub fn kernel_radius(kernel_size: u32) -> u8 {
    (kernel_size / 2).min(u8::MAX as u32) as u8
}

/// Opening removes blobs smaller than the disc, closing then fills holes
/// and gaps narrower than it. A radius 0 element leaves the mask as is.
pub fn clean_mask(binary: &GrayImage, kernel_size: u32) -> (GrayImage, GrayImage) {
    let radius = kernel_radius(kernel_size);
    if radius == 0 {
        return (binary.clone(), binary.clone());
    }
    let opened = open(binary, Norm::L2, radius);
    let closed = close(&opened, Norm::L2, radius);
    (opened, closed)
}

/// Run every segmentation stage and keep the intermediates
pub fn segment_stages(img: &RgbImage, config: &SegmentationConfig) -> Segmentation {
    let gray = to_grayscale(img);
    let thresholded = binarize(&gray, config.threshold);
    let (opened, mask) = clean_mask(&thresholded, config.kernel_size);

    tracing::debug!(
        threshold = config.threshold,
        kernel_size = config.kernel_size,
        foreground = foreground_count(&mask),
        "segmented {}x{} image",
        img.width(),
        img.height()
    );

    Segmentation {
        gray,
        thresholded,
        opened,
        mask,
    }
}

/// Binary foreground/background mask, same size as the input
pub fn segment(img: &RgbImage, config: &SegmentationConfig) -> GrayImage {
    segment_stages(img, config).mask
}

fn foreground_count(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p[0] > 0).count()
}
