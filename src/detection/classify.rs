//! Rule-based vegetable classification.
//!
//! Shape decides first: the elongation ratio of a contour's minimum-area
//! rectangle separates carrots and cabbages from round items. Round items
//! (potatoes and bell peppers) share the same elongation, so their mean
//! colour inside the contour decides between them.

use image::{GrayImage, Luma, RgbImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

use crate::config::ClassificationConfig;
use crate::detection::contours::{area_in_bounds, trace_contours};
use crate::models::{Category, Contour, Detections, MeanColor, Measurement};

/// Outcome of the shape rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeClass {
    Decided(Category),
    /// Elongation alone cannot tell potatoes from bell peppers
    Round,
}

/// Shape rule, first match wins: `ratio < carrot_max_ratio` is a carrot,
/// `ratio < cabbage_max_ratio` a cabbage, anything else is round
pub fn classify_shape(ratio: f64, config: &ClassificationConfig) -> ShapeClass {
    if ratio < config.carrot_max_ratio {
        ShapeClass::Decided(Category::Carrot)
    } else if ratio < config.cabbage_max_ratio {
        ShapeClass::Decided(Category::Cabbage)
    } else {
        ShapeClass::Round
    }
}

/// Colour rule for round items: potatoes are both green and red enough
pub fn classify_color(mean: &MeanColor, config: &ClassificationConfig) -> Category {
    if mean.green > config.potato_min_green && mean.red > config.potato_min_red {
        Category::Potato
    } else {
        Category::BellPepper
    }
}

/// Full decision tree. `mean_color` is only evaluated for round shapes and
/// is returned alongside the category when it was.
pub fn categorize<F>(
    ratio: f64,
    mean_color: F,
    config: &ClassificationConfig,
) -> (Category, Option<MeanColor>)
where
    F: FnOnce() -> MeanColor,
{
    match classify_shape(ratio, config) {
        ShapeClass::Decided(category) => (category, None),
        ShapeClass::Round => {
            let mean = mean_color();
            (classify_color(&mean, config), Some(mean))
        }
    }
}

/// Mask of the filled interior of a contour (boundary included), at the given size
pub fn interior_mask(contour: &Contour, width: u32, height: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);

    let mut polygon: &[Point<i32>] = &contour.points;
    while polygon.len() > 1 && polygon.first() == polygon.last() {
        polygon = &polygon[..polygon.len() - 1];
    }

    match polygon.len() {
        0 => {}
        1 => {
            let p = polygon[0];
            if p.x >= 0 && p.y >= 0 && (p.x as u32) < width && (p.y as u32) < height {
                mask.put_pixel(p.x as u32, p.y as u32, Luma([255]));
            }
        }
        _ => draw_polygon_mut(&mut mask, polygon, Luma([255])),
    }

    mask
}

/// Per-channel mean of `img` over the nonzero samples of `mask`
pub fn mean_color(img: &RgbImage, mask: &GrayImage) -> MeanColor {
    let mut sum = [0u64; 3];
    let mut count: u64 = 0;

    for (pixel, m) in img.pixels().zip(mask.pixels()) {
        if m[0] == 0 {
            continue;
        }
        for (s, v) in sum.iter_mut().zip(pixel.0) {
            *s += v as u64;
        }
        count += 1;
    }

    if count == 0 {
        return MeanColor {
            red: 0.0,
            green: 0.0,
            blue: 0.0,
        };
    }

    let n = count as f64;
    MeanColor {
        red: sum[0] as f64 / n,
        green: sum[1] as f64 / n,
        blue: sum[2] as f64 / n,
    }
}

/// Classify a single contour; `None` when it fails the area filter
pub fn classify_contour(
    contour: &Contour,
    original: &RgbImage,
    config: &ClassificationConfig,
) -> Option<(Category, Measurement)> {
    let area = contour.area();
    if !area_in_bounds(area, config.min_area, config.max_area) {
        return None;
    }

    let rect = contour.min_area_rect()?;
    let ratio = rect.ratio();

    let (category, mean_color) = categorize(
        ratio,
        || {
            let (width, height) = original.dimensions();
            self::mean_color(original, &interior_mask(contour, width, height))
        },
        config,
    );

    Some((
        category,
        Measurement {
            area,
            rect,
            ratio,
            mean_color,
        },
    ))
}

/// Trace the contours of `mask` and classify each against `original`
pub fn classify(mask: &GrayImage, original: &RgbImage, config: &ClassificationConfig) -> Detections {
    let contours = trace_contours(mask);
    tracing::debug!("traced {} contours", contours.len());

    let results: Vec<(usize, Category, Measurement)> = contours
        .iter()
        .enumerate()
        .filter_map(|(index, contour)| {
            let outcome = classify_contour(contour, original, config);
            match &outcome {
                Some((category, m)) => tracing::trace!(
                    index,
                    area = m.area,
                    ratio = m.ratio,
                    mean_color = ?m.mean_color,
                    "contour classified as {}",
                    category
                ),
                None => tracing::trace!(index, area = contour.area(), "contour outside area bounds"),
            }
            outcome.map(|(category, m)| (index, category, m))
        })
        .collect();

    let mut detections = Detections::new(contours, mask.dimensions());
    for (index, category, measurement) in results {
        detections.record(index, category, measurement);
    }
    detections
}
