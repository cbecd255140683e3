use image::{Rgb, RgbImage};
use imageproc::drawing::{BresenhamLineIter, draw_filled_circle_mut, draw_line_segment_mut};
use imageproc::point::Point;

use crate::config::AnnotationConfig;
use crate::error::AnnotateError;
use crate::models::{ClassificationMap, Contour, Detections};

/// Draw the outline of every labelled contour in its category colour.
///
/// All labels are checked before anything is drawn: an entry that does not
/// index into `contours` aborts with an error and leaves `image` untouched.
pub fn annotate(
    image: &mut RgbImage,
    labels: &ClassificationMap,
    contours: &[Contour],
    config: &AnnotationConfig,
) -> Result<(), AnnotateError> {
    if let Some(&index) = labels.keys().find(|&&index| index >= contours.len()) {
        return Err(AnnotateError::ContourOutOfRange {
            index,
            len: contours.len(),
        });
    }

    for (&index, &category) in labels {
        let color = config.palette.color(category);
        draw_outline(image, &contours[index].points, color, config.thickness);
    }

    tracing::debug!("drew {} outlines", labels.len());
    Ok(())
}

/// Annotate with the contour set and labels of one classification run.
/// `image` must have the size of the mask the contours were traced on.
pub fn annotate_detections(
    image: &mut RgbImage,
    detections: &Detections,
    config: &AnnotationConfig,
) -> Result<(), AnnotateError> {
    if image.dimensions() != detections.dimensions() {
        return Err(AnnotateError::DimensionMismatch {
            expected: detections.dimensions(),
            actual: image.dimensions(),
        });
    }
    annotate(image, detections.labels(), detections.contours(), config)
}

/// Stroke a closed point sequence with the given width
pub fn draw_outline(canvas: &mut RgbImage, points: &[Point<i32>], color: Rgb<u8>, thickness: u32) {
    if points.is_empty() {
        return;
    }

    let radius = (thickness / 2) as i32;
    if radius == 0 {
        for (i, p) in points.iter().enumerate() {
            let q = points[(i + 1) % points.len()];
            draw_line_segment_mut(canvas, (p.x as f32, p.y as f32), (q.x as f32, q.y as f32), color);
        }
        return;
    }

    for (i, p) in points.iter().enumerate() {
        draw_filled_circle_mut(canvas, (p.x, p.y), radius, color);

        // traced borders are 8-connected; fill any wider step along a straight line
        let q = points[(i + 1) % points.len()];
        if (q.x - p.x).abs() > 1 || (q.y - p.y).abs() > 1 {
            for (x, y) in BresenhamLineIter::new((p.x as f32, p.y as f32), (q.x as f32, q.y as f32)) {
                draw_filled_circle_mut(canvas, (x, y), radius, color);
            }
        }
    }
}
