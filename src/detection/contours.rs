use image::GrayImage;
use imageproc::contours::find_contours;

use crate::models::Contour;

/// Trace every outer and hole border of the nonzero regions of a binary mask.
/// Borders keep every traced point and their parent links.
pub fn trace_contours(mask: &GrayImage) -> Vec<Contour> {
    find_contours::<i32>(mask)
        .into_iter()
        .map(|c| Contour::new(c.points, c.border_type.into(), c.parent))
        .collect()
}

/// Whether an area lies strictly inside the accepted bounds
pub fn area_in_bounds(area: f64, min_area: f64, max_area: f64) -> bool {
    min_area < area && area < max_area
}
