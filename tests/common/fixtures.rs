use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;

/// Background colour of synthetic scenes, well below the segmentation cut
pub const BACKGROUND: Rgb<u8> = Rgb([20, 20, 20]);
/// Bright blob colour, well above the segmentation cut
pub const BRIGHT: Rgb<u8> = Rgb([220, 220, 220]);

/// Dark `width`x`height` colour image
pub fn dark_scene(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, BACKGROUND)
}

/// Paint an axis-aligned filled rectangle
pub fn paint_rect(img: &mut RgbImage, x: i32, y: i32, width: u32, height: u32, color: Rgb<u8>) {
    draw_filled_rect_mut(img, Rect::at(x, y).of_size(width, height), color);
}

/// Binary mask with one axis-aligned foreground rectangle
pub fn rect_mask(size: (u32, u32), x: i32, y: i32, width: u32, height: u32) -> GrayImage {
    let mut mask = GrayImage::new(size.0, size.1);
    draw_filled_rect_mut(&mut mask, Rect::at(x, y).of_size(width, height), Luma([255u8]));
    mask
}

/// Corners of a rectangle of the given side lengths rotated by `degrees` about `center`
pub fn rotated_rect_corners(center: (f32, f32), long: f32, short: f32, degrees: f32) -> Vec<Point<i32>> {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
        .iter()
        .map(|(sx, sy)| {
            let dx = sx * long / 2.0;
            let dy = sy * short / 2.0;
            Point::new(
                (center.0 + dx * cos - dy * sin).round() as i32,
                (center.1 + dx * sin + dy * cos).round() as i32,
            )
        })
        .collect()
}

/// Binary mask with one rotated foreground rectangle
pub fn rotated_rect_mask(size: (u32, u32), corners: &[Point<i32>]) -> GrayImage {
    let mut mask = GrayImage::new(size.0, size.1);
    draw_polygon_mut(&mut mask, corners, Luma([255u8]));
    mask
}

/// Contour through the four corners of an axis-aligned `width`x`height` rectangle,
/// enclosing exactly `width * height` square samples
pub fn box_contour(width: i32, height: i32) -> veggiesort::Contour {
    veggiesort::Contour::new(
        vec![
            Point::new(0, 0),
            Point::new(width, 0),
            Point::new(width, height),
            Point::new(0, height),
        ],
        veggiesort::models::BorderKind::Outer,
        None,
    )
}

/// Number of pixels that differ between two images
pub fn changed_pixels(a: &RgbImage, b: &RgbImage) -> usize {
    a.pixels().zip(b.pixels()).filter(|(p, q)| p != q).count()
}
