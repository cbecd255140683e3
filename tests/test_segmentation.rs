mod common;

use common::*;
use veggiesort::config::SegmentationConfig;
use veggiesort::detection::preprocessing::{binarize, kernel_radius, segment, segment_stages};

#[test]
fn test_mask_matches_input_size_and_is_binary() {
    let mut img = dark_scene(400, 300);
    paint_rect(&mut img, 100, 80, 200, 120, BRIGHT);

    let mask = segment(&img, &SegmentationConfig::default());

    assert_eq!(mask.dimensions(), img.dimensions());
    let mut values: Vec<u8> = mask.pixels().map(|p| p[0]).collect();
    values.sort_unstable();
    values.dedup();
    assert_eq!(values, vec![0, 255]);
}

#[test]
fn test_segmentation_is_deterministic() {
    let mut img = dark_scene(300, 300);
    paint_rect(&mut img, 50, 50, 150, 100, BRIGHT);
    paint_rect(&mut img, 10, 250, 8, 8, BRIGHT);

    let config = SegmentationConfig::default();
    assert_eq!(segment(&img, &config), segment(&img, &config));
}

#[test]
fn test_threshold_cut_is_strict() {
    let mut gray = image::GrayImage::new(3, 1);
    gray.put_pixel(0, 0, image::Luma([120]));
    gray.put_pixel(1, 0, image::Luma([121]));
    gray.put_pixel(2, 0, image::Luma([0]));

    let binary = binarize(&gray, 120);
    assert_eq!(binary.into_raw(), vec![0, 255, 0]);
}

#[test]
fn test_opening_removes_specks_smaller_than_kernel() {
    let mut img = dark_scene(200, 200);
    paint_rect(&mut img, 90, 90, 20, 20, BRIGHT);

    let stages = segment_stages(&img, &SegmentationConfig::default());

    assert!(stages.thresholded.pixels().any(|p| p[0] > 0));
    assert!(stages.mask.pixels().all(|p| p[0] == 0));
}

#[test]
fn test_large_blob_survives_cleanup() {
    let mut img = dark_scene(400, 400);
    paint_rect(&mut img, 100, 100, 200, 200, BRIGHT);

    let mask = segment(&img, &SegmentationConfig::default());

    assert_eq!(mask.get_pixel(200, 200)[0], 255);
    assert_eq!(mask.get_pixel(10, 10)[0], 0);
}

#[test]
fn test_closing_fills_small_holes() {
    let mut img = dark_scene(400, 400);
    paint_rect(&mut img, 100, 100, 200, 200, BRIGHT);
    paint_rect(&mut img, 195, 195, 10, 10, BACKGROUND);

    let mask = segment(&img, &SegmentationConfig::default());

    assert_eq!(mask.get_pixel(200, 200)[0], 255);
}

#[test]
fn test_dark_image_gives_empty_mask() {
    let img = dark_scene(120, 80);
    let mask = segment(&img, &SegmentationConfig::default());
    assert!(mask.pixels().all(|p| p[0] == 0));
}

#[test]
fn test_luma_uses_bt601_weights() {
    let mut img = dark_scene(400, 400);
    // pure green reads as 117 and stays background at the 120 cut
    paint_rect(&mut img, 0, 100, 200, 200, image::Rgb([0, 200, 0]));
    // magenta-red reads as 123 and becomes foreground
    paint_rect(&mut img, 200, 100, 200, 200, image::Rgb([255, 40, 200]));

    let stages = segment_stages(&img, &SegmentationConfig::default());

    assert_eq!(stages.gray.get_pixel(100, 200)[0], 117);
    assert_eq!(stages.gray.get_pixel(300, 200)[0], 123);
    assert_eq!(stages.gray.get_pixel(10, 10)[0], 20);
    assert_eq!(stages.mask.get_pixel(100, 200)[0], 0);
    assert_eq!(stages.mask.get_pixel(300, 200)[0], 255);
}

#[test]
fn test_kernel_size_one_disables_cleanup() {
    let mut img = dark_scene(200, 200);
    paint_rect(&mut img, 90, 90, 20, 20, BRIGHT);

    let config = SegmentationConfig {
        kernel_size: 1,
        ..SegmentationConfig::default()
    };
    let stages = segment_stages(&img, &config);

    assert_eq!(kernel_radius(1), 0);
    assert_eq!(stages.mask, stages.thresholded);
    assert_eq!(stages.mask.get_pixel(100, 100)[0], 255);
}

#[test]
fn test_even_kernel_size_rounds_up_to_odd_disc() {
    assert_eq!(kernel_radius(50), 25);
    assert_eq!(kernel_radius(51), 25);
    assert_eq!(kernel_radius(3), 1);
}
