//! Image stages: segmentation, contour classification and annotation

pub mod preprocessing;
pub mod contours;
pub mod classify;
pub mod annotate;

pub use annotate::{annotate, annotate_detections};
pub use classify::{categorize, classify};
pub use preprocessing::segment;
