pub mod config;
pub mod detection;
pub mod display;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod report;

pub use config::Config;
pub use error::{AnnotateError, CategoryError, ConfigError, Error, Result};
pub use models::{
    Category, ClassificationMap, Contour, Detections, MeanColor, Measurement, RotatedRect,
};
pub use pipeline::{Pipeline, PipelineOutput};
pub use report::Report;
