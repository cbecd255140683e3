//! Error types for veggiesort

use std::path::PathBuf;
use thiserror::Error;

/// Top-level library error
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Annotate(#[from] AnnotateError),

    #[error(transparent)]
    Category(#[from] CategoryError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Debug directory is not empty: {}", .0.display())]
    DebugDirNotEmpty(PathBuf),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Raised when the annotator receives labels that break the contract with
/// the classifier.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnnotateError {
    #[error("Classification entry {index} does not refer to a contour (only {len} contours)")]
    ContourOutOfRange { index: usize, len: usize },

    #[error("Image is {actual:?} but contours were traced on a {expected:?} mask")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CategoryError {
    #[error("Unknown vegetable category: {0:?}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, Error>;
