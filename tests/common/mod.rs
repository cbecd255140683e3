mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from veggiesort for tests
pub use veggiesort::{
    AnnotateError, Category, ClassificationMap, Config, Contour, Detections, Pipeline,
};
