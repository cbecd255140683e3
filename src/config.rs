use std::path::Path;

use image::Rgb;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::Category;

/// Largest structuring element the morphology stage accepts (its radius must fit a `u8`)
pub const MAX_KERNEL_SIZE: u32 = 510;

/// All tunable constants of the pipeline. Every field has a default, so a
/// config file only needs to name the values it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub segmentation: SegmentationConfig,
    pub classification: ClassificationConfig,
    pub annotation: AnnotationConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Gray level cut; samples strictly above it are foreground
    pub threshold: u8,
    /// Diameter of the structuring disc used for opening and closing, in samples
    pub kernel_size: u32,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            threshold: 120,
            kernel_size: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Contours enclosing this many square samples or fewer are noise
    pub min_area: f64,
    /// Contours enclosing this many square samples or more are the frame/background
    pub max_area: f64,
    /// Elongation ratios below this are carrots
    pub carrot_max_ratio: f64,
    /// Elongation ratios below this (and not carrots) are cabbages
    pub cabbage_max_ratio: f64,
    /// Mean green level a round item must exceed to be a potato
    pub potato_min_green: f64,
    /// Mean red level a round item must exceed to be a potato
    pub potato_min_red: f64,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            min_area: 1e4,
            max_area: 1e7,
            carrot_max_ratio: 0.4,
            cabbage_max_ratio: 0.6,
            potato_min_green: 90.0,
            potato_min_red: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Outline stroke width, in samples
    pub thickness: u32,
    pub palette: Palette,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            thickness: 50,
            palette: Palette::default(),
        }
    }
}

/// Outline colour per category, as `[red, green, blue]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub carrot: [u8; 3],
    pub cabbage: [u8; 3],
    pub potato: [u8; 3],
    pub bell_pepper: [u8; 3],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            carrot: [255, 140, 0],
            cabbage: [0, 255, 0],
            potato: [110, 70, 29],
            bell_pepper: [239, 69, 19],
        }
    }
}

impl Palette {
    pub fn color(&self, category: Category) -> Rgb<u8> {
        match category {
            Category::Carrot => Rgb(self.carrot),
            Category::Cabbage => Rgb(self.cabbage),
            Category::Potato => Rgb(self.potato),
            Category::BellPepper => Rgb(self.bell_pepper),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Width the presented image is resized to, keeping its aspect ratio
    pub width: u32,
    /// Milliseconds to wait after presenting; 0 waits for the user
    pub wait_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 500,
            wait_ms: 0,
        }
    }
}

impl Config {
    /// Load a TOML config file; omitted fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let seg = &self.segmentation;
        if seg.kernel_size == 0 || seg.kernel_size > MAX_KERNEL_SIZE {
            return Err(ConfigError::Invalid(format!(
                "kernel_size must be in 1..={}, got {}",
                MAX_KERNEL_SIZE, seg.kernel_size
            )));
        }

        let cls = &self.classification;
        if !(cls.min_area >= 0.0 && cls.min_area < cls.max_area) {
            return Err(ConfigError::Invalid(format!(
                "area bounds must satisfy 0 <= min_area < max_area, got ({}, {})",
                cls.min_area, cls.max_area
            )));
        }
        let ratios_ok = cls.carrot_max_ratio > 0.0
            && cls.carrot_max_ratio <= cls.cabbage_max_ratio
            && cls.cabbage_max_ratio <= 1.0;
        if !ratios_ok {
            return Err(ConfigError::Invalid(format!(
                "ratio cuts must satisfy 0 < carrot <= cabbage <= 1, got ({}, {})",
                cls.carrot_max_ratio, cls.cabbage_max_ratio
            )));
        }

        if self.annotation.thickness == 0 {
            return Err(ConfigError::Invalid("thickness must be positive".to_string()));
        }
        if self.display.width == 0 {
            return Err(ConfigError::Invalid("display width must be positive".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_constants() {
        let config = Config::default();
        assert_eq!(config.segmentation.threshold, 120);
        assert_eq!(config.segmentation.kernel_size, 50);
        assert_eq!(config.classification.min_area, 10_000.0);
        assert_eq!(config.classification.max_area, 10_000_000.0);
        assert_eq!(config.classification.carrot_max_ratio, 0.4);
        assert_eq!(config.classification.cabbage_max_ratio, 0.6);
        assert_eq!(config.annotation.thickness, 50);
        assert_eq!(config.display.width, 500);
        assert_eq!(config.display.wait_ms, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [segmentation]
            threshold = 100

            [annotation.palette]
            carrot = [1, 2, 3]
            "#,
        )
        .unwrap();

        assert_eq!(config.segmentation.threshold, 100);
        assert_eq!(config.segmentation.kernel_size, 50);
        assert_eq!(config.annotation.palette.carrot, [1, 2, 3]);
        assert_eq!(config.annotation.palette.cabbage, [0, 255, 0]);
    }

    #[test]
    fn test_rejects_inverted_area_bounds() {
        let mut config = Config::default();
        config.classification.min_area = 1e7;
        config.classification.max_area = 1e4;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_oversized_kernel() {
        let mut config = Config::default();
        config.segmentation.kernel_size = 600;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_unordered_ratio_cuts() {
        let mut config = Config::default();
        config.classification.carrot_max_ratio = 0.7;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_wrong_value_type_fails() {
        assert!(toml::from_str::<Config>("[display]\nwidth = \"wide\"").is_err());
    }
}
