use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use imageproc::contours::BorderType;
use imageproc::point::Point;
use serde::{Deserialize, Serialize};

use crate::error::CategoryError;

/// Vegetable kinds the classifier can assign
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Carrot,
    Cabbage,
    Potato,
    #[serde(rename = "bell pepper", alias = "bell_pepper")]
    BellPepper,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Carrot,
        Category::Cabbage,
        Category::Potato,
        Category::BellPepper,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Carrot => "carrot",
            Category::Cabbage => "cabbage",
            Category::Potato => "potato",
            Category::BellPepper => "bell pepper",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "carrot" => Ok(Category::Carrot),
            "cabbage" => Ok(Category::Cabbage),
            "potato" => Ok(Category::Potato),
            "bell pepper" | "bell_pepper" | "bell-pepper" => Ok(Category::BellPepper),
            _ => Err(CategoryError::Unknown(s.to_string())),
        }
    }
}

/// Whether a traced border surrounds a foreground region or a hole inside one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderKind {
    Outer,
    Hole,
}

impl From<BorderType> for BorderKind {
    fn from(border: BorderType) -> Self {
        match border {
            BorderType::Outer => BorderKind::Outer,
            BorderType::Hole => BorderKind::Hole,
        }
    }
}

/// A closed boundary traced around one connected foreground region
#[derive(Debug, Clone)]
pub struct Contour {
    /// Every boundary point in tracing order; the last point connects back to the first
    pub points: Vec<Point<i32>>,
    pub border: BorderKind,
    /// Index of the enclosing contour in the same contour set
    pub parent: Option<usize>,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>, border: BorderKind, parent: Option<usize>) -> Self {
        Self {
            points,
            border,
            parent,
        }
    }

    /// Area enclosed by the boundary polygon, in square samples (shoelace formula)
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }

        let twice: i64 = (0..n)
            .map(|i| {
                let p = self.points[i];
                let q = self.points[(i + 1) % n];
                p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64
            })
            .sum();

        twice.abs() as f64 / 2.0
    }

    /// Minimum-area rotated rectangle enclosing every boundary point
    pub fn min_area_rect(&self) -> Option<RotatedRect> {
        if self.points.is_empty() {
            return None;
        }
        let corners = imageproc::geometry::min_area_rect(&self.points);
        Some(RotatedRect::from_corners(&corners))
    }
}

/// Rotated rectangle described by its center, side lengths and rotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotatedRect {
    pub center: (f64, f64),
    pub width: f64,
    pub height: f64,
    /// Direction of the `width` side, in degrees
    pub angle: f64,
}

impl RotatedRect {
    /// Build from the four corners of a rectangle, in any order
    pub fn from_corners(corners: &[Point<i32>; 4]) -> Self {
        let pts: Vec<(f64, f64)> = corners.iter().map(|p| (p.x as f64, p.y as f64)).collect();

        let cx = pts.iter().map(|p| p.0).sum::<f64>() / 4.0;
        let cy = pts.iter().map(|p| p.1).sum::<f64>() / 4.0;

        // the corner farthest from the first one is its diagonal opposite
        let offset = |i: usize| (pts[i].0 - pts[0].0, pts[i].1 - pts[0].1);
        let len = |(dx, dy): (f64, f64)| (dx * dx + dy * dy).sqrt();
        let diagonal = (1..4)
            .max_by(|&a, &b| len(offset(a)).total_cmp(&len(offset(b))))
            .unwrap_or(2);
        let mut sides = (1..4).filter(|&i| i != diagonal);
        let (a, b) = match (sides.next(), sides.next()) {
            (Some(a), Some(b)) => (offset(a), offset(b)),
            _ => ((0.0, 0.0), (0.0, 0.0)),
        };

        Self {
            center: (cx, cy),
            width: len(a),
            height: len(b),
            angle: a.1.atan2(a.0).to_degrees(),
        }
    }

    /// Rotation-invariant elongation in (0, 1]; 0 for a degenerate rectangle
    pub fn ratio(&self) -> f64 {
        let long = self.width.max(self.height);
        if long == 0.0 {
            return 0.0;
        }
        self.width.min(self.height) / long
    }
}

/// Per-channel mean of a colour image over a masked region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanColor {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

/// Shape and colour features recorded for a classified contour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub area: f64,
    pub rect: RotatedRect,
    pub ratio: f64,
    /// Only measured when the shape alone was ambiguous
    pub mean_color: Option<MeanColor>,
}

/// Contour index → assigned category
pub type ClassificationMap = BTreeMap<usize, Category>;

/// Contour set and classification map of one image, kept together so every
/// label always refers to a contour of the set it was produced with
#[derive(Debug, Clone)]
pub struct Detections {
    contours: Vec<Contour>,
    labels: ClassificationMap,
    measurements: BTreeMap<usize, Measurement>,
    dimensions: (u32, u32),
}

impl Detections {
    pub(crate) fn new(contours: Vec<Contour>, dimensions: (u32, u32)) -> Self {
        Self {
            contours,
            labels: ClassificationMap::new(),
            measurements: BTreeMap::new(),
            dimensions,
        }
    }

    pub(crate) fn record(&mut self, index: usize, category: Category, measurement: Measurement) {
        debug_assert!(index < self.contours.len());
        self.labels.insert(index, category);
        self.measurements.insert(index, measurement);
    }

    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    pub fn labels(&self) -> &ClassificationMap {
        &self.labels
    }

    pub fn measurement(&self, index: usize) -> Option<&Measurement> {
        self.measurements.get(&index)
    }

    /// Width and height of the mask the contours were traced on
    pub fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Labelled contours in index order
    pub fn iter_labelled(&self) -> impl Iterator<Item = (usize, &Contour, Category)> + '_ {
        self.labels
            .iter()
            .map(|(&index, &category)| (index, &self.contours[index], category))
    }

    /// Number of items found per category (categories with no items are omitted)
    pub fn counts(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for category in self.labels.values() {
            *counts.entry(*category).or_insert(0) += 1;
        }
        counts
    }

    pub fn into_parts(self) -> (ClassificationMap, Vec<Contour>) {
        (self.labels, self.contours)
    }
}
