use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{BorderKind, Category, Detections, Measurement};

/// Machine-readable summary of one classified image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub width: u32,
    pub height: u32,
    pub contours_traced: usize,
    /// Items per category label
    pub counts: BTreeMap<String, usize>,
    pub items: Vec<ReportItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportItem {
    /// Index of the contour in the traced set
    pub index: usize,
    pub category: Category,
    pub border: BorderKind,
    #[serde(flatten)]
    pub measurement: Measurement,
}

impl Report {
    pub fn from_detections(detections: &Detections) -> Self {
        let (width, height) = detections.dimensions();

        let items = detections
            .iter_labelled()
            .filter_map(|(index, contour, category)| {
                detections.measurement(index).map(|m| ReportItem {
                    index,
                    category,
                    border: contour.border,
                    measurement: m.clone(),
                })
            })
            .collect();

        let counts = detections
            .counts()
            .into_iter()
            .map(|(category, n)| (category.to_string(), n))
            .collect();

        Self {
            width,
            height,
            contours_traced: detections.contours().len(),
            counts,
            items,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
