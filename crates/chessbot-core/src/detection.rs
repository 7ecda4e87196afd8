use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in image pixel coordinates.
///
/// Serialized as `[x_min, y_min, x_max, y_max]`, the layout most object
/// detectors emit (`xyxy`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BoundingBox {
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// Midpoint of the box.
    #[inline]
    pub fn center(&self) -> Point2<f32> {
        Point2::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from([x_min, y_min, x_max, y_max]: [f32; 4]) -> Self {
        Self::new(x_min, y_min, x_max, y_max)
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x_min, b.y_min, b.x_max, b.y_max]
    }
}

/// One object reported by the external detector for a single image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    /// Class name from the detector vocabulary (`Chess_Board`, `White_King`, ...).
    pub label: String,
    /// Detector score in `[0, 1]`, when the model reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl Detection {
    pub fn new(bbox: BoundingBox, label: impl Into<String>) -> Self {
        Self {
            bbox,
            label: label.into(),
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    #[inline]
    pub fn center(&self) -> Point2<f32> {
        self.bbox.center()
    }
}
