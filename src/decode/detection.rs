//! Decoded detections.

use std::sync::Arc;

use crate::geometry::BBox;

/// One labeled box in original-image coordinates.
///
/// Class and corners are fixed at creation. The confidence is only ever
/// changed by non-maximum suppression, which forces it to zero.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    class_id: usize,
    label: Arc<str>,
    confidence: f32,
    bbox: BBox,
}

impl Detection {
    /// Creates a detection from its parts.
    pub fn new(class_id: usize, label: impl Into<Arc<str>>, confidence: f32, bbox: BBox) -> Self {
        Self {
            class_id,
            label: label.into(),
            confidence,
            bbox,
        }
    }

    /// Converts a box given by center and size in resized-input pixels into
    /// original-image corners.
    ///
    /// Corners are truncated toward zero; `xmax`/`ymax` are measured from the
    /// already truncated `xmin`/`ymin`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_center(
        class_id: usize,
        label: Arc<str>,
        confidence: f32,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        w_ratio: f64,
        h_ratio: f64,
    ) -> Self {
        let xmin = ((x - width / 2.0) * w_ratio) as i32;
        let ymin = ((y - height / 2.0) * h_ratio) as i32;
        let xmax = (xmin as f64 + width * w_ratio) as i32;
        let ymax = (ymin as f64 + height * h_ratio) as i32;
        Self {
            class_id,
            label,
            confidence,
            bbox: BBox::new(xmin, ymin, xmax, ymax),
        }
    }

    /// Index into the label table.
    pub fn class_id(&self) -> usize {
        self.class_id
    }

    /// Class name resolved when the detection was created.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Objectness times class score; zero once suppressed.
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Box corners.
    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    pub fn xmin(&self) -> i32 {
        self.bbox.xmin
    }

    pub fn ymin(&self) -> i32 {
        self.bbox.ymin
    }

    pub fn xmax(&self) -> i32 {
        self.bbox.xmax
    }

    pub fn ymax(&self) -> i32 {
        self.bbox.ymax
    }

    /// Returns true once suppression has zeroed the confidence.
    pub fn is_suppressed(&self) -> bool {
        self.confidence <= 0.0
    }

    pub(crate) fn suppress(&mut self) {
        self.confidence = 0.0;
    }
}
