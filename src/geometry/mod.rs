//! Axis-aligned boxes and the intersection-over-union metric.

/// Axis-aligned box in image pixel coordinates.
///
/// Corners are not guaranteed to be ordered: a box decoded from a malformed
/// anchor may have `xmax <= xmin`. Such boxes have no area and never overlap
/// anything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BBox {
    /// Left edge.
    pub xmin: i32,
    /// Top edge.
    pub ymin: i32,
    /// Right edge.
    pub xmax: i32,
    /// Bottom edge.
    pub ymax: i32,
}

impl BBox {
    /// Creates a box from its corners.
    pub fn new(xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Returns the signed width.
    pub fn width(&self) -> i64 {
        self.xmax as i64 - self.xmin as i64
    }

    /// Returns the signed height.
    pub fn height(&self) -> i64 {
        self.ymax as i64 - self.ymin as i64
    }

    /// Returns true when the box has no positive area.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Returns the area, or 0 for degenerate boxes.
    pub fn area(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        self.width() as f64 * self.height() as f64
    }
}

/// Intersection over union of two boxes.
///
/// Returns 0 when either box is degenerate or the union is empty.
pub fn iou(a: &BBox, b: &BBox) -> f32 {
    if a.is_degenerate() || b.is_degenerate() {
        return 0.0;
    }

    let overlap_w = a.xmax.min(b.xmax) as i64 - a.xmin.max(b.xmin) as i64;
    let overlap_h = a.ymax.min(b.ymax) as i64 - a.ymin.max(b.ymin) as i64;
    let overlap = if overlap_w < 0 || overlap_h < 0 {
        0.0
    } else {
        overlap_w as f64 * overlap_h as f64
    };

    let union = a.area() + b.area() - overlap;
    if union <= 0.0 {
        return 0.0;
    }
    (overlap / union) as f32
}
