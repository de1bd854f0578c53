//! Non-maximum suppression over decoded detections.
//!
//! Suppression marks a detection by forcing its confidence to zero. The
//! in-place entry point leaves marked detections in the slice; [`suppress`]
//! drops them.

use std::cmp::Ordering;

use crate::decode::Detection;
use crate::geometry::iou;
use crate::util::{RegionError, RegionResult};

/// Suppression order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NmsMode {
    /// Sort by descending confidence; every kept detection suppresses later
    /// detections overlapping it.
    #[default]
    Greedy,
    /// Sort by ascending confidence and let each unsuppressed detection
    /// suppress every later, more confident, overlapping detection. Kept for
    /// parity with older OpenVINO YOLO demos; it can discard the best box.
    Legacy,
}

/// Suppression parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NmsConfig {
    /// Overlap at or above which the later detection is suppressed.
    pub iou_threshold: f32,
    /// Suppression order.
    pub mode: NmsMode,
    /// When false only detections of the same class suppress each other.
    pub class_agnostic: bool,
}

impl Default for NmsConfig {
    fn default() -> Self {
        Self {
            iou_threshold: 0.4,
            mode: NmsMode::Greedy,
            class_agnostic: true,
        }
    }
}

impl NmsConfig {
    pub fn new(iou_threshold: f32) -> Self {
        Self {
            iou_threshold,
            ..Self::default()
        }
    }

    /// Checks the IoU threshold lies in `[0, 1]`.
    pub fn validate(&self) -> RegionResult<()> {
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(RegionError::InvalidInput("iou_threshold must be in [0, 1]"));
        }
        Ok(())
    }
}

fn detection_cmp_desc(a: &Detection, b: &Detection) -> Ordering {
    let (ba, bb) = (a.bbox(), b.bbox());
    b.confidence()
        .total_cmp(&a.confidence())
        .then_with(|| ba.ymin.cmp(&bb.ymin))
        .then_with(|| ba.xmin.cmp(&bb.xmin))
        .then_with(|| ba.ymax.cmp(&bb.ymax))
        .then_with(|| ba.xmax.cmp(&bb.xmax))
        .then_with(|| a.class_id().cmp(&b.class_id()))
}

/// Sorts detections by descending confidence with deterministic tie-breaking.
pub fn sort_detections_desc(detections: &mut [Detection]) {
    detections.sort_by(detection_cmp_desc);
}

/// Sorts `detections` and marks suppressed entries by zeroing their
/// confidence.
///
/// Leaves `detections` untouched when the IoU threshold is outside `[0, 1]`.
pub fn suppress_in_place(detections: &mut [Detection], cfg: &NmsConfig) -> RegionResult<()> {
    cfg.validate()?;
    match cfg.mode {
        NmsMode::Greedy => sort_detections_desc(detections),
        NmsMode::Legacy => detections.sort_by(|a, b| a.confidence().total_cmp(&b.confidence())),
    }

    for i in 0..detections.len() {
        if detections[i].is_suppressed() {
            continue;
        }
        let (head, tail) = detections.split_at_mut(i + 1);
        let current = &head[i];
        for other in tail.iter_mut() {
            if other.is_suppressed() {
                continue;
            }
            if !cfg.class_agnostic && other.class_id() != current.class_id() {
                continue;
            }
            if iou(&current.bbox(), &other.bbox()) >= cfg.iou_threshold {
                other.suppress();
            }
        }
    }
    Ok(())
}

/// Runs suppression and returns the surviving detections.
///
/// Greedy mode returns survivors by descending confidence, legacy mode by
/// ascending confidence. Detections that enter with zero confidence are
/// dropped as well.
pub fn suppress(
    mut detections: Vec<Detection>,
    cfg: &NmsConfig,
) -> RegionResult<Vec<Detection>> {
    suppress_in_place(&mut detections, cfg)?;
    detections.retain(|det| !det.is_suppressed());
    Ok(detections)
}
