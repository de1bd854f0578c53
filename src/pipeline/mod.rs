//! Frame-level postprocessing: decode every scale, merge, suppress.
//!
//! A [`Postprocessor`] owns the label table and an immutable [`DetectConfig`].
//! Each [`Postprocessor::process`] call is a pure function of the frame's
//! outputs and geometry; no state survives between calls.

use crate::decode::{decode_region, Detection, FrameGeometry, RegionOutput};
use crate::labels::LabelTable;
use crate::nms::{suppress, NmsConfig, NmsMode};
use crate::trace::{trace_event, trace_span};
use crate::util::{RegionError, RegionResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Thresholds and suppression settings applied to every frame.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectConfig {
    /// Minimum objectness and class probability.
    pub threshold: f32,
    /// Overlap at or above which NMS suppresses a detection.
    pub iou_threshold: f32,
    /// NMS order.
    pub nms_mode: NmsMode,
    /// When false NMS only compares detections of the same class.
    pub class_agnostic: bool,
    /// Decode scales in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            iou_threshold: 0.4,
            nms_mode: NmsMode::Greedy,
            class_agnostic: true,
            parallel: false,
        }
    }
}

impl DetectConfig {
    /// Checks both thresholds lie in `[0, 1]`.
    pub fn validate(&self) -> RegionResult<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(RegionError::InvalidInput("threshold must be in [0, 1]"));
        }
        self.nms().validate()
    }

    /// Suppression settings derived from this configuration.
    pub fn nms(&self) -> NmsConfig {
        NmsConfig {
            iou_threshold: self.iou_threshold,
            mode: self.nms_mode,
            class_agnostic: self.class_agnostic,
        }
    }
}

/// Turns the region outputs of one frame into final detections.
pub struct Postprocessor {
    labels: LabelTable,
    cfg: DetectConfig,
}

impl Postprocessor {
    /// Creates a postprocessor with the default configuration.
    pub fn new(labels: LabelTable) -> Self {
        Self {
            labels,
            cfg: DetectConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: DetectConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn config(&self) -> &DetectConfig {
        &self.cfg
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Decodes all outputs of a frame without suppression.
    ///
    /// Detections are concatenated in output order. The first invalid output
    /// aborts the frame.
    pub fn decode_all(
        &self,
        outputs: &[RegionOutput<'_>],
        frame: &FrameGeometry,
    ) -> RegionResult<Vec<Detection>> {
        self.cfg.validate()?;
        frame.validate()?;

        if self.cfg.parallel {
            return self.decode_all_par(outputs, frame);
        }
        self.decode_all_seq(outputs, frame)
    }

    fn decode_all_seq(
        &self,
        outputs: &[RegionOutput<'_>],
        frame: &FrameGeometry,
    ) -> RegionResult<Vec<Detection>> {
        let mut detections = Vec::new();
        for output in outputs {
            decode_region(
                output,
                frame,
                self.cfg.threshold,
                &self.labels,
                &mut detections,
            )?;
        }
        Ok(detections)
    }

    #[cfg(feature = "rayon")]
    fn decode_all_par(
        &self,
        outputs: &[RegionOutput<'_>],
        frame: &FrameGeometry,
    ) -> RegionResult<Vec<Detection>> {
        let per_scale: Vec<Vec<Detection>> = outputs
            .par_iter()
            .map(|output| -> RegionResult<Vec<Detection>> {
                let mut out = Vec::new();
                decode_region(output, frame, self.cfg.threshold, &self.labels, &mut out)?;
                Ok(out)
            })
            .collect::<RegionResult<_>>()?;
        Ok(per_scale.into_iter().flatten().collect())
    }

    /// Without the `rayon` feature parallel decoding runs sequentially.
    #[cfg(not(feature = "rayon"))]
    fn decode_all_par(
        &self,
        outputs: &[RegionOutput<'_>],
        frame: &FrameGeometry,
    ) -> RegionResult<Vec<Detection>> {
        self.decode_all_seq(outputs, frame)
    }

    /// Decodes, suppresses and threshold-filters the outputs of one frame.
    pub fn process(
        &self,
        outputs: &[RegionOutput<'_>],
        frame: &FrameGeometry,
    ) -> RegionResult<Vec<Detection>> {
        let _span = trace_span!("postprocess", outputs = outputs.len()).entered();

        let detections = self.decode_all(outputs, frame)?;
        let before = detections.len();
        let mut kept = suppress(detections, &self.cfg.nms())?;
        kept.retain(|det| det.confidence() >= self.cfg.threshold);

        trace_event!("nms_survivors", before = before, after = kept.len());
        Ok(kept)
    }
}
