//! Decoding of a single region output tensor.

use crate::anchors::anchor_window;
use crate::decode::{Detection, FrameGeometry, RegionOutput, REGION_LAYER_TYPE};
use crate::labels::LabelTable;
use crate::tensor::TensorLayout;
use crate::trace::{trace_event, trace_reject, trace_span};
use crate::util::{RegionError, RegionResult};

/// Validated decoding parameters for one output.
struct RegionPlan<'a> {
    side: usize,
    num_anchors: usize,
    coords: usize,
    classes: usize,
    anchors: &'a [f32],
    layout: TensorLayout,
    data: &'a [f32],
}

impl<'a> RegionPlan<'a> {
    fn resolve(output: &RegionOutput<'a>, labels: &LabelTable) -> RegionResult<Self> {
        let layer = output.layer();
        let tensor = output.tensor();
        let name = layer.name.as_str();

        if layer.layer_type != REGION_LAYER_TYPE {
            return Err(RegionError::UnsupportedLayerType {
                layer: name.to_owned(),
                found: layer.layer_type.clone(),
            });
        }
        if tensor.batch() != 1 {
            return Err(RegionError::InvalidBatch {
                layer: name.to_owned(),
                batch: tensor.batch(),
            });
        }
        if tensor.height() != tensor.width() {
            return Err(RegionError::NonSquareGrid {
                layer: name.to_owned(),
                height: tensor.height(),
                width: tensor.width(),
            });
        }
        if layer.coords != 4 {
            return Err(RegionError::UnsupportedCoords {
                layer: name.to_owned(),
                coords: layer.coords,
            });
        }

        let side = tensor.height();
        let num_anchors = layer.num_anchors();
        let anchors = anchor_window(name, layer.anchor_values(), side, num_anchors)?;

        let (entries, expected) = layer
            .entries()
            .and_then(|entries| Some((entries, num_anchors.checked_mul(entries)?)))
            .ok_or_else(|| RegionError::ChannelOverflow {
                layer: name.to_owned(),
            })?;
        if tensor.channels() != expected {
            return Err(RegionError::ChannelMismatch {
                layer: name.to_owned(),
                expected,
                got: tensor.channels(),
            });
        }
        if labels.len() < layer.classes {
            return Err(RegionError::LabelTableTooShort {
                layer: name.to_owned(),
                classes: layer.classes,
                labels: labels.len(),
            });
        }

        let layout = output.layout(side, entries);
        let data = tensor.as_slice();
        let needed = layout
            .required_len(num_anchors, entries, side)
            .ok_or(RegionError::InvalidShape {
                dims: tensor.dims(),
            })?;
        if data.len() < needed {
            return Err(RegionError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }

        Ok(Self {
            side,
            num_anchors,
            coords: layer.coords,
            classes: layer.classes,
            anchors,
            layout,
            data,
        })
    }

    #[inline]
    fn value(&self, anchor: usize, channel: usize, row: usize, col: usize) -> f32 {
        self.data[self.layout.offset(anchor, channel, row, col)]
    }
}

/// Decodes one region output and appends its detections to `out`.
///
/// Every `(cell, anchor)` pair whose objectness reaches `threshold` yields one
/// detection per class whose `objectness * class_score` also reaches it. NaN
/// scores never pass. `threshold` must lie in `[0, 1]`. Nothing is appended
/// when validation fails.
pub fn decode_region(
    output: &RegionOutput<'_>,
    frame: &FrameGeometry,
    threshold: f32,
    labels: &LabelTable,
    out: &mut Vec<Detection>,
) -> RegionResult<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(RegionError::InvalidInput("threshold must be in [0, 1]"));
    }
    frame.validate()?;
    let plan = match RegionPlan::resolve(output, labels) {
        Ok(plan) => plan,
        Err(err) => {
            trace_reject!(layer = output.layer().name.as_str());
            return Err(err);
        }
    };

    let _span = trace_span!(
        "decode_region",
        layer = output.layer().name.as_str(),
        side = plan.side,
        anchors = plan.num_anchors
    )
    .entered();

    let side = plan.side;
    let side_f = side as f64;
    let resized_w = frame.resized_width as f64;
    let resized_h = frame.resized_height as f64;
    let (h_ratio, w_ratio) = frame.ratios();
    let objectness_channel = plan.coords;
    let before = out.len();

    for cell in 0..side * side {
        let row = cell / side;
        let col = cell % side;
        for n in 0..plan.num_anchors {
            let objectness = plan.value(n, objectness_channel, row, col);
            if objectness.is_nan() || objectness < threshold {
                continue;
            }

            let x = (col as f64 + plan.value(n, 0, row, col) as f64) / side_f * resized_w;
            let y = (row as f64 + plan.value(n, 1, row, col) as f64) / side_f * resized_h;
            let width = (plan.value(n, 2, row, col) as f64).exp() * plan.anchors[2 * n] as f64;
            let height =
                (plan.value(n, 3, row, col) as f64).exp() * plan.anchors[2 * n + 1] as f64;

            for class_id in 0..plan.classes {
                let prob = objectness * plan.value(n, objectness_channel + 1 + class_id, row, col);
                if prob.is_nan() || prob < threshold {
                    continue;
                }
                // Label length was checked in `resolve`.
                let label = match labels.shared(class_id) {
                    Some(label) => label,
                    None => continue,
                };
                out.push(Detection::from_center(
                    class_id, label, prob, x, y, width, height, w_ratio, h_ratio,
                ));
            }
        }
    }

    trace_event!("region_detections", count = out.len() - before);
    Ok(())
}

/// Decodes one region output into a fresh list.
pub fn decode_region_vec(
    output: &RegionOutput<'_>,
    frame: &FrameGeometry,
    threshold: f32,
    labels: &LabelTable,
) -> RegionResult<Vec<Detection>> {
    let mut out = Vec::new();
    decode_region(output, frame, threshold, labels, &mut out)?;
    Ok(out)
}
