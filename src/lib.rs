//! yolo-region turns raw YOLOv3 region outputs into labeled boxes.
//!
//! Each output tensor of a YOLOv3-family detector covers one detection scale.
//! The crate decodes those tensors into anchor-relative boxes, rescales them
//! to the original image and removes duplicates with greedy non-maximum
//! suppression. Scales can be decoded in parallel with the `rayon` feature.

mod trace;

pub mod anchors;
pub mod decode;
pub mod geometry;
pub mod labels;
pub mod lowlevel;
pub mod nms;
pub mod pipeline;
pub mod tensor;
pub mod util;

pub use anchors::{AnchorArity, AnchorTable, DEFAULT_ANCHORS};
pub use decode::{Detection, FrameGeometry, RegionLayer, RegionOutput, REGION_LAYER_TYPE};
pub use geometry::{iou, BBox};
pub use labels::LabelTable;
pub use nms::{NmsConfig, NmsMode};
pub use pipeline::{DetectConfig, Postprocessor};
pub use tensor::{TensorLayout, TensorView};
pub use util::{RegionError, RegionResult};
