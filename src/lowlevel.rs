//! Building blocks for custom postprocessing pipelines.
//!
//! These expose per-scale decoding, grid indexing and suppression directly.
//! Most users should prefer [`Postprocessor`](crate::Postprocessor).

pub use crate::anchors::anchor_window;
pub use crate::decode::{decode_region, decode_region_vec};
pub use crate::nms::{sort_detections_desc, suppress, suppress_in_place};
pub use crate::tensor::entry_index;
