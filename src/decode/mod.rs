//! Region output decoding.
//!
//! A region output is one detection scale of a YOLOv3-family network. Each
//! grid cell predicts, for every anchor, four box parameters, an objectness
//! score and one score per class. Decoding thresholds the objectness, converts
//! anchor-relative predictions into boxes and rescales them from the network
//! input resolution to the original image.

mod detection;
mod region;

pub use detection::Detection;
pub use region::{decode_region, decode_region_vec};

use crate::anchors::DEFAULT_ANCHORS;
use crate::tensor::{TensorLayout, TensorView};
use crate::util::{RegionError, RegionResult};

/// Layer type string of decodable region outputs.
pub const REGION_LAYER_TYPE: &str = "RegionYolo";

/// Attributes of one region output layer.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionLayer {
    /// Output name, used in error messages.
    pub name: String,
    /// Layer type reported by the inference engine.
    pub layer_type: String,
    /// Declared anchor count.
    pub num: usize,
    /// Explicit anchor mask; its length overrides `num`.
    pub mask: Option<Vec<usize>>,
    /// Box coordinates per anchor.
    pub coords: usize,
    /// Number of classes.
    pub classes: usize,
    /// Flat anchor list; `None` selects the COCO defaults.
    pub anchors: Option<Vec<f32>>,
}

impl RegionLayer {
    /// Creates a region layer with three anchors, four coordinates and the
    /// default anchor table.
    pub fn new(name: impl Into<String>, classes: usize) -> Self {
        Self {
            name: name.into(),
            layer_type: REGION_LAYER_TYPE.to_owned(),
            num: 3,
            mask: None,
            coords: 4,
            classes,
            anchors: None,
        }
    }

    pub fn with_layer_type(mut self, layer_type: impl Into<String>) -> Self {
        self.layer_type = layer_type.into();
        self
    }

    pub fn with_num(mut self, num: usize) -> Self {
        self.num = num;
        self
    }

    pub fn with_mask(mut self, mask: Vec<usize>) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn with_coords(mut self, coords: usize) -> Self {
        self.coords = coords;
        self
    }

    pub fn with_anchors(mut self, anchors: Vec<f32>) -> Self {
        self.anchors = Some(anchors);
        self
    }

    /// Anchors per grid cell: the mask length when present, else `num`.
    pub fn num_anchors(&self) -> usize {
        match &self.mask {
            Some(mask) => mask.len(),
            None => self.num,
        }
    }

    /// Channels per anchor: box coordinates, objectness and class scores.
    ///
    /// Returns `None` when the sum overflows.
    pub fn entries(&self) -> Option<usize> {
        self.coords.checked_add(1)?.checked_add(self.classes)
    }

    /// Flat anchor list in effect for this layer.
    pub fn anchor_values(&self) -> &[f32] {
        self.anchors.as_deref().unwrap_or(&DEFAULT_ANCHORS[..])
    }
}

/// Network input and original image sizes for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameGeometry {
    /// Network input height.
    pub resized_height: usize,
    /// Network input width.
    pub resized_width: usize,
    /// Source image height.
    pub original_height: usize,
    /// Source image width.
    pub original_width: usize,
}

impl FrameGeometry {
    pub fn new(
        resized_height: usize,
        resized_width: usize,
        original_height: usize,
        original_width: usize,
    ) -> Self {
        Self {
            resized_height,
            resized_width,
            original_height,
            original_width,
        }
    }

    /// Rejects zero-sized inputs or images.
    pub fn validate(&self) -> RegionResult<()> {
        if self.resized_height == 0 || self.resized_width == 0 {
            return Err(RegionError::InvalidInput("resized size must be non-zero"));
        }
        if self.original_height == 0 || self.original_width == 0 {
            return Err(RegionError::InvalidInput("original size must be non-zero"));
        }
        Ok(())
    }

    /// Returns `(h_ratio, w_ratio)` from resized-input to original pixels.
    ///
    /// The quotients are taken in `f32` and then widened, so corner
    /// truncation matches decoders that keep the scale in single precision.
    pub fn ratios(&self) -> (f64, f64) {
        (
            (self.original_height as f32 / self.resized_height as f32) as f64,
            (self.original_width as f32 / self.resized_width as f32) as f64,
        )
    }
}

/// One raw output tensor with its layer attributes.
#[derive(Clone, Copy, Debug)]
pub struct RegionOutput<'a> {
    layer: &'a RegionLayer,
    tensor: TensorView<'a>,
    layout: Option<TensorLayout>,
}

impl<'a> RegionOutput<'a> {
    /// Pairs a tensor with its layer; memory order defaults to channel-major.
    pub fn new(layer: &'a RegionLayer, tensor: TensorView<'a>) -> Self {
        Self {
            layer,
            tensor,
            layout: None,
        }
    }

    /// Overrides the memory layout of the tensor.
    pub fn with_layout(mut self, layout: TensorLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn layer(&self) -> &'a RegionLayer {
        self.layer
    }

    pub fn tensor(&self) -> TensorView<'a> {
        self.tensor
    }

    /// Layout in effect for a grid of `side` cells with `entries` channels
    /// per anchor.
    pub fn layout(&self, side: usize, entries: usize) -> TensorLayout {
        self.layout
            .unwrap_or_else(|| TensorLayout::channel_major(side, entries))
    }
}
