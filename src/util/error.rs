//! Error types for yolo-region.

use thiserror::Error;

/// Result alias for yolo-region operations.
pub type RegionResult<T> = std::result::Result<T, RegionError>;

/// Errors raised while decoding region outputs.
///
/// Every variant describes a model or configuration mismatch. These recur on
/// every frame, so the whole frame is abandoned instead of returning partial
/// detections.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RegionError {
    /// The output layer is not a region detection layer.
    #[error("layer {layer}: invalid output type {found}, RegionYolo expected")]
    UnsupportedLayerType { layer: String, found: String },
    /// Only single-image batches are decoded.
    #[error("layer {layer}: batch size must be 1, got {batch}")]
    InvalidBatch { layer: String, batch: usize },
    /// The output grid must be square.
    #[error("layer {layer}: grid height {height} must equal width {width}")]
    NonSquareGrid {
        layer: String,
        height: usize,
        width: usize,
    },
    /// Boxes are always described by four coordinates.
    #[error("layer {layer}: expected 4 box coordinates, got {coords}")]
    UnsupportedCoords { layer: String, coords: usize },
    /// The anchor list has neither the full (18) nor the tiny (12) arity.
    #[error("layer {layer}: unsupported anchor list of {len} values (expected 12 or 18)")]
    UnsupportedAnchorArity { layer: String, len: usize },
    /// The grid size has no anchor window for this anchor arity.
    #[error("layer {layer}: grid size {side} has no anchor window for {arity} anchor values")]
    UnmappedGridSize {
        layer: String,
        side: usize,
        arity: usize,
    },
    /// The anchor window runs past the end of the anchor list.
    #[error("layer {layer}: anchor value {index} out of range for {len} anchor values")]
    AnchorOutOfRange {
        layer: String,
        index: usize,
        len: usize,
    },
    /// The declared channel count disagrees with the layer attributes.
    #[error("layer {layer}: expected {expected} channels, got {got}")]
    ChannelMismatch {
        layer: String,
        expected: usize,
        got: usize,
    },
    /// The anchor and class counts do not fit a channel count.
    #[error("layer {layer}: anchor and class counts overflow the channel count")]
    ChannelOverflow { layer: String },
    /// The label table has fewer names than the layer has classes.
    #[error("layer {layer}: {classes} classes but only {labels} labels")]
    LabelTableTooShort {
        layer: String,
        classes: usize,
        labels: usize,
    },
    /// The tensor buffer is shorter than its declared shape requires.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The declared tensor shape is unusable.
    #[error("invalid tensor shape {dims:?}")]
    InvalidShape { dims: [usize; 4] },
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}
