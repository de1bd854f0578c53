//! Anchor tables and per-scale anchor windows.
//!
//! Anchors are stored flat as `w0, h0, w1, h1, ...` in input-resolution pixels.
//! Each detection scale reads a window of consecutive pairs starting at an
//! element offset chosen from the grid size: coarse grids use the largest
//! anchors.

use crate::util::{RegionError, RegionResult};

/// YOLOv3 COCO anchors, used when a layer declares none.
pub const DEFAULT_ANCHORS: [f32; 18] = [
    10.0, 13.0, 16.0, 30.0, 33.0, 23.0, 30.0, 61.0, 62.0, 45.0, 59.0, 119.0, 116.0, 90.0, 156.0,
    198.0, 373.0, 326.0,
];

/// Recognized anchor list sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorArity {
    /// 18 values: three anchors for each of the 13, 26 and 52 grids.
    Full,
    /// 12 values: three anchors for each of the 13 and 26 grids.
    Tiny,
}

impl AnchorArity {
    /// Classifies an anchor list by its number of values.
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            18 => Some(Self::Full),
            12 => Some(Self::Tiny),
            _ => None,
        }
    }

    /// Number of flat values in a table of this arity.
    pub fn value_count(self) -> usize {
        match self {
            Self::Full => 18,
            Self::Tiny => 12,
        }
    }

    /// Element offset of the anchor window for a grid size.
    pub fn offset_for_side(self, side: usize) -> Option<usize> {
        match (self, side) {
            (Self::Full, 13) => Some(2 * 6),
            (Self::Full, 26) => Some(2 * 3),
            (Self::Full, 52) => Some(0),
            (Self::Tiny, 13) => Some(2 * 3),
            (Self::Tiny, 26) => Some(0),
            _ => None,
        }
    }
}

/// Validated anchor list.
#[derive(Clone, Debug, PartialEq)]
pub struct AnchorTable {
    values: Vec<f32>,
    arity: AnchorArity,
}

impl AnchorTable {
    /// Builds a table from flat `(w, h)` values.
    ///
    /// `layer` names the owning output for error reporting.
    pub fn new(layer: &str, values: Vec<f32>) -> RegionResult<Self> {
        let arity =
            AnchorArity::from_len(values.len()).ok_or_else(|| RegionError::UnsupportedAnchorArity {
                layer: layer.to_owned(),
                len: values.len(),
            })?;
        Ok(Self { values, arity })
    }

    /// The YOLOv3 COCO table.
    pub fn coco() -> Self {
        Self {
            values: DEFAULT_ANCHORS.to_vec(),
            arity: AnchorArity::Full,
        }
    }

    /// Returns the arity of this table.
    pub fn arity(&self) -> AnchorArity {
        self.arity
    }

    /// Returns the flat values.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Resolves the anchor window for a grid of `side` cells holding
    /// `num_anchors` anchors.
    pub fn window(&self, layer: &str, side: usize, num_anchors: usize) -> RegionResult<&[f32]> {
        anchor_window(layer, &self.values, side, num_anchors)
    }
}

/// Resolves the anchor window of a flat anchor list for one grid size.
///
/// Fails when the list arity is unknown, the grid size has no window for that
/// arity, or the window runs past the end of the list.
pub fn anchor_window<'a>(
    layer: &str,
    values: &'a [f32],
    side: usize,
    num_anchors: usize,
) -> RegionResult<&'a [f32]> {
    let arity =
        AnchorArity::from_len(values.len()).ok_or_else(|| RegionError::UnsupportedAnchorArity {
            layer: layer.to_owned(),
            len: values.len(),
        })?;
    let offset = arity
        .offset_for_side(side)
        .ok_or_else(|| RegionError::UnmappedGridSize {
            layer: layer.to_owned(),
            side,
            arity: arity.value_count(),
        })?;
    let end = num_anchors
        .checked_mul(2)
        .and_then(|n| offset.checked_add(n));
    match end {
        Some(end) if end <= values.len() => Ok(&values[offset..end]),
        _ => Err(RegionError::AnchorOutOfRange {
            layer: layer.to_owned(),
            index: end.map_or(usize::MAX, |end| end - 1),
            len: values.len(),
        }),
    }
}
