//! Stride descriptors for region output tensors.
//!
//! A region output logically holds `num_anchors * entries` channels over a
//! `side x side` grid, where `entries = coords + 1 + classes`. Channel
//! `0..coords` are box parameters, `coords` is objectness and the rest are
//! per-class scores. The layout maps a logical `(anchor, channel, row, col)`
//! position to a flat buffer offset.

/// Element strides for the four logical tensor axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TensorLayout {
    /// Elements between consecutive anchors.
    pub anchor: usize,
    /// Elements between consecutive channels of one anchor.
    pub channel: usize,
    /// Elements between consecutive grid rows.
    pub row: usize,
    /// Elements between consecutive grid columns.
    pub col: usize,
}

impl TensorLayout {
    /// Planar `[anchor, channel, row, col]` layout, as produced by NCHW
    /// inference outputs.
    pub fn channel_major(side: usize, entries: usize) -> Self {
        let plane = side * side;
        Self {
            anchor: plane * entries,
            channel: plane,
            row: side,
            col: 1,
        }
    }

    /// Interleaved `[row, col, anchor, channel]` layout, as produced by NHWC
    /// inference outputs.
    pub fn channel_last(side: usize, num_anchors: usize, entries: usize) -> Self {
        let cell = num_anchors * entries;
        Self {
            anchor: entries,
            channel: 1,
            row: side * cell,
            col: cell,
        }
    }

    /// Flat offset of one logical element.
    #[inline]
    pub fn offset(&self, anchor: usize, channel: usize, row: usize, col: usize) -> usize {
        anchor * self.anchor + channel * self.channel + row * self.row + col * self.col
    }

    /// Flat offset of `entry` for a location flattened as
    /// `anchor * side * side + row * side + col`.
    #[inline]
    pub fn entry_index(&self, side: usize, location: usize, entry: usize) -> usize {
        let plane = side * side;
        let anchor = location / plane;
        let spatial = location % plane;
        self.offset(anchor, entry, spatial / side, spatial % side)
    }

    /// Smallest buffer length that covers every element of the tensor.
    ///
    /// Returns `None` when the shape is empty or the offset overflows.
    pub fn required_len(&self, num_anchors: usize, entries: usize, side: usize) -> Option<usize> {
        if num_anchors == 0 || entries == 0 || side == 0 {
            return None;
        }
        let last = [
            (num_anchors - 1, self.anchor),
            (entries - 1, self.channel),
            (side - 1, self.row),
            (side - 1, self.col),
        ]
        .iter()
        .try_fold(0usize, |acc, &(idx, stride)| {
            idx.checked_mul(stride).and_then(|v| acc.checked_add(v))
        })?;
        last.checked_add(1)
    }
}

/// Offset of `entry` for a flattened `location` in a channel-major tensor.
///
/// `location` packs `(anchor, cell)` as `anchor * side * side + cell`; the
/// result is `anchor * side² * (coords + 1 + classes) + entry * side² + cell`.
#[inline]
pub fn entry_index(
    side: usize,
    coords: usize,
    num_classes: usize,
    location: usize,
    entry: usize,
) -> usize {
    let plane = side * side;
    let anchor = location / plane;
    let spatial = location % plane;
    anchor * plane * (coords + num_classes + 1) + entry * plane + spatial
}
