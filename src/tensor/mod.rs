//! Borrowed views over raw inference output tensors.
//!
//! `TensorView` pairs a flat `f32` buffer with its declared
//! `[batch, channels, height, width]` dimensions. The dimensions are logical;
//! the memory order of a region output is described separately by a
//! [`TensorLayout`].

use crate::util::{RegionError, RegionResult};

mod layout;

pub use layout::{entry_index, TensorLayout};

/// Borrowed f32 tensor with declared NCHW dimensions.
#[derive(Copy, Clone, Debug)]
pub struct TensorView<'a> {
    data: &'a [f32],
    dims: [usize; 4],
}

impl<'a> TensorView<'a> {
    /// Creates a view, checking the buffer holds every declared element.
    pub fn new(data: &'a [f32], dims: [usize; 4]) -> RegionResult<Self> {
        let needed = dims
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or(RegionError::InvalidShape { dims })?;
        if needed == 0 {
            return Err(RegionError::InvalidShape { dims });
        }
        if data.len() < needed {
            return Err(RegionError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self { data, dims })
    }

    /// Returns the declared `[batch, channels, height, width]` dimensions.
    pub fn dims(&self) -> [usize; 4] {
        self.dims
    }

    /// Returns the batch size.
    pub fn batch(&self) -> usize {
        self.dims[0]
    }

    /// Returns the channel count.
    pub fn channels(&self) -> usize {
        self.dims[1]
    }

    /// Returns the grid height.
    pub fn height(&self) -> usize {
        self.dims[2]
    }

    /// Returns the grid width.
    pub fn width(&self) -> usize {
        self.dims[3]
    }

    /// Returns the backing buffer.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Returns the element at a flat offset, if in bounds.
    pub fn get(&self, offset: usize) -> Option<f32> {
        self.data.get(offset).copied()
    }
}
