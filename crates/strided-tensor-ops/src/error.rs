use strided_tensor::TensorError;
use thiserror::Error;

/// An error type for tensor factory operations.
#[derive(Error, Debug, PartialEq)]
pub enum TensorOpsError {
    /// The square side needed to hold the diagonal does not fit in `usize`.
    #[error("Diagonal of length {length} with offset {offset} overflows the tensor size")]
    OffsetOverflow {
        /// Length of the diagonal
        length: usize,
        /// Requested offset
        offset: isize,
    },

    /// An element cannot be represented in the target element type.
    #[error("Element at index {0} cannot be cast to the target type")]
    CastFailed(usize),

    /// Tensor error
    #[error("Error with the tensor: {0}")]
    TensorError(#[from] TensorError),
}
