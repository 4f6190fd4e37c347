#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for tensor factory operations.
///
/// Defines [`TensorOpsError`] for handling failures while building tensors.
pub mod error;

/// Tensor factories and element mapping.
///
/// Every function here is written against the [`strided_tensor::Tensor`] trait, so
/// it works for every representation and keeps the representation of its input.
pub mod ops;

pub use error::TensorOpsError;
pub use ops::{cast, create_from_diagonal, create_identity, create_identity_with, map};
