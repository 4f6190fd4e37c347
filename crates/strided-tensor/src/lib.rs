#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `strided-tensor` stores n-dimensional arrays of any rank in one of three
//! representations that share a single indexing model: every element is
//! addressed by a linear offset derived from its coordinates and a stride vector.
//! The stride vector is row-major or column-major depending on a per-tensor layout
//! flag.
//!
//! # Architecture
//!
//! - **index**: pure conversions between coordinates and linear offsets
//! - **TensorShape**: validated dimensions, strides and layout flag
//! - **Tensor**: the trait every representation implements; shared algorithms such
//!   as diagonals, triangles, structural comparison and conversions are provided
//!   methods written against it
//! - **DenseTensor**: one contiguous copy-on-write buffer, with borrowed
//!   [`DenseView`]s for aliasing reshapes
//! - **SparseTensor**: a map from linear offset to non-zero value
//! - **CompressedSparseTensor**: compressed buckets along one axis, the
//!   n-dimensional analogue of CSR/CSC
//! - **AnyTensor**: a runtime choice between the three
//!
//! # Quick Start
//!
//! ```rust
//! use strided_tensor::{DenseTensor, Tensor, TensorError};
//!
//! let t = DenseTensor::from_shape_vec(&[3, 3], (1..=9).collect::<Vec<i32>>(), false)?;
//! assert_eq!(t.get_diagonal(0)?.to_vec(), vec![1, 5, 9]);
//!
//! // the same content, column-major and compressed
//! let c = DenseTensor::from_shape_fn(&[3, 3], true, |i| (i[0] * 3 + i[1] + 1) as i32)?
//!     .to_compressed_sparse();
//! assert!(c.structural_eq(&t)?);
//! assert_eq!(c.get_upper_triangle(1)?.non_zero_count(), 3);
//! # Ok::<(), TensorError>(())
//! ```
//!
//! Native arrays come from `ndarray`:
//!
//! ```rust
//! use ndarray::arr2;
//! use strided_tensor::{SparseTensor, Tensor};
//!
//! let array = arr2(&[[0.0, 1.5], [0.0, 0.0]]);
//! let t = SparseTensor::from_array(&array, false).unwrap();
//! assert_eq!(t.non_zero_count(), 1);
//! assert_eq!(t.to_ndarray().unwrap(), array.into_dyn());
//! ```

/// Runtime selection between tensor representations.
pub mod any;

/// Compressed-sparse tensors.
pub mod compressed;

/// Dense tensors backed by a contiguous buffer.
pub mod dense;

/// Nested-brace rendering.
pub mod display;

/// Element kinds storable in a tensor.
pub mod element;

/// Index arithmetic shared by all representations.
pub mod index;

/// Tensor shapes.
pub mod shape;

/// Sparse tensors backed by a map.
pub mod sparse;

/// Reference-counted buffers for dense tensors.
pub mod storage;

/// The tensor trait and error type.
pub mod tensor;

/// Borrowed views into dense tensors.
pub mod view;

pub use crate::any::{AnyTensor, TensorKind};
pub use crate::compressed::CompressedSparseTensor;
pub use crate::dense::DenseTensor;
pub use crate::display::DisplayOptions;
pub use crate::element::{Element, HasOne};
pub use crate::shape::TensorShape;
pub use crate::sparse::SparseTensor;
pub use crate::tensor::{Tensor, TensorError, TensorIter};
pub use crate::view::{DenseView, DenseViewMut};
