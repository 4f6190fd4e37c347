use std::cmp::Ordering;
use std::marker::PhantomData;

use ndarray::{ArrayBase, ArrayD, Data, Dimension, IxDyn};
use thiserror::Error;

use crate::{
    compressed::CompressedSparseTensor,
    dense::DenseTensor,
    display::{array_string, DisplayOptions},
    element::Element,
    index::{compute_strides, coordinates_into, linear_index, transform_index},
    shape::TensorShape,
    sparse::SparseTensor,
};

/// Error type for tensor operations.
///
/// Every variant describes a violated calling contract. Nothing here is transient:
/// retrying the same call with the same arguments fails the same way.
#[derive(Error, Debug, PartialEq)]
pub enum TensorError {
    /// The dimension list has no axis.
    #[error("Invalid shape: a tensor needs at least one dimension")]
    EmptyShape,

    /// A dimension is not a positive size.
    #[error("Invalid shape: dimension {axis} has size {size}, sizes must be positive")]
    NonPositiveDimension {
        /// The offending axis.
        axis: usize,
        /// Its size.
        size: usize,
    },

    /// The product of the dimensions does not fit in `usize`.
    #[error("Invalid shape: element count of {0:?} overflows")]
    ElementCountOverflow(Vec<usize>),

    /// Supplied data does not match the number of elements the shape implies.
    ///
    /// # Example
    /// ```ignore
    /// // Error: shape [2, 3] expects 6 elements, but got 5
    /// let tensor = DenseTensor::from_shape_vec(&[2, 3], vec![1, 2, 3, 4, 5], false)?;
    /// ```
    #[error("Shape mismatch: expected {expected} elements for shape, but got {actual} elements in data")]
    InvalidShape {
        /// Expected number of elements based on shape
        expected: usize,
        /// Actual number of elements in the data
        actual: usize,
    },

    /// A linear index is outside `[0, length)`.
    #[error("Index {index} out of bounds for tensor of length {size}")]
    IndexOutOfBounds {
        /// The invalid index that was attempted
        index: usize,
        /// The number of elements of the tensor
        size: usize,
    },

    /// A coordinate is outside the bounds of its axis.
    #[error("Index {index} out of bounds for dimension {axis} of size {size}")]
    AxisOutOfBounds {
        /// The axis being indexed
        axis: usize,
        /// The invalid coordinate
        index: usize,
        /// The size of the axis
        size: usize,
    },

    /// Two ranks that must agree differ.
    #[error("Rank mismatch: expected rank {expected}, got {actual}")]
    RankMismatch {
        /// Rank of the tensor the operation was called on
        expected: usize,
        /// Rank of the other operand
        actual: usize,
    },

    /// Tensor dimensions incompatible for the requested operation.
    ///
    /// Raised by structural equality and comparison when an axis size differs.
    #[error("Dimension mismatch: {message}. Expected shape: {expected}, got: {actual}")]
    DimensionMismatch {
        /// Human-readable description of the mismatch
        message: String,
        /// Expected shape description
        expected: String,
        /// Actual shape description
        actual: String,
    },

    /// Reshape to a shape with a different element count.
    #[error("Cannot reshape a tensor of {current} elements into {requested} elements")]
    ReshapeSizeMismatch {
        /// Current element count
        current: usize,
        /// Element count of the requested shape
        requested: usize,
    },

    /// The requested diagonal does not intersect the first two axes.
    #[error("Cannot compute diagonal with offset {offset} of a {rows}x{columns} tensor")]
    InvalidDiagonal {
        /// The requested offset
        offset: isize,
        /// Size of axis 0
        rows: usize,
        /// Size of axis 1
        columns: usize,
    },

    /// Caller-supplied backing buffers are inconsistent.
    #[error("Invalid storage: {0}")]
    InvalidStorage(String),

    /// Operation not supported for this tensor configuration.
    #[error("Unsupported operation: {operation} - {reason}")]
    UnsupportedOperation {
        /// Name of the operation that failed
        operation: String,
        /// Reason why the operation is not supported
        reason: String,
    },

    /// Conversion into an ndarray failed.
    #[error("Array conversion failed: {0}")]
    ArrayError(String),
}

impl TensorError {
    /// Creates an InvalidShape error with clear context.
    pub fn invalid_shape(expected: usize, actual: usize) -> Self {
        Self::InvalidShape { expected, actual }
    }

    /// Creates an IndexOutOfBounds error with clear context.
    pub fn index_out_of_bounds(index: usize, size: usize) -> Self {
        Self::IndexOutOfBounds { index, size }
    }

    /// Creates a DimensionMismatch error with formatted shapes.
    pub fn dimension_mismatch(
        message: impl Into<String>,
        expected: &[usize],
        actual: &[usize],
    ) -> Self {
        Self::DimensionMismatch {
            message: message.into(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }

    /// Creates an UnsupportedOperation error with context.
    pub fn unsupported_operation(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if the error comes from an invalid dimension list.
    pub fn is_invalid_shape(&self) -> bool {
        matches!(
            self,
            Self::EmptyShape | Self::NonPositiveDimension { .. } | Self::ElementCountOverflow(_)
        )
    }

    /// Returns a user-friendly suggestion for resolving the error.
    pub fn suggestion(&self) -> &str {
        match self {
            Self::EmptyShape | Self::NonPositiveDimension { .. } => {
                "Pass at least one dimension and make every dimension greater than zero"
            }
            Self::ElementCountOverflow(_) => "Reduce the tensor dimensions",
            Self::InvalidShape { .. } => {
                "Ensure the product of shape dimensions equals the number of data elements"
            }
            Self::IndexOutOfBounds { .. } | Self::AxisOutOfBounds { .. } => {
                "Verify indices are within bounds (0 <= index < dimension_size)"
            }
            Self::RankMismatch { .. } | Self::DimensionMismatch { .. } => {
                "Check that both operands have the same dimensions"
            }
            Self::ReshapeSizeMismatch { .. } => {
                "The new dimensions must describe the same number of elements"
            }
            Self::InvalidDiagonal { .. } => {
                "Use an offset whose absolute value is smaller than the matching axis"
            }
            Self::InvalidStorage(_) => {
                "Check buffer lengths, compressed counts and index ordering of the supplied storage"
            }
            Self::UnsupportedOperation { .. } => {
                "Check API documentation for operation requirements and supported configurations"
            }
            Self::ArrayError(_) => "Check the array dimensions",
        }
    }
}

/// Maps a linear index of `source` to the index of the same coordinates in `target`.
///
/// Both shapes must have the same dimensions.
#[inline]
pub(crate) fn corresponding_index(index: usize, source: &TensorShape, target: &TensorShape) -> usize {
    if source.is_reversed_stride() == target.is_reversed_stride() {
        index
    } else {
        transform_index(
            index,
            source.strides(),
            source.is_reversed_stride(),
            target.strides(),
        )
    }
}

/// The contract shared by every tensor representation.
///
/// Implementors provide storage-specific element access, construction of empty
/// tensors and reshape. Everything else (diagonals, triangles, structural
/// comparison, enumeration, conversions, rendering) is written once here against
/// that small core.
///
/// # Example
///
/// ```
/// use strided_tensor::{DenseTensor, Tensor, TensorError};
///
/// let mut t = DenseTensor::<i32>::new(&[2, 2], false)?;
/// t.set(&[1, 1], 4)?;
/// assert_eq!(t.get_value(3)?, 4);
///
/// let sparse = t.to_sparse();
/// assert_eq!(sparse.non_zero_count(), 1);
/// assert!(sparse.structural_eq(&t)?);
/// # Ok::<(), TensorError>(())
/// ```
pub trait Tensor<T: Element>: Clone {
    /// The same representation holding another element type.
    type Like<U: Element>: Tensor<U>;

    /// Returns the shape of the tensor.
    fn shape(&self) -> &TensorShape;

    /// Gets the element at a linear index.
    ///
    /// # Errors
    ///
    /// Fails if `index` is not in `[0, len)`.
    fn get_value(&self, index: usize) -> Result<T, TensorError>;

    /// Sets the element at a linear index.
    ///
    /// # Errors
    ///
    /// Fails if `index` is not in `[0, len)`.
    fn set_value(&mut self, index: usize, value: T) -> Result<(), TensorError>;

    /// Sets every element to `value`.
    fn fill(&mut self, value: T);

    /// Creates a zero-filled tensor of the same representation and layout flag with
    /// the given dimensions and element type.
    fn clone_empty_as<U: Element>(
        &self,
        dimensions: &[usize],
    ) -> Result<Self::Like<U>, TensorError>;

    /// Reinterprets the content under new dimensions.
    ///
    /// The element at a given linear offset before the reshape is the element at the
    /// same linear offset after it.
    ///
    /// # Errors
    ///
    /// Fails with [`TensorError::ReshapeSizeMismatch`] if the element counts differ.
    fn reshape(&self, dimensions: &[usize]) -> Result<Self, TensorError>;

    /// Returns the size of every axis.
    #[inline]
    fn dimensions(&self) -> &[usize] {
        self.shape().dimensions()
    }

    /// Returns the strides of every axis.
    #[inline]
    fn strides(&self) -> &[usize] {
        self.shape().strides()
    }

    /// Returns the number of axes.
    #[inline]
    fn rank(&self) -> usize {
        self.shape().rank()
    }

    /// Returns the total number of elements.
    #[inline]
    fn len(&self) -> usize {
        self.shape().len()
    }

    /// Returns true if the tensor has no element, which a valid shape never allows.
    #[inline]
    fn is_empty(&self) -> bool {
        self.shape().is_empty()
    }

    /// Returns true for column-major layout.
    #[inline]
    fn is_reversed_stride(&self) -> bool {
        self.shape().is_reversed_stride()
    }

    /// Returns the number of elements different from zero.
    fn non_zero_count(&self) -> usize {
        self.iter().filter(|v| !v.is_zero()).count()
    }

    /// Gets the element at a coordinate set.
    ///
    /// # Errors
    ///
    /// Fails if the coordinate count differs from the rank or a coordinate is out of
    /// its axis.
    fn get(&self, indices: &[usize]) -> Result<T, TensorError> {
        let index = self.shape().index_of(indices)?;
        self.get_value(index)
    }

    /// Sets the element at a coordinate set.
    ///
    /// # Errors
    ///
    /// Fails if the coordinate count differs from the rank or a coordinate is out of
    /// its axis.
    fn set(&mut self, indices: &[usize], value: T) -> Result<(), TensorError> {
        let index = self.shape().index_of(indices)?;
        self.set_value(index, value)
    }

    /// Creates a zero-filled tensor with the same shape.
    fn clone_empty(&self) -> Result<Self::Like<T>, TensorError> {
        self.clone_empty_as::<T>(self.dimensions())
    }

    /// Creates a zero-filled tensor with other dimensions.
    fn clone_empty_with(&self, dimensions: &[usize]) -> Result<Self::Like<T>, TensorError> {
        self.clone_empty_as::<T>(dimensions)
    }

    /// Returns an iterator over the elements in linear order.
    ///
    /// The iterator is lazy and restartable: calling `iter` again starts over.
    fn iter(&self) -> TensorIter<'_, T, Self> {
        TensorIter::new(self)
    }

    /// Collects the elements in linear order.
    fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Returns true if any element equals `value`.
    fn contains(&self, value: &T) -> bool {
        self.iter().any(|v| v == *value)
    }

    /// Returns the linear index of the first element equal to `value`.
    fn index_of(&self, value: &T) -> Option<usize> {
        self.iter().position(|v| v == *value)
    }

    /// Copies the elements in linear order into the start of `dest`.
    ///
    /// # Errors
    ///
    /// Fails if `dest` is shorter than the tensor.
    fn copy_to(&self, dest: &mut [T]) -> Result<(), TensorError> {
        if dest.len() < self.len() {
            return Err(TensorError::invalid_shape(self.len(), dest.len()));
        }
        for (slot, value) in dest.iter_mut().zip(self.iter()) {
            *slot = value;
        }
        Ok(())
    }

    /// Extracts a diagonal over the first two axes.
    ///
    /// `offset` 0 selects the main diagonal, positive offsets select diagonals above
    /// it and negative offsets below it. The result has rank `rank - 1`: its first
    /// axis runs along the diagonal and the remaining axes are copied from axes
    /// `2..` of the source.
    ///
    /// # Errors
    ///
    /// Fails for rank < 2 and when the diagonal would be empty.
    ///
    /// # Example
    ///
    /// ```
    /// use strided_tensor::{DenseTensor, Tensor};
    ///
    /// let t = DenseTensor::from_shape_vec(&[3, 3], (1..=9).collect(), false).unwrap();
    /// assert_eq!(t.get_diagonal(0).unwrap().to_vec(), vec![1, 5, 9]);
    /// assert_eq!(t.get_diagonal(1).unwrap().to_vec(), vec![2, 6]);
    /// assert_eq!(t.get_diagonal(-2).unwrap().to_vec(), vec![7]);
    /// ```
    fn get_diagonal(&self, offset: isize) -> Result<Self::Like<T>, TensorError> {
        let dims = self.dimensions();
        if dims.len() < 2 {
            return Err(TensorError::unsupported_operation(
                "get_diagonal",
                format!("requires rank >= 2, got rank {}", dims.len()),
            ));
        }

        let row_shift = offset.min(0).unsigned_abs();
        let column_shift = offset.max(0).unsigned_abs();
        let length = dims[0]
            .saturating_sub(row_shift)
            .min(dims[1].saturating_sub(column_shift));
        if length == 0 {
            return Err(TensorError::InvalidDiagonal {
                offset,
                rows: dims[0],
                columns: dims[1],
            });
        }

        let mut out_dims = Vec::with_capacity(dims.len() - 1);
        out_dims.push(length);
        out_dims.extend_from_slice(&dims[2..]);
        let mut diagonal = self.clone_empty_with(&out_dims)?;

        let strides = self.strides();
        let mut out_coords = vec![0; out_dims.len()];
        for out_index in 0..diagonal.len() {
            coordinates_into(
                diagonal.strides(),
                diagonal.is_reversed_stride(),
                out_index,
                &mut out_coords,
            );
            let i = out_coords[0];
            let source = (i + row_shift) * strides[0]
                + (i + column_shift) * strides[1]
                + linear_index(&strides[2..], &out_coords[1..]);
            let value = self.get_value(source)?;
            if !value.is_zero() {
                diagonal.set_value(out_index, value)?;
            }
        }
        Ok(diagonal)
    }

    /// Returns a same-shape tensor keeping one triangle of the first two axes and
    /// zero elsewhere.
    ///
    /// The lower triangle keeps entries with `column - row <= offset`, the upper
    /// triangle keeps entries with `column - row >= offset`. Remaining axes are
    /// carried along.
    ///
    /// # Errors
    ///
    /// Fails for rank < 2.
    fn get_triangle(&self, offset: isize, upper: bool) -> Result<Self::Like<T>, TensorError> {
        let rank = self.rank();
        if rank < 2 {
            return Err(TensorError::unsupported_operation(
                if upper {
                    "get_upper_triangle"
                } else {
                    "get_lower_triangle"
                },
                format!("requires rank >= 2, got rank {rank}"),
            ));
        }

        let mut triangle = self.clone_empty()?;
        let strides = self.strides();
        let reverse_stride = self.is_reversed_stride();
        let mut coords = vec![0; rank];
        for index in 0..self.len() {
            coordinates_into(strides, reverse_stride, index, &mut coords);
            let distance = coords[1] as isize - coords[0] as isize;
            let keep = if upper {
                distance >= offset
            } else {
                distance <= offset
            };
            if keep {
                let value = self.get_value(index)?;
                if !value.is_zero() {
                    triangle.set_value(index, value)?;
                }
            }
        }
        Ok(triangle)
    }

    /// Returns the lower triangle, see [`Tensor::get_triangle`].
    fn get_lower_triangle(&self, offset: isize) -> Result<Self::Like<T>, TensorError> {
        self.get_triangle(offset, false)
    }

    /// Returns the upper triangle, see [`Tensor::get_triangle`].
    fn get_upper_triangle(&self, offset: isize) -> Result<Self::Like<T>, TensorError> {
        self.get_triangle(offset, true)
    }

    /// Compares two tensors element by element.
    ///
    /// Tensors with different layout flags are compared coordinate by coordinate.
    ///
    /// # Errors
    ///
    /// Fails if the ranks or any dimension differ.
    fn structural_eq<O: Tensor<T>>(&self, other: &O) -> Result<bool, TensorError> {
        self.shape().ensure_same_dimensions(other.dimensions())?;
        let mut equal = true;
        for index in 0..self.len() {
            let other_index = corresponding_index(index, self.shape(), other.shape());
            equal &= self.get_value(index)? == other.get_value(other_index)?;
        }
        Ok(equal)
    }

    /// Orders two tensors by the first differing element.
    ///
    /// # Errors
    ///
    /// Fails if the ranks or any dimension differ.
    fn compare_by<O, F>(&self, other: &O, mut compare: F) -> Result<Ordering, TensorError>
    where
        O: Tensor<T>,
        F: FnMut(&T, &T) -> Ordering,
    {
        self.shape().ensure_same_dimensions(other.dimensions())?;
        for index in 0..self.len() {
            let other_index = corresponding_index(index, self.shape(), other.shape());
            let ordering = compare(&self.get_value(index)?, &other.get_value(other_index)?);
            if ordering != Ordering::Equal {
                return Ok(ordering);
            }
        }
        Ok(Ordering::Equal)
    }

    /// Orders two tensors by the first differing element using `PartialOrd`.
    ///
    /// Returns `None` at the first pair of incomparable elements.
    fn partial_compare<O: Tensor<T>>(&self, other: &O) -> Result<Option<Ordering>, TensorError>
    where
        T: PartialOrd,
    {
        self.shape().ensure_same_dimensions(other.dimensions())?;
        for index in 0..self.len() {
            let other_index = corresponding_index(index, self.shape(), other.shape());
            match self
                .get_value(index)?
                .partial_cmp(&other.get_value(other_index)?)
            {
                Some(Ordering::Equal) => continue,
                ordering => return Ok(ordering),
            }
        }
        Ok(Some(Ordering::Equal))
    }

    /// Compares the tensor with an ndarray element by element.
    ///
    /// # Errors
    ///
    /// Fails if the ranks or any dimension differ.
    fn structural_eq_array<S, D>(&self, array: &ArrayBase<S, D>) -> Result<bool, TensorError>
    where
        S: Data<Elem = T>,
        D: Dimension,
    {
        let mut equal = true;
        for_each_array_pair(self, array, |a, b| {
            equal &= a == *b;
            true
        })?;
        Ok(equal)
    }

    /// Orders the tensor against an ndarray by the first differing element.
    ///
    /// # Errors
    ///
    /// Fails if the ranks or any dimension differ.
    fn compare_array_by<S, D, F>(
        &self,
        array: &ArrayBase<S, D>,
        mut compare: F,
    ) -> Result<Ordering, TensorError>
    where
        S: Data<Elem = T>,
        D: Dimension,
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut result = Ordering::Equal;
        for_each_array_pair(self, array, |a, b| {
            result = compare(&a, b);
            result == Ordering::Equal
        })?;
        Ok(result)
    }

    /// Converts into a dense tensor with the same shape and layout flag.
    fn to_dense(&self) -> DenseTensor<T> {
        log::debug!("converting tensor {:?} to dense", self.dimensions());
        DenseTensor::from_parts(self.shape().clone(), self.to_vec())
    }

    /// Converts into a sparse tensor with the same shape and layout flag.
    fn to_sparse(&self) -> SparseTensor<T> {
        log::debug!("converting tensor {:?} to sparse", self.dimensions());
        SparseTensor::from_entries(
            self.shape().clone(),
            self.iter().enumerate().filter(|(_, v)| !v.is_zero()),
        )
    }

    /// Converts into a compressed-sparse tensor with the same shape and layout flag.
    fn to_compressed_sparse(&self) -> CompressedSparseTensor<T> {
        log::debug!(
            "converting tensor {:?} to compressed sparse",
            self.dimensions()
        );
        CompressedSparseTensor::from_sorted_entries(
            self.shape().clone(),
            self.iter().enumerate().filter(|(_, v)| !v.is_zero()),
        )
    }

    /// Converts into a row-major ndarray with the same dimensions.
    ///
    /// # Errors
    ///
    /// Fails if ndarray rejects the dimensions.
    fn to_ndarray(&self) -> Result<ArrayD<T>, TensorError> {
        let shape = self.shape();
        let data = if shape.is_reversed_stride() {
            let row_major = compute_strides(shape.dimensions(), false);
            (0..shape.len())
                .map(|i| self.get_value(transform_index(i, &row_major, false, shape.strides())))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            self.to_vec()
        };
        ArrayD::from_shape_vec(IxDyn(shape.dimensions()), data)
            .map_err(|e| TensorError::ArrayError(e.to_string()))
    }

    /// Renders the content as nested braces, see [`DisplayOptions`].
    fn to_array_string(&self, options: &DisplayOptions) -> String
    where
        T: std::fmt::Display,
    {
        array_string(self, options)
    }
}

/// Visits `(tensor value, array value)` pairs in the tensor's linear order until
/// `visit` returns false.
fn for_each_array_pair<T, X, S, D, F>(
    tensor: &X,
    array: &ArrayBase<S, D>,
    mut visit: F,
) -> Result<(), TensorError>
where
    T: Element,
    X: Tensor<T>,
    S: Data<Elem = T>,
    D: Dimension,
    F: FnMut(T, &T) -> bool,
{
    let shape = tensor.shape();
    shape.ensure_same_dimensions(array.shape())?;
    let array = array.view().into_dyn();
    let mut coords = vec![0; shape.rank()];
    for index in 0..shape.len() {
        coordinates_into(shape.strides(), shape.is_reversed_stride(), index, &mut coords);
        let expected = array
            .get(coords.as_slice())
            .ok_or_else(|| TensorError::index_out_of_bounds(index, shape.len()))?;
        if !visit(tensor.get_value(index)?, expected) {
            break;
        }
    }
    Ok(())
}

/// A lazy iterator over the elements of a tensor in linear order.
///
/// Created by [`Tensor::iter`]. Mutating the tensor while iterating is prevented by
/// the borrow.
pub struct TensorIter<'a, T, X> {
    tensor: &'a X,
    front: usize,
    back: usize,
    _element: PhantomData<T>,
}

impl<'a, T: Element, X: Tensor<T>> TensorIter<'a, T, X> {
    fn new(tensor: &'a X) -> Self {
        Self {
            tensor,
            front: 0,
            back: tensor.len(),
            _element: PhantomData,
        }
    }
}

impl<T, X> Clone for TensorIter<'_, T, X> {
    fn clone(&self) -> Self {
        Self {
            tensor: self.tensor,
            front: self.front,
            back: self.back,
            _element: PhantomData,
        }
    }
}

impl<T: Element, X: Tensor<T>> Iterator for TensorIter<'_, T, X> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front >= self.back {
            return None;
        }
        let value = self.tensor.get_value(self.front).ok();
        self.front += 1;
        value
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T: Element, X: Tensor<T>> DoubleEndedIterator for TensorIter<'_, T, X> {
    fn next_back(&mut self) -> Option<T> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.tensor.get_value(self.back).ok()
    }
}

impl<T: Element, X: Tensor<T>> ExactSizeIterator for TensorIter<'_, T, X> {}
