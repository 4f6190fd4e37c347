use ndarray::{ArrayBase, Data, Dimension};

use crate::{
    element::Element,
    index::coordinates_into,
    shape::TensorShape,
    storage::TensorStorage,
    tensor::{Tensor, TensorError},
    view::{DenseView, DenseViewMut},
};

/// A tensor storing every element in one contiguous buffer.
///
/// The buffer position of an element is its linear index under the tensor's strides.
/// Clones and reshapes share the buffer until one of them is written, see
/// [`TensorStorage`]. Use [`DenseTensor::view_mut`] to write through a reshaped
/// alias into the same buffer.
///
/// # Example
///
/// ```
/// use strided_tensor::{DenseTensor, Tensor};
///
/// let t = DenseTensor::from_shape_vec(&[2, 3], vec![1, 2, 3, 4, 5, 6], false).unwrap();
/// assert_eq!(t.get(&[1, 0]).unwrap(), 4);
///
/// let r = t.reshape(&[3, 2]).unwrap();
/// assert_eq!(r.get(&[1, 0]).unwrap(), 3);
/// assert!(r.shares_buffer_with(&t));
/// ```
#[derive(Clone, Debug)]
pub struct DenseTensor<T> {
    storage: TensorStorage<T>,
    shape: TensorShape,
}

impl<T: Element> DenseTensor<T> {
    /// Creates a zero-filled tensor.
    ///
    /// # Arguments
    ///
    /// * `dimensions` - The size of every axis.
    /// * `reverse_stride` - `true` for column-major layout.
    ///
    /// # Errors
    ///
    /// Fails if the dimensions are invalid.
    pub fn new(dimensions: &[usize], reverse_stride: bool) -> Result<Self, TensorError> {
        Self::from_shape_val(dimensions, T::zero(), reverse_stride)
    }

    /// Creates a tensor with every element set to `value`.
    ///
    /// # Example
    ///
    /// ```
    /// use strided_tensor::DenseTensor;
    ///
    /// let t = DenseTensor::from_shape_val(&[2, 1, 3], 2u8, false).unwrap();
    /// assert_eq!(t.as_slice(), &[2, 2, 2, 2, 2, 2]);
    /// ```
    pub fn from_shape_val(
        dimensions: &[usize],
        value: T,
        reverse_stride: bool,
    ) -> Result<Self, TensorError> {
        let shape = TensorShape::new(dimensions, reverse_stride)?;
        let data = vec![value; shape.len()];
        Ok(Self::from_parts(shape, data))
    }

    /// Creates a tensor over caller-supplied data, laid out in the linear order the
    /// layout flag implies.
    ///
    /// # Errors
    ///
    /// If the number of elements in the data does not match the shape of the tensor,
    /// an error is returned.
    pub fn from_shape_vec(
        dimensions: &[usize],
        data: Vec<T>,
        reverse_stride: bool,
    ) -> Result<Self, TensorError> {
        let shape = TensorShape::new(dimensions, reverse_stride)?;
        if shape.len() != data.len() {
            return Err(TensorError::invalid_shape(shape.len(), data.len()));
        }
        Ok(Self::from_parts(shape, data))
    }

    /// Creates a tensor whose elements are generated from their coordinates.
    ///
    /// # Example
    ///
    /// ```
    /// use strided_tensor::DenseTensor;
    ///
    /// let t = DenseTensor::from_shape_fn(&[2, 2], true, |c| (c[0] * 2 + c[1]) as u8).unwrap();
    /// assert_eq!(t.as_slice(), &[0, 2, 1, 3]);
    /// ```
    pub fn from_shape_fn<F>(
        dimensions: &[usize],
        reverse_stride: bool,
        mut f: F,
    ) -> Result<Self, TensorError>
    where
        F: FnMut(&[usize]) -> T,
    {
        let shape = TensorShape::new(dimensions, reverse_stride)?;
        let mut coords = vec![0; shape.rank()];
        let data = (0..shape.len())
            .map(|i| {
                coordinates_into(shape.strides(), reverse_stride, i, &mut coords);
                f(&coords)
            })
            .collect();
        Ok(Self::from_parts(shape, data))
    }

    /// Copies an ndarray of any memory order into a new tensor with the requested layout.
    ///
    /// # Errors
    ///
    /// Fails for zero-dimensional or empty arrays.
    pub fn from_array<S, D>(
        array: &ArrayBase<S, D>,
        reverse_stride: bool,
    ) -> Result<Self, TensorError>
    where
        S: Data<Elem = T>,
        D: Dimension,
    {
        let shape = TensorShape::new(array.shape(), reverse_stride)?;
        // reversing the axes turns logical row-major iteration into column-major order
        let data = if reverse_stride {
            array.t().iter().cloned().collect()
        } else {
            array.iter().cloned().collect()
        };
        Ok(Self::from_parts(shape, data))
    }

    /// Returns the data as a mutable slice, detaching the buffer if it is shared.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        self.storage.as_mut_slice()
    }

    /// Consumes the tensor and returns its data in linear order.
    pub fn into_vec(self) -> Vec<T> {
        self.storage.into_vec()
    }

    /// Borrows the buffer under new dimensions.
    ///
    /// # Errors
    ///
    /// Fails if the new dimensions describe a different element count.
    pub fn view(&self, dimensions: &[usize]) -> Result<DenseView<'_, T>, TensorError> {
        let shape = self.shape.reshaped(dimensions)?;
        Ok(DenseView::new(self.storage.as_slice(), shape))
    }

    /// Mutably borrows the buffer under new dimensions.
    ///
    /// Writes through the view land in this tensor's buffer. A buffer shared with
    /// clones is detached first, so the clones are unaffected.
    ///
    /// # Errors
    ///
    /// Fails if the new dimensions describe a different element count.
    ///
    /// # Example
    ///
    /// ```
    /// use strided_tensor::{DenseTensor, Tensor};
    ///
    /// let mut t = DenseTensor::<i32>::new(&[6], false).unwrap();
    /// t.view_mut(&[2, 3]).unwrap().set(&[1, 1], 9).unwrap();
    /// assert_eq!(t.get_value(4).unwrap(), 9);
    /// ```
    pub fn view_mut(&mut self, dimensions: &[usize]) -> Result<DenseViewMut<'_, T>, TensorError> {
        let shape = self.shape.reshaped(dimensions)?;
        Ok(DenseViewMut::new(self.storage.as_mut_slice(), shape))
    }

    pub(crate) fn from_parts(shape: TensorShape, data: Vec<T>) -> Self {
        debug_assert_eq!(shape.len(), data.len());
        Self {
            storage: TensorStorage::from_vec(data),
            shape,
        }
    }
}

impl<T> DenseTensor<T> {
    /// Returns the data as a slice in linear order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.storage.as_slice()
    }

    /// Returns true if both tensors read from the same buffer.
    #[inline]
    pub fn shares_buffer_with(&self, other: &Self) -> bool {
        self.storage.ptr_eq(&other.storage)
    }
}

impl<T: Element> Tensor<T> for DenseTensor<T> {
    type Like<U: Element> = DenseTensor<U>;

    #[inline]
    fn shape(&self) -> &TensorShape {
        &self.shape
    }

    #[inline]
    fn get_value(&self, index: usize) -> Result<T, TensorError> {
        self.as_slice()
            .get(index)
            .cloned()
            .ok_or_else(|| TensorError::index_out_of_bounds(index, self.shape.len()))
    }

    #[inline]
    fn set_value(&mut self, index: usize, value: T) -> Result<(), TensorError> {
        self.shape.check_index(index)?;
        self.as_slice_mut()[index] = value;
        Ok(())
    }

    fn fill(&mut self, value: T) {
        if self.storage.is_unique() {
            self.as_slice_mut().fill(value);
        } else {
            self.storage = TensorStorage::from_vec(vec![value; self.shape.len()]);
        }
    }

    fn clone_empty_as<U: Element>(
        &self,
        dimensions: &[usize],
    ) -> Result<DenseTensor<U>, TensorError> {
        DenseTensor::new(dimensions, self.shape.is_reversed_stride())
    }

    fn reshape(&self, dimensions: &[usize]) -> Result<Self, TensorError> {
        Ok(Self {
            storage: self.storage.clone(),
            shape: self.shape.reshaped(dimensions)?,
        })
    }

    fn non_zero_count(&self) -> usize {
        self.as_slice().iter().filter(|v| !v.is_zero()).count()
    }

    fn to_vec(&self) -> Vec<T> {
        self.as_slice().to_vec()
    }

    fn to_dense(&self) -> DenseTensor<T> {
        self.clone()
    }
}
