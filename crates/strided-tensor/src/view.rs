use crate::{dense::DenseTensor, element::Element, shape::TensorShape, tensor::TensorError};

/// A non-owning view into a dense buffer under its own dimensions.
///
/// `DenseView` borrows the buffer of a [`DenseTensor`] for its lifetime `'a` and
/// reads it under a reshaped [`TensorShape`], without copying.
///
/// # Example
///
/// ```rust
/// use strided_tensor::DenseTensor;
///
/// let tensor = DenseTensor::from_shape_vec(&[6], vec![1, 2, 3, 4, 5, 6], false).unwrap();
/// let view = tensor.view(&[2, 3]).unwrap();
/// assert_eq!(view.get(&[1, 2]).unwrap(), 6);
/// assert_eq!(view.to_owned().as_slice(), tensor.as_slice());
/// ```
#[derive(Debug)]
pub struct DenseView<'a, T> {
    data: &'a [T],
    shape: TensorShape,
}

impl<'a, T: Element> DenseView<'a, T> {
    pub(crate) fn new(data: &'a [T], shape: TensorShape) -> Self {
        Self { data, shape }
    }

    /// Returns the shape of the view.
    #[inline]
    pub fn shape(&self) -> &TensorShape {
        &self.shape
    }

    /// Returns the size of every axis of the view.
    #[inline]
    pub fn dimensions(&self) -> &[usize] {
        self.shape.dimensions()
    }

    /// Returns the borrowed buffer in linear order.
    #[inline]
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Gets the element at a linear index.
    pub fn get_value(&self, index: usize) -> Result<T, TensorError> {
        self.shape.check_index(index)?;
        Ok(self.data[index].clone())
    }

    /// Gets the element at a coordinate set of the view.
    pub fn get(&self, indices: &[usize]) -> Result<T, TensorError> {
        let index = self.shape.index_of(indices)?;
        Ok(self.data[index].clone())
    }

    /// Copies the view into an owned tensor with the view's dimensions.
    pub fn to_owned(&self) -> DenseTensor<T> {
        DenseTensor::from_parts(self.shape.clone(), self.data.to_vec())
    }
}

/// A mutable non-owning view into a dense buffer under its own dimensions.
///
/// Writes through the view are observed by the owning tensor once the borrow ends.
#[derive(Debug)]
pub struct DenseViewMut<'a, T> {
    data: &'a mut [T],
    shape: TensorShape,
}

impl<'a, T: Element> DenseViewMut<'a, T> {
    pub(crate) fn new(data: &'a mut [T], shape: TensorShape) -> Self {
        Self { data, shape }
    }

    /// Returns the shape of the view.
    #[inline]
    pub fn shape(&self) -> &TensorShape {
        &self.shape
    }

    /// Returns the size of every axis of the view.
    #[inline]
    pub fn dimensions(&self) -> &[usize] {
        self.shape.dimensions()
    }

    /// Returns the borrowed buffer in linear order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &*self.data
    }

    /// Returns the borrowed buffer as a mutable slice.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut *self.data
    }

    /// Gets the element at a coordinate set of the view.
    pub fn get(&self, indices: &[usize]) -> Result<T, TensorError> {
        let index = self.shape.index_of(indices)?;
        Ok(self.data[index].clone())
    }

    /// Sets the element at a linear index.
    pub fn set_value(&mut self, index: usize, value: T) -> Result<(), TensorError> {
        self.shape.check_index(index)?;
        self.data[index] = value;
        Ok(())
    }

    /// Sets the element at a coordinate set of the view.
    pub fn set(&mut self, indices: &[usize], value: T) -> Result<(), TensorError> {
        let index = self.shape.index_of(indices)?;
        self.data[index] = value;
        Ok(())
    }

    /// Sets every element of the buffer.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}
