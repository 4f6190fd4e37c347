use std::collections::HashMap;
use std::sync::Arc;

use ndarray::{ArrayBase, Data, Dimension};

use crate::{
    compressed::CompressedSparseTensor,
    element::Element,
    index::linear_index,
    shape::TensorShape,
    tensor::{Tensor, TensorError},
};

/// A tensor storing only its non-zero elements, keyed by linear index.
///
/// Reading a missing key yields zero and writing zero removes the key, so the map
/// never holds a zero value.
///
/// # Example
///
/// ```
/// use strided_tensor::{SparseTensor, Tensor};
///
/// let mut t = SparseTensor::<f64>::new(&[1000, 1000], false).unwrap();
/// t.set(&[10, 20], 1.5).unwrap();
/// assert_eq!(t.non_zero_count(), 1);
/// t.set(&[10, 20], 0.0).unwrap();
/// assert_eq!(t.non_zero_count(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct SparseTensor<T> {
    values: Arc<HashMap<usize, T>>,
    shape: TensorShape,
}

impl<T: Element> SparseTensor<T> {
    /// Creates an all-zero sparse tensor.
    pub fn new(dimensions: &[usize], reverse_stride: bool) -> Result<Self, TensorError> {
        Self::with_capacity(dimensions, 0, reverse_stride)
    }

    /// Creates an all-zero sparse tensor with room for `capacity` non-zero elements.
    pub fn with_capacity(
        dimensions: &[usize],
        capacity: usize,
        reverse_stride: bool,
    ) -> Result<Self, TensorError> {
        let shape = TensorShape::new(dimensions, reverse_stride)?;
        Ok(Self {
            values: Arc::new(HashMap::with_capacity(capacity.min(shape.len()))),
            shape,
        })
    }

    /// Copies the non-zero elements of an ndarray into a new sparse tensor.
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
        let array = array.view().into_dyn();
        let values: HashMap<usize, T> = array
            .indexed_iter()
            .filter(|(_, v)| !v.is_zero())
            .map(|(coords, v)| (linear_index(shape.strides(), coords.slice()), v.clone()))
            .collect();
        Ok(Self {
            values: Arc::new(values),
            shape,
        })
    }

    /// Returns the stored `(linear index, value)` pairs in ascending index order.
    pub fn entries(&self) -> Vec<(usize, &T)> {
        let mut entries: Vec<_> = self.values.iter().map(|(&i, v)| (i, v)).collect();
        entries.sort_unstable_by_key(|&(i, _)| i);
        entries
    }

    /// Returns true if both tensors read the same map.
    #[inline]
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }

    pub(crate) fn from_entries<I>(shape: TensorShape, entries: I) -> Self
    where
        I: IntoIterator<Item = (usize, T)>,
    {
        Self {
            values: Arc::new(entries.into_iter().collect()),
            shape,
        }
    }
}

impl<T: Element> Tensor<T> for SparseTensor<T> {
    type Like<U: Element> = SparseTensor<U>;

    #[inline]
    fn shape(&self) -> &TensorShape {
        &self.shape
    }

    fn get_value(&self, index: usize) -> Result<T, TensorError> {
        self.shape.check_index(index)?;
        Ok(self.values.get(&index).cloned().unwrap_or_else(T::zero))
    }

    fn set_value(&mut self, index: usize, value: T) -> Result<(), TensorError> {
        self.shape.check_index(index)?;
        if value.is_zero() {
            if self.values.contains_key(&index) {
                Arc::make_mut(&mut self.values).remove(&index);
            }
        } else {
            Arc::make_mut(&mut self.values).insert(index, value);
        }
        Ok(())
    }

    fn fill(&mut self, value: T) {
        self.values = if value.is_zero() {
            Arc::new(HashMap::new())
        } else {
            log::debug!(
                "filling sparse tensor {:?} with a non-zero value stores every element",
                self.shape.dimensions()
            );
            Arc::new((0..self.shape.len()).map(|i| (i, value.clone())).collect())
        };
    }

    fn clone_empty_as<U: Element>(
        &self,
        dimensions: &[usize],
    ) -> Result<SparseTensor<U>, TensorError> {
        SparseTensor::new(dimensions, self.shape.is_reversed_stride())
    }

    fn reshape(&self, dimensions: &[usize]) -> Result<Self, TensorError> {
        Ok(Self {
            values: Arc::clone(&self.values),
            shape: self.shape.reshaped(dimensions)?,
        })
    }

    #[inline]
    fn non_zero_count(&self) -> usize {
        self.values.len()
    }

    fn to_sparse(&self) -> SparseTensor<T> {
        self.clone()
    }

    fn to_compressed_sparse(&self) -> CompressedSparseTensor<T> {
        log::debug!(
            "converting sparse tensor {:?} with {} entries to compressed sparse",
            self.shape.dimensions(),
            self.values.len()
        );
        CompressedSparseTensor::from_sorted_entries(
            self.shape.clone(),
            self.entries().into_iter().map(|(i, v)| (i, v.clone())),
        )
    }
}
