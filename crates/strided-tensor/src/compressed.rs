//! Compressed-sparse storage, the n-dimensional analogue of CSR and CSC matrices.
//!
//! One axis is compressed: axis 0 for row-major tensors and the last axis for
//! column-major tensors. It is the axis with the largest stride, so a linear index
//! splits into a compressed coordinate `index / stride` and a sub-index
//! `index % stride` over the remaining axes.
//!
//! Three buffers hold the state:
//!
//! * `values` - the stored non-zero values,
//! * `indices` - the sub-index of each stored value,
//! * `compressed_counts` - running counts, so the values of compressed coordinate
//!   `k` live at positions `compressed_counts[k]..compressed_counts[k + 1]`.
//!
//! Inside a bucket the sub-indices are sorted ascending and unique. Since the
//! compressed axis has the largest stride, the stored order is also ascending
//! linear-index order.

use ndarray::{ArrayBase, Data, Dimension};

use crate::{
    dense::DenseTensor,
    element::Element,
    shape::TensorShape,
    sparse::SparseTensor,
    tensor::{Tensor, TensorError},
};

/// Capacity allocated on the first insertion into an empty buffer.
pub const DEFAULT_CAPACITY: usize = 64;

/// A tensor storing its non-zero elements in compressed buckets along one axis.
///
/// Insertion and removal shift the tail of the buffers, so they cost
/// `O(non_zero_count)`. Lookups binary-search one bucket.
///
/// # Example
///
/// ```
/// use strided_tensor::{CompressedSparseTensor, Tensor};
///
/// let mut t = CompressedSparseTensor::<i32>::new(&[3, 4], false).unwrap();
/// t.set(&[2, 1], 5).unwrap();
/// t.set(&[0, 3], 1).unwrap();
/// assert_eq!(t.compressed_counts(), &[0, 1, 1, 2]);
/// assert_eq!(t.get(&[2, 1]).unwrap(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct CompressedSparseTensor<T> {
    values: Vec<T>,
    indices: Vec<usize>,
    compressed_counts: Vec<usize>,
    non_zero_count: usize,
    compressed_dimension: usize,
    shape: TensorShape,
}

impl<T: Element> CompressedSparseTensor<T> {
    /// Creates an all-zero tensor with no allocated capacity.
    pub fn new(dimensions: &[usize], reverse_stride: bool) -> Result<Self, TensorError> {
        Self::with_capacity(dimensions, 0, reverse_stride)
    }

    /// Creates an all-zero tensor with room for `capacity` non-zero elements.
    ///
    /// The capacity is capped at the element count.
    pub fn with_capacity(
        dimensions: &[usize],
        capacity: usize,
        reverse_stride: bool,
    ) -> Result<Self, TensorError> {
        let shape = TensorShape::new(dimensions, reverse_stride)?;
        let capacity = capacity.min(shape.len());
        let compressed_dimension = shape.compressed_dimension();
        Ok(Self {
            values: vec![T::zero(); capacity],
            indices: vec![0; capacity],
            compressed_counts: vec![0; dimensions[compressed_dimension] + 1],
            non_zero_count: 0,
            compressed_dimension,
            shape,
        })
    }

    /// Wraps caller-supplied compressed buffers.
    ///
    /// # Arguments
    ///
    /// * `values` - Stored values. Its length is the capacity.
    /// * `compressed_counts` - Running counts, one more than the size of the
    ///   compressed axis.
    /// * `indices` - Sub-index of each stored value, same length as `values`.
    /// * `non_zero_count` - Number of values in use.
    /// * `dimensions` - The size of every axis.
    /// * `reverse_stride` - `true` for column-major layout.
    ///
    /// Cells of `values` past `non_zero_count` are reset to zero.
    ///
    /// # Errors
    ///
    /// Fails with [`TensorError::InvalidStorage`] if the buffers are inconsistent:
    /// wrong lengths, counts not starting at zero, decreasing or not ending at
    /// `non_zero_count`, unsorted or duplicate sub-indices within a bucket, a
    /// sub-index out of range, a stored zero, or a capacity above the element count.
    pub fn from_parts(
        mut values: Vec<T>,
        compressed_counts: Vec<usize>,
        indices: Vec<usize>,
        non_zero_count: usize,
        dimensions: &[usize],
        reverse_stride: bool,
    ) -> Result<Self, TensorError> {
        let shape = TensorShape::new(dimensions, reverse_stride)?;
        let compressed_dimension = shape.compressed_dimension();
        let compressed_stride = shape.strides()[compressed_dimension];
        let invalid = |message: String| Err(TensorError::InvalidStorage(message));

        if compressed_counts.len() != dimensions[compressed_dimension] + 1 {
            return invalid(format!(
                "compressed counts have {} entries, expected {}",
                compressed_counts.len(),
                dimensions[compressed_dimension] + 1
            ));
        }
        if values.len() != indices.len() {
            return invalid(format!(
                "{} values but {} indices",
                values.len(),
                indices.len()
            ));
        }
        if values.len() < non_zero_count {
            return invalid(format!(
                "capacity {} is below the non-zero count {non_zero_count}",
                values.len()
            ));
        }
        if values.len() > shape.len() {
            return invalid(format!(
                "capacity {} exceeds the element count {}",
                values.len(),
                shape.len()
            ));
        }
        if compressed_counts[0] != 0 {
            return invalid("compressed counts must start at zero".to_string());
        }
        if compressed_counts.windows(2).any(|w| w[0] > w[1]) {
            return invalid("compressed counts must be non-decreasing".to_string());
        }
        if compressed_counts[compressed_counts.len() - 1] != non_zero_count {
            return invalid(format!(
                "compressed counts end at {}, expected {non_zero_count}",
                compressed_counts[compressed_counts.len() - 1]
            ));
        }
        for (k, bucket) in compressed_counts.windows(2).enumerate() {
            let bucket = &indices[bucket[0]..bucket[1]];
            if bucket.windows(2).any(|w| w[0] >= w[1]) {
                return invalid(format!(
                    "indices of compressed coordinate {k} are not sorted and unique"
                ));
            }
            if let Some(&index) = bucket.iter().find(|&&i| i >= compressed_stride) {
                return invalid(format!(
                    "index {index} of compressed coordinate {k} exceeds {compressed_stride}"
                ));
            }
        }
        if let Some(position) = values[..non_zero_count].iter().position(<T as Element>::is_zero) {
            return invalid(format!("stored value at position {position} is zero"));
        }
        values[non_zero_count..].fill(T::zero());

        Ok(Self {
            values,
            indices,
            compressed_counts,
            non_zero_count,
            compressed_dimension,
            shape,
        })
    }

    /// Copies the non-zero elements of an ndarray into a new tensor.
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
        Ok(DenseTensor::from_array(array, reverse_stride)?.to_compressed_sparse())
    }

    /// Returns the value buffer, including the zero-filled spare capacity.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Returns the sub-index buffer, including the spare capacity.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Returns the running counts of the compressed axis.
    #[inline]
    pub fn compressed_counts(&self) -> &[usize] {
        &self.compressed_counts
    }

    /// Returns the length of the backing buffers.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// Returns the compressed axis.
    #[inline]
    pub fn compressed_dimension(&self) -> usize {
        self.compressed_dimension
    }

    /// Returns the stride of the compressed axis, the range of sub-indices.
    #[inline]
    pub fn compressed_stride(&self) -> usize {
        self.shape.strides()[self.compressed_dimension]
    }

    /// Returns the stored `(linear index, value)` pairs in ascending index order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        let compressed_stride = self.compressed_stride();
        self.compressed_counts
            .windows(2)
            .enumerate()
            .flat_map(move |(k, bucket)| {
                (bucket[0]..bucket[1])
                    .map(move |p| (k * compressed_stride + self.indices[p], &self.values[p]))
            })
    }

    /// Grows the buffers so they can hold at least `capacity` values.
    pub fn reserve(&mut self, capacity: usize) {
        self.ensure_capacity(capacity.min(self.shape.len()), None);
    }

    /// Searches a bucket for a sub-index.
    ///
    /// Returns `Ok(position)` of the stored value, or `Err(position)` where a value
    /// with this sub-index would be inserted.
    ///
    /// # Panics
    ///
    /// Panics if `compressed` is not a coordinate of the compressed axis.
    pub fn try_find_index(&self, compressed: usize, non_compressed: usize) -> Result<usize, usize> {
        let start = self.compressed_counts[compressed];
        let end = self.compressed_counts[compressed + 1];
        self.indices[start..end]
            .binary_search(&non_compressed)
            .map(|p| start + p)
            .map_err(|p| start + p)
    }

    /// Sets the element at a compressed coordinate and sub-index.
    ///
    /// Writing zero removes a stored value; writing a non-zero value overwrites or
    /// inserts it.
    ///
    /// # Errors
    ///
    /// Fails if `compressed` is outside the compressed axis or `non_compressed` is
    /// not below [`Self::compressed_stride`].
    pub fn set_at(
        &mut self,
        value: T,
        compressed: usize,
        non_compressed: usize,
    ) -> Result<(), TensorError> {
        let size = self.shape.dimensions()[self.compressed_dimension];
        if compressed >= size {
            return Err(TensorError::AxisOutOfBounds {
                axis: self.compressed_dimension,
                index: compressed,
                size,
            });
        }
        let compressed_stride = self.compressed_stride();
        if non_compressed >= compressed_stride {
            return Err(TensorError::index_out_of_bounds(
                non_compressed,
                compressed_stride,
            ));
        }

        match self.try_find_index(compressed, non_compressed) {
            Ok(position) if value.is_zero() => self.remove_at(position, compressed),
            Ok(position) => self.values[position] = value,
            Err(_) if value.is_zero() => {}
            Err(position) => self.insert_at(position, compressed, non_compressed, value),
        }
        Ok(())
    }

    pub(crate) fn from_sorted_entries<I>(shape: TensorShape, entries: I) -> Self
    where
        I: IntoIterator<Item = (usize, T)>,
    {
        let compressed_dimension = shape.compressed_dimension();
        let compressed_stride = shape.strides()[compressed_dimension];
        let mut compressed_counts = vec![0; shape.dimensions()[compressed_dimension] + 1];
        let mut values = Vec::new();
        let mut indices = Vec::new();
        for (index, value) in entries {
            debug_assert!(!value.is_zero());
            debug_assert!(index < shape.len());
            compressed_counts[index / compressed_stride + 1] += 1;
            values.push(value);
            indices.push(index % compressed_stride);
        }
        for k in 1..compressed_counts.len() {
            compressed_counts[k] += compressed_counts[k - 1];
        }
        log::trace!(
            "built compressed buckets for {:?} with {} entries",
            shape.dimensions(),
            values.len()
        );

        Self {
            non_zero_count: values.len(),
            values,
            indices,
            compressed_counts,
            compressed_dimension,
            shape,
        }
    }

    #[inline]
    fn split_index(&self, index: usize) -> (usize, usize) {
        let compressed_stride = self.compressed_stride();
        (index / compressed_stride, index % compressed_stride)
    }

    fn insert_at(&mut self, position: usize, compressed: usize, non_compressed: usize, value: T) {
        let used = self.non_zero_count;
        let opened = self.ensure_capacity(used + 1, Some(position));
        if !opened {
            // the spare cell at `used` rotates into `position`
            self.values[position..=used].rotate_right(1);
            self.indices[position..=used].rotate_right(1);
        }
        self.values[position] = value;
        self.indices[position] = non_compressed;
        self.non_zero_count += 1;
        for count in &mut self.compressed_counts[compressed + 1..] {
            *count += 1;
        }
    }

    fn remove_at(&mut self, position: usize, compressed: usize) {
        let used = self.non_zero_count;
        self.values[position..used].rotate_left(1);
        self.indices[position..used].rotate_left(1);
        self.values[used - 1] = T::zero();
        self.indices[used - 1] = 0;
        self.non_zero_count -= 1;
        for count in &mut self.compressed_counts[compressed + 1..] {
            *count -= 1;
        }
    }

    /// Grows the buffers to hold at least `min` values.
    ///
    /// With `allocate_index`, the copy leaves an empty cell at that position and
    /// returns true, so the caller can write the new value without shifting.
    fn ensure_capacity(&mut self, min: usize, allocate_index: Option<usize>) -> bool {
        let capacity = self.capacity();
        if capacity >= min {
            return false;
        }
        let grown = if capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            capacity.saturating_mul(2)
        };
        let new_capacity = grown.min(self.shape.len()).max(min);
        log::debug!(
            "growing compressed sparse buffers of {:?} from {capacity} to {new_capacity}",
            self.shape.dimensions()
        );

        let used = self.non_zero_count;
        grow_buffer(&mut self.values, used, allocate_index, new_capacity, T::zero());
        grow_buffer(&mut self.indices, used, allocate_index, new_capacity, 0);
        allocate_index.is_some()
    }
}

/// Moves the first `used` cells of `buffer` into a buffer of length `capacity`,
/// optionally leaving a `fill` cell at position `gap`.
fn grow_buffer<U: Clone>(
    buffer: &mut Vec<U>,
    used: usize,
    gap: Option<usize>,
    capacity: usize,
    fill: U,
) {
    let mut grown = Vec::with_capacity(capacity);
    match gap {
        Some(split) => {
            grown.extend(buffer.drain(..split));
            grown.push(fill.clone());
            grown.extend(buffer.drain(..used - split));
        }
        None => grown.extend(buffer.drain(..used)),
    }
    grown.resize(capacity, fill);
    *buffer = grown;
}

impl<T: Element> Tensor<T> for CompressedSparseTensor<T> {
    type Like<U: Element> = CompressedSparseTensor<U>;

    #[inline]
    fn shape(&self) -> &TensorShape {
        &self.shape
    }

    fn get_value(&self, index: usize) -> Result<T, TensorError> {
        self.shape.check_index(index)?;
        let (compressed, non_compressed) = self.split_index(index);
        Ok(match self.try_find_index(compressed, non_compressed) {
            Ok(position) => self.values[position].clone(),
            Err(_) => T::zero(),
        })
    }

    fn set_value(&mut self, index: usize, value: T) -> Result<(), TensorError> {
        self.shape.check_index(index)?;
        let (compressed, non_compressed) = self.split_index(index);
        self.set_at(value, compressed, non_compressed)
    }

    fn fill(&mut self, value: T) {
        if value.is_zero() {
            self.values.fill(T::zero());
            self.indices.fill(0);
            self.compressed_counts.fill(0);
            self.non_zero_count = 0;
            return;
        }
        let length = self.shape.len();
        let compressed_stride = self.compressed_stride();
        self.values = vec![value; length];
        self.indices = (0..length).map(|i| i % compressed_stride).collect();
        for (k, count) in self.compressed_counts.iter_mut().enumerate() {
            *count = k * compressed_stride;
        }
        self.non_zero_count = length;
    }

    fn clone_empty_as<U: Element>(
        &self,
        dimensions: &[usize],
    ) -> Result<CompressedSparseTensor<U>, TensorError> {
        CompressedSparseTensor::new(dimensions, self.shape.is_reversed_stride())
    }

    fn reshape(&self, dimensions: &[usize]) -> Result<Self, TensorError> {
        let shape = self.shape.reshaped(dimensions)?;
        log::debug!(
            "rebuilding compressed buckets for reshape {:?} -> {:?}",
            self.shape.dimensions(),
            dimensions
        );
        Ok(Self::from_sorted_entries(
            shape,
            self.entries().map(|(i, v)| (i, v.clone())),
        ))
    }

    #[inline]
    fn non_zero_count(&self) -> usize {
        self.non_zero_count
    }

    fn to_vec(&self) -> Vec<T> {
        let mut data = vec![T::zero(); self.shape.len()];
        for (index, value) in self.entries() {
            data[index] = value.clone();
        }
        data
    }

    fn to_dense(&self) -> DenseTensor<T> {
        log::debug!(
            "converting compressed sparse tensor {:?} to dense",
            self.shape.dimensions()
        );
        DenseTensor::from_parts(self.shape.clone(), self.to_vec())
    }

    fn to_sparse(&self) -> SparseTensor<T> {
        log::debug!(
            "converting compressed sparse tensor {:?} to sparse",
            self.shape.dimensions()
        );
        SparseTensor::from_entries(
            self.shape.clone(),
            self.entries().map(|(i, v)| (i, v.clone())),
        )
    }

    fn to_compressed_sparse(&self) -> CompressedSparseTensor<T> {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::arr2;

    use super::DEFAULT_CAPACITY;
    use crate::{CompressedSparseTensor, Element, Tensor, TensorError};

    fn assert_sorted_buckets<T: Element>(t: &CompressedSparseTensor<T>) {
        for bucket in t.compressed_counts().windows(2) {
            let indices = &t.indices()[bucket[0]..bucket[1]];
            assert!(indices.windows(2).all(|w| w[0] < w[1]), "{indices:?}");
        }
    }

    #[test]
    fn test_compressed_axis_follows_layout() -> Result<(), TensorError> {
        let row = CompressedSparseTensor::<u8>::new(&[2, 3, 4], false)?;
        assert_eq!(row.compressed_dimension(), 0);
        assert_eq!(row.compressed_stride(), 12);
        assert_eq!(row.compressed_counts().len(), 3);

        let col = CompressedSparseTensor::<u8>::new(&[2, 3, 4], true)?;
        assert_eq!(col.compressed_dimension(), 2);
        assert_eq!(col.compressed_stride(), 6);
        assert_eq!(col.compressed_counts().len(), 5);
        assert_eq!(col.capacity(), 0);
        Ok(())
    }

    #[test]
    fn test_insert_and_find() -> Result<(), TensorError> {
        let mut t = CompressedSparseTensor::<i32>::new(&[3, 4], false)?;
        t.set(&[1, 3], 13)?;
        t.set(&[1, 0], 10)?;
        t.set(&[0, 2], 2)?;
        assert_eq!(t.non_zero_count(), 3);
        assert_eq!(t.compressed_counts(), &[0, 1, 3, 3]);
        assert_eq!(&t.indices()[..3], &[2, 0, 3]);
        assert_eq!(&t.values()[..3], &[2, 10, 13]);
        assert_eq!(t.try_find_index(1, 3), Ok(2));
        assert_eq!(t.try_find_index(1, 1), Err(2));
        assert_eq!(t.try_find_index(2, 0), Err(3));

        t.set(&[1, 3], 31)?;
        assert_eq!(t.get(&[1, 3])?, 31);
        assert_eq!(t.non_zero_count(), 3);
        Ok(())
    }

    #[test]
    fn test_removal_shifts_left_and_zeroes_tail() -> Result<(), TensorError> {
        let mut t = CompressedSparseTensor::<i32>::new(&[2, 2], false)?;
        for i in 0..4 {
            t.set_value(i, i as i32 + 1)?;
        }
        t.set(&[0, 1], 0)?;
        assert_eq!(t.non_zero_count(), 3);
        assert_eq!(t.compressed_counts(), &[0, 1, 3]);
        assert_eq!(t.values(), &[1, 3, 4, 0]);
        assert_eq!(t.indices(), &[0, 0, 1, 0]);
        assert_eq!(t.to_vec(), vec![1, 0, 3, 4]);

        // removing an absent value is a no-op
        t.set(&[0, 1], 0)?;
        assert_eq!(t.non_zero_count(), 3);
        Ok(())
    }

    #[test]
    fn test_insertion_order_does_not_matter() -> Result<(), TensorError> {
        let entries = [(7, 1.5f64), (0, 2.0), (13, -1.0), (8, 4.0), (15, 3.0)];
        let mut forward = CompressedSparseTensor::new(&[4, 4], true)?;
        for &(i, v) in &entries {
            forward.set_value(i, v)?;
        }
        let mut backward = CompressedSparseTensor::new(&[4, 4], true)?;
        for &(i, v) in entries.iter().rev() {
            backward.set_value(i, v)?;
        }
        // an extra entry inserted then removed again
        backward.set_value(3, 9.0)?;
        backward.set_value(3, 0.0)?;

        assert_eq!(forward.non_zero_count(), backward.non_zero_count());
        assert_eq!(forward.compressed_counts(), backward.compressed_counts());
        assert!(forward.structural_eq(&backward)?);
        assert_sorted_buckets(&forward);
        assert_sorted_buckets(&backward);
        Ok(())
    }

    #[test]
    fn test_capacity_growth() -> Result<(), TensorError> {
        let mut t = CompressedSparseTensor::<u32>::new(&[10, 10], false)?;
        assert_eq!(t.capacity(), 0);
        t.set_value(99, 7)?;
        assert_eq!(t.capacity(), DEFAULT_CAPACITY);

        // fill in descending order so every insertion lands in front
        for i in (0..DEFAULT_CAPACITY).rev() {
            t.set_value(i, i as u32 + 1)?;
        }
        assert_eq!(t.non_zero_count(), DEFAULT_CAPACITY + 1);
        // doubling is capped at the element count
        assert_eq!(t.capacity(), 100);
        for i in 0..DEFAULT_CAPACITY {
            assert_eq!(t.get_value(i)?, i as u32 + 1);
        }
        assert_eq!(t.get_value(99)?, 7);
        assert_sorted_buckets(&t);
        Ok(())
    }

    #[test]
    fn test_capacity_capped_at_length() -> Result<(), TensorError> {
        let mut t = CompressedSparseTensor::<i8>::new(&[2, 2], true)?;
        t.set(&[1, 1], 1)?;
        assert_eq!(t.capacity(), 4);
        t.reserve(100);
        assert_eq!(t.capacity(), 4);

        let t = CompressedSparseTensor::<i8>::with_capacity(&[2, 2], 10, true)?;
        assert_eq!(t.capacity(), 4);
        Ok(())
    }

    #[test]
    fn test_growth_split_keeps_gap_at_insertion_point() -> Result<(), TensorError> {
        let mut t = CompressedSparseTensor::<u8>::with_capacity(&[1, 8], 2, false)?;
        t.set_value(1, 1)?;
        t.set_value(5, 5)?;
        assert_eq!(t.capacity(), 2);
        t.set_value(3, 3)?;
        assert_eq!(t.capacity(), 4);
        assert_eq!(t.values(), &[1, 3, 5, 0]);
        assert_eq!(t.indices(), &[1, 3, 5, 0]);
        Ok(())
    }

    #[test]
    fn test_reshape_rebuilds_buckets() -> Result<(), TensorError> {
        let array = arr2(&[[0, 1, 0], [2, 0, 3]]);
        let t = CompressedSparseTensor::from_array(&array, false)?;
        assert_eq!(t.compressed_counts(), &[0, 1, 3]);

        let r = t.reshape(&[3, 2])?;
        assert_eq!(r.compressed_counts(), &[0, 1, 2, 3]);
        assert_eq!(r.to_vec(), t.to_vec());
        assert_sorted_buckets(&r);
        assert!(t.reshape(&[4]).is_err());
        Ok(())
    }

    #[test]
    fn test_fill_patterns() -> Result<(), TensorError> {
        let mut t = CompressedSparseTensor::<i16>::new(&[2, 3], true)?;
        t.fill(4);
        assert_eq!(t.non_zero_count(), 6);
        assert_eq!(t.compressed_counts(), &[0, 2, 4, 6]);
        assert_eq!(t.to_vec(), vec![4; 6]);
        assert_sorted_buckets(&t);
        t.fill(0);
        assert_eq!(t.non_zero_count(), 0);
        assert_eq!(t.get(&[1, 2])?, 0);
        Ok(())
    }

    #[test]
    fn test_from_parts_validates() -> Result<(), TensorError> {
        let t = CompressedSparseTensor::from_parts(
            vec![5, 6, 9],
            vec![0, 1, 2],
            vec![2, 0, 7],
            2,
            &[2, 3],
            false,
        )?;
        assert_eq!(t.values(), &[5, 6, 0]);
        assert_eq!(t.get(&[0, 2])?, 5);
        assert_eq!(t.get(&[1, 0])?, 6);

        let cases = [
            (vec![5, 6], vec![0, 1], vec![2, 0], 2),
            (vec![5, 6], vec![1, 1, 2], vec![2, 0], 2),
            (vec![5, 6], vec![0, 2, 1], vec![2, 0], 2),
            (vec![5, 6], vec![0, 2, 2], vec![2, 2], 2),
            (vec![5, 6], vec![0, 1, 2], vec![3, 0], 2),
            (vec![5, 0], vec![0, 1, 2], vec![2, 0], 2),
            (vec![5, 6], vec![0, 1, 2], vec![2], 2),
            (vec![1; 7], vec![0, 1, 1], vec![0; 7], 1),
        ];
        for (values, counts, indices, nnz) in cases {
            assert!(matches!(
                CompressedSparseTensor::from_parts(values, counts, indices, nnz, &[2, 3], false),
                Err(TensorError::InvalidStorage(_))
            ));
        }
        Ok(())
    }

    #[test]
    fn test_set_at_checks_bounds() -> Result<(), TensorError> {
        let mut t = CompressedSparseTensor::<u8>::new(&[2, 3], false)?;
        t.set_at(1, 1, 2)?;
        assert_eq!(t.get(&[1, 2])?, 1);
        assert!(t.set_at(1, 2, 0).is_err());
        assert!(t.set_at(1, 0, 3).is_err());
        Ok(())
    }

    #[test]
    fn test_entries_in_linear_order() -> Result<(), TensorError> {
        let mut t = CompressedSparseTensor::<u8>::new(&[3, 2], true)?;
        for i in [5, 0, 3] {
            t.set_value(i, 1)?;
        }
        let indices: Vec<usize> = t.entries().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 3, 5]);
        Ok(())
    }
}
